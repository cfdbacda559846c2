pub mod assignment;
pub mod completion;
pub mod course;
pub mod submission;
pub mod user;
