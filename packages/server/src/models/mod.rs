pub mod assignment;
pub mod progress;
pub mod shared;
