pub mod config;
pub mod progress_status;

pub use progress_status::{ParseStatusError, ProgressStatus};
