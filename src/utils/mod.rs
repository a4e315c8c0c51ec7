//! Shared utilities: error types, response envelope, logging, time.

pub mod error;
pub mod logger;
pub mod time;

pub use error::{ApiResponse, AppError, AppResult, ok, ok_with_message};
