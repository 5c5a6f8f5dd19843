//! Result type alias for syntax tree operations

use crate::error::CstError;

/// Standard Result type for syntax tree operations
pub type Result<T> = std::result::Result<T, CstError>;

/// Extension trait for best-effort paths that fall back on failure
pub trait ResultExt<T> {
    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) if err.is_recoverable() => {
                tracing::debug!("Falling back after error: {}", err);
                None
            }
            Err(err) => {
                tracing::error!("Unexpected error: {}", err);
                None
            }
        }
    }
}
