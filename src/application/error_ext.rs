//! Error conversion helpers for stream reading
//!
//! Provides extension traits for cleaner error handling with line context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add line context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// reader.read_until(b'\n', &mut buf)
    ///     .with_line_context("read message", 3)?;
    /// ```
    fn with_line_context(self, action: &str, line: usize) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_line_context(self, action: &str, line: usize) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: line {}", action, line),
            source: Box::new(e),
        })
    }
}
