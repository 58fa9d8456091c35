//! Error conversion helpers for record loading
//!
//! Provides an extension trait for cleaner error handling with path context.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for turning I/O and parse results into load failures.
pub trait LoadResultExt<T> {
    /// Add path context to a load error.
    ///
    /// # Example
    /// ```ignore
    /// tokio::fs::read_to_string(&path)
    ///     .await
    ///     .with_path_context("read", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> LoadResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::LoadFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
