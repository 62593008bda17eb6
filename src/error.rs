//! Error types for the fallible surfaces: backup files and the task store.
//!
//! The analysis engine has no error path; everything here concerns I/O.

use thiserror::Error;

use crate::db::DbError;

/// Errors raised while exporting or restoring a JSON backup.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Invalid backup JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Unsupported backup version: {0}")]
    UnsupportedVersion(String),

    #[error("Backup is not valid UTF-8: {0}")]
    Encoding(String),
}

impl BackupError {
    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BackupError::Json(_) | BackupError::Encoding(_) => {
                "Check that the file is a MindFlow backup and was not edited by hand."
            }
            BackupError::Io(_) => "Check file permissions and disk space.",
            BackupError::Db(_) => "Close other copies of the app and try again.",
            BackupError::UnsupportedVersion(_) => {
                "This backup was written by a newer version. Update and try again."
            }
        }
    }
}
