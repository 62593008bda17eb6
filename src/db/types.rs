//! Shared type definitions for the database layer.

use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Task {0} not found")]
    TaskNotFound(i64),
}

/// Separator for image URIs packed into a single TEXT column.
pub(crate) const IMAGE_URI_SEPARATOR: &str = "||";

pub(crate) fn join_image_uris(uris: &[String]) -> String {
    uris.join(IMAGE_URI_SEPARATOR)
}

pub(crate) fn split_image_uris(packed: &str) -> Vec<String> {
    if packed.trim().is_empty() {
        return Vec::new();
    }
    packed
        .split(IMAGE_URI_SEPARATOR)
        .map(str::to_string)
        .collect()
}
