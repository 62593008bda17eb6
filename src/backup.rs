//! JSON backup export and restore.
//!
//! The file layout matches what the mobile app writes:
//!
//! ```json
//! { "version": "1.0", "exportTime": 1772445600000, "device": "Pixel 8",
//!   "data": [ { "id": 1, "title": "...", "content": "...", "isDone": false,
//!               "priority": 2, "category": "work", "dueDate": 0, ... } ] }
//! ```
//!
//! `dueDate` of `0` means no due date. Completion and reminder times are
//! written when present and read when available.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::TaskDb;
use crate::error::BackupError;
use crate::types::{Category, Priority, TaskRecord};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub export_time: i64,
    #[serde(default)]
    pub device: String,
    pub data: Vec<BackupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub is_incubated: bool,
    #[serde(default)]
    pub is_from_inspiration: bool,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<i64>,
}

fn default_version() -> String {
    BACKUP_VERSION.to_string()
}

fn default_priority() -> i64 {
    Priority::Medium.into()
}

fn default_category() -> String {
    Category::Other.app_label().to_string()
}

/// Non-positive timestamps are placeholders for "unset".
fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

impl From<&TaskRecord> for BackupEntry {
    fn from(task: &TaskRecord) -> Self {
        BackupEntry {
            id: task.id,
            title: task.title.clone(),
            content: task.body.clone(),
            is_done: task.done,
            priority: task.priority.into(),
            category: task.category.clone(),
            due_date: Some(task.due_at.unwrap_or(0)),
            is_incubated: task.incubated,
            is_from_inspiration: task.from_inspiration,
            audio_path: task.audio_path.clone(),
            completed_at: task.completed_at,
            reminder_time: task.reminder_at,
        }
    }
}

impl From<BackupEntry> for TaskRecord {
    fn from(entry: BackupEntry) -> Self {
        TaskRecord {
            id: entry.id,
            title: entry.title,
            body: entry.content,
            priority: Priority::from(entry.priority),
            done: entry.is_done,
            due_at: positive(entry.due_date),
            completed_at: if entry.is_done {
                positive(entry.completed_at)
            } else {
                None
            },
            category: entry.category,
            reminder_at: positive(entry.reminder_time),
            image_uris: Vec::new(),
            audio_path: entry.audio_path.filter(|p| !p.is_empty() && p != "null"),
            incubated: entry.is_incubated,
            from_inspiration: entry.is_from_inspiration,
        }
    }
}

/// Snapshot `tasks` into a backup document.
pub fn export_backup(tasks: &[TaskRecord], device: &str, now_millis: i64) -> BackupFile {
    BackupFile {
        version: BACKUP_VERSION.to_string(),
        export_time: now_millis,
        device: device.to_string(),
        data: tasks.iter().map(BackupEntry::from).collect(),
    }
}

/// Render a backup with four-space indentation.
pub fn to_json(backup: &BackupFile) -> Result<String, BackupError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    backup.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| BackupError::Encoding(e.to_string()))
}

/// Parse a backup document into task records.
pub fn parse_backup(json: &str) -> Result<Vec<TaskRecord>, BackupError> {
    let backup: BackupFile = serde_json::from_str(json)?;
    if !backup.version.starts_with("1.") && backup.version != "1" {
        return Err(BackupError::UnsupportedVersion(backup.version));
    }
    Ok(backup.data.into_iter().map(TaskRecord::from).collect())
}

pub fn read_backup_file(path: &Path) -> Result<Vec<TaskRecord>, BackupError> {
    let content = std::fs::read_to_string(path)?;
    let tasks = parse_backup(&content)?;
    log::info!("Read {} tasks from backup {}", tasks.len(), path.display());
    Ok(tasks)
}

pub fn write_backup_file(
    path: &Path,
    tasks: &[TaskRecord],
    device: &str,
    now_millis: i64,
) -> Result<(), BackupError> {
    let json = to_json(&export_backup(tasks, device, now_millis))?;
    std::fs::write(path, json)?;
    log::info!("Backed up {} tasks to {}", tasks.len(), path.display());
    Ok(())
}

/// Restore a backup into the store. Entries with an id replace the existing
/// row; the whole restore is one transaction. Returns the number restored.
pub fn restore_into(db: &TaskDb, json: &str) -> Result<usize, BackupError> {
    let tasks = parse_backup(json)?;
    let restored = db.with_transaction(|db| {
        for task in &tasks {
            db.insert_task(task)?;
        }
        Ok(tasks.len())
    })?;
    log::info!("Restored {} tasks from backup", restored);
    Ok(restored)
}
