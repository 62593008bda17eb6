//! MindFlow core: the task store, list queries, backups, reminder planning,
//! and the weekly analysis report.

pub mod analysis;
pub mod backup;
pub mod db;
pub mod error;
pub mod notification;
pub mod queries;
pub mod state;
pub mod types;
pub mod util;
pub mod week;

pub use analysis::{analyze, analyze_in, Keyword, WeeklyReport, WeeklyScore};
pub use types::{Category, Config, Priority, TaskRecord};
