//! Reminder planning.
//!
//! Decides which task reminders should be armed or cleared. Handing the
//! result to the platform alarm service is the shell's job.

use serde::Serialize;

use crate::types::TaskRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum ReminderAction {
    /// Replace any alarm armed for the task with one at `at` (epoch millis).
    Schedule { at: i64 },
    /// Clear any alarm previously armed for the task. Cancelling a task with
    /// no armed alarm is a no-op.
    Cancel,
}

/// A reminder to arm, with the text the notification will show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReminder {
    pub task_id: i64,
    pub at: i64,
    pub title: String,
    pub body: String,
}

/// What to do with a task's reminder after it was saved or toggled.
///
/// Reminders fire at the exact reminder time. Anything that should not fire
/// is cancelled: done tasks, cleared reminders, and reminders moved into the
/// past, so an alarm armed by an earlier edit never outlives it.
pub fn plan_reminder(task: &TaskRecord, now_millis: i64) -> ReminderAction {
    match task.reminder_at {
        _ if task.done => ReminderAction::Cancel,
        Some(at) if at >= now_millis => ReminderAction::Schedule { at },
        Some(at) => {
            log::debug!(
                "Reminder for task {} at {} already passed; cancelling",
                task.id,
                at
            );
            ReminderAction::Cancel
        }
        None => ReminderAction::Cancel,
    }
}

/// Every reminder that should be armed at `now_millis`, soonest first.
/// Used to restore alarms after a restart or backup restore.
pub fn pending_reminders(tasks: &[TaskRecord], now_millis: i64) -> Vec<PendingReminder> {
    let mut pending: Vec<PendingReminder> = tasks
        .iter()
        .filter_map(|task| match plan_reminder(task, now_millis) {
            ReminderAction::Schedule { at } => Some(PendingReminder {
                task_id: task.id,
                at,
                title: task.title.clone(),
                body: task.body.clone(),
            }),
            ReminderAction::Cancel => None,
        })
        .collect();
    pending.sort_by_key(|r| (r.at, r.task_id));
    pending
}
