//! Five-axis scoring.
//!
//! Every axis is a ratio computed in `f64`, rounded half away from zero, and
//! clamped to [0, 100]. Empty denominators score 0.

use super::{WeekSnapshot, WeeklyScore};

/// Completed tasks per window that earn a full activity score.
pub const ACTIVITY_BASELINE: f64 = 15.0;
/// Extra credit for a high-priority task finished after its due date.
pub const RECOVERY_WEIGHT: f64 = 0.5;
/// Extra drag for a high-priority task still open past its due date.
pub const OVERDUE_WEIGHT: f64 = 0.5;

/// Four standard categories plus "other".
const BALANCE_BUCKETS: f64 = 5.0;

pub(crate) fn score_week(week: &WeekSnapshot) -> WeeklyScore {
    let execution = execution_score(week);
    let focus = focus_score(week);
    let balance = balance_score(week);
    let resilience = resilience_score(week);
    let activity = activity_score(week);

    WeeklyScore {
        execution,
        focus,
        balance,
        resilience,
        activity,
        total_score: execution + focus + balance + resilience + activity,
    }
}

fn percent(numerator: f64, denominator: f64) -> u32 {
    if denominator <= 0.0 {
        return 0;
    }
    clamp_score(100.0 * numerator / denominator)
}

fn clamp_score(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

fn execution_score(week: &WeekSnapshot) -> u32 {
    percent(week.completed_count() as f64, week.tasks.len() as f64)
}

fn focus_score(week: &WeekSnapshot) -> u32 {
    let counts = week.completed_by_category();
    let dominant = counts.dominant_standard().map_or(0, |(_, n)| n);
    percent(dominant as f64, counts.total() as f64)
}

/// One minus the normalized concentration (sum of squared shares) of
/// completions across the five buckets.
fn balance_score(week: &WeekSnapshot) -> u32 {
    let counts = week.completed_by_category();
    let total = counts.total();
    if total == 0 {
        return 0;
    }

    let concentration: f64 = counts
        .buckets
        .iter()
        .map(|&n| {
            let share = n as f64 / total as f64;
            share * share
        })
        .sum();
    let floor = 1.0 / BALANCE_BUCKETS;
    let normalized = (concentration - floor) / (1.0 - floor);
    clamp_score(100.0 * (1.0 - normalized))
}

fn resilience_score(week: &WeekSnapshot) -> u32 {
    let mut high_total = 0usize;
    let mut completed = 0usize;
    let mut recovered = 0usize;
    let mut overdue = 0usize;

    for task in week.high_priority() {
        high_total += 1;
        if task.done {
            completed += 1;
            if task.is_recovered() {
                recovered += 1;
            }
        } else if task.is_overdue(week.window_end) {
            overdue += 1;
        }
    }

    if high_total == 0 {
        return 0;
    }

    let points = completed as f64 + RECOVERY_WEIGHT * recovered as f64;
    let weight = high_total as f64 + OVERDUE_WEIGHT * overdue as f64;
    percent(points, weight)
}

fn activity_score(week: &WeekSnapshot) -> u32 {
    percent(week.completed_count() as f64, ACTIVITY_BASELINE)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::test_support::*;
    use super::*;
    use crate::types::{Priority, TaskRecord};

    fn score(tasks: &[TaskRecord]) -> WeeklyScore {
        let (start, end) = window();
        score_week(&WeekSnapshot::collect(tasks, start, end, &Utc))
    }

    #[test]
    fn test_execution_never_decreases_when_adding_completed_task() {
        let mut tasks = vec![
            done_task(1, "work", Priority::Low, 2, 2),
            task(2, "work", Priority::Low, 3),
            task(3, "life", Priority::Low, 4),
        ];
        let mut previous = score(&tasks).execution;
        for id in 4..12 {
            tasks.push(done_task(id, "study", Priority::Medium, 5, 5));
            let current = score(&tasks).execution;
            assert!(current >= previous, "{} dropped to {}", previous, current);
            previous = current;
        }
    }

    #[test]
    fn test_resilience_zero_without_high_priority() {
        let tasks = vec![
            done_task(1, "work", Priority::Medium, 2, 2),
            done_task(2, "life", Priority::Low, 3, 3),
        ];
        let s = score(&tasks);
        assert_eq!(s.resilience, 0);
        assert_eq!(s.execution, 100);
    }

    #[test]
    fn test_resilience_rewards_recovery() {
        // One high task done two days late, one still open but not yet overdue.
        let tasks = vec![
            done_task(1, "work", Priority::High, 3, 5),
            task(2, "work", Priority::High, 8),
        ];
        // (1 + 0.5) / 2
        assert_eq!(score(&tasks).resilience, 75);
    }

    #[test]
    fn test_resilience_penalizes_overdue() {
        let tasks = vec![
            done_task(1, "work", Priority::High, 3, 3),
            task(2, "work", Priority::High, 4),
        ];
        // 1 / (2 + 0.5)
        assert_eq!(score(&tasks).resilience, 40);
    }

    #[test]
    fn test_resilience_capped_at_hundred() {
        let tasks = vec![done_task(1, "work", Priority::High, 2, 6)];
        assert_eq!(score(&tasks).resilience, 100);
    }

    #[test]
    fn test_activity_caps_at_baseline() {
        let tasks: Vec<TaskRecord> = (1..=20)
            .map(|id| done_task(id, "life", Priority::Low, 4, 4))
            .collect();
        assert_eq!(score(&tasks).activity, 100);

        let three: Vec<TaskRecord> = tasks.into_iter().take(3).collect();
        assert_eq!(score(&three).activity, 20);
    }

    #[test]
    fn test_balance_even_spread_scores_full() {
        let tasks = vec![
            done_task(1, "work", Priority::Low, 2, 2),
            done_task(2, "study", Priority::Low, 2, 2),
            done_task(3, "life", Priority::Low, 2, 2),
            done_task(4, "fitness", Priority::Low, 2, 2),
            done_task(5, "errands", Priority::Low, 2, 2),
        ];
        let s = score(&tasks);
        assert_eq!(s.balance, 100);
        assert_eq!(s.focus, 20);
    }

    #[test]
    fn test_focus_ignores_other_bucket() {
        let tasks = vec![
            done_task(1, "errands", Priority::Low, 2, 2),
            done_task(2, "errands", Priority::Low, 3, 3),
        ];
        let s = score(&tasks);
        assert_eq!(s.focus, 0);
        assert_eq!(s.balance, 0);
    }

    #[test]
    fn test_no_completions_zeroes_completion_axes() {
        let tasks = vec![
            task(1, "work", Priority::Low, 8),
            task(2, "life", Priority::Low, 8),
        ];
        let s = score(&tasks);
        assert_eq!(s.execution, 0);
        assert_eq!(s.focus, 0);
        assert_eq!(s.balance, 0);
        assert_eq!(s.activity, 0);
        assert_eq!(s.total_score, 0);
    }
}
