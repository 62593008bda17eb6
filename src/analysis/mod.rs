//! Weekly analysis engine.
//!
//! Turns a snapshot of task records and a calendar-date window into a
//! `WeeklyReport`: five axis scores, a title, keyword tags, and a summary.
//!
//! The engine is pure and total. It performs no I/O, holds no state between
//! calls, and maps every degenerate input (no tasks, inverted window, missing
//! timestamps) to defined fallback values instead of failing. Callers that want
//! to keep a UI thread free can run it anywhere; results for different windows
//! never interact.

mod keywords;
mod scoring;
mod summary;
mod title;

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Priority, TaskRecord};
use crate::util::local_date;

pub use scoring::{ACTIVITY_BASELINE, OVERDUE_WEIGHT, RECOVERY_WEIGHT};
pub use summary::EMPTY_WEEK_SUMMARY;
pub use title::{DEFAULT_TITLE, EMPTY_WEEK_TITLE};

/// Maximum number of keywords attached to a report.
pub const MAX_KEYWORDS: usize = 5;

/// Five axis scores in [0, 100] and their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScore {
    pub execution: u32,
    pub focus: u32,
    pub balance: u32,
    pub resilience: u32,
    pub activity: u32,
    /// Plain sum of the five axes, 0..=500.
    pub total_score: u32,
}

/// A tag shown as a chip, with a description that stands on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub tag: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub title: String,
    pub score: WeeklyScore,
    pub keywords: Vec<Keyword>,
    pub summary: String,
}

/// Analyze `[window_start, window_end]` with timestamps read in the system zone.
pub fn analyze(
    all_tasks: &[TaskRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> WeeklyReport {
    analyze_in(all_tasks, window_start, window_end, &Local)
}

/// Analyze `[window_start, window_end]` with timestamps read in `tz`.
pub fn analyze_in<Tz: TimeZone>(
    all_tasks: &[TaskRecord],
    window_start: NaiveDate,
    window_end: NaiveDate,
    tz: &Tz,
) -> WeeklyReport {
    let week = WeekSnapshot::collect(all_tasks, window_start, window_end, tz);

    let score = scoring::score_week(&week);
    let title = title::select_title(&week, &score);
    let keywords = keywords::extract_keywords(&week);
    let summary = summary::compose_summary(&week, &score, title, &keywords);

    log::debug!(
        "Weekly report {}..{}: {} tasks, {} done, total {}",
        window_start,
        window_end,
        week.tasks.len(),
        week.completed_count(),
        score.total_score
    );

    WeeklyReport {
        title: title.to_string(),
        score,
        keywords,
        summary,
    }
}

/// A record that fell inside the window, with its local dates resolved once.
#[derive(Debug, Clone)]
pub(crate) struct WindowTask {
    pub category: Category,
    pub priority: Priority,
    pub done: bool,
    pub due: Option<NaiveDate>,
    /// Only set for done tasks that carry a completion timestamp.
    pub completed: Option<NaiveDate>,
    pub from_inspiration: bool,
}

impl WindowTask {
    /// Done, and finished on a later calendar day than it was due.
    pub fn is_recovered(&self) -> bool {
        match (self.due, self.completed) {
            (Some(due), Some(completed)) => self.done && completed > due,
            _ => false,
        }
    }

    /// Still open with a due date before the end of the window.
    pub fn is_overdue(&self, window_end: NaiveDate) -> bool {
        !self.done && self.due.is_some_and(|due| due < window_end)
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}

/// Completion counts per bucket: the four standard categories, then "other".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CategoryCounts {
    pub buckets: [usize; 5],
}

impl CategoryCounts {
    const OTHER: usize = 4;

    fn bucket(category: Category) -> usize {
        Category::STANDARD
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Self::OTHER)
    }

    pub fn add(&mut self, category: Category) {
        self.buckets[Self::bucket(category)] += 1;
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// Standard category with the most completions. Ties go to the earlier
    /// category in `Category::STANDARD`; `None` when no standard category has any.
    pub fn dominant_standard(&self) -> Option<(Category, usize)> {
        let mut best: Option<(Category, usize)> = None;
        for (idx, category) in Category::STANDARD.iter().enumerate() {
            let count = self.buckets[idx];
            if count > best.map_or(0, |(_, n)| n) {
                best = Some((*category, count));
            }
        }
        best
    }
}

/// The filtered view of one window that every scoring step reads from.
#[derive(Debug, Clone)]
pub(crate) struct WeekSnapshot {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub tasks: Vec<WindowTask>,
}

impl WeekSnapshot {
    /// Select non-idea records whose anchor date (due date, else completion
    /// date) lies inside the window. Records with neither are skipped.
    pub fn collect<Tz: TimeZone>(
        all_tasks: &[TaskRecord],
        window_start: NaiveDate,
        window_end: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let tasks = all_tasks
            .iter()
            .filter(|task| !task.is_idea())
            .filter_map(|task| {
                let due = task.due_at.and_then(|ms| local_date(ms, tz));
                let completed = if task.done {
                    task.completed_at.and_then(|ms| local_date(ms, tz))
                } else {
                    None
                };
                let anchor = due.or(completed)?;
                if anchor < window_start || anchor > window_end {
                    return None;
                }
                Some(WindowTask {
                    category: task.category_kind(),
                    priority: task.priority,
                    done: task.done,
                    due,
                    completed,
                    from_inspiration: task.from_inspiration,
                })
            })
            .collect();

        WeekSnapshot {
            window_start,
            window_end,
            tasks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed(&self) -> impl Iterator<Item = &WindowTask> {
        self.tasks.iter().filter(|t| t.done)
    }

    pub fn completed_count(&self) -> usize {
        self.completed().count()
    }

    pub fn completed_by_category(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for task in self.completed() {
            counts.add(task.category);
        }
        counts
    }

    pub fn high_priority(&self) -> impl Iterator<Item = &WindowTask> {
        self.tasks.iter().filter(|t| t.is_high_priority())
    }

    pub fn recovered_high_count(&self) -> usize {
        self.high_priority().filter(|t| t.is_recovered()).count()
    }

    pub fn overdue_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.is_overdue(self.window_end))
            .count()
    }
}


#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::test_support::*;
    use super::*;

    #[test]
    fn test_empty_input_yields_degenerate_report() {
        let (start, end) = window();
        let report = analyze_in(&[], start, end, &Utc);

        assert_eq!(report.score, WeeklyScore::default());
        assert_eq!(report.title, EMPTY_WEEK_TITLE);
        assert!(report.keywords.is_empty());
        assert_eq!(report.summary, EMPTY_WEEK_SUMMARY);
        assert!(!report.summary.is_empty());
    }

    #[test]
    fn test_mixed_week_scores() {
        let (start, end) = window();
        let report = analyze_in(&mixed_week(), start, end, &Utc);

        // 7 of 10 done.
        assert_eq!(report.score.execution, 70);
        // work holds 3 of 7 completions.
        assert_eq!(report.score.focus, 43);
        // shares 3/7, 2/7, 1/7, 1/7, 0 -> 1 - (15/49 - 0.2) / 0.8
        assert_eq!(report.score.balance, 87);
        // 2 of 3 high-priority tasks done, none overdue or recovered.
        assert_eq!(report.score.resilience, 67);
        // 7 / 15
        assert_eq!(report.score.activity, 47);
        assert_eq!(report.score.total_score, 70 + 43 + 87 + 67 + 47);
        assert_eq!(report.title, "All-Rounder");
        assert!(report.keywords.is_empty());
        assert!(report.summary.contains("10 tasks"));
    }

    #[test]
    fn test_single_category_week_maximizes_focus_and_minimizes_balance() {
        let (start, end) = window();
        let tasks: Vec<TaskRecord> = (1..=10)
            .map(|id| done_task(id, "study", Priority::Medium, 3, 3))
            .collect();
        let report = analyze_in(&tasks, start, end, &Utc);

        assert_eq!(report.score.focus, 100);
        assert_eq!(report.score.balance, 0);
        assert_eq!(report.score.execution, 100);
    }

    #[test]
    fn test_window_end_is_inclusive() {
        let (start, end) = window();
        let on_end = task(1, "work", Priority::Medium, 8);
        let past_end = task(2, "work", Priority::Medium, 9);

        let snapshot = WeekSnapshot::collect(&[on_end, past_end], start, end, &Utc);
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].due, Some(date(2026, 3, 8)));
    }

    #[test]
    fn test_window_uses_local_calendar_date() {
        let (start, end) = window();
        // 2026-03-08T20:00Z is already Monday the 9th in Shanghai.
        let mut late = task(1, "work", Priority::Medium, 8);
        late.due_at = Some(at(2026, 3, 8, 20));

        assert_eq!(
            WeekSnapshot::collect(&[late.clone()], start, end, &Utc)
                .tasks
                .len(),
            1
        );
        assert_eq!(
            WeekSnapshot::collect(&[late], start, end, &chrono_tz::Asia::Shanghai)
                .tasks
                .len(),
            0
        );
    }

    #[test]
    fn test_ideas_and_undated_tasks_are_excluded() {
        let (start, end) = window();
        let idea = task(1, "灵感", Priority::High, 3);
        let undated = TaskRecord::new("someday", "work");
        let completed_only = TaskRecord {
            done: true,
            completed_at: Some(at(2026, 3, 4, 9)),
            ..TaskRecord::new("unplanned win", "life")
        };

        let snapshot =
            WeekSnapshot::collect(&[idea, undated, completed_only], start, end, &Utc);
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].category, Category::Life);
    }

    #[test]
    fn test_done_without_completion_timestamp_is_tolerated() {
        let (start, end) = window();
        let mut sloppy = task(1, "work", Priority::High, 3);
        sloppy.done = true;

        let report = analyze_in(&[sloppy], start, end, &Utc);
        assert_eq!(report.score.execution, 100);
        assert_eq!(report.score.resilience, 100);
        assert!(report.keywords.iter().all(|k| k.tag != "Comeback"));
    }

    #[test]
    fn test_disjoint_window_matches_empty_input() {
        let tasks = mixed_week();
        let later = analyze_in(&tasks, date(2026, 4, 6), date(2026, 4, 12), &Utc);
        let empty = analyze_in(&[], date(2026, 4, 6), date(2026, 4, 12), &Utc);
        assert_eq!(later, empty);
    }

    #[test]
    fn test_inverted_window_selects_nothing() {
        let (start, end) = window();
        let report = analyze_in(&mixed_week(), end, start, &Utc);
        assert_eq!(report.title, EMPTY_WEEK_TITLE);
        assert_eq!(report.score.total_score, 0);
    }

    #[test]
    fn test_single_day_window() {
        let day = date(2026, 3, 4);
        let report = analyze_in(&mixed_week(), day, day, &Utc);
        // tasks 3 and 4, both done
        assert_eq!(report.score.execution, 100);
        assert!(report.summary.contains("2 tasks"));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let (start, end) = window();
        let tasks = mixed_week();
        assert_eq!(
            analyze_in(&tasks, start, end, &Utc),
            analyze_in(&tasks, start, end, &Utc)
        );
        assert_eq!(analyze(&tasks, start, end), analyze(&tasks, start, end));
    }

    #[test]
    fn test_dominant_standard_tie_prefers_earlier_category() {
        let mut counts = CategoryCounts::default();
        counts.add(Category::Life);
        counts.add(Category::Study);
        counts.add(Category::Other);
        counts.add(Category::Other);
        assert_eq!(counts.dominant_standard(), Some((Category::Study, 1)));
        assert_eq!(counts.total(), 4);
        assert_eq!(CategoryCounts::default().dominant_standard(), None);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let (start, end) = window();
        let report = analyze_in(&mixed_week(), start, end, &Utc);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["score"]["totalScore"], report.score.total_score);
        assert!(json["keywords"].is_array());
    }
}
