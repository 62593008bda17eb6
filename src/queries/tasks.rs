//! Task list queries backing the daily list, the inspiration board, the
//! stats archive and charts, calendar markers, and the home-screen widget.
//!
//! All functions take the full task snapshot and return owned results;
//! none of them touch storage.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::types::{Category, TaskRecord};
use crate::util::local_date;

/// Active search box state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub active: bool,
    pub text: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        SearchQuery {
            active: true,
            text: text.into(),
        }
    }

    /// Search only applies while the box is open and holds non-blank text.
    fn needle(&self) -> Option<String> {
        let trimmed = self.text.trim();
        if self.active && !trimmed.is_empty() {
            Some(trimmed.to_lowercase())
        } else {
            None
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Tasks for the day list: non-idea tasks due on `date`, or every non-idea
/// task matching title, body or category while a search is active.
pub fn daily_tasks<Tz: TimeZone>(
    tasks: &[TaskRecord],
    date: NaiveDate,
    search: &SearchQuery,
    tz: &Tz,
) -> Vec<TaskRecord> {
    let non_ideas = tasks.iter().filter(|t| !t.is_idea());

    if let Some(needle) = search.needle() {
        return non_ideas
            .filter(|t| {
                contains_ci(&t.title, &needle)
                    || contains_ci(&t.body, &needle)
                    || contains_ci(&t.category, &needle)
            })
            .cloned()
            .collect();
    }

    non_ideas
        .filter(|t| t.due_at.and_then(|ms| local_date(ms, tz)) == Some(date))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspirationFilter {
    #[default]
    All,
    /// Not yet incubated.
    Pending,
    /// Already promoted into a task.
    Hatched,
}

/// Idea-category records, pending ones first, newest first within each group.
pub fn inspirations(
    tasks: &[TaskRecord],
    search: &SearchQuery,
    filter: InspirationFilter,
) -> Vec<TaskRecord> {
    let needle = search.needle();
    let mut ideas: Vec<TaskRecord> = tasks
        .iter()
        .filter(|t| t.is_idea())
        .filter(|t| match &needle {
            Some(n) => contains_ci(&t.title, n) || contains_ci(&t.body, n),
            None => true,
        })
        .filter(|t| match filter {
            InspirationFilter::All => true,
            InspirationFilter::Pending => !t.incubated,
            InspirationFilter::Hatched => t.incubated,
        })
        .cloned()
        .collect();
    ideas.sort_by(|a, b| a.incubated.cmp(&b.incubated).then(b.id.cmp(&a.id)));
    ideas
}

/// Pick one not-yet-incubated idea at random, for the "surprise me" button.
pub fn random_pending_idea<'a, R: rand::Rng + ?Sized>(
    tasks: &'a [TaskRecord],
    rng: &mut R,
) -> Option<&'a TaskRecord> {
    let pending: Vec<&TaskRecord> = tasks
        .iter()
        .filter(|t| t.is_idea() && !t.incubated)
        .collect();
    pending.choose(rng).copied()
}

/// Category selector on the stats archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsCategory {
    /// Every non-idea task.
    All,
    /// Non-idea tasks outside the standard categories.
    Other,
    /// One standard category.
    Only(Category),
}

impl StatsCategory {
    fn matches(&self, task: &TaskRecord) -> bool {
        let kind = task.category_kind();
        if kind == Category::Idea {
            return false;
        }
        match self {
            StatsCategory::All => true,
            StatsCategory::Other => !kind.is_standard(),
            StatsCategory::Only(category) => kind == *category,
        }
    }
}

/// Inclusive due-date range in epoch millis. Applies only when both ends are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl DueRange {
    fn matches(&self, task: &TaskRecord) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                task.due_at.is_some_and(|due| due >= start && due <= end)
            }
            _ => true,
        }
    }
}

/// Completed or open tasks for the stats archive, latest due date first.
/// Tasks without a due date sort last.
pub fn stats_tasks(
    tasks: &[TaskRecord],
    category: StatsCategory,
    done: bool,
    range: DueRange,
) -> Vec<TaskRecord> {
    let mut out: Vec<TaskRecord> = tasks
        .iter()
        .filter(|t| t.done == done && category.matches(t) && range.matches(t))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.due_at.cmp(&a.due_at));
    out
}

/// Calendar marker for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTaskStatus {
    pub has_incomplete: bool,
    pub has_completed: bool,
}

/// Per-day markers for every date that has a non-idea task due.
pub fn day_status_map<Tz: TimeZone>(
    tasks: &[TaskRecord],
    tz: &Tz,
) -> BTreeMap<NaiveDate, DayTaskStatus> {
    let mut map: BTreeMap<NaiveDate, DayTaskStatus> = BTreeMap::new();
    for task in tasks.iter().filter(|t| !t.is_idea()) {
        let Some(day) = task.due_at.and_then(|ms| local_date(ms, tz)) else {
            continue;
        };
        let status = map.entry(day).or_default();
        if task.done {
            status.has_completed = true;
        } else {
            status.has_incomplete = true;
        }
    }
    map
}

/// Completed non-idea tasks per day, keyed by completion date (due date when
/// the completion timestamp is missing).
pub fn completion_heatmap<Tz: TimeZone>(
    tasks: &[TaskRecord],
    tz: &Tz,
) -> BTreeMap<NaiveDate, usize> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for task in tasks.iter().filter(|t| t.done && !t.is_idea()) {
        let Some(day) = task
            .completed_at
            .or(task.due_at)
            .and_then(|ms| local_date(ms, tz))
        else {
            continue;
        };
        *counts.entry(day).or_insert(0) += 1;
    }
    counts
}

/// Completed non-idea tasks per weekday, Monday first, for the week starting
/// at `week_start`. Tasks are placed by due date, falling back to the
/// completion date for undated tasks.
pub fn workload_trend<Tz: TimeZone>(
    tasks: &[TaskRecord],
    week_start: NaiveDate,
    tz: &Tz,
) -> [usize; 7] {
    let mut days = [0usize; 7];
    for task in tasks.iter().filter(|t| t.done && !t.is_idea()) {
        let Some(day) = task
            .due_at
            .or(task.completed_at)
            .and_then(|ms| local_date(ms, tz))
        else {
            continue;
        };
        let offset = (day - week_start).num_days();
        if (0..7).contains(&offset) {
            days[offset as usize] += 1;
        }
    }
    days
}

/// Counts shown by the home-screen widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayCounts {
    pub done: usize,
    pub remaining: usize,
}

pub fn today_counts<Tz: TimeZone>(
    tasks: &[TaskRecord],
    today: NaiveDate,
    tz: &Tz,
) -> TodayCounts {
    daily_tasks(tasks, today, &SearchQuery::default(), tz)
        .iter()
        .fold(TodayCounts::default(), |mut acc, t| {
            if t.done {
                acc.done += 1;
            } else {
                acc.remaining += 1;
            }
            acc
        })
}
