//! Week windows for the weekly report.
//!
//! Weeks run Monday through Sunday. Labels number them the way the app's
//! week picker does, with week 1 being the week that contains January 1.
//! `WeeklyReportState` is the caller-side holder that recomputes the report
//! whenever the selected week or the task list changes.

use chrono::{Datelike, Days, Local, NaiveDate, TimeZone, Weekday};
use serde::Serialize;

use crate::analysis::{analyze_in, WeeklyReport};
use crate::types::TaskRecord;

/// Weeks listed by the history picker.
pub const DEFAULT_WEEK_OPTIONS: usize = 52;

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Inclusive `(monday, sunday)` window for the week starting at `start`.
pub fn week_window(start: NaiveDate) -> (NaiveDate, NaiveDate) {
    (start, start + Days::new(6))
}

/// Move `start` by whole weeks. Saturates at the calendar bounds.
pub fn shift_week(start: NaiveDate, offset: i64) -> NaiveDate {
    let days = Days::new(offset.unsigned_abs().saturating_mul(7));
    let shifted = if offset >= 0 {
        start.checked_add_days(days)
    } else {
        start.checked_sub_days(days)
    };
    shifted.unwrap_or(start)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekLabel {
    pub year: i32,
    pub week: u32,
}

/// Year and number of the week containing `day`.
///
/// Week 1 is the Monday-based week containing January 1, so a week spanning
/// New Year belongs to the new year. Around New Year this can differ from
/// ISO numbering: Monday 2026-12-28 is week 1 of 2027 here but ISO 2026-W53.
pub fn week_label(day: NaiveDate) -> WeekLabel {
    let start = week_start(day);
    let year = week_window(start).1.year();
    let week = NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|jan1| (start - week_start(jan1)).num_days() / 7 + 1)
        .unwrap_or(1);
    WeekLabel {
        year,
        week: week as u32,
    }
}

/// One row of the history picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOption {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: WeekLabel,
}

/// The `count` most recent weeks up to and including the week of `today`,
/// newest first.
pub fn week_options(today: NaiveDate, count: usize) -> Vec<WeekOption> {
    let mut current = week_start(today);
    let mut options = Vec::with_capacity(count);
    for _ in 0..count {
        let (start, end) = week_window(current);
        options.push(WeekOption {
            start,
            end,
            label: week_label(start),
        });
        let previous = shift_week(current, -1);
        if previous == current {
            break;
        }
        current = previous;
    }
    options
}

/// Selected report week plus the report computed for it.
///
/// The report is rebuilt explicitly on every week change or task refresh;
/// nothing is cached across calls.
#[derive(Debug, Clone)]
pub struct WeeklyReportState<Tz: TimeZone> {
    start: NaiveDate,
    tz: Tz,
    report: Option<WeeklyReport>,
}

impl WeeklyReportState<Local> {
    /// Start on the current local week.
    pub fn current() -> Self {
        Self::new(Local::now().date_naive(), Local)
    }
}

impl<Tz: TimeZone> WeeklyReportState<Tz> {
    pub fn new(any_day: NaiveDate, tz: Tz) -> Self {
        WeeklyReportState {
            start: week_start(any_day),
            tz,
            report: None,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        week_window(self.start)
    }

    pub fn label(&self) -> WeekLabel {
        week_label(self.start)
    }

    pub fn report(&self) -> Option<&WeeklyReport> {
        self.report.as_ref()
    }

    /// Recompute the report for the selected week.
    pub fn regenerate(&mut self, tasks: &[TaskRecord]) -> &WeeklyReport {
        let (start, end) = self.window();
        self.report.insert(analyze_in(tasks, start, end, &self.tz))
    }

    /// Jump to the week containing `date`.
    pub fn set_week(&mut self, date: NaiveDate, tasks: &[TaskRecord]) -> &WeeklyReport {
        self.start = week_start(date);
        self.regenerate(tasks)
    }

    /// Move by `offset` weeks (negative goes back).
    pub fn change_week(&mut self, offset: i64, tasks: &[TaskRecord]) -> &WeeklyReport {
        self.start = shift_week(self.start, offset);
        self.regenerate(tasks)
    }
}
