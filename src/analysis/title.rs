//! Title selection.
//!
//! Rules are checked top to bottom and the first match wins. The last rule
//! always matches, so every score profile gets exactly one title.

use super::{WeekSnapshot, WeeklyScore};

pub const EMPTY_WEEK_TITLE: &str = "Quiet Week";
/// Title of the catch-all last rule.
pub const DEFAULT_TITLE: &str = "Steady Climber";

struct TitleRule {
    title: &'static str,
    matches: fn(&WeekSnapshot, &WeeklyScore) -> bool,
}

const TITLE_RULES: &[TitleRule] = &[
    TitleRule {
        title: EMPTY_WEEK_TITLE,
        matches: |week, _| week.is_empty(),
    },
    TitleRule {
        title: "Peak Performer",
        matches: |_, s| s.total_score >= 400,
    },
    TitleRule {
        title: "Comeback Fighter",
        matches: |week, s| s.resilience >= 80 && week.recovered_high_count() > 0,
    },
    TitleRule {
        title: "Efficient Executor",
        matches: |_, s| s.execution >= 80,
    },
    TitleRule {
        title: "Deep Diver",
        matches: |_, s| s.focus >= 80 && s.execution >= 50,
    },
    TitleRule {
        title: "All-Rounder",
        matches: |_, s| s.balance >= 70 && s.execution >= 50,
    },
    TitleRule {
        title: "Freestyle Brawler",
        matches: |_, s| s.execution < 50 && s.activity >= 60,
    },
    TitleRule {
        title: "Slow Starter",
        matches: |_, s| s.execution < 30,
    },
    TitleRule {
        title: DEFAULT_TITLE,
        matches: |_, _| true,
    },
];

pub(crate) fn select_title(week: &WeekSnapshot, score: &WeeklyScore) -> &'static str {
    TITLE_RULES
        .iter()
        .find(|rule| (rule.matches)(week, score))
        .map_or(DEFAULT_TITLE, |rule| rule.title)
}
