//! Keyword extraction.
//!
//! Each detector looks for one pattern in the window and produces at most one
//! keyword. Detectors run in a fixed order and the list is truncated to
//! `MAX_KEYWORDS`. A week with no notable pattern gets no keywords.

use super::{Keyword, WeekSnapshot, MAX_KEYWORDS};
use crate::util::pluralize;

/// Completions needed before a dominant category is worth calling out.
const DOMINANT_MIN_COMPLETIONS: usize = 3;
/// Share of completions a category needs to count as dominant.
const DOMINANT_MIN_SHARE: f64 = 0.5;
const HEAVY_LIFTER_MIN: usize = 3;
const BACKLOG_MIN: usize = 3;

type Detector = fn(&WeekSnapshot) -> Option<Keyword>;

const DETECTORS: &[Detector] = &[
    dominant_category,
    comeback,
    clean_sweep,
    heavy_lifter,
    idea_to_action,
    backlog_alert,
];

pub(crate) fn extract_keywords(week: &WeekSnapshot) -> Vec<Keyword> {
    DETECTORS
        .iter()
        .filter_map(|detect| detect(week))
        .take(MAX_KEYWORDS)
        .collect()
}

fn keyword(tag: impl Into<String>, description: impl Into<String>) -> Keyword {
    Keyword {
        tag: tag.into(),
        description: description.into(),
    }
}

fn dominant_category(week: &WeekSnapshot) -> Option<Keyword> {
    let counts = week.completed_by_category();
    let total = counts.total();
    if total < DOMINANT_MIN_COMPLETIONS {
        return None;
    }
    let (category, count) = counts.dominant_standard()?;
    if (count as f64) < DOMINANT_MIN_SHARE * total as f64 {
        return None;
    }
    Some(keyword(
        format!("{} Mode", category.label()),
        format!(
            "{} of your {} completed tasks this week were {}.",
            count,
            total,
            category.as_str()
        ),
    ))
}

fn comeback(week: &WeekSnapshot) -> Option<Keyword> {
    let recovered = week.recovered_high_count();
    if recovered == 0 {
        return None;
    }
    Some(keyword(
        "Comeback",
        format!(
            "Finished {} after the deadline had already passed.",
            pluralize(recovered, "high-priority task", "high-priority tasks")
        ),
    ))
}

fn clean_sweep(week: &WeekSnapshot) -> Option<Keyword> {
    if week.is_empty() || week.tasks.iter().any(|t| !t.done) {
        return None;
    }
    Some(keyword(
        "Clean Sweep",
        format!(
            "Every one of the {} planned this week got done.",
            pluralize(week.tasks.len(), "task", "tasks")
        ),
    ))
}

fn heavy_lifter(week: &WeekSnapshot) -> Option<Keyword> {
    let closed = week.high_priority().filter(|t| t.done).count();
    if closed < HEAVY_LIFTER_MIN {
        return None;
    }
    Some(keyword(
        "Heavy Lifter",
        format!("Closed out {} high-priority tasks this week.", closed),
    ))
}

fn idea_to_action(week: &WeekSnapshot) -> Option<Keyword> {
    let hatched = week.completed().filter(|t| t.from_inspiration).count();
    if hatched == 0 {
        return None;
    }
    Some(keyword(
        "Idea to Action",
        format!(
            "{} from your inspiration list turned into finished work.",
            pluralize(hatched, "idea", "ideas")
        ),
    ))
}

fn backlog_alert(week: &WeekSnapshot) -> Option<Keyword> {
    let overdue = week.overdue_count();
    if overdue < BACKLOG_MIN {
        return None;
    }
    Some(keyword(
        "Backlog Alert",
        format!(
            "{} slipped past their due date and are still open.",
            pluralize(overdue, "task", "tasks")
        ),
    ))
}
