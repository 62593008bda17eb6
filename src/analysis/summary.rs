//! Template summary for a weekly report.

use super::{Keyword, WeekSnapshot, WeeklyScore};
use crate::util::pluralize;

pub const EMPTY_WEEK_SUMMARY: &str =
    "No activity this week. Add a few tasks and check back next week.";

pub(crate) fn compose_summary(
    week: &WeekSnapshot,
    score: &WeeklyScore,
    title: &str,
    keywords: &[Keyword],
) -> String {
    if week.is_empty() {
        return EMPTY_WEEK_SUMMARY.to_string();
    }

    let mut summary = format!(
        "This week you planned {} and completed {} ({}%).",
        pluralize(week.tasks.len(), "task", "tasks"),
        week.completed_count(),
        score.execution
    );

    match week.completed_by_category().dominant_standard() {
        Some((category, count)) => summary.push_str(&format!(
            " Most of your finished work was {} ({}).",
            category.as_str(),
            pluralize(count, "task", "tasks")
        )),
        None => summary.push_str(" No single category stood out."),
    }

    if let Some(top) = keywords.first() {
        summary.push_str(&format!(" Highlight: {}. {}", top.tag, top.description));
    }

    summary.push_str(&format!(" This week's title: {}.", title));
    summary
}
