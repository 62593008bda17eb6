use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert epoch milliseconds to a UTC instant. `None` for out-of-range values.
pub fn instant_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Calendar date of an epoch-millis timestamp in `tz`.
///
/// Due dates are stored at arbitrary times of day, so anything that groups or
/// windows tasks by day must go through here rather than compare raw millis.
pub fn local_date<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<NaiveDate> {
    instant_from_millis(millis).map(|utc| utc.with_timezone(tz).date_naive())
}

/// English noun with a naive plural, for generated report text.
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_respects_timezone() {
        // 2026-03-01T20:00:00Z is already March 2nd in Shanghai.
        let millis = Utc
            .with_ymd_and_hms(2026, 3, 1, 20, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            local_date(millis, &Utc),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(
            local_date(millis, &chrono_tz::Asia::Shanghai),
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
    }

    #[test]
    fn test_local_date_out_of_range() {
        assert_eq!(local_date(i64::MAX, &Utc), None);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "task", "tasks"), "1 task");
        assert_eq!(pluralize(0, "task", "tasks"), "0 tasks");
        assert_eq!(pluralize(4, "task", "tasks"), "4 tasks");
    }
}
