use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::Record;

/// Named relative time window used to narrow the record set for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Today,
    Last7Days,
    Last30Days,
}

impl Period {
    /// Parse the query-string value; anything unrecognized means `All`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "today" => Self::Today,
            "7days" => Self::Last7Days,
            "month" => Self::Last30Days,
            _ => Self::All,
        }
    }

    /// The absolute point below which records fall out of this window,
    /// computed from the caller's `now` (never an ambient clock read).
    ///
    /// `Last7Days`/`Last30Days` are fixed durations, not calendar-aligned;
    /// `Today` starts at local midnight of `now`'s day.
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::All => None,
            Self::Today => Some(now.date().and_time(NaiveTime::MIN)),
            Self::Last7Days => Some(now - Duration::hours(7 * 24)),
            Self::Last30Days => Some(now - Duration::hours(30 * 24)),
        }
    }
}

/// Keep the records at or after the period's cutoff, preserving order.
///
/// `All` is the identity. Whenever a cutoff applies, a record with an
/// unresolved timestamp is excluded; it can never be shown to satisfy
/// the cutoff.
pub fn filter_records(records: Vec<Record>, period: Period, now: NaiveDateTime) -> Vec<Record> {
    let Some(cutoff) = period.cutoff(now) else {
        return records;
    };
    records
        .into_iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= cutoff))
        .collect()
}
