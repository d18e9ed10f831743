use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse strategies tried in order; the first one that yields a valid
/// point in time wins. Sheet cells are user-entered, so every failure
/// path falls through to `None` rather than erroring.
const STRATEGIES: &[fn(&str, &str) -> Option<NaiveDateTime>] =
    &[parse_composite, parse_delimited];

/// Formats accepted by the composite parse of `"<date> <time>"`.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only formats, used when the time text is empty (implied midnight).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Resolve a `(date, time)` cell pair into a local wall-clock datetime.
///
/// Empty date text is unresolvable; empty time text means midnight.
/// Returns `None` for anything that cannot be read as a real calendar
/// point; an unresolved timestamp is a data state, not an error.
pub fn resolve(date_text: &str, time_text: &str) -> Option<NaiveDateTime> {
    let date_text = date_text.trim();
    if date_text.is_empty() {
        return None;
    }
    let time_text = time_text.trim();
    STRATEGIES
        .iter()
        .find_map(|parse| parse(date_text, time_text))
}

/// Try the joined `"<date> <time>"` string against the fixed format list.
fn parse_composite(date_text: &str, time_text: &str) -> Option<NaiveDateTime> {
    let combined = format!("{date_text} {time_text}");
    let combined = combined.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(combined, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(combined, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Fallback for `dd/MM/yyyy` or `dd-MM-yyyy` dates as stored in the sheet.
///
/// The separator is `/` when present, else `-`; the split must yield
/// exactly day, month, year in that order. Clock components that fail to
/// parse default to 0, but an impossible calendar date is unresolvable.
fn parse_delimited(date_text: &str, time_text: &str) -> Option<NaiveDateTime> {
    let sep = if date_text.contains('/') {
        '/'
    } else if date_text.contains('-') {
        '-'
    } else {
        return None;
    };
    let parts: Vec<&str> = date_text.split(sep).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    let (hour, minute, second) = split_clock(time_text);
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Split `"hh:mm:ss"` into up to three numeric components, defaulting
/// each unparseable or missing component to 0.
fn split_clock(time_text: &str) -> (u32, u32, u32) {
    let mut parts = time_text
        .split(':')
        .map(|p| p.trim().parse::<u32>().unwrap_or(0));
    let hour = parts.next().unwrap_or(0);
    let minute = parts.next().unwrap_or(0);
    let second = parts.next().unwrap_or(0);
    (hour, minute, second)
}
