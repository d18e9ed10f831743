// src/process/mod.rs
use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub mod date_parser;
pub mod filter;

/// The raw 2-D array of cell text as read from the sheet; row 0 is the
/// header row.
pub type Grid = Vec<Vec<String>>;

/// Header labels recognized as the date column, exact-match phase.
/// The sheet's headers are not standardized and show up in Arabic or
/// English, so both label sets are checked.
const DATE_LABELS: &[&str] = &["التاريخ", "Date", "date"];
const TIME_LABELS: &[&str] = &["الوقت", "Time", "time"];

/// Substring fallbacks when no header matches exactly.
const DATE_FRAGMENT: &str = "تاريخ";
const TIME_FRAGMENT: &str = "وقت";

/// JSON member carrying the derived timestamp on every serialized record.
pub const TIMESTAMP_FIELD: &str = "_timestamp";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One normalized data row: the header-driven field mapping plus the
/// timestamp derived from its date/time cells. Field order is header
/// order and survives serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
    pub timestamp: Option<NaiveDateTime>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>, timestamp: Option<NaiveDateTime>) -> Self {
        Self { fields, timestamp }
    }

    /// Cell value for a field name, if the column exists.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        match self.timestamp {
            Some(ts) => {
                map.serialize_entry(TIMESTAMP_FIELD, &ts.format(TIMESTAMP_FORMAT).to_string())?
            }
            None => map.serialize_entry(TIMESTAMP_FIELD, &None::<String>)?,
        }
        map.end()
    }
}

/// A normalized sheet: the trimmed header labels and one record per data
/// row, in sheet order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Normalize a raw grid into headers plus generic records.
///
/// Every data row produces exactly one record with one field per header
/// column; rows shorter than the header are padded with empty text, and
/// empty header cells get the positional name `col<i>` so each column
/// stays addressable. An empty grid normalizes to an empty sheet.
pub fn normalize(grid: &Grid) -> Sheet {
    let Some((header_row, data_rows)) = grid.split_first() else {
        return Sheet::default();
    };

    let headers: Vec<String> = header_row.iter().map(|h| h.trim().to_string()).collect();

    // Column discovery runs once over the headers and is reused for
    // every row.
    let date_col = find_column(&headers, DATE_LABELS, DATE_FRAGMENT);
    let time_col = find_column(&headers, TIME_LABELS, TIME_FRAGMENT);

    let records = data_rows
        .iter()
        .map(|row| {
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let name = if header.is_empty() {
                        format!("col{i}")
                    } else {
                        header.clone()
                    };
                    let value = row.get(i).cloned().unwrap_or_default();
                    (name, value)
                })
                .collect();

            let cell = |col: Option<usize>| {
                col.and_then(|i| row.get(i)).map_or("", String::as_str)
            };
            let timestamp = date_parser::resolve(cell(date_col), cell(time_col));

            Record { fields, timestamp }
        })
        .collect();

    Sheet { headers, records }
}

/// Two-phase column lookup: first header equal to one of the known
/// labels, else first header containing the fragment. The left-to-right
/// scan order decides ties, so it is part of the contract.
fn find_column(headers: &[String], labels: &[&str], fragment: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| labels.contains(&h.as_str()))
        .or_else(|| headers.iter().position(|h| h.contains(fragment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_grid_normalizes_to_empty_sheet() {
        let sheet = normalize(&Vec::new());
        assert!(sheet.headers.is_empty());
        assert!(sheet.records.is_empty());
    }

    #[test]
    fn one_record_per_data_row() {
        let g = grid(&[
            &["Date", "Name"],
            &["15/03/2024", "Ali"],
            &["16/03/2024", "Sara"],
            &["", ""],
        ]);
        let sheet = normalize(&g);
        assert_eq!(sheet.records.len(), g.len() - 1);
    }

    #[test]
    fn headers_are_trimmed_and_field_names_follow_headers() {
        let g = grid(&[&["  Name ", "Age"], &["Ali", "30"]]);
        let sheet = normalize(&g);
        assert_eq!(sheet.headers, vec!["Name", "Age"]);
        assert_eq!(sheet.records[0].get("Name"), Some("Ali"));
        assert_eq!(sheet.records[0].get("Age"), Some("30"));
    }

    #[test]
    fn empty_headers_get_positional_names() {
        let g = grid(&[&["Name", "", "City"], &["Ali", "x", "Riyadh"]]);
        let sheet = normalize(&g);
        assert_eq!(sheet.records[0].get("col1"), Some("x"));
        assert_eq!(sheet.records[0].get("City"), Some("Riyadh"));
    }

    #[test]
    fn short_rows_are_padded_with_empty_text() {
        let g = grid(&[&["Name", "Age", "City"], &["Ali"]]);
        let sheet = normalize(&g);
        let record = &sheet.records[0];
        assert_eq!(record.fields().len(), 3);
        assert_eq!(record.get("Age"), Some(""));
        assert_eq!(record.get("City"), Some(""));
    }

    #[test]
    fn long_rows_keep_only_header_columns() {
        let g = grid(&[&["Name"], &["Ali", "extra"]]);
        let sheet = normalize(&g);
        assert_eq!(sheet.records[0].fields().len(), 1);
        assert_eq!(sheet.records[0].get("Name"), Some("Ali"));
    }

    #[test]
    fn timestamp_from_english_date_and_time_headers() {
        let g = grid(&[&["Date", "Time", "Name"], &["15/03/2024", "9:30", "Ali"]]);
        let sheet = normalize(&g);
        assert_eq!(
            sheet.records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
        );
    }

    #[test]
    fn timestamp_from_arabic_headers() {
        let g = grid(&[
            &["الاسم", "التاريخ", "الوقت"],
            &["Ali", "15/03/2024", "10:00"],
        ]);
        let sheet = normalize(&g);
        assert_eq!(
            sheet.records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
        );
    }

    #[test]
    fn fragment_match_finds_composite_arabic_header() {
        // No exact label, but the header contains the date fragment.
        let g = grid(&[&["تاريخ التسجيل", "Name"], &["15/03/2024", "Ali"]]);
        let sheet = normalize(&g);
        assert_eq!(
            sheet.records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn exact_label_wins_over_earlier_fragment_header() {
        // "تاريخ الميلاد" appears first but only matches by fragment;
        // the exact "Date" header further right must win.
        let g = grid(&[
            &["تاريخ الميلاد", "Date", "Name"],
            &["01/01/1990", "15/03/2024", "Ali"],
        ]);
        let sheet = normalize(&g);
        assert_eq!(
            sheet.records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn no_date_header_means_unresolved() {
        let g = grid(&[&["Name", "Age"], &["Ali", "30"]]);
        let sheet = normalize(&g);
        assert_eq!(sheet.records[0].timestamp, None);
    }

    #[test]
    fn record_serializes_fields_in_header_order_with_timestamp() {
        let g = grid(&[&["Name", "Date"], &["Ali", "15/03/2024"]]);
        let sheet = normalize(&g);
        let json = serde_json::to_string(&sheet.records[0]).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"Ali","Date":"15/03/2024","_timestamp":"2024-03-15T00:00:00"}"#
        );
    }

    #[test]
    fn unresolved_timestamp_serializes_as_null() {
        let g = grid(&[&["Name"], &["Ali"]]);
        let sheet = normalize(&g);
        let json = serde_json::to_string(&sheet.records[0]).unwrap();
        assert_eq!(json, r#"{"Name":"Ali","_timestamp":null}"#);
    }
}
