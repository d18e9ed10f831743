// src/fetch/mod.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::process::Grid;

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Which sheet range to read, and the key authorizing the read.
#[derive(Debug, Clone)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    /// A1-notation range, e.g. `Users!A:Z`.
    pub range: String,
    pub api_key: String,
}

/// Shape of the values API response. `values` is omitted entirely when
/// the range is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

/// Read the target range as a 2-D grid of cell text.
///
/// Any transport or decode fault comes back as a single opaque error;
/// the caller decides how to surface it.
pub async fn fetch_grid(client: &Client, target: &SheetTarget) -> Result<Grid> {
    let url = values_url(target);
    let range: ValueRange = client
        .get(url)
        .send()
        .await
        .context("sheet values request failed")?
        .error_for_status()
        .context("sheet values request was rejected")?
        .json()
        .await
        .context("sheet values response was not valid JSON")?;
    Ok(range.values)
}

/// Build the values-read URL. The id and range go in as path segments
/// so unsafe characters are percent-encoded; the `!` in A1 ranges is a
/// legal path character and passes through intact.
fn values_url(target: &SheetTarget) -> Url {
    let mut url = Url::parse(SHEETS_ENDPOINT).expect("sheets endpoint URL should be valid");
    url.path_segments_mut()
        .expect("https URL can be a base")
        .push(&target.spreadsheet_id)
        .push("values")
        .push(&target.range);
    url.query_pairs_mut().append_pair("key", &target.api_key);
    url
}
