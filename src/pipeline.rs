use std::future::Future;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::PipelineError;
use crate::process::{
    self,
    filter::{filter_records, Period},
    Grid, Sheet,
};

/// Fetch the grid, normalize it, filter by period, and sort the result
/// newest-first.
///
/// `fetch_grid` is the external transport, supplied by the caller and
/// awaited exactly once; any fault it reports surfaces as
/// [`PipelineError::FetchFailed`] with no retry and no partial result.
/// `now` is an explicit input so identical inputs always produce the
/// identical ordered output.
///
/// The sort is stable and descending by derived timestamp; records with
/// an unresolved timestamp order below every resolved one and therefore
/// sink to the end.
pub async fn run<F, Fut>(
    fetch_grid: F,
    period: Period,
    now: NaiveDateTime,
) -> Result<Sheet, PipelineError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Grid>>,
{
    let grid = fetch_grid().await.map_err(PipelineError::FetchFailed)?;

    let Sheet { headers, records } = process::normalize(&grid);
    debug!(rows = records.len(), ?period, "normalized sheet");

    let mut records = filter_records(records, period, now);
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(Sheet { headers, records })
}
