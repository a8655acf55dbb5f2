use super::error::OsrmError;
use super::response::OsrmTableResponse;
use crate::error::TravelTimeError;
use crate::ranking::TravelTime;

/// Extract the single source row, one entry per destination.
pub(super) fn parse_table_response(
    resp: OsrmTableResponse,
    expected: usize,
) -> Result<Vec<TravelTime>, TravelTimeError> {
    if resp.code != "Ok" {
        return Err(OsrmError::Api {
            message: resp.message.unwrap_or_default(),
            code: resp.code,
        }
        .into());
    }

    let row = resp
        .durations
        .and_then(|rows| rows.into_iter().next())
        .ok_or(OsrmError::NoDurations)?;
    if row.len() != expected {
        return Err(TravelTimeError::LengthMismatch {
            expected,
            got: row.len(),
        });
    }

    Ok(row
        .into_iter()
        .map(|cell| cell.map_or(TravelTime::Unreachable, TravelTime::from_secs_f64))
        .collect())
}
