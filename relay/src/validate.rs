use crate::errors::{Error, Result};
use crate::model::{CoordinateField, IngestPayload, NewReading};

/// Validates an ingest payload into a reading ready to store.
///
/// Presence is checked over `status`, `lat`, `lon` in that fixed order and the
/// first missing field is the one reported; coordinate conversion runs only
/// once all three are present.
pub fn validate(payload: &IngestPayload) -> Result<NewReading> {
    let status = payload
        .status
        .as_ref()
        .ok_or(Error::MissingField("status"))?;
    let lat = payload.lat.as_ref().ok_or(Error::MissingField("lat"))?;
    let lon = payload.lon.as_ref().ok_or(Error::MissingField("lon"))?;

    Ok(NewReading {
        status: status.clone(),
        lat: to_f64("lat", lat)?,
        lon: to_f64("lon", lon)?,
    })
}

/// Numbers pass through; strings are parsed the way the firmware sends them.
fn to_f64(field: &'static str, value: &CoordinateField) -> Result<f64> {
    match value {
        CoordinateField::Number(n) => Ok(*n),
        CoordinateField::Text(s) => s.trim().parse().map_err(|_| Error::InvalidCoordinate {
            field,
            value: s.clone(),
        }),
    }
}
