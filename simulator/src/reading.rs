use serde::Serialize;

/// Wire form of one pushed reading. Coordinates go out as strings because
/// that is what the device firmware sends.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingReport {
    pub api_key: String,
    pub status: String,
    pub lat: String,
    pub lon: String,
}
