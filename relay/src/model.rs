use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single reading held by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub status: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            status: "normal".to_string(),
            lat: -6.2,
            lon: 106.8,
            timestamp: None,
        }
    }
}

/// A validated reading before the relay stamps it with a receive time
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub status: String,
    pub lat: f64,
    pub lon: f64,
}

/// Raw ingest payload. Every field is optional so that presence can be
/// reported per-field after the body itself has parsed.
#[derive(Debug, Deserialize)]
pub struct IngestPayload {
    pub api_key: Option<String>,
    pub status: Option<String>,
    pub lat: Option<CoordinateField>,
    pub lon: Option<CoordinateField>,
}

/// Device firmware sends coordinates either as JSON numbers or as numeric
/// strings ("-6.3"); both are accepted and converted during validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordinateField {
    Number(f64),
    Text(String),
}

/// Ingest acknowledgement
#[derive(Debug, Serialize)]
pub struct IngestAck {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Health probe response
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub latest_data: Reading,
}
