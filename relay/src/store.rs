use crate::model::{NewReading, Reading};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared holder for the latest reading.
///
/// Handlers receive a clone; every clone points at the same slot. Readers take
/// the read lock and copy the value out, so a retrieval never observes a
/// half-replaced record. Writers take the write lock and swap the whole record
/// in one assignment; when two ingests race, the replace that finishes last is
/// what every later read sees.
#[derive(Debug, Clone)]
pub struct LatestReading {
    slot: Arc<RwLock<Reading>>,
}

impl LatestReading {
    /// Starts from the placeholder reading with a null timestamp.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(Reading::default())),
        }
    }

    /// Copy of the current reading.
    pub async fn snapshot(&self) -> Reading {
        self.slot.read().await.clone()
    }

    /// Replace the stored reading wholesale, stamping it with the current
    /// server time. Returns the stamp. The stamp is taken under the write
    /// lock, so successive replaces always carry increasing timestamps.
    pub async fn replace(&self, new: NewReading) -> DateTime<Utc> {
        let mut slot = self.slot.write().await;
        let now = Utc::now();
        *slot = Reading {
            status: new.status,
            lat: new.lat,
            lon: new.lon,
            timestamp: Some(now),
        };
        now
    }
}

impl Default for LatestReading {
    fn default() -> Self {
        Self::new()
    }
}
