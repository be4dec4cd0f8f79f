use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Tracking numbers compare case-insensitively and ignore surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrackingNumber(pub(crate) String);

impl TrackingNumber {
    pub fn parse(raw: &str) -> Result<Self, TrackingError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(TrackingError::EmptyNumber);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    OutForDelivery,
    Delivered,
}

impl ShipmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending pickup",
            Self::InTransit => "In transit",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingCheckpoint {
    pub at: NaiveDateTime,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingRecord {
    pub tracking_number: TrackingNumber,
    pub status: ShipmentStatus,
    pub status_label: &'static str,
    pub origin: String,
    pub destination: String,
    pub estimated_delivery: NaiveDate,
    pub checkpoints: Vec<TrackingCheckpoint>,
}

impl TrackingRecord {
    pub fn latest_checkpoint(&self) -> Option<&TrackingCheckpoint> {
        self.checkpoints.iter().max_by_key(|checkpoint| checkpoint.at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("please enter a tracking number")]
    EmptyNumber,
    #[error("no shipment found for tracking number {0}")]
    NotFound(TrackingNumber),
}
