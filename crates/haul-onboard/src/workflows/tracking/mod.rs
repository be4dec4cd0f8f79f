//! Simulated package tracking: a fixed table of shipments answered after a cosmetic delay.

mod directory;
pub mod domain;

pub use directory::TrackingDirectory;
pub use domain::{
    ShipmentStatus, TrackingCheckpoint, TrackingError, TrackingNumber, TrackingRecord,
};
