use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use super::domain::{
    ShipmentStatus, TrackingCheckpoint, TrackingError, TrackingNumber, TrackingRecord,
};

/// Hard-coded shipment table. Lookups wait `delay` before answering to mimic a remote call.
#[derive(Debug, Clone)]
pub struct TrackingDirectory {
    records: BTreeMap<TrackingNumber, TrackingRecord>,
    delay: Duration,
}

impl TrackingDirectory {
    pub fn new(delay: Duration) -> Self {
        Self {
            records: BTreeMap::new(),
            delay,
        }
    }

    /// Sample shipments dated relative to `today`.
    pub fn demo(today: NaiveDate, delay: Duration) -> Self {
        let mut directory = Self::new(delay);

        directory.insert(record(
            "HWU-100234",
            ShipmentStatus::InTransit,
            "Lagos",
            "Abuja",
            today + chrono::Duration::days(2),
            vec![
                checkpoint(today, -1, 9, "Lagos hub", "Parcel received at origin hub"),
                checkpoint(today, -1, 17, "Lagos hub", "Departed origin hub"),
                checkpoint(today, 0, 8, "Lokoja depot", "Arrived at transit depot"),
            ],
        ));
        directory.insert(record(
            "HWU-200871",
            ShipmentStatus::OutForDelivery,
            "Ibadan",
            "Lagos",
            today,
            vec![
                checkpoint(today, -2, 11, "Ibadan hub", "Parcel received at origin hub"),
                checkpoint(today, -1, 6, "Lagos hub", "Arrived at destination hub"),
                checkpoint(today, 0, 7, "Ikeja", "Out for delivery with courier"),
            ],
        ));
        directory.insert(record(
            "HWU-305112",
            ShipmentStatus::Delivered,
            "Port Harcourt",
            "Enugu",
            today - chrono::Duration::days(1),
            vec![
                checkpoint(today, -4, 10, "Port Harcourt hub", "Parcel received at origin hub"),
                checkpoint(today, -2, 15, "Enugu hub", "Arrived at destination hub"),
                checkpoint(today, -1, 13, "Independence Layout", "Delivered to recipient"),
            ],
        ));
        directory.insert(record(
            "HWU-400019",
            ShipmentStatus::Pending,
            "Kano",
            "Kaduna",
            today + chrono::Duration::days(4),
            vec![checkpoint(today, 0, 12, "Kano", "Shipment booked, awaiting pickup")],
        ));

        directory
    }

    pub fn insert(&mut self, record: TrackingRecord) {
        self.records.insert(record.tracking_number.clone(), record);
    }

    /// Resolve `raw` after the simulated latency.
    pub async fn lookup(&self, raw: &str) -> Result<TrackingRecord, TrackingError> {
        let number = TrackingNumber::parse(raw)?;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        debug!(tracking_number = %number, "tracking lookup");
        self.records
            .get(&number)
            .cloned()
            .ok_or(TrackingError::NotFound(number))
    }
}

fn record(
    number: &str,
    status: ShipmentStatus,
    origin: &str,
    destination: &str,
    estimated_delivery: NaiveDate,
    checkpoints: Vec<TrackingCheckpoint>,
) -> TrackingRecord {
    TrackingRecord {
        tracking_number: TrackingNumber(number.to_string()),
        status,
        status_label: status.label(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        estimated_delivery,
        checkpoints,
    }
}

fn checkpoint(
    today: NaiveDate,
    day_offset: i64,
    hour: i64,
    location: &str,
    description: &str,
) -> TrackingCheckpoint {
    let at: NaiveDateTime = (today + chrono::Duration::days(day_offset)).and_time(NaiveTime::MIN)
        + chrono::Duration::hours(hour);
    TrackingCheckpoint {
        at,
        location: location.to_string(),
        description: description.to_string(),
    }
}
