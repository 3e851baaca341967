//! Usage tracking against the configured storage quota

use crate::config::QuotaConfig;
use crate::error::{AnalyzerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub total_bytes: u64,
    pub object_count: u64,
    pub monthly_writes: u64,
    /// Calendar month the write counter belongs to, `YYYY-MM`
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remaining {
    pub bytes: u64,
    pub objects: u64,
    pub monthly_writes: u64,
}

/// Tracks usage and admits writes only while every limit still has room.
///
/// Writes are reserved before they are sent so concurrent requests cannot
/// overshoot a limit; a failed write gives its reservation back.
pub struct QuotaTracker {
    limits: QuotaConfig,
    usage: Mutex<Usage>,
}

pub fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

impl QuotaTracker {
    pub fn new(limits: QuotaConfig, now: DateTime<Utc>) -> Self {
        Self {
            limits,
            usage: Mutex::new(Usage {
                month: month_key(now),
                ..Usage::default()
            }),
        }
    }

    pub fn limits(&self) -> &QuotaConfig {
        &self.limits
    }

    /// Replace the tracked usage with counts observed in the store
    pub async fn seed(&self, total_bytes: u64, object_count: u64, monthly_writes: u64, now: DateTime<Utc>) {
        let mut usage = self.usage.lock().await;
        *usage = Usage {
            total_bytes,
            object_count,
            monthly_writes,
            month: month_key(now),
        };
    }

    /// Reserve room for one object of `size` bytes
    pub async fn reserve(&self, size: u64, now: DateTime<Utc>) -> Result<()> {
        let mut usage = self.usage.lock().await;
        roll_month(&mut usage, now);

        if size > self.limits.max_object_bytes {
            return Err(AnalyzerError::QuotaExceeded(format!(
                "object of {} bytes exceeds the per-object limit of {} bytes",
                size, self.limits.max_object_bytes
            )));
        }
        if usage.total_bytes + size > self.limits.max_total_bytes {
            return Err(AnalyzerError::QuotaExceeded(format!(
                "storing {} bytes would exceed the total limit of {} bytes",
                size, self.limits.max_total_bytes
            )));
        }
        if usage.object_count + 1 > self.limits.max_objects {
            return Err(AnalyzerError::QuotaExceeded(format!(
                "object limit of {} reached",
                self.limits.max_objects
            )));
        }
        if usage.monthly_writes + 1 > self.limits.max_monthly_writes {
            return Err(AnalyzerError::QuotaExceeded(format!(
                "monthly write limit of {} reached",
                self.limits.max_monthly_writes
            )));
        }

        usage.total_bytes += size;
        usage.object_count += 1;
        usage.monthly_writes += 1;
        Ok(())
    }

    /// Give back a reservation whose write failed
    pub async fn release(&self, size: u64) {
        let mut usage = self.usage.lock().await;
        usage.total_bytes = usage.total_bytes.saturating_sub(size);
        usage.object_count = usage.object_count.saturating_sub(1);
        usage.monthly_writes = usage.monthly_writes.saturating_sub(1);
    }

    pub async fn usage(&self, now: DateTime<Utc>) -> Usage {
        let mut usage = self.usage.lock().await;
        roll_month(&mut usage, now);
        usage.clone()
    }

    pub fn remaining(&self, usage: &Usage) -> Remaining {
        Remaining {
            bytes: self.limits.max_total_bytes.saturating_sub(usage.total_bytes),
            objects: self.limits.max_objects.saturating_sub(usage.object_count),
            monthly_writes: self
                .limits
                .max_monthly_writes
                .saturating_sub(usage.monthly_writes),
        }
    }
}

fn roll_month(usage: &mut Usage, now: DateTime<Utc>) {
    let month = month_key(now);
    if usage.month != month {
        log::info!(
            "Storage write counter reset for {} ({} writes in {})",
            month,
            usage.monthly_writes,
            usage.month
        );
        usage.month = month;
        usage.monthly_writes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn limits() -> QuotaConfig {
        QuotaConfig {
            max_object_bytes: 100,
            max_total_bytes: 250,
            max_objects: 3,
            max_monthly_writes: 4,
        }
    }

    fn march() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_reserve_within_limits() {
        let tracker = QuotaTracker::new(limits(), march());
        tracker.reserve(80, march()).await.unwrap();
        tracker.reserve(80, march()).await.unwrap();

        let usage = tracker.usage(march()).await;
        assert_eq!(usage.total_bytes, 160);
        assert_eq!(usage.object_count, 2);
        assert_eq!(usage.monthly_writes, 2);
        assert_eq!(usage.month, "2024-03");

        let remaining = tracker.remaining(&usage);
        assert_eq!(remaining.bytes, 90);
        assert_eq!(remaining.objects, 1);
        assert_eq!(remaining.monthly_writes, 2);
    }

    #[tokio::test]
    async fn test_each_limit_is_enforced() {
        let tracker = QuotaTracker::new(limits(), march());

        let too_big = tracker.reserve(101, march()).await;
        assert!(matches!(too_big, Err(AnalyzerError::QuotaExceeded(_))));

        tracker.reserve(100, march()).await.unwrap();
        tracker.reserve(100, march()).await.unwrap();
        let over_total = tracker.reserve(60, march()).await;
        assert!(matches!(over_total, Err(AnalyzerError::QuotaExceeded(_))));

        tracker.reserve(10, march()).await.unwrap();
        let over_count = tracker.reserve(1, march()).await;
        assert!(matches!(over_count, Err(AnalyzerError::QuotaExceeded(_))));

        // Rejected reservations leave usage untouched
        assert_eq!(tracker.usage(march()).await.total_bytes, 210);
    }

    #[tokio::test]
    async fn test_monthly_writes_reset_in_new_month() {
        let tracker = QuotaTracker::new(limits(), march());
        tracker.seed(0, 0, 4, march()).await;
        assert!(tracker.reserve(1, march()).await.is_err());

        let april = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        tracker.reserve(1, april).await.unwrap();

        let usage = tracker.usage(april).await;
        assert_eq!(usage.month, "2024-04");
        assert_eq!(usage.monthly_writes, 1);
    }

    #[tokio::test]
    async fn test_release_returns_reservation() {
        let tracker = QuotaTracker::new(limits(), march());
        tracker.reserve(50, march()).await.unwrap();
        tracker.release(50).await;

        assert_eq!(tracker.usage(march()).await, Usage {
            month: "2024-03".to_string(),
            ..Usage::default()
        });
    }
}
