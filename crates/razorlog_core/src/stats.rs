//! Usage aggregation helpers shared by both storage backends.
//!
//! # Responsibility
//! - Define the statistics and dashboard read models.
//! - Provide the pure ordering/averaging/windowing rules so the durable and
//!   fallback backends compute identical views.
//!
//! # Invariants
//! - Average rating only considers rated records and is `0.0` when none exist.
//! - Recency order is `usage_time DESC, id DESC` for every backend.
//! - Page windows are clamped to the collection and never panic.

use crate::model::usage::UsageRecord;
use serde::Serialize;
use std::cmp::Reverse;
use std::ops::Range;

/// Number of recent usage records shown on the dashboard.
pub const DASHBOARD_RECENT_LIMIT: u32 = 5;

/// Aggregate counters for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageStatistics {
    /// Number of usage records (the total usage count).
    pub total_usage: u64,
    pub razor_count: u64,
    pub blade_count: u64,
    pub average_rating: f64,
}

/// Statistics plus the most recent usage records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub statistics: UsageStatistics,
    pub recent_records: Vec<UsageRecord>,
}

/// Averages present ratings; returns `0.0` when nothing is rated.
pub fn average_rating<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = Option<i32>>,
{
    let (sum, count) = ratings
        .into_iter()
        .flatten()
        .fold((0.0_f64, 0_u64), |(sum, count), rating| {
            (sum + f64::from(rating), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sorts usage records most-recent first, breaking ties by newest ID.
pub fn order_by_recency(records: &mut [UsageRecord]) {
    records.sort_by_key(|record| Reverse((record.usage_time, record.id)));
}

/// Computes the in-bounds index range for an offset/limit slice.
///
/// An offset at or past `len` yields an empty range.
pub fn page_window(len: usize, offset: u64, limit: u32) -> Range<usize> {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(len);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let end = start.saturating_add(limit).min(len);
    start..end
}

/// Ceiling of `total / page_size`; zero pages for an empty collection.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

#[cfg(test)]
mod tests {
    use super::{average_rating, order_by_recency, page_window, total_pages};
    use crate::model::usage::UsageRecord;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn average_is_zero_without_ratings() {
        assert_eq!(average_rating(Vec::new()), 0.0);
        assert_eq!(average_rating(vec![None, None]), 0.0);
    }

    #[test]
    fn average_ignores_unrated_records() {
        let rated = average_rating(vec![Some(4), Some(2), Some(5)]);
        let mixed = average_rating(vec![Some(4), None, Some(2), None, Some(5)]);
        assert!((rated - 11.0 / 3.0).abs() < 1e-12);
        assert_eq!(rated, mixed);
    }

    #[test]
    fn page_window_is_clamped() {
        assert_eq!(page_window(5, 0, 2), 0..2);
        assert_eq!(page_window(5, 4, 10), 4..5);
        assert_eq!(page_window(5, 5, 10), 5..5);
        assert_eq!(page_window(5, u64::MAX, u32::MAX), 5..5);
        assert_eq!(page_window(0, 0, 10), 0..0);
    }

    #[test]
    fn page_window_len_matches_expected_count_for_all_offsets() {
        let len = 7_usize;
        for offset in 0..12_u64 {
            for limit in 1..10_u32 {
                let expected = (limit as usize).min(len.saturating_sub(offset as usize));
                assert_eq!(page_window(len, offset, limit).len(), expected);
            }
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 0), 0);
    }

    #[test]
    fn recency_orders_by_usage_time_then_id() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        let mut records = vec![
            record(1, base),
            record(2, base + Duration::days(2)),
            record(3, base + Duration::days(1)),
            record(4, base + Duration::days(2)),
        ];
        order_by_recency(&mut records);
        let ids: Vec<_> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    fn record(id: i64, usage_time: chrono::DateTime<Utc>) -> UsageRecord {
        let mut record = UsageRecord::new(usage_time, 1, 1);
        record.id = id;
        record
    }
}
