// Analytics aggregation — turns raw admin rows into render-ready shapes.
//
// The server owns bucketing (per-day tier counts) and ranking authority
// (trending order). This layer only derives proportions and attaches
// render-time rank indexes. Both functions are pure and total: empty input
// yields an explicit empty state, never an error.

use std::collections::BTreeMap;

use crate::api::types::{DomainTrend, TierCounts};
use crate::risk::RiskLevel;

/// One proportional slice of a timeline bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub tier: RiskLevel,
    pub count: u64,
    /// Share of the bucket total, 0-100.
    pub width_percent: f64,
}

/// One rendered timeline row. `segments` is empty when the bucket had no
/// scans; the row still renders so the date axis stays continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub date: String,
    pub segments: Vec<Segment>,
    pub total: u64,
}

impl TimelineRow {
    /// Explicit empty-state marker for a zero-total bucket.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Build chart-ready rows from per-day tier counts.
///
/// For each bucket, every tier with count > 0 gets a segment with
/// `width_percent = 100 * count / total`; zero-count tiers contribute no
/// segment (avoids zero-width artifacts). A zero-total bucket produces an
/// empty row instead of dividing by zero. Dates render in source order,
/// which for ISO-keyed maps is chronological ascending.
pub fn build_timeline_series(buckets: &BTreeMap<String, TierCounts>) -> Vec<TimelineRow> {
    buckets
        .iter()
        .map(|(date, counts)| {
            let total = counts.total();
            let mut segments = Vec::new();

            if total > 0 {
                let tier_counts = [
                    (RiskLevel::Safe, counts.safe),
                    (RiskLevel::Low, counts.low),
                    (RiskLevel::Medium, counts.medium),
                    (RiskLevel::High, counts.high),
                ];
                for (tier, count) in tier_counts {
                    if count > 0 {
                        segments.push(Segment {
                            tier,
                            count,
                            width_percent: 100.0 * count as f64 / total as f64,
                        });
                    }
                }
            }

            TimelineRow {
                date: date.clone(),
                segments,
                total,
            }
        })
        .collect()
}

/// A trending domain with its render-time rank attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDomain<'a> {
    /// 1-based position in the server-supplied ordering.
    pub rank: usize,
    pub trend: &'a DomainTrend,
}

/// Attach 1-based ranks to server-ordered trend rows.
///
/// Ranking authority lives server-side; this preserves the input ordering
/// exactly. Re-sorting here would let avg_score ties reorder between
/// renders, so it never sorts.
pub fn rank_trending_domains(rows: &[DomainTrend]) -> Vec<RankedDomain<'_>> {
    rows.iter()
        .enumerate()
        .map(|(i, trend)| RankedDomain { rank: i + 1, trend })
        .collect()
}
