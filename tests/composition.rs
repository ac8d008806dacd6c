// Composition tests — verifying that pure functions chain together correctly.
//
// These tests exercise the data flow between modules:
//   wire JSON -> typed response -> classification / aggregation -> rendered text
// without any network calls or filesystem side effects.

use std::collections::BTreeMap;

use phishscope::analytics::{build_timeline_series, rank_trending_domains};
use phishscope::api::types::{DomainTrend, ScanResult, TierCounts, Timeline};
use phishscope::output::terminal::render_share_text;
use phishscope::risk::{classify, RiskLevel, ScoreBand};

// ============================================================
// Chain: scan response JSON -> classification -> share text
// ============================================================

#[test]
fn high_risk_response_renders_scam_alert_and_share_text() {
    let json = r#"{
        "risk_level": "high",
        "score": 92,
        "summary": ["Domain registered 2 days ago", "SPF and DMARC both missing"],
        "recommendations": ["Delete this email", "Report to IT"],
        "signals": {
            "from_domain": "paypa1-secure-login.com",
            "mx_present": true,
            "spf_present": false,
            "dmarc_present": false,
            "dkim_present": false,
            "ai_analysis": {"ai_risk_score": 88}
        }
    }"#;
    let result: ScanResult = serde_json::from_str(json).unwrap();

    let tier = classify(&result.risk_level);
    assert_eq!(tier.level, RiskLevel::High);
    assert_eq!(tier.label, "STOP! SCAM ALERT");
    assert!(tier.advise_delete);
    assert!(tier.offer_report);

    let text = render_share_text(&result);
    assert!(text.contains("Risk Level: HIGH"));
    assert!(text.contains("Risk Score: 92/100"));
    assert!(text.contains("1. Domain registered 2 days ago"));
    assert!(text.contains("2. SPF and DMARC both missing"));
    assert!(text.contains("• Domain: paypa1-secure-login.com"));
    assert!(text.contains("• AI Risk Score: 88/100"));
}

#[test]
fn unknown_tier_from_server_degrades_to_safe_presentation() {
    // A server-side tier added later must not break the render path.
    let result: ScanResult =
        serde_json::from_str(r#"{"risk_level": "quarantined", "score": 50}"#).unwrap();

    let tier = classify(&result.risk_level);
    assert_eq!(tier.level, RiskLevel::Safe);
    assert!(!tier.advise_delete);

    // The share text still renders, without an AI line.
    let text = render_share_text(&result);
    assert!(text.contains("Risk Score: 50/100"));
    assert!(!text.contains("AI Risk Score"));
}

// ============================================================
// Chain: timeline JSON -> per-day buckets -> proportional rows
// ============================================================

#[test]
fn timeline_response_becomes_ordered_proportional_rows() {
    let json = r#"{"timeline": {
        "2025-03-03": {"safe": 0, "low": 0, "medium": 0, "high": 0},
        "2025-03-01": {"safe": 3, "low": 1, "medium": 0, "high": 0},
        "2025-03-02": {"safe": 0, "low": 0, "medium": 1, "high": 1}
    }}"#;
    let timeline: Timeline = serde_json::from_str(json).unwrap();
    let rows = build_timeline_series(&timeline.timeline);

    // Chronological regardless of JSON key order.
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2025-03-01", "2025-03-02", "2025-03-03"]);

    // 3 safe + 1 low: two segments at 75/25, zero-count tiers skipped.
    assert_eq!(rows[0].segments.len(), 2);
    assert!((rows[0].segments[0].width_percent - 75.0).abs() < 1e-9);
    assert!((rows[0].segments[1].width_percent - 25.0).abs() < 1e-9);

    // Medium + high split evenly.
    assert_eq!(rows[1].segments.len(), 2);
    assert_eq!(rows[1].segments[0].tier, RiskLevel::Medium);
    assert_eq!(rows[1].segments[1].tier, RiskLevel::High);

    // The empty day stays on the axis as an explicit empty state.
    assert!(rows[2].is_empty());
    assert!(rows[2].segments.is_empty());
}

#[test]
fn single_tier_day_fills_the_whole_bar() {
    let mut buckets = BTreeMap::new();
    buckets.insert(
        "2025-03-01".to_string(),
        TierCounts {
            high: 7,
            ..Default::default()
        },
    );

    let rows = build_timeline_series(&buckets);
    assert_eq!(rows[0].segments.len(), 1);
    assert!((rows[0].segments[0].width_percent - 100.0).abs() < 1e-9);
}

// ============================================================
// Chain: trending JSON -> ranks -> score bands
// ============================================================

#[test]
fn trending_rows_keep_server_order_and_band_their_averages() {
    let json = r#"[
        {"domain": "paypa1.com", "scan_count": 12, "avg_score": 81.5,
         "last_scan": "2025-03-02T09:00:00"},
        {"domain": "maersk-docs.net", "scan_count": 9, "avg_score": 95.0,
         "last_scan": "2025-03-01T17:30:00"},
        {"domain": "example.com", "scan_count": 4, "avg_score": 8.0,
         "last_scan": "2025-03-02T11:00:00"}
    ]"#;
    let trends: Vec<DomainTrend> = serde_json::from_str(json).unwrap();
    let ranked = rank_trending_domains(&trends);

    // Server order wins even though maersk-docs.net has the higher average.
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].trend.domain, "paypa1.com");
    assert_eq!(ranked[1].rank, 2);
    assert_eq!(ranked[1].trend.domain, "maersk-docs.net");
    assert_eq!(ranked[2].rank, 3);

    assert_eq!(ScoreBand::from_score(ranked[0].trend.avg_score), ScoreBand::Severe);
    assert_eq!(ScoreBand::from_score(ranked[2].trend.avg_score), ScoreBand::Minimal);
}
