// Wire types — Rust structs that map to the scoring API's JSON.
//
// These are the types that flow through the application. Everything coming
// back from the server is treated as untrusted: optional and nested fields
// default rather than fail, and unknown extra fields are ignored, so a
// server-side schema addition never breaks the render path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body for `POST /scan` and the retained input for a follow-up report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub sender: String,
    pub headers: String,
    pub body: String,
}

/// The scoring verdict for one scan. Produced once per request, immutable,
/// replaced wholesale on the next scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanResult {
    pub risk_level: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub signals: Signals,
}

/// Technical signals attached to a scan. The server may add fields over
/// time; everything here defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Signals {
    #[serde(default)]
    pub from_domain: String,
    #[serde(default)]
    pub mx_present: bool,
    #[serde(default)]
    pub spf_present: bool,
    #[serde(default)]
    pub dmarc_present: bool,
    #[serde(default)]
    pub dkim_present: bool,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
}

/// AI content analysis sub-record. Only present when the server ran it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub ai_risk_score: i64,
}

impl Signals {
    /// AI risk score when the analysis ran and produced a positive score.
    /// Absent or zero renders as "not evaluated" downstream.
    pub fn ai_risk_score(&self) -> Option<i64> {
        self.ai_analysis
            .as_ref()
            .map(|a| a.ai_risk_score)
            .filter(|s| *s > 0)
    }
}

/// Body for `POST /report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub sender: String,
    pub headers: String,
    pub body: String,
    pub user_comment: String,
}

/// Acknowledgment from `POST /report`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportReceipt {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub report_id: Option<String>,
}

/// Response from `GET /` — the advisory setup probe.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub setup_required: bool,
    #[serde(default)]
    pub password_set: bool,
}

/// One row of the admin scan history. Read-only: created server-side on
/// each scan, never mutated or deleted from this client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub sender: String,
    #[serde(default)]
    pub from_domain: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub created_at: String,
    /// Findings are included by the high-risk endpoint, absent elsewhere.
    #[serde(default)]
    pub summary: Vec<String>,
}

/// One row of the admin report history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub sender: String,
    #[serde(default)]
    pub from_domain: String,
    #[serde(default)]
    pub user_comment: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Query parameters for `GET /admin/scans`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanQuery {
    pub limit: u32,
    pub risk_level: Option<String>,
    pub domain: Option<String>,
}

/// Response from `GET /admin/stats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub total_reports: u64,
    #[serde(default)]
    pub risk_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub top_domains: Vec<TopDomain>,
}

/// One domain aggregate in the stats response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopDomain {
    pub domain: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub avg_score: f64,
}

/// Per-tier scan counts for one calendar-day bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TierCounts {
    #[serde(default)]
    pub safe: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub high: u64,
}

impl TierCounts {
    pub fn total(&self) -> u64 {
        self.safe + self.low + self.medium + self.high
    }
}

/// Response from `GET /admin/timeline`.
///
/// Keyed by ISO date; BTreeMap ordering on ISO dates is chronological
/// ascending, which is the render order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub timeline: BTreeMap<String, TierCounts>,
}

/// One row from `GET /admin/trending-domains`. Rank is not a field — it is
/// the array index at render time, recomputed whenever the list changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainTrend {
    pub domain: String,
    #[serde(default)]
    pub scan_count: u64,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub last_scan: String,
}

/// Record type for `GET /admin/export.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Scans,
    Reports,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Scans => "scans",
            ExportKind::Reports => "reports",
        }
    }
}
