// Gateway trait — the seam between controllers and the remote scoring API.
//
// Controllers (workflow, admin) depend on this trait rather than on reqwest
// directly, so tests can drive them with an in-memory mock. The production
// implementation is `client::HttpGateway`.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{
    DomainTrend, ExportKind, ReportReceipt, ReportRequest, ScanQuery, ScanRecord, ScanRequest,
    ScanResult, ServerInfo, Stats, Timeline, ReportRecord,
};

/// Outcome of a password check. A rejected password is an inline
/// authentication failure, not a transport error — it must not be mixed
/// into the `Err` channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Denied(String),
}

/// Logical operations exposed by the external scoring service.
///
/// All methods are async HTTP calls in production. `Err` means transport or
/// server failure; domain-level rejections (bad password) come back in the
/// `Ok` payload where the caller needs to distinguish them.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// `GET /` — advisory setup probe.
    async fn server_info(&self) -> Result<ServerInfo>;

    /// `POST /scan` — score one email.
    async fn scan(&self, request: &ScanRequest) -> Result<ScanResult>;

    /// `POST /report` — report a suspicious email.
    async fn report(&self, request: &ReportRequest) -> Result<ReportReceipt>;

    /// `POST /admin/password/login` — verify the admin password.
    async fn login(&self, password: &str) -> Result<LoginOutcome>;

    /// `POST /admin/password/set` — set or update the admin password.
    async fn set_password(&self, password: &str) -> Result<()>;

    /// `GET /admin/scans` — filtered scan history.
    async fn scans(&self, query: &ScanQuery) -> Result<Vec<ScanRecord>>;

    /// `GET /admin/reports` — report history.
    async fn reports(&self, limit: u32) -> Result<Vec<ReportRecord>>;

    /// `GET /admin/stats` — aggregate counters and top domains.
    async fn stats(&self) -> Result<Stats>;

    /// `GET /admin/timeline` — per-day tier counts for the last `days`.
    async fn timeline(&self, days: u32) -> Result<Timeline>;

    /// `GET /admin/high-risk` — recent high-risk scans, findings included.
    async fn high_risk(&self, days: u32) -> Result<Vec<ScanRecord>>;

    /// `GET /admin/trending-domains` — server-ranked domain trends.
    async fn trending_domains(&self, days: u32) -> Result<Vec<DomainTrend>>;

    /// `GET /admin/export.csv` — raw CSV for the given record type.
    async fn export_csv(&self, kind: ExportKind) -> Result<String>;
}
