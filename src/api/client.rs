// HTTP gateway — thin reqwest wrapper over the scoring API.
//
// Generic GET/POST helpers with typed deserialization; non-2xx responses
// become errors carrying the status and response body so failures surface
// with enough context to act on. The one exception is the login endpoint,
// where 401/404 are domain outcomes rather than transport errors.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::traits::{ApiGateway, LoginOutcome};
use super::types::{
    DomainTrend, ExportKind, ReportReceipt, ReportRecord, ReportRequest, ScanQuery, ScanRecord,
    ScanRequest, ScanResult, ServerInfo, Stats, Timeline,
};

/// Default scoring API endpoint for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// HTTP client for the remote scoring service.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway pointing at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("phishscope/0.1 (email-triage)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a path with query parameters and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request failed: GET {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize GET {path} response"))
    }

    /// POST a JSON body and deserialize the JSON response.
    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(path = path, "POST request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request failed: POST {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("POST {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize POST {path} response"))
    }
}

/// Error envelope used by the server for rejections: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn server_info(&self) -> Result<ServerInfo> {
        self.get_json("/", &[]).await
    }

    async fn scan(&self, request: &ScanRequest) -> Result<ScanResult> {
        self.post_json("/scan", request).await
    }

    async fn report(&self, request: &ReportRequest) -> Result<ReportReceipt> {
        self.post_json("/report", request).await
    }

    async fn login(&self, password: &str) -> Result<LoginOutcome> {
        let url = format!("{}/admin/password/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&PasswordBody { password })
            .send()
            .await
            .context("Request failed: POST /admin/password/login")?;

        let status = response.status();
        if status.is_success() {
            return Ok(LoginOutcome::Accepted);
        }

        // 401 = wrong password, 404 = no password set yet. Both are inline
        // authentication outcomes the login form surfaces, not failures.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            let detail = response
                .json::<ErrorDetail>()
                .await
                .map(|e| e.detail)
                .unwrap_or_else(|_| "Invalid password".to_string());
            return Ok(LoginOutcome::Denied(detail));
        }

        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("POST /admin/password/login returned {status}: {body}");
    }

    async fn set_password(&self, password: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/admin/password/set", &PasswordBody { password })
            .await?;
        Ok(())
    }

    async fn scans(&self, query: &ScanQuery) -> Result<Vec<ScanRecord>> {
        let mut params = vec![("limit", query.limit.to_string())];
        if let Some(ref level) = query.risk_level {
            params.push(("risk_level", level.clone()));
        }
        if let Some(ref domain) = query.domain {
            params.push(("domain", domain.clone()));
        }
        self.get_json("/admin/scans", &params).await
    }

    async fn reports(&self, limit: u32) -> Result<Vec<ReportRecord>> {
        self.get_json("/admin/reports", &[("limit", limit.to_string())])
            .await
    }

    async fn stats(&self) -> Result<Stats> {
        self.get_json("/admin/stats", &[]).await
    }

    async fn timeline(&self, days: u32) -> Result<Timeline> {
        self.get_json("/admin/timeline", &[("days", days.to_string())])
            .await
    }

    async fn high_risk(&self, days: u32) -> Result<Vec<ScanRecord>> {
        self.get_json("/admin/high-risk", &[("days", days.to_string())])
            .await
    }

    async fn trending_domains(&self, days: u32) -> Result<Vec<DomainTrend>> {
        self.get_json("/admin/trending-domains", &[("days", days.to_string())])
            .await
    }

    async fn export_csv(&self, kind: ExportKind) -> Result<String> {
        let url = format!("{}/admin/export.csv", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("type", kind.as_str())])
            .send()
            .await
            .context("Request failed: GET /admin/export.csv")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("GET /admin/export.csv returned {status}");
        }

        response
            .text()
            .await
            .context("Failed to read CSV response body")
    }
}
