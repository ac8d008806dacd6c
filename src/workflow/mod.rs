// Scan workflow — the client-side state machine for one scan session.
//
// Phases: Idle → Submitting → Result, with a nested report sub-flow
// (ReportOpen → ReportSubmitting → ReportSubmitted) that only exists while
// a result is held, and a reset back to Idle. Submission is split into
// begin/finish pairs so the busy guard and every transition are testable
// without a network.
//
// Independently of the phases, a one-way disclaimer gate blocks the whole
// screen until accepted; acceptance is persisted and read once at startup.

pub mod disclaimer;

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::api::traits::ApiGateway;
use crate::api::types::{ReportReceipt, ReportRequest, ScanRequest, ScanResult};

use disclaimer::DisclaimerStore;

/// How long the report-submitted confirmation stays up before the workflow
/// returns to the result view with the comment cleared.
pub const REPORT_CONFIRM_DELAY: Duration = Duration::from_secs(2);

/// Where the scan session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Result,
    ReportOpen,
    ReportSubmitting,
    ReportSubmitted,
}

/// The three recoverable, user-visible failures. None is fatal: the
/// workflow always lands back in a usable Idle/Result state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowError {
    MissingSender,
    ScanFailed,
    ReportFailed,
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            WorkflowError::MissingSender => "Please enter the sender's email address",
            WorkflowError::ScanFailed => "Failed to scan email. Please try again.",
            WorkflowError::ReportFailed => "Failed to submit report",
        };
        write!(f, "{msg}")
    }
}

/// Client-side controller for the scan/result/report lifecycle.
///
/// Owns the current `ScanResult` for the duration of one scan session;
/// a new scan replaces it wholesale.
pub struct ScanWorkflow {
    phase: Phase,
    input: ScanRequest,
    result: Option<ScanResult>,
    error: Option<WorkflowError>,
    report_comment: String,
    store: DisclaimerStore,
    disclaimer_accepted: bool,
    setup_required: Option<bool>,
}

impl ScanWorkflow {
    /// Create the controller, reading the persisted disclaimer flag once.
    pub fn new(store: DisclaimerStore) -> Self {
        let disclaimer_accepted = store.is_accepted();
        Self {
            phase: Phase::Idle,
            input: ScanRequest::default(),
            result: None,
            error: None,
            report_comment: String::new(),
            store,
            disclaimer_accepted,
            setup_required: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }

    /// Take and clear the current error message.
    pub fn take_error(&mut self) -> Option<WorkflowError> {
        self.error.take()
    }

    pub fn error(&self) -> Option<WorkflowError> {
        self.error
    }

    // --- Disclaimer gate ---

    pub fn disclaimer_accepted(&self) -> bool {
        self.disclaimer_accepted
    }

    /// One-way accept. Persists through the store; idempotent.
    pub fn accept_disclaimer(&mut self) -> Result<()> {
        if !self.disclaimer_accepted {
            self.store.mark_accepted()?;
            self.disclaimer_accepted = true;
        }
        Ok(())
    }

    // --- Setup probe ---

    /// One-shot advisory check of server configuration state. Failure to
    /// reach the server is non-fatal and ignored; the scan flow must still
    /// function.
    pub async fn probe_setup(&mut self, gateway: &dyn ApiGateway) {
        match gateway.server_info().await {
            Ok(info) => self.setup_required = Some(info.setup_required),
            Err(e) => debug!(error = %e, "Setup probe failed, ignoring"),
        }
    }

    pub fn setup_required(&self) -> Option<bool> {
        self.setup_required
    }

    // --- Scan submission ---

    /// Validate input and enter Submitting. Returns the request to dispatch,
    /// or None when rejected: a submit is already in flight (the duplicate
    /// guard), or the sender is empty (sets the missing-field error without
    /// issuing any request). Headers/body may be empty in the lightweight
    /// single-field flow.
    pub fn begin_scan(&mut self, sender: &str, headers: &str, body: &str) -> Option<ScanRequest> {
        if matches!(self.phase, Phase::Submitting | Phase::ReportSubmitting) {
            return None;
        }
        if sender.trim().is_empty() {
            self.error = Some(WorkflowError::MissingSender);
            return None;
        }

        self.error = None;
        self.result = None;
        self.input = ScanRequest {
            sender: sender.trim().to_string(),
            headers: headers.to_string(),
            body: body.to_string(),
        };
        self.phase = Phase::Submitting;
        Some(self.input.clone())
    }

    /// Apply the scan outcome: Result on success, back to Idle with a scan
    /// failure message otherwise.
    pub fn finish_scan(&mut self, outcome: Result<ScanResult>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = Phase::Result;
            }
            Err(e) => {
                debug!(error = %e, "Scan request failed");
                self.error = Some(WorkflowError::ScanFailed);
                self.phase = Phase::Idle;
            }
        }
    }

    /// Submit a scan end to end. Returns true when a request was dispatched
    /// (regardless of its outcome — inspect `phase`/`error` for that).
    pub async fn submit_scan(
        &mut self,
        gateway: &dyn ApiGateway,
        sender: &str,
        headers: &str,
        body: &str,
    ) -> bool {
        let Some(request) = self.begin_scan(sender, headers, body) else {
            return false;
        };
        let outcome = gateway.scan(&request).await;
        self.finish_scan(outcome);
        true
    }

    // --- Report sub-flow ---

    /// Open the report form. Valid only while a result is held.
    pub fn open_report(&mut self) -> bool {
        if self.phase == Phase::Result {
            self.phase = Phase::ReportOpen;
            true
        } else {
            false
        }
    }

    /// Close the report form without submitting, keeping the comment.
    pub fn cancel_report(&mut self) {
        if matches!(self.phase, Phase::ReportOpen) {
            self.phase = Phase::Result;
        }
    }

    pub fn set_report_comment(&mut self, comment: &str) {
        self.report_comment = comment.to_string();
    }

    /// Enter ReportSubmitting. Returns the request carrying the original
    /// sender/headers/body plus the free-text comment, or None when no
    /// report form is open.
    pub fn begin_report(&mut self) -> Option<ReportRequest> {
        if self.phase != Phase::ReportOpen {
            return None;
        }
        self.phase = Phase::ReportSubmitting;
        Some(ReportRequest {
            sender: self.input.sender.clone(),
            headers: self.input.headers.clone(),
            body: self.input.body.clone(),
            user_comment: self.report_comment.clone(),
        })
    }

    /// Apply the report outcome: ReportSubmitted on success; on failure the
    /// form stays open for retry with an error surfaced.
    pub fn finish_report(&mut self, outcome: Result<ReportReceipt>) {
        match outcome {
            Ok(_) => {
                self.phase = Phase::ReportSubmitted;
            }
            Err(e) => {
                debug!(error = %e, "Report request failed");
                self.error = Some(WorkflowError::ReportFailed);
                self.phase = Phase::ReportOpen;
            }
        }
    }

    /// Submit the open report end to end.
    pub async fn submit_report(&mut self, gateway: &dyn ApiGateway) -> bool {
        let Some(request) = self.begin_report() else {
            return false;
        };
        let outcome = gateway.report(&request).await;
        self.finish_report(outcome);
        true
    }

    /// Return to the result view after the confirmation delay, clearing the
    /// comment field. Callers sleep `REPORT_CONFIRM_DELAY` first.
    pub fn acknowledge_report(&mut self) {
        if self.phase == Phase::ReportSubmitted {
            self.report_comment.clear();
            self.phase = Phase::Result;
        }
    }

    /// Drop the session and return to Idle.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.input = ScanRequest::default();
        self.result = None;
        self.error = None;
        self.report_comment.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::traits::LoginOutcome;
    use crate::api::types::{
        DomainTrend, ExportKind, ReportRecord, ScanQuery, ScanRecord, ServerInfo, Signals, Stats,
        Timeline,
    };

    /// In-memory gateway: counts calls and replays canned outcomes.
    #[derive(Default)]
    struct MockGateway {
        scan_calls: AtomicUsize,
        report_calls: AtomicUsize,
        fail_scan: bool,
        fail_report: bool,
        last_report: Mutex<Option<ReportRequest>>,
    }

    fn canned_result(level: &str) -> ScanResult {
        ScanResult {
            risk_level: level.to_string(),
            score: 85,
            summary: vec!["SPF check failed".to_string()],
            recommendations: vec!["Do not click links".to_string()],
            signals: Signals::default(),
        }
    }

    #[async_trait]
    impl ApiGateway for MockGateway {
        async fn server_info(&self) -> Result<ServerInfo> {
            Ok(ServerInfo {
                setup_required: true,
                password_set: false,
            })
        }

        async fn scan(&self, _request: &ScanRequest) -> Result<ScanResult> {
            self.scan_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_scan {
                anyhow::bail!("connection refused");
            }
            Ok(canned_result("high"))
        }

        async fn report(&self, request: &ReportRequest) -> Result<ReportReceipt> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_report {
                anyhow::bail!("500 Internal Server Error");
            }
            *self.last_report.lock().unwrap() = Some(request.clone());
            Ok(ReportReceipt {
                ok: true,
                report_id: Some("r1".to_string()),
            })
        }

        async fn login(&self, _password: &str) -> Result<LoginOutcome> {
            Ok(LoginOutcome::Accepted)
        }
        async fn set_password(&self, _password: &str) -> Result<()> {
            Ok(())
        }
        async fn scans(&self, _query: &ScanQuery) -> Result<Vec<ScanRecord>> {
            Ok(vec![])
        }
        async fn reports(&self, _limit: u32) -> Result<Vec<ReportRecord>> {
            Ok(vec![])
        }
        async fn stats(&self) -> Result<Stats> {
            Ok(Stats::default())
        }
        async fn timeline(&self, _days: u32) -> Result<Timeline> {
            Ok(Timeline::default())
        }
        async fn high_risk(&self, _days: u32) -> Result<Vec<ScanRecord>> {
            Ok(vec![])
        }
        async fn trending_domains(&self, _days: u32) -> Result<Vec<DomainTrend>> {
            Ok(vec![])
        }
        async fn export_csv(&self, _kind: ExportKind) -> Result<String> {
            Ok(String::new())
        }
    }

    fn workflow() -> (ScanWorkflow, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let wf = ScanWorkflow::new(DisclaimerStore::new(dir.path()));
        (wf, dir)
    }

    #[tokio::test]
    async fn test_empty_sender_fails_locally_without_request() {
        let (mut wf, _dir) = workflow();
        let gateway = MockGateway::default();

        let dispatched = wf.submit_scan(&gateway, "", "h", "b").await;
        assert!(!dispatched);
        assert_eq!(wf.error(), Some(WorkflowError::MissingSender));
        assert_eq!(wf.phase(), Phase::Idle);
        assert_eq!(gateway.scan_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_scan_reaches_result() {
        let (mut wf, _dir) = workflow();
        let gateway = MockGateway::default();

        // Lightweight single-field flow: headers/body empty is fine.
        assert!(wf.submit_scan(&gateway, "a@evil.com", "", "").await);
        assert_eq!(wf.phase(), Phase::Result);
        assert_eq!(wf.result().unwrap().risk_level, "high");
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn test_scan_failure_returns_to_idle_with_error() {
        let (mut wf, _dir) = workflow();
        let gateway = MockGateway {
            fail_scan: true,
            ..Default::default()
        };

        assert!(wf.submit_scan(&gateway, "a@evil.com", "", "").await);
        assert_eq!(wf.phase(), Phase::Idle);
        assert_eq!(wf.error(), Some(WorkflowError::ScanFailed));
        assert!(wf.result().is_none());
    }

    #[test]
    fn test_second_submit_rejected_while_submitting() {
        let (mut wf, _dir) = workflow();

        assert!(wf.begin_scan("a@evil.com", "", "").is_some());
        assert_eq!(wf.phase(), Phase::Submitting);
        // Rapid second click: rejected until the first resolves.
        assert!(wf.begin_scan("a@evil.com", "", "").is_none());

        wf.finish_scan(Ok(canned_result("low")));
        assert_eq!(wf.phase(), Phase::Result);
        // A new scan from Result is allowed and replaces the result.
        assert!(wf.begin_scan("b@other.com", "", "").is_some());
    }

    #[tokio::test]
    async fn test_report_carries_original_input_and_comment() {
        let (mut wf, _dir) = workflow();
        let gateway = MockGateway::default();

        wf.submit_scan(&gateway, "a@evil.com", "H: v", "click here").await;
        assert!(wf.open_report());
        wf.set_report_comment("looked like my bank");
        assert!(wf.submit_report(&gateway).await);
        assert_eq!(wf.phase(), Phase::ReportSubmitted);

        let sent = gateway.last_report.lock().unwrap().clone().unwrap();
        assert_eq!(sent.sender, "a@evil.com");
        assert_eq!(sent.headers, "H: v");
        assert_eq!(sent.body, "click here");
        assert_eq!(sent.user_comment, "looked like my bank");

        wf.acknowledge_report();
        assert_eq!(wf.phase(), Phase::Result);
        assert!(wf.report_comment.is_empty());
    }

    #[tokio::test]
    async fn test_report_failure_stays_open_for_retry() {
        let (mut wf, _dir) = workflow();
        let ok_gateway = MockGateway::default();
        let bad_gateway = MockGateway {
            fail_report: true,
            ..Default::default()
        };

        wf.submit_scan(&ok_gateway, "a@evil.com", "", "").await;
        wf.open_report();
        assert!(wf.submit_report(&bad_gateway).await);
        assert_eq!(wf.phase(), Phase::ReportOpen);
        assert_eq!(wf.error(), Some(WorkflowError::ReportFailed));

        // Retry against a healthy gateway succeeds.
        assert!(wf.submit_report(&ok_gateway).await);
        assert_eq!(wf.phase(), Phase::ReportSubmitted);
    }

    #[test]
    fn test_report_invalid_without_result() {
        let (mut wf, _dir) = workflow();
        assert!(!wf.open_report());
        assert!(wf.begin_report().is_none());
    }

    #[test]
    fn test_disclaimer_roundtrip_across_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut wf = ScanWorkflow::new(DisclaimerStore::new(dir.path()));
        assert!(!wf.disclaimer_accepted());
        wf.accept_disclaimer().unwrap();
        wf.accept_disclaimer().unwrap(); // idempotent
        assert!(wf.disclaimer_accepted());

        // Simulated reload: the modal must not reappear.
        let reloaded = ScanWorkflow::new(DisclaimerStore::new(dir.path()));
        assert!(reloaded.disclaimer_accepted());
    }

    #[tokio::test]
    async fn test_setup_probe_records_flag() {
        let (mut wf, _dir) = workflow();
        assert_eq!(wf.setup_required(), None);
        wf.probe_setup(&MockGateway::default()).await;
        assert_eq!(wf.setup_required(), Some(true));
    }

    #[test]
    fn test_reset_clears_session() {
        let (mut wf, _dir) = workflow();
        wf.begin_scan("a@evil.com", "", "");
        wf.finish_scan(Ok(canned_result("medium")));
        wf.reset();
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.result().is_none());
        assert!(wf.error().is_none());
    }
}
