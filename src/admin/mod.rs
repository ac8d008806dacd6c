// Admin query controller — filter state, tab selection, and fetch
// sequencing for the dashboard views.
//
// All data views sit behind a password gate: until a login succeeds, no
// data request is ever issued. Fetches are superseding rather than queued:
// every issued fetch carries a sequence ticket, any filter or tab change
// invalidates outstanding tickets, and a response older than the latest
// issued ticket is discarded so the view never regresses to stale data.

use anyhow::Result;

use crate::api::traits::{ApiGateway, LoginOutcome};
use crate::api::types::{
    DomainTrend, ExportKind, ReportRecord, ScanQuery, ScanRecord, Stats, Timeline,
};
use crate::risk::RiskLevel;

/// Default row cap for list fetches.
pub const DEFAULT_LIMIT: u32 = 100;

/// The dashboard's three views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Scans,
    Reports,
    Stats,
}

/// The enumerated analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Week,
    Fortnight,
    Month,
    Quarter,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Week,
        TimeRange::Fortnight,
        TimeRange::Month,
        TimeRange::Quarter,
    ];

    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Fortnight => 14,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    /// Only the four enumerated windows are valid.
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(TimeRange::Week),
            14 => Some(TimeRange::Fortnight),
            30 => Some(TimeRange::Month),
            90 => Some(TimeRange::Quarter),
            _ => None,
        }
    }
}

/// Ephemeral filter state. Changing any field invalidates in-flight
/// fetches for the current tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    pub risk_level: Option<RiskLevel>,
    pub domain: Option<String>,
    pub time_range: TimeRange,
}

/// What a completed fetch delivered for one tab.
#[derive(Debug, Clone)]
pub enum TabData {
    Scans(Vec<ScanRecord>),
    Reports(Vec<ReportRecord>),
    Stats(Stats),
}

/// The three analytics responses for one time range, fetched together.
#[derive(Debug, Clone)]
pub struct AnalyticsData {
    pub timeline: Timeline,
    pub high_risk: Vec<ScanRecord>,
    pub trending: Vec<DomainTrend>,
}

/// A snapshot of tab + filters at issue time, tagged with a sequence
/// number. Completing a ticket older than the latest issued one is a
/// no-op.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    tab: Tab,
    filters: Filters,
}

/// Controller for the admin dashboard's query state.
pub struct AdminQuery {
    authenticated: bool,
    tab: Tab,
    filters: Filters,
    limit: u32,
    /// Latest issued sequence number; responses must match it to land.
    seq: u64,
    data: Option<TabData>,
}

impl Default for AdminQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminQuery {
    pub fn new() -> Self {
        Self {
            authenticated: false,
            tab: Tab::default(),
            filters: Filters::default(),
            limit: DEFAULT_LIMIT,
            seq: 0,
            data: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Verify the password against the server. A denied password surfaces
    /// inline and leaves the controller unauthenticated; transport errors
    /// propagate.
    pub async fn login(&mut self, gateway: &dyn ApiGateway, password: &str) -> Result<LoginOutcome> {
        if password.is_empty() {
            return Ok(LoginOutcome::Denied("Please enter a password".to_string()));
        }
        let outcome = gateway.login(password).await?;
        if outcome == LoginOutcome::Accepted {
            self.authenticated = true;
        }
        Ok(outcome)
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Rendered data for the active tab. Never populated before a
    /// successful login.
    pub fn data(&self) -> Option<&TabData> {
        self.data.as_ref()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.invalidate();
        }
    }

    pub fn set_risk_filter(&mut self, level: Option<RiskLevel>) {
        if self.filters.risk_level != level {
            self.filters.risk_level = level;
            self.invalidate();
        }
    }

    pub fn set_domain_filter(&mut self, domain: Option<String>) {
        let domain = domain.filter(|d| !d.trim().is_empty());
        if self.filters.domain != domain {
            self.filters.domain = domain;
            self.invalidate();
        }
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        if self.filters.time_range != range {
            self.filters.time_range = range;
            self.invalidate();
        }
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    /// Outstanding tickets become stale immediately; whatever they resolve
    /// to will be discarded.
    fn invalidate(&mut self) {
        self.seq += 1;
    }

    /// Issue a fetch ticket snapshotting the active tab and filters.
    /// Rejected before authentication: no data call may be issued and no
    /// data revealed behind the login prompt.
    pub fn begin_fetch(&mut self) -> Result<FetchTicket> {
        if !self.authenticated {
            anyhow::bail!("Not authenticated — log in before fetching admin data");
        }
        self.seq += 1;
        Ok(FetchTicket {
            seq: self.seq,
            tab: self.tab,
            filters: self.filters.clone(),
        })
    }

    /// Run the single fetch a ticket calls for against the gateway. Uses
    /// the ticket's snapshot, not live controller state, so a concurrent
    /// filter change cannot leak into an older request.
    pub async fn execute(
        gateway: &dyn ApiGateway,
        ticket: &FetchTicket,
        limit: u32,
    ) -> Result<TabData> {
        match ticket.tab {
            Tab::Scans => {
                let query = ScanQuery {
                    limit,
                    risk_level: ticket.filters.risk_level.map(|l| l.as_str().to_string()),
                    domain: ticket.filters.domain.clone(),
                };
                Ok(TabData::Scans(gateway.scans(&query).await?))
            }
            Tab::Reports => Ok(TabData::Reports(gateway.reports(limit).await?)),
            Tab::Stats => Ok(TabData::Stats(gateway.stats().await?)),
        }
    }

    /// Land a completed fetch. Returns false (dropping the data) when the
    /// ticket has been superseded — last issued request wins, resolution
    /// order does not matter.
    pub fn complete(&mut self, ticket: FetchTicket, data: TabData) -> bool {
        if ticket.seq != self.seq {
            return false;
        }
        self.data = Some(data);
        true
    }

    /// Fire exactly one fetch for the active tab and land it.
    pub async fn refresh(&mut self, gateway: &dyn ApiGateway) -> Result<()> {
        let ticket = self.begin_fetch()?;
        let data = Self::execute(gateway, &ticket, self.limit).await?;
        self.complete(ticket, data);
        Ok(())
    }

    /// Fetch the three analytics views for the current time range together.
    pub async fn fetch_analytics(&self, gateway: &dyn ApiGateway) -> Result<AnalyticsData> {
        if !self.authenticated {
            anyhow::bail!("Not authenticated — log in before fetching admin data");
        }
        let days = self.filters.time_range.days();
        let (timeline, high_risk, trending) = tokio::try_join!(
            gateway.timeline(days),
            gateway.high_risk(days),
            gateway.trending_domains(days),
        )?;
        Ok(AnalyticsData {
            timeline,
            high_risk,
            trending,
        })
    }

    /// Proxy the server-side CSV export for one record type. No transform
    /// happens here beyond requesting the right type.
    pub async fn export(&self, gateway: &dyn ApiGateway, kind: ExportKind) -> Result<String> {
        if !self.authenticated {
            anyhow::bail!("Not authenticated — log in before exporting");
        }
        gateway.export_csv(kind).await
    }
}
