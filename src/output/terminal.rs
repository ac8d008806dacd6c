// Colored terminal output for scan results and the admin views.
//
// This module handles all terminal-specific formatting: colors, tables,
// proportional timeline bars. The main.rs command handlers delegate here.

use colored::Colorize;

use crate::analytics::{RankedDomain, TimelineRow};
use crate::api::types::{ReportRecord, ScanRecord, ScanResult, ServerInfo, Stats};
use crate::risk::{self, clamp_score, RiskLevel, ScoreBand};

use super::{format_date, format_timestamp, truncate_chars};

/// Width of the stacked timeline bar in characters.
const TIMELINE_BAR_WIDTH: usize = 40;

/// Display one scan verdict: tier banner, rationale, verification steps,
/// suggested actions, and the collapsed technical details.
pub fn display_scan_result(result: &ScanResult) {
    let tier = risk::classify(&result.risk_level);
    let score = clamp_score(result.score);

    println!();
    println!(
        "  {} {}",
        tier.traffic_light,
        tier.level.colorize(tier.label).bold()
    );
    println!("  {}", tier.summary);
    println!();

    println!("  {}", "Why this might be a scam".bold());
    println!("  {}", tier.rationale);
    println!();

    println!("  {}", "How to check if this email is real:".bold());
    for (i, step) in tier.verification_steps.iter().enumerate() {
        println!("    {}. {}", i + 1, step);
    }
    println!();

    if tier.advise_delete {
        println!("  {} Delete this email from your inbox immediately.", "!!".red().bold());
    }
    if tier.offer_report {
        println!(
            "  {} Report it to IT: rerun with {}",
            "!".yellow(),
            "--report".bold()
        );
    }
    if tier.level == RiskLevel::Low {
        println!(
            "  {} Even safe-looking emails can be dangerous. Verify unusual requests!",
            "~".yellow()
        );
    }
    println!();

    println!("  {}", "Technical details".bold());
    if !result.summary.is_empty() {
        println!("    Key findings:");
        for item in &result.summary {
            println!("      • {item}");
        }
    }
    if !result.recommendations.is_empty() {
        println!("    Recommendations:");
        for item in &result.recommendations {
            println!("      • {item}");
        }
    }

    let signals = &result.signals;
    println!("    Domain:      {}", signals.from_domain);
    println!("    MX records:  {}", check_mark(signals.mx_present));
    println!("    SPF:         {}", check_mark(signals.spf_present));
    println!("    DMARC:       {}", check_mark(signals.dmarc_present));
    println!("    DKIM:        {}", check_mark(signals.dkim_present));
    println!(
        "    Risk score:  {}",
        score_badge(score as f64, &format!("{score}/100"))
    );
    match signals.ai_risk_score() {
        Some(ai) => println!(
            "    AI analysis: {}",
            score_badge(ai as f64, &format!("{ai}/100 risk"))
        ),
        None => println!("    AI analysis: {}", "not evaluated".dimmed()),
    }
}

/// Plain-text shareable summary of a scan result, clipboard-ready.
pub fn render_share_text(result: &ScanResult) -> String {
    let score = clamp_score(result.score);
    let mut out = String::new();

    out.push_str("Phishscope Email Security Scan\n");
    out.push_str(&"━".repeat(40));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Risk Level: {}\n",
        result.risk_level.to_uppercase()
    ));
    out.push_str(&format!("Risk Score: {score}/100\n\n"));

    out.push_str("Key Findings:\n");
    for (i, item) in result.summary.iter().enumerate() {
        out.push_str(&format!("{}. {item}\n", i + 1));
    }
    out.push('\n');

    out.push_str("Recommendations:\n");
    for item in &result.recommendations {
        out.push_str(&format!("• {item}\n"));
    }
    out.push('\n');

    let signals = &result.signals;
    out.push_str("Technical Signals:\n");
    out.push_str(&format!("• Domain: {}\n", signals.from_domain));
    out.push_str(&format!("• MX Records: {}\n", present(signals.mx_present)));
    out.push_str(&format!("• SPF: {}\n", present(signals.spf_present)));
    out.push_str(&format!("• DMARC: {}\n", present(signals.dmarc_present)));
    out.push_str(&format!("• DKIM: {}\n", present(signals.dkim_present)));
    if let Some(ai) = signals.ai_risk_score() {
        out.push_str(&format!("• AI Risk Score: {ai}/100\n"));
    }
    out.push_str("\nScanned by Phishscope\n");
    out
}

/// Display the setup/status probe fields.
pub fn display_server_info(info: &ServerInfo) {
    println!("Server: reachable");
    println!(
        "  Setup:          {}",
        if info.setup_required {
            "required".yellow().to_string()
        } else {
            "complete".green().to_string()
        }
    );
    println!(
        "  Admin password: {}",
        if info.password_set {
            "set".green().to_string()
        } else {
            "not set".yellow().to_string()
        }
    );
}

/// Display the admin scan history table.
pub fn display_scans_table(scans: &[ScanRecord]) {
    if scans.is_empty() {
        println!("No scans match the current filters.");
        return;
    }

    println!(
        "  {:<32} {:<24} {:>5}  {:<8}  {}",
        "Sender".dimmed(),
        "Domain".dimmed(),
        "Score".dimmed(),
        "Risk".dimmed(),
        "Date".dimmed(),
    );
    println!("  {}", "-".repeat(88).dimmed());

    for scan in scans {
        let level = RiskLevel::parse(&scan.risk_level);
        println!(
            "  {:<32} {:<24} {:>5}  {:<8}  {}",
            truncate_chars(&scan.sender, 30),
            truncate_chars(&scan.from_domain, 22),
            scan.score,
            level.colorize(level.as_str()),
            format_timestamp(&scan.created_at),
        );
    }
    println!("\n  {} scans", scans.len());
}

/// Display the admin report history table.
pub fn display_reports_table(reports: &[ReportRecord]) {
    if reports.is_empty() {
        println!("No reports submitted yet.");
        return;
    }

    println!(
        "  {:<32} {:<24} {:<30}  {}",
        "Sender".dimmed(),
        "Domain".dimmed(),
        "Comment".dimmed(),
        "Date".dimmed(),
    );
    println!("  {}", "-".repeat(100).dimmed());

    for report in reports {
        let comment = report.user_comment.as_deref().unwrap_or("-");
        println!(
            "  {:<32} {:<24} {:<30}  {}",
            truncate_chars(&report.sender, 30),
            truncate_chars(&report.from_domain, 22),
            truncate_chars(comment, 28),
            format_timestamp(&report.created_at),
        );
    }
    println!("\n  {} reports", reports.len());
}

/// Display aggregate statistics: totals, risk distribution, top domains.
pub fn display_stats(stats: &Stats) {
    println!("  Total scans:   {}", stats.total_scans);
    println!("  Total reports: {}", stats.total_reports);

    println!("\n  {}", "Risk distribution".bold());
    for level in RiskLevel::ALL {
        let count = stats
            .risk_distribution
            .get(level.as_str())
            .copied()
            .unwrap_or(0);
        println!(
            "    {:<8} {}",
            level.colorize(level.as_str()),
            count
        );
    }

    if !stats.top_domains.is_empty() {
        println!("\n  {}", "Top domains".bold());
        println!(
            "    {:<28} {:>6}  {:>9}",
            "Domain".dimmed(),
            "Scans".dimmed(),
            "Avg score".dimmed()
        );
        for domain in &stats.top_domains {
            println!(
                "    {:<28} {:>6}  {:>9}",
                truncate_chars(&domain.domain, 26),
                domain.count,
                score_badge(domain.avg_score, &format!("{:.1}", domain.avg_score)),
            );
        }
    }
}

/// Display the scan activity timeline as stacked proportional bars.
pub fn display_timeline(rows: &[TimelineRow]) {
    println!("  {}", "Scan activity timeline".bold());
    if rows.is_empty() {
        println!("  No scan data available for this period");
        return;
    }

    for row in rows {
        if row.is_empty() {
            println!("  {}  {}", row.date, "no scans".dimmed());
            continue;
        }

        let mut bar = String::new();
        for segment in &row.segments {
            // Proportional width, at least one cell per non-zero segment.
            let cells = ((segment.width_percent / 100.0) * TIMELINE_BAR_WIDTH as f64).round()
                as usize;
            let block = "█".repeat(cells.max(1));
            bar.push_str(&segment.tier.colorize(&block).to_string());
        }
        println!("  {}  {bar} {}", row.date, row.total);
    }

    println!(
        "\n  {} safe  {} low  {} medium  {} high",
        "■".green(),
        "■".yellow(),
        "■".bright_red(),
        "■".red()
    );
}

/// Display recent high-risk scans with their first finding.
pub fn display_high_risk(scans: &[ScanRecord]) {
    println!("\n  {}", "Recent high-risk scans".bold());
    if scans.is_empty() {
        println!("  No high-risk scans in this period");
        return;
    }

    for scan in scans {
        let level = RiskLevel::parse(&scan.risk_level);
        println!(
            "  {:<32} {:<8} {:>5}  {}",
            truncate_chars(&scan.sender, 30),
            level.colorize(&scan.risk_level.to_uppercase()),
            score_badge(scan.score as f64, &scan.score.to_string()),
            format_date(&scan.created_at).dimmed(),
        );
        if let Some(first) = scan.summary.first() {
            println!("    {}", truncate_chars(first, 90).dimmed());
        }
    }
}

/// Display server-ranked trending domains with render-time rank indexes.
pub fn display_trending(ranked: &[RankedDomain<'_>]) {
    println!("\n  {}", "Trending domains".bold());
    if ranked.is_empty() {
        println!("  No trending domains in this period");
        return;
    }

    for entry in ranked {
        let trend = entry.trend;
        println!(
            "  #{:<3} {:<28} {:>4} scans  avg {}  last {}",
            entry.rank,
            truncate_chars(&trend.domain, 26),
            trend.scan_count,
            score_badge(trend.avg_score, &format!("{:.1}", trend.avg_score)),
            format_date(&trend.last_scan).dimmed(),
        );
    }
}

// --- Helpers ---

fn check_mark(ok: bool) -> String {
    if ok {
        "✓ Present".green().to_string()
    } else {
        "✗ Missing".red().to_string()
    }
}

fn present(ok: bool) -> &'static str {
    if ok {
        "Present"
    } else {
        "Missing"
    }
}

/// Color a numeric display by its severity band — not by risk tier.
fn score_badge(score: f64, text: &str) -> String {
    ScoreBand::from_score(score).colorize(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AiAnalysis, Signals};

    fn sample_result() -> ScanResult {
        ScanResult {
            risk_level: "high".to_string(),
            score: 85,
            summary: vec!["SPF check failed".to_string()],
            recommendations: vec!["Do not click links".to_string()],
            signals: Signals {
                from_domain: "paypa1-security.com".to_string(),
                mx_present: true,
                spf_present: false,
                dmarc_present: false,
                dkim_present: false,
                ai_analysis: Some(AiAnalysis { ai_risk_score: 92 }),
            },
        }
    }

    #[test]
    fn test_share_text_includes_ai_line_when_scored() {
        let text = render_share_text(&sample_result());
        assert!(text.contains("Risk Level: HIGH"));
        assert!(text.contains("Risk Score: 85/100"));
        assert!(text.contains("1. SPF check failed"));
        assert!(text.contains("• AI Risk Score: 92/100"));
    }

    #[test]
    fn test_share_text_omits_ai_line_when_absent() {
        let mut result = sample_result();
        result.signals.ai_analysis = None;
        let text = render_share_text(&result);
        assert!(!text.contains("AI Risk Score"));
    }

    #[test]
    fn test_share_text_clamps_score() {
        let mut result = sample_result();
        result.score = 250;
        let text = render_share_text(&result);
        assert!(text.contains("Risk Score: 100/100"));
    }
}
