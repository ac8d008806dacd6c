use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use phishscope::admin::{AdminQuery, Tab, TimeRange};
use phishscope::api::client::HttpGateway;
use phishscope::api::traits::{ApiGateway, LoginOutcome};
use phishscope::api::types::ExportKind;
use phishscope::config::Config;
use phishscope::output::terminal;
use phishscope::risk::RiskLevel;
use phishscope::workflow::disclaimer::{DisclaimerStore, DISCLAIMER_TEXT};
use phishscope::analytics;
use phishscope::workflow::{ScanWorkflow, REPORT_CONFIRM_DELAY};

/// Phishscope: email phishing triage from the terminal.
///
/// Submits suspicious emails to the scoring service and renders the verdict
/// in plain language, with an admin view over scan history and analytics.
#[derive(Parser)]
#[command(name = "phishscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an email and show the risk verdict
    Scan {
        /// The sender address, e.g. security@paypa1-alerts.com
        sender: String,

        /// Raw email headers (inline)
        #[arg(long, conflicts_with = "headers_file")]
        headers: Option<String>,

        /// Read raw email headers from a file
        #[arg(long)]
        headers_file: Option<PathBuf>,

        /// Email body text (inline)
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the email body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Also report this email to the admin queue after scanning
        #[arg(long)]
        report: bool,

        /// Free-text note attached to the report
        #[arg(long, requires = "report")]
        comment: Option<String>,

        /// Accept the one-time disclaimer without the interactive prompt
        #[arg(long)]
        accept_disclaimer: bool,

        /// Print a plain-text shareable summary after the verdict
        #[arg(long)]
        share: bool,
    },

    /// Check server reachability and setup state
    Status,

    /// Admin views: scan history, reports, stats, analytics, export
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List recent scans
    Scans {
        /// Only show scans at this risk level (safe, low, medium, high)
        #[arg(long)]
        risk: Option<String>,

        /// Substring filter on the sender domain
        #[arg(long)]
        domain: Option<String>,

        /// Max rows to fetch (default: 100)
        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// List user-submitted reports
    Reports {
        /// Max rows to fetch (default: 100)
        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// Show aggregate statistics
    Stats,

    /// Show the activity timeline, high-risk scans, and trending domains
    Analytics {
        /// Time window in days (7, 14, 30, or 90)
        #[arg(long, default_value = "7")]
        days: u32,
    },

    /// Download a CSV export of scans or reports
    Export {
        /// Record type to export (scans or reports)
        #[arg(long, default_value = "scans", value_parser = ["scans", "reports"])]
        kind: String,

        /// Write the CSV here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Set the admin password on the server
    SetPassword,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("phishscope=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let gateway = HttpGateway::new(&config.api_url)?;

    match cli.command {
        Commands::Scan {
            sender,
            headers,
            headers_file,
            body,
            body_file,
            report,
            comment,
            accept_disclaimer,
            share,
        } => {
            let headers = read_input(headers, headers_file)?;
            let body = read_input(body, body_file)?;

            let store = DisclaimerStore::new(&config.state_dir);
            let mut wf = ScanWorkflow::new(store);

            if !wf.disclaimer_accepted() {
                println!("{DISCLAIMER_TEXT}\n");
                if accept_disclaimer || prompt("Type 'accept' to continue: ")? == "accept" {
                    wf.accept_disclaimer()?;
                } else {
                    println!("Not accepted. Nothing scanned.");
                    return Ok(());
                }
            }

            // Advisory only: a dead server here still lets the scan attempt run
            // and produce its own error.
            wf.probe_setup(&gateway).await;
            if wf.setup_required() == Some(true) {
                println!(
                    "{}",
                    "Note: the server reports it still needs setup — an admin should run \
                     `phishscope admin set-password`."
                        .yellow()
                );
            }

            let spinner = scan_spinner("Scanning email...");
            wf.submit_scan(&gateway, &sender, &headers, &body).await;
            spinner.finish_and_clear();

            if let Some(err) = wf.take_error() {
                println!("{}", err.to_string().red());
                return Ok(());
            }
            let Some(result) = wf.result() else {
                return Ok(());
            };

            terminal::display_scan_result(result);

            if share {
                println!("\n{}", terminal::render_share_text(result));
            }

            if report {
                wf.open_report();
                wf.set_report_comment(comment.as_deref().unwrap_or(""));

                let spinner = scan_spinner("Submitting report...");
                wf.submit_report(&gateway).await;
                spinner.finish_and_clear();

                match wf.take_error() {
                    Some(err) => println!("{}", err.to_string().red()),
                    None => {
                        println!("{}", "Report submitted. Thank you!".green().bold());
                        tokio::time::sleep(REPORT_CONFIRM_DELAY).await;
                        wf.acknowledge_report();
                    }
                }
            }
        }

        Commands::Status => {
            println!("API endpoint: {}", config.api_url);
            match gateway.server_info().await {
                Ok(info) => terminal::display_server_info(&info),
                Err(e) => println!("Server: {} ({e:#})", "unreachable".red()),
            }
            let store = DisclaimerStore::new(&config.state_dir);
            println!(
                "Disclaimer:   {}",
                if store.is_accepted() {
                    "accepted"
                } else {
                    "not yet accepted"
                }
            );
        }

        Commands::Admin { command } => {
            if let AdminCommands::SetPassword = command {
                return set_password(&gateway).await;
            }

            let Some(mut admin) = admin_login(&gateway, &config).await? else {
                return Ok(());
            };

            match command {
                AdminCommands::Scans {
                    risk,
                    domain,
                    limit,
                } => {
                    let risk = match risk.as_deref() {
                        Some(raw) => Some(parse_risk_filter(raw)?),
                        None => None,
                    };
                    admin.set_risk_filter(risk);
                    admin.set_domain_filter(domain);
                    admin.set_limit(limit);
                    admin.select_tab(Tab::Scans);
                    admin.refresh(&gateway).await?;
                    display_tab(&admin);
                }

                AdminCommands::Reports { limit } => {
                    admin.set_limit(limit);
                    admin.select_tab(Tab::Reports);
                    admin.refresh(&gateway).await?;
                    display_tab(&admin);
                }

                AdminCommands::Stats => {
                    admin.select_tab(Tab::Stats);
                    admin.refresh(&gateway).await?;
                    display_tab(&admin);
                }

                AdminCommands::Analytics { days } => {
                    let Some(range) = TimeRange::from_days(days) else {
                        anyhow::bail!("Invalid --days {days}: expected 7, 14, 30, or 90");
                    };
                    admin.set_time_range(range);

                    let bundle = admin.fetch_analytics(&gateway).await?;
                    println!("Last {} days\n", days);
                    let rows = analytics::build_timeline_series(&bundle.timeline.timeline);
                    terminal::display_timeline(&rows);
                    terminal::display_high_risk(&bundle.high_risk);
                    let ranked = analytics::rank_trending_domains(&bundle.trending);
                    terminal::display_trending(&ranked);
                }

                AdminCommands::Export { kind, out } => {
                    let kind = match kind.as_str() {
                        "reports" => ExportKind::Reports,
                        _ => ExportKind::Scans,
                    };
                    let csv = admin.export(&gateway, kind).await?;
                    match out {
                        Some(path) => {
                            fs::write(&path, &csv)?;
                            println!("Export written to {}", path.display());
                        }
                        None => print!("{csv}"),
                    }
                }

                AdminCommands::SetPassword => unreachable!("handled above"),
            }
        }
    }

    Ok(())
}

/// Resolve inline text vs a file path, defaulting to empty.
fn read_input(inline: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn parse_risk_filter(raw: &str) -> Result<RiskLevel> {
    let level = RiskLevel::parse(raw);
    // RiskLevel::parse falls back to Safe for unknown input; for an explicit
    // filter argument that silent fallback would surprise, so reject instead.
    if level == RiskLevel::Safe && raw.trim().to_ascii_lowercase() != "safe" {
        anyhow::bail!("Invalid --risk {raw:?}: expected safe, low, medium, or high");
    }
    Ok(level)
}

fn scan_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Authenticate the admin session. Returns None (after printing the denial)
/// when the password is rejected; transport errors propagate.
async fn admin_login(gateway: &HttpGateway, config: &Config) -> Result<Option<AdminQuery>> {
    let password = match config.admin_password.clone() {
        Some(p) => p,
        None => prompt("Admin password: ")?,
    };

    let mut admin = AdminQuery::new();
    match admin.login(gateway, &password).await? {
        LoginOutcome::Accepted => {
            info!("Admin login accepted");
            Ok(Some(admin))
        }
        LoginOutcome::Denied(detail) => {
            println!("{}", detail.red());
            Ok(None)
        }
    }
}

fn display_tab(admin: &AdminQuery) {
    match admin.data() {
        Some(phishscope::admin::TabData::Scans(rows)) => terminal::display_scans_table(rows),
        Some(phishscope::admin::TabData::Reports(rows)) => terminal::display_reports_table(rows),
        Some(phishscope::admin::TabData::Stats(stats)) => terminal::display_stats(stats),
        None => println!("No data."),
    }
}

/// Interactive password setup with the same minimum-length rule the server
/// enforces, checked locally first for a faster error.
async fn set_password(gateway: &HttpGateway) -> Result<()> {
    let password = prompt("New admin password (min 4 characters): ")?;
    if password.chars().count() < 4 {
        anyhow::bail!("Password must be at least 4 characters");
    }
    let confirm = prompt("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    gateway.set_password(&password).await?;
    println!("{}", "Admin password set.".green().bold());
    Ok(())
}
