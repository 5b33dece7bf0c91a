//! Command Line Interface for the position watcher.
use anyhow::Result;
use clap::{Parser, Subcommand};
use position_watch_data::PositionSource;
use position_watch_data::providers::HyperliquidProvider;
use position_watch_domain::Snapshot;
use position_watch_execution::alerts::format::{describe_interval, short_account};
use position_watch_execution::prelude::*;
use prettytable::{Table, row};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

mod config;

use config::AppConfig;

/// Exit code when the initial fetch fails.
const EXIT_STARTUP_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "position-watch")]
#[command(about = "Watches a Hyperliquid account and alerts on opened and closed positions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the account and send alerts on position changes
    Watch {
        /// Account address (overrides ACCOUNT_ADDRESS)
        #[arg(short, long)]
        account: Option<String>,

        /// Seconds between checks (overrides POLL_INTERVAL_SECONDS)
        #[arg(short, long)]
        interval_secs: Option<u64>,

        /// Log alerts instead of sending them to Telegram
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Also log every alert sent to Telegram
        #[arg(long, default_value_t = false, conflicts_with = "dry_run")]
        echo: bool,
    },
    /// Fetch and print the current open positions once
    Positions {
        /// Account address (overrides ACCOUNT_ADDRESS)
        #[arg(short, long)]
        account: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Watch {
            account,
            interval_secs,
            dry_run,
            echo,
        } => {
            let notifier = build_notifier(&config, dry_run, echo)?;
            run_watch(&config, account.as_deref(), interval_secs, notifier).await
        }
        Commands::Positions { account } => run_positions(&config, account.as_deref()).await,
    }
}

async fn run_watch(
    config: &AppConfig,
    account: Option<&str>,
    interval_secs: Option<u64>,
    notifier: MultiNotifier,
) -> Result<ExitCode> {
    let account = config.resolve_account(account)?;
    let interval = config.resolve_interval(interval_secs)?;

    let source = Arc::new(HyperliquidProvider::new(config.hyperliquid())?);

    info!(
        account = %short_account(&account),
        interval = %describe_interval(interval),
        notifiers = notifier.len(),
        "Starting position monitor"
    );

    let monitor_config = MonitorConfig::new(account).with_poll_interval(interval);
    let mut monitor = PositionMonitor::new(source, Arc::new(notifier), monitor_config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for Ctrl-C; run until killed");
                shutdown_tx.closed().await;
            }
        }
    });

    match monitor.run(shutdown_rx).await {
        Ok(MonitorExit::Shutdown) => Ok(ExitCode::SUCCESS),
        Err(MonitorError::StartupFetch(_)) => Ok(ExitCode::from(EXIT_STARTUP_FAILED)),
        Err(e) => Err(e.into()),
    }
}

/// Console only for a dry run; Telegram otherwise, echoed to the log with `echo`.
fn build_notifier(config: &AppConfig, dry_run: bool, echo: bool) -> Result<MultiNotifier> {
    if dry_run {
        return Ok(MultiNotifier::new().with(Arc::new(ConsoleNotifier::new())));
    }

    let mut notifier =
        MultiNotifier::new().with(Arc::new(TelegramNotifier::new(config.telegram()?)?));
    if echo {
        notifier = notifier.with(Arc::new(ConsoleNotifier::new()));
    }
    Ok(notifier)
}

async fn run_positions(config: &AppConfig, account: Option<&str>) -> Result<ExitCode> {
    let account = config.resolve_account(account)?;
    let provider = HyperliquidProvider::new(config.hyperliquid())?;

    println!("📡 Fetching positions for {}...", short_account(&account));
    let snapshot = provider.fetch(&account).await?;

    print_positions(&snapshot);
    Ok(ExitCode::SUCCESS)
}

fn print_positions(snapshot: &Snapshot) {
    if snapshot.is_empty() {
        println!("No open positions.");
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["Coin", "Side", "Size", "Entry", "PnL", "Leverage"]);

    for position in snapshot.iter() {
        table.add_row(row![
            position.instrument,
            position.side().map_or("FLAT", |s| s.as_str()),
            position.size,
            position.entry_price.as_deref().unwrap_or("-"),
            position.unrealized_pnl.as_deref().unwrap_or("-"),
            position.leverage.as_deref().map_or("-".to_string(), |l| format!("{l}x")),
        ]);
    }

    table.printstd();
    println!("✅ {} open position(s)", snapshot.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(with_telegram: bool) -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "TELEGRAM_BOT_TOKEN" if with_telegram => Some("123:abc".to_string()),
            "TELEGRAM_CHAT_ID" if with_telegram => Some("-100".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_dry_run_uses_console_only() {
        let notifier = build_notifier(&config(false), true, false).unwrap();
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_telegram_notifier() {
        let notifier = build_notifier(&config(true), false, false).unwrap();
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_echo_adds_console() {
        let notifier = build_notifier(&config(true), false, true).unwrap();
        assert_eq!(notifier.len(), 2);
    }

    #[test]
    fn test_telegram_requires_credentials() {
        assert!(build_notifier(&config(false), false, false).is_err());
    }
}
