//! # RollCall — daily report roll-call bot
//!
//! Reminds a group chat to post its daily report, records who did, and
//! sends the manager a morning list of who did not.
//!
//! Usage:
//!   rollcall                          # Run with env / ~/.rollcall/config.toml
//!   rollcall --config ./rollcall.toml # Explicit config file
//!   rollcall --check                  # Validate config, print schedule, exit

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rollcall_bot::{ReportBot, ReportHandler, ReportRule};
use rollcall_channels::{TelegramChannel, TelegramConfig};
use rollcall_core::format::Templates;
use rollcall_core::traits::NotificationSink;
use rollcall_core::{ReportTracker, RollCallConfig};
use rollcall_scheduler::{DailyJobs, SchedulerEngine};

#[derive(Parser)]
#[command(
    name = "rollcall",
    version,
    about = "📋 RollCall — daily report tracker for group chats"
)]
struct Cli {
    /// Config file (TOML). Environment variables override its values.
    #[arg(short, long)]
    config: Option<String>,

    /// Validate configuration, print roster and next fire times, then exit
    #[arg(long)]
    check: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "rollcall=debug,rollcall_core=debug,rollcall_bot=debug,rollcall_scheduler=debug,rollcall_channels=debug"
    } else {
        "rollcall=info,rollcall_core=info,rollcall_bot=info,rollcall_scheduler=info,rollcall_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Configuration errors are fatal
    let config_path = cli.config.as_deref().map(expand_path);
    let config = RollCallConfig::load(config_path.as_deref())?;
    config.validate()?;
    let roster = Arc::new(config.build_roster()?);
    let engine = SchedulerEngine::from_config(&config)?;

    if cli.check {
        println!("📋 RollCall v{} — configuration OK\n", env!("CARGO_PKG_VERSION"));
        println!("   👥 Roster ({}):", roster.len());
        for (id, name) in roster.names() {
            println!("      {id:>12}  {name}");
        }
        println!("   🏷️  Marker:   {}", config.report_marker);
        println!("   🌍 Timezone: {}", engine.timezone());
        for (kind, next) in engine.next_runs(chrono::Utc::now()) {
            match next {
                Some(at) => println!("   ⏰ {kind:<8} {at}"),
                None => println!("   ⏰ {kind:<8} never"),
            }
        }
        return Ok(());
    }

    // Transport — verify the token before anything is scheduled
    let telegram = TelegramChannel::new(TelegramConfig::from_config(&config));
    let me = telegram
        .get_me()
        .await
        .map_err(|e| anyhow::anyhow!("Bot token check failed: {e}"))?;
    tracing::info!(
        "Telegram bot: @{} ({})",
        me.username.as_deref().unwrap_or("unknown"),
        me.first_name
    );
    let sink: Arc<dyn NotificationSink> = Arc::new(telegram.clone());

    // Core state, shared by the inbound loop and the jobs
    let tracker = Arc::new(ReportTracker::new(roster));
    let templates = Arc::new(Templates::from_config(&config));

    let jobs = Arc::new(DailyJobs::new(
        tracker.clone(),
        sink.clone(),
        templates.clone(),
        config.group_chat(),
        config.manager_chat(),
    ));
    let timers = engine.spawn(jobs);

    let mut handler = ReportHandler::new(tracker, templates, ReportRule::from_config(&config));
    if let Some(username) = me.username {
        handler = handler.with_bot_username(username);
    }
    let bot = ReportBot::new(Arc::new(handler), sink);

    tracing::info!(
        "📋 RollCall started: group {}, manager {}, {} on the roster",
        config.group_id,
        config.manager_id,
        config.roster.len()
    );

    tokio::select! {
        _ = bot.run(telegram.start_polling()) => {
            tracing::warn!("Inbound stream ended, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl-C received, shutting down");
        }
    }

    for timer in timers {
        timer.abort();
    }
    Ok(())
}
