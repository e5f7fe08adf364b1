//! Commands for watching the store the replication backend writes to.

use chrono::Local;
use clap::{Args, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use super::OutputFormat;
use crate::config::Config;
use crate::db::MealRepository;
use crate::sync::SyncMonitor;

#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    pub command: SyncSubcommand,
}

#[derive(Subcommand)]
pub enum SyncSubcommand {
    /// Re-read the store once and report what it holds
    Check {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Keep checking in the background and print every refresh
    Watch {
        /// Seconds between checks (default: sync.check_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl SyncCommand {
    pub async fn run(
        &self,
        repo: &MealRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SyncSubcommand::Check { format } => {
                let monitor = SyncMonitor::new(config.sync_interval());
                monitor.start(Arc::new(repo.clone()));
                let trigger = monitor.check_for_updates().await;
                monitor.stop();
                let trigger = trigger?;

                let meal_count = repo.list().await?.len();
                let last_sync = monitor.last_sync_date();

                match format {
                    OutputFormat::Json => {
                        let status = serde_json::json!({
                            "state": monitor.state().to_string(),
                            "refresh_trigger": trigger,
                            "last_sync": last_sync,
                            "meal_count": meal_count,
                        });
                        println!("{}", serde_json::to_string_pretty(&status)?);
                    }
                    OutputFormat::Text => {
                        println!("Store is readable: {} meal(s)", meal_count);
                        if let Some(at) = last_sync {
                            println!(
                                "Last check: {}",
                                at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
                            );
                        }
                    }
                }
                Ok(())
            }

            SyncSubcommand::Watch { interval } => {
                let interval = match interval {
                    Some(0) => return Err("--interval must be at least 1".into()),
                    Some(secs) => Duration::from_secs(*secs),
                    None => config.sync_interval(),
                };

                let monitor = SyncMonitor::new(interval);
                let mut ticks = monitor.subscribe();
                monitor.start(Arc::new(repo.clone()));

                println!(
                    "Watching {} every {}s. Press Ctrl-C to stop.",
                    config.database_path.value.display(),
                    interval.as_secs()
                );

                loop {
                    tokio::select! {
                        tick = ticks.recv() => match tick {
                            Ok(tick) => println!(
                                "[{}] refresh #{}: {} meal(s)",
                                tick.last_sync.with_timezone(&Local).format("%H:%M:%S"),
                                tick.refresh_trigger,
                                tick.meal_count
                            ),
                            Err(RecvError::Lagged(missed)) => {
                                tracing::debug!("Skipped {} refresh ticks", missed);
                            }
                            Err(RecvError::Closed) => break,
                        },
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }

                monitor.stop();
                Ok(())
            }
        }
    }
}
