//! Foreground auto-refresh loop.
//!
//! Starts the scheduler and acts as its first observer: every completion
//! notification triggers a re-fetch of the device list, exactly how an
//! attached view is expected to react. Runs until Ctrl-C.

use std::sync::Arc;

use chrono::Utc;
use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;

use genie_api::GenieClient;
use genie_core::{AutoRefreshScheduler, Device, RefreshEvent, RunOutcome, RunSummary};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::devices;

pub async fn handle(
    client: &Arc<GenieClient>,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scheduler_config = config::scheduler_config(global, &args);
    let interval_mins = scheduler_config.interval.as_secs() / 60;

    let color = output::should_color(&global.color);
    let scheduler = AutoRefreshScheduler::new(Arc::clone(client), scheduler_config);
    let mut events = scheduler.events();
    scheduler.start();

    if !global.quiet {
        eprintln!("Auto refresh running every {interval_mins} min; press Ctrl-C to stop");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                scheduler.stop();
                if !global.quiet {
                    eprintln!("Stopping auto refresh");
                }
                break;
            }
            event = events.recv() => match event {
                Ok(RefreshEvent::Completed { summary, timestamp, errors }) => {
                    if !global.quiet {
                        let line = summarize(&summary);
                        if color {
                            eprintln!("[{}] {}", timestamp.format("%H:%M:%S"), line.green());
                        } else {
                            eprintln!("[{}] {line}", timestamp.format("%H:%M:%S"));
                        }
                        for error in &errors {
                            eprintln!("  warning: {error}");
                        }
                    }
                    render_device_list(client, global).await;
                }
                Ok(RefreshEvent::Error { message }) => {
                    if !global.quiet {
                        if color {
                            eprintln!("{}", format!("Refresh run failed: {message}").red());
                        } else {
                            eprintln!("Refresh run failed: {message}");
                        }
                    }
                    // Some task creations may still have landed; re-fetch anyway.
                    render_device_list(client, global).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "missed refresh notifications");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    Ok(())
}

fn summarize(summary: &RunSummary) -> String {
    let mut parts = Vec::new();

    if let Some(ref outcome) = summary.refresh_all {
        parts.push(match outcome {
            RunOutcome::Completed(r) => {
                format!("refreshed {}/{}", r.success_count, r.total_devices)
            }
            RunOutcome::Failed(_) => "refresh failed".into(),
        });
    }
    if let Some(ref outcome) = summary.force_connection {
        parts.push(match outcome {
            RunOutcome::Completed(r) => format!(
                "reconnect requests {}/{} offline",
                r.success_count,
                r.offline_devices.unwrap_or(0)
            ),
            RunOutcome::Failed(_) => "reconnect failed".into(),
        });
    }

    if parts.is_empty() {
        "no operations enabled".into()
    } else {
        parts.join(", ")
    }
}

/// Re-fetch and render the device list, the way any attached view would.
async fn render_device_list(client: &Arc<GenieClient>, global: &GlobalOpts) {
    match client.list_devices().await {
        Ok(documents) => {
            let projected: Vec<Device> = documents.iter().map(Device::from).collect();
            let online = projected
                .iter()
                .filter(|d| d.status_at(Utc::now()).is_online())
                .count();
            let out = devices::device_table(&projected, global);
            output::print_output(&out, global.quiet);
            if !global.quiet {
                eprintln!("{online}/{} devices online", projected.len());
            }
        }
        Err(err) => {
            if !global.quiet {
                eprintln!("Could not reload device list: {err}");
            }
        }
    }
}
