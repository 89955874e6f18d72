// ── Auto-refresh polling scheduler ──
//
// Owns the single mutable orchestration status and the recurring trigger.
// Observers read status through a `watch` receiver and react to run
// completion through a `broadcast` subscription; nothing outside this module
// mutates the status. A run failure degrades to entries in the status error
// list and the schedule continues on its next tick.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use genie_api::GenieClient;

use crate::refresh::{self, RefreshRunResult};

const EVENT_CHANNEL_SIZE: usize = 16;

// ── Configuration ────────────────────────────────────────────────────

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct AutoRefreshConfig {
    /// Master switch; `start()` is a no-op when disabled.
    pub enabled: bool,
    /// Recurring trigger cadence.
    pub interval: Duration,
    /// Dispatch the all-device parameter refresh each run.
    pub refresh_online_devices: bool,
    /// Dispatch connection requests to offline devices each run.
    pub force_connection_offline_devices: bool,
    /// Delay before the immediate run after `start()`, giving the caller's
    /// presentation a moment to come up first.
    pub startup_delay: Duration,
}

impl AutoRefreshConfig {
    /// Config with the given cadence in minutes and everything else default.
    pub fn with_interval_minutes(minutes: u64) -> Self {
        Self {
            interval: Duration::from_secs(minutes * 60),
            ..Self::default()
        }
    }
}

impl Default for AutoRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(600),
            refresh_online_devices: true,
            force_connection_offline_devices: true,
            startup_delay: Duration::from_secs(1),
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// Snapshot of the scheduler's orchestration state.
///
/// Owned exclusively by the scheduler; consumers hold a watch receiver.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AutoRefreshStatus {
    /// True strictly while a run is in flight.
    pub is_running: bool,
    pub last_refresh_at: Option<DateTime<Utc>>,
    pub next_refresh_at: Option<DateTime<Utc>>,
    /// Completed runs, successful or partially failed.
    pub refresh_count: u64,
    pub last_result: Option<RunSummary>,
    /// Sub-operation failure messages from the most recent run; replaced,
    /// never appended, each run.
    pub errors: Vec<String>,
}

/// The per-run results of both sub-operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_all: Option<RunOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_connection: Option<RunOutcome>,
}

/// Result of one sub-operation: the aggregate, or the failure placeholder
/// recorded when the operation could not run at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(RefreshRunResult),
    Failed(String),
}

impl RunOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Notification published after each run for independent observers
/// (a device list view re-fetches its own data on `Completed`).
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    Completed {
        summary: RunSummary,
        timestamp: DateTime<Utc>,
        errors: Vec<String>,
    },
    /// Every attempted sub-operation failed.
    Error { message: String },
}

// ── Scheduler ────────────────────────────────────────────────────────

/// Recurring auto-refresh driver.
///
/// Cheaply cloneable via `Arc`; all clones share one status and one event
/// channel. Must be used within a tokio runtime.
#[derive(Clone)]
pub struct AutoRefreshScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    client: Arc<GenieClient>,
    config: AutoRefreshConfig,
    status: watch::Sender<AutoRefreshStatus>,
    events: broadcast::Sender<RefreshEvent>,
    /// Serializes runs: a manual run issued while a scheduled run is in
    /// flight waits instead of racing on the shared status.
    run_gate: tokio::sync::Mutex<()>,
    /// Cancellation token of the active schedule, if any.
    schedule: Mutex<Option<CancellationToken>>,
}

impl AutoRefreshScheduler {
    pub fn new(client: Arc<GenieClient>, config: AutoRefreshConfig) -> Self {
        let (status, _) = watch::channel(AutoRefreshStatus::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Self {
            inner: Arc::new(SchedulerInner {
                client,
                config,
                status,
                events,
                run_gate: tokio::sync::Mutex::new(()),
                schedule: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &AutoRefreshConfig {
        &self.inner.config
    }

    /// Current status snapshot.
    pub fn status(&self) -> AutoRefreshStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<AutoRefreshStatus> {
        self.inner.status.subscribe()
    }

    /// Subscribe to run completion/error notifications.
    pub fn events(&self) -> broadcast::Receiver<RefreshEvent> {
        self.inner.events.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the recurring schedule.
    ///
    /// Any prior schedule is cancelled first, so repeated calls never stack
    /// timers. One run fires after the configured startup delay,
    /// independent of the recurring cadence; thereafter one run per
    /// interval tick. No-op when the config is disabled.
    pub fn start(&self) {
        self.cancel_schedule();

        if !self.inner.config.enabled {
            debug!("auto refresh disabled; not scheduling");
            return;
        }

        info!(
            interval_secs = self.inner.config.interval.as_secs(),
            "starting auto refresh"
        );

        let token = CancellationToken::new();
        tokio::spawn(schedule_task(self.clone(), token.clone()));
        *self.lock_schedule() = Some(token);
    }

    /// Cancel the recurring schedule.
    ///
    /// Idempotent. Does not cancel an in-flight run: a run that already
    /// started completes and records its result even after this returns.
    pub fn stop(&self) {
        self.cancel_schedule();
        self.inner.status.send_modify(|status| {
            status.is_running = false;
            status.next_refresh_at = None;
        });
        debug!("auto refresh stopped");
    }

    /// Trigger one run immediately, outside the recurring cadence.
    ///
    /// Runs the same path as a scheduled tick; the recurring schedule keeps
    /// its own phase, but `next_refresh_at` is recomputed from the run's
    /// completion like any other run.
    pub async fn run_now(&self) {
        debug!("manual refresh triggered");
        self.run().await;
    }

    fn cancel_schedule(&self) {
        if let Some(token) = self.lock_schedule().take() {
            token.cancel();
        }
    }

    fn lock_schedule(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.inner
            .schedule
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // ── Run ──────────────────────────────────────────────────────

    /// One refresh run. Never fails: sub-operation errors are downgraded to
    /// status entries and a placeholder outcome.
    async fn run(&self) {
        let _gate = self.inner.run_gate.lock().await;
        let config = &self.inner.config;

        let started = Utc::now();
        info!("starting device refresh run");
        self.inner.status.send_modify(|status| {
            status.is_running = true;
            status.last_refresh_at = Some(started);
            status.errors.clear();
        });

        let mut summary = RunSummary::default();
        let mut errors = Vec::new();

        if config.refresh_online_devices {
            summary.refresh_all = Some(
                match refresh::refresh_all(&self.inner.client).await {
                    Ok(result) => RunOutcome::Completed(result),
                    Err(err) => {
                        let message = format!("device refresh failed: {err}");
                        warn!(error = %err, "device refresh failed");
                        errors.push(message.clone());
                        RunOutcome::Failed(message)
                    }
                },
            );
        }

        if config.force_connection_offline_devices {
            summary.force_connection = Some(
                match refresh::reconnect_offline(&self.inner.client).await {
                    Ok(result) => RunOutcome::Completed(result),
                    Err(err) => {
                        let message = format!("connection requests failed: {err}");
                        warn!(error = %err, "connection requests failed");
                        errors.push(message.clone());
                        RunOutcome::Failed(message)
                    }
                },
            );
        }

        let attempted = [&summary.refresh_all, &summary.force_connection]
            .into_iter()
            .flatten()
            .count();
        let all_failed = attempted > 0 && errors.len() == attempted;

        let finished = Utc::now();
        let next_refresh_at = config
            .enabled
            .then(|| finished + interval_delta(config.interval));

        self.inner.status.send_modify(|status| {
            status.is_running = false;
            status.refresh_count += 1;
            status.last_result = Some(summary.clone());
            status.errors.clone_from(&errors);
            status.next_refresh_at = next_refresh_at;
        });

        let event = if all_failed {
            RefreshEvent::Error {
                message: errors.join("; "),
            }
        } else {
            RefreshEvent::Completed {
                summary,
                timestamp: finished,
                errors,
            }
        };
        let _ = self.inner.events.send(event);

        info!("device refresh run complete");
    }
}

/// Drive the schedule: one startup-delayed run, then one run per interval
/// tick, until cancelled. Cancellation is only observed between runs, so an
/// in-flight run always completes.
async fn schedule_task(scheduler: AutoRefreshScheduler, cancel: CancellationToken) {
    let config = scheduler.inner.config.clone();

    let mut interval = tokio::time::interval(config.interval);
    interval.tick().await; // consume the immediate first tick

    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        () = tokio::time::sleep(config.startup_delay) => scheduler.run().await,
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => scheduler.run().await,
        }
    }
}

/// Convert the configured interval into a chrono delta for timestamp math.
fn interval_delta(interval: Duration) -> TimeDelta {
    TimeDelta::from_std(interval).unwrap_or_else(|_| TimeDelta::seconds(600))
}
