// genie-core: Domain layer between genie-api and consumers (CLI).

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod refresh;
pub mod scheduler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use error::CoreError;
pub use refresh::{DeviceOutcome, RefreshRunResult, reconnect_offline, refresh_all};
pub use scheduler::{
    AutoRefreshConfig, AutoRefreshScheduler, AutoRefreshStatus, RefreshEvent, RunOutcome,
    RunSummary,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Device, DeviceStatus, FieldValue, ONLINE_THRESHOLD_MS, ParameterRow, WifiNetworkConfig,
};
