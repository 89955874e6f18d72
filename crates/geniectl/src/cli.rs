//! Clap derive structures for the `geniectl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// geniectl -- console for GenieACS device management servers
#[derive(Debug, Parser)]
#[command(
    name = "geniectl",
    version,
    about = "Manage TR-069/TR-181 devices from the command line",
    long_about = "A console for GenieACS device management servers.\n\n\
        Lists managed CPE devices, browses parameter trees and WiFi\n\
        configuration, and queues remote-management tasks (parameter\n\
        refresh, connection requests, parameter writes) over the\n\
        northbound REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "GENIEACS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'e', env = "GENIEACS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Basic-auth username
    #[arg(long, short = 'u', env = "GENIEACS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GENIEACS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GENIEACS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GENIEACS_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage devices and bulk refresh operations
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Browse and edit device parameters
    #[command(alias = "param")]
    Params(ParamsArgs),

    /// Inspect WiFi configuration
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// Inspect queued tasks
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Inspect provisioning presets
    Presets(PresetsArgs),

    /// Run the auto-refresh scheduler in the foreground
    Watch(WatchArgs),

    /// Manage configuration profiles
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Show one device in detail
    Get {
        /// Device id
        device: String,
    },

    /// Delete a device record from the server
    #[command(alias = "rm")]
    Delete {
        /// Device id
        device: String,
    },

    /// Queue a basic-info parameter refresh for one device
    Refresh {
        /// Device id
        device: String,
    },

    /// Queue a connection request for one device
    Reconnect {
        /// Device id
        device: String,
    },

    /// Queue a reboot
    Reboot {
        /// Device id
        device: String,
    },

    /// Queue a factory reset
    FactoryReset {
        /// Device id
        device: String,
    },

    /// Queue a basic-info refresh for every device
    RefreshAll,

    /// Queue connection requests for every offline device
    ReconnectOffline,
}

// ── Params ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParamsArgs {
    #[command(subcommand)]
    pub command: ParamsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParamsCommand {
    /// List a device's parameters
    #[command(alias = "ls")]
    List {
        /// Device id
        device: String,

        /// Only show parameters whose name contains this substring
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show a single parameter value
    Get {
        /// Device id
        device: String,
        /// Full parameter path
        name: String,
    },

    /// Queue a parameter write (typed xsd:string)
    Set {
        /// Device id
        device: String,
        /// Full parameter path
        name: String,
        /// New value
        value: String,
    },

    /// Queue a parameter refresh (defaults to the whole tree)
    Refresh {
        /// Device id
        device: String,

        /// Specific parameter names to refresh (repeatable)
        #[arg(long = "param", short = 'P')]
        params: Vec<String>,
    },
}

// ── Wifi ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// Show the per-band WiFi configuration for a device
    Show {
        /// Device id
        device: String,
    },
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List the tasks queued for a device
    #[command(alias = "ls")]
    List {
        /// Device id
        device: String,
    },

    /// Delete a queued task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        task: String,
    },
}

// ── Presets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub command: PresetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PresetsCommand {
    /// List provisioning presets
    #[command(alias = "ls")]
    List,

    /// Delete a preset
    #[command(alias = "rm")]
    Delete {
        /// Preset name
        preset: String,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh cadence in minutes (overrides the profile setting)
    #[arg(long, short = 'i')]
    pub interval_minutes: Option<u64>,

    /// Skip the all-device parameter refresh each run
    #[arg(long)]
    pub no_refresh: bool,

    /// Skip connection requests to offline devices each run
    #[arg(long)]
    pub no_reconnect: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Print the resolved configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
