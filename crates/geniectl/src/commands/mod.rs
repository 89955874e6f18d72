//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod params;
pub mod presets;
pub mod tasks;
pub mod util;
pub mod watch;
pub mod wifi;

use std::sync::Arc;

use genie_api::GenieClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &Arc<GenieClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Params(args) => params::handle(client, args, global).await,
        Command::Wifi(args) => wifi::handle(client, args, global).await,
        Command::Tasks(args) => tasks::handle(client, args, global).await,
        Command::Presets(args) => presets::handle(client, args, global).await,
        Command::Watch(args) => watch::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
