//! Provisioning preset command handlers.
//!
//! Presets are free-form server documents, so rows are extracted from raw
//! JSON values instead of typed models.

use std::sync::Arc;

use tabled::Tabled;

use genie_api::GenieClient;

use crate::cli::{GlobalOpts, PresetsArgs, PresetsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

fn json_str(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_owned()
}

pub async fn handle(
    client: &Arc<GenieClient>,
    args: PresetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PresetsCommand::List => {
            let presets = client.list_presets().await?;
            let out = output::render_list(
                &global.output,
                &presets,
                |v| PresetRow {
                    name: json_str(v, "_id"),
                    channel: json_str(v, "channel"),
                    weight: v
                        .get("weight")
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                },
                |v| json_str(v, "_id"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PresetsCommand::Delete { preset } => {
            if !util::confirm(&format!("Delete preset {preset}?"), global.yes)? {
                return Ok(());
            }
            client.delete_preset(&preset).await?;
            if !global.quiet {
                eprintln!("Preset deleted");
            }
            Ok(())
        }
    }
}
