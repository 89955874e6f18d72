//! Parameter browser command handlers.

use std::sync::Arc;

use tabled::Tabled;

use genie_api::GenieClient;
use genie_core::model::{ParameterRow, flatten_parameters, lookup, resolve_field};

use crate::cli::{GlobalOpts, ParamsArgs, ParamsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ParamTableRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Writable")]
    writable: String,
}

impl From<&ParameterRow> for ParamTableRow {
    fn from(row: &ParameterRow) -> Self {
        Self {
            name: row.name.clone(),
            value: row.value.clone(),
            kind: row.kind.clone(),
            writable: if row.writable { "yes" } else { "no" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<GenieClient>,
    args: ParamsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ParamsCommand::List { device, search } => {
            let document = client.get_device(&device).await?;
            let mut rows = flatten_parameters(&document.parameters);

            if let Some(ref needle) = search {
                let needle = needle.to_lowercase();
                rows.retain(|row| row.name.to_lowercase().contains(&needle));
            }

            let out = output::render_list(
                &global.output,
                &rows,
                |row| ParamTableRow::from(row),
                |row| row.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ParamsCommand::Get { device, name } => {
            let document = client.get_device_projected(&device, &name).await?;
            let value = resolve_field(lookup(&document.parameters, &name)).display_or("N/A");
            output::print_output(&value, global.quiet);
            Ok(())
        }

        ParamsCommand::Set {
            device,
            name,
            value,
        } => {
            client.set_parameter(&device, &name, &value).await?;
            if !global.quiet {
                eprintln!("Parameter write queued for {name}");
            }
            Ok(())
        }

        ParamsCommand::Refresh { device, params } => {
            let names = if params.is_empty() {
                None
            } else {
                Some(params.as_slice())
            };
            client.refresh_parameters(&device, names).await?;
            if !global.quiet {
                eprintln!("Parameter refresh queued");
            }
            Ok(())
        }
    }
}
