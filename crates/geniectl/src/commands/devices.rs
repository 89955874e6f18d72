//! Device command handlers.

use std::sync::Arc;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use genie_api::GenieClient;
use genie_core::{Device, RefreshRunResult, reconnect_offline, refresh_all};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Contact")]
    last_contact: String,
    #[tabled(rename = "IP")]
    ip: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            serial: d.serial_number.clone(),
            manufacturer: d.manufacturer.clone(),
            model: d.model.clone(),
            status: d.status_at(Utc::now()).to_string(),
            last_contact: util::format_timestamp(d.last_contact_at),
            ip: d.ip_address.clone().unwrap_or_else(|| "N/A".into()),
        }
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn detail(d: &Device) -> String {
    [
        format!("ID:             {}", d.id),
        format!("Serial:         {}", d.serial_number),
        format!("Manufacturer:   {}", d.manufacturer),
        format!("Model:          {}", d.model),
        format!("Status:         {}", d.status_at(Utc::now())),
        format!(
            "Last Contact:   {}",
            util::format_timestamp(d.last_contact_at)
        ),
        format!("Registered:     {}", util::format_timestamp(d.registered_at)),
        format!(
            "IP:             {}",
            d.ip_address.as_deref().unwrap_or("N/A")
        ),
        format!("Software:       {}", d.software_version),
        format!("Hardware:       {}", d.hardware_version),
        format!(
            "Conn Req URL:   {}",
            d.connection_request_url.as_deref().unwrap_or("N/A")
        ),
    ]
    .join("\n")
}

// ── Bulk-result rendering ───────────────────────────────────────────

fn print_run_result(result: &RefreshRunResult, label: &str, global: &GlobalOpts) {
    if matches!(global.output, OutputFormat::Json | OutputFormat::JsonCompact) {
        output::print_output(&output::render_json_pretty(result), global.quiet);
        return;
    }

    let mut lines = vec![format!(
        "{label}: {} total, {} queued, {} failed",
        result.total_devices, result.success_count, result.failure_count
    )];
    if let Some(offline) = result.offline_devices {
        lines.push(format!("Offline devices targeted: {offline}"));
    }
    output::print_output(&lines.join("\n"), global.quiet);

    // Failures are worth itemizing; successes are just counts.
    let failures: Vec<OutcomeRow> = result
        .outcomes
        .iter()
        .filter(|o| !o.success)
        .map(|o| OutcomeRow {
            device: o.device_id.clone(),
            result: o.error.clone().unwrap_or_else(|| "failed".into()),
        })
        .collect();
    if !failures.is_empty() {
        let table = tabled::Table::new(&failures)
            .with(tabled::settings::Style::rounded())
            .to_string();
        output::print_output(&table, global.quiet);
    }
}

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(120));
    bar
}

/// Render a device list in the globally selected format.
pub fn device_table(devices: &[Device], global: &GlobalOpts) -> String {
    output::render_list(
        &global.output,
        devices,
        |d| DeviceRow::from(d),
        |d| d.id.clone(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<GenieClient>,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let documents = client.list_devices().await?;
            let devices: Vec<Device> = documents.iter().map(Device::from).collect();
            output::print_output(&device_table(&devices, global), global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let document = client.get_device(&device).await?;
            let projected = Device::from(&document);
            let out = output::render_single(&global.output, &projected, detail, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { device } => {
            if !util::confirm(&format!("Delete device {device}?"), global.yes)? {
                return Ok(());
            }
            client.delete_device(&device).await?;
            if !global.quiet {
                eprintln!("Device deleted");
            }
            Ok(())
        }

        DevicesCommand::Refresh { device } => {
            client.refresh_device_info(&device).await?;
            if !global.quiet {
                eprintln!("Refresh task queued");
            }
            Ok(())
        }

        DevicesCommand::Reconnect { device } => {
            client.connection_request(&device).await?;
            if !global.quiet {
                eprintln!("Connection request queued");
            }
            Ok(())
        }

        DevicesCommand::Reboot { device } => {
            client.reboot(&device).await?;
            if !global.quiet {
                eprintln!("Reboot task queued");
            }
            Ok(())
        }

        DevicesCommand::FactoryReset { device } => {
            if !util::confirm(&format!("Factory reset device {device}?"), global.yes)? {
                return Ok(());
            }
            client.factory_reset(&device).await?;
            if !global.quiet {
                eprintln!("Factory reset task queued");
            }
            Ok(())
        }

        DevicesCommand::RefreshAll => {
            let bar = spinner("Queueing refresh tasks for all devices...", global.quiet);
            let result = refresh_all(client).await?;
            bar.finish_and_clear();
            print_run_result(&result, "Refresh tasks", global);
            Ok(())
        }

        DevicesCommand::ReconnectOffline => {
            let bar = spinner("Queueing connection requests for offline devices...", global.quiet);
            let result = reconnect_offline(client).await?;
            bar.finish_and_clear();
            print_run_result(&result, "Connection requests", global);
            Ok(())
        }
    }
}
