//! WiFi configuration command handlers.

use std::sync::Arc;

use tabled::Tabled;

use genie_api::GenieClient;
use genie_core::WifiNetworkConfig;
use genie_core::model::extract_networks;

use crate::cli::{GlobalOpts, OutputFormat, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WifiRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Standard")]
    standard: String,
    #[tabled(rename = "Security")]
    security: String,
}

impl From<&WifiNetworkConfig> for WifiRow {
    fn from(w: &WifiNetworkConfig) -> Self {
        Self {
            band: w.band.clone(),
            ssid: w.ssid.clone(),
            enabled: if w.enabled { "yes" } else { "no" }.into(),
            channel: w.channel.clone(),
            standard: w.standard.clone(),
            security: w.beacon_type.clone(),
        }
    }
}

fn detail(w: &WifiNetworkConfig) -> String {
    [
        format!("Band:             {}", w.band),
        format!("SSID:             {}", w.ssid),
        format!("Enabled:          {}", w.enabled),
        format!("Radio Enabled:    {}", w.radio_enabled),
        format!("Broadcast SSID:   {}", w.ssid_advertisement),
        format!("Channel:          {}", w.channel),
        format!("Auto Channel:     {}", w.auto_channel),
        format!("Bandwidth:        {}", w.bandwidth),
        format!("Transmit Power:   {}", w.transmit_power),
        format!("Standard:         {}", w.standard),
        format!("Beacon Type:      {}", w.beacon_type),
        format!("Encryption:       {}", w.encryption),
        format!("WPA Auth Mode:    {}", w.wpa_authentication_mode),
        format!("WPA Encryption:   {}", w.wpa_encryption_modes),
        format!("BSSID:            {}", w.bssid),
        format!("Associations:     {}", w.total_associations),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<GenieClient>,
    args: WifiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WifiCommand::Show { device } => {
            let document = client.get_device(&device).await?;
            let networks = extract_networks(&document.parameters);

            if networks.is_empty() {
                if !global.quiet {
                    eprintln!(
                        "No WiFi configuration found for {device}; \
                         try `geniectl params refresh {device}` first"
                    );
                }
                return Ok(());
            }

            let out = match global.output {
                OutputFormat::Table => networks
                    .iter()
                    .map(detail)
                    .collect::<Vec<_>>()
                    .join("\n\n"),
                _ => output::render_list(
                    &global.output,
                    &networks,
                    |w| WifiRow::from(w),
                    |w| w.band.clone(),
                ),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
