// ── WiFi configuration extraction ──
//
// Devices report wireless settings under one of two data-model shapes:
// the flat TR-098 tree (`InternetGatewayDevice.LANDevice.1.WLANConfiguration`)
// or the structured TR-181 radio/SSID tree (`Device.WiFi.Radio`). Detection
// is priority-ordered (TR-098 first, matching what the device population
// mostly reports) and both parsers normalize into the same per-band record.

use serde_json::{Map, Value};

use super::params::{FieldValue, resolve_bool, resolve_field};

/// Normalized wireless configuration for one radio band.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WifiNetworkConfig {
    /// Band label, e.g. `2.4GHz` or `5GHz`.
    pub band: String,
    pub ssid: String,
    pub enabled: bool,
    pub channel: String,
    pub beacon_type: String,
    pub encryption: String,
    pub bssid: String,
    pub transmit_power: String,
    pub radio_enabled: bool,
    pub ssid_advertisement: bool,
    pub total_associations: String,
    pub bandwidth: String,
    pub standard: String,
    pub auto_channel: bool,
    pub key_passphrase: String,
    pub wpa_authentication_mode: String,
    pub wpa_encryption_modes: String,
}

/// Which schema shape a device document reports its wireless settings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiSchema {
    /// TR-098: `InternetGatewayDevice.LANDevice.1.WLANConfiguration.{i}`.
    WlanConfiguration,
    /// TR-181: `Device.WiFi.Radio.{r}` with nested `SSID.{s}` entries.
    RadioTree,
}

/// Detect the wireless schema present in a device's parameter tree.
///
/// TR-098 takes priority when both shapes are somehow present.
pub fn detect_schema(parameters: &Map<String, Value>) -> Option<WifiSchema> {
    if wlan_configuration_tree(parameters).is_some() {
        return Some(WifiSchema::WlanConfiguration);
    }
    if radio_tree(parameters).is_some() {
        return Some(WifiSchema::RadioTree);
    }
    None
}

/// Extract the per-band wireless configurations from a device's parameter
/// tree. Returns an empty list when the device reports neither schema.
pub fn extract_networks(parameters: &Map<String, Value>) -> Vec<WifiNetworkConfig> {
    match detect_schema(parameters) {
        Some(WifiSchema::WlanConfiguration) => wlan_configuration_tree(parameters)
            .map(parse_wlan_configurations)
            .unwrap_or_default(),
        Some(WifiSchema::RadioTree) => radio_tree(parameters)
            .map(parse_radio_tree)
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

// ── Tree navigation ──────────────────────────────────────────────────

fn child<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    node.get(key)
}

fn child_object<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    node.get(key).and_then(Value::as_object)
}

fn descend<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Map<String, Value>> {
    let mut current = root;
    for key in path {
        current = child_object(current, key)?;
    }
    Some(current)
}

/// Instance entries of a multi-instance node, skipping bookkeeping keys.
fn instances(node: &Map<String, Value>) -> impl Iterator<Item = (&String, &Map<String, Value>)> {
    node.iter().filter_map(|(key, value)| {
        if key.starts_with('_') {
            None
        } else {
            value.as_object().map(|obj| (key, obj))
        }
    })
}

fn wlan_configuration_tree(parameters: &Map<String, Value>) -> Option<&Map<String, Value>> {
    descend(
        parameters,
        &["InternetGatewayDevice", "LANDevice", "1", "WLANConfiguration"],
    )
}

fn radio_tree(parameters: &Map<String, Value>) -> Option<&Map<String, Value>> {
    descend(parameters, &["Device", "WiFi", "Radio"])
}

// ── TR-098 parser ────────────────────────────────────────────────────

fn parse_wlan_configurations(tree: &Map<String, Value>) -> Vec<WifiNetworkConfig> {
    instances(tree)
        .map(|(instance, config)| {
            let band = match instance.as_str() {
                "1" => "2.4GHz".to_owned(),
                "3" => "5GHz".to_owned(),
                other => format!("Network {other}"),
            };
            parse_wlan_instance(band, config)
        })
        .collect()
}

fn parse_wlan_instance(band: String, config: &Map<String, Value>) -> WifiNetworkConfig {
    // Encryption and auth mode each have an IEEE 802.11i name and a WPA
    // name; whichever the device actually reports wins.
    let encryption = match resolve_field(child(config, "IEEE11iEncryptionModes")) {
        FieldValue::Present(value) => value,
        _ => resolve_field(child(config, "WPAEncryptionModes")).display_or("AES"),
    };
    let wpa_authentication_mode = match resolve_field(child(config, "WPAAuthenticationMode")) {
        FieldValue::Present(value) => value,
        _ => resolve_field(child(config, "IEEE11iAuthenticationMode")).display_or("PSK"),
    };
    let wpa_encryption_modes = match resolve_field(child(config, "WPAEncryptionModes")) {
        FieldValue::Present(value) => value,
        _ => resolve_field(child(config, "IEEE11iEncryptionModes")).display_or("AES"),
    };

    WifiNetworkConfig {
        ssid: resolve_field(child(config, "SSID")).display_or("Not configured"),
        enabled: resolve_bool(child(config, "Enable"), false),
        channel: resolve_field(child(config, "Channel")).display_or("Auto"),
        beacon_type: resolve_field(child(config, "BeaconType")).display_or("WPA2-PSK"),
        encryption,
        bssid: resolve_field(child(config, "BSSID")).display_or("Not available"),
        transmit_power: resolve_field(child(config, "TransmitPower")).display_or("100%"),
        radio_enabled: resolve_bool(child(config, "RadioEnabled"), true),
        ssid_advertisement: resolve_bool(child(config, "SSIDAdvertisementEnabled"), true),
        total_associations: resolve_field(child(config, "TotalAssociations")).display_or("0"),
        bandwidth: resolve_field(child(config, "X_TP_Bandwidth")).display_or("Auto"),
        standard: resolve_field(child(config, "Standard")).display_or("802.11n"),
        auto_channel: resolve_bool(child(config, "AutoChannelEnable"), true),
        key_passphrase: resolve_field(child(config, "KeyPassphrase")).display_or(""),
        wpa_authentication_mode,
        wpa_encryption_modes,
        band,
    }
}

// ── TR-181 parser ────────────────────────────────────────────────────

fn parse_radio_tree(tree: &Map<String, Value>) -> Vec<WifiNetworkConfig> {
    let mut networks = Vec::new();

    for (radio_key, radio) in instances(tree) {
        let Some(ssids) = child_object(radio, "SSID") else {
            continue;
        };

        for (ssid_key, ssid) in instances(ssids) {
            let band = match radio_key.as_str() {
                "1" => "2.4GHz".to_owned(),
                "2" => "5GHz".to_owned(),
                other => format!("Radio {other} SSID {ssid_key}"),
            };
            networks.push(parse_radio_instance(band, radio, ssid));
        }
    }

    networks
}

fn parse_radio_instance(
    band: String,
    radio: &Map<String, Value>,
    ssid: &Map<String, Value>,
) -> WifiNetworkConfig {
    let security = child_object(ssid, "Security");
    let security_field = |key: &str| security.and_then(|s| child(s, key));
    let stats_field = |key: &str| child_object(ssid, "Stats").and_then(|s| child(s, key));

    WifiNetworkConfig {
        ssid: resolve_field(child(ssid, "SSID")).display_or("Not configured"),
        enabled: resolve_bool(child(ssid, "Enable"), false),
        channel: resolve_field(child(radio, "Channel")).display_or("Auto"),
        beacon_type: resolve_field(security_field("ModeEnabled")).display_or("WPA2-PSK"),
        encryption: resolve_field(security_field("EncryptionMode")).display_or("AES"),
        bssid: resolve_field(child(ssid, "BSSID")).display_or("Not available"),
        transmit_power: resolve_field(child(radio, "TransmitPower")).display_or("100%"),
        radio_enabled: resolve_bool(child(radio, "Enable"), true),
        ssid_advertisement: resolve_bool(child(ssid, "SSIDAdvertisementEnabled"), true),
        total_associations: resolve_field(stats_field("AssociatedDeviceNumberOfEntries"))
            .display_or("0"),
        bandwidth: resolve_field(child(radio, "OperatingChannelBandwidth")).display_or("Auto"),
        standard: resolve_field(child(radio, "OperatingStandards")).display_or("802.11n"),
        auto_channel: resolve_bool(child(radio, "AutoChannelEnable"), true),
        key_passphrase: resolve_field(security_field("KeyPassphrase")).display_or(""),
        wpa_authentication_mode: resolve_field(security_field("ModeEnabled")).display_or("PSK"),
        wpa_encryption_modes: resolve_field(security_field("EncryptionMode")).display_or("AES"),
        band,
    }
}
