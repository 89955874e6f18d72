// ── API-to-domain conversion ──
//
// Bridges raw `genie_api` device documents into the display-ready
// `model::Device` record: identity fields with sentinel fallbacks, software
// version resolved from either data-model root, and the first populated
// IPv4 address scanned out of the interface tree.

use serde_json::{Map, Value};

use genie_api::models::DeviceDocument;

use crate::model::Device;
use crate::model::params::{FieldValue, lookup, resolve_field};

/// Paths checked, in order, for the device-info subtree. Older firmware
/// reports under `InternetGatewayDevice`, newer under `Device`.
const DEVICE_INFO_ROOTS: [&str; 2] = ["Device", "InternetGatewayDevice"];

impl From<&DeviceDocument> for Device {
    fn from(doc: &DeviceDocument) -> Self {
        Self {
            id: doc.id.clone(),
            serial_number: doc
                .device_id
                .serial_number
                .clone()
                .unwrap_or_else(|| "Unknown".into()),
            manufacturer: doc
                .device_id
                .manufacturer
                .clone()
                .unwrap_or_else(|| "Unknown".into()),
            model: doc
                .device_id
                .product_class
                .clone()
                .unwrap_or_else(|| "Unknown".into()),
            software_version: device_info_field(&doc.parameters, "SoftwareVersion")
                .display_or("N/A"),
            hardware_version: device_info_field(&doc.parameters, "HardwareVersion")
                .display_or("N/A"),
            last_contact_at: doc.last_inform,
            registered_at: doc.registered,
            ip_address: first_ipv4_address(&doc.parameters),
            connection_request_url: match resolve_field(lookup(
                &doc.parameters,
                "Device.ManagementServer.ConnectionRequestURL",
            )) {
                FieldValue::Present(url) => Some(url),
                _ => None,
            },
        }
    }
}

/// Resolve a `DeviceInfo` leaf from whichever data-model root reports it.
fn device_info_field(parameters: &Map<String, Value>, name: &str) -> FieldValue {
    for root in DEVICE_INFO_ROOTS {
        let resolved = resolve_field(lookup(parameters, &format!("{root}.DeviceInfo.{name}")));
        if resolved.is_present() {
            return resolved;
        }
    }
    FieldValue::Missing
}

/// Scan `Device.IP.Interface.*.IPv4Address.*.IPAddress` for the first
/// populated address.
fn first_ipv4_address(parameters: &Map<String, Value>) -> Option<String> {
    let interfaces = lookup(parameters, "Device.IP.Interface")?.as_object()?;

    for (key, interface) in interfaces {
        if key.starts_with('_') {
            continue;
        }
        let Some(addresses) = interface
            .as_object()
            .and_then(|i| i.get("IPv4Address"))
            .and_then(Value::as_object)
        else {
            continue;
        };

        for (addr_key, address) in addresses {
            if addr_key.starts_with('_') {
                continue;
            }
            let leaf = address.as_object().and_then(|a| a.get("IPAddress"));
            if let FieldValue::Present(ip) = resolve_field(leaf) {
                return Some(ip);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(body: Value) -> DeviceDocument {
        serde_json::from_value(body).expect("valid device document")
    }

    #[test]
    fn identity_fields_with_sentinels() {
        let doc = document(json!({
            "_id": "dev-1",
            "_deviceId": { "_SerialNumber": "SN1" },
        }));
        let device = Device::from(&doc);

        assert_eq!(device.serial_number, "SN1");
        assert_eq!(device.manufacturer, "Unknown");
        assert_eq!(device.model, "Unknown");
        assert_eq!(device.software_version, "N/A");
        assert!(device.last_contact_at.is_none());
        assert!(device.ip_address.is_none());
    }

    #[test]
    fn software_version_prefers_device_root() {
        let doc = document(json!({
            "_id": "dev-1",
            "Device": {
                "DeviceInfo": { "SoftwareVersion": { "_value": "2.0.0" } },
            },
            "InternetGatewayDevice": {
                "DeviceInfo": { "SoftwareVersion": { "_value": "1.0.0" } },
            },
        }));

        assert_eq!(Device::from(&doc).software_version, "2.0.0");
    }

    #[test]
    fn software_version_falls_back_to_gateway_root() {
        let doc = document(json!({
            "_id": "dev-1",
            "InternetGatewayDevice": {
                "DeviceInfo": { "SoftwareVersion": { "_value": "1.0.0" } },
            },
        }));

        assert_eq!(Device::from(&doc).software_version, "1.0.0");
    }

    #[test]
    fn first_populated_ipv4_wins() {
        let doc = document(json!({
            "_id": "dev-1",
            "Device": {
                "IP": {
                    "Interface": {
                        "_object": true,
                        "1": {
                            "IPv4Address": {
                                "1": { "IPAddress": { "_value": "" } },
                                "2": { "IPAddress": { "_value": "192.168.1.50" } },
                            },
                        },
                        "2": {
                            "IPv4Address": {
                                "1": { "IPAddress": { "_value": "10.0.0.9" } },
                            },
                        },
                    },
                },
            },
        }));

        assert_eq!(Device::from(&doc).ip_address.as_deref(), Some("192.168.1.50"));
    }
}
