// Northbound API response types
//
// Device documents are open-ended parameter trees; only the underscore-
// prefixed bookkeeping fields have a stable shape. Those are modeled
// explicitly and everything else lands in the flattened `parameters` map.
// `#[serde(default)]` is used liberally because field presence varies with
// what the device has reported so far.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Device ───────────────────────────────────────────────────────────

/// Full device document from `GET /devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDocument {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_deviceId", default)]
    pub device_id: DeviceIdentity,

    /// Timestamp of the last device-initiated Inform session.
    #[serde(rename = "_lastInform", default)]
    pub last_inform: Option<DateTime<Utc>>,

    #[serde(rename = "_registered", default)]
    pub registered: Option<DateTime<Utc>>,

    #[serde(rename = "_lastBoot", default)]
    pub last_boot: Option<DateTime<Utc>>,

    /// The reported parameter tree(s): `Device`, `InternetGatewayDevice`,
    /// `Tags`, and whatever else the data model roots at the top level.
    #[serde(flatten)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// The structured device identity reported during registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(rename = "_Manufacturer", default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "_OUI", default)]
    pub oui: Option<String>,
    #[serde(rename = "_ProductClass", default)]
    pub product_class: Option<String>,
    #[serde(rename = "_SerialNumber", default)]
    pub serial_number: Option<String>,
}

/// Minimal projection used for offline-device selection:
/// `GET /devices?projection=_id,_lastInform`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceContact {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_lastInform", default)]
    pub last_inform: Option<DateTime<Utc>>,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Remote-management task names accepted by `POST /tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskName {
    GetParameterValues,
    SetParameterValues,
    ConnectionRequest,
    Reboot,
    FactoryReset,
}

/// A parameter write as the wire expects it: `[name, value, xsd type]`.
pub type ParameterAssignment = (String, String, String);

/// Request body for `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRequest {
    pub device: String,
    pub name: TaskName,
    #[serde(rename = "parameterNames", skip_serializing_if = "Option::is_none")]
    pub parameter_names: Option<Vec<String>>,
    #[serde(rename = "parameterValues", skip_serializing_if = "Option::is_none")]
    pub parameter_values: Option<Vec<ParameterAssignment>>,
}

impl TaskRequest {
    /// A task with no parameter payload (connection request, reboot, reset).
    pub fn bare(device: impl Into<String>, name: TaskName) -> Self {
        Self {
            device: device.into(),
            name,
            parameter_names: None,
            parameter_values: None,
        }
    }
}

/// A queued (or just-created) task document.
///
/// The server acknowledges task creation with the stored document; some
/// deployments return an empty body instead, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Catch-all for task-specific payload fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
