// ── Bulk refresh orchestration ──
//
// Fans one task-creation call out per device and aggregates per-device
// outcomes. Task creation against the server is best-effort: individual
// devices are expected to be unreachable, so a device's failure is recorded
// in its outcome and never aborts or affects its siblings. Only the initial
// device-list fetch can fail the whole operation.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use genie_api::GenieClient;

use crate::error::CoreError;
use crate::model::ONLINE_THRESHOLD_MS;

/// Per-device result of one dispatched task creation.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceOutcome {
    pub device_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceOutcome {
    fn ok(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_owned(),
            success: true,
            error: None,
        }
    }

    fn failed(device_id: &str, error: &genie_api::Error) -> Self {
        Self {
            device_id: device_id.to_owned(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregated result of one bulk operation. Held in memory only; each run
/// replaces the previous result.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRunResult {
    /// Size of the full device list at dispatch time.
    pub total_devices: usize,
    /// How many devices were classified offline before dispatch
    /// (reconnect sweeps only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_devices: Option<usize>,
    pub success_count: usize,
    pub failure_count: usize,
    /// Per-device outcomes, in device-list enumeration order.
    pub outcomes: Vec<DeviceOutcome>,
}

impl RefreshRunResult {
    fn aggregate(
        total_devices: usize,
        offline_devices: Option<usize>,
        outcomes: Vec<DeviceOutcome>,
    ) -> Self {
        let success_count = outcomes.iter().filter(|o| o.success).count();
        let failure_count = outcomes.len() - success_count;
        Self {
            total_devices,
            offline_devices,
            success_count,
            failure_count,
            outcomes,
        }
    }
}

/// Queue a basic-info refresh task for every device.
///
/// All task creations are dispatched concurrently and joined; the result
/// reports `success_count + failure_count` equal to the number of devices
/// attempted (the whole list).
pub async fn refresh_all(client: &GenieClient) -> Result<RefreshRunResult, CoreError> {
    let devices = client.list_devices().await?;
    debug!(total = devices.len(), "dispatching refresh tasks");

    let dispatches = devices.iter().map(|device| async move {
        match client.refresh_device_info(&device.id).await {
            Ok(_) => DeviceOutcome::ok(&device.id),
            Err(err) => DeviceOutcome::failed(&device.id, &err),
        }
    });
    let outcomes = join_all(dispatches).await;

    let result = RefreshRunResult::aggregate(devices.len(), None, outcomes);
    info!(
        total = result.total_devices,
        ok = result.success_count,
        failed = result.failure_count,
        "refresh tasks created"
    );
    Ok(result)
}

/// Queue a connection request for every offline device.
///
/// A device is a reconnect target when it has never contacted the server or
/// its contact age exceeds the shared online threshold. Devices below the
/// threshold receive no call.
pub async fn reconnect_offline(client: &GenieClient) -> Result<RefreshRunResult, CoreError> {
    let contacts = client.list_device_contacts().await?;
    let now = Utc::now();

    let targets: Vec<_> = contacts
        .iter()
        .filter(|contact| is_reconnect_target(contact.last_inform, now))
        .collect();
    info!(
        offline = targets.len(),
        total = contacts.len(),
        "dispatching connection requests"
    );

    let dispatches = targets.iter().map(|contact| async move {
        match client.connection_request(&contact.id).await {
            Ok(_) => DeviceOutcome::ok(&contact.id),
            Err(err) => DeviceOutcome::failed(&contact.id, &err),
        }
    });
    let outcomes = join_all(dispatches).await;

    Ok(RefreshRunResult::aggregate(
        contacts.len(),
        Some(targets.len()),
        outcomes,
    ))
}

/// Whether a device should receive a connection request.
///
/// Selection is strictly-older-than the threshold, mirroring the strict
/// less-than on the online side; an age exactly at the threshold is already
/// reported Offline but is not targeted.
pub fn is_reconnect_target(last_inform: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_inform {
        None => true,
        Some(last) => (now - last).num_milliseconds() > ONLINE_THRESHOLD_MS,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn never_contacted_is_a_target() {
        assert!(is_reconnect_target(None, Utc::now()));
    }

    #[test]
    fn stale_contact_is_a_target() {
        let now = Utc::now();
        assert!(is_reconnect_target(Some(now - TimeDelta::minutes(20)), now));
    }

    #[test]
    fn recent_contact_is_not_a_target() {
        let now = Utc::now();
        assert!(!is_reconnect_target(Some(now - TimeDelta::minutes(5)), now));
    }

    #[test]
    fn age_exactly_at_threshold_is_not_a_target() {
        let now = Utc::now();
        let last = now - TimeDelta::milliseconds(ONLINE_THRESHOLD_MS);
        assert!(!is_reconnect_target(Some(last), now));
    }
}
