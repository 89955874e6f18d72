// ── Device view-model ──
//
// A display-ready projection of the raw device document. Status is never
// stored: it is a pure function of the last-contact timestamp and the clock,
// derived at the moment of rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact age at or beyond which a device counts as offline.
///
/// Shared by status derivation and the offline-reconnect target selection;
/// the two must never drift apart.
pub const ONLINE_THRESHOLD_MS: i64 = 600_000;

/// Derived connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    /// Derive the status from a last-contact timestamp at a given instant.
    ///
    /// Online iff the device has contacted the server and did so less than
    /// [`ONLINE_THRESHOLD_MS`] ago.
    pub fn derive(last_contact_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match last_contact_at {
            Some(last) if (now - last).num_milliseconds() < ONLINE_THRESHOLD_MS => Self::Online,
            _ => Self::Offline,
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Display-ready device record.
///
/// Descriptive strings fall back to sentinels (`"Unknown"` / `"N/A"`) so the
/// presentation layer never has to special-case missing registration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub model: String,
    pub software_version: String,
    pub hardware_version: String,

    /// Last device-initiated contact, if the device has ever informed.
    pub last_contact_at: Option<DateTime<Utc>>,
    pub registered_at: Option<DateTime<Utc>>,

    /// First populated IPv4 address found in the interface tree.
    pub ip_address: Option<String>,
    pub connection_request_url: Option<String>,
}

impl Device {
    /// Derive the connectivity status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> DeviceStatus {
        DeviceStatus::derive(self.last_contact_at, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn recent_contact_is_online() {
        let now = Utc::now();
        let last = now - TimeDelta::minutes(5);
        assert_eq!(DeviceStatus::derive(Some(last), now), DeviceStatus::Online);
    }

    #[test]
    fn stale_contact_is_offline() {
        let now = Utc::now();
        let last = now - TimeDelta::minutes(20);
        assert_eq!(DeviceStatus::derive(Some(last), now), DeviceStatus::Offline);
    }

    #[test]
    fn no_contact_is_offline() {
        assert_eq!(DeviceStatus::derive(None, Utc::now()), DeviceStatus::Offline);
    }

    #[test]
    fn contact_age_exactly_at_threshold_is_offline() {
        let now = Utc::now();
        let last = now - TimeDelta::milliseconds(ONLINE_THRESHOLD_MS);
        assert_eq!(DeviceStatus::derive(Some(last), now), DeviceStatus::Offline);
    }

    #[test]
    fn contact_age_just_under_threshold_is_online() {
        let now = Utc::now();
        let last = now - TimeDelta::milliseconds(ONLINE_THRESHOLD_MS - 1);
        assert_eq!(DeviceStatus::derive(Some(last), now), DeviceStatus::Online);
    }
}
