// ── Display-ready projections of raw device documents ──

pub mod device;
pub mod params;
pub mod wifi;

pub use device::{Device, DeviceStatus, ONLINE_THRESHOLD_MS};
pub use params::{
    FieldValue, ParameterRow, flatten_parameters, lookup, resolve_bool, resolve_field,
};
pub use wifi::{WifiNetworkConfig, WifiSchema, detect_schema, extract_networks};
