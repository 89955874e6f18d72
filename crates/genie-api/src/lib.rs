// genie-api: Async Rust client for the GenieACS northbound REST API.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod devices;
mod presets;
mod tasks;

pub use client::{Credentials, GenieClient};
pub use error::Error;
pub use tasks::BASIC_INFO_PARAMETERS;
