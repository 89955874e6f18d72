// Device endpoints
//
// The API exposes devices only as a filterable collection: reads go through
// `GET /devices` with optional `query`/`projection` parameters, deletes
// through `DELETE /devices?query=...`. Single-device lookup is a filtered
// list that takes the first element.

use serde_json::json;
use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::{DeviceContact, DeviceDocument};

impl GenieClient {
    /// List all devices with their full parameter trees.
    ///
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceDocument>, Error> {
        let url = self.collection_url("devices", None, None)?;
        debug!("listing devices");
        self.get_json(url, "devices").await
    }

    /// List devices matching a JSON `query`, optionally projected to a CSV
    /// list of fields.
    ///
    /// `GET /devices?query=<json>[&projection=<csv>]`
    pub async fn list_devices_filtered(
        &self,
        query: &serde_json::Value,
        projection: Option<&str>,
    ) -> Result<Vec<DeviceDocument>, Error> {
        let url = self.collection_url("devices", Some(query), projection)?;
        self.get_json(url, "devices").await
    }

    /// Get a single device by id.
    ///
    /// The API has no single-item endpoint, so this filters the collection
    /// by `_id` and takes the first element; an empty result is a
    /// [`NotFound`](Error::NotFound).
    pub async fn get_device(&self, id: &str) -> Result<DeviceDocument, Error> {
        let query = json!({ "_id": id });
        let devices = self.list_devices_filtered(&query, None).await?;
        devices.into_iter().next().ok_or_else(|| Error::NotFound {
            resource: format!("device {id}"),
        })
    }

    /// Get a single device by id, projected to the given fields.
    pub async fn get_device_projected(
        &self,
        id: &str,
        projection: &str,
    ) -> Result<DeviceDocument, Error> {
        let query = json!({ "_id": id });
        let devices = self.list_devices_filtered(&query, Some(projection)).await?;
        devices.into_iter().next().ok_or_else(|| Error::NotFound {
            resource: format!("device {id}"),
        })
    }

    /// List every device's id and last-contact timestamp.
    ///
    /// `GET /devices?projection=_id,_lastInform` -- the minimal projection
    /// the offline-reconnect sweep needs.
    pub async fn list_device_contacts(&self) -> Result<Vec<DeviceContact>, Error> {
        let url = self.collection_url("devices", None, Some("_id,_lastInform"))?;
        self.get_json(url, "devices").await
    }

    /// Delete a device record from the server.
    ///
    /// `DELETE /devices?query={"_id": id}`
    pub async fn delete_device(&self, id: &str) -> Result<(), Error> {
        let query = json!({ "_id": id });
        let url = self.collection_url("devices", Some(&query), None)?;
        debug!(device = id, "deleting device");
        self.delete(url, &format!("device {id}")).await
    }
}
