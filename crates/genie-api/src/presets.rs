// Preset endpoints
//
// Presets are server-side provisioning rules. Their schema is free-form and
// versioned by the server, so they are handled as raw JSON documents.

use crate::client::GenieClient;
use crate::error::Error;

impl GenieClient {
    /// List provisioning presets.
    ///
    /// `GET /presets`
    pub async fn list_presets(&self) -> Result<Vec<serde_json::Value>, Error> {
        let url = self.collection_url("presets", None, None)?;
        self.get_json(url, "presets").await
    }

    /// Delete a preset by name.
    ///
    /// `DELETE /presets/{id}`
    pub async fn delete_preset(&self, id: &str) -> Result<(), Error> {
        let url = self.collection_url(&format!("presets/{id}"), None, None)?;
        self.delete(url, &format!("preset {id}")).await
    }
}
