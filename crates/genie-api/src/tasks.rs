// Task endpoints
//
// Remote management is task-based: `POST /tasks` queues a command for a
// device, which picks it up on its next session (or immediately after a
// connection request). Task creation acknowledges queueing, not delivery.

use serde_json::json;
use tracing::debug;

use crate::client::GenieClient;
use crate::error::Error;
use crate::models::{Task, TaskName, TaskRequest};

/// The parameter set refreshed when updating a device's basic inventory
/// and management info.
pub const BASIC_INFO_PARAMETERS: [&str; 8] = [
    "Device.DeviceInfo.HardwareVersion",
    "Device.DeviceInfo.SoftwareVersion",
    "Device.DeviceInfo.UpTime",
    "Device.DeviceInfo.SerialNumber",
    "Device.DeviceInfo.Manufacturer",
    "Device.DeviceInfo.ModelName",
    "Device.ManagementServer.ConnectionRequestURL",
    "Device.ManagementServer.ParameterKey",
];

impl GenieClient {
    /// Queue a task for a device.
    ///
    /// `POST /tasks` with `{device, name, parameterNames?, parameterValues?}`
    pub async fn create_task(&self, request: &TaskRequest) -> Result<Task, Error> {
        let url = self.collection_url("tasks", None, None)?;
        debug!(device = %request.device, task = ?request.name, "creating task");
        let created: Option<Task> = self.post_json(url, request, "tasks").await?;
        Ok(created.unwrap_or_default())
    }

    /// Queue a `getParameterValues` task.
    ///
    /// `names` defaults to the wildcard `["*"]`, asking the device to
    /// re-report its whole tree.
    pub async fn refresh_parameters(
        &self,
        device_id: &str,
        names: Option<&[String]>,
    ) -> Result<Task, Error> {
        let parameter_names = match names {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => vec!["*".to_owned()],
        };

        self.create_task(&TaskRequest {
            device: device_id.to_owned(),
            name: TaskName::GetParameterValues,
            parameter_names: Some(parameter_names),
            parameter_values: None,
        })
        .await
    }

    /// Queue a refresh of the basic inventory parameters
    /// ([`BASIC_INFO_PARAMETERS`]).
    pub async fn refresh_device_info(&self, device_id: &str) -> Result<Task, Error> {
        let names: Vec<String> = BASIC_INFO_PARAMETERS
            .iter()
            .map(|&name| name.to_owned())
            .collect();

        self.create_task(&TaskRequest {
            device: device_id.to_owned(),
            name: TaskName::GetParameterValues,
            parameter_names: Some(names),
            parameter_values: None,
        })
        .await
    }

    /// Queue a connection request, asking an idle device to contact the
    /// server now.
    pub async fn connection_request(&self, device_id: &str) -> Result<Task, Error> {
        self.create_task(&TaskRequest::bare(device_id, TaskName::ConnectionRequest))
            .await
    }

    /// Queue a single parameter write, typed as `xsd:string`.
    pub async fn set_parameter(
        &self,
        device_id: &str,
        name: &str,
        value: &str,
    ) -> Result<Task, Error> {
        self.create_task(&TaskRequest {
            device: device_id.to_owned(),
            name: TaskName::SetParameterValues,
            parameter_names: None,
            parameter_values: Some(vec![(
                name.to_owned(),
                value.to_owned(),
                "xsd:string".to_owned(),
            )]),
        })
        .await
    }

    /// Queue a reboot.
    pub async fn reboot(&self, device_id: &str) -> Result<Task, Error> {
        self.create_task(&TaskRequest::bare(device_id, TaskName::Reboot))
            .await
    }

    /// Queue a factory reset.
    pub async fn factory_reset(&self, device_id: &str) -> Result<Task, Error> {
        self.create_task(&TaskRequest::bare(device_id, TaskName::FactoryReset))
            .await
    }

    /// List the tasks queued for a device.
    ///
    /// `GET /tasks?query={"device": id}`
    pub async fn list_tasks(&self, device_id: &str) -> Result<Vec<Task>, Error> {
        let query = json!({ "device": device_id });
        let url = self.collection_url("tasks", Some(&query), None)?;
        self.get_json(url, "tasks").await
    }

    /// Delete a queued task.
    ///
    /// `DELETE /tasks?query={"_id": id}`
    pub async fn delete_task(&self, task_id: &str) -> Result<(), Error> {
        let query = json!({ "_id": task_id });
        let url = self.collection_url("tasks", Some(&query), None)?;
        debug!(task = task_id, "deleting task");
        self.delete(url, &format!("task {task_id}")).await
    }
}
