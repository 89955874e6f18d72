//! Task queue command handlers.

use std::sync::Arc;

use tabled::Tabled;

use genie_api::GenieClient;
use genie_api::models::Task;

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Queued")]
    queued: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone().unwrap_or_default(),
            name: t.name.clone().unwrap_or_default(),
            queued: util::format_timestamp(t.timestamp),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<GenieClient>,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { device } => {
            let tasks = client.list_tasks(&device).await?;
            let out = output::render_list(
                &global.output,
                &tasks,
                |t| TaskRow::from(t),
                |t| t.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Delete { task } => {
            client.delete_task(&task).await?;
            if !global.quiet {
                eprintln!("Task deleted");
            }
            Ok(())
        }
    }
}
