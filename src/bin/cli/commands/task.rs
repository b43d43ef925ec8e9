use clap::Subcommand;
use study_planner::models::TaskUpdate;

use crate::client::StudyPlannerClient;
use crate::output::{self, OutputConfig};

/// Task management commands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List the tasks of a subject
    List {
        /// The subject ID
        subject_id: i32,
    },
    /// Add a task to a subject
    Add {
        /// The subject ID
        subject_id: i32,
        /// What needs doing
        description: String,
    },
    /// Mark a task as done
    Done { id: i32 },
    /// Mark a task as not done
    Undo { id: i32 },
}

/// Executes a task command
pub async fn execute(
    client: &StudyPlannerClient,
    cmd: TaskCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TaskCommands::List { subject_id } => {
            let tasks = client.list_tasks(subject_id).await?;
            output::print_tasks(&tasks, config);
        }
        TaskCommands::Add { subject_id, description } => {
            let task = client.create_task(subject_id, description).await?;
            output::print_task(&task, config);
        }
        TaskCommands::Done { id } => {
            let changes = TaskUpdate { completed: Some(true), ..Default::default() };
            let task = client.update_task(id, &changes).await?;
            output::print_task(&task, config);
        }
        TaskCommands::Undo { id } => {
            let changes = TaskUpdate { completed: Some(false), ..Default::default() };
            let task = client.update_task(id, &changes).await?;
            output::print_task(&task, config);
        }
    }
    Ok(())
}
