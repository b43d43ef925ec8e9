use chrono::{DateTime, Utc};
use clap::Subcommand;

use crate::client::StudyPlannerClient;
use crate::output::{self, OutputConfig};
use super::parse_date;

/// Study time commands
#[derive(Subcommand, Debug)]
pub enum StudyLogCommands {
    /// Record study time
    Add {
        /// The subject ID
        subject_id: i32,
        /// Minutes studied
        minutes: i32,
        /// When the study happened; defaults to now
        #[clap(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
    /// List recorded study time
    List,
}

/// Executes a study log command
pub async fn execute(
    client: &StudyPlannerClient,
    cmd: StudyLogCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        StudyLogCommands::Add { subject_id, minutes, date } => {
            let log = client.create_study_log(subject_id, minutes, date.unwrap_or_else(Utc::now)).await?;
            output::print_study_log(&log, config);
        }
        StudyLogCommands::List => {
            let logs = client.list_study_logs().await?;
            output::print_study_logs(&logs, config);
        }
    }
    Ok(())
}
