use chrono::{DateTime, Utc};
use clap::Subcommand;
use study_planner::models::SubjectUpdate;

use crate::client::StudyPlannerClient;
use crate::output::{self, OutputConfig};
use super::parse_date;

/// Subject management commands
#[derive(Subcommand, Debug)]
pub enum SubjectCommands {
    /// List your subjects
    List,
    /// Create a subject
    Create {
        /// Name of the subject
        name: String,
        /// Exam date, YYYY-MM-DD or RFC 3339
        #[clap(long, value_parser = parse_date)]
        exam_date: DateTime<Utc>,
    },
    /// Rename a subject or move its exam
    Edit {
        id: i32,
        #[clap(long)]
        name: Option<String>,
        #[clap(long, value_parser = parse_date)]
        exam_date: Option<DateTime<Utc>>,
    },
    /// Mark a subject as completed
    Complete { id: i32 },
    /// Mark a subject as not completed
    Reopen { id: i32 },
}

/// Executes a subject command
pub async fn execute(
    client: &StudyPlannerClient,
    cmd: SubjectCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SubjectCommands::List => {
            let subjects = client.list_subjects().await?;
            output::print_subjects(&subjects, config);
        }
        SubjectCommands::Create { name, exam_date } => {
            let subject = client.create_subject(name, exam_date).await?;
            output::print_subject(&subject, config);
        }
        SubjectCommands::Edit { id, name, exam_date } => {
            let changes = SubjectUpdate { name, exam_date, completed: None };
            if changes.is_empty() {
                return Err("nothing to change; pass --name or --exam-date".into());
            }
            let subject = client.update_subject(id, &changes).await?;
            output::print_subject(&subject, config);
        }
        SubjectCommands::Complete { id } => {
            let changes = SubjectUpdate { completed: Some(true), ..Default::default() };
            let subject = client.update_subject(id, &changes).await?;
            output::print_subject(&subject, config);
        }
        SubjectCommands::Reopen { id } => {
            let changes = SubjectUpdate { completed: Some(false), ..Default::default() };
            let subject = client.update_subject(id, &changes).await?;
            output::print_subject(&subject, config);
        }
    }
    Ok(())
}
