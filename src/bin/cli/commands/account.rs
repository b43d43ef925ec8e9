use std::path::Path;

use clap::Subcommand;

use crate::client::StudyPlannerClient;
use crate::output::{self, OutputConfig};
use crate::session;

/// Account and session commands
#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create an account and log in
    Register {
        username: String,
        #[clap(long, env = "STUDY_PLANNER_PASSWORD", hide_env_values = true)]
        password: String,
        /// School grade, needed for chapter generation
        #[clap(long)]
        grade: Option<String>,
    },
    /// Log in to an existing account
    Login {
        username: String,
        #[clap(long, env = "STUDY_PLANNER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
}

fn remember(session_path: Option<&Path>, token: &str) -> Result<(), Box<dyn std::error::Error>> {
    match session_path {
        Some(path) => Ok(session::save_token(path, token)?),
        None => Err("no location to store the session; pass --session-file".into()),
    }
}

/// Executes an account command
pub async fn execute(
    client: &StudyPlannerClient,
    cmd: AccountCommands,
    config: &OutputConfig,
    session_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AccountCommands::Register { username, password, grade } => {
            let (user, token) = client.register(username, password, grade).await?;
            remember(session_path, &token)?;
            output::print_user(&user, config);
        }
        AccountCommands::Login { username, password } => {
            let (user, token) = client.login(username, password).await?;
            remember(session_path, &token)?;
            output::print_user(&user, config);
        }
        AccountCommands::Logout => {
            let result = client.logout().await;
            // Forget the local token even if the server already dropped it
            if let Some(path) = session_path {
                session::clear_token(path)?;
            }
            result?;
            output::print_success("Logged out.", config);
        }
        AccountCommands::Whoami => {
            let user = client.current_user().await?;
            output::print_user(&user, config);
        }
    }
    Ok(())
}
