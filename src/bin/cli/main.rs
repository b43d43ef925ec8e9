mod client;
mod commands;
mod output;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use client::StudyPlannerClient;
use output::{OutputConfig, OutputFormat};
use study_planner::config;

/// CLI for the study planner
#[derive(Parser, Debug)]
#[clap(name = "study-planner-cli", about = "CLI for the study planner")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "STUDY_PLANNER_URL", global = true)]
    server_url: Option<String>,

    /// File holding the session token between runs
    #[clap(long, env = "STUDY_PLANNER_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or totals)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Account(commands::account::AccountCommands),
    /// Manage subjects
    #[command(subcommand)]
    Subject(commands::subject::SubjectCommands),
    /// Manage tasks
    #[command(subcommand)]
    Task(commands::task::TaskCommands),
    /// Generate chapter tasks for a subject
    Chapters {
        /// The subject ID
        subject_id: i32,
    },
    /// Record and review study time
    #[command(subcommand)]
    Log(commands::study_log::StudyLogCommands),
    /// Ask the study assistant a question
    Chat {
        /// The message to send
        #[clap(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    if let Some(dir) = config::get_config_dir_path() {
        let config_path = dir.join(config::CONFIG_FILE_NAME);
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://localhost:3000".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    // ClientError::Request wraps reqwest errors; check for connection issues
    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is study-planner running?\n  {}",
            err_string
        );
    }

    if err_string.contains("(401)") {
        return format!("{}\n  Log in with `study-planner-cli login <username>`", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let session_path = cli.session_file.or_else(session::default_session_path);
    let token = session_path.as_deref().and_then(session::load_token);
    let client = StudyPlannerClient::new(server_url, token);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Account(cmd) => {
            commands::account::execute(&client, cmd, &output_config, session_path.as_deref()).await
        }
        Commands::Subject(cmd) => commands::subject::execute(&client, cmd, &output_config).await,
        Commands::Task(cmd) => commands::task::execute(&client, cmd, &output_config).await,
        Commands::Chapters { subject_id } => {
            commands::assistant::fetch_chapters(&client, subject_id, &output_config).await
        }
        Commands::Log(cmd) => commands::study_log::execute(&client, cmd, &output_config).await,
        Commands::Chat { message } => commands::assistant::chat(&client, message, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
