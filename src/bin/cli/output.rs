use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use study_planner::models::{StudyLog, Subject, Task, User};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

/// Prints a user in the specified format
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:          {}", user.get_id());
            println!("Username:    {}", user.get_username());
            println!("Grade:       {}", user.get_grade().unwrap_or_else(|| "-".to_string()));
            println!("Study hours: {}", user.get_total_study_hours());
        }
        OutputFormat::Json => print_json(user),
    }
}

/// Prints a list of subjects in the specified format
pub fn print_subjects(subjects: &[Subject], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if subjects.is_empty() {
                if !config.quiet {
                    println!("No subjects found.");
                }
                return;
            }
            if config.quiet {
                for subject in subjects {
                    println!("{}", subject.get_id());
                }
                return;
            }
            let max_id = subjects.iter().map(|s| s.get_id().to_string().len()).max().unwrap_or(2).max(2);
            println!("{:<width$}  DONE  EXAM        NAME", "ID", width = max_id);
            for subject in subjects {
                println!(
                    "{:<width$}  {}   {}  {}",
                    subject.get_id(),
                    checkbox(subject.get_completed()),
                    format_date(subject.get_exam_date()),
                    subject.get_name(),
                    width = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(subjects),
    }
}

/// Prints a single subject in the specified format
pub fn print_subject(subject: &Subject, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", subject.get_id());
                return;
            }
            println!("ID:        {}", subject.get_id());
            println!("Name:      {}", subject.get_name());
            println!("Exam date: {}", format_date(subject.get_exam_date()));
            println!("Completed: {}", subject.get_completed());
        }
        OutputFormat::Json => print_json(subject),
    }
}

/// Prints a list of tasks in the specified format
pub fn print_tasks(tasks: &[Task], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if tasks.is_empty() {
                if !config.quiet {
                    println!("No tasks found.");
                }
                return;
            }
            if config.quiet {
                for task in tasks {
                    println!("{}", task.get_id());
                }
                return;
            }
            let max_id = tasks.iter().map(|t| t.get_id().to_string().len()).max().unwrap_or(2).max(2);
            for task in tasks {
                println!(
                    "{:<width$}  {} {}",
                    task.get_id(),
                    checkbox(task.get_completed()),
                    task.get_description(),
                    width = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(tasks),
    }
}

/// Prints a single task in the specified format
pub fn print_task(task: &Task, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", task.get_id());
                return;
            }
            println!("{} {} {}", task.get_id(), checkbox(task.get_completed()), task.get_description());
        }
        OutputFormat::Json => print_json(task),
    }
}

/// Prints study logs with a total in the specified format
pub fn print_study_logs(logs: &[StudyLog], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            let total: i64 = logs.iter().map(|l| i64::from(l.get_duration())).sum();
            if config.quiet {
                println!("{}", total);
                return;
            }
            if logs.is_empty() {
                println!("No study time logged.");
                return;
            }
            println!("DATE        SUBJECT  MINUTES");
            for log in logs {
                println!("{}  {:<7}  {}", format_date(log.get_date()), log.get_subject_id(), log.get_duration());
            }
            println!("Total: {}h {:02}m", total / 60, total % 60);
        }
        OutputFormat::Json => print_json(logs),
    }
}

/// Prints a single study log in the specified format
pub fn print_study_log(log: &StudyLog, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", log.get_id());
                return;
            }
            println!(
                "Logged {} minutes on subject {} ({})",
                log.get_duration(),
                log.get_subject_id(),
                format_date(log.get_date()),
            );
        }
        OutputFormat::Json => print_json(log),
    }
}

/// Prints the assistant's reply
pub fn print_chat_reply(reply: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => println!("{}", reply),
        OutputFormat::Json => print_json(&serde_json::json!({ "response": reply })),
    }
}

/// Prints a success message in the specified format
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({ "message": message })),
    }
}
