use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::completion::{CompletionSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Longest session lifetime accepted from configuration, ten years
pub const MAX_SESSION_TTL_HOURS: u32 = 24 * 365 * 10;

/// Configuration for the Study Planner server
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Lifetime of a login session in hours
    pub session_ttl_hours: u32,
    /// Minutes between sweeps that delete expired sessions
    pub session_sweep_minutes: u64,
    /// Base URL of the OpenAI-compatible completion API
    pub completion_base_url: String,
    /// Model requested from the completion API
    pub completion_model: String,
    /// Upper bound on a single completion call in seconds
    pub completion_timeout_secs: u64,
    /// Bearer key for the completion API
    pub completion_api_key: Option<String>,
    /// Directory for daily-rolling log files; stdout only when unset
    pub log_dir: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("session_sweep_minutes", &self.session_sweep_minutes)
            .field("completion_base_url", &self.completion_base_url)
            .field("completion_model", &self.completion_model)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("completion_api_key", &self.completion_api_key.as_ref().map(|_| "<redacted>"))
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub session_ttl_hours: Option<u32>,
    #[serde(default)]
    pub session_sweep_minutes: Option<u64>,
    #[serde(default)]
    pub completion_base_url: Option<String>,
    #[serde(default)]
    pub completion_model: Option<String>,
    #[serde(default)]
    pub completion_timeout_secs: Option<u64>,
    #[serde(default)]
    pub completion_api_key: Option<String>,
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Server URL used by the CLI; ignored by the server
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "study-planner", about = "Study planner API server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[clap(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Session lifetime in hours
    #[clap(long, env = "SESSION_TTL_HOURS")]
    pub session_ttl_hours: Option<u32>,

    /// Minutes between expired-session sweeps
    #[clap(long, env = "SESSION_SWEEP_MINUTES")]
    pub session_sweep_minutes: Option<u64>,

    /// Base URL of the completion API
    #[clap(long, env = "COMPLETION_BASE_URL")]
    pub completion_base_url: Option<String>,

    /// Completion model name
    #[clap(long, env = "COMPLETION_MODEL")]
    pub completion_model: Option<String>,

    /// Completion request timeout in seconds
    #[clap(long, env = "COMPLETION_TIMEOUT_SECS")]
    pub completion_timeout_secs: Option<u64>,

    /// API key for the completion service
    #[clap(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub completion_api_key: Option<String>,

    /// Directory for log files
    #[clap(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,

    /// Debug mode
    #[clap(long, env = "STUDY_PLANNER_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[clap(long, env = "STUDY_PLANNER_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            session_ttl_hours: update.session_ttl_hours.unwrap_or(self.session_ttl_hours),
            session_sweep_minutes: update.session_sweep_minutes.unwrap_or(self.session_sweep_minutes),
            completion_base_url: update.completion_base_url.unwrap_or(self.completion_base_url),
            completion_model: update.completion_model.unwrap_or(self.completion_model),
            completion_timeout_secs: update.completion_timeout_secs.unwrap_or(self.completion_timeout_secs),
            completion_api_key: update.completion_api_key.or(self.completion_api_key),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// Checks values that parse but would leave the server unusable
    ///
    /// ### Errors
    ///
    /// Returns a message naming the offending key when the session lifetime
    /// is zero or longer than [`MAX_SESSION_TTL_HOURS`], or when the
    /// completion timeout is zero.
    pub fn check(&self) -> Result<(), String> {
        if self.session_ttl_hours == 0 || self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(format!(
                "session_ttl_hours must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS, self.session_ttl_hours
            ));
        }
        if self.completion_timeout_secs == 0 {
            return Err("completion_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    /// Returns the session lifetime
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }

    /// Returns the interval between expired-session sweeps
    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_minutes.saturating_mul(60))
    }

    /// Returns the settings for the completion client
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            base_url: self.completion_base_url.clone(),
            model: self.completion_model.clone(),
            api_key: self.completion_api_key.clone(),
            timeout: Duration::from_secs(self.completion_timeout_secs),
        }
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("study_planner.db".to_string(), |path| {
        path.join("study_planner.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        bind_address: "127.0.0.1:3000".to_string(),
        session_ttl_hours: 24,
        session_sweep_minutes: 60,
        completion_base_url: DEFAULT_BASE_URL.to_string(),
        completion_model: DEFAULT_MODEL.to_string(),
        completion_timeout_secs: 30,
        completion_api_key: None,
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing file is not an error and yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        bind_address: args.bind_address,
        session_ttl_hours: args.session_ttl_hours,
        session_sweep_minutes: args.session_sweep_minutes,
        completion_base_url: args.completion_base_url,
        completion_model: args.completion_model,
        completion_timeout_secs: args.completion_timeout_secs,
        completion_api_key: args.completion_api_key,
        log_dir: args.log_dir,
        server_url: None,
    }
}

/// Returns the XDG config directory for the application, if one can be determined
pub fn get_config_dir_path() -> Option<PathBuf> {
    match ProjectDirs::from("com", "study-planner", "study-planner") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().to_path_buf()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_path = get_config_dir_path().and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_path.clone());
    let file_update = config_from_file(config_path.map(|path| path.join(CONFIG_FILE_NAME)))
        .unwrap_or_default();

    let config = base
        .apply_update(file_update)
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind_address={}, session_ttl={}h, completion_model={}, api_key_set={}",
        config.database_url,
        config.bind_address,
        config.session_ttl_hours,
        config.completion_model,
        config.completion_api_key.is_some(),
    );

    config
}


#[cfg(test)]
mod prop_tests;
