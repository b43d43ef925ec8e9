//! Storage for the CLI's session token between invocations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use study_planner::config;

/// File name of the saved token inside the config directory
const SESSION_FILE_NAME: &str = "session";

/// Returns the default location of the saved session token
pub fn default_session_path() -> Option<PathBuf> {
    config::get_config_dir_path().map(|dir| dir.join(SESSION_FILE_NAME))
}

/// Reads a saved token; a missing or empty file means no session
pub fn load_token(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|content| content.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Saves a token, creating the parent directory if needed
pub fn save_token(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)
}

/// Forgets the saved token
pub fn clear_token(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
