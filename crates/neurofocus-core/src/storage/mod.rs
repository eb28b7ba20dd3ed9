mod config;
pub mod database;
pub mod keys;
pub mod migrations;
pub mod session_log;

pub use config::{Config, NotificationsConfig, PolicyConfig};
pub use database::Database;
pub use session_log::{CountdownSnapshot, SessionLogEntry};

use std::path::PathBuf;

/// Returns the NeuroFocus data directory, creating it if needed.
///
/// Resolution order:
/// - `NEUROFOCUS_DATA_DIR` if set
/// - `~/.config/neurofocus-dev/` when `NEUROFOCUS_ENV=dev`
/// - `~/.config/neurofocus/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("NEUROFOCUS_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("NEUROFOCUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("neurofocus-dev")
            } else {
                base_dir.join("neurofocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
