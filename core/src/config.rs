use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "GRADEDESK_HOME";
const DEFAULT_DIR_NAME: &str = ".gradedesk";

/// Resolves where course and profile files live: explicit override, then
/// `GRADEDESK_HOME`, then `~/.gradedesk`. The directory is created if missing.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match override_dir {
        Some(dir) => dir,
        None => match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        },
    };

    fs::create_dir_all(&path)?;
    debug!("Using data directory {}", path.display());
    Ok(path)
}
