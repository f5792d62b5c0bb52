use std::path::{Path, PathBuf};

use tracing::{info, warn};

const DATA_DIR_VAR: &str = "EDUDESK_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "./data";

/// Where the two database files live. Both stores open independently from
/// the same directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let data_dir =
            dotenvy::var(DATA_DIR_VAR).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn roster_path(&self) -> PathBuf {
        self.data_dir.join("roster.sqlite3")
    }

    pub fn curriculum_path(&self) -> PathBuf {
        self.data_dir.join("curriculum.sqlite3")
    }
}

/// Loads the layered environment files for the active profile. Call this
/// before [`StoreConfig::from_env`] so file-provided variables are visible
/// to it; missing files are skipped.
pub fn load_environment() -> anyhow::Result<()> {
    let is_production =
        dotenvy::var("EDUDESK_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    for env_file in env_files {
        load_env_file(env_file)?;
    }

    Ok(())
}

fn load_env_file(path: &str) -> anyhow::Result<()> {
    if !Path::new(path).exists() {
        warn!("Environment file {} not found, skipping", path);
        return Ok(());
    }

    dotenvy::from_filename_override(path)?;
    info!("Loaded environment from: {}", path);
    Ok(())
}
