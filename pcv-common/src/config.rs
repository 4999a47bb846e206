//! Configuration loading and root folder resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority, handled by each binary's clap `Args`)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; an unreadable or malformed one is
//! logged and ignored so a service always starts on defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "PCV_ROOT_FOLDER";

/// Default Queue Store file name inside the root folder
pub const DEFAULT_QUEUE_FILE: &str = "delete_requests.json";

/// Default Scores Snapshot file name inside the root folder
pub const DEFAULT_SCORES_FILE: &str = "scores.json";

/// Bootstrap configuration loaded from `<module>.toml`
///
/// Every field is optional; unset fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the queue and scores files
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Queue Store path (relative paths are joined onto the root folder)
    #[serde(default)]
    pub queue_file: Option<PathBuf>,

    /// Scores Snapshot path (relative paths are joined onto the root folder)
    #[serde(default)]
    pub scores_file: Option<PathBuf>,

    /// HTTP listen address
    #[serde(default)]
    pub bind_address: Option<String>,

    /// HTTP listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// Allow all CORS origins (development stance)
    #[serde(default)]
    pub cors_permissive: Option<bool>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Candidate config file locations for a module, in lookup order
pub fn config_file_candidates(module_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{}.toml", module_name);
    let mut candidates = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("pcv").join(&file_name));
    }
    if cfg!(unix) {
        candidates.push(PathBuf::from("/etc/pcv").join(&file_name));
    }

    candidates
}

/// Load the module's TOML config, falling back to defaults
///
/// An explicit path must exist; otherwise the first existing candidate wins.
pub fn load_toml_config(module_name: &str, explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let config = read_toml_config(path)?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    for candidate in config_file_candidates(module_name) {
        if !candidate.exists() {
            continue;
        }
        match read_toml_config(&candidate) {
            Ok(config) => {
                info!("Loaded config from {}", candidate.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", candidate.display(), e);
            }
        }
    }

    info!("No config file found for {}, using defaults", module_name);
    Ok(TomlConfig::default())
}

/// Root folder resolver
///
/// CLI argument → `PCV_ROOT_FOLDER` → TOML `root_folder` → OS default.
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    pub fn resolve(&self, cli_arg: Option<&Path>, toml: &TomlConfig) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &toml.root_folder {
            return path.clone();
        }

        let default = default_root_folder();
        info!(
            "{}: no root folder configured, using default {}",
            self.module_name,
            default.display()
        );
        default
    }
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/pcv (or /var/lib/pcv for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("pcv"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/pcv"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("pcv"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/pcv"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("pcv"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\pcv"))
    } else {
        PathBuf::from("./pcv_data")
    }
}

/// Resolve a data file path against the root folder
///
/// Absolute configured paths are used as-is, relative ones are joined onto
/// `root`, and an unset path becomes `root/<default_name>`.
pub fn resolve_data_path(root: &Path, configured: Option<&Path>, default_name: &str) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.join(default_name),
    }
}

/// Create the root folder if missing
pub fn ensure_directory_exists(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder {}", root.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults_to_info() {
        assert_eq!(LoggingConfig::default().level, "info");
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.queue_file, None);
    }

    #[test]
    fn test_resolve_data_path() {
        let root = Path::new("/srv/pcv");
        assert_eq!(
            resolve_data_path(root, None, DEFAULT_QUEUE_FILE),
            PathBuf::from("/srv/pcv/delete_requests.json")
        );
        assert_eq!(
            resolve_data_path(root, Some(Path::new("web/queue.json")), DEFAULT_QUEUE_FILE),
            PathBuf::from("/srv/pcv/web/queue.json")
        );
        assert_eq!(
            resolve_data_path(root, Some(Path::new("/data/q.json")), DEFAULT_QUEUE_FILE),
            PathBuf::from("/data/q.json")
        );
    }

    #[test]
    fn test_default_root_folder_not_empty() {
        assert!(!default_root_folder().as_os_str().is_empty());
    }
}
