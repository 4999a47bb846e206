//! Configuration for the queue server
//!
//! Command-line arguments (with environment fallbacks via clap) take priority
//! over `pcv-qs.toml`, which takes priority over compiled defaults. The queue
//! file path is fixed here, once, at startup.

use clap::Parser;
use pcv_common::api::DEFAULT_QS_PORT;
use pcv_common::config::{
    load_toml_config, resolve_data_path, RootFolderResolver, TomlConfig, DEFAULT_QUEUE_FILE,
    DEFAULT_SCORES_FILE,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Module name used for config file lookup and logs
pub const MODULE_NAME: &str = "pcv-qs";

/// Command-line arguments for pcv-qs
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pcv-qs")]
#[command(about = "Deletion queue server for the photo curation viewer")]
#[command(version)]
pub struct Args {
    /// Explicit TOML config file
    #[arg(short, long, env = "PCV_QS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root folder holding the queue and scores files
    #[arg(short, long, env = "PCV_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// Queue Store file (relative paths resolve against the root folder)
    #[arg(long, env = "PCV_QUEUE_FILE")]
    pub queue_file: Option<PathBuf>,

    /// Scores Snapshot file (relative paths resolve against the root folder)
    #[arg(long, env = "PCV_SCORES_FILE")]
    pub scores_file: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "PCV_QS_BIND")]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "PCV_QS_PORT")]
    pub port: Option<u16>,

    /// Only allow same-origin requests (no CORS headers)
    #[arg(long)]
    pub strict_cors: bool,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub queue_file: PathBuf,
    pub scores_file: PathBuf,
    pub listen: SocketAddr,
    pub cors_permissive: bool,
    pub log_level: String,
}

impl ServerConfig {
    /// Load the TOML layer named by `args` (or found on disk) and resolve
    pub fn load(args: &Args) -> pcv_common::Result<Self> {
        let toml = load_toml_config(MODULE_NAME, args.config.as_deref())?;
        Ok(Self::resolve(args, &toml))
    }

    /// Merge arguments over a TOML config
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Self {
        let root_folder =
            RootFolderResolver::new(MODULE_NAME).resolve(args.root_folder.as_deref(), toml);

        let queue_file = resolve_data_path(
            &root_folder,
            args.queue_file.as_deref().or(toml.queue_file.as_deref()),
            DEFAULT_QUEUE_FILE,
        );
        let scores_file = resolve_data_path(
            &root_folder,
            args.scores_file.as_deref().or(toml.scores_file.as_deref()),
            DEFAULT_SCORES_FILE,
        );

        let bind = args
            .bind
            .or_else(|| toml.bind_address.as_deref().and_then(|s| s.parse().ok()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = args.port.or(toml.port).unwrap_or(DEFAULT_QS_PORT);

        let cors_permissive = !args.strict_cors && toml.cors_permissive.unwrap_or(true);

        Self {
            root_folder,
            queue_file,
            scores_file,
            listen: SocketAddr::new(bind, port),
            cors_permissive,
            log_level: toml.logging.level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_root() -> Args {
        Args {
            root_folder: Some(PathBuf::from("/srv/pcv")),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve(&args_with_root(), &TomlConfig::default());
        assert_eq!(config.queue_file, PathBuf::from("/srv/pcv/delete_requests.json"));
        assert_eq!(config.scores_file, PathBuf::from("/srv/pcv/scores.json"));
        assert_eq!(config.listen, "127.0.0.1:5731".parse().unwrap());
        assert!(config.cors_permissive);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_args_override_toml() {
        let toml = TomlConfig {
            queue_file: Some(PathBuf::from("toml-queue.json")),
            port: Some(9000),
            bind_address: Some("0.0.0.0".to_string()),
            ..Default::default()
        };
        let args = Args {
            queue_file: Some(PathBuf::from("/data/cli-queue.json")),
            port: Some(9100),
            ..args_with_root()
        };

        let config = ServerConfig::resolve(&args, &toml);
        assert_eq!(config.queue_file, PathBuf::from("/data/cli-queue.json"));
        assert_eq!(config.listen, "0.0.0.0:9100".parse().unwrap());
    }

    #[test]
    fn test_toml_relative_paths_join_root() {
        let toml = TomlConfig {
            queue_file: Some(PathBuf::from("web/viewer/delete_requests.json")),
            ..Default::default()
        };
        let config = ServerConfig::resolve(&args_with_root(), &toml);
        assert_eq!(
            config.queue_file,
            PathBuf::from("/srv/pcv/web/viewer/delete_requests.json")
        );
    }

    #[test]
    fn test_cors_can_be_restricted() {
        let toml = TomlConfig {
            cors_permissive: Some(false),
            ..Default::default()
        };
        assert!(!ServerConfig::resolve(&args_with_root(), &toml).cors_permissive);

        let args = Args {
            strict_cors: true,
            ..args_with_root()
        };
        assert!(!ServerConfig::resolve(&args, &TomlConfig::default()).cors_permissive);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "pcv-qs",
            "--root-folder",
            "/srv/pcv",
            "--port",
            "6000",
            "--strict-cors",
        ])
        .unwrap();
        assert_eq!(args.root_folder, Some(PathBuf::from("/srv/pcv")));
        assert_eq!(args.port, Some(6000));
        assert!(args.strict_cors);
    }
}
