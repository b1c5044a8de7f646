//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::datastore::{Datastore, SqliteDatastore};
use crate::http_server::{HttpServer, ServerConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Config file picked up when `--config` is not given
const DEFAULT_CONFIG_PATH: &str = "./biztime.json";

/// Main CLI entry point
///
/// Parses arguments, installs the log subscriber and dispatches to the
/// appropriate command. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, database } => {
            let config = resolve_config(config.as_deref(), None, database)?;
            init(&config)
        }
        Command::Serve {
            config,
            port,
            database,
        } => {
            let config = resolve_config(config.as_deref(), port, database)?;
            serve(config)
        }
    }
}

fn init_logging() {
    // RUST_LOG wins over the default level
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}

/// Build the effective configuration
///
/// An explicit config path must exist. Without one, `./biztime.json` is used
/// when present and the defaults otherwise. Command-line overrides are
/// applied last and the result is validated.
pub fn resolve_config(
    path: Option<&Path>,
    port: Option<u16>,
    database: Option<String>,
) -> CliResult<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                ServerConfig::load(&default_path)?
            } else {
                ServerConfig::default()
            }
        }
    };

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_path = database;
    }

    config.validate()?;
    Ok(config)
}

/// Create the database file and the companies table
pub fn init(config: &ServerConfig) -> CliResult<()> {
    if config.is_in_memory() {
        return Err(CliError::config_error(
            "init needs a database file, not an in-memory database",
        ));
    }

    SqliteDatastore::open(&config.database_path)?;
    tracing::info!(database = %config.database_path, "database initialized");
    Ok(())
}

/// Start the HTTP server and block until it stops
pub fn serve(config: ServerConfig) -> CliResult<()> {
    let store = open_datastore(&config)?;
    let server = HttpServer::new(config, store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

fn open_datastore(config: &ServerConfig) -> CliResult<Arc<dyn Datastore>> {
    let store = if config.is_in_memory() {
        tracing::warn!("using an in-memory database; data is lost on exit");
        SqliteDatastore::open_in_memory()?
    } else {
        SqliteDatastore::open(&config.database_path)?
    };
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::io::Write;

    #[test]
    fn test_overrides_apply_after_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 4000, "database_path": "file.db"}}"#).unwrap();

        let config = resolve_config(Some(file.path()), Some(5000), Some(":memory:".to_string()))
            .unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let err = resolve_config(Some(Path::new("/nonexistent/biztime.json")), None, None)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_zero_port_override_is_rejected() {
        let err = resolve_config(None, Some(0), None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_init_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biztime.db");
        let config = ServerConfig {
            database_path: path.to_string_lossy().into_owned(),
            ..Default::default()
        };

        init(&config).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_rejects_in_memory() {
        let config = ServerConfig {
            database_path: ":memory:".to_string(),
            ..Default::default()
        };
        let err = init(&config).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
