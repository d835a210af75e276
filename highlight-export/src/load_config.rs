/// `load_config` module: Loads a static YAML config and injects secrets from the environment.
///
/// The YAML file never carries credentials. For a `bookmate` source the session
/// cookie is read from `BOOKMATE_COOKIE` (a `.env` file is honoured by `main`).
///
/// # Errors
/// All errors use `anyhow::Error` and name what went wrong: unreadable file,
/// invalid YAML, page size outside `1..=50`, or a missing secret.
///
/// For the accepted schema, see the README.
use anyhow::Result;
use highlight_export_core::config::{ExportConfig, SourceConfig};
use highlight_export_core::contract::MAX_PER_PAGE;
use highlight_export_core::download::BookmateCredentials;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Environment variable holding the Bookmate session cookie.
pub const COOKIE_ENV: &str = "BOOKMATE_COOKIE";

#[derive(Debug)]
pub struct CliConfig {
    pub export: ExportConfig,
    /// Present whenever the source needs it.
    pub credentials: Option<BookmateCredentials>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let export: ExportConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let per_page = export.source.per_page();
    if per_page == 0 || per_page > MAX_PER_PAGE {
        error!(per_page, "per_page out of range");
        anyhow::bail!("source.per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}");
    }

    let credentials = match &export.source {
        SourceConfig::Bookmate(_) => match std::env::var(COOKIE_ENV) {
            Ok(cookie) if !cookie.trim().is_empty() => {
                info!("{COOKIE_ENV} found in env");
                Some(BookmateCredentials { cookie })
            }
            Ok(_) => {
                error!("{COOKIE_ENV} is empty");
                anyhow::bail!("{COOKIE_ENV} environment variable is empty");
            }
            Err(e) => {
                error!(error = ?e, "{COOKIE_ENV} environment variable not set");
                anyhow::bail!("{COOKIE_ENV} environment variable not set: {e}");
            }
        },
        SourceConfig::File(_) => None,
    };

    export.trace_loaded();
    Ok(CliConfig {
        export,
        credentials,
    })
}
