//! Configuration file handling for ledgerview.
//!
//! The configuration file is stored at `$LEDGERVIEW_HOME/config.json` and holds the base URL of
//! the transactions API along with request settings.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

const APP_NAME: &str = "ledgerview";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LEDGERVIEW_HOME`, from which it loads `config.json`, or by supplying an API URL
/// directly when no config file has been created.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the home directory and an initial `config.json` pointing at `api_url`.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not an absolute http(s) URL.
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;
        if timeout_secs == Some(0) {
            bail!("The request timeout must be at least one second")
        }

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledgerview home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            timeout_secs: timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    /// Loads `$LEDGERVIEW_HOME/config.json` and validates it.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The ledgerview home directory is missing, run 'ledgerview init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Bad api_url in '{}'", config_path.display()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    /// Loads the config from `home` and applies `api_url_override` on top of it. When the config
    /// file does not exist, the override alone is enough to build a usable `Config` with default
    /// settings.
    pub async fn resolve(home: &Path, api_url_override: Option<&str>) -> Result<Self> {
        let config_path = home.join(CONFIG_JSON);
        match (config_path.is_file(), api_url_override) {
            (true, None) => Self::load(home).await,
            (true, Some(url)) => Ok(Self::load(home).await?.with_api_url(url)?),
            (false, Some(url)) => {
                debug!(
                    "No config file at '{}', using the API URL from the command line",
                    config_path.display()
                );
                let api_url = parse_api_url(url)?;
                Ok(Self {
                    root: home.to_path_buf(),
                    config_path,
                    config_file: ConfigFile {
                        api_url: api_url.to_string(),
                        ..ConfigFile::default()
                    },
                    api_url,
                })
            }
            (false, None) => bail!(
                "No config file found at '{}'. Run 'ledgerview init --api-url <URL>' or pass \
                --api-url",
                config_path.display()
            ),
        }
    }

    /// Returns a copy that talks to `api_url` instead of the configured endpoint.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = parse_api_url(api_url)?;
        self.config_file.api_url = self.api_url.to_string();
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.timeout_secs)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledgerview",
///   "config_version": 1,
///   "api_url": "http://localhost:5000/api/transactions",
///   "timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledgerview"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the transactions collection
    api_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.timeout_secs > 0,
            "Invalid timeout_secs in config file: must be at least 1"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Parses the base URL of the transactions collection. Only absolute http and https URLs are
/// accepted since the CLI has no page origin to resolve a relative path against.
fn parse_api_url(s: &str) -> Result<Url> {
    let url = Url::parse(s.trim()).with_context(|| format!("Invalid API URL '{s}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported URL scheme '{other}' in API URL '{s}'"),
    }
}
