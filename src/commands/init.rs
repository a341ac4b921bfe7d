use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` pointing at the transactions API.
///
/// # Arguments
/// - `home` - The directory that will hold the configuration, e.g. `$HOME/ledgerview`
/// - `args` - The base URL of the transactions collection and an optional request timeout.
///
/// # Errors
/// - Returns an error if the URL is not an absolute http(s) URL.
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<String>> {
    let config = Config::create(home, args.api_url(), args.timeout_secs())
        .await
        .context("Unable to create the ledgerview home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(Out::new(
        format!(
            "Created '{}' for transactions at {}",
            config.config_path().display(),
            config.api_url()
        ),
        config.api_url().to_string(),
    ))
}
