use clap::Parser;
use ledgerview::args::{Args, Command};
use ledgerview::{commands, Config, ErrorType, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match ErrorType::of(&e) {
                // A tagged error already carries its whole chain in the outermost message.
                Some(_) => error!("Exiting with error: {e}"),
                None => error!("Exiting with error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let home = common.home().path();
    let json = common.json();

    // This allows for running the program without a transactions server. When
    // LEDGERVIEW_IN_TEST_MODE is set and non-empty, then the mode will be Mode::Test, otherwise it
    // will be Mode::Http.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(json),

        Command::List(list_args) => {
            let config = Config::resolve(home, common.api_url()).await?;
            commands::list(config, mode, list_args.clone())
                .await?
                .print(json)
        }

        Command::Add(add_args) => {
            let config = Config::resolve(home, common.api_url()).await?;
            commands::add(config, mode, add_args.clone())
                .await?
                .print(json)
        }

        Command::Delete(delete_args) => {
            let config = Config::resolve(home, common.api_url()).await?;
            commands::delete(config, mode, delete_args.clone())
                .await?
                .print(json)
        }

        Command::Dashboard(dashboard_args) => {
            let config = Config::resolve(home, common.api_url()).await?;
            commands::dashboard(config, mode, dashboard_args.clone())
                .await?
                .print(json)
        }

        Command::Report => {
            let config = Config::resolve(home, common.api_url()).await?;
            commands::report(config, mode).await?.print(json)
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
