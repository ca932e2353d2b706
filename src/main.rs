use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use storefront_config::{load, EnvSnapshot};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cwd = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Failed to resolve working directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load(&EnvSnapshot::from_process(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            e.log();
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to render configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}
