//! Pipeline entry point.
//!
//! Reads the install configuration and the workflow `version` input from
//! the environment, runs one install, and maps progress events to log
//! output and the `rollbackVersion` workflow output. Any failure is logged
//! and the process exits non-zero so the pipeline step fails.

use std::io::Write;

use sn_cicd_install::{InstallConfig, InstallDriver, InstallProgress};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match InstallConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    let version = std::env::var("INPUT_VERSION").ok();
    let driver = InstallDriver::new(config);

    if let Err(e) = driver.install_app(version.as_deref(), handle_progress).await {
        fail(&e.to_string());
    }
}

fn init_tracing() {
    // appDebug widens the default level before the config is even parsed,
    // so configuration failures are logged consistently too.
    let default = if matches!(std::env::var("appDebug").as_deref(), Ok("true")) {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn handle_progress(event: InstallProgress) {
    match event {
        InstallProgress::RollbackVersion { version } => set_output("rollbackVersion", &version),
        InstallProgress::Completed { message, detail } => {
            info!("{message}");
            info!("{detail}");
        }
        other => info!("{other}"),
    }
}

/// Record a workflow output.
///
/// Appends `name=value` to the file named by `GITHUB_OUTPUT`; outside a
/// workflow run the value is only logged.
fn set_output(name: &str, value: &str) {
    let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
        info!("output {name}={value}");
        return;
    };

    let written = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| writeln!(file, "{name}={value}"));

    if let Err(e) = written {
        error!("failed to record output {name}: {e}");
    }
}

fn fail(message: &str) -> ! {
    error!("{message}");
    std::process::exit(1);
}
