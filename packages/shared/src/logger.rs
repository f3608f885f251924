//! Logging setup utilities for the morsecast binaries.

use std::{fs::File, io, path::Path, sync::Mutex};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(binary_name: &str, default_log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "morsecast_server={level},morsecast_client={level},{}={level}",
            binary_name.replace('-', "_"),
            level = default_log_level,
        )
        .into()
    })
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "morsecast-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use morsecast_shared::logger::setup_logger;
///
/// setup_logger("morsecast-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(binary_name, default_log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize the tracing subscriber so that it writes to a file instead of stdout.
///
/// Used by binaries that take over the terminal.
pub fn setup_file_logger(
    binary_name: &str,
    default_log_level: &str,
    path: &Path,
) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter(binary_name, default_log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
