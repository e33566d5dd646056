//! Log initialisation.
//!
//! Logs never go to stdout, which carries the MCP stream.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Multi-line human readable output
    Pretty,
}

/// `RUST_LOG` if set, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, writing to `file` (appended) or stderr.
pub fn init(format: LogFormat, file: Option<&Path>) -> Result<(), CliError> {
    let (writer, ansi) = match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| CliError::LogFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), format == LogFormat::Pretty),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(CliError::Subscriber)
}
