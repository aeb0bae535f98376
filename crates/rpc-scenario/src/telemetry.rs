//! Tracing setup for the CLI and the cucumber runner.
//!
//! Logs go to stderr unless `RPC_SCENARIO_LOG` names a file. The default
//! filter raises only the workspace crates to the requested level and keeps
//! the HTTP stack at `warn`.

use std::io::IsTerminal;
use std::path::Path;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_FILE_ENV: &str = "RPC_SCENARIO_LOG";

const WORKSPACE_CRATES: [&str; 3] = ["rpc_scenario", "rpc_scenario_client", "rpc_scenario_fixture"];

/// Keeps the non-blocking log writer alive; flushes on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// `warn,rpc_scenario=<level>,...` for every workspace crate.
pub fn default_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in WORKSPACE_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Returns a disabled guard when a subscriber is already installed, so test
/// binaries can call it more than once.
pub fn init_tracing(default_level: &str) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));

    let log_file = log_file_path(|key| std::env::var(key).ok());
    let (writer, guard) = match log_file.as_deref().map(open_log_file) {
        Some(Ok((writer, guard))) => (writer, Some(guard)),
        Some(Err(err)) => {
            eprintln!("Warning: {err}");
            (BoxMakeWriter::new(std::io::stderr), None)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(guard.is_none() && std::io::stderr().is_terminal())
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard { _guard: guard }
}

fn log_file_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(LOG_FILE_ENV)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn open_log_file(path: &Path) -> Result<(BoxMakeWriter, WorkerGuard), String> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("failed to open log file {}: {err}", path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    Ok((BoxMakeWriter::new(non_blocking), guard))
}
