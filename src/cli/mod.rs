//! CLI module for gesture-replay.
//!
//! ```ignore
//! use shell_gestures::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &mut std::io::stdout())?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{version_line, USAGE, VERSION};

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::{Report, Result, Section};

use crate::config::GestureConfig;
use crate::error::GestureError;
use crate::replay::{run_trace, Trace};

/// Execute a parsed command, writing its output to `out`.
pub fn run_cli_command<W: Write>(command: CliCommand, out: &mut W) -> Result<()> {
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Invalid(reason) => return Err(eyre!("{}\n\n{}", reason, USAGE)),
        CliCommand::Replay { trace, config } => {
            replay_to(&trace, config.as_deref(), out)?;
        }
    }
    Ok(())
}

/// Replay `trace`, printing one JSON line per emitted signal
pub fn replay_to<W: Write>(trace: &Path, config: Option<&Path>, out: &mut W) -> Result<()> {
    let config = match config {
        Some(path) => {
            let mut config = GestureConfig::load_from_path(path)
                .map_err(with_hint)
                .wrap_err_with(|| format!("failed to load config {}", path.display()))?;
            config
                .apply_env_overrides()
                .map_err(|err| with_hint(err.into()))?;
            config.validate().map_err(|err| with_hint(err.into()))?;
            config
        }
        None => GestureConfig::load()
            .map_err(with_hint)
            .wrap_err("failed to load gesture config")?,
    };

    let trace_data = Trace::load(trace)
        .map_err(with_hint)
        .wrap_err_with(|| format!("failed to read trace {}", trace.display()))?;
    let records = run_trace(&trace_data, &config).map_err(with_hint)?;

    for record in &records {
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }
    Ok(())
}

/// Report an error with its category's recovery hint attached
fn with_hint(err: GestureError) -> Report {
    let hint = err.recovery_hint();
    tracing::debug!(code = err.error_code(), category = %err.category(), "Replay failed");
    Report::new(err).suggestion(hint)
}
