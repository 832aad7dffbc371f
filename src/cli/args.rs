//! Command-line argument parsing for gesture-replay.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Replay a trace file
    Replay {
        trace: PathBuf,
        /// Explicit config file; the default location is used otherwise
        config: Option<PathBuf>,
    },
    /// Arguments could not be understood
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use shell_gestures::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["gesture-replay".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut trace = None;
    let mut config = None;
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--config" | "-c" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return CliCommand::Invalid("--config needs a file argument".to_string()),
            },
            flag if flag.starts_with('-') => {
                return CliCommand::Invalid(format!("unknown option '{}'", flag));
            }
            path => {
                if trace.is_some() {
                    return CliCommand::Invalid(format!("unexpected argument '{}'", path));
                }
                trace = Some(PathBuf::from(path));
            }
        }
    }

    match trace {
        Some(trace) => CliCommand::Replay { trace, config },
        None => CliCommand::Help,
    }
}
