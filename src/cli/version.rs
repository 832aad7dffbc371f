//! Version and usage text for gesture-replay.

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Replay a recorded touch trace through the gesture recognizers.

Usage: gesture-replay [--config <file>] <trace.json>

Options:
  -c, --config <file>  Gesture configuration (default: <config dir>/shell-gestures/gestures.json)
  -V, --version        Print version
  -h, --help           Print this help

Signals are written to stdout, one JSON object per line.
Set RUST_LOG=debug to trace recognition decisions on stderr.";

pub fn version_line() -> String {
    format!("gesture-replay {}", VERSION)
}
