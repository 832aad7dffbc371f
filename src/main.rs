use color_eyre::Result;
use shell_gestures::cli::{parse_args, run_cli_command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout stays a clean stream of JSON lines
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let command = parse_args(std::env::args());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_cli_command(command, &mut out)
}
