use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use zwt::cli::Cli;
use zwt::{client, render};

/// Initialize the tracing subscriber for logging.
///
/// Diagnostics go to stderr so they never mix with the data stream on
/// stdout. Users can override the filter with RUST_LOG.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zwt=warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Validate the output format before touching the compositor.
    let mode = cli.output_mode()?;
    let snapshot = client::capture()?;

    let mut out = io::BufWriter::new(io::stdout().lock());
    render::write_snapshot(&mut out, &snapshot, &mode)
        .and_then(|()| out.flush())
        .context("Failed to write output")
}

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests land here too; they are not errors.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
