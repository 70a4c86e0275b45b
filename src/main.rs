use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use c64tap::cli::Cli;
use c64tap::pipeline;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = cli.into_options();
    let stdout = std::io::stdout();
    let outcome = pipeline::run(&options, &mut stdout.lock())?;

    tracing::debug!(
        pulses = outcome.image.pulse_count(),
        bytes_written = ?outcome.bytes_written,
        "Done"
    );
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
