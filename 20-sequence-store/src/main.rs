use anyhow::Result;
use clap::Parser;
use tracing::info;

use sequence_store::{cli::Cli, driver};

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let report = driver::run(&cli.driver_config())?;
    info!(before = report.before.len(), after = report.after.len(), "run complete");

    println!("{}", report.render(cli.format)?);
    Ok(())
}
