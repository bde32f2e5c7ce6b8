use anyhow::Context;
use clap::Parser;

use tattie::config::{Cli, ViewerConfig};
use tattie::TattieApp;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the defaults below
    let default_filter = if cli.verbose {
        "tattie=debug,warn"
    } else {
        "tattie=info,warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = ViewerConfig::from(cli);
    log::info!("Starting Tattie with preset '{}'", config.preset.name());

    let app = TattieApp::new(config).context("failed to set up the viewer")?;
    app.run().context("viewer exited with an error")?;

    Ok(())
}
