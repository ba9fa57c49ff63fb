//! Bundlebox - on-demand CSS/JS bundler.

mod cli;
mod core;

use anyhow::Result;
use bundlebox::AssetBox;
use bundlebox::config::BoxConfig;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    bundlebox::logger::set_verbose(cli.verbose);

    let config = BoxConfig::load(&cli.config, &cli.overrides())?;

    match &cli.command {
        Commands::Serve { .. } => serve(&config),
        Commands::Bundle { args } => cli::bundle::run_bundle(args, &config),
        Commands::Decode { token } => cli::decode::run_decode(token),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

fn serve(config: &BoxConfig) -> Result<()> {
    let assets = AssetBox::from_config(config);
    bundlebox::log!(
        "serve";
        "src {} -> dst {} (version `{}`)",
        assets.src().display(),
        assets.dst().display(),
        assets.build_version()
    );
    let bound = cli::serve::bind_server(config)?;
    bound.run(assets, config)
}
