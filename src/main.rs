mod app;

use anyhow::Context;
use clap::Parser;

use crate::app::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // mdfixture info+ on stderr, --verbose enables debug, RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("mdfixture", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let config = cli.writer_config();
    for path in &cli.paths {
        mdfixture::write_metadata(path, &config)
            .with_context(|| format!("failed to write fixture for: {}", path.display()))?;
    }

    Ok(())
}
