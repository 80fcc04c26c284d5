mod cli;
mod dns;
mod output;
mod ping;
mod stats;
mod target;
mod transport;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::output::Printer;
use crate::transport::RunConfig;

/// Log to stderr so stdout carries only the report.
///
/// RUST_LOG overrides the default level.
fn init_tracing(verbose: bool) {
	let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
	let filter = EnvFilter::builder()
		.with_default_directive(level.into())
		.from_env_lossy();

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let config = RunConfig::from_cli(&cli)?;
	tracing::debug!(?config, "starting run");

	let printer = Printer::new(!cli.nocolor);
	printer.print_banner(&config);

	let outcomes = ping::run_pings(&config, |_, outcome| {
		printer.print_outcome(config.server, outcome);
	})
	.await;

	if config.show_features {
		if let Some(features) = output::first_features(&outcomes) {
			printer.print_features(features);
		}
	}

	let statistics = stats::summarize(&outcomes);
	printer.print_statistics(config.server, &statistics);

	// Write CSV if requested
	if let Some(path) = &cli.output {
		output::write_csv(path, &outcomes)?;
	}

	Ok(())
}
