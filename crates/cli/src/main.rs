//! unipick binary.
//!
//! Type to search the university directory, select a result to resolve its
//! logo. Reads one line per input change from stdin and prints the picker
//! state to stdout; logs go to stderr.

mod app;
mod command;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unipick_config::Config;
use unipick_picker::PickerController;

use crate::app::App;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "unipick")]
#[command(about = "Type-ahead university search with logo lookup")]
struct Args {
	/// Configuration file (defaults to the user config directory)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Quiet period before a typed query is searched, in milliseconds
	#[arg(long, value_name = "MS")]
	debounce_ms: Option<u64>,

	/// Maximum number of results printed
	#[arg(long, default_value_t = 20)]
	limit: usize,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
	let subscriber = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let (mut config, config_path) = Config::discover(args.config.as_deref())?;
	if let Some(ms) = args.debounce_ms {
		config.picker.debounce = Duration::from_millis(ms);
	}

	info!(
		config = ?config_path,
		debounce = ?config.picker.debounce,
		search_url = %config.directory.search_url,
		logo_url = %config.directory.logo_url,
		"starting unipick"
	);

	let (directory, logos) = unipick_directory::connect(&config.directory)?;
	let picker = PickerController::new(Arc::new(directory), Arc::new(logos), config.picker);

	App::new(picker, std::io::stdout(), args.limit)
		.run(BufReader::new(tokio::io::stdin()))
		.await
}
