use clap::Parser;
use huelight::app::{self, Args};
use huelight::prompt::Prompt;
use huelight::{display, Error};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = Args::parse();
	init_logging(args.verbose);

	let mut prompt = Prompt::stdio();
	if let Err(err) = app::run(&args, &mut prompt) {
		match err {
			Error::Declined => eprintln!("{}, exiting", err),
			Error::InvalidAction(_) => {
				eprintln!("ERROR: {}", err);
				eprintln!("Valid actions are:");
				let _ = display::actions().write_to(&mut io::stderr());
			}
			_ => eprintln!("ERROR: {}", err),
		}
		if let Some(hint) = err.hint() {
			eprintln!("HINT: {}", hint);
		}
		process::exit(err.exit_code());
	}
}

/// Logs go to stderr. `HUELIGHT_LOG` takes a filter like `huelight=debug`.
fn init_logging(verbose: bool) {
	let default = if verbose { "warn,huelight=debug" } else { "warn" };
	let filter = EnvFilter::try_from_env("HUELIGHT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}
