//! Command-line flags and the order they are acted on.

use crate::action::{Command, Context, Outcome};
use crate::config::{self, Config};
use crate::display;
use crate::prompt::Prompt;
use crate::registry::LightRegistry;
use crate::{find_bridges, Bridge, BridgeApi, DiscoveredBridge, Error, Result, APPLICATION_NAME};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const USER_HELP: &str = "Hue uses the terms \"user\" and \"username\" in a confusing way.  \
User typically refers to an \"application\", whereas Username refers to a Hue generated secret \
string used like a password or an API key.  This tool uses the Username when interacting with \
the Hue Bridge.";

const LINK_BUTTON: &str = "To create the user you must first press the button on the Hue Bridge.  \
Please press the button then return here and press the [return] key";

#[derive(Parser, Debug, Default)]
#[command(name = "huelight", version, about = "Control the lights of a Hue bridge")]
pub struct Args {
	/// Configuration file: /path/to/file.yaml [default: ./config.yaml]
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// Display configuration
	#[arg(long)]
	pub displayconfig: bool,

	/// Select a light by id or name
	#[arg(long)]
	pub light: Option<String>,

	/// Action to do: on, off, status, hue, brightness
	#[arg(long)]
	pub action: Option<String>,

	/// Value for the action: a colour for hue, 0-100 for brightness
	#[arg(long)]
	pub value: Option<String>,

	/// List lights
	#[arg(long)]
	pub list: bool,

	/// List all details about the lights
	#[arg(long)]
	pub listall: bool,

	/// Show logged in bridge details
	#[arg(long)]
	pub showbridge: bool,

	/// List all user/whitelist details
	#[arg(long)]
	pub showusers: bool,

	/// Show bridge configuration
	#[arg(long)]
	pub bridgeconfig: bool,

	/// Creates a user
	#[arg(long, value_name = "NAME")]
	pub createuser: Option<String>,

	/// Deletes a user
	#[arg(long)]
	pub deleteuser: bool,

	/// Discover Hue bridges on network
	#[arg(long)]
	pub findbridges: bool,

	/// Which bridge to use (IP Address)
	#[arg(long)]
	pub bridge: Option<String>,

	/// Username to login to bridge
	#[arg(long)]
	pub username: Option<String>,

	/// Make a configuration file
	#[arg(long)]
	pub makeconfig: bool,

	/// Log what is sent to the bridge
	#[arg(long, short)]
	pub verbose: bool,
}

/// Runs one invocation. Questions are asked through `prompt`.
pub fn run<R: BufRead, W: Write>(args: &Args, prompt: &mut Prompt<R, W>) -> Result<()> {
	let path = config::config_path(args.config.as_deref());

	if args.makeconfig {
		if !prompt.yes_no("Do you want to create a config file? [y/n]: ")? {
			return Err(Error::Declined);
		}
		let found = find_bridges()?;
		return setup_config(args, &found, prompt);
	}

	let config =
		Config::load(&path)?.with_overrides(args.bridge.as_deref(), args.username.as_deref());

	if args.displayconfig {
		print!("{}", display::settings(&config.settings(&path)));
		return Ok(());
	}

	let host = config.bridge()?;

	if args.findbridges {
		return print_discovered(&find_bridges()?, &mut io::stdout());
	}

	// Everything about the action is checked before the bridge is contacted
	let command = match &args.action {
		Some(name) => {
			let command = Command::new(name.parse()?, args.value.as_deref())?;
			println!("ACTION: \"--action {}\" is valid", command.action());
			if args.light.is_none() {
				return Err(Error::MissingLight);
			}
			Some(command)
		}
		None => None,
	};

	let bridge = Bridge::new(host).login(&config.username);
	info!(host, "using bridge");

	if let Some(name) = &args.createuser {
		let username = register_user(&bridge, name, prompt)?;
		println!("Created User: {}", name);
		println!("    Username: {}\n", username);
		println!("{}", USER_HELP);
		println!("\nCurrent whitelist/users are:");
		let bridge = bridge.login(&username);
		return print_users(&bridge.get_users()?);
	}

	if args.showbridge {
		let id = match &bridge.id {
			Some(id) => id.clone(),
			None => bridge.get_config()?.bridgeid,
		};
		display::bridge(bridge.host(), &id, bridge.username()).write_to(&mut io::stdout())?;
		return Ok(());
	}

	if args.showusers {
		return print_users(&bridge.get_users()?);
	}

	if args.bridgeconfig {
		display::bridge_config(&bridge.get_config()?).write_to(&mut io::stdout())?;
		return Ok(());
	}

	let lights = LightRegistry::load(&bridge)?;
	println!("Found {} lights", lights.len());

	if args.deleteuser {
		println!("You can only delete a user via the Hue website at https://account.meethue.com/apps");
		return Ok(());
	}

	let light = match &args.light {
		Some(token) => Some(lights.require(token)?),
		None => None,
	};

	if args.list || args.listall {
		display::lights(lights.lights(), args.listall).write_to(&mut io::stdout())?;
	}

	if let (Some(command), Some(id)) = (command, light) {
		println!("Doing action: {}", command.action());
		let outcome = Context::new(&bridge, &lights).dispatch(id, &command)?;
		print_outcome(&outcome);
	}

	Ok(())
}

fn print_outcome(outcome: &Outcome) {
	println!("{}", outcome);
	if let Outcome::Colour {
		sent, responses, ..
	} = outcome
	{
		println!("==================");
		println!("{}", display::pretty(sent));
		println!("==================");
		println!("{}", display::pretty(responses));
		println!("==================");
	}
}

fn print_users(users: &[crate::bridge::User]) -> Result<()> {
	display::users(users).write_to(&mut io::stdout())?;
	println!("\nNumber of users found: {}", users.len());
	Ok(())
}

/// Prints the bridges with the friendly name each one reports about itself
fn print_discovered<W: Write>(bridges: &[DiscoveredBridge], out: &mut W) -> Result<()> {
	if bridges.is_empty() {
		return Err(Error::NoBridgeFound);
	}
	let names: Vec<String> = bridges
		.iter()
		.map(|b| match crate::describe(&b.host) {
			Ok(description) => description.device.friendly_name,
			Err(e) => {
				warn!(host = %b.host, error = %e, "could not describe bridge");
				String::new()
			}
		})
		.collect();
	display::discovered_bridges(bridges, &names).write_to(out)?;
	writeln!(out, "\nFound {} bridges", bridges.len())?;
	Ok(())
}

/// Creates a whitelist entry called `name` after the user pressed the link button.
/// Returns the generated username.
pub fn register_user<B, R, W>(bridge: &B, name: &str, prompt: &mut Prompt<R, W>) -> Result<String>
where
	B: BridgeApi + ?Sized,
	R: BufRead,
	W: Write,
{
	let exists = bridge
		.get_users()?
		.iter()
		.any(|u| u.name.eq_ignore_ascii_case(name));
	if exists {
		return Err(Error::UserExists(name.to_string()));
	}
	prompt.press_enter(LINK_BUTTON)?;
	let username = bridge.create_user(name)?;
	info!(name, "created user");
	Ok(username)
}

/// Asks for whatever the flags did not give and writes a new config file.
/// `found` are the bridges discovered on the network.
pub fn setup_config<R: BufRead, W: Write>(
	args: &Args,
	found: &[DiscoveredBridge],
	prompt: &mut Prompt<R, W>,
) -> Result<()> {
	let path = match &args.config {
		Some(path) => path.clone(),
		None => {
			writeln!(
				prompt.output(),
				"\nThe default configuration file {app} looks for is \"config.yaml\" in the current directory.\n\n\
				 If you choose a different name it will need to end in .yml or .yaml and always be passed to {app} \
				 with the --config [filename] argument.",
				app = APPLICATION_NAME
			)?;
			let name = prompt.ask("Please choose a filename: ")?;
			if name.len() < 4 {
				return Err(Error::FilenameTooShort(name));
			}
			let path = PathBuf::from(&name);
			match path.extension().and_then(|e| e.to_str()) {
				Some("yml") | Some("yaml") => path,
				_ => return Err(Error::NotYaml(name)),
			}
		}
	};

	let bridge = match &args.bridge {
		Some(bridge) => bridge.clone(),
		None => {
			writeln!(prompt.output())?;
			if found.is_empty() {
				writeln!(prompt.output(), "WARN: No Hue bridges found on network")?;
			} else {
				display::discovered_bridges(found, &[]).write_to(prompt.output())?;
			}
			prompt.ask("\nPlease type the IP of bridge you want to use: ")?
		}
	};

	if !found.iter().any(|b| b.host.eq_ignore_ascii_case(&bridge)) {
		let question = format!(
			"WARN: Bridge \"{}\" is not valid, do you wish to continue [y/n]: ",
			bridge
		);
		if !prompt.yes_no(&question)? {
			return Err(Error::InvalidBridge(bridge));
		}
	}

	let username = match &args.username {
		Some(username) => username.clone(),
		None => prompt.ask("Please type a username: ")?,
	};

	let config = Config::new(&bridge, &username);
	let out = prompt.output();
	writeln!(out, "---------------")?;
	writeln!(out, "Config file: {}", path.display())?;
	writeln!(out, "     Bridge: {}", config.bridge)?;
	writeln!(out, "   Username: {}", config.username)?;
	writeln!(out, "Application: {}", config.application)?;
	writeln!(out)?;

	let question = format!("Save this configuration to file \"{}\" [y/n]: ", path.display());
	if prompt.yes_no(&question)? {
		writeln!(prompt.output(), "Saving configuration")?;
		config.save(&path)?;
	} else {
		writeln!(prompt.output(), "\nWARN: Aborting config file save")?;
	}
	Ok(())
}
