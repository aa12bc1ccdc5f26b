//! Actions that can be run against a single light.

use crate::bridge::ApiSuccess;
use crate::registry::LightRegistry;
use crate::{BridgeApi, Error, Result, StateUpdate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
	Brightness,
	Hue,
	Off,
	On,
	Status,
}

impl Action {
	/// Every action, sorted by name
	pub const ALL: [Action; 5] = [
		Action::Brightness,
		Action::Hue,
		Action::Off,
		Action::On,
		Action::Status,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Action::Brightness => "brightness",
			Action::Hue => "hue",
			Action::Off => "off",
			Action::On => "on",
			Action::Status => "status",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Action::Brightness => "Set Brightness",
			Action::Hue => "Set colour",
			Action::Off => "Turn light off",
			Action::On => "Turn light on",
			Action::Status => "Show current state",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Action {
	type Err = Error;

	fn from_str(s: &str) -> Result<Action> {
		Action::ALL
			.iter()
			.copied()
			.find(|a| a.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| Error::InvalidAction(s.to_string()))
	}
}

/// A point in the bridge's CIE xy colour space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Colour {
	pub x: f32,
	pub y: f32,
}

/// Colours accepted by the hue action
pub const PALETTE: [(&str, Colour); 4] = [
	("blue", Colour { x: 0.167, y: 0.04 }),
	("green", Colour { x: 0.4091, y: 0.518 }),
	("red", Colour { x: 0.675, y: 0.322 }),
	("white", Colour { x: 0.3227, y: 0.3290 }),
];

pub fn colour(name: &str) -> Option<Colour> {
	PALETTE
		.iter()
		.find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
		.map(|(_, c)| *c)
}

/// Highest brightness the bridge accepts
pub const MAX_BRIGHTNESS: u8 = 254;

/// Maps a 0-100 percentage onto the bridge's 0-254 range, rounding to nearest
pub fn scale_brightness(percent: u8) -> u8 {
	let percent = u32::from(percent.min(100));
	((percent * u32::from(MAX_BRIGHTNESS) + 50) / 100) as u8
}

/// An action whose value has been checked. Building one never talks to the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	On,
	Off,
	Status,
	Hue { name: String, colour: Colour },
	/// `bri` is already on the bridge's scale
	Brightness { percent: u8, bri: u8 },
}

impl Command {
	pub fn new(action: Action, value: Option<&str>) -> Result<Command> {
		match action {
			Action::On => Ok(Command::On),
			Action::Off => Ok(Command::Off),
			Action::Status => Ok(Command::Status),
			Action::Hue => {
				let value = value.ok_or(Error::MissingValue("hue"))?;
				let colour = colour(value).ok_or_else(|| Error::InvalidColour(value.to_string()))?;
				Ok(Command::Hue {
					name: value.trim().to_lowercase(),
					colour,
				})
			}
			Action::Brightness => {
				let value = value.ok_or(Error::MissingValue("brightness"))?;
				let percent = value
					.trim()
					.parse::<u8>()
					.ok()
					.filter(|p| *p <= 100)
					.ok_or_else(|| Error::InvalidBrightness(value.to_string()))?;
				Ok(Command::Brightness {
					percent,
					bri: scale_brightness(percent),
				})
			}
		}
	}

	pub fn action(&self) -> Action {
		match self {
			Command::On => Action::On,
			Command::Off => Action::Off,
			Command::Status => Action::Status,
			Command::Hue { .. } => Action::Hue,
			Command::Brightness { .. } => Action::Brightness,
		}
	}

	/// The state this command sends, if it changes anything
	pub fn state_update(&self) -> Option<StateUpdate> {
		match self {
			Command::On => Some(StateUpdate::power(true)),
			Command::Off => Some(StateUpdate::power(false)),
			Command::Status => None,
			Command::Hue { colour, .. } => Some(StateUpdate::colour(colour.x, colour.y)),
			Command::Brightness { bri, .. } => Some(StateUpdate::brightness(*bri)),
		}
	}
}

/// What running a command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Power { id: u32, on: bool },
	Status { name: String, on: bool },
	Colour {
		name: String,
		colour: Colour,
		sent: StateUpdate,
		responses: Vec<ApiSuccess>,
	},
	Brightness { percent: u8, sent: StateUpdate },
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outcome::Power { id, on } => {
				write!(f, "Light {} turned {}", id, if *on { "on" } else { "off" })
			}
			Outcome::Status { name, on } => {
				write!(f, "Light: \"{}\" is {}", name, if *on { "on" } else { "off" })
			}
			Outcome::Colour { name, colour, .. } => {
				write!(f, "colour: {}\nX: {:.6}\nY: {:.6}", name, colour.x, colour.y)
			}
			Outcome::Brightness { percent, sent } => write!(
				f,
				"brightness: {}% ({}/{})",
				percent,
				sent.bri.unwrap_or_default(),
				MAX_BRIGHTNESS
			),
		}
	}
}

/// Everything a command needs for one run
pub struct Context<'a, B: BridgeApi + ?Sized> {
	pub bridge: &'a B,
	pub lights: &'a LightRegistry,
}

impl<'a, B: BridgeApi + ?Sized> Context<'a, B> {
	pub fn new(bridge: &'a B, lights: &'a LightRegistry) -> Self {
		Context { bridge, lights }
	}

	/// Runs `command` on light `id`. Bridge failures are returned as-is, nothing is retried.
	pub fn dispatch(&self, id: u32, command: &Command) -> Result<Outcome> {
		if !self.lights.contains(id) {
			return Err(Error::LightNotFound(id.to_string()));
		}
		info!(id, action = %command.action(), "dispatching");

		match command {
			Command::Status => {
				let light = self.bridge.get_light(id)?;
				Ok(Outcome::Status {
					on: light.is_on(),
					name: light.name,
				})
			}
			Command::On | Command::Off => {
				let on = *command == Command::On;
				self.bridge.set_light_state(id, &StateUpdate::power(on))?;
				Ok(Outcome::Power { id, on })
			}
			Command::Hue { name, colour } => {
				let sent = StateUpdate::colour(colour.x, colour.y);
				let responses = self.bridge.set_light_state(id, &sent)?;
				Ok(Outcome::Colour {
					name: name.clone(),
					colour: *colour,
					sent,
					responses,
				})
			}
			Command::Brightness { percent, bri } => {
				let sent = StateUpdate::brightness(*bri);
				self.bridge.set_light_state(id, &sent)?;
				Ok(Outcome::Brightness {
					percent: *percent,
					sent,
				})
			}
		}
	}
}
