use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a failure, used to pick the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad flags or values given by the user
	Input,
	/// Config file missing, unreadable or incomplete
	Config,
	/// Discovery, HTTP or bridge API failure
	Bridge,
	/// The user answered "no" to an interactive question
	Declined,
}

#[derive(Error, Debug)]
pub enum Error {
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("could not decode bridge response: {0}")]
	Json(#[from] serde_json::Error),

	#[error("could not decode bridge description: {0}")]
	Xml(#[from] serde_xml_rs::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// An error object returned in-band by the bridge
	#[error("bridge error {code} at \"{address}\": {description}")]
	Api {
		code: u16,
		address: String,
		description: String,
	},

	#[error("bridge returned an empty response")]
	EmptyResponse,

	#[error("no Hue bridges found on network")]
	NoBridgeFound,

	#[error("no lights found on bridge")]
	NoLights,

	#[error("config file \"{}\" not found", .0.display())]
	ConfigNotFound(PathBuf),

	#[error("could not parse config file \"{}\": {source}", .path.display())]
	ConfigParse {
		path: PathBuf,
		source: serde_yaml::Error,
	},

	#[error("could not generate configuration: {0}")]
	ConfigWrite(serde_yaml::Error),

	#[error("no bridge set")]
	NoBridgeSet,

	#[error("\"--action {0}\" is not valid")]
	InvalidAction(String),

	#[error("you must also use --value when using action \"{0}\"")]
	MissingValue(&'static str),

	#[error("value \"{0}\" is not a known colour")]
	InvalidColour(String),

	#[error("brightness value \"{0}\" is not valid, valid brightness values are 0 - 100 inclusive")]
	InvalidBrightness(String),

	#[error("\"--light {0}\" is not a valid light name or light id")]
	LightNotFound(String),

	#[error("you must also use --light when using --action")]
	MissingLight,

	#[error("user \"{0}\" already exists")]
	UserExists(String),

	#[error("bridge \"{0}\" is not valid")]
	InvalidBridge(String),

	#[error("filename \"{0}\" too short")]
	FilenameTooShort(String),

	#[error("filename \"{0}\" does not end in .yml or .yaml")]
	NotYaml(String),

	#[error("did not want to setup a config file")]
	Declined,
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Http(_)
			| Error::Json(_)
			| Error::Xml(_)
			| Error::Api { .. }
			| Error::EmptyResponse
			| Error::NoBridgeFound
			| Error::NoLights => ErrorKind::Bridge,
			Error::Io(_)
			| Error::ConfigNotFound(_)
			| Error::ConfigParse { .. }
			| Error::ConfigWrite(_)
			| Error::NoBridgeSet => ErrorKind::Config,
			Error::Declined => ErrorKind::Declined,
			_ => ErrorKind::Input,
		}
	}

	/// True for network failures that might succeed if tried again
	pub fn is_transient(&self) -> bool {
		match self {
			Error::Http(e) => e.is_timeout() || e.is_connect(),
			_ => false,
		}
	}

	/// Extra line printed under the error, if any
	pub fn hint(&self) -> Option<&'static str> {
		if self.is_transient() {
			Some("the bridge did not answer; check its address and that it is powered, then try again")
		} else {
			None
		}
	}

	pub fn exit_code(&self) -> i32 {
		match self.kind() {
			ErrorKind::Declined => 2,
			_ => 1,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
