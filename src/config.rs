//! YAML configuration file plus command-line overrides.
//!
//! ```yaml
//! bridge: 192.168.1.20
//! username: 1028d66426293e821ecfd9ef1a0731df
//! application: huelight
//! ```

use crate::{Error, Result, APPLICATION_NAME};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
	/// IP address or host name of the bridge
	pub bridge: String,
	/// Whitelisted username generated by the bridge
	pub username: String,
	pub application: String,
}

impl Config {
	pub fn new(bridge: &str, username: &str) -> Config {
		Config {
			bridge: bridge.to_string(),
			username: username.to_string(),
			application: APPLICATION_NAME.to_string(),
		}
	}

	/// Reads the config file at `path`
	pub fn load(path: &Path) -> Result<Config> {
		if !path.is_file() {
			return Err(Error::ConfigNotFound(path.to_path_buf()));
		}
		let content = fs::read_to_string(path)?;
		// An empty file is a valid, empty config
		if content.trim().is_empty() {
			return Ok(Config::default());
		}
		let config = serde_yaml::from_str(&content).map_err(|source| Error::ConfigParse {
			path: path.to_path_buf(),
			source,
		})?;
		debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Writes the config as YAML, replacing any existing file
	pub fn save(&self, path: &Path) -> Result<()> {
		let yaml = serde_yaml::to_string(self).map_err(Error::ConfigWrite)?;
		fs::write(path, yaml)?;
		info!(path = %path.display(), "saved config");
		Ok(())
	}

	/// Values given on the command line win over the file
	pub fn with_overrides(mut self, bridge: Option<&str>, username: Option<&str>) -> Config {
		if let Some(bridge) = bridge {
			self.bridge = bridge.to_string();
		}
		if let Some(username) = username {
			self.username = username.to_string();
		}
		self
	}

	pub fn bridge(&self) -> Result<&str> {
		let bridge = self.bridge.trim();
		if bridge.is_empty() {
			return Err(Error::NoBridgeSet);
		}
		Ok(bridge)
	}

	/// Effective settings as key/value pairs, sorted by key
	pub fn settings(&self, path: &Path) -> Vec<(&'static str, String)> {
		vec![
			("application", self.application.clone()),
			("bridge", self.bridge.clone()),
			("config", path.display().to_string()),
			("username", self.username.clone()),
		]
	}
}

/// Where the config file lives. A bare file name is looked up in the current directory.
pub fn config_path(given: Option<&Path>) -> PathBuf {
	let path = given.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => path.to_path_buf(),
		_ => Path::new(".").join(path),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn loads_yaml_keys() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("config.yaml");
		fs::write(
			&path,
			"bridge: 192.168.1.20\nusername: abc123\napplication: huelight\n",
		)
		.unwrap();

		let config = Config::load(&path).unwrap();
		assert_eq!(config.bridge, "192.168.1.20");
		assert_eq!(config.username, "abc123");
		assert_eq!(config.application, "huelight");
		assert_eq!(config.bridge().unwrap(), "192.168.1.20");
	}

	#[test]
	fn missing_file_is_not_found() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("nope.yaml");
		assert!(matches!(Config::load(&path), Err(Error::ConfigNotFound(p)) if p == path));
	}

	#[test]
	fn broken_yaml_is_a_parse_error() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("config.yaml");
		fs::write(&path, "bridge: [unclosed\n").unwrap();
		assert!(matches!(Config::load(&path), Err(Error::ConfigParse { .. })));
	}

	#[test]
	fn flags_override_file_values() {
		let config = Config::new("10.0.0.1", "file-user").with_overrides(Some("10.0.0.2"), None);
		assert_eq!(config.bridge, "10.0.0.2");
		assert_eq!(config.username, "file-user");
	}

	#[test]
	fn empty_bridge_is_an_error() {
		let config = Config::default();
		assert!(matches!(config.bridge(), Err(Error::NoBridgeSet)));
	}

	#[test]
	fn save_then_load_keeps_values() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("home.yml");
		let config = Config::new("192.168.1.20", "abc123");
		config.save(&path).unwrap();
		assert_eq!(Config::load(&path).unwrap(), config);
	}

	#[test]
	fn settings_are_sorted() {
		let config = Config::new("b", "u");
		let settings = config.settings(Path::new("./config.yaml"));
		let keys: Vec<&str> = settings.iter().map(|(k, _)| *k).collect();
		assert_eq!(keys, vec!["application", "bridge", "config", "username"]);
	}

	#[test]
	fn bare_file_names_live_in_the_current_directory() {
		assert_eq!(config_path(None), Path::new("./config.yaml"));
		assert_eq!(config_path(Some(Path::new("home.yml"))), Path::new("./home.yml"));
		assert_eq!(
			config_path(Some(Path::new("/etc/huelight/config.yaml"))),
			Path::new("/etc/huelight/config.yaml")
		);
	}
}
