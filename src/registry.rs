//! Lights fetched once per run, looked up by id or name.

use crate::{BridgeApi, Error, Light, Result};

#[derive(Debug, Default, Clone)]
pub struct LightRegistry {
	lights: Vec<Light>,
}

impl LightRegistry {
	/// Fetches every light from the bridge. A bridge without lights is an error.
	pub fn load<B: BridgeApi + ?Sized>(bridge: &B) -> Result<LightRegistry> {
		let lights = bridge.get_lights()?;
		if lights.is_empty() {
			return Err(Error::NoLights);
		}
		info!(count = lights.len(), "loaded lights");
		Ok(LightRegistry::from_lights(lights))
	}

	/// Lights are kept sorted by id.
	pub fn from_lights(mut lights: Vec<Light>) -> LightRegistry {
		lights.sort_by_key(|l| l.id);
		LightRegistry { lights }
	}

	pub fn lights(&self) -> &[Light] {
		&self.lights
	}

	pub fn len(&self) -> usize {
		self.lights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lights.is_empty()
	}

	pub fn contains(&self, id: u32) -> bool {
		self.get(id).is_some()
	}

	pub fn get(&self, id: u32) -> Option<&Light> {
		self.lights.iter().find(|l| l.id == id)
	}

	/// Finds the id for `token`, which is either a light id or a light name.
	///
	/// A token that parses as a number is only ever an id. Anything else is
	/// matched against light names ignoring case; names are not unique on the
	/// bridge, so the lowest id wins.
	pub fn resolve(&self, token: &str) -> Option<u32> {
		if let Ok(id) = token.parse::<u32>() {
			if self.contains(id) {
				debug!(id, "resolved light by id");
				return Some(id);
			}
			debug!(id, "no light with this id");
			return None;
		}
		let found = self
			.lights
			.iter()
			.find(|l| l.name.to_lowercase() == token.to_lowercase())
			.map(|l| l.id);
		if let Some(id) = found {
			debug!(id, name = token, "resolved light by name");
		}
		found
	}

	/// Like [`resolve`](Self::resolve) but reports an unknown token as an error
	pub fn require(&self, token: &str) -> Result<u32> {
		self.resolve(token)
			.ok_or_else(|| Error::LightNotFound(token.to_string()))
	}
}
