use std::collections::BTreeMap;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
/// Attributes of a light
pub struct Light {
	/// Identifier assigned by the bridge, taken from the key of the lights map
	#[serde(skip)]
	pub id: u32,
	pub uniqueid: String,
	#[serde(rename = "type")]
	pub light_type: String,
	pub name: String,
	pub modelid: String,
	pub manufacturername: String,
	pub productname: String,
	pub productid: String,
	pub state: LightState,
	pub swversion: String,
	pub swconfigid: String,
}

impl Light {
	pub fn is_on(&self) -> bool {
		self.state.on
	}

	/// "on" or "off", as shown in listings
	pub fn power_label(&self) -> &'static str {
		if self.state.on {
			"on"
		} else {
			"off"
		}
	}
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
/// Current state of a light
pub struct LightState {
	pub on: bool,
	/// Brightness
	pub bri: u8,
	pub hue: u16,
	/// Saturation
	pub sat: u8,
	/// CIE colour coordinates
	pub xy: Vec<f32>,
	/// Color tone
	pub ct: u16,
	/// Alert mode
	pub alert: String,
	pub colormode: String,
	pub mode: String,
	pub reachable: bool,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
/// Partial state sent to a light. Unset fields are left alone by the bridge.
pub struct StateUpdate {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub on: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bri: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub xy: Option<[f32; 2]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hue: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sat: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ct: Option<u16>,
}

impl StateUpdate {
	pub fn power(on: bool) -> Self {
		StateUpdate {
			on: Some(on),
			..Default::default()
		}
	}

	/// Switch on and set the colour
	pub fn colour(x: f32, y: f32) -> Self {
		StateUpdate {
			on: Some(true),
			xy: Some([x, y]),
			..Default::default()
		}
	}

	/// Switch on and set the brightness on the bridge's 0-254 scale
	pub fn brightness(bri: u8) -> Self {
		StateUpdate {
			on: Some(true),
			bri: Some(bri),
			..Default::default()
		}
	}
}

/// Turns the bridge's `{"1": {...}, "2": {...}}` map into lights carrying their ids.
///
/// Keys that are not decimal numbers are skipped.
pub fn from_map(map: BTreeMap<String, Light>) -> Vec<Light> {
	map.into_iter()
		.filter_map(|(key, mut light)| match key.parse() {
			Ok(id) => {
				light.id = id;
				Some(light)
			}
			Err(_) => {
				warn!("ignoring light with non-numeric id {:?}", key);
				None
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const LIGHTS: &str = r#"{
		"3": {
			"state": {"on": true, "bri": 144, "hue": 13088, "sat": 212, "xy": [0.5128, 0.4147],
				"ct": 467, "alert": "none", "colormode": "xy", "mode": "homeautomation", "reachable": true},
			"type": "Extended color light",
			"name": "Living Room",
			"modelid": "LCT007",
			"manufacturername": "Signify Netherlands B.V.",
			"productname": "Hue color lamp",
			"uniqueid": "00:17:88:01:10:4d:f2:a8-0b",
			"swversion": "1.88.1",
			"swconfigid": "A1B2C3D4",
			"productid": "Philips-LCT007-1-A19ECLv4"
		},
		"10": {
			"state": {"on": false, "bri": 1, "alert": "select", "reachable": false},
			"type": "Dimmable light",
			"name": "Hallway"
		}
	}"#;

	#[test]
	fn lights_map_keys_become_ids() {
		let map: BTreeMap<String, Light> = serde_json::from_str(LIGHTS).unwrap();
		let mut lights = from_map(map);
		lights.sort_by_key(|l| l.id);

		assert_eq!(lights.len(), 2);
		assert_eq!(lights[0].id, 3);
		assert_eq!(lights[0].name, "Living Room");
		assert!(lights[0].is_on());
		assert_eq!(lights[0].state.xy, vec![0.5128, 0.4147]);
		assert_eq!(lights[1].id, 10);
		assert_eq!(lights[1].power_label(), "off");
		assert_eq!(lights[1].modelid, "");
	}

	#[test]
	fn non_numeric_keys_are_skipped() {
		let mut map = BTreeMap::new();
		map.insert("lamp".to_string(), Light::default());
		map.insert("7".to_string(), Light::default());
		let lights = from_map(map);
		assert_eq!(lights.len(), 1);
		assert_eq!(lights[0].id, 7);
	}

	#[test]
	fn state_update_only_sends_set_fields() {
		let json = serde_json::to_string(&StateUpdate::power(false)).unwrap();
		assert_eq!(json, r#"{"on":false}"#);

		let json = serde_json::to_string(&StateUpdate::brightness(127)).unwrap();
		assert_eq!(json, r#"{"on":true,"bri":127}"#);

		let json = serde_json::to_value(&StateUpdate::colour(0.675, 0.322)).unwrap();
		assert_eq!(json["on"], true);
		assert!(json.get("bri").is_none());
		assert_eq!(json["xy"].as_array().unwrap().len(), 2);
	}
}
