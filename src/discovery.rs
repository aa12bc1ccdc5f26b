use crate::{Bridge, Error, Result};

/// Hue's N-UPnP endpoint listing the bridges registered from the caller's network
const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
/// A bridge found on the local network
pub struct DiscoveredBridge {
	pub id: String,
	#[serde(rename = "internalipaddress")]
	pub host: String,
	#[serde(default)]
	pub port: Option<u16>,
}

impl DiscoveredBridge {
	pub fn bridge(&self) -> Bridge {
		let mut bridge = Bridge::new(&self.host);
		bridge.id = Some(self.id.clone());
		bridge
	}
}

/// Asks the discovery service for every bridge on the network
pub fn find_bridges() -> Result<Vec<DiscoveredBridge>> {
	debug!(url = DISCOVERY_URL, "discovering bridges");
	let bridges: Vec<DiscoveredBridge> = reqwest::blocking::get(DISCOVERY_URL)?
		.error_for_status()?
		.json()?;
	info!(count = bridges.len(), "bridge discovery finished");
	Ok(bridges)
}

/// The first bridge found on the network
pub fn discover() -> Result<Bridge> {
	first(find_bridges()?)
}

fn first(bridges: Vec<DiscoveredBridge>) -> Result<Bridge> {
	bridges
		.first()
		.map(DiscoveredBridge::bridge)
		.ok_or(Error::NoBridgeFound)
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribedDevice {
	#[serde(default)]
	pub friendly_name: String,
	#[serde(default)]
	pub manufacturer: String,
	#[serde(default)]
	pub model_name: String,
	#[serde(default)]
	pub model_number: String,
	#[serde(default)]
	pub serial_number: String,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
/// UPnP description served by the bridge itself
pub struct BridgeDescription {
	#[serde(rename = "URLBase", default)]
	pub url_base: String,
	pub device: DescribedDevice,
}

/// Fetches `/description.xml` from the bridge at `host`
pub fn describe(host: &str) -> Result<BridgeDescription> {
	let url = format!("http://{}/description.xml", host);
	debug!(%url, "GET");
	let text = reqwest::blocking::get(&url)?.error_for_status()?.text()?;
	parse_description(&text)
}

fn parse_description(xml: &str) -> Result<BridgeDescription> {
	Ok(serde_xml_rs::from_str(xml)?)
}
