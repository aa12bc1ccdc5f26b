//! Aligned tables for everything the program prints.

use crate::action::Action;
use crate::bridge::{BridgeConfig, User};
use crate::{DiscoveredBridge, Light};
use std::fmt::Display;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Columns are as wide as their widest cell and separated by one space.
/// The first row is the header and gets a dashed underline.
#[derive(Debug, Default)]
pub struct Table {
	rows: Vec<Vec<String>>,
}

impl Table {
	pub fn new<S: Display>(header: &[S]) -> Table {
		let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
		let underline = header.iter().map(|h| "-".repeat(h.width())).collect();
		Table {
			rows: vec![header, underline],
		}
	}

	pub fn row<S: Display>(&mut self, cells: &[S]) -> &mut Self {
		self.rows.push(cells.iter().map(|c| c.to_string()).collect());
		self
	}

	fn widths(&self) -> Vec<usize> {
		let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
		(0..columns)
			.map(|i| {
				self.rows
					.iter()
					.filter_map(|r| r.get(i))
					.map(|c| c.width())
					.max()
					.unwrap_or(0)
			})
			.collect()
	}

	pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
		let widths = self.widths();
		for row in &self.rows {
			let mut line = String::new();
			for (cell, width) in row.iter().zip(&widths) {
				line.push_str(cell);
				line.push_str(&" ".repeat(width - cell.width() + 1));
			}
			writeln!(out, "{}", line.trim_end())?;
		}
		Ok(())
	}

	pub fn render(&self) -> io::Result<String> {
		let mut out = Vec::new();
		self.write_to(&mut out)?;
		Ok(String::from_utf8_lossy(&out).into_owned())
	}
}

pub fn actions() -> Table {
	let mut table = Table::new(&["Action", "Description"]);
	for action in Action::ALL.iter() {
		table.row(&[action.as_str(), action.description()]);
	}
	table
}

/// Lights with id, state and name, or every detail with `all`
pub fn lights(lights: &[Light], all: bool) -> Table {
	let mut table = if all {
		Table::new(&[
			"ID",
			"State",
			"Name",
			"Type",
			"ModelID",
			"Manufacturer",
			"UniqueID",
			"SwVersion",
			"SwConfigID",
			"ProductName",
		])
	} else {
		Table::new(&["ID", "State", "Name"])
	};
	for light in lights {
		let id = light.id.to_string();
		if all {
			table.row(&[
				id.as_str(),
				light.power_label(),
				light.name.as_str(),
				light.light_type.as_str(),
				light.modelid.as_str(),
				light.manufacturername.as_str(),
				light.uniqueid.as_str(),
				light.swversion.as_str(),
				light.swconfigid.as_str(),
				light.productname.as_str(),
			]);
		} else {
			table.row(&[id.as_str(), light.power_label(), light.name.as_str()]);
		}
	}
	table
}

/// Users sorted by name
pub fn users(users: &[User]) -> Table {
	let mut sorted: Vec<&User> = users.iter().collect();
	sorted.sort_by(|a, b| a.name.cmp(&b.name));

	let mut table = Table::new(&["Name", "Username", "CreateDate", "LastUseDate", "ClientKey"]);
	for user in sorted {
		table.row(&[
			&user.name,
			&user.username,
			&user.create_date,
			&user.last_use_date,
			&user.client_key,
		]);
	}
	table
}

pub fn bridge(host: &str, id: &str, user: &str) -> Table {
	let mut table = Table::new(&["Host", "BridgeID", "User"]);
	table.row(&[host, id, user]);
	table
}

pub fn discovered_bridges(bridges: &[DiscoveredBridge], names: &[String]) -> Table {
	let mut table = Table::new(&["IP Address", "ID", "Name"]);
	for (i, bridge) in bridges.iter().enumerate() {
		let name = names.get(i).map(String::as_str).unwrap_or("");
		table.row(&[bridge.host.as_str(), bridge.id.as_str(), name]);
	}
	table
}

pub fn bridge_config(config: &BridgeConfig) -> Table {
	let mut table = Table::new(&["Setting", "Configuration"]);
	let mut set = |key: &str, value: &dyn Display| {
		table.row(&[key.to_string(), value.to_string()]);
	};

	set("Name", &config.name);
	set("BridgeID", &config.bridgeid);
	set("ModelID", &config.modelid);
	set("ZigbeeChannel", &config.zigbeechannel);
	set("FactoryNew", &config.factorynew);
	set(
		"ReplacesBridgeID",
		&config.replacesbridgeid.as_deref().unwrap_or(""),
	);
	set("DatastoreVersion", &config.datastoreversion);
	set("StarterKitID", &config.starterkitid);

	let internet = &config.internetservices;
	set("InternetService.Internet", &internet.internet);
	set("InternetService.RemoteAccess", &internet.remoteaccess);
	set("InternetService.Time", &internet.time);
	set("InternetService.SwUpdate", &internet.swupdate);

	let sw = &config.swupdate2;
	set("SwUpdate2.Bridge.State", &sw.bridge.state);
	set("SwUpdate2.Bridge.LastInstall", &sw.bridge.lastinstall);
	set("SwUpdate2.CheckForUpdate", &sw.checkforupdate);
	set("SwUpdate2.State", &sw.state);
	set("SwUpdate2.Install", &sw.install);
	set("SwUpdate2.AutoInstall.On", &sw.autoinstall.on);
	set("SwUpdate2.AutoInstall.UpdateTime", &sw.autoinstall.updatetime);
	set("SwUpdate2.LastChange", &sw.lastchange);
	set("SwUpdate2.LastInstall", &sw.lastinstall);

	set("APIVersion", &config.apiversion);
	set("SwVersion", &config.swversion);

	let mut whitelist = config.users();
	whitelist.sort_by(|a, b| a.name.cmp(&b.name));
	for (i, user) in whitelist.iter().enumerate() {
		set(&format!("Whitelist.{}.Name", i), &user.name);
		set(&format!("Whitelist.{}.Username", i), &user.username);
		set(&format!("Whitelist.{}.CreateDate", i), &user.create_date);
		set(&format!("Whitelist.{}.LastUseDate", i), &user.last_use_date);
		set(&format!("Whitelist.{}.ClientKey", i), &user.client_key);
	}

	let portal = &config.portalstate;
	set("PortalState.SignedOn", &portal.signedon);
	set("PortalState.Incoming", &portal.incoming);
	set("PortalState.Outgoing", &portal.outgoing);
	set("PortalState.Communication", &portal.communication);

	set("Network.IPAddress", &config.ipaddress);
	set("Network.Mac", &config.mac);
	set("Network.NetMask", &config.netmask);
	set("Network.Gateway", &config.gateway);
	set("Network.DHCP", &config.dhcp);
	set("Network.ProxyAddress", &config.proxyaddress);
	set("Network.ProxyPort", &config.proxyport);

	set("LinkButton", &config.linkbutton);

	set("Time.UTC", &config.utc);
	set("Time.LocalTime", &config.localtime);
	set("Time.TimeZone", &config.timezone);

	table
}

/// `CONFIG: key : value` lines
pub fn settings(settings: &[(&str, String)]) -> String {
	settings
		.iter()
		.map(|(key, value)| format!("CONFIG: {} : {}\n", key, value))
		.collect()
}

/// Indented JSON for bridge payloads
pub fn pretty<T: serde::Serialize>(value: &T) -> String {
	serde_json::to_string_pretty(value).unwrap_or_default()
}
