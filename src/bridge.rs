use crate::lights::{self, Light, StateUpdate};
use crate::{Error, Result};
use reqwest::blocking::{Client, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The calls this program makes against a logged-in bridge
pub trait BridgeApi {
	fn host(&self) -> &str;
	fn username(&self) -> &str;
	/// All lights, in the order the bridge reports them
	fn get_lights(&self) -> Result<Vec<Light>>;
	fn get_light(&self, id: u32) -> Result<Light>;
	fn set_light_state(&self, id: u32, state: &StateUpdate) -> Result<Vec<ApiSuccess>>;
	/// Whitelist entries. Order is unspecified.
	fn get_users(&self) -> Result<Vec<User>>;
	/// Registers a new application and returns the generated username.
	/// The link button on the bridge must have been pressed shortly before.
	fn create_user(&self, devicetype: &str) -> Result<String>;
	fn get_config(&self) -> Result<BridgeConfig>;
}

/// A Hue bridge reachable over HTTP
#[derive(Debug, Clone)]
pub struct Bridge {
	pub host: String,
	/// Bridge id, if known from discovery
	pub id: Option<String>,
	pub username: String,
	client: Client,
}

impl Bridge {
	pub fn new(host: &str) -> Bridge {
		Bridge {
			host: host.to_string(),
			id: None,
			username: String::new(),
			client: Client::new(),
		}
	}

	/// Use `username` for all following API calls
	pub fn login(mut self, username: &str) -> Bridge {
		self.username = username.to_string();
		self
	}

	fn url(&self, path: &str) -> String {
		format!("http://{}/api/{}{}", self.host, self.username, path)
	}

	fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		let url = self.url(path);
		debug!(%url, "GET");
		let body: Value = self.client.get(&url).send()?.error_for_status()?.json()?;
		decode(body)
	}

	/// `PUT /api/<username>/lights/<id>/state` with the update as the JSON body
	pub fn set_state_request(&self, id: u32, state: &StateUpdate) -> Result<Request> {
		let url = self.url(&format!("/lights/{}/state", id));
		Ok(self.client.put(&url).json(state).build()?)
	}

	/// `POST /api` with `{"devicetype": ...}`. No username is needed for this one.
	pub fn create_user_request(&self, devicetype: &str) -> Result<Request> {
		let url = format!("http://{}/api", self.host);
		Ok(self
			.client
			.post(&url)
			.json(&serde_json::json!({ "devicetype": devicetype }))
			.build()?)
	}

	fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
		debug!(method = %request.method(), url = %request.url(), "sending");
		let body: Value = self.client.execute(request)?.error_for_status()?.json()?;
		decode(body)
	}
}

impl BridgeApi for Bridge {
	fn host(&self) -> &str {
		&self.host
	}

	fn username(&self) -> &str {
		&self.username
	}

	fn get_lights(&self) -> Result<Vec<Light>> {
		let map: BTreeMap<String, Light> = self.get("/lights")?;
		Ok(lights::from_map(map))
	}

	fn get_light(&self, id: u32) -> Result<Light> {
		let mut light: Light = self.get(&format!("/lights/{}", id))?;
		light.id = id;
		Ok(light)
	}

	fn set_light_state(&self, id: u32, state: &StateUpdate) -> Result<Vec<ApiSuccess>> {
		debug!(id, ?state, "setting light state");
		self.execute(self.set_state_request(id, state)?)
	}

	fn get_users(&self) -> Result<Vec<User>> {
		Ok(self.get_config()?.users())
	}

	fn create_user(&self, devicetype: &str) -> Result<String> {
		let created: Vec<ApiSuccess> = self.execute(self.create_user_request(devicetype)?)?;
		created
			.iter()
			.find_map(|s| s.success.get("username").and_then(Value::as_str))
			.map(str::to_string)
			.ok_or(Error::EmptyResponse)
	}

	fn get_config(&self) -> Result<BridgeConfig> {
		self.get("/config")
	}
}

/// Decodes a bridge response, turning an in-band `[{"error": ...}]` body into [`Error::Api`]
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
	if let Some(err) = api_error(&body) {
		return Err(err);
	}
	Ok(serde_json::from_value(body)?)
}

fn api_error(body: &Value) -> Option<Error> {
	let entries = body.as_array()?;
	entries.iter().find_map(|entry| {
		let err: ApiError = serde_json::from_value(entry.get("error")?.clone()).ok()?;
		Some(Error::Api {
			code: err.error_type,
			address: err.address,
			description: err.description,
		})
	})
}

#[derive(Deserialize, Debug)]
struct ApiError {
	#[serde(rename = "type")]
	error_type: u16,
	#[serde(default)]
	address: String,
	#[serde(default)]
	description: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
/// One `{"success": {...}}` entry of a bridge response
pub struct ApiSuccess {
	pub success: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
/// An application allowed to talk to the bridge
pub struct User {
	pub name: String,
	/// The secret the bridge generated for this application
	pub username: String,
	pub create_date: String,
	pub last_use_date: String,
	pub client_key: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct WhitelistEntry {
	pub name: String,
	#[serde(rename = "create date")]
	pub create_date: String,
	#[serde(rename = "last use date")]
	pub last_use_date: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
/// Contents of the bridge's `/config` resource
pub struct BridgeConfig {
	pub name: String,
	pub bridgeid: String,
	pub modelid: String,
	pub zigbeechannel: u8,
	pub factorynew: bool,
	pub replacesbridgeid: Option<String>,
	pub datastoreversion: String,
	pub starterkitid: String,
	pub internetservices: InternetServices,
	pub swupdate2: SwUpdate2,
	pub apiversion: String,
	pub swversion: String,
	pub whitelist: BTreeMap<String, WhitelistEntry>,
	pub portalstate: PortalState,
	pub ipaddress: String,
	pub mac: String,
	pub netmask: String,
	pub gateway: String,
	pub dhcp: bool,
	pub proxyaddress: String,
	pub proxyport: u16,
	pub linkbutton: bool,
	#[serde(rename = "UTC")]
	pub utc: String,
	pub localtime: String,
	pub timezone: String,
}

impl BridgeConfig {
	/// The whitelist as a list of users
	pub fn users(&self) -> Vec<User> {
		self.whitelist
			.iter()
			.map(|(username, entry)| User {
				name: entry.name.clone(),
				username: username.clone(),
				create_date: entry.create_date.clone(),
				last_use_date: entry.last_use_date.clone(),
				client_key: String::new(),
			})
			.collect()
	}
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct InternetServices {
	pub internet: String,
	pub remoteaccess: String,
	pub time: String,
	pub swupdate: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SwUpdate2 {
	pub checkforupdate: bool,
	pub lastchange: String,
	pub bridge: SwUpdateBridge,
	pub state: String,
	pub install: bool,
	pub autoinstall: AutoInstall,
	pub lastinstall: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SwUpdateBridge {
	pub state: String,
	pub lastinstall: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AutoInstall {
	pub on: bool,
	pub updatetime: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct PortalState {
	pub signedon: bool,
	pub incoming: bool,
	pub outgoing: bool,
	pub communication: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use reqwest::Method;
	use serde_json::json;
	use std::io::{BufRead, BufReader, Read, Write};
	use std::net::TcpListener;
	use std::thread;

	fn json_body(request: &Request) -> Value {
		let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
		serde_json::from_slice(bytes).unwrap()
	}

	/// Accepts one connection on a loopback port and answers it with `reply`.
	/// The join handle yields the request line and the request body.
	fn serve_once(reply: &'static str) -> (String, thread::JoinHandle<(String, String)>) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let host = listener.local_addr().unwrap().to_string();
		let handle = thread::spawn(move || {
			let (stream, _) = listener.accept().unwrap();
			let mut reader = BufReader::new(stream);
			let mut request_line = String::new();
			reader.read_line(&mut request_line).unwrap();
			let mut length = 0;
			loop {
				let mut line = String::new();
				if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
					break;
				}
				let lower = line.to_ascii_lowercase();
				if let Some(value) = lower.strip_prefix("content-length:") {
					length = value.trim().parse().unwrap();
				}
			}
			let mut body = vec![0; length];
			reader.read_exact(&mut body).unwrap();
			let response = format!(
				"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
				reply.len(),
				reply
			);
			reader.get_mut().write_all(response.as_bytes()).unwrap();
			(request_line.trim_end().to_string(), String::from_utf8(body).unwrap())
		});
		(host, handle)
	}

	#[test]
	fn error_body_becomes_api_error() {
		let body = json!([{"error": {"type": 1, "address": "/lights", "description": "unauthorized user"}}]);
		let result: Result<BTreeMap<String, Light>> = decode(body);
		match result {
			Err(Error::Api {
				code,
				address,
				description,
			}) => {
				assert_eq!(code, 1);
				assert_eq!(address, "/lights");
				assert_eq!(description, "unauthorized user");
			}
			other => panic!("expected api error, got {:?}", other),
		}
	}

	#[test]
	fn success_body_decodes() {
		let body = json!([
			{"success": {"/lights/3/state/on": true}},
			{"success": {"/lights/3/state/bri": 127}}
		]);
		let responses: Vec<ApiSuccess> = decode(body).unwrap();
		assert_eq!(responses.len(), 2);
		assert_eq!(responses[1].success["/lights/3/state/bri"], 127);
	}

	#[test]
	fn link_button_error_on_create_user() {
		let body = json!([{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]);
		let err = decode::<Vec<ApiSuccess>>(body).unwrap_err();
		assert!(err.to_string().contains("link button not pressed"));
	}

	#[test]
	fn whitelist_becomes_users() {
		let body = json!({
			"name": "Philips hue",
			"bridgeid": "001788FFFE23BFC2",
			"zigbeechannel": 15,
			"UTC": "2024-01-02T10:11:12",
			"whitelist": {
				"abc123": {"last use date": "2024-01-01T00:00:00", "create date": "2023-05-05T00:00:00", "name": "huelight#laptop"},
				"def456": {"last use date": "2022-01-01T00:00:00", "create date": "2021-05-05T00:00:00", "name": "Hue app"}
			},
			"portalstate": {"signedon": true, "incoming": false, "outgoing": true, "communication": "disconnected"}
		});
		let config: BridgeConfig = decode(body).unwrap();
		assert_eq!(config.bridgeid, "001788FFFE23BFC2");
		assert_eq!(config.zigbeechannel, 15);
		assert_eq!(config.utc, "2024-01-02T10:11:12");
		assert!(config.portalstate.signedon);

		let users = config.users();
		assert_eq!(users.len(), 2);
		let laptop = users.iter().find(|u| u.username == "abc123").unwrap();
		assert_eq!(laptop.name, "huelight#laptop");
		assert_eq!(laptop.create_date, "2023-05-05T00:00:00");
	}

	#[test]
	fn login_sets_username_in_urls() {
		let bridge = Bridge::new("192.168.1.2").login("secret");
		assert_eq!(bridge.username(), "secret");
		assert_eq!(bridge.url("/lights"), "http://192.168.1.2/api/secret/lights");
	}

	#[test]
	fn set_state_is_a_put_to_the_light_state() {
		let bridge = Bridge::new("192.168.1.2").login("secret");
		let request = bridge
			.set_state_request(3, &StateUpdate::brightness(127))
			.unwrap();
		assert_eq!(request.method(), &Method::PUT);
		assert_eq!(request.url().as_str(), "http://192.168.1.2/api/secret/lights/3/state");
		assert_eq!(json_body(&request), json!({"on": true, "bri": 127}));
	}

	#[test]
	fn set_state_sends_only_the_changed_fields() {
		let bridge = Bridge::new("192.168.1.2").login("secret");
		let request = bridge.set_state_request(7, &StateUpdate::power(false)).unwrap();
		assert_eq!(request.url().path(), "/api/secret/lights/7/state");
		assert_eq!(json_body(&request), json!({"on": false}));
	}

	#[test]
	fn create_user_is_a_post_to_the_api_root() {
		let bridge = Bridge::new("192.168.1.2");
		let request = bridge.create_user_request("huelight#laptop").unwrap();
		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.url().as_str(), "http://192.168.1.2/api");
		assert_eq!(json_body(&request), json!({"devicetype": "huelight#laptop"}));
	}

	#[test]
	fn error_reply_to_put_becomes_api_error() {
		let (host, server) = serve_once(
			r#"[{"error":{"type":201,"address":"/lights/3/state/bri","description":"parameter, bri, is not modifiable. Device is set to off."}}]"#,
		);
		let bridge = Bridge::new(&host).login("secret");
		let result = bridge.set_light_state(3, &StateUpdate::brightness(254));
		let (request_line, body) = server.join().unwrap();

		assert_eq!(request_line, "PUT /api/secret/lights/3/state HTTP/1.1");
		assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"on": true, "bri": 254}));
		match result {
			Err(Error::Api { code, address, .. }) => {
				assert_eq!(code, 201);
				assert_eq!(address, "/lights/3/state/bri");
			}
			other => panic!("expected api error, got {:?}", other),
		}
	}

	#[test]
	fn create_user_returns_the_generated_username() {
		let (host, server) = serve_once(r#"[{"success":{"username":"83b7780291a6ceffbe0bd049104df"}}]"#);
		let bridge = Bridge::new(&host);
		let username = bridge.create_user("huelight#laptop").unwrap();
		let (request_line, body) = server.join().unwrap();

		assert_eq!(request_line, "POST /api HTTP/1.1");
		assert_eq!(
			serde_json::from_str::<Value>(&body).unwrap(),
			json!({"devicetype": "huelight#laptop"})
		);
		assert_eq!(username, "83b7780291a6ceffbe0bd049104df");
	}
}
