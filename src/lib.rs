#[macro_use]
extern crate serde_derive;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate serde_xml_rs;
#[macro_use]
extern crate tracing;
pub mod error;
pub use error::{Error, ErrorKind, Result};
pub mod lights;
pub use lights::{Light, LightState, StateUpdate};
pub mod bridge;
pub use bridge::{Bridge, BridgeApi};
mod discovery;
pub use discovery::{describe, discover, find_bridges, BridgeDescription, DiscoveredBridge};
pub mod action;
pub mod app;
pub mod config;
pub mod display;
pub mod prompt;
pub mod registry;

pub const APPLICATION_NAME: &str = "huelight";
