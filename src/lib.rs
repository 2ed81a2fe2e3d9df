// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kasalink - A Rust library to control TP-Link Kasa devices over the LAN.
//!
//! This library speaks the Kasa plaintext-XOR protocol directly to devices
//! on the local network. No cloud account, no vendor SDK.
//!
//! # Supported Features
//!
//! - **Discovery**: find devices via UDP broadcast, bounded or streaming
//! - **Power control**: switch plugs, strips, dimmers and lamps on and off
//! - **Light control**: brightness with optional fade transitions
//! - **Onboarding**: scan for Wi-Fi networks and join one
//! - **Device clock**: read and set the on-device time
//! - **Command dispatch**: invoke operations by name from consoles or scripts
//!
//! # Supported Devices
//!
//! - Smart plugs (HS100, HS103, KP115 and similar)
//! - Power strips with per-socket control (HS300, KP303)
//! - In-wall dimmers (HS220)
//! - Smart bulbs (KL110, LB130) and light strips (KL430)
//!
//! Anything that answers `get_sysinfo` but fits none of those classes is
//! still usable through the common surface as an unknown device.
//!
//! # Quick Start
//!
//! ## Direct Connection
//!
//! ```no_run
//! use std::net::IpAddr;
//!
//! use kasalink::{SmartDevice, Switch};
//!
//! #[tokio::main]
//! async fn main() -> kasalink::Result<()> {
//!     // Connect, fetch state, and classify in one step
//!     let device = SmartDevice::connect(IpAddr::from([192, 168, 1, 40])).await?;
//!     println!("{} is a {}", device.device().alias(), device.kind());
//!
//!     device.turn_on().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Discovery
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use kasalink::Switch;
//!
//! #[tokio::main]
//! async fn main() -> kasalink::Result<()> {
//!     for device in kasalink::discover(Duration::from_secs(3)).await? {
//!         let inner = device.device();
//!         println!("{} at {}: {}", inner.alias(), inner.addr(), device.kind());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Power Strip Sockets
//!
//! ```no_run
//! use std::net::IpAddr;
//!
//! use kasalink::{SmartDevice, Switch};
//!
//! #[tokio::main]
//! async fn main() -> kasalink::Result<()> {
//!     let device = SmartDevice::connect(IpAddr::from([192, 168, 1, 41])).await?;
//!     if let Some(strip) = device.as_strip() {
//!         for socket in strip.sockets() {
//!             println!("{}: on={}", socket.alias(), socket.is_on());
//!             socket.turn_off().await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Name-Based Dispatch
//!
//! ```no_run
//! use std::net::IpAddr;
//!
//! use kasalink::{CommandRegistry, CommandTarget, SmartDevice};
//!
//! #[tokio::main]
//! async fn main() -> kasalink::Result<()> {
//!     let device = SmartDevice::connect(IpAddr::from([192, 168, 1, 42])).await?;
//!     let registry = CommandRegistry::new();
//!     let args = vec!["40".to_string()];
//!     registry
//!         .invoke(CommandTarget::Device(&device), "set_brightness", &args)
//!         .await?;
//!     Ok(())
//! }
//! ```

mod device;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod request;
pub mod response;
pub mod state;

pub use device::{Bulb, Device, Dimmer, LightStrip, Plug, SmartDevice, Strip, StripSocket, Switch};
pub use discovery::{
    DiscoveryOptions, DiscoveryStream, discover, discover_stream, discover_stream_with,
    discover_with,
};
pub use dispatch::{CommandHelp, CommandRegistry, CommandTarget, Reply};
pub use error::{DeviceError, DispatchError, Error, ProtocolError, Result, TransportError};
pub use protocol::TcpClient;
pub use request::Request;
pub use response::{DeviceTime, KeyType, QueryResponse, WifiNetwork, WifiScanInfo};
pub use state::{DefaultOnState, DeviceKind, LightState, Location, NextAction, SysInfo};
