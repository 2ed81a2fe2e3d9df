// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name-based command dispatch for consoles and scripts.
//!
//! [`CommandRegistry`] maps operation names to handlers. Each handler
//! coerces its string arguments, runs the operation against a
//! [`CommandTarget`], and returns an ordered list of [`Reply`] values ready
//! to print. Argument coercion failures surface before any network traffic.
//!
//! # Examples
//!
//! ```no_run
//! use kasalink::{CommandRegistry, CommandTarget, SmartDevice};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let device = SmartDevice::connect("192.168.1.40".parse()?).await?;
//! let registry = CommandRegistry::new();
//! let replies = registry
//!     .invoke(CommandTarget::Device(&device), "turn_on", &[])
//!     .await?;
//! for reply in replies {
//!     println!("{reply}");
//! }
//! # Ok(())
//! # }
//! ```

mod coerce;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::device::{Device, SmartDevice, StripSocket, Switch};
use crate::error::{DeviceError, DispatchError, Result};
use crate::response::KeyType;
use crate::state::DeviceKind;

// ========== Targets and replies ==========

/// What a dispatched command operates on.
///
/// Operations that only make sense for a whole device (Wi-Fi, clock,
/// reboot) route through the socket's parent when the target is a
/// [`StripSocket`]; identity and power operations stay child-scoped.
#[derive(Clone, Copy)]
pub enum CommandTarget<'a> {
    /// A classified device handle.
    Device(&'a SmartDevice),
    /// One socket of a power strip.
    Socket(&'a StripSocket<'a>),
}

impl<'a> CommandTarget<'a> {
    /// The underlying transport device (the parent for sockets).
    #[must_use]
    pub fn device(self) -> &'a Device {
        match self {
            Self::Device(device) => device.device(),
            Self::Socket(socket) => socket.parent().device(),
        }
    }

    /// The kind of the target.
    #[must_use]
    pub fn kind(self) -> DeviceKind {
        match self {
            Self::Device(device) => device.kind(),
            Self::Socket(_) => DeviceKind::StripSocket,
        }
    }

    /// The alias of the device or socket.
    #[must_use]
    pub fn alias(self) -> String {
        match self {
            Self::Device(device) => device.device().alias(),
            Self::Socket(socket) => socket.alias(),
        }
    }

    /// The unique id of the device or socket.
    #[must_use]
    pub fn device_id(self) -> String {
        match self {
            Self::Device(device) => device.device().device_id(),
            Self::Socket(socket) => socket.device_id(),
        }
    }

    /// When the output last came on, if it is on now.
    #[must_use]
    pub fn on_since(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Device(device) => device.device().on_since(),
            Self::Socket(socket) => socket.on_since(),
        }
    }

    /// Whether the output is on, from the last known state.
    #[must_use]
    pub fn is_on(self) -> bool {
        match self {
            Self::Device(device) => device.is_on(),
            Self::Socket(socket) => socket.is_on(),
        }
    }

    /// Renames the device or socket.
    pub async fn set_alias(self, alias: &str) -> Result<()> {
        match self {
            Self::Device(device) => device.device().set_alias(alias).await,
            Self::Socket(socket) => socket.set_alias(alias).await,
        }
    }

    /// Switches the output on.
    pub async fn turn_on(self) -> Result<()> {
        match self {
            Self::Device(device) => device.turn_on().await,
            Self::Socket(socket) => socket.turn_on().await,
        }
    }

    /// Switches the output off.
    pub async fn turn_off(self) -> Result<()> {
        match self {
            Self::Device(device) => device.turn_off().await,
            Self::Socket(socket) => socket.turn_off().await,
        }
    }

    /// Sets the brightness where the target supports it.
    pub async fn set_brightness(self, percent: i64) -> Result<()> {
        match self {
            Self::Device(device) => device.set_brightness(percent).await,
            Self::Socket(_) => Err(DeviceError::UnsupportedCapability {
                capability: "brightness",
            }
            .into()),
        }
    }
}

/// One value produced by a dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A yes/no result.
    Bool(bool),
    /// An integer result.
    Int(i64),
    /// A floating-point result.
    Float(f64),
    /// A textual result.
    Text(String),
    /// An absolute instant.
    Timestamp(DateTime<Utc>),
    /// Civil time from a device clock whose zone is not reported.
    CivilTime(NaiveDateTime),
    /// A structured result rendered as JSON.
    Json(Value),
    /// The absence of a value.
    Null,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Timestamp(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::CivilTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Json(value) => write!(f, "{value}"),
            Self::Null => Ok(()),
        }
    }
}

// ========== Registry ==========

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Reply>>> + Send + 'a>>;
type Handler = for<'a> fn(CommandTarget<'a>, &'a [String]) -> HandlerFuture<'a>;

struct CommandEntry {
    usage: &'static str,
    summary: &'static str,
    min_args: usize,
    handler: Handler,
}

/// Description of one registered command, for help listings.
#[derive(Debug, Clone, Copy)]
pub struct CommandHelp {
    /// The name the command is invoked under.
    pub name: &'static str,
    /// Usage string describing the expected arguments.
    pub usage: &'static str,
    /// One-line description.
    pub summary: &'static str,
}

const BUILTINS: &[(&str, &str, &str, usize, Handler)] = &[
    ("alias", "", "Print the alias of the target.", 0, cmd_alias),
    (
        "device_id",
        "",
        "Print the unique id of the target.",
        0,
        cmd_device_id,
    ),
    (
        "device_name",
        "",
        "Print the product name.",
        0,
        cmd_device_name,
    ),
    (
        "device_time",
        "",
        "Print the device clock.",
        0,
        cmd_device_time,
    ),
    (
        "features",
        "",
        "List the advertised feature flags.",
        0,
        cmd_features,
    ),
    (
        "is_off",
        "",
        "Report whether the output is off.",
        0,
        cmd_is_off,
    ),
    ("is_on", "", "Report whether the output is on.", 0, cmd_is_on),
    ("kind", "", "Print the classified device kind.", 0, cmd_kind),
    (
        "led",
        "",
        "Report whether the status LED is lit.",
        0,
        cmd_led,
    ),
    (
        "location",
        "",
        "Print the configured latitude and longitude.",
        0,
        cmd_location,
    ),
    ("mac", "", "Print the MAC address.", 0, cmd_mac),
    ("model", "", "Print the hardware model.", 0, cmd_model),
    (
        "on_since",
        "",
        "Print when the output last came on.",
        0,
        cmd_on_since,
    ),
    (
        "reboot",
        "<seconds>",
        "Reboot after a delay in seconds.",
        1,
        cmd_reboot,
    ),
    (
        "refresh",
        "",
        "Fetch a fresh state snapshot.",
        0,
        cmd_refresh,
    ),
    (
        "rssi",
        "",
        "Print the Wi-Fi signal strength.",
        0,
        cmd_rssi,
    ),
    (
        "set_alias",
        "<name>",
        "Rename the device or socket.",
        1,
        cmd_set_alias,
    ),
    (
        "set_brightness",
        "<percent>",
        "Set the brightness, 1-100; zero or less turns off.",
        1,
        cmd_set_brightness,
    ),
    (
        "set_led",
        "<true|false>",
        "Light or douse the status LED.",
        1,
        cmd_set_led,
    ),
    ("set_mac", "<mac>", "Set the MAC address.", 1, cmd_set_mac),
    (
        "set_time",
        "<timestamp>",
        "Set the device clock.",
        1,
        cmd_set_time,
    ),
    ("turn_off", "", "Switch the output off.", 0, cmd_turn_off),
    ("turn_on", "", "Switch the output on.", 0, cmd_turn_on),
    (
        "wifi_join",
        "<ssid> <password> [key-type]",
        "Join a Wi-Fi network; the key type code defaults to WPA2.",
        2,
        cmd_wifi_join,
    ),
    (
        "wifi_scan",
        "",
        "List the Wi-Fi networks the device can see.",
        0,
        cmd_wifi_scan,
    ),
];

/// Maps operation names to handlers over a [`CommandTarget`].
///
/// The built-in set covers the common device surface plus power, brightness
/// and LED control. Listing order is alphabetical.
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandEntry>,
}

impl CommandRegistry {
    /// Creates a registry holding the built-in command set.
    #[must_use]
    pub fn new() -> Self {
        let commands = BUILTINS
            .iter()
            .map(|&(name, usage, summary, min_args, handler)| {
                (
                    name,
                    CommandEntry {
                        usage,
                        summary,
                        min_args,
                        handler,
                    },
                )
            })
            .collect();
        Self { commands }
    }

    /// Describes every registered command in listing order.
    pub fn commands(&self) -> impl Iterator<Item = CommandHelp> + '_ {
        self.commands.iter().map(|(&name, entry)| CommandHelp {
            name,
            usage: entry.usage,
            summary: entry.summary,
        })
    }

    /// Runs `name` against `target` with string arguments.
    ///
    /// Unknown names and missing or malformed arguments fail without
    /// touching the network. Errors from the operation itself pass through
    /// unchanged.
    pub async fn invoke(
        &self,
        target: CommandTarget<'_>,
        name: &str,
        args: &[String],
    ) -> Result<Vec<Reply>> {
        let Some((&command, entry)) = self.commands.get_key_value(name) else {
            return Err(DispatchError::UnknownCommand {
                name: name.to_string(),
            }
            .into());
        };
        if args.len() < entry.min_args {
            return Err(DispatchError::MissingArguments {
                command,
                usage: entry.usage,
            }
            .into());
        }
        debug!(command, args = args.len(), "dispatching");
        (entry.handler)(target, args).await
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ========== Handlers ==========

fn cmd_alias<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.alias())]) })
}

fn cmd_device_id<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.device_id())]) })
}

fn cmd_device_name<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.device().device_name())]) })
}

fn cmd_device_time<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let clock = target.device().device_time().await?;
        Ok(vec![Reply::CivilTime(clock)])
    })
}

fn cmd_features<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        Ok(target
            .device()
            .features()
            .into_iter()
            .map(Reply::Text)
            .collect())
    })
}

fn cmd_is_off<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Bool(!target.is_on())]) })
}

fn cmd_is_on<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Bool(target.is_on())]) })
}

fn cmd_kind<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.kind().to_string())]) })
}

fn cmd_led<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Bool(target.device().is_led_on())]) })
}

fn cmd_location<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let replies = match target.device().location() {
            Some(spot) => vec![Reply::Float(spot.latitude), Reply::Float(spot.longitude)],
            None => vec![Reply::Null],
        };
        Ok(replies)
    })
}

fn cmd_mac<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.device().mac())]) })
}

fn cmd_model<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Text(target.device().model())]) })
}

fn cmd_on_since<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let replies = match target.on_since() {
            Some(stamp) => vec![Reply::Timestamp(stamp)],
            None => vec![Reply::Null],
        };
        Ok(replies)
    })
}

fn cmd_reboot<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let delay = coerce::seconds(&args[0])?;
        target.device().reboot(delay).await?;
        Ok(Vec::new())
    })
}

fn cmd_refresh<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        target.device().refresh().await?;
        Ok(Vec::new())
    })
}

fn cmd_rssi<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(vec![Reply::Int(i64::from(target.device().rssi()))]) })
}

fn cmd_set_alias<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        target.set_alias(&args[0]).await?;
        Ok(Vec::new())
    })
}

fn cmd_set_brightness<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let percent = coerce::integer(&args[0])?;
        target.set_brightness(percent).await?;
        Ok(Vec::new())
    })
}

fn cmd_set_led<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let lit = coerce::boolean(&args[0])?;
        target.device().set_led(lit).await?;
        Ok(Vec::new())
    })
}

fn cmd_set_mac<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        target.device().set_mac(&args[0]).await?;
        Ok(Vec::new())
    })
}

fn cmd_set_time<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let instant = coerce::timestamp(&args[0])?;
        target.device().set_time(instant).await?;
        Ok(Vec::new())
    })
}

fn cmd_turn_off<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        target.turn_off().await?;
        Ok(Vec::new())
    })
}

fn cmd_turn_on<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        target.turn_on().await?;
        Ok(Vec::new())
    })
}

fn cmd_wifi_join<'a>(target: CommandTarget<'a>, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let codes = args[2..]
            .iter()
            .map(|arg| coerce::integer(arg))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let key_type = match codes.first() {
            None => KeyType::default(),
            Some(&code) => {
                KeyType::from_code(code).ok_or(DispatchError::InvalidArgument {
                    value: code.to_string(),
                    expected: "key type",
                })?
            }
        };
        target.device().wifi_join(&args[0], &args[1], key_type).await?;
        Ok(Vec::new())
    })
}

fn cmd_wifi_scan<'a>(target: CommandTarget<'a>, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let networks = target.device().wifi_scan().await?;
        Ok(vec![Reply::Json(
            serde_json::to_value(networks).unwrap_or_default(),
        )])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Strip;
    use crate::error::Error;
    use crate::state::SysInfo;
    use chrono::TimeZone;
    use serde_json::json;

    fn state(raw: Value) -> SysInfo {
        serde_json::from_value(raw).unwrap()
    }

    fn plug() -> SmartDevice {
        SmartDevice::from_state(
            "192.168.1.40:9999".parse().unwrap(),
            state(json!({
                "alias": "Desk plug",
                "model": "HS103(US)",
                "deviceId": "8006A8C123DD88E1F7C9A012B3456789ABCDEF01",
                "mic_type": "IOT.SMARTPLUGSWITCH",
                "mac": "50:C7:BF:11:22:33",
                "rssi": -61,
                "relay_state": 1,
                "on_time": 120,
                "latitude_i": 377749,
                "longitude_i": -1224194,
                "feature": "TIM:ENE",
                "led_off": 0
            })),
        )
    }

    fn strip() -> Strip {
        let device = SmartDevice::from_state(
            "192.168.1.41:9999".parse().unwrap(),
            state(json!({
                "alias": "Bench strip",
                "model": "HS300(US)",
                "deviceId": "8006A8C123DD88E1F7C9A012B3456789ABCDEF01",
                "mic_type": "IOT.SMARTPLUGSWITCH",
                "children": [
                    {"id": "00", "alias": "Left", "state": 1, "on_time": 60},
                    {"id": "01", "alias": "Right", "state": 0}
                ]
            })),
        );
        match device {
            SmartDevice::Strip(strip) => strip,
            other => panic!("expected a strip, classified as {}", other.kind()),
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let device = plug();
        let registry = CommandRegistry::new();
        let err = registry
            .invoke(CommandTarget::Device(&device), "blink", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dispatch(DispatchError::UnknownCommand { .. })
        ));
        assert_eq!(err.to_string(), "dispatch error: unknown command: blink");
    }

    #[tokio::test]
    async fn missing_arguments_name_the_usage() {
        let device = plug();
        let registry = CommandRegistry::new();
        let err = registry
            .invoke(CommandTarget::Device(&device), "set_alias", &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "dispatch error: set_alias expects <name>");
    }

    #[tokio::test]
    async fn cached_projections_reply_without_io() {
        let device = plug();
        let registry = CommandRegistry::new();
        let target = CommandTarget::Device(&device);

        let replies = registry.invoke(target, "alias", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("Desk plug".to_string())]);

        let replies = registry.invoke(target, "model", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("HS103(US)".to_string())]);

        let replies = registry.invoke(target, "rssi", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Int(-61)]);

        let replies = registry.invoke(target, "kind", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("plug".to_string())]);

        let replies = registry.invoke(target, "led", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Bool(true)]);
    }

    #[tokio::test]
    async fn features_fan_out_one_reply_each() {
        let device = plug();
        let registry = CommandRegistry::new();
        let replies = registry
            .invoke(CommandTarget::Device(&device), "features", &[])
            .await
            .unwrap();
        assert_eq!(
            replies,
            vec![
                Reply::Text("TIM".to_string()),
                Reply::Text("ENE".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn location_replies_latitude_then_longitude() {
        let device = plug();
        let registry = CommandRegistry::new();
        let replies = registry
            .invoke(CommandTarget::Device(&device), "location", &[])
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::Float(37.7749), Reply::Float(-122.4194)]);
    }

    #[tokio::test]
    async fn absent_optionals_reply_null() {
        // no snapshot has ever been cached for this handle
        let device = SmartDevice::from_device(Device::new("192.168.1.42".parse().unwrap()));
        let registry = CommandRegistry::new();
        let target = CommandTarget::Device(&device);

        let replies = registry.invoke(target, "location", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Null]);

        let replies = registry.invoke(target, "on_since", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Null]);
    }

    #[tokio::test]
    async fn power_predicates_reply_bool() {
        let device = plug();
        let registry = CommandRegistry::new();
        let target = CommandTarget::Device(&device);

        let replies = registry.invoke(target, "is_on", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Bool(true)]);

        let replies = registry.invoke(target, "is_off", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Bool(false)]);
    }

    #[tokio::test]
    async fn socket_target_uses_child_identity() {
        let strip = strip();
        let sockets = strip.sockets();
        let registry = CommandRegistry::new();
        let target = CommandTarget::Socket(&sockets[1]);

        let replies = registry.invoke(target, "alias", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("Right".to_string())]);

        let replies = registry.invoke(target, "device_id", &[]).await.unwrap();
        assert_eq!(
            replies,
            vec![Reply::Text(
                "8006A8C123DD88E1F7C9A012B3456789ABCDEF0101".to_string()
            )]
        );

        let replies = registry.invoke(target, "kind", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("strip socket".to_string())]);

        let replies = registry.invoke(target, "is_on", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Bool(false)]);

        // whole-device projections route through the parent
        let replies = registry.invoke(target, "model", &[]).await.unwrap();
        assert_eq!(replies, vec![Reply::Text("HS300(US)".to_string())]);
    }

    #[tokio::test]
    async fn brightness_is_refused_on_relay_outlets() {
        let device = plug();
        let registry = CommandRegistry::new();
        let err = registry
            .invoke(
                CommandTarget::Device(&device),
                "set_brightness",
                &args(&["50"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::UnsupportedCapability {
                capability: "brightness"
            })
        ));

        let strip = strip();
        let sockets = strip.sockets();
        let err = registry
            .invoke(CommandTarget::Socket(&sockets[0]), "set_brightness", &args(&["50"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::UnsupportedCapability { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_arguments_fail_before_any_network_call() {
        let device = plug();
        let registry = CommandRegistry::new();
        let target = CommandTarget::Device(&device);

        let err = registry
            .invoke(target, "set_time", &args(&["never"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dispatch error: cannot parse timestamp from \"never\""
        );

        let err = registry
            .invoke(target, "set_brightness", &args(&["bright"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dispatch error: cannot parse integer from \"bright\""
        );

        let err = registry
            .invoke(target, "set_led", &args(&["on"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dispatch error: cannot parse boolean from \"on\""
        );
    }

    #[tokio::test]
    async fn wifi_join_rejects_unknown_key_codes() {
        let device = plug();
        let registry = CommandRegistry::new();
        let err = registry
            .invoke(
                CommandTarget::Device(&device),
                "wifi_join",
                &args(&["lab", "hunter2", "9"]),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dispatch error: cannot parse key type from \"9\""
        );
    }

    #[test]
    fn listing_is_sorted_and_described() {
        let registry = CommandRegistry::new();
        let listing: Vec<CommandHelp> = registry.commands().collect();
        assert_eq!(listing.len(), BUILTINS.len());
        assert!(listing.windows(2).all(|pair| pair[0].name < pair[1].name));
        assert!(listing.iter().all(|help| !help.summary.is_empty()));

        let join = listing
            .iter()
            .find(|help| help.name == "wifi_join")
            .unwrap();
        assert_eq!(join.usage, "<ssid> <password> [key-type]");
    }

    #[test]
    fn replies_render_for_consoles() {
        assert_eq!(Reply::Bool(true).to_string(), "true");
        assert_eq!(Reply::Int(-61).to_string(), "-61");
        assert_eq!(Reply::Float(52.1).to_string(), "52.1");
        assert_eq!(Reply::Text("Desk plug".to_string()).to_string(), "Desk plug");
        assert_eq!(
            Reply::Timestamp(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()).to_string(),
            "2021-06-01T12:00:00Z"
        );
        assert_eq!(
            Reply::CivilTime(
                Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0)
                    .unwrap()
                    .naive_utc()
            )
            .to_string(),
            "2021-06-01 12:00:00"
        );
        assert_eq!(Reply::Json(json!({"ssid": "lab"})).to_string(), "{\"ssid\":\"lab\"}");
        assert_eq!(Reply::Null.to_string(), "");
    }
}
