// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request envelopes for the Kasa command channel.
//!
//! Every command travels as a single-key JSON object naming a service and a
//! command within it, `{"system": {"get_sysinfo": null}}` being the canonical
//! example. Addressing one socket of a power strip wraps the same structure
//! in a `context` object carrying the target child id. The wrapping must
//! exactly mirror what the firmware expects: omitting `context` when
//! addressing a child (or adding it when not) makes the command silently
//! target the wrong scope.

use serde_json::{Map, Value, json};

/// The core service present on every device.
pub const SERVICE_SYSTEM: &str = "system";
/// Lamp light-state service (bulbs and light strips).
pub const SERVICE_LIGHTING: &str = "smartlife.iot.smartbulb.lightingservice";
/// Wall-dimmer brightness service.
pub const SERVICE_DIMMER: &str = "smartlife.iot.dimmer";
/// Clock service on relay devices.
pub const SERVICE_TIME: &str = "time";
/// Clock service on lamp firmware.
pub const SERVICE_TIME_COMMON: &str = "smartlife.iot.common.timesetting";
/// Wi-Fi service on relay devices.
pub const SERVICE_NETIF: &str = "netif";
/// Wi-Fi service on lamp and legacy firmware.
pub const SERVICE_ONBOARDING: &str = "smartlife.iot.common.softaponboarding";

/// A single command addressed to a service on one device.
///
/// # Examples
///
/// ```
/// use kasalink::request::{Request, SERVICE_SYSTEM};
/// use serde_json::{Value, json};
///
/// let probe = Request::new(SERVICE_SYSTEM, "get_sysinfo", Value::Null);
/// assert_eq!(probe.to_value(), json!({"system": {"get_sysinfo": null}}));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    service: String,
    command: String,
    arg: Value,
    child_ids: Vec<String>,
}

impl Request {
    /// Creates a request for `command` on `service` with the given argument.
    ///
    /// Pass [`Value::Null`] for commands that take no argument.
    #[must_use]
    pub fn new(service: impl Into<String>, command: impl Into<String>, arg: Value) -> Self {
        Self {
            service: service.into(),
            command: command.into(),
            arg,
            child_ids: Vec::new(),
        }
    }

    /// Scopes the request to a single child of a composite device.
    #[must_use]
    pub fn with_child(self, child_id: impl Into<String>) -> Self {
        self.with_child_ids(vec![child_id.into()])
    }

    /// Scopes the request to the given children of a composite device.
    #[must_use]
    pub fn with_child_ids(mut self, child_ids: Vec<String>) -> Self {
        self.child_ids = child_ids;
        self
    }

    /// Returns the service this request is addressed to.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the command name, used for error context.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Builds the wire envelope.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut inner = Map::new();
        inner.insert(self.command.clone(), self.arg.clone());
        let mut service_map = Map::new();
        service_map.insert(self.service.clone(), Value::Object(inner));
        if self.child_ids.is_empty() {
            return Value::Object(service_map);
        }
        let mut context = Map::new();
        context.insert("child_ids".to_string(), json!(self.child_ids));
        context.extend(service_map);
        json!({ "context": Value::Object(context) })
    }

    /// Serializes the wire envelope to a compact JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
