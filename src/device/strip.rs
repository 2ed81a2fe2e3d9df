// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power strips and their individually addressable sockets.
//!
//! A [`Strip`] is one network device with several outputs. Its sockets are
//! not devices of their own: a [`StripSocket`] is a view borrowing the strip,
//! holding nothing but the child identifier. Every state read scans the
//! strip's current child records, so a socket always reflects the strip's
//! latest refresh and can never hold a stale copy of its own.
//!
//! Commands for one socket travel over the strip's transport wrapped in the
//! child-addressing envelope, targeted by the parent identifier concatenated
//! with the child id.
//!
//! # Examples
//!
//! ```no_run
//! use kasalink::{SmartDevice, Switch};
//!
//! # async fn example() -> kasalink::Result<()> {
//! let device = SmartDevice::connect("192.168.1.60".parse().unwrap()).await?;
//! if let Some(strip) = device.as_strip() {
//!     for socket in strip.sockets() {
//!         println!("{}: {}", socket.alias(), socket.is_on());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::device::{Device, Switch};
use crate::error::Result;
use crate::request::{Request, SERVICE_SYSTEM};
use crate::state::SysInfo;

/// A multi-socket power strip (HS300/KP303-series).
#[derive(Debug)]
pub struct Strip {
    device: Device,
}

impl Strip {
    pub(crate) fn new(device: Device) -> Self {
        Self { device }
    }

    /// The shared state holder.
    #[must_use]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Unwraps back into the shared state holder.
    #[must_use]
    pub fn into_device(self) -> Device {
        self.device
    }

    /// One view per child record, in the order the device reports them.
    ///
    /// Empty until state is cached. The views borrow this strip; refresh the
    /// strip and existing views observe the new state.
    #[must_use]
    pub fn sockets(&self) -> Vec<StripSocket<'_>> {
        self.device
            .child_ids()
            .into_iter()
            .map(|child_id| StripSocket {
                strip: self,
                child_id,
            })
            .collect()
    }

    /// The child-addressing identifier for one socket: the strip's device id
    /// with the child id appended.
    fn scoped_id(&self, child_id: &str) -> String {
        format!("{}{}", self.device.device_id(), child_id)
    }
}

impl Switch for Strip {
    /// Whether any socket is on.
    fn is_on(&self) -> bool {
        self.device.any_child_on()
    }

    /// Switches every socket on, in reported order.
    ///
    /// Fails fast: the first socket error is returned as-is and later
    /// sockets are not attempted, so earlier ones may already have switched.
    async fn turn_on(&self) -> Result<()> {
        for socket in self.sockets() {
            socket.turn_on().await?;
        }
        Ok(())
    }

    /// Switches every socket off, in reported order. Fails fast like
    /// [`turn_on`](Strip::turn_on).
    async fn turn_off(&self) -> Result<()> {
        for socket in self.sockets() {
            socket.turn_off().await?;
        }
        Ok(())
    }
}

/// One socket of a [`Strip`], as a borrowed view.
///
/// Holds only the child identifier; all state reads go through the parent's
/// cached snapshot and all commands through the parent's transport.
#[derive(Debug)]
pub struct StripSocket<'a> {
    strip: &'a Strip,
    child_id: String,
}

impl StripSocket<'_> {
    /// The owning strip.
    #[must_use]
    pub fn parent(&self) -> &Strip {
        self.strip
    }

    /// The bare child identifier as the device reports it.
    #[must_use]
    pub fn child_id(&self) -> &str {
        &self.child_id
    }

    /// This socket's device identifier: the parent's id with the child id
    /// appended. Also the `child_ids` target used on the wire.
    #[must_use]
    pub fn device_id(&self) -> String {
        self.strip.scoped_id(&self.child_id)
    }

    /// This socket's child record from the parent's current state, or `None`
    /// when a refresh no longer lists this child.
    #[must_use]
    pub fn state(&self) -> Option<SysInfo> {
        self.strip.device.child_record(&self.child_id)
    }

    /// The socket's user-assigned name; empty when the child is gone.
    #[must_use]
    pub fn alias(&self) -> String {
        self.state().and_then(|info| info.alias).unwrap_or_default()
    }

    /// The instant this socket switched on, derived from its uptime counter.
    #[must_use]
    pub fn on_since(&self) -> Option<DateTime<Utc>> {
        self.state().and_then(|info| info.on_since())
    }

    /// Renames this socket, then refreshes the parent.
    ///
    /// # Errors
    ///
    /// Returns an error when the command or the follow-up refresh fails.
    pub async fn set_alias(&self, alias: &str) -> Result<()> {
        let request = Request::new(SERVICE_SYSTEM, "set_dev_alias", json!({ "alias": alias }))
            .with_child(self.device_id());
        self.strip.device.execute(&request).await?;
        self.strip.device.refresh().await
    }

    async fn set_relay(&self, on: bool) -> Result<()> {
        let request = Request::new(
            SERVICE_SYSTEM,
            "set_relay_state",
            json!({ "state": u8::from(on) }),
        )
        .with_child(self.device_id());
        self.strip.device.execute(&request).await.map(|_| ())
    }
}

impl Switch for StripSocket<'_> {
    fn is_on(&self) -> bool {
        self.state().is_some_and(|info| info.relay_on())
    }

    async fn turn_on(&self) -> Result<()> {
        self.set_relay(true).await
    }

    async fn turn_off(&self) -> Result<()> {
        self.set_relay(false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TcpClient;
    use serde_json::json;
    use std::net::SocketAddr;

    fn addr() -> SocketAddr {
        "192.168.1.60:9999".parse().unwrap()
    }

    fn strip_info(fan_on: u8, heater_on: u8) -> SysInfo {
        serde_json::from_value(json!({
            "alias": "Workbench strip",
            "model": "HS300(US)",
            "deviceId": "8006A8C123DD88E1F7C9A012B3456789ABCDEF01",
            "mic_type": "IOT.SMARTPLUGSWITCH",
            "child_num": 2,
            "children": [
                {"id": "00", "state": fan_on, "alias": "Fan", "on_time": 60},
                {"id": "01", "state": heater_on, "alias": "Heater", "on_time": 0}
            ]
        }))
        .unwrap()
    }

    fn strip_with(info: SysInfo) -> Strip {
        Strip::new(Device::from_parts(TcpClient::from_addr(addr()), info))
    }

    #[test]
    fn sockets_follow_reported_order() {
        let strip = strip_with(strip_info(1, 0));
        let sockets = strip.sockets();
        assert_eq!(sockets.len(), 2);
        assert_eq!(sockets[0].child_id(), "00");
        assert_eq!(sockets[0].alias(), "Fan");
        assert_eq!(sockets[1].child_id(), "01");
        assert_eq!(sockets[1].alias(), "Heater");
    }

    #[test]
    fn socket_id_concatenates_parent_and_child() {
        let strip = strip_with(strip_info(1, 0));
        let sockets = strip.sockets();
        assert_eq!(
            sockets[0].device_id(),
            "8006A8C123DD88E1F7C9A012B3456789ABCDEF0100"
        );
    }

    #[test]
    fn socket_power_reads_its_own_child_record() {
        let strip = strip_with(strip_info(1, 0));
        let sockets = strip.sockets();
        assert!(sockets[0].is_on());
        assert!(sockets[1].is_off());
        assert!(sockets[0].on_since().is_some());
        assert!(sockets[1].on_since().is_none());
    }

    #[test]
    fn strip_is_on_when_any_child_is() {
        assert!(strip_with(strip_info(1, 0)).is_on());
        assert!(strip_with(strip_info(0, 1)).is_on());
        assert!(strip_with(strip_info(0, 0)).is_off());
    }

    #[test]
    fn views_observe_the_parents_latest_refresh() {
        let strip = strip_with(strip_info(1, 0));
        let sockets = strip.sockets();
        assert!(sockets[0].is_on());

        // simulate a refresh flipping the fan off and the heater on
        strip.device().store(strip_info(0, 1));
        assert!(sockets[0].is_off());
        assert!(sockets[1].is_on());
    }

    #[test]
    fn vanished_child_reads_absent_and_off() {
        let strip = strip_with(strip_info(1, 0));
        let sockets = strip.sockets();

        let mut shrunk = strip_info(0, 0);
        shrunk.children.as_mut().unwrap().remove(0);
        strip.device().store(shrunk);

        assert!(sockets[0].state().is_none());
        assert!(sockets[0].is_off());
        assert_eq!(sockets[0].alias(), "");
    }

    #[test]
    fn stripless_state_has_no_sockets() {
        let strip = Strip::new(Device::from_addr(addr()));
        assert!(strip.sockets().is_empty());
        assert!(strip.is_off());
    }

    #[test]
    fn child_envelope_targets_the_concatenated_id() {
        let strip = strip_with(strip_info(1, 0));
        let socket = &strip.sockets()[0];
        let request = Request::new(SERVICE_SYSTEM, "set_relay_state", json!({"state": 0}))
            .with_child(socket.device_id());
        assert_eq!(
            request.to_value(),
            json!({
                "context": {
                    "child_ids": ["8006A8C123DD88E1F7C9A012B3456789ABCDEF0100"],
                    "system": {"set_relay_state": {"state": 0}}
                }
            })
        );
    }
}
