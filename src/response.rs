// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed views of Kasa responses.
//!
//! A response mirrors the request envelope: top-level keys name the service
//! that answered, nested keys the command. Firmware generations answer the
//! same question under different service names (`time` vs.
//! `smartlife.iot.common.timesetting`, `netif` vs. the onboarding service),
//! so [`QueryResponse`] decodes all known spellings and the accessors pick
//! whichever answered.
//!
//! Mutations get no typed struct: their success body varies by firmware, so
//! they decode as raw JSON and only the embedded `err_code` is inspected.

use std::net::SocketAddr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DeviceError, Result};
use crate::state::{LightState, SysInfo};

/// Decoded response envelope covering every service this library queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// The `system` service section.
    #[serde(default)]
    pub system: Option<SystemSection>,
    /// Clock section from relay firmware.
    #[serde(default, rename = "time")]
    pub time: Option<TimeSection>,
    /// Clock section from lamp firmware.
    #[serde(default, rename = "smartlife.iot.common.timesetting")]
    pub time_common: Option<TimeSection>,
    /// Wi-Fi section from relay firmware.
    #[serde(default, rename = "netif")]
    pub netif: Option<WifiSection>,
    /// Wi-Fi section from lamp and legacy firmware.
    #[serde(default, rename = "smartlife.iot.common.softaponboarding")]
    pub onboarding: Option<WifiSection>,
    /// Lamp light-state section.
    #[serde(default, rename = "smartlife.iot.smartbulb.lightingservice")]
    pub lighting: Option<LightingSection>,
}

impl QueryResponse {
    /// Extracts the state blob from a `get_sysinfo` response.
    #[must_use]
    pub fn into_sysinfo(self) -> Option<SysInfo> {
        self.system.and_then(|section| section.get_sysinfo)
    }

    /// Extracts the clock fields, whichever service answered.
    #[must_use]
    pub fn into_device_time(self) -> Option<DeviceTime> {
        self.time
            .or(self.time_common)
            .and_then(|section| section.get_time)
    }

    /// Extracts the scan result, whichever service answered.
    #[must_use]
    pub fn into_scan(self) -> Option<WifiScanInfo> {
        self.netif
            .or(self.onboarding)
            .and_then(|section| section.get_scaninfo)
    }

    /// Extracts the live lamp state from a `get_light_state` response.
    #[must_use]
    pub fn into_light_state(self) -> Option<LightState> {
        self.lighting.and_then(|section| section.get_light_state)
    }
}

/// The `system` service section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemSection {
    /// State blob, present on `get_sysinfo` responses.
    #[serde(default)]
    pub get_sysinfo: Option<SysInfo>,
}

/// A clock service section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeSection {
    /// Civil-time fields, present on `get_time` responses.
    #[serde(default)]
    pub get_time: Option<DeviceTime>,
}

/// A Wi-Fi service section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WifiSection {
    /// Scan result, present on `get_scaninfo` responses.
    #[serde(default)]
    pub get_scaninfo: Option<WifiScanInfo>,
}

/// The lamp light-state service section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightingSection {
    /// Live lamp state, present on `get_light_state` responses.
    #[serde(default)]
    pub get_light_state: Option<LightState>,
}

/// Civil time as the device's clock reports it.
///
/// The device does not disclose an offset here; interpreting these fields
/// against a zone is the caller's business.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceTime {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "mday")]
    pub day: u32,
    pub hour: u32,
    #[serde(rename = "min")]
    pub minute: u32,
    #[serde(rename = "sec")]
    pub second: u32,
    #[serde(default)]
    pub err_code: i64,
}

impl DeviceTime {
    /// Assembles the fields into a naive datetime.
    ///
    /// `None` when the device reports an impossible date.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
    }
}

/// Result of a Wi-Fi scan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WifiScanInfo {
    /// Networks the device can see.
    #[serde(default)]
    pub ap_list: Vec<WifiNetwork>,
    /// 1 when the firmware can join WPA3 networks.
    #[serde(default)]
    pub wpa3_support: Option<u8>,
    #[serde(default)]
    pub err_code: i64,
}

/// One access point in a scan result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    /// Network name.
    pub ssid: String,
    /// Security code as firmware reports it; see [`KeyType`].
    pub key_type: u8,
}

/// Wi-Fi security types the firmware understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    /// Open network.
    None,
    /// WEP.
    Wep,
    /// WPA-PSK.
    Wpa,
    /// WPA2-PSK, the firmware default.
    #[default]
    Wpa2,
}

impl KeyType {
    /// The code sent on the wire.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Wep => 1,
            Self::Wpa => 2,
            Self::Wpa2 => 3,
        }
    }

    /// Maps a wire code back to a key type.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Wep),
            2 => Some(Self::Wpa),
            3 => Some(Self::Wpa2),
            _ => None,
        }
    }
}

/// Checks a mutation response for an embedded rejection.
///
/// Walks the service/command nesting and fails on the first non-zero
/// `err_code`. Bodies without one pass; firmware success shapes vary too
/// much to demand more.
pub(crate) fn ensure_success(addr: SocketAddr, command: &str, body: &Value) -> Result<()> {
    if let Some(code) = first_error_code(body) {
        return Err(DeviceError::CommandRejected {
            addr,
            command: command.to_string(),
            code,
        }
        .into());
    }
    Ok(())
}

fn first_error_code(body: &Value) -> Option<i64> {
    for section in body.as_object()?.values() {
        let Some(commands) = section.as_object() else {
            continue;
        };
        for result in commands.values() {
            if let Some(code) = result.get("err_code").and_then(Value::as_i64)
                && code != 0
            {
                return Some(code);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr() -> SocketAddr {
        "192.168.1.40:9999".parse().unwrap()
    }

    #[test]
    fn sysinfo_envelope() {
        let response: QueryResponse = serde_json::from_value(json!({
            "system": {"get_sysinfo": {"alias": "plug", "relay_state": 1}}
        }))
        .unwrap();
        let info = response.into_sysinfo().unwrap();
        assert_eq!(info.alias.as_deref(), Some("plug"));
    }

    #[test]
    fn time_from_either_service() {
        let body = json!({"get_time": {
            "year": 2021, "month": 6, "mday": 1,
            "hour": 12, "min": 30, "sec": 15, "err_code": 0
        }});
        let std: QueryResponse = serde_json::from_value(json!({"time": body})).unwrap();
        let lamp: QueryResponse =
            serde_json::from_value(json!({"smartlife.iot.common.timesetting": body})).unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_opt(12, 30, 15)
            .unwrap();
        assert_eq!(std.into_device_time().unwrap().to_naive(), Some(expected));
        assert_eq!(lamp.into_device_time().unwrap().to_naive(), Some(expected));
    }

    #[test]
    fn impossible_date_yields_none() {
        let time = DeviceTime {
            year: 2021,
            month: 13,
            day: 1,
            ..DeviceTime::default()
        };
        assert!(time.to_naive().is_none());
    }

    #[test]
    fn scan_envelope_from_onboarding_service() {
        let response: QueryResponse = serde_json::from_value(json!({
            "smartlife.iot.common.softaponboarding": {
                "get_scaninfo": {
                    "ap_list": [
                        {"ssid": "HomeNet", "key_type": 3},
                        {"ssid": "CoffeeShop", "key_type": 0}
                    ],
                    "err_code": 0
                }
            }
        }))
        .unwrap();
        let scan = response.into_scan().unwrap();
        assert_eq!(scan.ap_list.len(), 2);
        assert_eq!(scan.ap_list[0].ssid, "HomeNet");
        assert_eq!(scan.ap_list[0].key_type, KeyType::Wpa2.code());
    }

    #[test]
    fn key_type_codes_round_trip() {
        for kind in [KeyType::None, KeyType::Wep, KeyType::Wpa, KeyType::Wpa2] {
            assert_eq!(KeyType::from_code(i64::from(kind.code())), Some(kind));
        }
        assert_eq!(KeyType::from_code(9), None);
        assert_eq!(KeyType::default(), KeyType::Wpa2);
    }

    #[test]
    fn light_state_envelope() {
        let response: QueryResponse = serde_json::from_value(json!({
            "smartlife.iot.smartbulb.lightingservice": {
                "get_light_state": {"on_off": 1, "brightness": 75}
            }
        }))
        .unwrap();
        let state = response.into_light_state().unwrap();
        assert!(state.is_on());
        assert_eq!(state.brightness, Some(75));
    }

    #[test]
    fn success_body_passes() {
        let body = json!({"system": {"set_relay_state": {"err_code": 0}}});
        assert!(ensure_success(addr(), "set_relay_state", &body).is_ok());
    }

    #[test]
    fn rejection_surfaces_the_code() {
        let body = json!({"system": {"set_mac_addr": {"err_code": -3, "err_msg": "invalid"}}});
        let err = ensure_success(addr(), "set_mac_addr", &body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "device error: device 192.168.1.40:9999 rejected set_mac_addr: error code -3"
        );
    }

    #[test]
    fn shapeless_success_body_passes() {
        assert!(ensure_success(addr(), "reboot", &json!({})).is_ok());
        assert!(ensure_success(addr(), "reboot", &json!("ok")).is_ok());
    }
}
