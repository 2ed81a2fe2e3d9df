// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `get_sysinfo` state blob and its pieces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scale applied to the integer coordinates firmware reports.
const COORDINATE_SCALE: f64 = 10_000.0;

/// A device's self-reported state, as returned by `system`/`get_sysinfo`.
///
/// Every field is optional: firmware generations disagree about which fields
/// exist, strip child records carry only a handful, and unknown fields must
/// never make the decode fail. The same struct describes both whole devices
/// and the child records inside `children`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    /// Operating mode (`"none"`, `"schedule"`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_mode: Option<String>,
    /// User-assigned name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Number of sockets on a power strip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_num: Option<u32>,
    /// Marketing name, e.g. `"Smart Wi-Fi Plug Mini"`.
    #[serde(rename = "dev_name", skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Unique device identifier.
    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Error code echoed inside the state blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_code: Option<i64>,
    /// Colon-separated feature tags, e.g. `"TIM:ENE"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Hardware identifier.
    #[serde(rename = "hwId", skip_serializing_if = "Option::is_none")]
    pub hardware_id: Option<String>,
    /// Hardware revision.
    #[serde(rename = "hw_ver", skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    /// Child identifier; present only on strip child records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_hash: Option<String>,
    /// Lamp capability: color support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_color: Option<u8>,
    /// Lamp capability: brightness support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dimmable: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_factory: Option<bool>,
    /// Lamp capability: adjustable white temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_variable_color_temp: Option<u8>,
    /// 1 when the status LED is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_off: Option<u8>,
    /// Latitude scaled by 10⁴.
    #[serde(rename = "latitude_i", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<i32>,
    /// Number of addressable LEDs on a light strip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// Current lamp state; lamps only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_state: Option<LightState>,
    /// Longitude scaled by 10⁴.
    #[serde(rename = "longitude_i", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<i32>,
    /// MAC address; some lamp firmware spells it `mic_mac`.
    #[serde(alias = "mic_mac", skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Vendor micro-type descriptor; plugs send it as `type`.
    #[serde(rename = "mic_type", alias = "type", skip_serializing_if = "Option::is_none")]
    pub mic_type: Option<String>,
    /// Model string, e.g. `"KP115(US)"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Next scheduled action, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obd_src: Option<String>,
    #[serde(rename = "oemId", skip_serializing_if = "Option::is_none")]
    pub oem_id: Option<String>,
    /// Seconds since the output was switched on; 0 when off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_state: Option<Vec<LightState>>,
    /// Relay flag on plugs, dimmers, and strips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_state: Option<u8>,
    /// Wi-Fi signal strength in dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    /// Relay flag on strip child records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Firmware revision.
    #[serde(rename = "sw_ver", skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updating: Option<u8>,
    /// Child records on power strips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SysInfo>>,
}

impl SysInfo {
    /// Splits the colon-separated feature tags into a list.
    ///
    /// An absent or empty feature string yields an empty list.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        match self.feature.as_deref() {
            None | Some("") => Vec::new(),
            Some(tags) => tags.split(':').map(str::to_string).collect(),
        }
    }

    /// Returns the reported coordinates, unscaled. Devices that were never
    /// geolocated report zeros.
    #[must_use]
    pub fn location(&self) -> Location {
        Location {
            latitude: f64::from(self.latitude.unwrap_or(0)) / COORDINATE_SCALE,
            longitude: f64::from(self.longitude.unwrap_or(0)) / COORDINATE_SCALE,
        }
    }

    /// The instant the output was switched on, derived from the uptime
    /// counter. `None` when the output is off or uptime is absent.
    #[must_use]
    pub fn on_since(&self) -> Option<DateTime<Utc>> {
        match self.on_time {
            None | Some(0) => None,
            Some(seconds) => Some(Utc::now() - chrono::Duration::seconds(seconds)),
        }
    }

    /// Whether the status LED is lit. Firmware stores the inverted flag.
    #[must_use]
    pub fn led_on(&self) -> bool {
        self.led_off.unwrap_or(0) == 0
    }

    /// Relay flag as a boolean; covers whole devices and child records.
    #[must_use]
    pub fn relay_on(&self) -> bool {
        self.relay_state.unwrap_or(0) > 0 || self.state.unwrap_or(0) > 0
    }
}

/// Lamp state, current or nested as a default-on preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    /// 1 when the lamp is emitting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_off: Option<u8>,
    /// White temperature in Kelvin; 0 in color modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u32>,
    /// Hue in degrees, 0-360.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    /// Saturation percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    /// Brightness percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// Lighting mode, e.g. `"normal"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_code: Option<i64>,
    /// Preset restored on power-on; sent while the lamp is off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dft_on_state: Option<DefaultOnState>,
}

impl LightState {
    /// Whether the lamp is currently emitting.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on_off.unwrap_or(0) > 0
    }
}

/// The default-on preset nested inside an off lamp's [`LightState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultOnState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

/// A scheduled action advertised in the state blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    /// Action type; -1 when nothing is scheduled.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
    /// Seconds into the day the action fires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schd_sec: Option<i64>,
    /// Relay state the action applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Geographic coordinates recovered from the scaled integers firmware
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}
