// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-reported state and its classification.
//!
//! A Kasa device describes itself through one JSON blob, the `get_sysinfo`
//! result. [`SysInfo`] decodes it field-for-field, tolerating the gaps and
//! spelling drift between firmware generations (plugs say `type` where bulbs
//! say `mic_type`, strip children carry only a handful of fields).
//! [`DeviceKind`] turns a snapshot into a device class with a fixed
//! first-match-wins heuristic.
//!
//! # Examples
//!
//! ```
//! use kasalink::state::{DeviceKind, SysInfo};
//!
//! let info = SysInfo {
//!     mic_type: Some("IOT.SMARTPLUGSWITCH".to_string()),
//!     ..SysInfo::default()
//! };
//!
//! assert_eq!(DeviceKind::classify(Some(&info)), DeviceKind::Plug);
//! assert_eq!(DeviceKind::classify(None), DeviceKind::Unknown);
//! ```

mod kind;
mod sysinfo;

pub use kind::DeviceKind;
pub use sysinfo::{DefaultOnState, LightState, Location, NextAction, SysInfo};
