// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device classification from the self-reported state.

use std::fmt;

use crate::state::SysInfo;

/// The device classes this library distinguishes.
///
/// [`StripSocket`](DeviceKind::StripSocket) is never produced by
/// [`classify`](DeviceKind::classify); sockets exist only as views obtained
/// through their parent strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Single-outlet smart plug.
    Plug,
    /// Multi-socket power strip.
    Strip,
    /// One socket of a power strip.
    StripSocket,
    /// In-wall dimmer switch.
    Dimmer,
    /// Smart bulb.
    Bulb,
    /// Addressable light strip.
    LightStrip,
    /// Anything the heuristic cannot place.
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Classifies a state snapshot.
    ///
    /// A pure function of the snapshot, checked first-match-wins in a fixed
    /// order: missing state, then the dimmer marketing name, then the plug
    /// micro-type (strip when child records exist), then the bulb micro-type
    /// (light strip when an LED count is reported). The ordering is
    /// load-bearing: dimmers report a plug-like micro-type and must win on
    /// their name before the micro-type is consulted.
    #[must_use]
    pub fn classify(info: Option<&SysInfo>) -> Self {
        let Some(info) = info else {
            return Self::Unknown;
        };
        if info
            .device_name
            .as_deref()
            .is_some_and(|name| name.contains("Dimmer"))
        {
            return Self::Dimmer;
        }
        let mic_type = info
            .mic_type
            .as_deref()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if mic_type.contains("smartplug") {
            if info.children.as_ref().is_some_and(|c| !c.is_empty()) {
                return Self::Strip;
            }
            return Self::Plug;
        }
        if mic_type.contains("smartbulb") {
            if info.length.unwrap_or(0) > 0 {
                return Self::LightStrip;
            }
            return Self::Bulb;
        }
        Self::Unknown
    }

    /// Whether this class runs lamp firmware (affects service routing and
    /// power semantics).
    #[must_use]
    pub fn is_lamp(self) -> bool {
        matches!(self, Self::Bulb | Self::LightStrip)
    }

    /// Human-readable class name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plug => "plug",
            Self::Strip => "strip",
            Self::StripSocket => "strip socket",
            Self::Dimmer => "dimmer",
            Self::Bulb => "bulb",
            Self::LightStrip => "light strip",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
