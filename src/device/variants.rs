// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-output device classes: plugs, wall dimmers, bulbs, light strips.
//!
//! Each wrapper owns the shared [`Device`] and layers the class's power
//! semantics on top. Relay classes (plug, dimmer) switch through
//! `set_relay_state`; lamp classes (bulb, light strip) go through the
//! lighting service's `transition_light_state`, which also carries
//! brightness.

use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::device::{Device, Switch};
use crate::error::{DeviceError, ProtocolError, Result};
use crate::request::{Request, SERVICE_DIMMER, SERVICE_LIGHTING};
use crate::state::LightState;

/// A single-outlet smart plug (HS100/HS110/KP-series).
#[derive(Debug)]
pub struct Plug {
    device: Device,
}

impl Plug {
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
}

impl Switch for Plug {
    fn is_on(&self) -> bool {
        self.device.relay_flag()
    }

    async fn turn_on(&self) -> Result<()> {
        self.device.set_relay(true).await
    }

    async fn turn_off(&self) -> Result<()> {
        self.device.set_relay(false).await
    }
}

/// An in-wall dimmer switch (HS220-series).
///
/// Power runs through the relay like a plug; brightness has its own service.
#[derive(Debug)]
pub struct Dimmer {
    device: Device,
}

impl Dimmer {
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

    /// Sets the dimming level as a percentage.
    ///
    /// Values above 100 clamp to 100; zero and below switch the load off
    /// instead, since the firmware rejects a zero level.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered or the device
    /// rejects it.
    pub async fn set_brightness(&self, percent: i64) -> Result<()> {
        if percent <= 0 {
            return self.turn_off().await;
        }
        let request = Request::new(
            SERVICE_DIMMER,
            "set_brightness",
            json!({ "brightness": percent.min(100) }),
        );
        self.device.execute(&request).await.map(|_| ())
    }
}

impl Switch for Dimmer {
    fn is_on(&self) -> bool {
        self.device.relay_flag()
    }

    async fn turn_on(&self) -> Result<()> {
        self.device.set_relay(true).await
    }

    async fn turn_off(&self) -> Result<()> {
        self.device.set_relay(false).await
    }
}

/// A smart bulb (KL/LB-series).
#[derive(Debug)]
pub struct Bulb {
    device: Device,
}

impl Bulb {
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

    /// Whether the lamp reports brightness support.
    #[must_use]
    pub fn is_dimmable(&self) -> bool {
        self.device.lamp_flag(|info| info.is_dimmable)
    }

    /// Whether the lamp reports color support.
    #[must_use]
    pub fn is_color(&self) -> bool {
        self.device.lamp_flag(|info| info.is_color)
    }

    /// Whether the lamp reports adjustable white temperature.
    #[must_use]
    pub fn is_variable_color_temp(&self) -> bool {
        self.device.lamp_flag(|info| info.is_variable_color_temp)
    }

    /// The lamp state from the cached snapshot, without a network call.
    #[must_use]
    pub fn light_state(&self) -> Option<LightState> {
        self.device.cached_light_state()
    }

    /// Queries the lamp for its live state.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the lamp rejects it.
    pub async fn fetch_light_state(&self) -> Result<LightState> {
        fetch_light_state(&self.device).await
    }

    /// Queries the lamp's hardware details (beam angle, wattage, lumen
    /// ratings). The shape varies by model, so the reply stays raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the lamp rejects it.
    pub async fn light_details(&self) -> Result<Value> {
        lamp_query(&self.device, "get_light_details").await
    }

    /// Queries what the lamp does when powered on (last state or a preset).
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the lamp rejects it.
    pub async fn default_behavior(&self) -> Result<Value> {
        lamp_query(&self.device, "get_default_behavior").await
    }

    /// Sets brightness as a percentage, switching the lamp on.
    ///
    /// Values above 100 clamp to 100; zero and below switch the lamp off
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedCapability`] when the lamp reports
    /// itself non-dimmable, or the usual failures of the exchange.
    pub async fn set_brightness(&self, percent: i64) -> Result<()> {
        set_lamp_brightness(&self.device, self.is_dimmable(), percent, None).await
    }

    /// Like [`set_brightness`](Bulb::set_brightness), fading over `period`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`set_brightness`](Bulb::set_brightness).
    pub async fn set_brightness_over(&self, percent: i64, period: Duration) -> Result<()> {
        set_lamp_brightness(&self.device, self.is_dimmable(), percent, Some(period)).await
    }
}

impl Switch for Bulb {
    fn is_on(&self) -> bool {
        self.device.light_flag()
    }

    async fn turn_on(&self) -> Result<()> {
        transition(&self.device, lamp_power_arg(true)).await
    }

    async fn turn_off(&self) -> Result<()> {
        transition(&self.device, lamp_power_arg(false)).await
    }
}

/// An addressable light strip (KL400/KL420/KL430-series).
///
/// Speaks the same lighting service as a bulb and additionally reports how
/// many LEDs the strip carries.
#[derive(Debug)]
pub struct LightStrip {
    device: Device,
}

impl LightStrip {
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

    /// Number of addressable LEDs; 0 until state is cached.
    #[must_use]
    pub fn length(&self) -> i64 {
        self.device
            .sysinfo()
            .and_then(|info| info.length)
            .unwrap_or(0)
    }

    /// Whether the strip reports brightness support.
    #[must_use]
    pub fn is_dimmable(&self) -> bool {
        self.device.lamp_flag(|info| info.is_dimmable)
    }

    /// Whether the strip reports color support.
    #[must_use]
    pub fn is_color(&self) -> bool {
        self.device.lamp_flag(|info| info.is_color)
    }

    /// Whether the strip reports adjustable white temperature.
    #[must_use]
    pub fn is_variable_color_temp(&self) -> bool {
        self.device.lamp_flag(|info| info.is_variable_color_temp)
    }

    /// The lamp state from the cached snapshot, without a network call.
    #[must_use]
    pub fn light_state(&self) -> Option<LightState> {
        self.device.cached_light_state()
    }

    /// Queries the strip for its live state.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the strip rejects it.
    pub async fn fetch_light_state(&self) -> Result<LightState> {
        fetch_light_state(&self.device).await
    }

    /// Queries the strip's hardware details. The shape varies by model, so
    /// the reply stays raw JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the strip rejects it.
    pub async fn light_details(&self) -> Result<Value> {
        lamp_query(&self.device, "get_light_details").await
    }

    /// Queries what the strip does when powered on (last state or a preset).
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the strip rejects it.
    pub async fn default_behavior(&self) -> Result<Value> {
        lamp_query(&self.device, "get_default_behavior").await
    }

    /// Sets brightness as a percentage, switching the strip on.
    ///
    /// Same clamping as [`Bulb::set_brightness`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bulb::set_brightness`].
    pub async fn set_brightness(&self, percent: i64) -> Result<()> {
        set_lamp_brightness(&self.device, self.is_dimmable(), percent, None).await
    }

    /// Like [`set_brightness`](LightStrip::set_brightness), fading over
    /// `period`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bulb::set_brightness`].
    pub async fn set_brightness_over(&self, percent: i64, period: Duration) -> Result<()> {
        set_lamp_brightness(&self.device, self.is_dimmable(), percent, Some(period)).await
    }
}

impl Switch for LightStrip {
    fn is_on(&self) -> bool {
        self.device.light_flag()
    }

    async fn turn_on(&self) -> Result<()> {
        transition(&self.device, lamp_power_arg(true)).await
    }

    async fn turn_off(&self) -> Result<()> {
        transition(&self.device, lamp_power_arg(false)).await
    }
}

// ========== Lamp plumbing shared by Bulb and LightStrip ==========

fn lamp_power_arg(on: bool) -> Map<String, Value> {
    let mut arg = Map::new();
    arg.insert("on_off".to_string(), json!(u8::from(on)));
    // without this the lamp would restore its default-on preset instead of
    // keeping the current levels
    arg.insert("ignore_default".to_string(), json!(1));
    arg
}

async fn transition(device: &Device, arg: Map<String, Value>) -> Result<()> {
    let request = Request::new(
        SERVICE_LIGHTING,
        "transition_light_state",
        Value::Object(arg),
    );
    device.execute(&request).await.map(|_| ())
}

async fn set_lamp_brightness(
    device: &Device,
    dimmable: bool,
    percent: i64,
    period: Option<Duration>,
) -> Result<()> {
    if !dimmable {
        return Err(DeviceError::UnsupportedCapability {
            capability: "brightness",
        }
        .into());
    }
    if percent <= 0 {
        return transition(device, lamp_power_arg(false)).await;
    }
    let mut arg = lamp_power_arg(true);
    arg.insert("brightness".to_string(), json!(percent.min(100)));
    if let Some(period) = period {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        arg.insert("transition_period".to_string(), json!(millis));
    }
    transition(device, arg).await
}

async fn fetch_light_state(device: &Device) -> Result<LightState> {
    let request = Request::new(SERVICE_LIGHTING, "get_light_state", Value::Null);
    let response = device.query(&request).await?;
    let state = response
        .into_light_state()
        .ok_or(ProtocolError::MissingSection {
            addr: device.addr(),
            section: SERVICE_LIGHTING,
        })?;
    if let Some(code) = state.err_code.filter(|&code| code != 0) {
        return Err(DeviceError::CommandRejected {
            addr: device.addr(),
            command: "get_light_state".to_string(),
            code,
        }
        .into());
    }
    Ok(state)
}

async fn lamp_query(device: &Device, command: &'static str) -> Result<Value> {
    let request = Request::new(SERVICE_LIGHTING, command, Value::Null);
    let mut body = device.execute(&request).await?;
    let reply = body
        .get_mut(SERVICE_LIGHTING)
        .and_then(|service| service.get_mut(command))
        .map(Value::take)
        .ok_or(ProtocolError::MissingSection {
            addr: device.addr(),
            section: SERVICE_LIGHTING,
        })?;
    Ok(reply)
}
