// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device model for Kasa hardware.
//!
//! [`Device`] is the shared state holder: it owns the transport, caches the
//! latest `get_sysinfo` snapshot, and exposes every operation common to all
//! hardware classes. [`SmartDevice`] wraps a `Device` in its classified
//! variant and adds the class-specific power and brightness semantics through
//! the [`Switch`] trait.
//!
//! Classification happens once, when the handle is constructed (directly or
//! by discovery). A later [`refresh`](Device::refresh) never re-tags the
//! variant; if a refresh could plausibly change a device's class, build a new
//! handle from the refreshed state.
//!
//! # Examples
//!
//! ```no_run
//! use kasalink::{SmartDevice, Switch};
//!
//! # async fn example() -> kasalink::Result<()> {
//! let device = SmartDevice::connect("192.168.1.40".parse().unwrap()).await?;
//! println!("{} ({})", device.device().alias(), device.kind());
//!
//! if device.is_off() {
//!     device.turn_on().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod strip;
mod variants;

pub use strip::{Strip, StripSocket};
pub use variants::{Bulb, Dimmer, LightStrip, Plug};

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use parking_lot::RwLock;
use serde::de::Error as _;
use serde_json::{Value, json};

use crate::error::{DeviceError, ProtocolError, Result};
use crate::protocol::TcpClient;
use crate::request::{
    Request, SERVICE_NETIF, SERVICE_ONBOARDING, SERVICE_SYSTEM, SERVICE_TIME, SERVICE_TIME_COMMON,
};
use crate::response::{self, KeyType, QueryResponse, WifiNetwork};
use crate::state::{DeviceKind, Location, LightState, SysInfo};

/// Index of UTC in the firmware's timezone table. Writing the clock pins the
/// device to it so civil fields need no zone translation.
const UTC_ZONE_INDEX: u8 = 38;

/// A cached snapshot plus the instant it was fetched.
#[derive(Debug, Clone)]
struct Snapshot {
    info: SysInfo,
    refreshed_at: DateTime<Utc>,
}

/// On/off surface shared by every switchable handle.
///
/// [`is_on`](Switch::is_on) judges from the cached snapshot only and never
/// touches the network; refresh the device first when staleness matters.
#[allow(async_fn_in_trait)]
pub trait Switch {
    /// Whether the output is on, judged from the cached state.
    fn is_on(&self) -> bool;

    /// Whether the output is off, judged from the cached state.
    fn is_off(&self) -> bool {
        !self.is_on()
    }

    /// Switches the output on.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered or the device
    /// rejects it.
    async fn turn_on(&self) -> Result<()>;

    /// Switches the output off.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered or the device
    /// rejects it.
    async fn turn_off(&self) -> Result<()>;
}

/// A Kasa device: one network address, one cached state snapshot.
///
/// All projections read the cached snapshot and return empty or zero values
/// until the first successful [`refresh`](Device::refresh). Mutations issue
/// their command and then refresh, so the cache reflects what the device
/// actually applied rather than an optimistic local update.
#[derive(Debug)]
pub struct Device {
    client: TcpClient,
    snapshot: RwLock<Option<Snapshot>>,
}

impl Device {
    /// Creates a handle for the given host on the default port, with no
    /// cached state.
    #[must_use]
    pub fn new(host: IpAddr) -> Self {
        Self::with_client(TcpClient::new(host))
    }

    /// Creates a handle for an explicit address and port.
    #[must_use]
    pub fn from_addr(addr: SocketAddr) -> Self {
        Self::with_client(TcpClient::from_addr(addr))
    }

    /// Creates a handle over a pre-configured transport.
    #[must_use]
    pub fn with_client(client: TcpClient) -> Self {
        Self {
            client,
            snapshot: RwLock::new(None),
        }
    }

    /// Builds a handle whose state arrived out-of-band (discovery replies).
    pub(crate) fn from_parts(client: TcpClient, info: SysInfo) -> Self {
        let device = Self::with_client(client);
        device.store(info);
        device
    }

    /// Replaces the cached snapshot wholesale and stamps the refresh time.
    pub(crate) fn store(&self, info: SysInfo) {
        *self.snapshot.write() = Some(Snapshot {
            info,
            refreshed_at: Utc::now(),
        });
    }

    /// Returns the device's network address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.client.addr()
    }

    /// Returns a copy of the cached state, if any query has succeeded yet.
    #[must_use]
    pub fn sysinfo(&self) -> Option<SysInfo> {
        self.snapshot.read().as_ref().map(|s| s.info.clone())
    }

    /// When the cached state was last replaced (UTC, this host's clock).
    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().as_ref().map(|s| s.refreshed_at)
    }

    /// Classifies the cached state. Pure and recomputed per call; the
    /// [`SmartDevice`] wrapper built from this device keeps the class it was
    /// constructed with.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        DeviceKind::classify(self.snapshot.read().as_ref().map(|s| &s.info))
    }

    // ========== Queries ==========

    /// Re-queries `get_sysinfo` and replaces the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the answer carries no state.
    pub async fn refresh(&self) -> Result<()> {
        let request = Request::new(SERVICE_SYSTEM, "get_sysinfo", Value::Null);
        let response: QueryResponse = self.client.send(&request.to_json()).await?;
        let info = response
            .into_sysinfo()
            .ok_or(ProtocolError::MissingSection {
                addr: self.client.addr(),
                section: SERVICE_SYSTEM,
            })?;
        self.store(info);
        Ok(())
    }

    /// Sends a request and decodes the typed response envelope.
    pub(crate) async fn query(&self, request: &Request) -> Result<QueryResponse> {
        self.client.send(&request.to_json()).await
    }

    /// Sends a mutation, checks the echoed body for a rejection, and returns
    /// the raw body for callers that want it.
    pub(crate) async fn execute(&self, request: &Request) -> Result<Value> {
        let body: Value = self.client.send(&request.to_json()).await?;
        response::ensure_success(self.client.addr(), request.command(), &body)?;
        Ok(body)
    }

    /// Sends an already-encoded JSON request and returns the raw JSON answer.
    ///
    /// The escape hatch for firmware capabilities this library does not
    /// model. The payload is validated as JSON before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns a protocol error when the payload is not valid JSON, plus the
    /// usual transport and protocol failures of the exchange itself.
    pub async fn raw_command(&self, payload: &str) -> Result<String> {
        if let Err(source) = serde_json::from_str::<serde::de::IgnoredAny>(payload) {
            return Err(ProtocolError::InvalidRequest(source).into());
        }
        self.client.send_raw(payload).await
    }

    // ========== Projections ==========

    /// User-assigned name; empty until state is cached.
    #[must_use]
    pub fn alias(&self) -> String {
        self.string_field(|info| info.alias.clone())
    }

    /// Model string, e.g. `"KP115(US)"`; empty until state is cached.
    #[must_use]
    pub fn model(&self) -> String {
        self.string_field(|info| info.model.clone())
    }

    /// Unique device identifier; empty until state is cached.
    #[must_use]
    pub fn device_id(&self) -> String {
        self.string_field(|info| info.device_id.clone())
    }

    /// Marketing name, e.g. `"Smart Wi-Fi Plug Mini"`.
    #[must_use]
    pub fn device_name(&self) -> String {
        self.string_field(|info| info.device_name.clone())
    }

    /// MAC address as the firmware reports it.
    #[must_use]
    pub fn mac(&self) -> String {
        self.string_field(|info| info.mac.clone())
    }

    /// Hardware revision.
    #[must_use]
    pub fn hardware_version(&self) -> String {
        self.string_field(|info| info.hardware_version.clone())
    }

    /// Firmware revision.
    #[must_use]
    pub fn software_version(&self) -> String {
        self.string_field(|info| info.software_version.clone())
    }

    /// Wi-Fi signal strength in dBm; 0 until state is cached.
    #[must_use]
    pub fn rssi(&self) -> i32 {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.rssi)
            .unwrap_or(0)
    }

    /// Feature tags split from the colon-separated feature string.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        self.snapshot
            .read()
            .as_ref()
            .map(|s| s.info.features())
            .unwrap_or_default()
    }

    /// Geographic coordinates; `None` until state is cached.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.snapshot.read().as_ref().map(|s| s.info.location())
    }

    /// The instant the output was switched on, derived from the reported
    /// uptime at call time. `None` while off or without state.
    #[must_use]
    pub fn on_since(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().as_ref().and_then(|s| s.info.on_since())
    }

    /// Whether the status LED is lit; `false` until state is cached.
    #[must_use]
    pub fn is_led_on(&self) -> bool {
        self.snapshot.read().as_ref().is_some_and(|s| s.info.led_on())
    }

    fn string_field(&self, pick: impl FnOnce(&SysInfo) -> Option<String>) -> String {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| pick(&s.info))
            .unwrap_or_default()
    }

    /// Relay flag from the cached state.
    pub(crate) fn relay_flag(&self) -> bool {
        self.snapshot.read().as_ref().is_some_and(|s| s.info.relay_on())
    }

    /// Lamp on/off flag from the cached state.
    pub(crate) fn light_flag(&self) -> bool {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.light_state.as_ref())
            .is_some_and(LightState::is_on)
    }

    /// Whether any child record reports its relay on.
    pub(crate) fn any_child_on(&self) -> bool {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.children.as_ref())
            .is_some_and(|children| children.iter().any(SysInfo::relay_on))
    }

    /// Child identifiers in the order the device reports them.
    pub(crate) fn child_ids(&self) -> Vec<String> {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.children.as_ref())
            .map(|children| children.iter().filter_map(|c| c.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Copy of the child record with the given identifier.
    pub(crate) fn child_record(&self, child_id: &str) -> Option<SysInfo> {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.children.as_ref())
            .and_then(|children| {
                children
                    .iter()
                    .find(|c| c.id.as_deref() == Some(child_id))
                    .cloned()
            })
    }

    /// Cached lamp state, if the device reports one.
    pub(crate) fn cached_light_state(&self) -> Option<LightState> {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| s.info.light_state.clone())
    }

    /// Lamp capability flag read from the cached state.
    pub(crate) fn lamp_flag(&self, pick: impl FnOnce(&SysInfo) -> Option<u8>) -> bool {
        self.snapshot
            .read()
            .as_ref()
            .and_then(|s| pick(&s.info))
            .is_some_and(|flag| flag > 0)
    }

    // ========== Mutations ==========

    /// Renames the device, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error when the command or the follow-up refresh fails.
    pub async fn set_alias(&self, alias: &str) -> Result<()> {
        let request = Request::new(SERVICE_SYSTEM, "set_dev_alias", json!({ "alias": alias }));
        self.execute(&request).await?;
        self.refresh().await
    }

    /// Rewrites the MAC address, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error when the command or the follow-up refresh fails.
    pub async fn set_mac(&self, mac: &str) -> Result<()> {
        let request = Request::new(SERVICE_SYSTEM, "set_mac_addr", json!({ "mac": mac }));
        self.execute(&request).await?;
        self.refresh().await
    }

    /// Reboots the device after `delay`, rounded up to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the command or the follow-up refresh fails; with
    /// a zero delay the refresh can race the reboot itself.
    pub async fn reboot(&self, delay: Duration) -> Result<()> {
        let seconds = delay.as_secs() + u64::from(delay.subsec_nanos() > 0);
        let request = Request::new(SERVICE_SYSTEM, "reboot", json!({ "delay": seconds }));
        self.execute(&request).await?;
        self.refresh().await
    }

    /// Turns the status LED on or off, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error when the command or the follow-up refresh fails, or
    /// when the hardware has no controllable LED.
    pub async fn set_led(&self, on: bool) -> Result<()> {
        let request = Request::new(SERVICE_SYSTEM, "set_led_off", json!({ "off": u8::from(!on) }));
        self.execute(&request).await?;
        self.refresh().await
    }

    // ========== Wi-Fi ==========

    /// Scans for visible networks.
    ///
    /// Asks the `netif` service first; firmware that predates it answers on
    /// the legacy onboarding service instead, so one failure falls through to
    /// that before giving up.
    ///
    /// # Errors
    ///
    /// Returns the legacy attempt's error when both services fail.
    pub async fn wifi_scan(&self) -> Result<Vec<WifiNetwork>> {
        match self.scan_via(SERVICE_NETIF).await {
            Ok(list) => Ok(list),
            Err(error) => {
                tracing::warn!(
                    addr = %self.client.addr(),
                    %error,
                    "wifi scan via netif failed, trying legacy onboarding service"
                );
                self.scan_via(SERVICE_ONBOARDING).await
            }
        }
    }

    async fn scan_via(&self, service: &'static str) -> Result<Vec<WifiNetwork>> {
        let request = Request::new(service, "get_scaninfo", json!({ "refresh": 1 }));
        let response: QueryResponse = self.client.send(&request.to_json()).await?;
        let scan = response.into_scan().ok_or(ProtocolError::MissingSection {
            addr: self.client.addr(),
            section: service,
        })?;
        if scan.err_code != 0 {
            return Err(DeviceError::CommandRejected {
                addr: self.client.addr(),
                command: "get_scaninfo".to_string(),
                code: scan.err_code,
            }
            .into());
        }
        Ok(scan.ap_list)
    }

    /// Joins the device to a Wi-Fi network.
    ///
    /// Same service fallback as [`wifi_scan`](Device::wifi_scan). On success
    /// the device switches networks and this handle's address may stop
    /// answering.
    ///
    /// # Errors
    ///
    /// Returns the legacy attempt's error when both services fail.
    pub async fn wifi_join(&self, ssid: &str, password: &str, key_type: KeyType) -> Result<()> {
        match self.join_via(SERVICE_NETIF, ssid, password, key_type).await {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(
                    addr = %self.client.addr(),
                    %error,
                    "wifi join via netif failed, trying legacy onboarding service"
                );
                self.join_via(SERVICE_ONBOARDING, ssid, password, key_type)
                    .await
            }
        }
    }

    async fn join_via(
        &self,
        service: &'static str,
        ssid: &str,
        password: &str,
        key_type: KeyType,
    ) -> Result<()> {
        let request = Request::new(
            service,
            "set_stainfo",
            json!({ "ssid": ssid, "password": password, "key_type": key_type.code() }),
        );
        self.execute(&request).await.map(|_| ())
    }

    // ========== Clock ==========

    fn time_service(&self) -> &'static str {
        if self.kind().is_lamp() {
            SERVICE_TIME_COMMON
        } else {
            SERVICE_TIME
        }
    }

    /// Reads the device's clock as civil time.
    ///
    /// The device does not disclose its zone here, so the value is naive;
    /// it means whatever the device's configured zone says it means.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails or the device reports an
    /// impossible date.
    pub async fn device_time(&self) -> Result<NaiveDateTime> {
        let service = self.time_service();
        let request = Request::new(service, "get_time", Value::Null);
        let response: QueryResponse = self.client.send(&request.to_json()).await?;
        let time = response
            .into_device_time()
            .ok_or(ProtocolError::MissingSection {
                addr: self.client.addr(),
                section: service,
            })?;
        if time.err_code != 0 {
            return Err(DeviceError::CommandRejected {
                addr: self.client.addr(),
                command: "get_time".to_string(),
                code: time.err_code,
            }
            .into());
        }
        time.to_naive().ok_or_else(|| {
            ProtocolError::Json {
                addr: self.client.addr(),
                source: serde_json::Error::custom("device reported an impossible date"),
            }
            .into()
        })
    }

    /// Sets the device's clock to the given instant, pinning its zone to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered or the device
    /// rejects it.
    pub async fn set_time(&self, instant: DateTime<Utc>) -> Result<()> {
        let request = Request::new(
            self.time_service(),
            "set_timezone",
            json!({
                "year": instant.year(),
                "month": instant.month(),
                "mday": instant.day(),
                "hour": instant.hour(),
                "min": instant.minute(),
                "sec": instant.second(),
                "index": UTC_ZONE_INDEX,
            }),
        );
        self.execute(&request).await.map(|_| ())
    }

    /// Switches the relay; shared by plugs, dimmers, and strip sockets.
    pub(crate) async fn set_relay(&self, on: bool) -> Result<()> {
        let request = Request::new(
            SERVICE_SYSTEM,
            "set_relay_state",
            json!({ "state": u8::from(on) }),
        );
        self.execute(&request).await.map(|_| ())
    }
}

// ============================================================================
// SmartDevice - classified wrapper
// ============================================================================

/// A [`Device`] tagged with the hardware class it was constructed as.
///
/// The tag decides power semantics and service routing. It is assigned once,
/// at construction, from the state available at that moment.
#[derive(Debug)]
pub enum SmartDevice {
    /// Single-outlet smart plug.
    Plug(Plug),
    /// Multi-socket power strip.
    Strip(Strip),
    /// In-wall dimmer switch.
    Dimmer(Dimmer),
    /// Smart bulb.
    Bulb(Bulb),
    /// Addressable light strip.
    LightStrip(LightStrip),
    /// Hardware the classifier cannot place. Exposes the common surface,
    /// answers `false` to every capability predicate, and ignores the
    /// class-specific setters.
    Unknown(Device),
}

impl SmartDevice {
    /// Connects to a host on the default port, queries its state, and
    /// classifies it.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial state query fails.
    pub async fn connect(host: IpAddr) -> Result<Self> {
        Self::connect_addr(SocketAddr::new(host, TcpClient::DEFAULT_PORT)).await
    }

    /// Connects to an explicit address and port, queries, and classifies.
    ///
    /// # Errors
    ///
    /// Returns an error when the initial state query fails.
    pub async fn connect_addr(addr: SocketAddr) -> Result<Self> {
        let device = Device::from_addr(addr);
        device.refresh().await?;
        Ok(Self::from_device(device))
    }

    /// Classifies state that arrived out-of-band (a discovery reply) without
    /// issuing a query.
    #[must_use]
    pub fn from_state(addr: SocketAddr, info: SysInfo) -> Self {
        Self::from_device(Device::from_parts(TcpClient::from_addr(addr), info))
    }

    /// Wraps a device in the variant its current state classifies as.
    #[must_use]
    pub fn from_device(device: Device) -> Self {
        match device.kind() {
            DeviceKind::Plug => Self::Plug(Plug::new(device)),
            DeviceKind::Strip => Self::Strip(Strip::new(device)),
            DeviceKind::Dimmer => Self::Dimmer(Dimmer::new(device)),
            DeviceKind::Bulb => Self::Bulb(Bulb::new(device)),
            DeviceKind::LightStrip => Self::LightStrip(LightStrip::new(device)),
            DeviceKind::StripSocket | DeviceKind::Unknown => Self::Unknown(device),
        }
    }

    /// The class this handle was constructed as.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Plug(_) => DeviceKind::Plug,
            Self::Strip(_) => DeviceKind::Strip,
            Self::Dimmer(_) => DeviceKind::Dimmer,
            Self::Bulb(_) => DeviceKind::Bulb,
            Self::LightStrip(_) => DeviceKind::LightStrip,
            Self::Unknown(_) => DeviceKind::Unknown,
        }
    }

    /// The shared state holder, whatever the class.
    #[must_use]
    pub fn device(&self) -> &Device {
        match self {
            Self::Plug(plug) => plug.device(),
            Self::Strip(strip) => strip.device(),
            Self::Dimmer(dimmer) => dimmer.device(),
            Self::Bulb(bulb) => bulb.device(),
            Self::LightStrip(light_strip) => light_strip.device(),
            Self::Unknown(device) => device,
        }
    }

    /// Unwraps back into the shared state holder.
    #[must_use]
    pub fn into_device(self) -> Device {
        match self {
            Self::Plug(plug) => plug.into_device(),
            Self::Strip(strip) => strip.into_device(),
            Self::Dimmer(dimmer) => dimmer.into_device(),
            Self::Bulb(bulb) => bulb.into_device(),
            Self::LightStrip(light_strip) => light_strip.into_device(),
            Self::Unknown(device) => device,
        }
    }

    /// Borrows the strip variant, if that is what this is.
    #[must_use]
    pub fn as_strip(&self) -> Option<&Strip> {
        match self {
            Self::Strip(strip) => Some(strip),
            _ => None,
        }
    }

    /// Re-queries the device state; see [`Device::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn refresh(&self) -> Result<()> {
        self.device().refresh().await
    }

    // ========== Capability predicates ==========

    /// Whether brightness can be set on this device.
    #[must_use]
    pub fn is_dimmable(&self) -> bool {
        match self {
            Self::Dimmer(_) => true,
            Self::Bulb(bulb) => bulb.is_dimmable(),
            Self::LightStrip(light_strip) => light_strip.is_dimmable(),
            Self::Plug(_) | Self::Strip(_) | Self::Unknown(_) => false,
        }
    }

    /// Whether the lamp supports color.
    #[must_use]
    pub fn is_color(&self) -> bool {
        match self {
            Self::Bulb(bulb) => bulb.is_color(),
            Self::LightStrip(light_strip) => light_strip.is_color(),
            _ => false,
        }
    }

    /// Whether the lamp supports adjustable white temperature.
    #[must_use]
    pub fn is_variable_color_temp(&self) -> bool {
        match self {
            Self::Bulb(bulb) => bulb.is_variable_color_temp(),
            Self::LightStrip(light_strip) => light_strip.is_variable_color_temp(),
            _ => false,
        }
    }

    /// Sets brightness on whatever class supports it.
    ///
    /// Routes to the dimmer service on wall dimmers and the lighting service
    /// on lamps. Unknown devices ignore the call.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedCapability`] on plugs and strips,
    /// or when a lamp reports itself non-dimmable.
    pub async fn set_brightness(&self, percent: i64) -> Result<()> {
        match self {
            Self::Dimmer(dimmer) => dimmer.set_brightness(percent).await,
            Self::Bulb(bulb) => bulb.set_brightness(percent).await,
            Self::LightStrip(light_strip) => light_strip.set_brightness(percent).await,
            Self::Unknown(_) => Ok(()),
            Self::Plug(_) | Self::Strip(_) => Err(DeviceError::UnsupportedCapability {
                capability: "brightness",
            }
            .into()),
        }
    }
}

impl Switch for SmartDevice {
    fn is_on(&self) -> bool {
        match self {
            Self::Plug(plug) => plug.is_on(),
            Self::Strip(strip) => strip.is_on(),
            Self::Dimmer(dimmer) => dimmer.is_on(),
            Self::Bulb(bulb) => bulb.is_on(),
            Self::LightStrip(light_strip) => light_strip.is_on(),
            Self::Unknown(_) => false,
        }
    }

    async fn turn_on(&self) -> Result<()> {
        match self {
            Self::Plug(plug) => plug.turn_on().await,
            Self::Strip(strip) => strip.turn_on().await,
            Self::Dimmer(dimmer) => dimmer.turn_on().await,
            Self::Bulb(bulb) => bulb.turn_on().await,
            Self::LightStrip(light_strip) => light_strip.turn_on().await,
            Self::Unknown(_) => Ok(()),
        }
    }

    async fn turn_off(&self) -> Result<()> {
        match self {
            Self::Plug(plug) => plug.turn_off().await,
            Self::Strip(strip) => strip.turn_off().await,
            Self::Dimmer(dimmer) => dimmer.turn_off().await,
            Self::Bulb(bulb) => bulb.turn_off().await,
            Self::LightStrip(light_strip) => light_strip.turn_off().await,
            Self::Unknown(_) => Ok(()),
        }
    }
}
