// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP broadcast discovery of Kasa devices.
//!
//! Discovery sends the ciphered `get_sysinfo` probe to the broadcast address
//! on port 9999 and listens on the same socket for replies. Every reply
//! carries the sender's full state, so discovered handles arrive already
//! classified, with no follow-up query.
//!
//! Replies are emitted one-per-packet with no deduplication: a device that
//! answers two probes appears twice. Deduplicate by address downstream if
//! that matters to you.
//!
//! # Examples
//!
//! Bounded collection:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn example() -> kasalink::Result<()> {
//! let devices = kasalink::discover(Duration::from_secs(3)).await?;
//! for device in &devices {
//!     println!("{} at {}", device.device().alias(), device.device().addr());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Continuous stream with periodic re-probing:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn example() -> kasalink::Result<()> {
//! let mut stream = kasalink::discover_stream(Duration::from_secs(10)).await?;
//! while let Some(device) = stream.recv().await {
//!     println!("saw {} ({})", device.device().alias(), device.kind());
//! }
//! # Ok(())
//! # }
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};

use crate::device::SmartDevice;
use crate::error::{Result, TransportError};
use crate::protocol::{TcpClient, decrypt, encrypt};
use crate::request::{Request, SERVICE_SYSTEM};
use crate::response::QueryResponse;
use crate::state::SysInfo;

/// Receive buffer size; state blobs from six-socket strips stay well under
/// this.
const MAX_DATAGRAM: usize = 8192;

/// Tuning knobs for discovery.
///
/// The defaults probe the whole segment (`255.255.255.255:9999`); point the
/// target at a directed subnet broadcast or a unicast address when the
/// segment-wide default is wrong (or when talking to a fixture in tests).
///
/// # Examples
///
/// ```
/// use kasalink::DiscoveryOptions;
/// use std::time::Duration;
///
/// let options = DiscoveryOptions::new()
///     .with_broadcast_addr("192.168.1.255:9999".parse().unwrap())
///     .with_read_window(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    broadcast_addr: SocketAddr,
    capacity: usize,
    read_window: Duration,
}

impl DiscoveryOptions {
    /// Default probe target: the limited broadcast address on the Kasa port.
    pub const DEFAULT_BROADCAST_ADDR: SocketAddr = SocketAddr::new(
        IpAddr::V4(Ipv4Addr::BROADCAST),
        TcpClient::DEFAULT_PORT,
    );
    /// Default capacity of the output channel. When it fills, the receive
    /// loop blocks rather than dropping replies.
    pub const DEFAULT_CAPACITY: usize = 10;
    /// Default per-iteration receive window; also the upper bound on how
    /// long cancellation takes to be observed.
    pub const DEFAULT_READ_WINDOW: Duration = Duration::from_secs(1);

    /// Creates options with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        Self {
            broadcast_addr: Self::DEFAULT_BROADCAST_ADDR,
            capacity: Self::DEFAULT_CAPACITY,
            read_window: Self::DEFAULT_READ_WINDOW,
        }
    }

    /// Sets where the probe is sent.
    #[must_use]
    pub fn with_broadcast_addr(mut self, addr: SocketAddr) -> Self {
        self.broadcast_addr = addr;
        self
    }

    /// Sets the output channel capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Sets the per-iteration receive window.
    #[must_use]
    pub fn with_read_window(mut self, window: Duration) -> Self {
        self.read_window = window;
        self
    }

    /// Returns the probe target.
    #[must_use]
    pub fn broadcast_addr(&self) -> SocketAddr {
        self.broadcast_addr
    }

    /// Returns the output channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the per-iteration receive window.
    #[must_use]
    pub fn read_window(&self) -> Duration {
        self.read_window
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Discovers devices for `timeout`, then returns everything that answered.
///
/// Broadcasts one probe and collects replies until the timeout elapses. The
/// result keeps arrival order and is not deduplicated.
///
/// # Errors
///
/// Returns a transport error when the socket cannot be set up or the probe
/// cannot be sent.
pub async fn discover(timeout: Duration) -> Result<Vec<SmartDevice>> {
    discover_with(timeout, DiscoveryOptions::new()).await
}

/// [`discover`] with explicit options.
///
/// # Errors
///
/// Returns a transport error when the socket cannot be set up or the probe
/// cannot be sent.
pub async fn discover_with(timeout: Duration, options: DiscoveryOptions) -> Result<Vec<SmartDevice>> {
    let mut stream = DiscoveryStream::start(options, None).await?;
    let mut devices = Vec::new();
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            () = &mut deadline => break,
            device = stream.recv() => match device {
                Some(device) => devices.push(device),
                None => break,
            },
        }
    }
    stream.stop();
    tracing::debug!(count = devices.len(), "discovery collection finished");
    Ok(devices)
}

/// Starts continuous discovery, re-probing every `interval` until stopped.
///
/// # Errors
///
/// Returns a transport error when the socket cannot be set up or the first
/// probe cannot be sent.
pub async fn discover_stream(interval: Duration) -> Result<DiscoveryStream> {
    discover_stream_with(interval, DiscoveryOptions::new()).await
}

/// [`discover_stream`] with explicit options.
///
/// # Errors
///
/// Returns a transport error when the socket cannot be set up or the first
/// probe cannot be sent.
pub async fn discover_stream_with(
    interval: Duration,
    options: DiscoveryOptions,
) -> Result<DiscoveryStream> {
    DiscoveryStream::start(options, Some(interval)).await
}

/// A running discovery: yields devices as they answer.
///
/// Backed by two tasks sharing one socket: a receive loop decoding replies
/// and, in streaming mode, a probe loop re-broadcasting on a timer. Both
/// observe a cooperative stop signal; after [`stop`](DiscoveryStream::stop)
/// they wind down within one receive window. Dropping the stream stops it
/// the same way.
#[derive(Debug)]
pub struct DiscoveryStream {
    devices: mpsc::Receiver<SmartDevice>,
    stop: watch::Sender<bool>,
}

impl DiscoveryStream {
    async fn start(options: DiscoveryOptions, interval: Option<Duration>) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(TransportError::Bind)?;
        socket.set_broadcast(true).map_err(TransportError::Bind)?;
        let socket = Arc::new(socket);

        let probe = probe_payload();
        socket
            .send_to(&probe, options.broadcast_addr)
            .await
            .map_err(TransportError::Broadcast)?;
        tracing::debug!(target = %options.broadcast_addr, "sent discovery probe");

        let (device_tx, device_rx) = mpsc::channel(options.capacity);
        let (stop_tx, stop_rx) = watch::channel(false);

        tokio::spawn(receive_loop(
            Arc::clone(&socket),
            device_tx,
            stop_rx.clone(),
            options.read_window,
        ));
        if let Some(interval) = interval {
            tokio::spawn(probe_loop(
                socket,
                options.broadcast_addr,
                probe,
                interval,
                stop_rx,
            ));
        }

        Ok(Self {
            devices: device_rx,
            stop: stop_tx,
        })
    }

    /// Waits for the next discovered device. `None` once the stream has
    /// stopped and the last buffered reply is consumed.
    pub async fn recv(&mut self) -> Option<SmartDevice> {
        self.devices.recv().await
    }

    /// Signals both worker tasks to stop. Takes effect within one receive
    /// window; buffered replies can still be drained afterwards.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}

/// The ciphered bytes of the discovery probe.
fn probe_payload() -> Vec<u8> {
    encrypt(Request::new(SERVICE_SYSTEM, "get_sysinfo", Value::Null).to_json().as_bytes())
}

async fn receive_loop(
    socket: Arc<UdpSocket>,
    devices: mpsc::Sender<SmartDevice>,
    stop: watch::Receiver<bool>,
    window: Duration,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        // devices.is_closed() covers a stream dropped without stop()
        if *stop.borrow() || devices.is_closed() {
            break;
        }
        match tokio::time::timeout(window, socket.recv_from(&mut buf)).await {
            // window elapsed with nothing to read; go re-check the stop flag
            Err(_) => {}
            Ok(Err(error)) => {
                tracing::warn!(%error, "discovery receive failed");
            }
            Ok(Ok((len, peer))) => {
                let Some(info) = decode_reply(peer, &buf[..len]) else {
                    continue;
                };
                let addr = SocketAddr::new(peer.ip(), TcpClient::DEFAULT_PORT);
                let device = SmartDevice::from_state(addr, info);
                tracing::debug!(addr = %addr, kind = %device.kind(), "discovered device");
                // a full channel blocks here until the consumer catches up;
                // a dropped consumer ends the loop
                if devices.send(device).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn probe_loop(
    socket: Arc<UdpSocket>,
    target: SocketAddr,
    probe: Vec<u8>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            () = tokio::time::sleep(interval) => {
                if let Err(error) = socket.send_to(&probe, target).await {
                    tracing::warn!(%error, target = %target, "discovery probe failed, stopping probes");
                    return;
                }
                tracing::debug!(target = %target, "re-sent discovery probe");
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return;
                }
            }
        }
    }
}

/// Deciphers and decodes one reply; `None` (with a warning) for anything that
/// does not parse down to a state blob.
fn decode_reply(peer: SocketAddr, datagram: &[u8]) -> Option<SysInfo> {
    let plaintext = decrypt(datagram);
    let response: QueryResponse = match serde_json::from_slice(&plaintext) {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(peer = %peer, %error, "skipping undecodable discovery reply");
            return None;
        }
    };
    match response.into_sysinfo() {
        Some(info) => Some(info),
        None => {
            tracing::warn!(peer = %peer, "skipping discovery reply without device state");
            None
        }
    }
}
