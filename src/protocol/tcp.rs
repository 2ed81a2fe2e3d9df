// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP query executor for Kasa devices.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::de::{DeserializeOwned, Error as _};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Error, ProtocolError, Result, TransportError};
use crate::protocol::cipher;

/// Upper bound on a response frame. Real sysinfo bodies run a few KiB; a
/// prefix past this is treated as garbage rather than read to completion.
const MAX_FRAME_LEN: usize = 1 << 20;

// ============================================================================
// TcpClient - Per-query connection executor
// ============================================================================

/// TCP client for a single Kasa device.
///
/// Kasa firmware handles one request per connection reliably and nothing
/// more, so the client dials a fresh connection for every query; there is no
/// pooling and no keep-alive. Each I/O phase (connect, write, read) gets its
/// own timeout, and failures classified as transport errors are retried with
/// a pause in between. Protocol-level failures (undecodable frames or JSON)
/// are never retried.
///
/// # Examples
///
/// ```no_run
/// use kasalink::protocol::TcpClient;
/// use std::time::Duration;
///
/// let client = TcpClient::new("192.168.1.40".parse().unwrap())
///     .with_timeout(Duration::from_secs(2))
///     .with_attempts(1);
/// ```
#[derive(Debug, Clone)]
pub struct TcpClient {
    addr: SocketAddr,
    timeout: Duration,
    attempts: u32,
    retry_delay: Duration,
}

impl TcpClient {
    /// Port Kasa devices listen on.
    pub const DEFAULT_PORT: u16 = 9999;
    /// Default timeout applied independently to connect, write, and read.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default number of total attempts per query.
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    /// Default pause between attempts.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

    /// Creates a client for the given host on the default port.
    #[must_use]
    pub fn new(host: IpAddr) -> Self {
        Self::from_addr(SocketAddr::new(host, Self::DEFAULT_PORT))
    }

    /// Creates a client for an explicit address and port.
    #[must_use]
    pub fn from_addr(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: Self::DEFAULT_TIMEOUT,
            attempts: Self::DEFAULT_ATTEMPTS,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }

    /// Sets the per-phase I/O timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the total number of attempts per query (minimum 1).
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Sets the pause between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Returns the device address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the per-phase I/O timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a serialized request and decodes the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when all attempts fail on the network, or a
    /// protocol error when the device's answer cannot be decoded.
    pub async fn send<T: DeserializeOwned>(&self, payload: &str) -> Result<T> {
        let body = self.send_raw(payload).await?;
        serde_json::from_str(&body).map_err(|source| {
            ProtocolError::Json {
                addr: self.addr,
                source,
            }
            .into()
        })
    }

    /// Sends a serialized request and returns the deciphered response body.
    ///
    /// Applies the retry policy: transport failures are retried up to the
    /// configured attempt count with the configured pause; anything else
    /// fails on the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns a transport error when all attempts fail on the network, or a
    /// protocol error for undecodable frames.
    pub async fn send_raw(&self, payload: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.roundtrip(payload).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transport() && attempt < self.attempts => {
                    tracing::debug!(
                        addr = %self.addr,
                        attempt,
                        error = %err,
                        "query attempt failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One connect/write/read cycle.
    async fn roundtrip(&self, payload: &str) -> Result<String> {
        let addr = self.addr;
        tracing::debug!(addr = %addr, payload = %payload, "sending query");

        let mut stream = self
            .timed("connect", TcpStream::connect(addr))
            .await?
            .map_err(|source| TransportError::Connect { addr, source })?;

        let body = cipher::encrypt(payload.as_bytes());
        let advertised = i32::try_from(body.len()).map_err(|_| ProtocolError::BadFrame {
            addr,
            len: i64::try_from(body.len()).unwrap_or(i64::MAX),
        })?;
        let mut frame = advertised.to_be_bytes().to_vec();
        frame.extend_from_slice(&body);

        self.timed("write", stream.write_all(&frame))
            .await?
            .map_err(|source| TransportError::Io {
                addr,
                operation: "write",
                source,
            })?;

        let mut len_buf = [0_u8; 4];
        self.timed("read", stream.read_exact(&mut len_buf))
            .await?
            .map_err(|source| TransportError::Io {
                addr,
                operation: "read",
                source,
            })?;
        let announced = i32::from_be_bytes(len_buf);
        let expected = usize::try_from(announced)
            .ok()
            .filter(|&n| n <= MAX_FRAME_LEN)
            .ok_or(ProtocolError::BadFrame {
                addr,
                len: i64::from(announced),
            })?;

        let mut ciphered = vec![0_u8; expected];
        self.timed("read", stream.read_exact(&mut ciphered))
            .await?
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::UnexpectedEof {
                    Error::from(ProtocolError::Truncated { addr, expected })
                } else {
                    Error::from(TransportError::Io {
                        addr,
                        operation: "read",
                        source,
                    })
                }
            })?;

        let plain = cipher::decrypt(&ciphered);
        let response = String::from_utf8(plain).map_err(|err| ProtocolError::Json {
            addr,
            source: serde_json::Error::custom(err),
        })?;
        tracing::debug!(addr = %addr, response = %response, "received response");
        Ok(response)
    }

    /// Wraps one I/O phase in the configured timeout.
    async fn timed<T, F>(&self, operation: &'static str, phase: F) -> Result<std::io::Result<T>>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        tokio::time::timeout(self.timeout, phase)
            .await
            .map_err(|_elapsed| {
                TransportError::Timeout {
                    addr: self.addr,
                    operation,
                }
                .into()
            })
    }
}
