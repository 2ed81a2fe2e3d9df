// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `kasalink` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! transport-level I/O, wire-protocol decoding, device-level rejections, and
//! symbolic command dispatch. The transport/protocol split matters: the query
//! executor retries transport errors and fails immediately on everything else.

use std::net::SocketAddr;

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with Kasa devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred on the network transport (retryable class).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while encoding or decoding the wire protocol.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The device answered but refused the operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Error occurred while dispatching a symbolic command.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl Error {
    /// Returns `true` for the transport class of failures, the only class
    /// the query executor retries.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Errors on the network path: dialing, timeouts, and mid-stream I/O.
///
/// These are the failures worth retrying; the device may simply have been
/// busy or the network momentarily unreliable.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connection to the device failed.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        /// Address of the device.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O phase did not complete within the configured timeout.
    #[error("{operation} to {addr} timed out")]
    Timeout {
        /// Address of the device.
        addr: SocketAddr,
        /// The phase that timed out (`"connect"`, `"write"`, `"read"`).
        operation: &'static str,
    },

    /// Reading from or writing to an established connection failed.
    #[error("{operation} to {addr} failed: {source}")]
    Io {
        /// Address of the device.
        addr: SocketAddr,
        /// The phase that failed (`"write"`, `"read"`).
        operation: &'static str,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Binding or configuring the discovery socket failed.
    #[error("discovery socket setup failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Sending the discovery probe failed.
    #[error("discovery broadcast failed: {0}")]
    Broadcast(#[source] std::io::Error),
}

/// Errors decoding what the peer sent (or encoding what we were asked to
/// send). Never retried; the bytes will not improve on a second attempt.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Response was not valid JSON or did not match the expected shape.
    #[error("invalid response from {addr}: {source}")]
    Json {
        /// Address of the device.
        addr: SocketAddr,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// The frame length prefix is negative or implausibly large.
    #[error("invalid frame length {len} from {addr}")]
    BadFrame {
        /// Address of the device.
        addr: SocketAddr,
        /// The advertised body length.
        len: i64,
    },

    /// The peer closed the stream before delivering the advertised length.
    #[error("truncated frame from {addr}: expected {expected} bytes")]
    Truncated {
        /// Address of the device.
        addr: SocketAddr,
        /// Bytes the length prefix promised.
        expected: usize,
    },

    /// A caller-supplied raw command was not valid JSON.
    #[error("invalid request payload: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// The response decoded but the section for the queried service is absent.
    #[error("response from {addr} is missing the {section} section")]
    MissingSection {
        /// Address of the device.
        addr: SocketAddr,
        /// The service section that was expected.
        section: &'static str,
    },
}

/// Errors reported by the device itself, or by capability checks made on its
/// behalf. Never retried.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device answered the command with a non-zero error code.
    #[error("device {addr} rejected {command}: error code {code}")]
    CommandRejected {
        /// Address of the device.
        addr: SocketAddr,
        /// The command that was rejected.
        command: String,
        /// The device's error code.
        code: i64,
    },

    /// The device does not support the requested capability.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: &'static str,
    },
}

/// Errors raised by the symbolic command-dispatch layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No operation is registered under the given name.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The name that was looked up.
        name: String,
    },

    /// Too few arguments for the operation.
    #[error("{command} expects {usage}")]
    MissingArguments {
        /// The operation that was invoked.
        command: &'static str,
        /// Usage string describing the expected arguments.
        usage: &'static str,
    },

    /// An argument could not be coerced to the expected type.
    #[error("cannot parse {expected} from {value:?}")]
    InvalidArgument {
        /// The offending argument as given.
        value: String,
        /// The kind of value that was expected.
        expected: &'static str,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
