// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol for communicating with Kasa devices.
//!
//! Kasa devices speak ciphered JSON on port 9999: length-prefixed over TCP
//! for direct queries, bare datagrams over UDP for discovery.
//!
//! # Layers
//!
//! - [`encrypt`] / [`decrypt`]: the autokey XOR obfuscation every payload
//!   goes through
//! - [`TcpClient`]: the query executor handling framing, per-phase timeouts,
//!   and the transport-only retry policy
//!
//! The cipher knows nothing about framing; the 4-byte big-endian length
//! prefix exists only on the TCP channel and is applied by [`TcpClient`].
//! Discovery (in [`crate::discovery`]) reuses [`encrypt`] for its probe and
//! [`decrypt`] for replies, with no prefix.

mod cipher;
mod tcp;

pub use cipher::{decrypt, encrypt};
pub use tcp::TcpClient;
