// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The autokey XOR obfuscation applied to every Kasa payload.
//!
//! Kasa firmware scrambles its JSON bodies with a stream cipher whose key is
//! seeded with a fixed byte and then chained through the ciphertext itself.
//! It provides no secrecy worth the name and no integrity check; it only
//! keeps casual packet captures from reading as plain JSON. Corruption is not
//! recoverable, so a garbled payload must be treated as a hard decode
//! failure.
//!
//! These functions operate on raw bytes and know nothing about message
//! boundaries. The TCP length prefix belongs to the transport
//! ([`TcpClient`](crate::protocol::TcpClient)); discovery datagrams carry the
//! ciphered bytes bare.

/// Initial key byte shared by every Kasa device.
const INITIAL_KEY: u8 = 171;

/// Scrambles a payload for the wire.
///
/// Each output byte becomes the key for the next position, so identical
/// plaintext bytes encipher differently depending on where they sit.
#[must_use]
pub fn encrypt(plaintext: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    plaintext
        .iter()
        .map(|&byte| {
            key ^= byte;
            key
        })
        .collect()
}

/// Recovers a payload scrambled by [`encrypt`].
#[must_use]
pub fn decrypt(ciphertext: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    ciphertext
        .iter()
        .map(|&byte| {
            let plain = key ^ byte;
            key = byte;
            plain
        })
        .collect()
}
