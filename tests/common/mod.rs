// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process fakes speaking the Kasa wire protocol on loopback.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kasalink::protocol::{decrypt, encrypt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};

/// How the fake answers one accepted TCP connection.
pub enum Script {
    /// Read one request, answer with this body, ciphered and framed.
    Reply(Value),
    /// Read one request, answer with these bytes exactly as given.
    Raw(Vec<u8>),
    /// Read one request, then hold the connection open without answering.
    Stall,
    /// Accept and close without answering.
    Hangup,
}

/// A scripted device on a loopback TCP port.
///
/// Each accepted connection consumes the next script entry, mirroring the
/// one-query-per-connection protocol. Connections past the end of the script
/// are dropped unanswered.
pub struct FakeDevice {
    addr: SocketAddr,
    connections: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeDevice {
    pub async fn start(script: Vec<Script>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let accepted = Arc::clone(&connections);
        let captured = Arc::clone(&requests);
        tokio::spawn(async move {
            let mut script = script.into_iter();
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                accepted.fetch_add(1, Ordering::SeqCst);
                serve(stream, script.next().unwrap_or(Script::Hangup), &captured).await;
            }
        });

        Self {
            addr,
            connections,
            requests,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connections accepted so far; one per query attempt.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Deciphered request bodies in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }
}

async fn serve(mut stream: TcpStream, action: Script, captured: &Mutex<Vec<Value>>) {
    match action {
        Script::Hangup => {}
        Script::Reply(body) => {
            if let Some(request) = read_request(&mut stream).await {
                captured.lock().push(request);
                let _ = stream.write_all(&frame(&body.to_string())).await;
            }
        }
        Script::Raw(bytes) => {
            if let Some(request) = read_request(&mut stream).await {
                captured.lock().push(request);
            }
            let _ = stream.write_all(&bytes).await;
        }
        Script::Stall => {
            if let Some(request) = read_request(&mut stream).await {
                captured.lock().push(request);
            }
            // keep the socket open until the peer gives up and disconnects
            let mut parked = [0_u8; 1];
            let _ = stream.read(&mut parked).await;
        }
    }
}

/// Ciphers and length-prefixes a response body.
pub fn frame(body: &str) -> Vec<u8> {
    let ciphered = encrypt(body.as_bytes());
    let mut framed = i32::try_from(ciphered.len())
        .unwrap()
        .to_be_bytes()
        .to_vec();
    framed.extend_from_slice(&ciphered);
    framed
}

async fn read_request(stream: &mut TcpStream) -> Option<Value> {
    let mut len_buf = [0_u8; 4];
    stream.read_exact(&mut len_buf).await.ok()?;
    let len = usize::try_from(i32::from_be_bytes(len_buf)).ok()?;
    let mut ciphered = vec![0_u8; len];
    stream.read_exact(&mut ciphered).await.ok()?;
    serde_json::from_slice(&decrypt(&ciphered)).ok()
}

/// A discovery responder on a loopback UDP port.
///
/// Answers every received probe with the configured datagrams, in order,
/// all addressed back to the prober.
pub struct FakeBeacon {
    addr: SocketAddr,
    probes: Arc<AtomicUsize>,
}

impl FakeBeacon {
    pub async fn start(replies: Vec<Vec<u8>>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let probes = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&probes);
        tokio::spawn(async move {
            let mut buf = [0_u8; 2048];
            while let Ok((_, peer)) = socket.recv_from(&mut buf).await {
                seen.fetch_add(1, Ordering::SeqCst);
                for reply in &replies {
                    let _ = socket.send_to(reply, peer).await;
                }
            }
        });

        Self { addr, probes }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Probe datagrams received so far.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}
