// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for UDP discovery against a loopback responder.
//!
//! The responder's unicast address stands in for the broadcast address, so
//! the probe datagrams land on one fake instead of the whole segment.

mod common;

use std::time::Duration;

use common::FakeBeacon;
use kasalink::protocol::encrypt;
use kasalink::{DeviceKind, DiscoveryOptions, Switch, discover_stream_with, discover_with};
use serde_json::json;

fn beacon_reply(alias: &str) -> Vec<u8> {
    let body = json!({
        "system": {
            "get_sysinfo": {
                "alias": alias,
                "mic_type": "IOT.SMARTPLUGSWITCH",
                "relay_state": 1
            }
        }
    });
    encrypt(body.to_string().as_bytes())
}

fn options(beacon: &FakeBeacon) -> DiscoveryOptions {
    DiscoveryOptions::new()
        .with_broadcast_addr(beacon.addr())
        .with_read_window(Duration::from_millis(25))
}

#[tokio::test]
async fn bounded_discovery_collects_and_classifies_replies() {
    let beacon = FakeBeacon::start(vec![beacon_reply("Desk plug")]).await;

    let devices = discover_with(Duration::from_millis(300), options(&beacon))
        .await
        .unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].kind(), DeviceKind::Plug);
    assert_eq!(devices[0].device().alias(), "Desk plug");
    assert!(devices[0].is_on());
    // command traffic goes to the replying host on the well-known port
    assert_eq!(devices[0].device().addr().ip(), beacon.addr().ip());
    assert_eq!(devices[0].device().addr().port(), 9999);
}

#[tokio::test]
async fn bounded_discovery_probes_exactly_once() {
    let beacon = FakeBeacon::start(vec![beacon_reply("Desk plug")]).await;

    discover_with(Duration::from_millis(300), options(&beacon))
        .await
        .unwrap();

    assert_eq!(beacon.probes(), 1);
}

#[tokio::test]
async fn duplicate_replies_are_kept() {
    let beacon =
        FakeBeacon::start(vec![beacon_reply("Desk plug"), beacon_reply("Desk plug")]).await;

    let devices = discover_with(Duration::from_millis(300), options(&beacon))
        .await
        .unwrap();

    assert_eq!(devices.len(), 2);
}

#[tokio::test]
async fn malformed_datagrams_are_skipped() {
    let beacon = FakeBeacon::start(vec![
        b"\x01\x02\x03\x04".to_vec(),
        encrypt(br#"{"system": {}}"#),
        beacon_reply("Survivor"),
    ])
    .await;

    let devices = discover_with(Duration::from_millis(300), options(&beacon))
        .await
        .unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device().alias(), "Survivor");
}

#[tokio::test]
async fn silence_yields_an_empty_catalog() {
    let beacon = FakeBeacon::start(Vec::new()).await;

    let devices = discover_with(Duration::from_millis(150), options(&beacon))
        .await
        .unwrap();

    assert!(devices.is_empty());
}

#[tokio::test]
async fn streaming_discovery_reprobes_until_stopped() {
    let beacon = FakeBeacon::start(vec![beacon_reply("Desk plug")]).await;

    let mut stream = discover_stream_with(Duration::from_millis(50), options(&beacon))
        .await
        .unwrap();

    // one reply per probe; a second arrival proves a re-probe happened
    let first = tokio::time::timeout(Duration::from_secs(2), stream.recv())
        .await
        .unwrap();
    assert!(first.is_some());
    let second = tokio::time::timeout(Duration::from_secs(2), stream.recv())
        .await
        .unwrap();
    assert!(second.is_some());
    assert!(beacon.probes() >= 2);

    stream.stop();
    let drained = tokio::time::timeout(Duration::from_secs(2), async {
        while stream.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "stream kept yielding after stop");
}
