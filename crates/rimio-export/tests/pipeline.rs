//! End-to-end pipeline test: stub world through dispatcher to a local
//! HTTP sink.
//!
//! Exercises the whole capture -> build -> serialize -> send path over a
//! real socket: a minimal fixture server plays the companion app, and the
//! test asserts on the request it receives.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rimio_export::{Dispatcher, ExporterConfig, HttpDelivery};
use rimio_host::stub::{StubActor, StubRegion, StubWorld};
use rimio_host::{RawWealth, RegionRegistry, RenderHandle};
use rimio_types::{Cell, JobEntry, JobTarget, Measure, Passion, RegionId, SkillEntry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Handle;

fn fixture_world() -> (Arc<StubWorld>, Arc<RegionRegistry>) {
    let world = Arc::new(StubWorld::new("fixture-seed"));
    world.set_tick(61);

    let mut tari = StubActor::new("Human1", "Tari Okonkwo");
    tari.nick_name = String::from("Tari");
    tari.region = Some(RegionId::new(1));
    tari.position = Cell::new(42, 17);
    tari.flags.colonist = true;
    tari.traits.push(String::from("Industrious"));
    tari.skills.push(SkillEntry {
        name: String::from("Construction"),
        passion: Passion::Major,
        level: 9,
        enabled: true,
        xp_progress: 0.3,
        total_xp: 14000.0,
        current_xp: 900.0,
        levelup_xp: 3000.0,
    });
    tari.needs.push(Measure::from_level("Food", 0.75));
    tari.capacities.push(Measure::from_level("Moving", 1.0));
    tari.job = Some(JobEntry {
        name: String::from("building wall"),
        target_a: Some(JobTarget::thing("wall blueprint", Cell::new(43, 17))),
        ..JobEntry::default()
    });
    world.add_colonist(Arc::new(tari));

    let mut home = StubRegion::new(RegionId::new(1), "New Hope");
    home.home = true;
    home.wealth = RawWealth {
        floors: 500.0,
        buildings: 2000.0,
        items: 300.0,
        actors: 1200.0,
        total: 3500.0,
    };
    let registry = Arc::new(RegionRegistry::new());
    registry.insert(Arc::new(home));

    (world, registry)
}

/// Accept one request, answer 200, hand back the raw bytes seen.
async fn sink_one(listener: TcpListener) -> Vec<u8> {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut seen = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        seen.extend_from_slice(buf.get(..n).unwrap_or_default());
        if body_complete(&seen) {
            break;
        }
    }
    socket
        .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
        .await
        .unwrap();
    socket.flush().await.unwrap();
    seen
}

fn body_complete(seen: &[u8]) -> bool {
    let Some(split) = seen.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(seen.get(..split).unwrap_or_default()).to_lowercase();
    let expected = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    seen.len() >= split.saturating_add(4).saturating_add(expected)
}

#[tokio::test(flavor = "multi_thread")]
async fn snapshot_travels_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let sink = tokio::spawn(sink_one(listener));

    let config = ExporterConfig {
        host: String::from("127.0.0.1"),
        port,
        ..ExporterConfig::default()
    };
    let (world, registry) = fixture_world();
    let delivery = HttpDelivery::new(&config).unwrap();
    let dispatcher = Dispatcher::new(config, world, registry, delivery, Handle::current());

    let render = RenderHandle::acquire();
    dispatcher.on_tick(61, &render);

    let seen = tokio::time::timeout(Duration::from_secs(10), sink)
        .await
        .unwrap()
        .unwrap();
    let request = String::from_utf8_lossy(&seen).to_string();

    // Request line and headers.
    assert!(request.starts_with("POST /GameData HTTP/1.1"));
    let lower = request.to_lowercase();
    assert!(lower.contains("content-type: application/xml"));
    assert!(lower.contains("accept: application/xml"));
    assert!(lower.contains("x-rimiodataversion: 1"));

    // Payload: one well-formed document with the fixture's content.
    let body_at = request.find("\r\n\r\n").unwrap();
    let body = request.get(body_at.saturating_add(4)..).unwrap();
    assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(body.contains("<GameData>"));
    assert!(body.ends_with("</GameData>"));

    assert!(body.contains("<tick>61</tick>"));
    assert!(body.contains("<worldSeed>fixture-seed</worldSeed>"));

    // Region section, wealth net of floors: 2000 gross - 500 floors.
    assert!(body.contains("<MapData><id>1</id><name>New Hope</name><colony>true</colony>"));
    assert!(body.contains("<wealthFloors>500</wealthFloors>"));
    assert!(body.contains("<wealthBuildings>1500</wealthBuildings>"));
    assert!(body.contains("<wealthTotal>3500</wealthTotal>"));

    // Actor section with its nested sheets.
    assert!(body.contains("<id>Human1</id>"));
    assert!(body.contains("<fullName>Tari Okonkwo</fullName>"));
    assert!(body.contains("<location><x>42</x><y>17</y></location>"));
    assert!(body.contains("<string>Industrious</string>"));
    assert!(body.contains("<passion>Major</passion>"));
    assert!(body.contains("<key>Food</key><value>0.75</value>"));
    assert!(body.contains("<job><name>building wall</name><targetA><name>wall blueprint</name>"));

    // Portrait captured on the synchronous phase and embedded as base64.
    assert!(body.contains("<includesPortrait>true</includesPortrait>"));
    assert!(body.contains("<portrait>"));

    // Flags reflect what was populated.
    assert!(body.contains("<includesMaps>true</includesMaps>"));
    assert!(body.contains("<includesSkills>true</includesSkills>"));
    assert!(body.contains("<includesJob>true</includesJob>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_delivery_does_not_disturb_the_next_cycle() {
    // No listener at all: the first attempt fails outright.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ExporterConfig {
        host: String::from("127.0.0.1"),
        port,
        timeout_ms: 300,
        ..ExporterConfig::default()
    };
    let (world, registry) = fixture_world();
    let delivery = HttpDelivery::new(&config).unwrap();
    let dispatcher = Dispatcher::new(config, world, registry, delivery, Handle::current());
    let render = RenderHandle::acquire();

    dispatcher.on_tick(1, &render);
    tokio::time::sleep(Duration::from_millis(600)).await;

    // The failure was contained; the next boundary fires normally.
    dispatcher.on_tick(61, &render);
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(dispatcher.cycles_started(), 2);
    assert_eq!(dispatcher.cycles_skipped(), 0);
}
