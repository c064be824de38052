//! Integration tests for the fetch chain.
//!
//! These tests run the Fetcher against mock and replay hosts on a paused
//! tokio clock and store the results through the Catalog.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::Instant;

use dotdb::core::store::PathStore;
use dotdb::scrape::fetch::{FetchOptions, Fetcher, MissReason};
use dotdb::scrape::host::HostError;
use dotdb::scrape::mock::{MockHost, MockResponse};
use dotdb::scrape::power::{parse_power_list, PowerRecord};
use dotdb::scrape::replay::ReplayHost;
use dotdb::scrape::Catalog;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn block(name: &str, recharge: &str) -> MockResponse {
    MockResponse::Block(format!("Power: {}\nRecharge: {}\n", name, recharge))
}

#[tokio::test(start_paused = true)]
async fn chain_is_paced_one_name_per_tick() {
    let host = MockHost::new()
        .respond("help A", block("A", "1s"))
        .respond("help B", block("B", "2s"))
        .respond("help C", block("C", "3s"))
        .respond("help D", block("D", "4s"));
    let fetcher = Fetcher::new(FetchOptions {
        interval: Duration::from_millis(250),
        ..FetchOptions::default()
    });

    let started = Instant::now();
    let report = fetcher.run(&host, names(&["A", "B", "C", "D"])).await;

    assert!(report.is_complete());
    let offsets: Vec<Duration> = host.requests().iter().map(|r| r.at - started).collect();
    assert_eq!(
        offsets,
        vec![
            Duration::ZERO,
            Duration::from_millis(250),
            Duration::from_millis(500),
            Duration::from_millis(750),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn silent_host_costs_one_interval_then_moves_on() {
    let host = MockHost::new()
        .respond("help A", MockResponse::Silent)
        .respond("help B", block("B", "none"));
    let fetcher = Fetcher::new(FetchOptions {
        interval: Duration::from_millis(100),
        ..FetchOptions::default()
    });

    let started = Instant::now();
    let report = fetcher.run(&host, names(&["A", "B"])).await;

    assert_eq!(report.records, vec![PowerRecord::new("B")]);
    assert_eq!(
        report.missed,
        vec![(
            "A".to_string(),
            MissReason::Timeout(Duration::from_millis(100))
        )]
    );
    let requests = host.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].at - started >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn every_failure_kind_is_a_miss_and_nothing_is_retried() {
    let host = MockHost::new()
        .respond("help A", MockResponse::Fail(HostError::Rejected("huh?".into())))
        .respond("help B", MockResponse::Empty)
        .respond("help C", MockResponse::Block("Power: C\nRecharge: soon".into()));

    let report = Fetcher::default()
        .run(&host, names(&["A", "B", "C"]))
        .await;

    assert!(report.records.is_empty());
    assert_eq!(report.missed.len(), 3);
    assert!(matches!(report.missed[0].1, MissReason::Host(_)));
    assert!(matches!(report.missed[1].1, MissReason::NoResponse));
    assert!(matches!(report.missed[2].1, MissReason::Parse(_)));
    assert_eq!(host.commands(), vec!["help A", "help B", "help C"]);
}

#[tokio::test(start_paused = true)]
async fn replay_chain_into_catalog_and_back_from_disk() {
    let temp = TempDir::new().expect("create temp dir");
    let captures = temp.path().join("captures");
    fs::create_dir_all(&captures).expect("create captures");
    fs::write(
        captures.join("Fire Ball.txt"),
        "\x1b[1mPower:\x1b[0m Fire Ball\r\nAlias: fb\r\nRecharge: 2m 30s\r\nStatus: Ready\r\n",
    )
    .expect("write capture");
    fs::write(captures.join("Heal.txt"), "Name: Heal\nCooldown: 1 hour\nState: recharging\n")
        .expect("write capture");

    let list = "Powers known:\n  * Fire Ball (fb)\n  * Heal\n  * Blink\n";
    let host = ReplayHost::new(&captures, "help {name}");
    let report = Fetcher::default().run(&host, parse_power_list(list)).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(
        report.missed,
        vec![("Blink".to_string(), MissReason::NoResponse)]
    );

    let catalog = Catalog::new("powers").expect("valid root");
    let mut store = PathStore::new();
    catalog
        .store_all(&mut store, &report.records)
        .expect("store records");

    let db = temp.path().join("db.lua");
    store.save(&db).expect("save");
    let reloaded = PathStore::open(&db).store;

    let heal = catalog.find(&reloaded, "heal").expect("heal stored");
    assert_eq!(heal.recharge_seconds, 3600);
    assert!(!heal.is_ready);

    let fireball = catalog.find(&reloaded, "FB").expect("fire ball stored");
    assert_eq!(
        fireball,
        PowerRecord {
            name: "Fire Ball".to_string(),
            alias: Some("fb".to_string()),
            recharge_seconds: 150,
            is_ready: true,
        }
    );
}
