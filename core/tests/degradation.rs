//! Partial failure: a collector whose source table is unreadable drops
//! out of the feed, while an unreadable dismissal table fails the whole
//! request. Both modes of collection are covered.

use chrono::{DateTime, Duration, Utc};
use opsdesk_core::{
    alert::{AlertFeed, AlertType},
    config::AlertConfig,
    engine::AlertEngine,
    identity::Identity,
    role::Role,
    store::{AlertStore, PayoutQueueRow, PrizePayoutRow},
};
use rusqlite::{Connection, OpenFlags};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn build(parallel: bool) -> AlertEngine {
    let store = AlertStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .insert_payout_queue(&PayoutQueueRow {
            queue_id: "q-1".into(),
            user_id: "u-1".into(),
            amount: 25.0,
            status: "pending".into(),
            created_at: now() - Duration::hours(3),
        })
        .unwrap();
    store
        .insert_prize_payout(&PrizePayoutRow {
            payout_id: "po-1".into(),
            user_id: "u-1".into(),
            game_type: "slots".into(),
            week_start: "2026-10-11".into(),
            amount: 50.0,
            status: "verified".into(),
            notified_at: None,
            paid_at: None,
            created_at: now() - Duration::days(1),
        })
        .unwrap();

    let mut config = AlertConfig::default();
    config.parallel_collectors = parallel;
    AlertEngine::build(config, store)
}

fn drop_table(store: &AlertStore, table: &str) {
    let raw = Connection::open_with_flags(
        store.path(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
    )
    .expect("raw connection");
    raw.execute_batch(&format!("DROP TABLE {table};"))
        .expect("drop table");
}

fn types_in(feed: &AlertFeed) -> Vec<AlertType> {
    feed.alerts.iter().map(|a| a.alert_type).collect()
}

fn admin() -> Identity {
    Identity::admin("admin-1", Role::SuperAdmin)
}

#[test]
fn broken_source_table_only_drops_its_collector() {
    for parallel in [false, true] {
        let engine = build(parallel);
        let before = engine.feed(&admin(), now()).unwrap();
        assert!(types_in(&before).contains(&AlertType::PayoutQueue));

        drop_table(engine.store(), "payout_queue");

        let after = engine.feed(&admin(), now()).unwrap();
        let types = types_in(&after);
        assert!(!types.contains(&AlertType::PayoutQueue), "parallel={parallel}");
        assert!(types.contains(&AlertType::NotifyWinner), "parallel={parallel}");
        assert!(types.contains(&AlertType::PayWinner), "parallel={parallel}");
        assert!(types.contains(&AlertType::PrizeSetup), "parallel={parallel}");
        assert_eq!(after.count, before.count - 1, "parallel={parallel}");
    }
}

#[test]
fn unreadable_dismissals_fail_the_request() {
    for parallel in [false, true] {
        let engine = build(parallel);
        drop_table(engine.store(), "alert_dismissal");

        let err = engine.feed(&admin(), now()).unwrap_err();
        assert_eq!(err.status_code(), 500, "parallel={parallel}");
    }
}
