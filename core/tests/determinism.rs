//! Feed determinism.
//!
//! Identical (live state, dismissal set, role) must produce a
//! byte-identical ordered feed, whether collectors run serially or on
//! parallel connections.

use chrono::{DateTime, Duration, Utc};
use opsdesk_core::{
    config::AlertConfig,
    dismissal::DismissRequest,
    engine::AlertEngine,
    identity::Identity,
    role::Role,
    severity::Severity,
    store::{
        AlertStore, BusinessCardRow, CampaignRow, CampaignStatus, PayoutQueueRow,
        PrizePayoutRow, WeeklyPrizeRow,
    },
};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn seed(store: &AlertStore) {
    store
        .insert_weekly_prize(&WeeklyPrizeRow {
            game_type: "slots".into(),
            week_start: "2026-10-11".into(),
            week_end: now() - Duration::days(1),
            prize_amount: 100.0,
            winner_user_id: None,
            is_active: true,
        })
        .unwrap();
    for (id, notified) in [("po-1", None), ("po-2", Some(now() - Duration::hours(2)))] {
        store
            .insert_prize_payout(&PrizePayoutRow {
                payout_id: id.into(),
                user_id: "u-1".into(),
                game_type: "slots".into(),
                week_start: "2026-10-04".into(),
                amount: 40.0,
                status: "verified".into(),
                notified_at: notified,
                paid_at: None,
                created_at: now() - Duration::days(3),
            })
            .unwrap();
    }
    store
        .insert_business_card(&BusinessCardRow {
            card_id: "card-1".into(),
            business_name: "Joe's Pizza".into(),
        })
        .unwrap();
    for (id, views) in [("camp-a", 800), ("camp-b", 950)] {
        store
            .insert_campaign(&CampaignRow {
                campaign_id: id.into(),
                business_card_id: Some("card-1".into()),
                status: CampaignStatus::Active,
                contracted_views: 1000,
                bonus_views: 0,
                total_views: views,
                amount_paid: 200.0,
                paid_at: Some(now() - Duration::days(10)),
                created_at: now() - Duration::days(10),
            })
            .unwrap();
    }
    store
        .insert_payout_queue(&PayoutQueueRow {
            queue_id: "q-1".into(),
            user_id: "u-3".into(),
            amount: 12.5,
            status: "pending".into(),
            created_at: now() - Duration::hours(5),
        })
        .unwrap();
}

fn build(parallel: bool) -> AlertEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = AlertStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    seed(&store);
    let mut config = AlertConfig::default();
    config.parallel_collectors = parallel;
    AlertEngine::build(config, store)
}

fn feed_json(engine: &AlertEngine, role: Role) -> String {
    let feed = engine.feed(&Identity::admin("a-1", role), now()).expect("feed");
    serde_json::to_string(&feed).expect("serialize")
}

#[test]
fn repeated_computation_is_byte_identical() {
    let engine = build(true);
    engine
        .dismiss(
            &Identity::admin("a-1", Role::Admin),
            &DismissRequest::new("prize_setup", "memory_2026-10-25"),
            now(),
        )
        .unwrap();

    let first = feed_json(&engine, Role::Admin);
    for _ in 0..10 {
        assert_eq!(first, feed_json(&engine, Role::Admin), "feed diverged between runs");
    }
}

#[test]
fn parallel_and_serial_fan_out_agree() {
    let parallel = build(true);
    let serial = build(false);
    for role in Role::ALL {
        assert_eq!(
            feed_json(&parallel, role),
            feed_json(&serial, role),
            "fan-out mode changed the feed for {role}"
        );
    }
}

#[test]
fn feed_is_sorted_by_severity_rank() {
    let engine = build(true);
    let feed = engine
        .feed(&Identity::admin("a-1", Role::SuperAdmin), now())
        .unwrap();
    assert!(feed.count >= 3);
    let ranks: Vec<u8> = feed.alerts.iter().map(|a| a.severity.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);
    assert_eq!(feed.alerts[0].severity, Severity::Critical);
    assert_eq!(
        feed.count,
        feed.count_by_severity.critical + feed.count_by_severity.high + feed.count_by_severity.medium
    );
}

#[test]
fn feed_serializes_to_external_shape() {
    let engine = build(false);
    let value: serde_json::Value = serde_json::from_str(&feed_json(&engine, Role::Admin)).unwrap();
    assert!(value["alerts"].is_array());
    assert!(value["count"].is_u64());
    assert!(value["countBySeverity"]["critical"].is_u64());
    assert!(value["countBySeverity"]["high"].is_u64());
    assert!(value["countBySeverity"]["medium"].is_u64());
    let first = &value["alerts"][0];
    for field in ["type", "key", "severity", "icon", "title", "description", "action", "createdAt"] {
        assert!(!first[field].is_null(), "alert missing {field}");
    }
}
