//! Transport adapter tests: both entry points share one engine and map
//! failures onto 400 / 401 / 403 / 500.

use chrono::{DateTime, Utc};
use opsdesk_core::{
    config::AlertConfig,
    engine::AlertEngine,
    identity::{Identity, StaticIdentityProvider},
    role::Role,
    store::AlertStore,
    transport::{BearerTokenTransport, CookieSessionTransport, Transport},
};
use rusqlite::{Connection, OpenFlags};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn build() -> AlertEngine {
    let store = AlertStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    AlertEngine::build(AlertConfig::default(), store)
}

fn provider() -> StaticIdentityProvider {
    StaticIdentityProvider::new()
        .with("sess-admin", Identity::admin("a-1", Role::Admin))
        .with("tok-admin", Identity::admin("a-1", Role::Admin))
        .with("sess-player", Identity::new("p-1", Role::Support, false))
}

#[test]
fn both_transports_return_the_same_feed() {
    let engine = build();
    let provider = provider();

    let via_cookie = CookieSessionTransport::default().get_feed(
        &engine,
        &provider,
        Some("theme=dark; session=sess-admin"),
        now(),
    );
    let via_bearer =
        BearerTokenTransport.get_feed(&engine, &provider, Some("Bearer tok-admin"), now());

    assert_eq!(via_cookie.status, 200);
    assert_eq!(via_bearer.status, 200);
    assert_eq!(via_cookie.body, via_bearer.body);
    assert!(via_cookie.body["countBySeverity"].is_object());
}

#[test]
fn missing_or_unknown_credentials_are_401() {
    let engine = build();
    let provider = provider();

    let none = BearerTokenTransport.get_feed(&engine, &provider, None, now());
    assert_eq!(none.status, 401);

    let unknown = BearerTokenTransport.get_feed(&engine, &provider, Some("Bearer nope"), now());
    assert_eq!(unknown.status, 401);

    let wrong_cookie =
        CookieSessionTransport::default().get_feed(&engine, &provider, Some("sid=sess-admin"), now());
    assert_eq!(wrong_cookie.status, 401);
}

#[test]
fn non_admin_is_403_on_both_paths() {
    let engine = build();
    let provider = provider();
    let cookie = Some("session=sess-player");

    let feed = CookieSessionTransport::default().get_feed(&engine, &provider, cookie, now());
    assert_eq!(feed.status, 403);

    let dismiss = CookieSessionTransport::default().post_dismiss(
        &engine,
        &provider,
        cookie,
        r#"{"alertType":"payout_queue","alertKey":"pending"}"#,
        now(),
    );
    assert_eq!(dismiss.status, 403);
    assert_eq!(engine.store().dismissal_count().unwrap(), 0);
}

#[test]
fn dismiss_round_trip_over_bearer() {
    let engine = build();
    let provider = provider();

    let resp = BearerTokenTransport.post_dismiss(
        &engine,
        &provider,
        Some("Bearer tok-admin"),
        r#"{"alertType":"prize_setup","alertKey":"slots_2026-10-25","notes":"on it"}"#,
        now(),
    );
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["success"], true);

    let feed = BearerTokenTransport.get_feed(&engine, &provider, Some("Bearer tok-admin"), now());
    let keys: Vec<&str> = feed.body["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["key"].as_str())
        .collect();
    assert!(!keys.contains(&"slots_2026-10-25"));
    assert!(keys.contains(&"trivia_2026-10-25"));
}

#[test]
fn malformed_dismiss_bodies_are_400() {
    let engine = build();
    let provider = provider();
    let auth = Some("Bearer tok-admin");

    let missing = BearerTokenTransport.post_dismiss(&engine, &provider, auth, r#"{"alertType":"x"}"#, now());
    assert_eq!(missing.status, 400);
    assert!(missing.body["error"].as_str().unwrap().contains("alertKey"));

    let garbage = BearerTokenTransport.post_dismiss(&engine, &provider, auth, "not json", now());
    assert_eq!(garbage.status, 400);

    assert_eq!(engine.store().dismissal_count().unwrap(), 0);
}

#[test]
fn failed_audit_write_is_500_and_leaves_no_dismissal() {
    let engine = build();
    let provider = provider();
    let raw = Connection::open_with_flags(
        engine.store().path(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
    )
    .expect("raw connection");
    raw.execute_batch("DROP TABLE audit_log;").expect("drop audit_log");

    let resp = CookieSessionTransport::default().post_dismiss(
        &engine,
        &provider,
        Some("session=sess-admin"),
        r#"{"alertType":"payout_queue","alertKey":"pending"}"#,
        now(),
    );
    assert_eq!(resp.status, 500);
    assert!(resp.body["error"].as_str().unwrap().contains("audit_log"));
    assert_eq!(engine.store().dismissal_count().unwrap(), 0);
}
