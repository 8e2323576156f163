//! alert-console: headless line-oriented runner for the alert engine.
//!
//! Usage:
//!   alert-console --db ops.db --data-dir ./data
//!   alert-console --demo            (in-memory database with sample data)
//!
//! Reads one JSON command per stdin line, writes one JSON response per
//! stdout line:
//!   {"type":"feed","cookie":"session=sess-admin"}
//!   {"type":"feed","authorization":"Bearer tok-support"}
//!   {"type":"dismiss","authorization":"Bearer tok-admin",
//!    "body":{"alertType":"payout_queue","alertKey":"pending"}}
//!   {"type":"dismissals"}
//!   {"type":"quit"}

use anyhow::Result;
use chrono::{Datelike, Duration, Utc};
use opsdesk_core::{
    config::AlertConfig,
    engine::AlertEngine,
    identity::{Identity, StaticIdentityProvider},
    role::Role,
    store::{
        AlertStore, BusinessCardRow, CampaignRow, CampaignStatus, PayoutQueueRow, PrizePayoutRow,
        UserProfileRow, WeeklyPrizeRow,
    },
    transport::{BearerTokenTransport, CookieSessionTransport, Transport, TransportResponse},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ConsoleCommand {
    Feed {
        #[serde(default)]
        cookie: Option<String>,
        #[serde(default)]
        authorization: Option<String>,
    },
    Dismiss {
        #[serde(default)]
        cookie: Option<String>,
        #[serde(default)]
        authorization: Option<String>,
        body: serde_json::Value,
    },
    Dismissals,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let demo = args.iter().any(|a| a == "--demo");
    let db = arg_value(&args, "--db");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");

    let store = match db {
        Some(path) => AlertStore::open(path)?,
        None => AlertStore::in_memory()?,
    };
    store.migrate()?;
    if demo {
        seed_demo(&store)?;
    }

    let config = AlertConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; using default alert config");
        AlertConfig::default()
    });
    let provider = if demo {
        demo_identities()
    } else {
        StaticIdentityProvider::load(data_dir)?
    };

    log::info!(
        "alert-console ready (db: {}, demo: {demo})",
        db.unwrap_or(":memory:")
    );

    let engine = AlertEngine::build(config, store);
    run_loop(&engine, &provider)
}

fn run_loop(engine: &AlertEngine, provider: &StaticIdentityProvider) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let cookie_transport = CookieSessionTransport::default();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cmd: ConsoleCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "status": 400, "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        let now = Utc::now();
        let response = match cmd {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Feed { cookie, authorization } => match (cookie, authorization) {
                (Some(c), _) => cookie_transport.get_feed(engine, provider, Some(&c), now),
                (None, a) => BearerTokenTransport.get_feed(engine, provider, a.as_deref(), now),
            },
            ConsoleCommand::Dismiss { cookie, authorization, body } => {
                let body = body.to_string();
                match (cookie, authorization) {
                    (Some(c), _) => {
                        cookie_transport.post_dismiss(engine, provider, Some(&c), &body, now)
                    }
                    (None, a) => {
                        BearerTokenTransport.post_dismiss(engine, provider, a.as_deref(), &body, now)
                    }
                }
            }
            ConsoleCommand::Dismissals => match engine.store().list_dismissals() {
                Ok(rows) => TransportResponse {
                    status: 200,
                    body: serde_json::to_value(rows)?,
                },
                Err(e) => TransportResponse {
                    status: e.status_code(),
                    body: serde_json::json!({ "error": e.to_string() }),
                },
            },
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn demo_identities() -> StaticIdentityProvider {
    StaticIdentityProvider::new()
        .with("sess-admin", Identity::admin("demo-admin", Role::Admin))
        .with("tok-admin", Identity::admin("demo-admin", Role::Admin))
        .with("tok-support", Identity::admin("demo-support", Role::Support))
        .with("tok-manager", Identity::admin("demo-manager", Role::Manager))
        .with("tok-player", Identity::new("demo-player", Role::Support, false))
}

const DEMO_PLAYER: &str = "player-1";

/// A small live dataset that lights up every collector. A database that
/// already holds it is left alone, so `--demo --db <file>` can be rerun.
fn seed_demo(store: &AlertStore) -> Result<()> {
    let now = Utc::now();
    let today = now.date_naive();
    let last_week_start =
        today - Duration::days(i64::from(today.weekday().num_days_from_sunday()) + 7);
    let week = last_week_start.format("%Y-%m-%d").to_string();

    if store.user_profile(DEMO_PLAYER)?.is_some() {
        log::info!("demo data already present; skipping seed");
        return Ok(());
    }

    store.insert_weekly_prize(&WeeklyPrizeRow {
        game_type: "slots".into(),
        week_start: week.clone(),
        week_end: now - Duration::hours(6),
        prize_amount: 150.0,
        winner_user_id: None,
        is_active: true,
    })?;
    store.insert_user_profile(&UserProfileRow {
        user_id: DEMO_PLAYER.into(),
        display_name: "Sam".into(),
        preferred_method: Some("paypal".into()),
        paypal_email: Some("sam@example.com".into()),
        ..UserProfileRow::default()
    })?;
    store.insert_prize_payout(&PrizePayoutRow {
        payout_id: "payout-1".into(),
        user_id: DEMO_PLAYER.into(),
        game_type: "trivia".into(),
        week_start: week,
        amount: 100.0,
        status: "verified".into(),
        notified_at: None,
        paid_at: None,
        created_at: now - Duration::days(1),
    })?;
    store.insert_business_card(&BusinessCardRow {
        card_id: "card-1".into(),
        business_name: "Harbor Bikes".into(),
    })?;
    store.insert_campaign(&CampaignRow {
        campaign_id: "campaign-1".into(),
        business_card_id: Some("card-1".into()),
        status: CampaignStatus::Active,
        contracted_views: 1000,
        bonus_views: 100,
        total_views: 880,
        amount_paid: 250.0,
        paid_at: Some(now - Duration::hours(20)),
        created_at: now - Duration::hours(20),
    })?;
    store.insert_payout_queue(&PayoutQueueRow {
        queue_id: "queue-1".into(),
        user_id: "player-2".into(),
        amount: 20.0,
        status: "pending".into(),
        created_at: now - Duration::hours(2),
    })?;
    store.set_token_balance(DEMO_PLAYER, 1200)?;
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
