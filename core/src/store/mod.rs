//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Collectors and the dismissal handler call store methods; they never
//! execute SQL directly.

use crate::{
    error::{AlertError, AlertResult},
    types::{Timestamp, UserId},
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

mod campaign;
mod dismissal;
mod finance;
mod prize;
mod settings;

pub use finance::PayoutQueueSummary;

pub struct AlertStore {
    conn: Connection,
    path: String,
}

impl fmt::Debug for AlertStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertStore").field("path", &self.path).finish()
    }
}

impl AlertStore {
    /// Open (or create) the database at `path`. `file:` URIs are accepted.
    pub fn open(path: &str) -> AlertResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL only applies to real files; shared-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Open a fresh in-memory database (used in tests and demos).
    ///
    /// The database is a uniquely named shared-cache URI, so reopen()
    /// yields further connections to the same data for as long as this
    /// store stays alive.
    pub fn in_memory() -> AlertResult<Self> {
        let uri = format!(
            "file:opsdesk_{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4().simple()
        );
        Self::open(&uri)
    }

    /// A new connection to the same database.
    pub fn reopen(&self) -> AlertResult<Self> {
        Self::open(&self.path)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AlertResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_live_state.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_alert_dismissal.sql"))?;
        Ok(())
    }
}

// ── Time columns ───────────────────────────────────────────────────
//
// Instants are stored as Unix seconds.

pub(crate) fn to_epoch(ts: Timestamp) -> i64 {
    ts.timestamp()
}

pub(crate) fn from_epoch(secs: i64) -> Timestamp {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

// ── Row types ──────────────────────────────────────────────────────

/// Row from the `weekly_prize` table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPrizeRow {
    pub game_type: String,
    /// Local `YYYY-MM-DD` of the Sunday that opens the prize week.
    pub week_start: String,
    pub week_end: Timestamp,
    pub prize_amount: f64,
    pub winner_user_id: Option<UserId>,
    pub is_active: bool,
}

/// Row from the `prize_payout` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PrizePayoutRow {
    pub payout_id: String,
    pub user_id: UserId,
    pub game_type: String,
    pub week_start: String,
    pub amount: f64,
    /// pending | verified | paid | rejected
    pub status: String,
    pub notified_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Row from the `user_profile` table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfileRow {
    pub user_id: UserId,
    pub display_name: String,
    /// paypal | venmo | cashapp
    pub preferred_method: Option<String>,
    pub paypal_email: Option<String>,
    pub venmo_handle: Option<String>,
    pub cashapp_tag: Option<String>,
}

impl UserProfileRow {
    /// The handle for the user's preferred payout method, if recorded.
    pub fn preferred_handle(&self) -> Option<String> {
        let (label, handle) = match self.preferred_method.as_deref()? {
            "paypal" => ("PayPal", self.paypal_email.as_ref()?),
            "venmo" => ("Venmo", self.venmo_handle.as_ref()?),
            "cashapp" => ("Cash App", self.cashapp_tag.as_ref()?),
            _ => return None,
        };
        Some(format!("{label}: {handle}"))
    }
}

/// Row from the `business_card` table.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessCardRow {
    pub card_id: String,
    pub business_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    PendingPayment,
    Active,
    Queued,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Active => "active",
            Self::Queued => "queued",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = AlertError;

    fn from_str(s: &str) -> AlertResult<Self> {
        match s {
            "pending_payment" => Ok(Self::PendingPayment),
            "active" => Ok(Self::Active),
            "queued" => Ok(Self::Queued),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AlertError::InvalidStoredValue {
                column: "campaign.status",
                value: other.to_string(),
            }),
        }
    }
}

/// Row from the `campaign` table.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRow {
    pub campaign_id: String,
    pub business_card_id: Option<String>,
    pub status: CampaignStatus,
    pub contracted_views: i64,
    pub bonus_views: i64,
    pub total_views: i64,
    pub amount_paid: f64,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Row from the `payout_queue` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutQueueRow {
    pub queue_id: String,
    pub user_id: UserId,
    pub amount: f64,
    /// pending | processed | failed
    pub status: String,
    pub created_at: Timestamp,
}

/// Row from the `alert_dismissal` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DismissalRow {
    pub alert_type: String,
    pub alert_key: String,
    pub dismissed_by: UserId,
    pub dismissed_at: Timestamp,
    pub notes: Option<String>,
}

/// The audit log entry as persisted to SQLite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub entry_id: String,
    pub actor: UserId,
    pub action: String,
    pub affected_key: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
