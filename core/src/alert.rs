//! Alert candidates and the assembled feed.
//!
//! RULE: Candidates are ephemeral. They are rebuilt on every feed request
//! and never written to the database. Identity is `(alert_type, key)`;
//! keys must be derived only from the underlying entity so that a stored
//! dismissal keeps matching on every later recomputation.

use crate::{severity::Severity, types::{AlertKey, Timestamp}};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every alert type the collectors can emit.
/// Variants are never renamed: the string form is persisted in
/// `alert_dismissal.alert_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    // ── Prize pipeline ─────────────────────────────
    PickWinner,
    NotifyWinner,
    PayWinner,
    // ── Prize setup ────────────────────────────────
    PrizeSetup,
    // ── Financial health ───────────────────────────
    HealthCritical,
    HealthWarning,
    // ── Payout queue ───────────────────────────────
    PayoutQueue,
    // ── Campaign progress ──────────────────────────
    CampaignProgress,
}

impl AlertType {
    pub const ALL: [AlertType; 8] = [
        AlertType::PickWinner,
        AlertType::NotifyWinner,
        AlertType::PayWinner,
        AlertType::PrizeSetup,
        AlertType::HealthCritical,
        AlertType::HealthWarning,
        AlertType::PayoutQueue,
        AlertType::CampaignProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PickWinner => "pick_winner",
            Self::NotifyWinner => "notify_winner",
            Self::PayWinner => "pay_winner",
            Self::PrizeSetup => "prize_setup",
            Self::HealthCritical => "health_critical",
            Self::HealthWarning => "health_warning",
            Self::PayoutQueue => "payout_queue",
            Self::CampaignProgress => "campaign_progress",
        }
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown alert type '{s}'"))
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCandidate {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub key: AlertKey,
    pub severity: Severity,
    pub icon: String,
    pub title: String,
    pub description: String,
    /// Admin console route the operator should open to act on the alert.
    pub action: String,
    pub created_at: Timestamp,
}

impl AlertCandidate {
    /// The `(type, key)` pair matched against stored dismissals.
    pub fn identity(&self) -> (&'static str, &str) {
        (self.alert_type.as_str(), self.key.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

/// The response body of a feed read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFeed {
    pub alerts: Vec<AlertCandidate>,
    pub count: usize,
    pub count_by_severity: SeverityCounts,
}

impl AlertFeed {
    pub fn empty() -> Self {
        Self {
            alerts: Vec::new(),
            count: 0,
            count_by_severity: SeverityCounts::default(),
        }
    }
}
