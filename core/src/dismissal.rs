//! Dismissal command handler and the per-request dismissal snapshot.
//!
//! The dismiss path is the only write the alert engine performs. It never
//! touches alert computation: it records a suppression for `(type, key)`
//! and the next feed read filters against it.

use crate::{
    error::{AlertError, AlertResult},
    identity::Identity,
    store::{AlertStore, AuditLogEntry, DismissalRow},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DISMISS_ACTION: &str = "alert_dismissed";

/// Snapshot of every stored `(alert_type, alert_key)` pair, read once per
/// feed computation and shared by all collectors' output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DismissalSet {
    by_type: HashMap<String, HashSet<String>>,
}

impl DismissalSet {
    pub fn contains(&self, alert_type: &str, alert_key: &str) -> bool {
        self.by_type
            .get(alert_type)
            .is_some_and(|keys| keys.contains(alert_key))
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl FromIterator<(String, String)> for DismissalSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut by_type: HashMap<String, HashSet<String>> = HashMap::new();
        for (alert_type, alert_key) in iter {
            by_type.entry(alert_type).or_default().insert(alert_key);
        }
        Self { by_type }
    }
}

/// Body of a dismiss command. Fields are optional on the wire so that a
/// missing field is reported as a validation error rather than a parse
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissRequest {
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub alert_key: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DismissRequest {
    pub fn new(alert_type: &str, alert_key: &str) -> Self {
        Self {
            alert_type: Some(alert_type.to_string()),
            alert_key: Some(alert_key.to_string()),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissResponse {
    pub success: bool,
}

fn required(value: &Option<String>, field: &'static str) -> AlertResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AlertError::MissingField { field }),
    }
}

/// Validate, authorize, then upsert the suppression with its audit row.
///
/// Dismissing an already-dismissed pair refreshes actor, timestamp and
/// notes and appends another audit row; it never creates a second
/// dismissal row.
pub fn dismiss(
    store: &AlertStore,
    caller: &Identity,
    request: &DismissRequest,
    now: Timestamp,
) -> AlertResult<DismissResponse> {
    caller.require_admin()?;
    let alert_type = required(&request.alert_type, "alertType")?;
    let alert_key = required(&request.alert_key, "alertKey")?;
    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let row = DismissalRow {
        alert_type: alert_type.clone(),
        alert_key: alert_key.clone(),
        dismissed_by: caller.user_id.clone(),
        dismissed_at: now,
        notes: notes.clone(),
    };
    let audit = AuditLogEntry {
        entry_id: uuid::Uuid::new_v4().to_string(),
        actor: caller.user_id.clone(),
        action: DISMISS_ACTION.to_string(),
        affected_key: format!("{alert_type}:{alert_key}"),
        payload: serde_json::json!({
            "alertType": alert_type,
            "alertKey": alert_key,
            "notes": notes,
        }),
        created_at: now,
    };

    store.record_dismissal(&row, &audit)?;
    log::info!(
        "alert dismissed: {alert_type}/{alert_key} by {} ({})",
        caller.user_id,
        caller.role
    );
    Ok(DismissResponse { success: true })
}
