//! Dismissal and audit-log persistence.

use super::{from_epoch, to_epoch, AlertStore, AuditLogEntry, DismissalRow};
use crate::{dismissal::DismissalSet, error::AlertResult};
use rusqlite::params;

impl AlertStore {
    /// Insert on first dismiss; refresh actor, timestamp and notes on
    /// repeats. The conflict target is exactly `(alert_type, alert_key)`.
    pub fn upsert_dismissal(&self, row: &DismissalRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO alert_dismissal (alert_type, alert_key, dismissed_by, dismissed_at, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (alert_type, alert_key) DO UPDATE SET
                 dismissed_by = excluded.dismissed_by,
                 dismissed_at = excluded.dismissed_at,
                 notes        = excluded.notes",
            params![
                row.alert_type,
                row.alert_key,
                row.dismissed_by,
                to_epoch(row.dismissed_at),
                row.notes,
            ],
        )?;
        Ok(())
    }

    pub fn append_audit(&self, entry: &AuditLogEntry) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO audit_log (entry_id, actor, action, affected_key, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.entry_id,
                entry.actor,
                entry.action,
                entry.affected_key,
                serde_json::to_string(&entry.payload)?,
                to_epoch(entry.created_at),
            ],
        )?;
        Ok(())
    }

    /// Upsert the dismissal and append its audit row in one transaction.
    /// Either both rows land or neither does.
    pub fn record_dismissal(&self, row: &DismissalRow, audit: &AuditLogEntry) -> AlertResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.upsert_dismissal(row)?;
        self.append_audit(audit)?;
        tx.commit()?;
        Ok(())
    }

    /// The full dismissal table as one in-memory snapshot.
    pub fn dismissal_set(&self) -> AlertResult<DismissalSet> {
        let mut stmt = self
            .conn
            .prepare("SELECT alert_type, alert_key FROM alert_dismissal")?;
        let pairs = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pairs.into_iter().collect())
    }

    pub fn list_dismissals(&self) -> AlertResult<Vec<DismissalRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT alert_type, alert_key, dismissed_by, dismissed_at, notes
             FROM alert_dismissal
             ORDER BY alert_type, alert_key",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(DismissalRow {
                    alert_type: r.get(0)?,
                    alert_key: r.get(1)?,
                    dismissed_by: r.get(2)?,
                    dismissed_at: from_epoch(r.get(3)?),
                    notes: r.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn dismissal_count(&self) -> AlertResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM alert_dismissal", [], |r| r.get(0))?)
    }

    /// Audit rows touching `affected_key`, oldest first.
    pub fn audit_entries_for(&self, affected_key: &str) -> AlertResult<Vec<AuditLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, actor, action, affected_key, payload, created_at
             FROM audit_log WHERE affected_key = ?1
             ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![affected_key], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(raw.len());
        for (entry_id, actor, action, affected_key, payload, created_at) in raw {
            entries.push(AuditLogEntry {
                entry_id,
                actor,
                action,
                affected_key,
                payload: serde_json::from_str(&payload)?,
                created_at: from_epoch(created_at),
            });
        }
        Ok(entries)
    }

    pub fn audit_log_count(&self) -> AlertResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |r| r.get(0))?)
    }
}
