//! Weekly prize, payout and payee-profile queries.

use super::{from_epoch, to_epoch, AlertStore, PrizePayoutRow, UserProfileRow, WeeklyPrizeRow};
use crate::{error::AlertResult, types::Timestamp};
use rusqlite::{params, OptionalExtension, Row};

const PAYOUT_COLUMNS: &str = "payout_id, user_id, game_type, week_start, amount, status,
                              notified_at, paid_at, created_at";

fn payout_from_row(r: &Row<'_>) -> rusqlite::Result<PrizePayoutRow> {
    Ok(PrizePayoutRow {
        payout_id: r.get(0)?,
        user_id: r.get(1)?,
        game_type: r.get(2)?,
        week_start: r.get(3)?,
        amount: r.get(4)?,
        status: r.get(5)?,
        notified_at: r.get::<_, Option<i64>>(6)?.map(from_epoch),
        paid_at: r.get::<_, Option<i64>>(7)?.map(from_epoch),
        created_at: from_epoch(r.get(8)?),
    })
}

impl AlertStore {
    // ── weekly_prize ─────────────────────────────────────────────────

    pub fn insert_weekly_prize(&self, row: &WeeklyPrizeRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO weekly_prize (
                 game_type, week_start, week_end, prize_amount, winner_user_id, is_active
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.game_type,
                row.week_start,
                to_epoch(row.week_end),
                row.prize_amount,
                row.winner_user_id,
                row.is_active,
            ],
        )?;
        Ok(())
    }

    /// Active prize weeks whose window closed before `now` without a winner.
    pub fn prizes_awaiting_winner(&self, now: Timestamp) -> AlertResult<Vec<WeeklyPrizeRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_type, week_start, week_end, prize_amount, winner_user_id, is_active
             FROM weekly_prize
             WHERE week_end < ?1 AND winner_user_id IS NULL AND is_active = 1
             ORDER BY week_start, game_type",
        )?;
        let rows = stmt
            .query_map(params![to_epoch(now)], |r| {
                Ok(WeeklyPrizeRow {
                    game_type: r.get(0)?,
                    week_start: r.get(1)?,
                    week_end: from_epoch(r.get(2)?),
                    prize_amount: r.get(3)?,
                    winner_user_id: r.get(4)?,
                    is_active: r.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn prize_configured(&self, game_type: &str, week_start: &str) -> AlertResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM weekly_prize WHERE game_type = ?1 AND week_start = ?2",
            params![game_type, week_start],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn set_prize_winner(
        &self,
        game_type: &str,
        week_start: &str,
        winner_user_id: &str,
    ) -> AlertResult<()> {
        self.conn.execute(
            "UPDATE weekly_prize SET winner_user_id = ?1
             WHERE game_type = ?2 AND week_start = ?3",
            params![winner_user_id, game_type, week_start],
        )?;
        Ok(())
    }

    // ── prize_payout ─────────────────────────────────────────────────

    pub fn insert_prize_payout(&self, row: &PrizePayoutRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO prize_payout (
                 payout_id, user_id, game_type, week_start, amount, status,
                 notified_at, paid_at, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.payout_id,
                row.user_id,
                row.game_type,
                row.week_start,
                row.amount,
                row.status,
                row.notified_at.map(to_epoch),
                row.paid_at.map(to_epoch),
                to_epoch(row.created_at),
            ],
        )?;
        Ok(())
    }

    /// Verified payouts the winner has not yet been told about.
    pub fn payouts_awaiting_notification(&self) -> AlertResult<Vec<PrizePayoutRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PAYOUT_COLUMNS} FROM prize_payout
             WHERE status = 'verified' AND notified_at IS NULL
             ORDER BY created_at, payout_id"
        ))?;
        let rows = stmt
            .query_map([], payout_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Verified payouts with no recorded payment.
    pub fn payouts_awaiting_payment(&self) -> AlertResult<Vec<PrizePayoutRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PAYOUT_COLUMNS} FROM prize_payout
             WHERE status = 'verified' AND paid_at IS NULL
             ORDER BY created_at, payout_id"
        ))?;
        let rows = stmt
            .query_map([], payout_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set by the notification workflow; exposed here for tests and demos.
    pub fn mark_payout_notified(&self, payout_id: &str, at: Timestamp) -> AlertResult<()> {
        self.conn.execute(
            "UPDATE prize_payout SET notified_at = ?1 WHERE payout_id = ?2",
            params![to_epoch(at), payout_id],
        )?;
        Ok(())
    }

    // ── user_profile ─────────────────────────────────────────────────

    pub fn insert_user_profile(&self, row: &UserProfileRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO user_profile (
                 user_id, display_name, preferred_method, paypal_email, venmo_handle, cashapp_tag
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.user_id,
                row.display_name,
                row.preferred_method,
                row.paypal_email,
                row.venmo_handle,
                row.cashapp_tag,
            ],
        )?;
        Ok(())
    }

    pub fn user_profile(&self, user_id: &str) -> AlertResult<Option<UserProfileRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, display_name, preferred_method, paypal_email,
                        venmo_handle, cashapp_tag
                 FROM user_profile WHERE user_id = ?1",
                params![user_id],
                |r| {
                    Ok(UserProfileRow {
                        user_id: r.get(0)?,
                        display_name: r.get(1)?,
                        preferred_method: r.get(2)?,
                        paypal_email: r.get(3)?,
                        venmo_handle: r.get(4)?,
                        cashapp_tag: r.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
