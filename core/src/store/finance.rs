//! Monthly revenue, expense, liability and payout-queue queries.

use super::{from_epoch, to_epoch, AlertStore, PayoutQueueRow};
use crate::{
    calendar::{format_date, MonthWindow},
    error::AlertResult,
    finance::FinancialInputs,
    types::Timestamp,
};
use rusqlite::params;
use serde::Serialize;

/// Aggregate of the `payout_queue` rows still pending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoutQueueSummary {
    pub pending_count: i64,
    pub total_amount: f64,
    pub oldest_created_at: Option<Timestamp>,
}

impl AlertStore {
    /// Read every raw input the financial snapshot needs for one month.
    pub fn financial_inputs(&self, window: &MonthWindow) -> AlertResult<FinancialInputs> {
        // Revenue counts campaigns paid inside the window that were not
        // left unpaid or cancelled.
        let (gross_revenue, paid_campaigns): (f64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_paid), 0.0), COUNT(*)
             FROM campaign
             WHERE paid_at >= ?1 AND paid_at < ?2
               AND status IN ('active', 'queued', 'completed')",
            params![to_epoch(window.start), to_epoch(window.end)],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        let monthly_expenses: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expense
             WHERE incurred_on >= ?1 AND incurred_on < ?2",
            params![format_date(window.first_day), format_date(window.next_first_day)],
            |r| r.get(0),
        )?;

        let pending_payouts: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM prize_payout
             WHERE status IN ('pending', 'verified') AND paid_at IS NULL",
            [],
            |r| r.get(0),
        )?;

        let outstanding_tokens: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(balance), 0) FROM token_balance WHERE balance > 0",
            [],
            |r| r.get(0),
        )?;

        Ok(FinancialInputs {
            gross_revenue,
            paid_campaigns: u32::try_from(paid_campaigns).unwrap_or(u32::MAX),
            monthly_expenses,
            pending_payouts,
            outstanding_tokens,
        })
    }

    pub fn insert_expense(
        &self,
        expense_id: &str,
        description: &str,
        amount: f64,
        incurred_on: &str,
    ) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO expense (expense_id, description, amount, incurred_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![expense_id, description, amount, incurred_on],
        )?;
        Ok(())
    }

    pub fn set_token_balance(&self, user_id: &str, balance: i64) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO token_balance (user_id, balance) VALUES (?1, ?2)
             ON CONFLICT (user_id) DO UPDATE SET balance = excluded.balance",
            params![user_id, balance],
        )?;
        Ok(())
    }

    // ── payout_queue ─────────────────────────────────────────────────

    pub fn insert_payout_queue(&self, row: &PayoutQueueRow) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO payout_queue (queue_id, user_id, amount, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.queue_id,
                row.user_id,
                row.amount,
                row.status,
                to_epoch(row.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn payout_queue_summary(&self) -> AlertResult<PayoutQueueSummary> {
        let (pending_count, total_amount, oldest): (i64, f64, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(amount), 0.0), MIN(created_at)
                 FROM payout_queue WHERE status = 'pending'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )?;
        Ok(PayoutQueueSummary {
            pending_count,
            total_amount,
            oldest_created_at: oldest.map(from_epoch),
        })
    }
}
