//! Payout queue collector: one aggregate alert while anything is pending.

use crate::{
    alert::{AlertCandidate, AlertType},
    collector::{format_dollars, AlertCollector, CollectContext},
    error::AlertResult,
    severity::Severity,
};

pub const QUEUE_KEY: &str = "pending";

#[derive(Debug, Clone, Copy, Default)]
pub struct PayoutQueueCollector;

impl AlertCollector for PayoutQueueCollector {
    fn name(&self) -> &'static str {
        "payout_queue"
    }

    fn alert_types(&self) -> &'static [AlertType] {
        &[AlertType::PayoutQueue]
    }

    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let summary = ctx.store.payout_queue_summary()?;
        if summary.pending_count == 0 {
            return Ok(Vec::new());
        }

        let noun = if summary.pending_count == 1 { "payout" } else { "payouts" };
        Ok(vec![AlertCandidate {
            alert_type: AlertType::PayoutQueue,
            key: QUEUE_KEY.into(),
            severity: Severity::Medium,
            icon: "⏳".into(),
            title: "Payout queue has pending items".into(),
            description: format!(
                "{} {noun} pending, totalling {}.",
                summary.pending_count,
                format_dollars(summary.total_amount)
            ),
            action: "/admin/payout-queue".into(),
            created_at: summary.oldest_created_at.unwrap_or(ctx.now),
        }])
    }
}
