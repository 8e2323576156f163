//! Prize pipeline collector: pick, notify and pay weekly winners.
//!
//! The three stages are independent. A single payout that is verified
//! but neither notified nor paid raises both a notify and a pay alert.
//!
//!   pick_winner    critical  window closed, no winner, still active
//!   notify_winner  high      verified payout, no notification sent
//!   pay_winner     medium    verified payout, no payment recorded

use crate::{
    alert::{AlertCandidate, AlertType},
    collector::{format_dollars, AlertCollector, CollectContext},
    error::AlertResult,
    severity::Severity,
    store::PrizePayoutRow,
};

const NO_HANDLE: &str = "no payment handle on file";

#[derive(Debug, Clone, Copy, Default)]
pub struct PrizePipelineCollector;

impl PrizePipelineCollector {
    fn pick_winner(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let prizes = ctx.store.prizes_awaiting_winner(ctx.now)?;
        Ok(prizes
            .into_iter()
            .map(|p| AlertCandidate {
                alert_type: AlertType::PickWinner,
                key: format!("{}_{}", p.game_type, p.week_start),
                severity: Severity::Critical,
                icon: "🏆".into(),
                title: format!("Pick the {} winner", p.game_type),
                description: format!(
                    "The {} prize week starting {} has ended with no winner selected ({} prize).",
                    p.game_type,
                    p.week_start,
                    format_dollars(p.prize_amount)
                ),
                action: "/admin/prizes".into(),
                created_at: p.week_end,
            })
            .collect())
    }

    fn notify_winner(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let payouts = ctx.store.payouts_awaiting_notification()?;
        Ok(payouts
            .into_iter()
            .map(|p| AlertCandidate {
                alert_type: AlertType::NotifyWinner,
                key: p.payout_id.clone(),
                severity: Severity::High,
                icon: "📣".into(),
                title: format!("Notify the {} winner", p.game_type),
                description: format!(
                    "Payout of {} for the week of {} is verified but the winner has not been notified.",
                    format_dollars(p.amount),
                    p.week_start
                ),
                action: format!("/admin/payouts/{}", p.payout_id),
                created_at: p.created_at,
            })
            .collect())
    }

    fn pay_winner(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let payouts = ctx.store.payouts_awaiting_payment()?;
        Ok(payouts
            .into_iter()
            .map(|p| {
                let handle = payee_handle(ctx, &p);
                AlertCandidate {
                    alert_type: AlertType::PayWinner,
                    key: p.payout_id.clone(),
                    severity: Severity::Medium,
                    icon: "💸".into(),
                    title: format!("Pay the {} winner", p.game_type),
                    description: format!(
                        "Send {} for the week of {} ({handle}).",
                        format_dollars(p.amount),
                        p.week_start
                    ),
                    action: format!("/admin/payouts/{}", p.payout_id),
                    created_at: p.created_at,
                }
            })
            .collect())
    }
}

/// The payee's preferred handle, or a placeholder when it cannot be
/// resolved.
fn payee_handle(ctx: &CollectContext<'_>, payout: &PrizePayoutRow) -> String {
    match ctx.store.user_profile(&payout.user_id) {
        Ok(Some(profile)) => profile
            .preferred_handle()
            .unwrap_or_else(|| NO_HANDLE.to_string()),
        Ok(None) => {
            log::warn!(
                "payout {}: no profile for user {}",
                payout.payout_id,
                payout.user_id
            );
            NO_HANDLE.to_string()
        }
        Err(e) => {
            log::warn!("payout {}: profile lookup failed: {e}", payout.payout_id);
            NO_HANDLE.to_string()
        }
    }
}

impl AlertCollector for PrizePipelineCollector {
    fn name(&self) -> &'static str {
        "prize_pipeline"
    }

    fn alert_types(&self) -> &'static [AlertType] {
        &[AlertType::PickWinner, AlertType::NotifyWinner, AlertType::PayWinner]
    }

    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let mut alerts = Vec::new();
        if ctx.can_see(AlertType::PickWinner) {
            alerts.extend(self.pick_winner(ctx)?);
        }
        if ctx.can_see(AlertType::NotifyWinner) {
            alerts.extend(self.notify_winner(ctx)?);
        }
        if ctx.can_see(AlertType::PayWinner) {
            alerts.extend(self.pay_winner(ctx)?);
        }
        Ok(alerts)
    }
}
