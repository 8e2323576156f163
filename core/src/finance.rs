//! Financial snapshot math shared by the health collector and any
//! dashboard that needs the same numbers.
//!
//! The snapshot is derived on every call and never persisted.
//!   netRevenue     = grossRevenue - processingFees
//!   trueAvailable  = netRevenue - monthlyExpenses - pendingPayouts - tokenLiability

use crate::config::FeeSchedule;
use serde::{Deserialize, Serialize};

/// Raw monthly figures as read from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    pub gross_revenue: f64,
    pub paid_campaigns: u32,
    pub monthly_expenses: f64,
    pub pending_payouts: f64,
    pub outstanding_tokens: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub gross_revenue: f64,
    pub processing_fees: f64,
    pub net_revenue: f64,
    pub pending_payouts: f64,
    pub token_liability: f64,
    pub monthly_expenses: f64,
    pub true_available: f64,
}

impl FinancialSnapshot {
    /// Negative raw inputs are clamped to zero; only `true_available`
    /// may go negative.
    pub fn compute(inputs: &FinancialInputs, fees: &FeeSchedule) -> Self {
        let gross_revenue = inputs.gross_revenue.max(0.0);
        let processing_fees = gross_revenue * fees.processing_percent
            + f64::from(inputs.paid_campaigns) * fees.processing_fixed;
        let net_revenue = gross_revenue - processing_fees;
        let pending_payouts = inputs.pending_payouts.max(0.0);
        let token_liability = inputs.outstanding_tokens.max(0) as f64 * fees.token_value;
        let monthly_expenses = inputs.monthly_expenses.max(0.0);
        let true_available = net_revenue - monthly_expenses - pending_payouts - token_liability;

        Self {
            gross_revenue,
            processing_fees,
            net_revenue,
            pending_payouts,
            token_liability,
            monthly_expenses,
            true_available,
        }
    }
}
