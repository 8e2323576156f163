//! Financial health collector.
//!
//! Computes the month's FinancialSnapshot and raises at most one alert:
//! critical when trueAvailable is negative, otherwise a warning while it
//! sits below the configured floor. The two are mutually exclusive.

use crate::{
    alert::{AlertCandidate, AlertType},
    collector::{format_dollars, AlertCollector, CollectContext},
    error::AlertResult,
    finance::FinancialSnapshot,
    severity::Severity,
};

/// Singleton key: the alert always describes the current position.
pub const HEALTH_KEY: &str = "current";

#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialHealthCollector;

fn breakdown(s: &FinancialSnapshot) -> String {
    format!(
        "net revenue {}, expenses {}, pending payouts {}, token liability {}",
        format_dollars(s.net_revenue),
        format_dollars(s.monthly_expenses),
        format_dollars(s.pending_payouts),
        format_dollars(s.token_liability),
    )
}

impl AlertCollector for FinancialHealthCollector {
    fn name(&self) -> &'static str {
        "financial_health"
    }

    fn alert_types(&self) -> &'static [AlertType] {
        &[AlertType::HealthCritical, AlertType::HealthWarning]
    }

    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let window = ctx.calendar.current_month(ctx.now);
        let inputs = ctx.store.financial_inputs(&window)?;
        let snapshot = FinancialSnapshot::compute(&inputs, &ctx.config.fees);
        let floor = ctx.config.thresholds.health_warning_floor;

        log::debug!(
            "financial snapshot {}: true available {:.2}",
            window.first_day,
            snapshot.true_available
        );

        let alert = if snapshot.true_available < 0.0 {
            AlertCandidate {
                alert_type: AlertType::HealthCritical,
                key: HEALTH_KEY.into(),
                severity: Severity::Critical,
                icon: "🚨".into(),
                title: "Committed liabilities exceed available cash".into(),
                description: format!(
                    "True available is {} this month ({}).",
                    format_dollars(snapshot.true_available),
                    breakdown(&snapshot)
                ),
                action: "/admin/finance".into(),
                created_at: ctx.now,
            }
        } else if snapshot.true_available < floor {
            AlertCandidate {
                alert_type: AlertType::HealthWarning,
                key: HEALTH_KEY.into(),
                severity: Severity::Medium,
                icon: "⚠️".into(),
                title: "Available cash is running low".into(),
                description: format!(
                    "True available is {}, below the {} floor ({}).",
                    format_dollars(snapshot.true_available),
                    format_dollars(floor),
                    breakdown(&snapshot)
                ),
                action: "/admin/finance".into(),
                created_at: ctx.now,
            }
        } else {
            return Ok(Vec::new());
        };

        if ctx.can_see(alert.alert_type) {
            Ok(vec![alert])
        } else {
            Ok(Vec::new())
        }
    }
}
