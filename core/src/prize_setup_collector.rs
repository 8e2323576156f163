//! Prize setup collector: every supported game type needs a prize row
//! for the next calendar week.

use crate::{
    alert::{AlertCandidate, AlertType},
    calendar::format_date,
    collector::{AlertCollector, CollectContext},
    error::AlertResult,
    severity::Severity,
};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct PrizeSetupCollector;

impl AlertCollector for PrizeSetupCollector {
    fn name(&self) -> &'static str {
        "prize_setup"
    }

    fn alert_types(&self) -> &'static [AlertType] {
        &[AlertType::PrizeSetup]
    }

    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let week = format_date(ctx.calendar.next_week_start(ctx.now));
        let mut alerts = Vec::new();
        let mut seen = HashSet::new();

        for game_type in &ctx.config.game_types {
            // Keys must stay unique within the type.
            if !seen.insert(game_type.as_str()) {
                continue;
            }
            if ctx.store.prize_configured(game_type, &week)? {
                continue;
            }
            alerts.push(AlertCandidate {
                alert_type: AlertType::PrizeSetup,
                key: format!("{game_type}_{week}"),
                severity: Severity::High,
                icon: "🗓️".into(),
                title: format!("Set up next week's {game_type} prize"),
                description: format!(
                    "No {game_type} prize is configured for the week starting {week}."
                ),
                action: "/admin/prizes/new".into(),
                created_at: ctx.now,
            });
        }
        Ok(alerts)
    }
}
