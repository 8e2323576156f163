//! Campaign progress collector.
//!
//! For each active campaign, percent = totalViews / (contracted + bonus),
//! clamped to [0, 100]. At or above the critical threshold raises a
//! critical alert; otherwise at or above the warning threshold raises a
//! medium one. The tier is part of the key, so crossing from warning to
//! critical produces a new alert even if the warning was dismissed.
//!
//! Status is read as-is. The expiration job may complete a campaign
//! moments after this read; that staleness is expected.

use crate::{
    alert::{AlertCandidate, AlertType},
    collector::{AlertCollector, CollectContext},
    error::AlertResult,
    severity::Severity,
    store::CampaignRow,
};

pub const WARNING_SETTING: &str = "campaign_warning_threshold";
pub const CRITICAL_SETTING: &str = "campaign_critical_threshold";
pub const UNKNOWN_CAMPAIGN: &str = "Unknown Campaign";

#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignProgressCollector;

/// Completion percentage in [0, 100]; `None` when the campaign has no
/// view goal at all.
pub fn completion_percent(contracted: i64, bonus: i64, total: i64) -> Option<f64> {
    let goal = contracted.saturating_add(bonus);
    if goal <= 0 {
        return None;
    }
    Some((total as f64 / goal as f64 * 100.0).clamp(0.0, 100.0))
}

fn threshold(ctx: &CollectContext<'_>, setting: &str, default: f64) -> f64 {
    match ctx.store.setting_f64(setting) {
        Ok(Some(v)) => v,
        Ok(None) => default,
        Err(e) => {
            log::warn!("reading {setting} failed: {e}; using {default}");
            default
        }
    }
}

fn business_name(ctx: &CollectContext<'_>, campaign: &CampaignRow) -> String {
    let Some(card_id) = campaign.business_card_id.as_deref() else {
        log::warn!("campaign {}: no business card linked", campaign.campaign_id);
        return UNKNOWN_CAMPAIGN.to_string();
    };
    match ctx.store.business_card(card_id) {
        Ok(Some(card)) => card.business_name,
        Ok(None) => {
            log::warn!(
                "campaign {}: business card {card_id} not found",
                campaign.campaign_id
            );
            UNKNOWN_CAMPAIGN.to_string()
        }
        Err(e) => {
            log::warn!(
                "campaign {}: business card lookup failed: {e}",
                campaign.campaign_id
            );
            UNKNOWN_CAMPAIGN.to_string()
        }
    }
}

impl AlertCollector for CampaignProgressCollector {
    fn name(&self) -> &'static str {
        "campaign_progress"
    }

    fn alert_types(&self) -> &'static [AlertType] {
        &[AlertType::CampaignProgress]
    }

    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>> {
        let defaults = &ctx.config.thresholds;
        let warning = threshold(ctx, WARNING_SETTING, defaults.campaign_warning_pct);
        let critical = threshold(ctx, CRITICAL_SETTING, defaults.campaign_critical_pct);

        let mut alerts = Vec::new();
        for campaign in ctx.store.active_campaigns()? {
            let Some(percent) = completion_percent(
                campaign.contracted_views,
                campaign.bonus_views,
                campaign.total_views,
            ) else {
                log::debug!("campaign {}: no view goal, skipped", campaign.campaign_id);
                continue;
            };

            let (severity, tier, icon) = if percent >= critical {
                (Severity::Critical, "critical", "🔥")
            } else if percent >= warning {
                (Severity::Medium, "warning", "📈")
            } else {
                continue;
            };

            let name = business_name(ctx, &campaign);
            let goal = campaign.contracted_views.saturating_add(campaign.bonus_views);
            alerts.push(AlertCandidate {
                alert_type: AlertType::CampaignProgress,
                key: format!("{}_{tier}", campaign.campaign_id),
                severity,
                icon: icon.into(),
                title: format!("{name} campaign is {percent:.0}% complete"),
                description: format!(
                    "{} of {goal} views delivered ({} contracted + {} bonus).",
                    campaign.total_views, campaign.contracted_views, campaign.bonus_views
                ),
                action: format!("/admin/campaigns/{}", campaign.campaign_id),
                created_at: ctx.now,
            });
        }
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_clamped() {
        assert_eq!(completion_percent(1000, 0, 920), Some(92.0));
        assert_eq!(completion_percent(100, 50, 300), Some(100.0));
        assert_eq!(completion_percent(100, 0, -5), Some(0.0));
    }

    #[test]
    fn zero_goal_has_no_percent() {
        assert_eq!(completion_percent(0, 0, 10), None);
    }
}
