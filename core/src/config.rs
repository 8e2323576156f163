use crate::permission::VisibilityMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Thresholds ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// trueAvailable below this (and not negative) raises a health warning.
    pub health_warning_floor: f64,
    /// Default campaign completion percentages. The `settings` table
    /// overrides both at runtime.
    pub campaign_warning_pct: f64,
    pub campaign_critical_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            health_warning_floor: 100.0,
            campaign_warning_pct: 75.0,
            campaign_critical_pct: 90.0,
        }
    }
}

// ── Fees and liabilities ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Card processor percentage fee on gross revenue.
    pub processing_percent: f64,
    /// Card processor flat fee per paid campaign.
    pub processing_fixed: f64,
    /// Dollar value of one outstanding user token.
    pub token_value: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            processing_percent: 0.029,
            processing_fixed: 0.30,
            token_value: 0.05,
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub visibility: VisibilityMatrix,
    pub thresholds: AlertThresholds,
    pub fees: FeeSchedule,
    /// Game types that must have a prize configured for every week.
    pub game_types: Vec<String>,
    /// Offset of the site's local calendar from UTC. Month boundaries and
    /// "next Sunday 00:00" are computed in this offset.
    pub utc_offset_minutes: i32,
    /// Run collectors on scoped threads, each with its own connection.
    pub parallel_collectors: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            visibility: VisibilityMatrix::default(),
            thresholds: AlertThresholds::default(),
            fees: FeeSchedule::default(),
            game_types: vec!["slots".into(), "trivia".into(), "memory".into()],
            utc_offset_minutes: 0,
            parallel_collectors: true,
        }
    }
}

impl AlertConfig {
    /// Load from `{data_dir}/alerts.json`. Missing fields fall back to
    /// the defaults. In tests, use AlertConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/alerts.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AlertConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold, offset and game-type settings that would make
    /// the collectors misbehave. `load` runs this; configs built in code
    /// should call it too.
    pub fn validate(&self) -> anyhow::Result<()> {
        let t = &self.thresholds;
        if t.campaign_warning_pct > t.campaign_critical_pct {
            anyhow::bail!(
                "campaign_warning_pct ({}) exceeds campaign_critical_pct ({})",
                t.campaign_warning_pct,
                t.campaign_critical_pct
            );
        }
        if !(-14 * 60..=14 * 60).contains(&self.utc_offset_minutes) {
            anyhow::bail!("utc_offset_minutes out of range: {}", self.utc_offset_minutes);
        }
        let mut seen = BTreeSet::new();
        for game_type in &self.game_types {
            if !seen.insert(game_type.as_str()) {
                anyhow::bail!("game type listed twice: {game_type}");
            }
        }
        Ok(())
    }
}
