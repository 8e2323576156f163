//! Collector trait and the read context handed to every collector.
//!
//! RULE: Collectors are read-only. They map (now, live state) to zero or
//! more candidates and have no side effects. A failed enrichment lookup
//! inside a collector is replaced by a placeholder and logged; it never
//! drops the alert or aborts the collector.

use crate::{
    alert::{AlertCandidate, AlertType},
    calendar::LocalCalendar,
    config::AlertConfig,
    error::AlertResult,
    role::Role,
    store::AlertStore,
    types::Timestamp,
};

pub struct CollectContext<'a> {
    pub now: Timestamp,
    pub role: Role,
    pub store: &'a AlertStore,
    pub config: &'a AlertConfig,
    pub calendar: LocalCalendar,
}

impl<'a> CollectContext<'a> {
    pub fn new(
        now: Timestamp,
        role: Role,
        store: &'a AlertStore,
        config: &'a AlertConfig,
    ) -> Self {
        Self {
            now,
            role,
            store,
            config,
            calendar: LocalCalendar::new(config.utc_offset_minutes),
        }
    }

    /// Collectors that emit several types skip the stages the caller
    /// could never see, so their enrichment queries never run.
    pub fn can_see(&self, alert_type: AlertType) -> bool {
        self.config.visibility.can_see(alert_type, self.role)
    }
}

/// `$1234.50`, or `-$40.00` for negatives.
pub fn format_dollars(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// The contract every alert family fulfils.
pub trait AlertCollector: Send + Sync {
    /// Unique stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Every type this collector can emit. The permission gate skips the
    /// collector entirely when the caller can see none of them.
    fn alert_types(&self) -> &'static [AlertType];

    /// Candidates in a deterministic emission order.
    fn collect(&self, ctx: &CollectContext<'_>) -> AlertResult<Vec<AlertCandidate>>;
}
