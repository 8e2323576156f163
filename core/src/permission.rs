//! Permission gate: which roles may observe which alert types.
//!
//! The matrix is an immutable configuration value handed to the engine.
//! It is consulted twice per feed: before a collector runs (skip it when
//! the caller could see none of its types) and again per candidate.

use crate::{alert::AlertType, role::Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityMatrix {
    entries: BTreeMap<AlertType, BTreeSet<Role>>,
}

impl VisibilityMatrix {
    pub fn new(entries: BTreeMap<AlertType, BTreeSet<Role>>) -> Self {
        Self { entries }
    }

    /// A type absent from the matrix is visible to nobody.
    pub fn can_see(&self, alert_type: AlertType, role: Role) -> bool {
        self.entries
            .get(&alert_type)
            .is_some_and(|roles| roles.contains(&role))
    }

    /// True when `role` may see at least one of `types`.
    pub fn any_visible(&self, types: &[AlertType], role: Role) -> bool {
        types.iter().any(|t| self.can_see(*t, role))
    }

    /// Replace the allowed roles for one type. Used by tests and by
    /// config overrides layered on top of the defaults.
    pub fn with_entry(mut self, alert_type: AlertType, roles: &[Role]) -> Self {
        self.entries.insert(alert_type, roles.iter().copied().collect());
        self
    }

    pub fn visible_types(&self, role: Role) -> Vec<AlertType> {
        self.entries
            .iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(t, _)| *t)
            .collect()
    }
}

impl Default for VisibilityMatrix {
    fn default() -> Self {
        use Role::*;
        let everyone: &[Role] = &[Support, Manager, Admin, SuperAdmin];
        let managers: &[Role] = &[Manager, Admin, SuperAdmin];
        let admins: &[Role] = &[Admin, SuperAdmin];

        let table: [(AlertType, &[Role]); 8] = [
            (AlertType::PickWinner, managers),
            (AlertType::NotifyWinner, everyone),
            (AlertType::PayWinner, admins),
            (AlertType::PrizeSetup, managers),
            (AlertType::HealthCritical, admins),
            (AlertType::HealthWarning, admins),
            (AlertType::PayoutQueue, admins),
            (AlertType::CampaignProgress, everyone),
        ];

        Self::new(
            table
                .into_iter()
                .map(|(t, roles)| (t, roles.iter().copied().collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_never_sees_financial_types() {
        let m = VisibilityMatrix::default();
        assert!(!m.can_see(AlertType::HealthCritical, Role::Support));
        assert!(!m.can_see(AlertType::HealthWarning, Role::Support));
        assert!(!m.can_see(AlertType::PayWinner, Role::Support));
        assert!(m.can_see(AlertType::CampaignProgress, Role::Support));
    }

    #[test]
    fn super_admin_sees_everything() {
        let m = VisibilityMatrix::default();
        for t in AlertType::ALL {
            assert!(m.can_see(t, Role::SuperAdmin), "super_admin should see {t}");
        }
    }

    #[test]
    fn missing_entry_is_invisible() {
        let m = VisibilityMatrix::new(BTreeMap::new());
        assert!(!m.can_see(AlertType::PickWinner, Role::SuperAdmin));
        assert!(!m.any_visible(&AlertType::ALL, Role::Admin));
    }

    #[test]
    fn matrix_round_trips_through_json_keys() {
        let json = r#"{"health_critical": ["super_admin"]}"#;
        let m: VisibilityMatrix = serde_json::from_str(json).unwrap();
        assert!(m.can_see(AlertType::HealthCritical, Role::SuperAdmin));
        assert!(!m.can_see(AlertType::HealthCritical, Role::Admin));
    }
}
