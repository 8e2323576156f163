//! Alert assembler: merge, suppress, order, count.
//!
//! A pure function of (collector output, dismissal snapshot, role). The
//! same inputs always yield the same ordered feed.

use crate::{
    alert::{AlertCandidate, AlertFeed, SeverityCounts},
    dismissal::DismissalSet,
    permission::VisibilityMatrix,
    role::Role,
    severity::Severity,
};

/// `batches` must be in collector registration order. Candidates the role
/// may not see or that are dismissed are dropped; the rest are stably
/// sorted by severity rank, so ties keep emission order.
pub fn assemble(
    batches: Vec<Vec<AlertCandidate>>,
    dismissed: &DismissalSet,
    visibility: &VisibilityMatrix,
    role: Role,
) -> AlertFeed {
    let mut alerts: Vec<AlertCandidate> = batches
        .into_iter()
        .flatten()
        .filter(|a| visibility.can_see(a.alert_type, role))
        .filter(|a| {
            let (alert_type, key) = a.identity();
            !dismissed.contains(alert_type, key)
        })
        .collect();

    alerts.sort_by_key(|a| a.severity.rank());

    let mut counts = SeverityCounts::default();
    for a in &alerts {
        match a.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => {}
        }
    }

    AlertFeed {
        count: alerts.len(),
        alerts,
        count_by_severity: counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertType;
    use chrono::{DateTime, Utc};

    fn candidate(alert_type: AlertType, key: &str, severity: Severity) -> AlertCandidate {
        AlertCandidate {
            alert_type,
            key: key.into(),
            severity,
            icon: String::new(),
            title: key.into(),
            description: String::new(),
            action: String::new(),
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn orders_by_severity_regardless_of_emission() {
        let batches = vec![
            vec![candidate(AlertType::PayoutQueue, "pending", Severity::Medium)],
            vec![candidate(AlertType::PrizeSetup, "slots_2026-10-25", Severity::High)],
            vec![candidate(AlertType::PickWinner, "slots_2026-10-11", Severity::Critical)],
        ];
        let feed = assemble(
            batches,
            &DismissalSet::default(),
            &VisibilityMatrix::default(),
            Role::Admin,
        );
        let order: Vec<Severity> = feed.alerts.iter().map(|a| a.severity).collect();
        assert_eq!(order, vec![Severity::Critical, Severity::High, Severity::Medium]);
        assert_eq!(feed.count, 3);
        assert_eq!(
            feed.count_by_severity,
            SeverityCounts { critical: 1, high: 1, medium: 1 }
        );
    }

    #[test]
    fn ties_keep_emission_order() {
        let batches = vec![
            vec![
                candidate(AlertType::CampaignProgress, "c2_warning", Severity::Medium),
                candidate(AlertType::CampaignProgress, "c1_critical", Severity::Critical),
            ],
            vec![candidate(AlertType::CampaignProgress, "c3_warning", Severity::Medium)],
        ];
        let feed = assemble(
            batches,
            &DismissalSet::default(),
            &VisibilityMatrix::default(),
            Role::Support,
        );
        let keys: Vec<&str> = feed.alerts.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["c1_critical", "c2_warning", "c3_warning"]);
    }

    #[test]
    fn dismissed_and_invisible_are_dropped() {
        let batches = vec![vec![
            candidate(AlertType::HealthCritical, "current", Severity::Critical),
            candidate(AlertType::NotifyWinner, "p1", Severity::High),
            candidate(AlertType::NotifyWinner, "p2", Severity::High),
        ]];
        let dismissed: DismissalSet =
            [("notify_winner".to_string(), "p1".to_string())].into_iter().collect();
        let feed = assemble(batches, &dismissed, &VisibilityMatrix::default(), Role::Support);
        let keys: Vec<&str> = feed.alerts.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["p2"]);
        assert_eq!(feed.count_by_severity.critical, 0);
    }
}
