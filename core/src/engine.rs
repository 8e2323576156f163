//! The alert engine: one core shared by every transport.
//!
//! FEED FLOW (per request, no state carried between requests):
//!   1. Caller must be an admin (403 otherwise).
//!   2. Permission gate drops collectors whose every type is invisible
//!      to the caller's role.
//!   3. The dismissal table is read once into a snapshot.
//!   4. Eligible collectors run, concurrently when configured.
//!   5. The assembler filters, orders and counts.
//!
//! COLLECTOR ORDER (fixed; it is the tie-break order in the feed):
//!   1. Prize pipeline
//!   2. Prize setup
//!   3. Financial health
//!   4. Payout queue
//!   5. Campaign progress
//!
//! A collector that fails outright is logged and contributes nothing;
//! the rest of the feed is still returned.

use crate::{
    alert::{AlertCandidate, AlertFeed},
    assembler,
    campaign_progress_collector::CampaignProgressCollector,
    collector::{AlertCollector, CollectContext},
    config::AlertConfig,
    dismissal::{self, DismissRequest, DismissResponse},
    error::{AlertError, AlertResult},
    financial_health_collector::FinancialHealthCollector,
    identity::Identity,
    payout_queue_collector::PayoutQueueCollector,
    prize_pipeline_collector::PrizePipelineCollector,
    prize_setup_collector::PrizeSetupCollector,
    role::Role,
    store::AlertStore,
    types::Timestamp,
};

pub struct AlertEngine {
    config: AlertConfig,
    store: AlertStore,
    collectors: Vec<Box<dyn AlertCollector>>,
}

impl AlertEngine {
    /// An engine with no collectors registered.
    pub fn new(config: AlertConfig, store: AlertStore) -> Self {
        Self {
            config,
            store,
            collectors: Vec::new(),
        }
    }

    /// Build a fully wired engine with every collector registered.
    pub fn build(config: AlertConfig, store: AlertStore) -> Self {
        let mut engine = AlertEngine::new(config, store);
        engine.register(Box::new(PrizePipelineCollector));
        engine.register(Box::new(PrizeSetupCollector));
        engine.register(Box::new(FinancialHealthCollector));
        engine.register(Box::new(PayoutQueueCollector));
        engine.register(Box::new(CampaignProgressCollector));
        engine
    }

    /// Register a collector. Call in the documented order.
    pub fn register(&mut self, collector: Box<dyn AlertCollector>) {
        self.collectors.push(collector);
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Compute the caller's alert feed as of `now`.
    pub fn feed(&self, caller: &Identity, now: Timestamp) -> AlertResult<AlertFeed> {
        caller.require_admin()?;

        let eligible: Vec<&dyn AlertCollector> = self
            .collectors
            .iter()
            .map(|c| &**c)
            .filter(|c| {
                let visible = self.config.visibility.any_visible(c.alert_types(), caller.role);
                if !visible {
                    log::debug!("collector {} gated out for role {}", c.name(), caller.role);
                }
                visible
            })
            .collect();

        let dismissed = self.store.dismissal_set()?;

        let batches = if self.config.parallel_collectors && eligible.len() > 1 {
            self.collect_parallel(&eligible, caller.role, now)
        } else {
            self.collect_serial(&eligible, caller.role, now)
        };

        let feed = assembler::assemble(batches, &dismissed, &self.config.visibility, caller.role);
        log::debug!(
            "feed for {} ({}): {} alerts, {} dismissed pairs on file",
            caller.user_id,
            caller.role,
            feed.count,
            dismissed.len()
        );
        Ok(feed)
    }

    /// Record a dismissal. Independent of feed computation.
    pub fn dismiss(
        &self,
        caller: &Identity,
        request: &DismissRequest,
        now: Timestamp,
    ) -> AlertResult<DismissResponse> {
        dismissal::dismiss(&self.store, caller, request, now)
    }

    fn collect_serial(
        &self,
        eligible: &[&dyn AlertCollector],
        role: Role,
        now: Timestamp,
    ) -> Vec<Vec<AlertCandidate>> {
        let ctx = CollectContext::new(now, role, &self.store, &self.config);
        eligible
            .iter()
            .map(|c| degrade(c.name(), c.collect(&ctx)))
            .collect()
    }

    /// Fan out one scoped thread per collector, each on its own
    /// connection, and fan in by registration order.
    fn collect_parallel(
        &self,
        eligible: &[&dyn AlertCollector],
        role: Role,
        now: Timestamp,
    ) -> Vec<Vec<AlertCandidate>> {
        let config = &self.config;
        let path = self.store.path();

        std::thread::scope(|scope| {
            let handles: Vec<_> = eligible
                .iter()
                .map(|&collector| {
                    scope.spawn(move || -> AlertResult<Vec<AlertCandidate>> {
                        let store = AlertStore::open(path)?;
                        let ctx = CollectContext::new(now, role, &store, config);
                        collector.collect(&ctx)
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(eligible)
                .map(|(handle, collector)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(AlertError::Other(anyhow::anyhow!("collector thread panicked")))
                    });
                    degrade(collector.name(), result)
                })
                .collect()
        })
    }
}

fn degrade(name: &str, result: AlertResult<Vec<AlertCandidate>>) -> Vec<AlertCandidate> {
    match result {
        Ok(alerts) => alerts,
        Err(e) => {
            log::error!("collector {name} failed, omitted from feed: {e}");
            Vec::new()
        }
    }
}
