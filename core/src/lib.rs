//! Operational alert engine for the admin console.
//!
//! Alerts are never stored. Every feed request recomputes them from live
//! tables through the collectors, removes the ones an admin has dismissed,
//! and orders the rest by severity. The only durable state owned here is
//! the dismissal table and its audit trail.

pub mod alert;
pub mod assembler;
pub mod calendar;
pub mod campaign_progress_collector;
pub mod collector;
pub mod config;
pub mod dismissal;
pub mod engine;
pub mod error;
pub mod finance;
pub mod financial_health_collector;
pub mod identity;
pub mod payout_queue_collector;
pub mod permission;
pub mod prize_pipeline_collector;
pub mod prize_setup_collector;
pub mod role;
pub mod severity;
pub mod store;
pub mod transport;
pub mod types;
