//! Shared primitive types used across the alert engine.

use chrono::{DateTime, Utc};

/// A stable identifier for a site user or admin.
pub type UserId = String;

/// The deterministic per-type identity of an alert.
pub type AlertKey = String;

/// All instants inside the engine are UTC; local calendar math lives in
/// calendar.rs.
pub type Timestamp = DateTime<Utc>;
