//! Caller identity as supplied by the external identity provider.
//!
//! The engine performs no authentication. It trusts the resolved
//! `(user_id, role, is_admin)` and only enforces the admin gate.

use crate::{
    error::{AlertError, AlertResult},
    role::Role,
    types::UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: &str, role: Role, is_admin: bool) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
            is_admin,
        }
    }

    /// Shorthand for an admin-flagged identity with the given role.
    pub fn admin(user_id: &str, role: Role) -> Self {
        Self::new(user_id, role, true)
    }

    pub fn require_admin(&self) -> AlertResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AlertError::Forbidden {
                role: self.role.to_string(),
            })
        }
    }
}

/// Resolves an opaque credential (session id, bearer token) to a caller.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, credential: &str) -> Option<Identity>;
}

/// A fixed credential table. Used by the console runner and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticIdentityProvider {
    credentials: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, credential: &str, identity: Identity) -> Self {
        self.credentials.insert(credential.to_string(), identity);
        self
    }

    /// Load `{data_dir}/identities.json`: an object of credential -> identity.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/identities.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn resolve(&self, credential: &str) -> Option<Identity> {
        self.credentials.get(credential).cloned()
    }
}
