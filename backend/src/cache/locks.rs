//! Per-artifact regeneration locks.
//!
//! Locks are created lazily on first use and never removed; the key space is
//! bounded by the number of seasons and weeks served.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::key::ArtifactKey;

/// Granularity of regeneration locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockScope {
    /// One lock per artifact identity.
    #[default]
    Artifact,
    /// One lock per artifact kind. Serializes regeneration of unrelated
    /// seasons and weeks of the same kind.
    Kind,
}

impl FromStr for LockScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "artifact" => Ok(Self::Artifact),
            "kind" => Ok(Self::Kind),
            other => Err(format!("Unknown lock scope: {}", other)),
        }
    }
}

/// Registry mapping lock keys to async mutexes.
#[derive(Debug, Default)]
pub struct LockRegistry {
    scope: LockScope,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl LockRegistry {
    pub fn new(scope: LockScope) -> Self {
        Self {
            scope,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn scope(&self) -> LockScope {
        self.scope
    }

    /// Name of the lock guarding `key` under this registry's scope.
    pub fn lock_name(&self, key: &ArtifactKey) -> String {
        match self.scope {
            LockScope::Artifact => key.storage_name(),
            LockScope::Kind => key.kind.as_str().to_string(),
        }
    }

    /// The mutex guarding `key`, created on first request.
    pub fn lock_for(&self, key: &ArtifactKey) -> Arc<AsyncMutex<()>> {
        let name = self.lock_name(key);
        Arc::clone(self.locks.lock().entry(name).or_default())
    }

    /// Wait for exclusive regeneration rights on `key`.
    pub async fn acquire(&self, key: &ArtifactKey) -> OwnedMutexGuard<()> {
        self.lock_for(key).lock_owned().await
    }

    /// Number of locks created so far.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
