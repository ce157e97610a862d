//! Read access to the handles a user has registered per platform.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::model::Platform;

/// A user's handle on each platform. An empty string means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformHandles {
    #[serde(rename = "leetCode", alias = "leetcode")]
    pub leetcode: String,
    pub codeforces: String,
    pub codechef: String,
    #[serde(rename = "geeksForGeeks", alias = "gfg")]
    pub gfg: String,
}

impl PlatformHandles {
    pub fn get(&self, platform: Platform) -> &str {
        match platform {
            Platform::Codeforces => &self.codeforces,
            Platform::CodeChef => &self.codechef,
            Platform::LeetCode => &self.leetcode,
            Platform::Gfg => &self.gfg,
        }
    }

    /// Overwrite each handle that is non-empty in `update`; keep the rest.
    pub fn merge(&mut self, update: PlatformHandles) {
        let keep_or_replace = |current: &mut String, incoming: String| {
            if !incoming.trim().is_empty() {
                *current = incoming;
            }
        };
        keep_or_replace(&mut self.codeforces, update.codeforces);
        keep_or_replace(&mut self.codechef, update.codechef);
        keep_or_replace(&mut self.leetcode, update.leetcode);
        keep_or_replace(&mut self.gfg, update.gfg);
    }
}

/// Resolves a user id to that user's handles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_handles(&self, user_id: &str) -> Result<PlatformHandles>;
}

/// A [`ProfileStore`] held in memory.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    users: RwLock<HashMap<String, PlatformHandles>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: impl Into<String>, handles: PlatformHandles) -> Result<()> {
        self.users
            .write()
            .map_err(|_| StatsError::ProfileStore("lock poisoned".to_string()))?
            .insert(user_id.into(), handles);
        Ok(())
    }

    /// Merge `update` into an existing user's handles and return the result.
    pub fn update_handles(&self, user_id: &str, update: PlatformHandles) -> Result<PlatformHandles> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StatsError::ProfileStore("lock poisoned".to_string()))?;
        let handles = users
            .get_mut(user_id)
            .ok_or_else(|| StatsError::UserNotFound {
                user_id: user_id.to_string(),
            })?;
        handles.merge(update);
        Ok(handles.clone())
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_handles(&self, user_id: &str) -> Result<PlatformHandles> {
        self.users
            .read()
            .map_err(|_| StatsError::ProfileStore("lock poisoned".to_string()))?
            .get(user_id)
            .cloned()
            .ok_or_else(|| StatsError::UserNotFound {
                user_id: user_id.to_string(),
            })
    }
}
