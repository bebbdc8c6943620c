//! State storage implementation
//!
//! This module keeps conversation contexts in memory, keyed by user id,
//! with expiration and periodic cleanup. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{validation::MAX_TTL_SECONDS, StateConfig};
use super::context::{ConversationContext, Stage};

/// In-memory state storage shared between handlers
#[derive(Clone)]
pub struct StateStorage {
    contexts: Arc<RwLock<HashMap<i64, ConversationContext>>>,
    ttl: chrono::Duration,
}

impl StateStorage {
    /// Create a new state storage instance
    pub fn new(config: &StateConfig) -> Self {
        Self {
            contexts: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl_from_seconds(config.ttl_seconds),
        }
    }

    /// Save conversation context, refreshing its expiry
    pub async fn save_context(&self, context: &ConversationContext) {
        let mut stored = context.clone();
        stored.extend_expiry(self.ttl);

        debug!(user_id = context.user_id, stage = %context.stage, "Saving context");
        self.contexts.write().await.insert(context.user_id, stored);
    }

    /// Load conversation context; expired contexts are removed and reported as absent
    pub async fn load_context(&self, user_id: i64) -> Option<ConversationContext> {
        let context = self.contexts.read().await.get(&user_id).cloned();

        match context {
            Some(context) if context.is_expired() => {
                warn!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
                self.delete_context(user_id).await;
                None
            }
            Some(context) => {
                debug!(user_id = user_id, stage = %context.stage, "Context loaded");
                Some(context)
            }
            None => {
                debug!(user_id = user_id, "No context found");
                None
            }
        }
    }

    /// Delete conversation context
    pub async fn delete_context(&self, user_id: i64) {
        if self.contexts.write().await.remove(&user_id).is_some() {
            debug!("Deleted context for user {}", user_id);
        } else {
            debug!("No context to delete for user {}", user_id);
        }
    }

    /// Check if context exists for a user
    pub async fn context_exists(&self, user_id: i64) -> bool {
        self.contexts.read().await.contains_key(&user_id)
    }

    /// Users that currently have a stored context
    pub async fn active_users(&self) -> Vec<i64> {
        self.contexts.read().await.keys().copied().collect()
    }

    /// Clean up expired contexts
    pub async fn cleanup_expired_contexts(&self) -> usize {
        let now = chrono::Utc::now();
        let mut contexts = self.contexts.write().await;
        let before = contexts.len();
        contexts.retain(|_, context| !context.is_expired_at(now));
        let cleaned_count = before - contexts.len();

        if cleaned_count > 0 {
            info!("Cleaned up {} expired contexts", cleaned_count);
        }

        cleaned_count
    }

    /// Get storage statistics
    pub async fn stats(&self) -> StorageStats {
        let now = chrono::Utc::now();
        let contexts = self.contexts.read().await;

        let mut expired_contexts = 0;
        let mut stages_count = HashMap::new();
        for context in contexts.values() {
            if context.is_expired_at(now) {
                expired_contexts += 1;
            } else {
                *stages_count.entry(context.stage).or_insert(0) += 1;
            }
        }

        StorageStats {
            total_contexts: contexts.len(),
            active_contexts: contexts.len() - expired_contexts,
            expired_contexts,
            stages_count,
        }
    }
}

/// Conversation TTL, capped at the longest value configuration accepts
fn ttl_from_seconds(seconds: u64) -> chrono::Duration {
    let capped = seconds.min(MAX_TTL_SECONDS);
    i64::try_from(capped)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::days(365))
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub total_contexts: usize,
    pub active_contexts: usize,
    pub expired_contexts: usize,
    pub stages_count: HashMap<Stage, u32>,
}

/// State storage manager with automatic cleanup
#[derive(Debug)]
pub struct StateStorageManager {
    storage: StateStorage,
    cleanup_interval: Duration,
    cleanup_handle: Option<tokio::task::JoinHandle<()>>,
}

impl StateStorageManager {
    /// Create a new state storage manager with automatic cleanup
    pub fn new(config: &StateConfig) -> Self {
        Self {
            storage: StateStorage::new(config),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_seconds),
            cleanup_handle: None,
        }
    }

    /// Start automatic cleanup task
    pub fn start_cleanup(&mut self) {
        if self.cleanup_handle.is_some() {
            warn!("Cleanup task is already running");
            return;
        }

        let storage = self.storage.clone();
        let interval = self.cleanup_interval;

        let handle = tokio::spawn(async move {
            let mut cleanup_interval = tokio::time::interval(interval);

            loop {
                cleanup_interval.tick().await;

                let count = storage.cleanup_expired_contexts().await;
                if count > 0 {
                    info!("Cleanup task removed {} expired contexts", count);
                }
            }
        });

        self.cleanup_handle = Some(handle);
        info!("Started automatic cleanup task with interval {:?}", self.cleanup_interval);
    }

    /// Stop automatic cleanup task
    pub fn stop_cleanup(&mut self) {
        if let Some(handle) = self.cleanup_handle.take() {
            handle.abort();
            info!("Stopped automatic cleanup task");
        }
    }

    /// Get reference to the storage
    pub fn storage(&self) -> &StateStorage {
        &self.storage
    }
}

impl Drop for StateStorageManager {
    fn drop(&mut self) {
        self.stop_cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::Field;

    fn create_test_config() -> StateConfig {
        StateConfig {
            ttl_seconds: 3600,
            cleanup_interval_seconds: 60,
        }
    }

    #[tokio::test]
    async fn test_context_save_load() {
        let storage = StateStorage::new(&create_test_config());

        let mut context = ConversationContext::new(123);
        context.set_field(Field::Category, "Электромонтаж");
        context.advance_to(Stage::AwaitingName);

        storage.save_context(&context).await;

        let loaded = storage.load_context(123).await.expect("context should be stored");
        assert_eq!(loaded.user_id, 123);
        assert_eq!(loaded.stage, Stage::AwaitingName);
        assert_eq!(loaded.field(Field::Category), Some("Электромонтаж"));
        assert!(loaded.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_contexts_are_isolated_per_user() {
        let storage = StateStorage::new(&create_test_config());

        let mut first = ConversationContext::new(1);
        first.advance_to(Stage::AwaitingPhone);
        storage.save_context(&first).await;
        storage.save_context(&ConversationContext::new(2)).await;

        assert_eq!(storage.load_context(1).await.unwrap().stage, Stage::AwaitingPhone);
        assert_eq!(storage.load_context(2).await.unwrap().stage, Stage::AwaitingCategory);

        let mut users = storage.active_users().await;
        users.sort();
        assert_eq!(users, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_context_expiry() {
        let storage = StateStorage::new(&create_test_config());
        storage.save_context(&ConversationContext::new(456)).await;

        // Expire the stored copy directly; save_context always refreshes expiry
        storage
            .contexts
            .write()
            .await
            .get_mut(&456)
            .unwrap()
            .set_expiry(chrono::Utc::now() - chrono::Duration::hours(1));

        assert!(storage.load_context(456).await.is_none());
        assert!(!storage.context_exists(456).await);
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_capped() {
        for ttl_seconds in [10_000_000_000_000_000, u64::MAX] {
            let storage = StateStorage::new(&StateConfig {
                ttl_seconds,
                cleanup_interval_seconds: 60,
            });
            assert_eq!(storage.ttl, chrono::Duration::days(365));

            storage.save_context(&ConversationContext::new(7)).await;
            assert!(storage.load_context(7).await.is_some());
        }
    }

    #[tokio::test]
    async fn test_context_deletion() {
        let storage = StateStorage::new(&create_test_config());
        storage.save_context(&ConversationContext::new(789)).await;

        assert!(storage.context_exists(789).await);
        storage.delete_context(789).await;
        assert!(!storage.context_exists(789).await);
    }

    #[tokio::test]
    async fn test_cleanup_and_stats() {
        let storage = StateStorage::new(&create_test_config());
        storage.save_context(&ConversationContext::new(1)).await;
        storage.save_context(&ConversationContext::new(2)).await;
        storage
            .contexts
            .write()
            .await
            .get_mut(&2)
            .unwrap()
            .set_expiry(chrono::Utc::now() - chrono::Duration::minutes(5));

        let stats = storage.stats().await;
        assert_eq!(stats.total_contexts, 2);
        assert_eq!(stats.expired_contexts, 1);
        assert_eq!(stats.stages_count.get(&Stage::AwaitingCategory), Some(&1));

        assert_eq!(storage.cleanup_expired_contexts().await, 1);
        assert_eq!(storage.active_users().await, vec![1]);
    }

    #[tokio::test]
    async fn test_manager_cleanup_lifecycle() {
        let mut manager = StateStorageManager::new(&create_test_config());
        manager.start_cleanup();
        manager.start_cleanup();
        manager.storage().save_context(&ConversationContext::new(5)).await;
        assert!(manager.storage().context_exists(5).await);
        manager.stop_cleanup();
    }
}
