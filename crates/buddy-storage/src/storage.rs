use crate::{KeyValueStore, StorageError};
use buddy_core::{EmailDraft, ToneProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    ToneProfiles,
    Drafts,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToneProfiles => f.write_str("tone_profiles"),
            Self::Drafts => f.write_str("drafts"),
        }
    }
}

/// The fixed key each collection is persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub tone_profiles: String,
    pub drafts: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            tone_profiles: "email_draft_buddy_tone_profiles".to_string(),
            drafts: "email_draft_buddy_drafts".to_string(),
        }
    }
}

/// A persisted value that was dropped on load because it did not parse.
#[derive(Debug, Clone)]
pub struct DiscardedValue {
    pub collection: Collection,
    pub key: String,
    pub reason: String,
}

pub type CorruptionHook = Arc<dyn Fn(&DiscardedValue) + Send + Sync>;

/// Whole-collection persistence over a [`KeyValueStore`].
///
/// Loads are fail-open: a missing key and an unparseable value both come back
/// as an empty collection. Saves overwrite the full collection, last writer
/// wins.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    on_corruption: Option<CorruptionHook>,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            on_corruption: None,
        }
    }

    /// Observes values that `load` silently replaces with an empty collection.
    pub fn with_corruption_hook(mut self, hook: CorruptionHook) -> Self {
        self.on_corruption = Some(hook);
        self
    }

    pub fn key(&self, collection: Collection) -> &str {
        match collection {
            Collection::ToneProfiles => &self.keys.tone_profiles,
            Collection::Drafts => &self.keys.drafts,
        }
    }

    pub async fn load<T>(&self, collection: Collection) -> Result<Vec<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let key = self.key(collection);
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                let discarded = DiscardedValue {
                    collection,
                    key: key.to_string(),
                    reason: err.to_string(),
                };
                tracing::warn!(
                    %collection,
                    key = %discarded.key,
                    reason = %discarded.reason,
                    "discarding unreadable persisted collection"
                );
                if let Some(hook) = &self.on_corruption {
                    hook(&discarded);
                }
                Ok(Vec::new())
            }
        }
    }

    pub async fn save<T>(&self, collection: Collection, records: &[T]) -> Result<(), StorageError>
    where
        T: Serialize,
    {
        let raw = serde_json::to_string(records)?;
        self.store.put(self.key(collection), &raw).await?;
        tracing::debug!(%collection, count = records.len(), "saved collection");
        Ok(())
    }

    pub async fn load_tone_profiles(&self) -> Result<Vec<ToneProfile>, StorageError> {
        self.load(Collection::ToneProfiles).await
    }

    pub async fn save_tone_profiles(&self, profiles: &[ToneProfile]) -> Result<(), StorageError> {
        self.save(Collection::ToneProfiles, profiles).await
    }

    pub async fn load_drafts(&self) -> Result<Vec<EmailDraft>, StorageError> {
        self.load(Collection::Drafts).await
    }

    pub async fn save_drafts(&self, drafts: &[EmailDraft]) -> Result<(), StorageError> {
        self.save(Collection::Drafts, drafts).await
    }
}
