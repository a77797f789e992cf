use crate::DraftError;
use buddy_core::{default_tone_profiles, ToneProfile, ToneProfileFields};
use buddy_storage::Storage;
use chrono::Utc;

/// The persisted set of tone profiles.
#[derive(Clone)]
pub struct ToneCatalog {
    storage: Storage,
}

impl ToneCatalog {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All profiles in storage order. An empty catalog is seeded with the
    /// built-in presets first.
    pub async fn list(&self) -> Result<Vec<ToneProfile>, DraftError> {
        let profiles = self.storage.load_tone_profiles().await?;
        if profiles.is_empty() {
            return self.seed_defaults().await;
        }
        Ok(profiles)
    }

    pub async fn get(&self, id: &str) -> Result<Option<ToneProfile>, DraftError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|profile| profile.id == id))
    }

    /// Resolves by id, then by case-insensitive name.
    pub async fn find(&self, id_or_name: &str) -> Result<Option<ToneProfile>, DraftError> {
        let profiles = self.list().await?;
        if let Some(profile) = profiles.iter().find(|profile| profile.id == id_or_name) {
            return Ok(Some(profile.clone()));
        }

        let needle = id_or_name.trim();
        Ok(profiles
            .into_iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(needle)))
    }

    pub async fn create(&self, fields: ToneProfileFields) -> Result<ToneProfile, DraftError> {
        let mut profiles = self.list().await?;
        let profile = ToneProfile::from_fields(fields, Utc::now());
        profiles.push(profile.clone());
        self.storage.save_tone_profiles(&profiles).await?;

        tracing::info!(id = %profile.id, name = %profile.name, "created tone profile");
        Ok(profile)
    }

    /// Returns `None` without touching storage when `id` is unknown.
    pub async fn update(
        &self,
        id: &str,
        fields: ToneProfileFields,
    ) -> Result<Option<ToneProfile>, DraftError> {
        let mut profiles = self.storage.load_tone_profiles().await?;
        let Some(profile) = profiles.iter_mut().find(|profile| profile.id == id) else {
            tracing::debug!(%id, "update skipped, tone profile not found");
            return Ok(None);
        };

        profile.apply(fields, Utc::now());
        let updated = profile.clone();
        self.storage.save_tone_profiles(&profiles).await?;
        Ok(Some(updated))
    }

    /// Returns whether a profile was removed. Drafts referencing it keep the
    /// dangling id.
    pub async fn delete(&self, id: &str) -> Result<bool, DraftError> {
        let mut profiles = self.storage.load_tone_profiles().await?;
        let before = profiles.len();
        profiles.retain(|profile| profile.id != id);
        if profiles.len() == before {
            return Ok(false);
        }

        self.storage.save_tone_profiles(&profiles).await?;
        tracing::info!(%id, "deleted tone profile");
        Ok(true)
    }

    pub async fn seed_defaults(&self) -> Result<Vec<ToneProfile>, DraftError> {
        let now = Utc::now();
        let profiles: Vec<ToneProfile> = default_tone_profiles()
            .into_iter()
            .map(|fields| ToneProfile::from_fields(fields, now))
            .collect();
        self.storage.save_tone_profiles(&profiles).await?;

        tracing::info!(count = profiles.len(), "seeded default tone profiles");
        Ok(profiles)
    }
}
