use crate::DraftError;
use buddy_core::{DraftStatus, EmailDraft};
use buddy_storage::Storage;
use chrono::Utc;

/// Every generated draft and its review state.
///
/// Each mutation reloads the full collection, changes it and writes it back.
#[derive(Clone)]
pub struct DraftQueue {
    storage: Storage,
}

impl DraftQueue {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<EmailDraft>, DraftError> {
        Ok(self.storage.load_drafts().await?)
    }

    pub async fn list_by_status(&self, status: DraftStatus) -> Result<Vec<EmailDraft>, DraftError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|draft| draft.status == status)
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<EmailDraft>, DraftError> {
        Ok(self.list().await?.into_iter().find(|draft| draft.id == id))
    }

    pub async fn append(&self, drafts: &[EmailDraft]) -> Result<(), DraftError> {
        let mut all = self.list().await?;
        all.extend_from_slice(drafts);
        self.storage.save_drafts(&all).await?;
        Ok(())
    }

    pub async fn approve(&self, id: &str) -> Result<Option<EmailDraft>, DraftError> {
        self.set_status(id, DraftStatus::Approved).await
    }

    pub async fn discard(&self, id: &str) -> Result<Option<EmailDraft>, DraftError> {
        self.set_status(id, DraftStatus::Discarded).await
    }

    /// Content stays editable after approval or discard; status is untouched.
    pub async fn edit_content(
        &self,
        id: &str,
        content: &str,
    ) -> Result<Option<EmailDraft>, DraftError> {
        self.modify(id, |draft| {
            if draft.status != DraftStatus::Pending {
                tracing::debug!(id = %draft.id, status = %draft.status, "editing reviewed draft");
            }
            draft.draft_content = content.to_string();
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DraftError> {
        let mut drafts = self.list().await?;
        let before = drafts.len();
        drafts.retain(|draft| draft.id != id);
        if drafts.len() == before {
            return Ok(false);
        }

        self.storage.save_drafts(&drafts).await?;
        tracing::info!(%id, "deleted draft");
        Ok(true)
    }

    async fn set_status(
        &self,
        id: &str,
        status: DraftStatus,
    ) -> Result<Option<EmailDraft>, DraftError> {
        let updated = self.modify(id, |draft| draft.status = status).await?;
        if updated.is_some() {
            tracing::info!(%id, %status, "draft reviewed");
        }
        Ok(updated)
    }

    /// Applies `change` to the draft with `id` and refreshes `updated_at`.
    /// Unknown ids leave storage untouched.
    async fn modify<F>(&self, id: &str, change: F) -> Result<Option<EmailDraft>, DraftError>
    where
        F: FnOnce(&mut EmailDraft),
    {
        let mut drafts = self.list().await?;
        let Some(draft) = drafts.iter_mut().find(|draft| draft.id == id) else {
            tracing::debug!(%id, "draft not found");
            return Ok(None);
        };

        change(&mut *draft);
        draft.updated_at = Utc::now();
        let updated = draft.clone();
        self.storage.save_drafts(&drafts).await?;
        Ok(Some(updated))
    }
}
