use crate::{DraftError, DraftQueue, ToneCatalog};
use buddy_ai::{AiError, DraftGenerator};
use buddy_core::{EmailDraft, GenerationStage};
use buddy_storage::Storage;
use chrono::Utc;

/// Owns both persisted collections and is the only way callers change them.
#[derive(Clone)]
pub struct DraftService {
    catalog: ToneCatalog,
    queue: DraftQueue,
    generator: DraftGenerator,
}

impl DraftService {
    pub fn new(storage: Storage, generator: DraftGenerator) -> Self {
        Self {
            catalog: ToneCatalog::new(storage.clone()),
            queue: DraftQueue::new(storage),
            generator,
        }
    }

    pub fn catalog(&self) -> &ToneCatalog {
        &self.catalog
    }

    pub fn queue(&self) -> &DraftQueue {
        &self.queue
    }

    pub async fn connection_status(&self) -> bool {
        self.generator.probe().await
    }

    /// Generates one batch of three drafts and appends it to the queue.
    ///
    /// Nothing is persisted unless all three generation calls succeed. The
    /// last stage reported is always `Idle`, whether the batch succeeded or not.
    pub async fn generate_drafts<F>(
        &self,
        email_text: &str,
        tone_id: Option<&str>,
        mut on_stage: F,
    ) -> Result<Vec<EmailDraft>, DraftError>
    where
        F: FnMut(GenerationStage) + Send,
    {
        let result = self.run_batch(email_text, tone_id, &mut on_stage).await;
        on_stage(GenerationStage::Idle);
        result
    }

    async fn run_batch<F>(
        &self,
        email_text: &str,
        tone_id: Option<&str>,
        on_stage: &mut F,
    ) -> Result<Vec<EmailDraft>, DraftError>
    where
        F: FnMut(GenerationStage) + Send,
    {
        let tone = match tone_id {
            Some(id) => self.catalog.get(id).await?,
            None => None,
        };
        if tone.is_none() {
            if let Some(id) = tone_id {
                tracing::debug!(%id, "requested tone profile not found");
            }
        }

        let texts = self
            .generator
            .generate(email_text, tone.as_ref(), &mut *on_stage)
            .await?;
        let tone = tone.ok_or_else(|| {
            AiError::Validation("a tone profile must be selected".to_string())
        })?;

        on_stage(GenerationStage::Saving);
        let now = Utc::now();
        let drafts: Vec<EmailDraft> = texts
            .into_iter()
            .map(|text| EmailDraft::pending(email_text, &tone, text, now))
            .collect();
        self.queue.append(&drafts).await?;
        on_stage(GenerationStage::Complete);

        tracing::info!(tone = %tone.name, count = drafts.len(), "queued draft batch");
        Ok(drafts)
    }
}
