use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("storage error: {0}")]
    Storage(#[from] buddy_storage::StorageError),
    #[error("{0}")]
    Ai(#[from] buddy_ai::AiError),
}
