mod catalog;
mod error;
mod queue;
mod service;

pub use catalog::ToneCatalog;
pub use error::DraftError;
pub use queue::DraftQueue;
pub use service::DraftService;
