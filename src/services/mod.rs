pub mod dataset_store;
pub mod llm_service;

pub use dataset_store::{DatasetStore, HttpDatasetStore, MemoryDatasetStore};
pub use llm_service::{LanguageModel, LlmService};
