mod round;
mod score;
mod session;

pub use session::SessionSnapshot;

use crate::llm::{LlmConfig, LlmProvider};
use crate::pack::PackStore;
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only application resources.
///
/// Sessions are not stored here: each connection owns its own `Session`, so
/// nothing mutable is shared between players.
#[derive(Clone)]
pub struct AppState {
    pub packs: PackStore,
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub llm_timeout: Duration,
    /// Optional model override for verdict requests
    pub verdict_model: Option<String>,
}

impl AppState {
    pub fn new(packs: PackStore) -> Self {
        Self {
            packs,
            llm: None,
            llm_timeout: LlmConfig::default().timeout,
            verdict_model: None,
        }
    }

    /// Build state from config, leaving AI features off if no provider works
    pub fn new_with_llm(packs: PackStore, llm_config: &LlmConfig) -> Self {
        let llm = match llm_config.build_provider() {
            Ok(provider) => {
                tracing::info!("LLM provider '{}' initialized", provider.name());
                Some(provider)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize LLM provider: {}. AI answers will not be available.",
                    e
                );
                None
            }
        };
        Self {
            packs,
            llm,
            llm_timeout: llm_config.timeout,
            verdict_model: llm_config.verdict_model.clone(),
        }
    }

    pub fn with_provider(packs: PackStore, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            packs,
            llm: Some(provider),
            llm_timeout: LlmConfig::default().timeout,
            verdict_model: None,
        }
    }
}
