//! Recommendation provider abstraction.
//!
//! The wizard treats the generative-AI service as an opaque collaborator: given a
//! mood, a meal type and a list of cuisines it returns recommendation records or
//! fails with a message. Implementations live behind [`RecommendationProvider`].

mod fake;
mod gemini;

pub use fake::FakeProvider;
pub use gemini::GeminiProvider;

use crate::model::{FoodRecommendation, ProviderKind, RunConfig};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Request(String),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Failed to parse recommendations: {0}")]
    Parse(String),

    #[error("Rate limited by the recommendation service, try again shortly")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Failure that carries no usable description.
    #[error("unspecified provider failure")]
    Unspecified,
}

impl ProviderError {
    /// Message suitable for showing to the user, or `None` when the failure
    /// has nothing descriptive to say.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ProviderError::Unspecified => None,
            ProviderError::Api { status, message } if message.trim().is_empty() => Some(format!(
                "The recommendation service returned HTTP {status}"
            )),
            other => {
                let msg = other.to_string();
                if msg.trim().is_empty() {
                    None
                } else {
                    Some(msg)
                }
            }
        }
    }
}

/// Source of food recommendations.
///
/// Implementations must be thread-safe; a call resolves exactly once, either
/// with a list (possibly empty) or with an error.
#[async_trait]
pub trait RecommendationProvider: Send + Sync + fmt::Debug {
    async fn fetch_recommendations(
        &self,
        mood: &str,
        meal_type: &str,
        cuisines: &[String],
    ) -> Result<Vec<FoodRecommendation>, ProviderError>;

    /// Provider name (e.g. "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Build the provider selected in the run config.
pub fn create_provider(cfg: &RunConfig) -> Result<Arc<dyn RecommendationProvider>, ProviderError> {
    match cfg.provider {
        ProviderKind::Fake => Ok(Arc::new(FakeProvider::default())),
        ProviderKind::Gemini => {
            let api_key = cfg
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    ProviderError::NotConfigured(
                        "GEMINI_API_KEY not set (pass --api-key or use --provider fake)".into(),
                    )
                })?;
            Ok(Arc::new(GeminiProvider::new(cfg, api_key.to_string())?))
        }
    }
}
