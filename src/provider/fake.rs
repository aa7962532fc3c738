//! Fake provider for offline use and tests.
//!
//! Returns deterministic recommendations derived from the inputs and records
//! every call so tests can assert on what the wizard sent.

use super::{ProviderError, RecommendationProvider};
use crate::model::FoodRecommendation;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Arguments of one provider call, in the order they were passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub mood: String,
    pub meal_type: String,
    pub cuisines: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeProvider {
    calls: Mutex<Vec<RecordedCall>>,
    fail_with: Option<ProviderError>,
    delay: Option<Duration>,
}

#[cfg(test)]
impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `err`.
    pub fn failing(err: ProviderError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    /// Delay each answer, to keep a request in flight during tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

fn canned(mood: &str, meal_type: &str, cuisines: &[String]) -> Vec<FoodRecommendation> {
    let style = cuisines
        .first()
        .map(String::as_str)
        .unwrap_or("House");
    vec![
        FoodRecommendation {
            name: format!("{style} {meal_type} Bowl"),
            description: format!("A generous {} bowl built around seasonal produce.", meal_type.to_lowercase()),
            reason: format!("Easy to share and easy to love when you feel {}.", mood.to_lowercase()),
        },
        FoodRecommendation {
            name: format!("{mood} {meal_type} Plate"),
            description: "A simple plate with a bright sauce and something crunchy.".to_string(),
            reason: format!("Balanced flavors that suit a {} mood.", mood.to_lowercase()),
        },
        FoodRecommendation {
            name: format!("Chef's {meal_type} Surprise"),
            description: "Whatever is freshest today, cooked with care.".to_string(),
            reason: "A little novelty never hurts.".to_string(),
        },
    ]
}

#[async_trait]
impl RecommendationProvider for FakeProvider {
    async fn fetch_recommendations(
        &self,
        mood: &str,
        meal_type: &str,
        cuisines: &[String],
    ) -> Result<Vec<FoodRecommendation>, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                mood: mood.to_string(),
                meal_type: meal_type.to_string(),
                cuisines: cuisines.to_vec(),
            });
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(canned(mood, meal_type, cuisines)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let provider = FakeProvider::new();
        provider
            .fetch_recommendations("Happy", "Dinner", &["Italian".into(), "Spicy".into()])
            .await
            .unwrap();
        assert_eq!(
            provider.calls(),
            vec![RecordedCall {
                mood: "Happy".into(),
                meal_type: "Dinner".into(),
                cuisines: vec!["Italian".into(), "Spicy".into()],
            }]
        );
    }

    #[tokio::test]
    async fn canned_names_are_unique() {
        let provider = FakeProvider::new();
        let recs = provider
            .fetch_recommendations("Relaxed", "Lunch", &[])
            .await
            .unwrap();
        let mut names: Vec<_> = recs.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), recs.len());
    }

    #[tokio::test]
    async fn failing_provider_returns_error() {
        let provider = FakeProvider::failing(ProviderError::Request("rate limited".into()));
        let err = provider
            .fetch_recommendations("Sad", "Snack", &[])
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Request("rate limited".into()));
        assert_eq!(provider.calls().len(), 1);
    }
}
