//! Google Gemini provider.

use super::{ProviderError, RecommendationProvider};
use crate::model::{FoodRecommendation, RunConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Debug)]
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(cfg: &RunConfig, api_key: String) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout: cfg.timeout,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "Name of the dish." },
                "description": { "type": "STRING", "description": "A short, appetizing description." },
                "reason": { "type": "STRING", "description": "Why it suits the mood." }
            },
            "required": ["name", "description", "reason"]
        }
    })
}

/// Build the prompt sent to the model.
pub(crate) fn build_prompt(mood: &str, meal_type: &str, cuisines: &[String]) -> String {
    let preference = if cuisines.is_empty() {
        "They have no particular cuisine preference.".to_string()
    } else {
        format!("They would prefer something {}.", cuisines.join(", "))
    };
    format!(
        "Someone is feeling {mood} and wants {meal_type}. {preference} \
         Suggest 3 distinct dishes. For each dish give its name, a short appetizing \
         description, and the reason it matches a {mood} mood. \
         Respond with a JSON array of objects with the keys \"name\", \"description\" and \"reason\"."
    )
}

/// Parse the model's text output into recommendation records.
pub(crate) fn parse_recommendations(text: &str) -> Result<Vec<FoodRecommendation>, ProviderError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str::<Vec<FoodRecommendation>>(body)
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Map an HTTP status and body from `generateContent` to recommendations or a provider error.
pub(crate) fn map_response(
    status: u16,
    retry_after_secs: Option<u64>,
    body: &str,
) -> Result<Vec<FoodRecommendation>, ProviderError> {
    if status == 429 {
        return Err(ProviderError::RateLimited { retry_after_secs });
    }

    if !(200..300).contains(&status) {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => error_response.error.message,
            Err(_) => body.to_string(),
        };
        return Err(ProviderError::Api { status, message });
    }

    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| ProviderError::Parse("No text content in response".to_string()))?;

    parse_recommendations(&text)
}

#[async_trait]
impl RecommendationProvider for GeminiProvider {
    async fn fetch_recommendations(
        &self,
        mood: &str,
        meal_type: &str,
        cuisines: &[String],
    ) -> Result<Vec<FoodRecommendation>, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(mood, meal_type, cuisines)),
                }],
            }],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }),
        };

        tracing::debug!(model = %self.model, "calling Gemini generateContent");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Request(format!(
                        "The recommendation service did not answer within {}",
                        humantime::format_duration(self.timeout)
                    ))
                } else {
                    ProviderError::Request(format!("Could not reach the recommendation service: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = if status == 429 {
            String::new()
        } else {
            response
                .text()
                .await
                .map_err(|e| ProviderError::Request(e.to_string()))?
        };

        map_response(status, retry_after, &body)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_all_inputs() {
        let prompt = build_prompt("Happy", "Dinner", &["Italian".into(), "Spicy".into()]);
        assert!(prompt.contains("Happy"));
        assert!(prompt.contains("Dinner"));
        assert!(prompt.contains("Italian, Spicy"));

        let prompt = build_prompt("Sad", "Dessert", &[]);
        assert!(prompt.contains("no particular cuisine preference"));
    }

    #[test]
    fn parses_plain_and_fenced_arrays() {
        let raw = r#"[{"name":"Ramen","description":"Hot broth","reason":"Warming"}]"#;
        let recs = parse_recommendations(raw).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "Ramen");

        let fenced = format!("```json\n{raw}\n```");
        assert_eq!(parse_recommendations(&fenced).unwrap(), recs);
    }

    #[test]
    fn accepts_empty_list() {
        assert!(parse_recommendations("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_output() {
        let err = parse_recommendations("Here are some ideas: pizza").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
        let err = parse_recommendations(r#"[{"name":"Pie"}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn extracts_first_text_part() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[{\"name\":\"Ramen\",\"description\":\"Hot broth\",\"reason\":\"Warming\"}]"}]}}]}"#;
        let recs = map_response(200, None, body).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "Ramen");
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = map_response(429, Some(12), "").unwrap_err();
        assert_eq!(err, ProviderError::RateLimited { retry_after_secs: Some(12) });
        let err = map_response(429, None, "").unwrap_err();
        assert_eq!(err, ProviderError::RateLimited { retry_after_secs: None });
    }

    #[test]
    fn error_status_carries_upstream_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let err = map_response(400, None, body).unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 400,
                message: "API key not valid".into()
            }
        );
        assert_eq!(err.user_message().as_deref(), Some("API key not valid (HTTP 400)"));
    }

    #[test]
    fn error_status_with_plain_body_keeps_body() {
        let err = map_response(503, None, "Service Unavailable").unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 503,
                message: "Service Unavailable".into()
            }
        );
    }

    #[test]
    fn missing_text_is_parse_error() {
        let err = map_response(200, None, r#"{"candidates":[]}"#).unwrap_err();
        assert_eq!(err, ProviderError::Parse("No text content in response".into()));
        let err = map_response(200, None, r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap_err();
        assert_eq!(err, ProviderError::Parse("No text content in response".into()));
    }

    #[test]
    fn non_json_success_body_is_parse_error() {
        let err = map_response(200, None, "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
