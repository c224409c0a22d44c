// src/feedback.rs
use crate::analytics::SeriesPoint;
use crate::config::FeedbackConfig;
use crate::models::ValidationError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Shown instead of feedback whenever the provider fails.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I couldn't get feedback at this time. Please try again later.";
/// Fewer points than this make no trend.
pub const MIN_DATA_POINTS: usize = 2;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Feedback request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Feedback service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Feedback service returned no text")]
    EmptyResponse,
}

/// Turns an exercise's progress series into coaching text.
pub trait FeedbackProvider {
    fn analyze(
        &self,
        exercise_name: &str,
        series: &[SeriesPoint],
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

#[must_use]
pub fn build_prompt(exercise_name: &str, series: &[SeriesPoint]) -> String {
    let history = series
        .iter()
        .map(|p| {
            format!(
                "On {}: Max Weight: {}kg, Max Reps: {}, Total Volume: {}kg",
                p.date, p.max_weight, p.max_reps, p.total_volume
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful and encouraging fitness coach. Analyze the user's workout progress \
         for the exercise \"{exercise_name}\".\n\
         Provide brief, actionable feedback.\n\
         - Comment on their consistency and progression in weight and reps.\n\
         - Identify any potential plateaus.\n\
         - Suggest one or two tips for improvement (e.g., varying rep ranges, improving form, \
         or a nutrition tip).\n\
         - Keep the tone positive and motivating.\n\
         - The response should be concise, around 3-4 short paragraphs.\n\n\
         Here is the user's data:\n{history}"
    )
}

/// Asks `provider` about the series. Too few points is a validation
/// error; provider failures are logged and turned into [`FALLBACK_MESSAGE`].
pub async fn request_feedback<P: FeedbackProvider>(
    provider: &P,
    exercise_name: &str,
    series: &[SeriesPoint],
) -> Result<String, ValidationError> {
    if series.len() < MIN_DATA_POINTS {
        return Err(ValidationError::NotEnoughData {
            needed: MIN_DATA_POINTS,
            found: series.len(),
        });
    }
    match provider.analyze(exercise_name, series).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Feedback for '{}' unavailable: {}", exercise_name, e);
            Ok(FALLBACK_MESSAGE.to_string())
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    http_client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Reads the API key from the environment variable named in `config`.
    pub fn from_config(config: &FeedbackConfig) -> Result<Self, ServiceError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ServiceError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &FeedbackConfig, api_key: String) -> Result<Self, ServiceError> {
        let http_client = Client::builder()
            .user_agent(format!("trackme/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ServiceError::Client)?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = self.url();
        info!("Requesting feedback from {} ({} chars)", url, prompt.len());

        let body = GenerateRequest {
            contents: [Content {
                parts: [TextPart { text: prompt }],
            }],
        };
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            error!("Feedback request failed with status: {}. Body: {}", status, body);
            return Err(ServiceError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed.text().ok_or(ServiceError::EmptyResponse)?;
        debug!("Received {} chars of feedback", text.len());
        Ok(text)
    }
}

impl FeedbackProvider for GeminiClient {
    fn analyze(
        &self,
        exercise_name: &str,
        series: &[SeriesPoint],
    ) -> impl Future<Output = Result<String, ServiceError>> + Send {
        let prompt = build_prompt(exercise_name, series);
        async move { self.generate(&prompt).await }
    }
}
