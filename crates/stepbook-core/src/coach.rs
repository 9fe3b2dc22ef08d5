//! Coach boundary: remote text generation for session tips and
//! period summaries.
//!
//! The aggregation engine never depends on these results. Failures do
//! not surface to callers: a missing credential or an unreachable
//! service degrades to a fixed, displayable fallback string.

use crate::PracticeRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the text-generation API key
pub const API_KEY_ENV: &str = "STEPBOOK_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Advisory shown when no credential is configured
pub const MISSING_KEY_MESSAGE: &str =
    "API key is missing. Set STEPBOOK_API_KEY to enable the dance coach.";
/// Fallback when the tip request fails
pub const TIP_FALLBACK: &str = "Could not connect to the digital dance coach right now.";
/// Fallback when the summary request fails
pub const SUMMARY_FALLBACK: &str = "Analysis unavailable.";

const TIP_DEFAULT: &str = "Keep dancing! You're doing great.";
const SUMMARY_DEFAULT: &str = "Great job keeping up with your practice!";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the remote coaching service
pub struct Coach {
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl Coach {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a coach using the key from the environment, if any
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Short encouragement for a single session. Always returns a
    /// displayable string.
    pub fn session_tip(&self, record: &PracticeRecord) -> String {
        let Some(key) = self.api_key.as_deref() else {
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.generate(key, &session_prompt(record)) {
            Ok(Some(text)) => text,
            Ok(None) => TIP_DEFAULT.to_string(),
            Err(e) => {
                warn!("Coach tip request failed: {e}");
                TIP_FALLBACK.to_string()
            }
        }
    }

    /// Short progress summary for a set of sessions in a period.
    /// Always returns a displayable string.
    pub fn period_summary(&self, records: &[PracticeRecord], period: &str) -> String {
        let Some(key) = self.api_key.as_deref() else {
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.generate(key, &period_prompt(records, period)) {
            Ok(Some(text)) => text,
            Ok(None) => SUMMARY_DEFAULT.to_string(),
            Err(e) => {
                warn!("Coach summary request failed: {e}");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    fn generate(&self, key: &str, prompt: &str) -> reqwest::Result<Option<String>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()?
            .error_for_status()?;

        let parsed: GenerateResponse = response.json()?;
        let text = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(text)
    }
}

fn session_prompt(record: &PracticeRecord) -> String {
    format!(
        "You are an encouraging and insightful dance coach.\n\
         Analyze this practice session:\n\
         Style: {}\n\
         Duration: {} minutes\n\
         Difficulty: {}\n\
         Mood: {}\n\
         Notes: \"{}\"\n\n\
         Give a short, friendly, 2-sentence tip or encouragement based on the mood and notes.",
        record.style,
        record.duration_minutes,
        record.difficulty.as_str(),
        record.mood.as_str(),
        record.notes,
    )
}

fn period_prompt(records: &[PracticeRecord], period: &str) -> String {
    let summary: Vec<String> = records
        .iter()
        .map(|r| format!("- {} ({}m): {}", r.style, r.duration_minutes, r.mood.as_str()))
        .collect();

    format!(
        "You are a dance analyst.\n\
         Here is a summary of the user's dance sessions for {}:\n{}\n\n\
         Provide a brief 3-sentence summary of their progress and consistency. \
         Identify any trends in style or mood.",
        period,
        summary.join("\n"),
    )
}
