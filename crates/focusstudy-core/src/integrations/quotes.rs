//! Motivational quote fetching.
//!
//! A thin client for the Gemini `generateContent` endpoint, constrained
//! to return a `{text, author}` JSON object. The public surface never
//! errors: any transport, parse, or credential failure resolves to the
//! deterministic per-category fallback pair, and the failure is logged
//! for diagnostics only.
//!
//! Fetches are fire-and-forget from the timer's point of view. The
//! [`QuoteBoard`] hands out a monotonic token per issued fetch and only
//! applies the resolution carrying the latest token, so a slow response
//! from an earlier session can never overwrite a newer one.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::keyring_store;
use crate::error::QuoteError;
use crate::timer::SessionType;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Keyring entry holding the Gemini API key. `GEMINI_API_KEY` in the
/// environment takes precedence.
pub const API_KEY_ENTRY: &str = "gemini_api_key";

const WORK_INSTRUCTION: &str = "Generate a short, deeply motivational quote for someone \
     beginning or finishing a deep focus session. Focus on discipline, presence, or the \
     beauty of the craft.";
const BREAK_INSTRUCTION: &str = "Generate a short, beautiful creative mindfulness prompt \
     or a gentle affirmation for someone taking a restorative break. Focus on breathing, \
     nature, or internal peace.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    /// The quote shown before the first fetch resolves.
    pub fn initial() -> Self {
        Self {
            text: "Patience and focus are the dual wings of progress.".into(),
            author: "FocusStudy".into(),
        }
    }
}

/// Which instruction template and fallback pair a fetch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCategory {
    Work,
    Break,
}

impl From<SessionType> for QuoteCategory {
    fn from(session: SessionType) -> Self {
        if session.is_work() {
            QuoteCategory::Work
        } else {
            QuoteCategory::Break
        }
    }
}

impl QuoteCategory {
    fn instruction(self) -> &'static str {
        match self {
            QuoteCategory::Work => WORK_INSTRUCTION,
            QuoteCategory::Break => BREAK_INSTRUCTION,
        }
    }

    /// The deterministic fallback pair for this category.
    pub fn fallback(self) -> Quote {
        let text = match self {
            QuoteCategory::Work => "Focus is the art of knowing what to ignore.",
            QuoteCategory::Break => "Rest is the foundation of every great achievement.",
        };
        Quote {
            text: text.into(),
            author: "FocusStudy".into(),
        }
    }
}

/// Client for the Gemini text-generation endpoint.
pub struct GeminiQuoteClient {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiQuoteClient {
    /// Resolve the credential from the environment or the OS keyring.
    /// A missing credential is not an error; fetches just fall back.
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| keyring_store::get(API_KEY_ENTRY).ok().flatten());
        Self::build(api_key)
    }

    /// Client with an explicit key (tests, embedding).
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self::build(Some(api_key.into()))
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch a quote for the given category. Never errors: every failure
    /// mode resolves to [`QuoteCategory::fallback`].
    pub async fn fetch(&self, category: QuoteCategory) -> Quote {
        match self.try_fetch(category).await {
            Ok(quote) => quote,
            Err(e) => {
                log::debug!("quote fetch failed, using fallback: {e}");
                category.fallback()
            }
        }
    }

    async fn try_fetch(&self, category: QuoteCategory) -> Result<Quote, QuoteError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(QuoteError::MissingCredential)?;

        let url = format!(
            "{}/v1beta/models/{MODEL}:generateContent",
            self.base_url.trim_end_matches('/')
        );
        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("{} Keep it under 15 words.", category.instruction()) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "author": { "type": "STRING" }
                    },
                    "required": ["text", "author"]
                }
            }
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateContentResponse = resp.json().await?;
        let payload = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| QuoteError::MalformedResponse("no candidate text".into()))?;

        let quote: Quote = serde_json::from_str(&payload)?;
        if quote.text.is_empty() {
            return Err(QuoteError::MalformedResponse("empty quote text".into()));
        }
        Ok(quote)
    }
}

impl Default for GeminiQuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Latest-fetch-wins resolution of overlapping quote requests.
///
/// `begin` issues a monotonically increasing token; `resolve` applies a
/// result only when it carries the most recently issued token. A stale
/// resolution is dropped and leaves the loading flag owned by the newer
/// request.
#[derive(Debug)]
pub struct QuoteBoard {
    seq: u64,
    current: Quote,
    loading: bool,
}

impl Default for QuoteBoard {
    fn default() -> Self {
        Self {
            seq: 0,
            current: Quote::initial(),
            loading: false,
        }
    }
}

impl QuoteBoard {
    /// Register a newly issued fetch and return its token.
    pub fn begin(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.seq
    }

    /// Apply a fetched quote if its token is still the latest.
    /// Returns whether the quote was applied.
    pub fn resolve(&mut self, token: u64, quote: Quote) -> bool {
        if token != self.seq {
            return false;
        }
        self.current = quote;
        self.loading = false;
        true
    }

    pub fn current(&self) -> &Quote {
        &self.current
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
