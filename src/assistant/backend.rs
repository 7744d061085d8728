//! The hosted-AI boundary: one opaque `send(history, input) → text` call.
//!
//! The production client speaks the Gemini `generateContent` API; tests use
//! the scripted backend. UI code never constructs an HTTP client directly —
//! it goes through the [`ChatBackend`] trait.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::chat::{ChatMessage, ChatRole};

use super::persona::SYSTEM_INSTRUCTION;

/// Model requested from the hosted API.
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The backend could not produce a reply; the session shows the
    /// fallback bubble instead of surfacing this.
    #[error("Assistant backend unavailable: {0}")]
    Unavailable(String),
    #[error("An exchange is already in flight")]
    Busy,
    #[error("Message must not be empty")]
    EmptyInput,
    #[error("No API key configured (set {0})")]
    MissingApiKey(&'static str),
}

pub trait ChatBackend: Send + Sync {
    /// One request/response round trip: prior conversation plus the latest
    /// user utterance, plain reply text back.
    fn send(&self, history: &[ChatMessage], input: &str) -> Result<String, ChatError>;
}

// ═══════════════════════════════════════════════════════════
// Gemini client
// ═══════════════════════════════════════════════════════════

pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChatError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChatError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    /// Build from `WARDLINE_AI_API_KEY` (+ optional base-url override).
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = std::env::var(config::AI_API_KEY_ENV)
            .map_err(|_| ChatError::MissingApiKey(config::AI_API_KEY_ENV))?;
        let base_url =
            std::env::var(config::AI_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&base_url, &api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
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

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl ChatBackend for GeminiClient {
    fn send(&self, history: &[ChatMessage], input: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: Some(match m.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                }),
                parts: vec![Part { text: &m.text }],
            })
            .collect();
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part { text: input }],
        });

        let body = GenerateContentRequest {
            contents,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ChatError::Unavailable(format!("cannot reach {}", self.base_url))
            } else if e.is_timeout() {
                ChatError::Unavailable(format!("timed out after {REQUEST_TIMEOUT_SECS}s"))
            } else {
                ChatError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Unavailable(format!("HTTP {status}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| ChatError::Unavailable(format!("bad response: {e}")))?;

        let reply = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ChatError::Unavailable("empty reply".into()));
        }
        Ok(reply)
    }
}

/// Stands in when no API key is configured. Every send fails, so the
/// session shows its fallback bubble instead of a broken screen.
pub struct OfflineBackend;

impl ChatBackend for OfflineBackend {
    fn send(&self, _history: &[ChatMessage], _input: &str) -> Result<String, ChatError> {
        Err(ChatError::Unavailable("no hosted AI configured".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Scripted backend (tests)
// ═══════════════════════════════════════════════════════════

/// Returns a fixed reply, or always fails, and remembers what it saw.
pub struct ScriptedBackend {
    reply: Option<String>,
    seen: std::sync::Mutex<Vec<(usize, String)>>,
}

impl ScriptedBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// (history length, input) pairs for every call received.
    pub fn seen(&self) -> Vec<(usize, String)> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ChatBackend for ScriptedBackend {
    fn send(&self, history: &[ChatMessage], input: &str) -> Result<String, ChatError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((history.len(), input.to_string()));
        }
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ChatError::Unavailable("scripted failure".into())),
        }
    }
}
