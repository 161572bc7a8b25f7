//! Summary Requester - categorized summaries from a chat-completion API
//!
//! Every call sends the full question list in one request. Nothing is cached
//! and nothing is retried; failures are handed back to the caller.

pub mod prompt;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for the external summarization service.
///
/// Holds the endpoint and model; the API key is passed per call and never kept.
#[derive(Debug, Clone)]
pub struct SummaryRequester {
    client: Client,
    base_url: String,
    model: String,
}

impl SummaryRequester {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::SummaryRequestFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Ask the model to group `questions` into categories.
    ///
    /// Returns the generated text unmodified. An empty key or an empty
    /// question list is rejected before any request goes out.
    pub async fn summarize(&self, api_key: &str, questions: &[String]) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingCredential);
        }
        if questions.is_empty() {
            return Err(Error::InvalidInput(
                "there are no questions to summarize".to_string(),
            ));
        }

        let user_prompt = prompt::user_prompt(questions);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        info!(
            "Requesting summary of {} question(s) with model {}",
            questions.len(),
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Summary request failed: {}", e);
                Error::SummaryRequestFailed(describe_transport_error(&e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::SummaryRequestFailed(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!("Summary service returned {}", status);
            return Err(Error::SummaryRequestFailed(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| Error::SummaryRequestFailed(format!("malformed response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::SummaryRequestFailed("response contained no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| Error::SummaryRequestFailed("response contained no content".to_string()))?;

        debug!("Received summary ({} chars)", content.len());
        Ok(content)
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("could not connect to summary service: {}", e)
    } else {
        e.to_string()
    }
}
