//! Fake AI client for testing.
//!
//! Returns scripted responses per prompt name, so pipeline tests run without
//! network access or API costs.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::client::AiClient;
use super::types::{ChatRequest, ChatResponse, Usage};
use crate::error::InferenceError;

type Scripted = Result<String, InferenceError>;

/// A request the fake received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt_name: String,
    pub prompt_version: String,
    pub request: ChatRequest,
}

/// A fake AI client.
///
/// Each prompt name has a script of answers consumed in order; the last
/// answer repeats once the others are used up. Prompts with no script get the
/// default response, or an error if none is set.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    default_response: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful answer for `prompt_name`.
    pub fn with_response(self, prompt_name: &str, content: impl Into<String>) -> Self {
        self.push(prompt_name, Ok(content.into()));
        self
    }

    /// Queue a failure for `prompt_name`.
    pub fn with_error(self, prompt_name: &str, error: InferenceError) -> Self {
        self.push(prompt_name, Err(error));
        self
    }

    /// Set the answer for prompts that have no script.
    pub fn with_default_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = Some(content.into());
        self
    }

    /// Queue an answer on a client that is already shared.
    pub fn push_response(&self, prompt_name: &str, content: impl Into<String>) {
        self.push(prompt_name, Ok(content.into()));
    }

    pub fn push_error(&self, prompt_name: &str, error: InferenceError) {
        self.push(prompt_name, Err(error));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many times `prompt_name` was called.
    pub fn call_count(&self, prompt_name: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.prompt_name == prompt_name)
            .count()
    }

    fn push(&self, prompt_name: &str, answer: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(prompt_name.to_string())
            .or_default()
            .push_back(answer);
    }

    fn next_answer(&self, prompt_name: &str) -> Scripted {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(prompt_name) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap(),
            Some(script) if !script.is_empty() => script[0].clone(),
            _ => self.default_response.clone().ok_or_else(|| {
                InferenceError::Transport(format!(
                    "FakeAiClient: no response configured for prompt {}",
                    prompt_name
                ))
            }),
        }
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        prompt_version: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, InferenceError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            prompt_name: prompt_name.to_string(),
            prompt_version: prompt_version.to_string(),
            request,
        });

        let content = self.next_answer(prompt_name)?;
        Ok(ChatResponse {
            content,
            usage: Usage::default(),
            cached: false,
        })
    }
}
