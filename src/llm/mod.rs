//! LLM chat plumbing.

pub mod chat;

pub use chat::{ChatApi, ChatConversation, ChatMessage, OpenAiChat};
