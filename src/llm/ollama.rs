//! Ollama completion backend built on Rig.

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::{AssistantContent, Message};
use rig::providers::ollama;

use crate::chat::config::LlmConfig;
use crate::chat::message::{ChatMessage, MessageRole};
use crate::llm::{BackendError, BackendResult, CompletionBackend, InvokeFuture};

/// Completion backend targeting an Ollama endpoint.
///
/// Construction builds the HTTP client and is the fatal gate for bad
/// endpoint configuration; each [`CompletionBackend::invoke`] call issues
/// exactly one completion request.
pub struct OllamaBackend {
    model: ollama::CompletionModel,
    temperature: f64,
    max_tokens: Option<u64>,
}

impl OllamaBackend {
    /// Build a backend from completion model settings.
    ///
    /// # Errors
    /// Returns an error if the Ollama client cannot be built.
    pub fn new(llm: &LlmConfig) -> BackendResult<Self> {
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(rig::client::Nothing);
        let builder = if let Some(base_url) = &llm.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build().map_err(BackendError::from)?;
        let model = client.completion_model(llm.model.clone());
        Ok(Self {
            model,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
        })
    }
}

impl CompletionBackend for OllamaBackend {
    fn invoke(&self, history: Vec<ChatMessage>) -> InvokeFuture<'_, BackendResult<String>> {
        Box::pin(async move {
            let converted = convert_history(history)?;

            let request = self
                .model
                .completion_request(converted.prompt)
                .messages(converted.messages)
                .temperature(self.temperature)
                .max_tokens_opt(self.max_tokens);
            let request = if let Some(preamble) = converted.preamble {
                request.preamble(preamble)
            } else {
                request
            };

            let response = self.model.completion(request.build()).await?;
            let text = extract_text(&response.choice);
            if text.is_empty() {
                return Err(BackendError::EmptyCompletion);
            }
            Ok(text)
        })
    }
}

/// History rewritten into Rig's wire shapes.
#[derive(Debug)]
struct ConvertedHistory {
    /// System turns folded together, in order.
    preamble: Option<String>,
    /// Prior user and assistant turns, in order.
    messages: Vec<Message>,
    /// The final user turn, sent as the prompt.
    prompt: Message,
}

/// Total mapping from stored roles to provider message shapes.
///
/// The final element must be a user turn; it becomes the prompt and the
/// provider appends it after the chat history.
fn convert_history(mut history: Vec<ChatMessage>) -> BackendResult<ConvertedHistory> {
    let prompt = match history.pop() {
        Some(message) if message.role == MessageRole::User => Message::user(message.content),
        Some(message) => {
            return Err(BackendError::History(format!(
                "history must end with a user turn, got {}",
                message.role
            )));
        }
        None => return Err(BackendError::History("history is empty".to_string())),
    };

    let mut preamble_parts = Vec::new();
    let mut messages = Vec::with_capacity(history.len());
    for message in history {
        match message.role {
            MessageRole::User => messages.push(Message::user(message.content)),
            MessageRole::Assistant => messages.push(Message::assistant(message.content)),
            MessageRole::System => preamble_parts.push(message.content),
        }
    }

    let preamble = if preamble_parts.is_empty() {
        None
    } else {
        Some(preamble_parts.join("\n\n"))
    };

    Ok(ConvertedHistory {
        preamble,
        messages,
        prompt,
    })
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_rejected() {
        let err = convert_history(Vec::new()).unwrap_err();
        assert!(matches!(err, BackendError::History(_)));
    }

    #[test]
    fn history_must_end_with_a_user_turn() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let err = convert_history(history).unwrap_err();
        match err {
            BackendError::History(reason) => assert!(reason.contains("assistant")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn turn_order_is_preserved() {
        let history = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
        ];
        let converted = convert_history(history).unwrap();

        assert!(converted.preamble.is_none());
        assert_eq!(converted.messages.len(), 2);
        assert!(matches!(converted.messages[0], Message::User { .. }));
        assert!(matches!(converted.messages[1], Message::Assistant { .. }));
        assert!(matches!(converted.prompt, Message::User { .. }));
    }

    #[test]
    fn system_turns_fold_into_the_preamble() {
        let history = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::system("answer in french"),
            ChatMessage::user("how are you?"),
        ];
        let converted = convert_history(history).unwrap();

        assert_eq!(
            converted.preamble.as_deref(),
            Some("be brief\n\nanswer in french")
        );
        assert_eq!(converted.messages.len(), 2);
    }
}
