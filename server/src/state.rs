//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The chat service is optional: when the LLM or the records store failed to
//! initialize at startup the server still runs and `/chat` reports the
//! missing backend instead.

use std::sync::Arc;

use crate::services::chat::ChatService;

#[derive(Clone, Default)]
pub struct AppState {
    pub chat: Option<Arc<ChatService>>,
}

impl AppState {
    #[must_use]
    pub fn new(chat: Option<ChatService>) -> Self {
        Self { chat: chat.map(Arc::new) }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use super::AppState;
    use crate::llm::LlmChat;
    use crate::llm::types::{ChatParams, ChatResponse, LlmError, Message};
    use crate::records::RecordStore;
    use crate::services::chat::ChatService;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes every test that reads or writes process environment
    /// variables, across all modules.
    pub fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns scripted texts in order, then `"done"`.
    pub struct ScriptedLlm {
        responses: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl LlmChat for ScriptedLlm {
        async fn chat(&self, _params: ChatParams, _system: &str, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
            let mut responses = self.responses.lock().unwrap();
            let text = if responses.is_empty() { "done".to_string() } else { responses.remove(0) };
            Ok(ChatResponse {
                text,
                model: "mock".into(),
                stop_reason: "end_turn".into(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    pub fn sample_store() -> RecordStore {
        let (store, _) = RecordStore::parse_jsonl(
            r#"{"STATE": "Delhi", "DISTRICT": "New Delhi", "Rainfall_mm_Total": 612.4}
{"STATE": "Goa", "DISTRICT": "North Goa", "Rainfall_mm_Total": 3005}"#,
        );
        store
    }

    /// App state whose LLM replies with `responses` in order.
    pub fn scripted_state(responses: &[&str]) -> AppState {
        let llm = Arc::new(ScriptedLlm { responses: Mutex::new(responses.iter().map(ToString::to_string).collect()) });
        AppState::new(Some(ChatService::new(llm, Arc::new(sample_store()), 20)))
    }
}
