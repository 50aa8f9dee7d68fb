//! Chat service: question → filter → records → answer.
//!
//! DESIGN
//! ======
//! Two LLM calls per question. The first turns the question into a
//! MongoDB-style filter over the records store (deterministic, temperature
//! 0); the second phrases the matching records as a conversational answer.
//! Failures in either LLM call degrade to a canned reply instead of an
//! error; only a failing query surfaces as [`ChatServiceError`].

use std::fmt::Write;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{ChatParams, LlmError, Message};
use crate::records::{RecordError, RecordStore};

const QUERY_PARAMS: ChatParams = ChatParams { max_tokens: 512, temperature: 0.0 };
const ANSWER_PARAMS: ChatParams = ChatParams { max_tokens: 1024, temperature: 0.5 };

pub const GREETING_REPLY: &str =
    "Hello! I am an AI assistant for INGRES. How can I help you with the groundwater data?";
pub const NO_QUERY_REPLY: &str = "I'm sorry, I couldn't determine what to search for in the database. \
     Could you please ask a more specific question about the data?";
pub const ANSWER_FAILED_REPLY: &str = "I'm sorry, but I encountered an error while processing your request.";

const GREETINGS: [&str; 3] = ["hi", "hello", "hey"];

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("query failed: {0}")]
    QueryFailed(#[from] RecordError),
}

pub struct ChatService {
    llm: Arc<dyn LlmChat>,
    records: Arc<RecordStore>,
    schema: String,
    limit: usize,
}

impl ChatService {
    /// The schema description is computed once here and reused for every
    /// question.
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, records: Arc<RecordStore>, limit: usize) -> Self {
        let schema = records.schema_info();
        info!(records = records.len(), limit, "chat: service ready");
        Self { llm, records, schema, limit }
    }

    /// Answer one user question.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::QueryFailed`] if the generated filter
    /// cannot be executed against the records store.
    pub async fn reply(&self, message: &str) -> Result<String, ChatServiceError> {
        info!(user_message = message, "chat: message received");
        let filter = self.generate_query(message).await;

        if is_empty_filter(&filter) {
            info!("chat: empty query generated, replying directly");
            return Ok(direct_reply(message).to_string());
        }

        info!(%filter, "chat: generated query");
        let results = self.records.find(&filter, self.limit).inspect_err(|e| {
            warn!(error = %e, "chat: query execution failed");
        })?;
        info!(count = results.len(), "chat: query results");

        Ok(self.answer(message, &results).await)
    }

    /// Ask the LLM for a filter document. Any failure yields `{}`.
    async fn generate_query(&self, question: &str) -> Value {
        let system = build_query_prompt(&self.schema);
        let messages = [Message::user(question)];
        let response = match self.llm.chat(QUERY_PARAMS, &system, &messages).await {
            Ok(response) => response,
            Err(e) => {
                warn_llm_failure("query", &e);
                return empty_filter();
            }
        };
        match serde_json::from_str::<Value>(extract_json_block(&response.text)) {
            Ok(filter @ Value::Object(_)) => filter,
            Ok(other) => {
                warn!(%other, "chat: query is not a JSON object");
                empty_filter()
            }
            Err(e) => {
                warn!(error = %e, "chat: failed to decode query JSON");
                empty_filter()
            }
        }
    }

    async fn answer(&self, question: &str, results: &[Value]) -> String {
        let messages = [Message::user(build_answer_prompt(question, results))];
        match self.llm.chat(ANSWER_PARAMS, ANSWER_SYSTEM_PROMPT, &messages).await {
            Ok(response) => {
                info!(
                    model = %response.model,
                    stop_reason = %response.stop_reason,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "chat: answer generated"
                );
                response.text
            }
            Err(e) => {
                warn_llm_failure("answer", &e);
                ANSWER_FAILED_REPLY.to_string()
            }
        }
    }
}

fn warn_llm_failure(stage: &'static str, err: &LlmError) {
    match err.provider_body() {
        Some(body) => warn!(stage, error = %err, body, "chat: LLM call failed"),
        None => warn!(stage, error = %err, "chat: LLM call failed"),
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

const ANSWER_SYSTEM_PROMPT: &str = "You are an expert data analyst and a helpful virtual assistant. \
Answer the user's question using only the database results you are given.

INSTRUCTIONS:
1. Read the user's original question and the JSON results carefully.
2. If the results are empty, politely say that no information was found for the request.
3. Otherwise, summarize the results into a clear and direct answer.
4. For \"highest\" or \"lowest\" questions, name the winning record and state the district and value.
5. Never dump raw JSON; explain the results conversationally.";

/// System prompt for the question-to-filter step.
#[must_use]
pub fn build_query_prompt(schema: &str) -> String {
    let mut prompt = String::from(
        "You are a precise MongoDB query assistant. Convert the user's question into a MongoDB \
         find() filter object for the collection described below.\n\n",
    );
    let _ = writeln!(prompt, "DATABASE SCHEMA:\n{schema}\n");
    prompt.push_str(
        "INSTRUCTIONS:\n\
         1. Output a single valid JSON object and nothing else.\n\
         2. For text fields such as 'STATE' or 'DISTRICT', use `$regex` with `$options: \"i\"`. \
         Example: {\"STATE\": {\"$regex\": \"delhi\", \"$options\": \"i\"}}.\n\
         3. For numeric fields (names ending in '_mm_Total' or '_ham_Total'), use `$gt`, `$gte`, \
         `$lt` or `$lte` for \"more than\", \"less than\", \"at least\" and similar phrasing.\n\
         4. For list questions, filter on the parent category only.\n\
         5. If the question cannot be answered with a query, return an empty object {}.\n",
    );
    prompt
}

/// User message for the answer step: the question plus the matched records.
#[must_use]
pub fn build_answer_prompt(question: &str, results: &[Value]) -> String {
    let data = serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string());
    format!("User's Original Question: \"{question}\"\n\nData from Database:\n{data}")
}

/// Strip a ```` ```json ```` fence if the model wrapped its answer in one.
#[must_use]
pub fn extract_json_block(text: &str) -> &str {
    let Some((_, rest)) = text.split_once("```json") else {
        return text.trim();
    };
    rest.split("```").next().unwrap_or(rest).trim()
}

/// Reply used when no filter could be generated.
#[must_use]
pub fn direct_reply(message: &str) -> &'static str {
    if is_greeting(message) { GREETING_REPLY } else { NO_QUERY_REPLY }
}

/// Substring match: "which" counts as containing "hi".
#[must_use]
pub fn is_greeting(message: &str) -> bool {
    let lowered = message.to_lowercase();
    GREETINGS.iter().any(|g| lowered.contains(g))
}

fn empty_filter() -> Value {
    Value::Object(serde_json::Map::new())
}

fn is_empty_filter(filter: &Value) -> bool {
    filter.as_object().map_or(true, serde_json::Map::is_empty)
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
