//! The chat session loop: LLM calls and tool execution.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use vitalchat_core::error::Error;
use vitalchat_core::message::{Conversation, Message, Role};
use vitalchat_core::provider::{Provider, ProviderRequest};
use vitalchat_core::tool::{Tool, ToolCall, ToolRegistry};

use crate::prompt::{self, DailySummary, PromptMode};

/// Orchestrates one conversation against a provider and a fixed tool set.
///
/// Tool registration is declarative: the constructor takes an explicit
/// ordered list, and that order is what the model sees. The session holds
/// no other state — tools are stateless and the health store behind them
/// is read-only, so nothing here needs locking.
pub struct ChatSession {
    /// The LLM backend
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// The registered tools, in listing order
    tools: ToolRegistry,

    /// Tool-use vs legacy data-dump prompting
    mode: PromptMode,

    /// Pre-fetched two-week data for legacy mode
    legacy_data: Vec<DailySummary>,

    /// Maximum tool call iterations per turn
    max_iterations: u32,
}

impl ChatSession {
    /// Create a tool-use session from an ordered tool list.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Vec<Box<dyn Tool>>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools: ToolRegistry::from_tools(tools),
            mode: PromptMode::ToolUse,
            legacy_data: Vec::new(),
            max_iterations: 10,
        }
    }

    /// Switch to legacy data-dump mode with pre-fetched daily summaries.
    /// No tool definitions are sent in this mode.
    pub fn with_legacy_data(mut self, data: Vec<DailySummary>) -> Self {
        self.mode = PromptMode::LegacyDump;
        self.legacy_data = data;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the maximum number of tool call iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    fn system_prompt(&self, today: NaiveDate) -> String {
        match self.mode {
            PromptMode::ToolUse => prompt::tool_use_instructions(today),
            PromptMode::LegacyDump => prompt::legacy_data_instructions(today, &self.legacy_data),
        }
    }

    /// Process a user turn and generate a response.
    ///
    /// 1. Seeds (or refreshes) the system prompt for the current mode
    /// 2. Calls the LLM with the tool definitions
    /// 3. Executes requested tool calls and loops with their results
    /// 4. Returns the final text response
    ///
    /// Tool failures become error text in the tool-result message so the
    /// model can recover; provider failures propagate to the caller.
    pub async fn process(&self, conversation: &mut Conversation) -> Result<String, Error> {
        let today = chrono::Local::now().date_naive();
        self.process_for_date(conversation, today).await
    }

    /// Same as [`ChatSession::process`] with an explicit `today`.
    pub async fn process_for_date(
        &self,
        conversation: &mut Conversation,
        today: NaiveDate,
    ) -> Result<String, Error> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing conversation"
        );

        let system = Message::system(self.system_prompt(today));
        if conversation.messages.first().map(|m| &m.role) == Some(&Role::System) {
            conversation.messages[0] = system;
        } else {
            conversation.messages.insert(0, system);
        }

        let tool_definitions = match self.mode {
            PromptMode::ToolUse => self.tools.definitions(),
            PromptMode::LegacyDump => Vec::new(),
        };
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.max_iterations {
                warn!(
                    conversation_id = %conversation.id,
                    iterations = iteration,
                    "Max tool iterations reached, stopping"
                );
                return Ok(
                    "I could not finish fetching data within the allowed number of tool calls. \
                     Please ask a narrower question."
                        .into(),
                );
            }

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if response.message.tool_calls.is_empty() {
                let text = response.message.content.clone();
                conversation.push(response.message);
                return Ok(text);
            }

            debug!(
                tool_count = response.message.tool_calls.len(),
                "Executing tool calls"
            );
            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            for tc in &tool_calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                match self.tools.execute(&call).await {
                    Ok(result) => {
                        conversation.push(Message::tool_result(&tc.id, &result.output));
                    }
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        conversation.push(Message::tool_result(&tc.id, format!("Error: {e}")));
                    }
                }
            }
            // Loop back — the model sees the tool results and decides.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vitalchat_core::error::ProviderError;
    use vitalchat_core::message::MessageToolCall;
    use vitalchat_core::provider::{ProviderResponse, Usage};
    use vitalchat_health::SyntheticStore;

    /// A mock provider that returns a sequence of scripted responses.
    struct SequentialMockProvider {
        responses: Mutex<Vec<ProviderResponse>>,
        call_count: Mutex<usize>,
        seen_tool_names: Mutex<Vec<Vec<String>>>,
    }

    impl SequentialMockProvider {
        fn new(responses: Vec<ProviderResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                call_count: Mutex::new(0),
                seen_tool_names: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Provider for SequentialMockProvider {
        fn name(&self) -> &str {
            "sequential_mock"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.seen_tool_names
                .lock()
                .unwrap()
                .push(request.tools.iter().map(|t| t.name.clone()).collect());

            let mut count = self.call_count.lock().unwrap();
            let responses = self.responses.lock().unwrap();
            assert!(
                *count < responses.len(),
                "mock provider ran out of responses"
            );
            let response = responses[*count].clone();
            *count += 1;
            Ok(response)
        }
    }

    fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        }
    }

    fn tool_call_response(name: &str, args: serde_json::Value) -> ProviderResponse {
        let mut msg = Message::assistant("");
        msg.tool_calls = vec![MessageToolCall {
            id: format!("call_{name}"),
            name: name.into(),
            arguments: args.to_string(),
        }];
        ProviderResponse {
            message: msg,
            usage: None,
            model: "mock-model".into(),
        }
    }

    fn health_tools() -> Vec<Box<dyn vitalchat_core::tool::Tool>> {
        let store: Arc<dyn vitalchat_core::store::HealthStore> =
            Arc::new(SyntheticStore::new(4));
        vec![
            Box::new(vitalchat_tools::AvailableMetricsTool),
            Box::new(vitalchat_tools::GetHealthMetricTool::new(Arc::clone(&store))),
            Box::new(vitalchat_tools::ComparePeriodsTool::new(store)),
        ]
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(SequentialMockProvider::new(vec![text_response(
            "You averaged 8,000 steps this week.",
        )]));
        let session = ChatSession::new(Arc::clone(&provider) as Arc<dyn Provider>, "mock-model", 0.7, health_tools());

        let mut conv = Conversation::new();
        conv.push(Message::user("How many steps did I take?"));

        let response = session.process(&mut conv).await.unwrap();
        assert_eq!(response, "You averaged 8,000 steps this week.");
        // System + User + Assistant
        assert_eq!(conv.messages.len(), 3);
    }

    #[tokio::test]
    async fn tool_call_roundtrip() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            tool_call_response(
                "get_health_metric",
                serde_json::json!({"metric": "steps", "days": "7"}),
            ),
            text_response("Here's your week of steps."),
        ]));
        let session = ChatSession::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "mock-model",
            0.7,
            health_tools(),
        );

        let mut conv = Conversation::new();
        conv.push(Message::user("Steps this week?"));

        let response = session.process(&mut conv).await.unwrap();
        assert_eq!(response, "Here's your week of steps.");
        assert_eq!(provider.call_count(), 2);

        // The tool result landed in the conversation before the final answer.
        let tool_msg = conv
            .messages
            .iter()
            .find(|m| m.role == Role::Tool)
            .expect("tool result message");
        assert!(tool_msg.content.contains("Steps for the last"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_text_not_failure() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            tool_call_response("get_blood_pressure", serde_json::json!({})),
            text_response("That metric is not available."),
        ]));
        let session = ChatSession::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "mock-model",
            0.7,
            health_tools(),
        );

        let mut conv = Conversation::new();
        conv.push(Message::user("Blood pressure?"));

        let response = session.process(&mut conv).await.unwrap();
        assert_eq!(response, "That metric is not available.");

        let tool_msg = conv.messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert!(tool_msg.content.starts_with("Error:"));
    }

    #[tokio::test]
    async fn tool_use_mode_sends_three_definitions() {
        let provider = Arc::new(SequentialMockProvider::new(vec![text_response("ok")]));
        let session = ChatSession::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "mock-model",
            0.7,
            health_tools(),
        );

        let mut conv = Conversation::new();
        conv.push(Message::user("hi"));
        session.process(&mut conv).await.unwrap();

        let seen = provider.seen_tool_names.lock().unwrap();
        assert_eq!(
            seen[0],
            vec!["get_available_metrics", "get_health_metric", "compare_periods"]
        );
    }

    #[tokio::test]
    async fn legacy_mode_sends_no_tools_and_embeds_data() {
        let provider = Arc::new(SequentialMockProvider::new(vec![text_response("ok")]));
        let today = chrono::Local::now().date_naive();
        let data: Vec<_> = (0..14u64)
            .map(|i| DailySummary {
                date: today - chrono::Days::new(13 - i),
                steps: Some(6000),
                ..Default::default()
            })
            .collect();
        let session = ChatSession::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "mock-model",
            0.7,
            health_tools(),
        )
        .with_legacy_data(data);

        let mut conv = Conversation::new();
        conv.push(Message::user("hi"));
        session.process(&mut conv).await.unwrap();

        let seen = provider.seen_tool_names.lock().unwrap();
        assert!(seen[0].is_empty());
        assert!(conv.messages[0].content.contains("6000 steps"));
    }

    #[tokio::test]
    async fn iteration_cap_stops_tool_loops() {
        // A provider that asks for the same tool forever.
        let responses: Vec<_> = (0..5)
            .map(|_| {
                tool_call_response("get_available_metrics", serde_json::json!({}))
            })
            .collect();
        let provider = Arc::new(SequentialMockProvider::new(responses));
        let session = ChatSession::new(
            Arc::clone(&provider) as Arc<dyn Provider>,
            "mock-model",
            0.7,
            health_tools(),
        )
        .with_max_iterations(3);

        let mut conv = Conversation::new();
        conv.push(Message::user("loop forever"));

        let response = session.process(&mut conv).await.unwrap();
        assert!(response.contains("narrower question"));
        assert_eq!(provider.call_count(), 3);
    }
}
