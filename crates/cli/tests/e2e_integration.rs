//! End-to-end integration tests for the VitalChat assistant.
//!
//! These exercise the full pipeline from user question to final answer:
//! session loop, tool dispatch, the data access layer, and the synthetic
//! health store — with a scripted provider standing in for the LLM.

use std::sync::Arc;

use vitalchat_agent::{ChatSession, DailySummary};
use vitalchat_core::error::ProviderError;
use vitalchat_core::message::{Conversation, Message, MessageToolCall, Role};
use vitalchat_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use vitalchat_core::store::HealthStore;
use vitalchat_core::tool::Tool;
use vitalchat_health::SyntheticStore;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence.
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<ProviderResponse>>,
    call_count: std::sync::Mutex<usize>,
}

impl ScriptedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        assert!(*count < responses.len(), "scripted provider exhausted");
        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 50,
            completion_tokens: 10,
            total_tokens: 60,
        }),
        model: "mock".into(),
    }
}

fn tool_response(calls: Vec<MessageToolCall>) -> ProviderResponse {
    let mut msg = Message::assistant("");
    msg.tool_calls = calls;
    ProviderResponse {
        message: msg,
        usage: None,
        model: "mock".into(),
    }
}

fn tool_call(id: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: id.into(),
        name: name.into(),
        arguments: args.to_string(),
    }
}

fn tools_for(store: &Arc<SyntheticStore>) -> Vec<Box<dyn Tool>> {
    let store: Arc<dyn HealthStore> = Arc::clone(store) as Arc<dyn HealthStore>;
    vec![
        Box::new(vitalchat_tools::AvailableMetricsTool),
        Box::new(vitalchat_tools::GetHealthMetricTool::new(Arc::clone(&store))),
        Box::new(vitalchat_tools::ComparePeriodsTool::new(store)),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn question_with_single_tool_call() {
    let store = Arc::new(SyntheticStore::new(1));
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            "get_health_metric",
            serde_json::json!({"metric": "sleep", "days": "7"}),
        )]),
        text_response("You averaged about 7 hours of sleep this week."),
    ]));

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    );

    let mut conv = Conversation::new();
    conv.push(Message::user("How did I sleep this week?"));

    let answer = session.process(&mut conv).await.unwrap();
    assert!(answer.contains("sleep"));
    assert_eq!(provider.calls(), 2);

    // Sleep went through the interval path only.
    assert_eq!(store.aggregate_queries(), 0);
    assert!(store.interval_queries() >= 7);

    // Conversation: system, user, assistant(tool call), tool result, answer.
    assert_eq!(conv.messages.len(), 5);
    let tool_msg = &conv.messages[3];
    assert_eq!(tool_msg.role, Role::Tool);
    assert!(tool_msg.content.contains("Sleep for the last 7 days:"));
    assert!(tool_msg.content.contains("hours"));
}

#[tokio::test]
async fn parallel_tool_calls_in_one_turn() {
    let store = Arc::new(SyntheticStore::new(2));
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![
            tool_call(
                "call_a",
                "get_health_metric",
                serde_json::json!({"metric": "steps", "days": "7"}),
            ),
            tool_call(
                "call_b",
                "compare_periods",
                serde_json::json!({
                    "metric": "steps",
                    "period1Start": 7, "period1End": 0,
                    "period2Start": 14, "period2End": 7,
                }),
            ),
        ]),
        text_response("Steps are up versus last week."),
    ]));

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    );

    let mut conv = Conversation::new();
    conv.push(Message::user("Am I walking more than last week?"));

    let answer = session.process(&mut conv).await.unwrap();
    assert!(answer.contains("Steps"));

    // Both results landed, matched to their call ids.
    let tool_results: Vec<_> = conv
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .collect();
    assert_eq!(tool_results.len(), 2);
    assert_eq!(tool_results[0].tool_call_id.as_deref(), Some("call_a"));
    assert_eq!(tool_results[1].tool_call_id.as_deref(), Some("call_b"));
    assert!(tool_results[1].content.contains("comparison"));
}

#[tokio::test]
async fn model_discovers_metrics_then_fetches() {
    let store = Arc::new(SyntheticStore::new(3));
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            "get_available_metrics",
            serde_json::json!({}),
        )]),
        tool_response(vec![tool_call(
            "call_2",
            "get_health_metric",
            serde_json::json!({"metric": "restingHeartRate", "days": "30"}),
        )]),
        text_response("Your resting heart rate has been steady."),
    ]));

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    );

    let mut conv = Conversation::new();
    conv.push(Message::user("What's my heart doing lately?"));

    let answer = session.process(&mut conv).await.unwrap();
    assert!(answer.contains("steady"));
    assert_eq!(provider.calls(), 3);

    let listing = conv
        .messages
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    assert!(listing.content.contains("restingHeartRate"));
    assert!(listing.content.contains("sleep"));
}

#[tokio::test]
async fn garbled_arguments_still_produce_an_answer() {
    // Unknown metric falls back to steps; unparseable days falls back to 7.
    let store = Arc::new(SyntheticStore::new(4));
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            "get_health_metric",
            serde_json::json!({"metric": "stepz", "days": "many"}),
        )]),
        text_response("Here are your steps."),
    ]));

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    );

    let mut conv = Conversation::new();
    conv.push(Message::user("stepz??"));

    let answer = session.process(&mut conv).await.unwrap();
    assert_eq!(answer, "Here are your steps.");

    let tool_msg = conv.messages.iter().find(|m| m.role == Role::Tool).unwrap();
    assert!(tool_msg.content.contains("Steps for the last 7 days:"));
}

#[tokio::test]
async fn failing_store_surfaces_error_text_to_the_model() {
    let store = Arc::new(SyntheticStore::failing());
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![tool_call(
            "call_1",
            "get_health_metric",
            serde_json::json!({"metric": "steps", "days": "7"}),
        )]),
        text_response("I couldn't reach your health data."),
    ]));

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    );

    let mut conv = Conversation::new();
    conv.push(Message::user("Steps this week?"));

    let answer = session.process(&mut conv).await.unwrap();
    assert!(answer.contains("couldn't reach"));

    let tool_msg = conv.messages.iter().find(|m| m.role == Role::Tool).unwrap();
    assert!(tool_msg.content.starts_with("Error:"));
}

#[tokio::test]
async fn legacy_mode_embeds_fourteen_days_and_sends_no_tools() {
    let provider = Arc::new(ScriptedProvider::new(vec![text_response(
        "Based on the data above, you're doing fine.",
    )]));
    let store = Arc::new(SyntheticStore::new(5));

    let today = chrono::Local::now().date_naive();
    let data: Vec<_> = (0..14u64)
        .map(|i| DailySummary {
            date: today - chrono::Days::new(13 - i),
            steps: Some(7000),
            sleep_hours: Some(7.0),
            ..Default::default()
        })
        .collect();

    let session = ChatSession::new(
        Arc::clone(&provider) as Arc<dyn Provider>,
        "mock",
        0.2,
        tools_for(&store),
    )
    .with_legacy_data(data);

    let mut conv = Conversation::new();
    conv.push(Message::user("How am I doing?"));

    session.process(&mut conv).await.unwrap();

    let system = &conv.messages[0];
    assert_eq!(system.role, Role::System);
    let data_lines = system.content.lines().filter(|l| l.contains("7000 steps")).count();
    assert_eq!(data_lines, 14);
    // Tools never ran in legacy mode.
    assert_eq!(store.aggregate_queries(), 0);
    assert_eq!(store.interval_queries(), 0);
}
