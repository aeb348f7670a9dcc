//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::llm::{ChatMessage, ChatResponse, LlmClient, ToolCall, ToolSchema};
use crate::tools::{parse_arguments, ToolRegistry};

use super::prompt::build_system_prompt;
use super::turn::{
    AgentState, AgentTurn, Decision, StopReason, ToolCallStatus, ToolInvocation,
    ITERATION_LIMIT_ANSWER,
};
use super::AgentError;

/// The question-answering agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    model: String,
    max_iterations: usize,
    model_timeout: Duration,
}

impl Agent {
    /// Create a new agent over the given model client and tool set.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
        max_iterations: usize,
        model_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            tools,
            model: model.into(),
            max_iterations,
            model_timeout,
        }
    }

    /// Answer one question, calling tools as the model decides.
    pub async fn run(&self, question: &str) -> Result<AgentTurn, AgentError> {
        let started_at = Utc::now();
        let mut state = AgentState::AwaitingInput;

        let mut messages = vec![
            ChatMessage::system(build_system_prompt(&self.tools)),
            ChatMessage::user(question),
        ];
        let tool_schemas = self.tools.get_tool_schemas();
        let mut invocations = Vec::new();
        let mut iterations = 0usize;

        transition(&mut state, AgentState::Planning);
        let (answer, stop_reason) = loop {
            if iterations >= self.max_iterations {
                tracing::warn!(
                    "Max iterations ({}) reached without a final answer",
                    self.max_iterations
                );
                transition(&mut state, AgentState::Composing);
                break (ITERATION_LIMIT_ANSWER.to_string(), StopReason::IterationLimit);
            }
            iterations += 1;
            tracing::debug!("Agent iteration {}", iterations);

            let response = self.plan(&messages, &tool_schemas).await?;
            match Decision::from_response(response)? {
                Decision::CallTools { calls, thought } => {
                    transition(&mut state, AgentState::ToolCalling);
                    messages.push(ChatMessage::assistant_tool_calls(thought, calls.clone()));

                    for call in &calls {
                        let invocation = self.invoke(call).await;
                        messages.push(ChatMessage::tool_result(&call.id, &invocation.output));
                        invocations.push(invocation);
                    }

                    transition(&mut state, AgentState::Planning);
                }
                Decision::FinalAnswer(text) => {
                    transition(&mut state, AgentState::Composing);
                    break (text, StopReason::Completed);
                }
            }
        };
        transition(&mut state, AgentState::Done);

        Ok(AgentTurn {
            id: Uuid::new_v4(),
            question: question.to_string(),
            tool_calls: invocations,
            answer,
            iterations,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// One model call with the conversation so far.
    async fn plan(
        &self,
        messages: &[ChatMessage],
        tool_schemas: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError> {
        let response = tokio::time::timeout(
            self.model_timeout,
            self.llm
                .chat_completion(&self.model, messages, Some(tool_schemas)),
        )
        .await
        .map_err(|_| AgentError::Timeout(self.model_timeout))??;
        Ok(response)
    }

    /// Run one tool call. Failures become the observation instead of aborting the turn.
    async fn invoke(&self, call: &ToolCall) -> ToolInvocation {
        let name = &call.function.name;
        let query = parse_arguments(&call.function.arguments)["query"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let kind = self.tools.get(name).map(|t| t.kind());

        tracing::info!("Calling tool: {} with query: {}", name, query);
        let (output, status) = match self.tools.execute(name, &call.function.arguments).await {
            Ok(output) => (output, ToolCallStatus::Ok),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                (
                    format!("Error: {}", e),
                    ToolCallStatus::Failed {
                        error: e.to_string(),
                    },
                )
            }
        };

        ToolInvocation {
            id: call.id.clone(),
            tool: name.clone(),
            kind,
            query,
            output,
            status,
        }
    }
}

fn transition(state: &mut AgentState, next: AgentState) {
    tracing::debug!("Agent state {:?} -> {:?}", state, next);
    *state = next;
}
