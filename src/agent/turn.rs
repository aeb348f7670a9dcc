//! Per-question records produced by the agent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::AgentError;
use crate::llm::{ChatResponse, ToolCall};
use crate::tools::ToolKind;

/// Answer used when the iteration guard stops the loop.
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// Where the agent is within one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    AwaitingInput,
    Planning,
    ToolCalling,
    Composing,
    Done,
}

/// What the model chose to do after one planning step.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Run these tools, then plan again.
    CallTools {
        calls: Vec<ToolCall>,
        thought: Option<String>,
    },
    /// Stop and answer.
    FinalAnswer(String),
}

impl Decision {
    /// Reduce a model response to a decision. Tool calls win over text.
    pub fn from_response(response: ChatResponse) -> Result<Self, AgentError> {
        match response.tool_calls {
            Some(calls) if !calls.is_empty() => Ok(Self::CallTools {
                calls,
                thought: response.content.filter(|c| !c.trim().is_empty()),
            }),
            _ => match response.content {
                Some(content) if !content.trim().is_empty() => Ok(Self::FinalAnswer(content)),
                _ => Err(AgentError::EmptyResponse),
            },
        }
    }
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolCallStatus {
    Ok,
    Failed { error: String },
}

/// One tool call made during a turn.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    /// Model-assigned call id
    pub id: String,
    /// Tool name the model asked for
    pub tool: String,
    /// Kind of the tool, absent when the name matched no tool
    pub kind: Option<ToolKind>,
    /// Query text passed to the tool
    pub query: String,
    /// Text returned to the model
    pub output: String,
    #[serde(flatten)]
    pub status: ToolCallStatus,
}

impl ToolInvocation {
    pub fn succeeded(&self) -> bool {
        self.status == ToolCallStatus::Ok
    }
}

/// Why a turn finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model produced a final answer.
    Completed,
    /// The iteration guard ended the loop.
    IterationLimit,
}

/// One question and everything the agent did to answer it.
#[derive(Debug, Clone, Serialize)]
pub struct AgentTurn {
    pub id: Uuid,
    pub question: String,
    pub tool_calls: Vec<ToolInvocation>,
    pub answer: String,
    /// Number of planning steps (model calls)
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
