//! Agent module - the question-answering state machine.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the user question
//! 2. Call the model with the available tools (Planning)
//! 3. If the model requests tool calls, run them and feed the results back (ToolCalling)
//! 4. Repeat until the model produces a final answer (Composing) or max iterations is reached

mod agent_loop;
mod prompt;
mod turn;

pub use agent_loop::Agent;
pub use prompt::build_system_prompt;
pub use turn::{
    AgentState, AgentTurn, Decision, StopReason, ToolCallStatus, ToolInvocation,
    ITERATION_LIMIT_ANSWER,
};

use std::time::Duration;

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned an empty response")]
    EmptyResponse,
}
