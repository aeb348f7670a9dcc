//! Session harness: one question in, one rendered outcome out.
//!
//! The HTTP layer and the tests both go through [`Harness::submit`], which
//! applies the blank-input rule before the agent sees anything.

use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::agent::{Agent, AgentError, AgentTurn};

/// Warning shown when the submitted question is blank.
pub const EMPTY_INPUT_WARNING: &str = "Please enter a question.";

/// Message shown when a turn fails. Details go to the log.
pub const FAILURE_MESSAGE: &str =
    "Something went wrong while answering. Check the server logs and try again.";

/// What the page should display after a submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Submission {
    /// The agent answered; show the answer and the turn record.
    #[serde(rename = "success")]
    Answered { turn: AgentTurn },
    /// Nothing was asked; show a warning.
    #[serde(rename = "warning")]
    EmptyInput { message: String },
    /// The model could not be reached or misbehaved.
    #[serde(rename = "error")]
    Failed { message: String },
}

pub struct Harness {
    agent: Arc<Agent>,
}

impl Harness {
    pub fn new(agent: Arc<Agent>) -> Self {
        Self { agent }
    }

    /// Run one agent turn inside a request span.
    pub async fn run(&self, question: &str) -> Result<AgentTurn, AgentError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("turn", %request_id);
        async {
            tracing::info!("Question: {}", question);
            let turn = self.agent.run(question).await?;
            tracing::info!(
                "Answered after {} iteration(s) with {} tool call(s)",
                turn.iterations,
                turn.tool_calls.len()
            );
            Ok(turn)
        }
        .instrument(span)
        .await
    }

    /// Handle raw input from the page.
    pub async fn submit(&self, input: &str) -> Submission {
        let question = input.trim();
        if question.is_empty() {
            return Submission::EmptyInput {
                message: EMPTY_INPUT_WARNING.to_string(),
            };
        }

        match self.run(question).await {
            Ok(turn) => Submission::Answered { turn },
            Err(e) => {
                tracing::error!("Turn failed: {}", e);
                Submission::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }
}
