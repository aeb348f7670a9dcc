//! System prompt for the question-answering agent.

use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful assistant.

You have access to the following tools:
{tool_descriptions}

Call a tool when the question needs facts you are not sure about. Use the documentation search for questions about the indexed documentation. When a tool fails, continue with what you already know and say that the lookup failed. When you have enough information, answer the question directly."#,
        tool_descriptions = tool_descriptions
    )
}
