//! Prompt construction from retrieved matches and graph facts.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PROMPT_GRAPH_LINES, MAX_PROMPT_VECTOR_LINES};
use crate::graph::GraphFact;
use crate::retrieval::RetrievalMatch;

#[cfg(test)]
mod tests;

pub const SYSTEM_PROMPT: &str = "You are an expert Vietnam travel assistant. Use the provided data to answer queries accurately.\n\
Always cite node IDs when referencing places and provide step-by-step reasoning.\n\
Be helpful, informative, and enthusiastic about Vietnam travel.";

pub const NO_CONTEXT_TEXT: &str =
    "No specific context available. Use your general knowledge about Vietnam.";

const CLOSING_INSTRUCTION: &str =
    "Provide a comprehensive, helpful answer with specific recommendations.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One line per match: `- [Node {id}] {name} ({type}) - Relevance: {score}`.
pub fn vector_lines(matches: &[RetrievalMatch]) -> Vec<String> {
    matches
        .iter()
        .take(MAX_PROMPT_VECTOR_LINES)
        .map(|m| {
            format!(
                "- [Node {}] {} ({}) - Relevance: {:.3}",
                m.id,
                m.name(),
                m.node_type(),
                m.score
            )
        })
        .collect()
}

/// One line per fact: `- Node {source} --[{rel}]--> Node {target}: {name}`.
pub fn graph_lines(facts: &[GraphFact]) -> Vec<String> {
    facts
        .iter()
        .take(MAX_PROMPT_GRAPH_LINES)
        .map(|f| {
            format!(
                "- Node {} --[{}]--> Node {}: {}",
                f.source, f.rel, f.target_id, f.target_name
            )
        })
        .collect()
}

/// Builds the system and user messages for one query.
///
/// `matches` are expected to be filtered and sorted already; only the first eight are
/// listed, and at most fifteen graph facts.
pub fn build_prompt(
    query: &str,
    matches: &[RetrievalMatch],
    facts: &[GraphFact],
) -> Vec<PromptMessage> {
    let vectors = vector_lines(matches);
    let graph = graph_lines(facts);

    let mut context = String::new();
    if !vectors.is_empty() {
        context.push_str("Vector Search Results:\n");
        context.push_str(&vectors.join("\n"));
        context.push_str("\n\n");
    }
    if !graph.is_empty() {
        context.push_str("Graph Relationships:\n");
        context.push_str(&graph.join("\n"));
        context.push_str("\n\n");
    }
    if context.is_empty() {
        context.push_str(NO_CONTEXT_TEXT);
        context.push_str("\n\n");
    }

    vec![
        PromptMessage::system(SYSTEM_PROMPT),
        PromptMessage::user(format!(
            "User Query: {}\n\n{}{}",
            query, context, CLOSING_INSTRUCTION
        )),
    ]
}
