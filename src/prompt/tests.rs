use serde_json::json;

use super::*;

fn fact(i: usize) -> GraphFact {
    GraphFact {
        source: "city_hanoi".to_string(),
        rel: "Connected_To".to_string(),
        target_id: format!("n{}", i),
        target_name: format!("Place {}", i),
        target_type: "City".to_string(),
        target_desc: String::new(),
    }
}

fn hanoi() -> RetrievalMatch {
    RetrievalMatch::new("city_hanoi", 0.91234)
        .with_metadata(json!({"name": "Hanoi", "type": "City"}))
}

#[test]
fn test_prompt_has_system_and_user_messages() {
    let messages = build_prompt("Where to eat pho?", &[hanoi()], &[fact(1)]);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, SYSTEM_PROMPT);
    assert_eq!(messages[1].role, Role::User);
}

#[test]
fn test_prompt_user_message_layout() {
    let messages = build_prompt("Where to eat pho?", &[hanoi()], &[fact(1)]);

    assert_eq!(
        messages[1].content,
        "User Query: Where to eat pho?\n\n\
         Vector Search Results:\n\
         - [Node city_hanoi] Hanoi (City) - Relevance: 0.912\n\n\
         Graph Relationships:\n\
         - Node city_hanoi --[Connected_To]--> Node n1: Place 1\n\n\
         Provide a comprehensive, helpful answer with specific recommendations."
    );
}

#[test]
fn test_prompt_without_context_uses_fallback() {
    let messages = build_prompt("Hello", &[], &[]);

    assert!(messages[1].content.contains(NO_CONTEXT_TEXT));
    assert!(!messages[1].content.contains("Vector Search Results"));
    assert!(!messages[1].content.contains("Graph Relationships"));
}

#[test]
fn test_prompt_graph_only() {
    let messages = build_prompt("Hello", &[], &[fact(1)]);

    assert!(messages[1].content.contains("Graph Relationships:"));
    assert!(!messages[1].content.contains(NO_CONTEXT_TEXT));
}

#[test]
fn test_prompt_line_limits() {
    let matches: Vec<RetrievalMatch> = (0..12)
        .map(|i| RetrievalMatch::new(format!("m{}", i), 0.9))
        .collect();
    let facts: Vec<GraphFact> = (0..20).map(fact).collect();

    assert_eq!(vector_lines(&matches).len(), 8);
    assert_eq!(graph_lines(&facts).len(), 15);

    let content = &build_prompt("q", &matches, &facts)[1].content;
    assert!(content.contains("[Node m7]"));
    assert!(!content.contains("[Node m8]"));
    assert!(content.contains("Node n14:"));
    assert!(!content.contains("Node n15:"));
}

#[test]
fn test_missing_metadata_renders_empty_fields() {
    let lines = vector_lines(&[RetrievalMatch::new("x", 0.5)]);
    assert_eq!(lines[0], "- [Node x]  () - Relevance: 0.500");
}

#[test]
fn test_role_serializes_lowercase() {
    let value = serde_json::to_value(PromptMessage::user("hi")).unwrap();
    assert_eq!(value, json!({"role": "user", "content": "hi"}));
}
