use serde_json::json;

use super::dataset::TravelNode;
use crate::constants::SEMANTIC_TEXT_MAX_CHARS;
use crate::graph::truncate_chars;

/// A node ready to be embedded: its id, the text to embed and the match metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestItem {
    pub id: String,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// Selects the text to embed for each node and builds its metadata.
///
/// The text is `semantic_text` when present and non-empty, otherwise the first 1000
/// characters of `description`. Nodes whose text is blank are skipped. Metadata carries
/// `id`, `type`, `name`, `city` (falling back to `region`) and `tags`.
pub fn prepare_items(nodes: &[TravelNode]) -> Vec<IngestItem> {
    nodes
        .iter()
        .filter_map(|node| {
            let text = node
                .semantic_text
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| {
                    truncate_chars(
                        node.description.as_deref().unwrap_or_default(),
                        SEMANTIC_TEXT_MAX_CHARS,
                    )
                });

            if text.trim().is_empty() {
                return None;
            }

            let city = node.city.clone().or_else(|| node.region.clone()).unwrap_or_default();

            Some(IngestItem {
                id: node.id.clone(),
                text,
                metadata: json!({
                    "id": node.id,
                    "type": node.node_type,
                    "name": node.name,
                    "city": city,
                    "tags": node.tags,
                }),
            })
        })
        .collect()
}
