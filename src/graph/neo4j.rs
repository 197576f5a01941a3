//! Neo4j over the HTTP transactional endpoint (`/db/{database}/tx/commit`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::error::GraphError;
use super::provider::GraphProvider;
use super::types::{GraphFact, GraphNode, GraphStats, Subgraph, truncate_chars};
use crate::constants::GRAPH_DESCRIPTION_MAX_CHARS;

const NEIGHBORS_QUERY: &str = "MATCH (n:Entity {id: $nid})-[r]-(m:Entity) \
     RETURN type(r) AS rel, m.id AS id, m.name AS name, m.type AS type, \
     m.description AS description LIMIT $limit";

const FIND_BY_NAME_QUERY: &str = "MATCH (n:Entity) \
     WHERE n.name IS NOT NULL AND size(n.name) >= 3 \
     AND toLower($text) CONTAINS toLower(n.name) \
     RETURN n.id AS id, n.name AS name, n.type AS type LIMIT $limit";

const SUBGRAPH_QUERY: &str = "MATCH (n:Entity)-[r]-(m:Entity) \
     RETURN n.id, n.name, n.type, type(r), m.id, m.name, m.type LIMIT $limit";

const CENTERED_SUBGRAPH_QUERY: &str = "MATCH (n:Entity {id: $node_id})-[r]-(m:Entity) \
     RETURN n.id, n.name, n.type, type(r), m.id, m.name, m.type LIMIT $limit";

const NODE_COUNT_QUERY: &str = "MATCH (n:Entity) RETURN count(n)";
const REL_COUNT_QUERY: &str = "MATCH ()-[r]->() RETURN count(r)";
const SAMPLE_QUERY: &str = "MATCH (n:Entity) RETURN properties(n) LIMIT $limit";

/// Connection settings for [`Neo4jGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neo4jConfig {
    /// `neo4j://`, `neo4j+s://`, `bolt://`, `bolt+s://`, `http://` or `https://`.
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub timeout: Duration,
}

/// One statement's rows as returned by the transactional endpoint.
#[derive(Debug, Default, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Maps a driver-style URI to the HTTP API base URL.
///
/// Secure schemes map to `https://host`; plain ones to `http://host:7474`. HTTP URLs are
/// used as given.
pub fn http_base_url(uri: &str) -> Result<String, GraphError> {
    let invalid = |reason: &str| GraphError::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let (scheme, rest) = uri.split_once("://").ok_or_else(|| invalid("missing scheme"))?;
    let host_port = rest.split('/').next().unwrap_or_default();
    if host_port.is_empty() {
        return Err(invalid("missing host"));
    }
    let host = host_port
        .rsplit_once(':')
        .map(|(h, _)| h)
        .unwrap_or(host_port);

    match scheme {
        "http" | "https" => Ok(uri.trim_end_matches('/').to_string()),
        "neo4j+s" | "neo4j+ssc" | "bolt+s" | "bolt+ssc" => Ok(format!("https://{}", host)),
        "neo4j" | "bolt" => Ok(format!("http://{}:7474", host)),
        _ => Err(invalid("unsupported scheme")),
    }
}

/// Graph provider backed by a Neo4j server or Aura instance.
pub struct Neo4jGraph {
    http: reqwest::Client,
    endpoint: String,
    config: Neo4jConfig,
}

impl Neo4jGraph {
    pub fn new(config: Neo4jConfig) -> Result<Self, GraphError> {
        let base = http_base_url(&config.uri)?;
        let endpoint = format!("{}/db/{}/tx/commit", base, config.database);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GraphError::ConnectionFailed {
                url: base.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs `statements` in one auto-commit transaction.
    async fn run(&self, statements: Vec<Value>) -> Result<Vec<StatementResult>, GraphError> {
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&json!({ "statements": statements }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GraphError::Timeout
                } else {
                    GraphError::ConnectionFailed {
                        url: self.endpoint.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GraphError::Unauthorized {
                    status: status.as_u16(),
                },
                _ => GraphError::UpstreamStatus {
                    status: status.as_u16(),
                    body: body.chars().take(512).collect(),
                },
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GraphError::MalformedResponse {
                reason: e.to_string(),
            })?;
        parse_tx_response(body)
    }

    async fn run_one(&self, statement: &str, parameters: Value) -> Result<Vec<Vec<Value>>, GraphError> {
        let mut results = self
            .run(vec![json!({ "statement": statement, "parameters": parameters })])
            .await?;
        Ok(results
            .pop()
            .map(|r| r.data.into_iter().map(|d| d.row).collect())
            .unwrap_or_default())
    }
}

fn parse_tx_response(body: Value) -> Result<Vec<StatementResult>, GraphError> {
    let parsed: TxResponse =
        serde_json::from_value(body).map_err(|e| GraphError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if let Some(err) = parsed.errors.into_iter().next() {
        return Err(GraphError::QueryFailed {
            code: err.code,
            message: err.message,
        });
    }
    Ok(parsed.results)
}

/// Renders a cell as text. Ids may be stored as numbers.
fn cell_str(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_u64(row: &[Value], idx: usize) -> u64 {
    row.get(idx).and_then(Value::as_u64).unwrap_or(0)
}

fn fact_from_row(source: &str, row: &[Value]) -> Option<GraphFact> {
    Some(GraphFact {
        source: source.to_string(),
        rel: cell_str(row, 0)?,
        target_id: cell_str(row, 1)?,
        target_name: cell_str(row, 2).unwrap_or_default(),
        target_type: cell_str(row, 3).unwrap_or_default(),
        target_desc: truncate_chars(
            &cell_str(row, 4).unwrap_or_default(),
            GRAPH_DESCRIPTION_MAX_CHARS,
        ),
    })
}

fn subgraph_from_rows(rows: &[Vec<Value>]) -> Subgraph {
    let mut subgraph = Subgraph::default();
    for row in rows {
        let (Some(n_id), Some(rel), Some(m_id)) =
            (cell_str(row, 0), cell_str(row, 3), cell_str(row, 4))
        else {
            continue;
        };
        subgraph.push_row(
            GraphNode::new(n_id, cell_str(row, 1), cell_str(row, 2)),
            rel,
            GraphNode::new(m_id, cell_str(row, 5), cell_str(row, 6)),
        );
    }
    subgraph
}

#[async_trait]
impl GraphProvider for Neo4jGraph {
    async fn neighbors(
        &self,
        node_ids: &[String],
        limit_per_node: usize,
    ) -> Result<Vec<GraphFact>, GraphError> {
        let mut facts = Vec::new();

        for nid in node_ids {
            let rows = match self
                .run_one(NEIGHBORS_QUERY, json!({ "nid": nid, "limit": limit_per_node }))
                .await
            {
                Ok(rows) => rows,
                Err(e @ (GraphError::QueryFailed { .. } | GraphError::MalformedResponse { .. })) => {
                    warn!(node_id = %nid, error = %e, "Skipping node in graph context");
                    continue;
                }
                Err(e) => return Err(e),
            };

            facts.extend(rows.iter().filter_map(|row| fact_from_row(nid, row)));
        }

        debug!(nodes = node_ids.len(), facts = facts.len(), "Fetched graph facts");
        Ok(facts)
    }

    async fn find_nodes_by_name(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<GraphNode>, GraphError> {
        let rows = self
            .run_one(FIND_BY_NAME_QUERY, json!({ "text": text, "limit": limit }))
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let id = cell_str(row, 0)?;
                Some(GraphNode::new(id, cell_str(row, 1), cell_str(row, 2)))
            })
            .collect())
    }

    async fn subgraph(&self, center: Option<&str>, limit: usize) -> Result<Subgraph, GraphError> {
        let rows = match center {
            Some(node_id) => {
                self.run_one(
                    CENTERED_SUBGRAPH_QUERY,
                    json!({ "node_id": node_id, "limit": limit }),
                )
                .await?
            }
            None => self.run_one(SUBGRAPH_QUERY, json!({ "limit": limit })).await?,
        };

        Ok(subgraph_from_rows(&rows))
    }

    async fn stats(&self, sample: usize) -> Result<GraphStats, GraphError> {
        let results = self
            .run(vec![
                json!({ "statement": NODE_COUNT_QUERY }),
                json!({ "statement": REL_COUNT_QUERY }),
                json!({ "statement": SAMPLE_QUERY, "parameters": { "limit": sample } }),
            ])
            .await?;

        let first_row = |idx: usize| -> Vec<Value> {
            results
                .get(idx)
                .and_then(|r| r.data.first())
                .map(|d| d.row.clone())
                .unwrap_or_default()
        };

        Ok(GraphStats {
            node_count: cell_u64(&first_row(0), 0),
            relationship_count: cell_u64(&first_row(1), 0),
            sample_nodes: results
                .get(2)
                .map(|r| {
                    r.data
                        .iter()
                        .filter_map(|d| d.row.first().cloned())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    async fn health_check(&self) -> Result<(), GraphError> {
        self.run_one("RETURN 1", json!({})).await.map(|_| ())
    }

    fn name(&self) -> &str {
        "neo4j"
    }
}

impl std::fmt::Debug for Neo4jGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jGraph")
            .field("endpoint", &self.endpoint)
            .field("user", &self.config.user)
            .finish()
    }
}
