pub const VISTA_CONTEXT_HEADER: &str = "X-Vista-Context";

/// Which retrieval sources contributed context to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextStatus {
    Hybrid,
    VectorOnly,
    GraphOnly,
    NoContext,
}

impl ContextStatus {
    pub fn from_sources(has_matches: bool, has_facts: bool) -> Self {
        match (has_matches, has_facts) {
            (true, true) => ContextStatus::Hybrid,
            (true, false) => ContextStatus::VectorOnly,
            (false, true) => ContextStatus::GraphOnly,
            (false, false) => ContextStatus::NoContext,
        }
    }

    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            ContextStatus::Hybrid => "HYBRID",
            ContextStatus::VectorOnly => "VECTOR_ONLY",
            ContextStatus::GraphOnly => "GRAPH_ONLY",
            ContextStatus::NoContext => "NO_CONTEXT",
        }
    }

    #[inline]
    pub fn has_context(&self) -> bool {
        !matches!(self, ContextStatus::NoContext)
    }
}

impl std::fmt::Display for ContextStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}
