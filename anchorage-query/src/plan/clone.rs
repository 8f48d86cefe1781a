//! State shared by the operators of a query model while it is being cloned.

use std::collections::HashMap;

use crate::expr::QuerySource;

/// Maps query sources of the original model to their counterparts in a clone.
#[derive(Debug, Clone, Default)]
pub struct QuerySourceMapping {
    sources: HashMap<QuerySource, QuerySource>,
}

impl QuerySourceMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `original` is replaced by `replacement`.
    pub fn add_mapping(&mut self, original: QuerySource, replacement: QuerySource) {
        self.sources.insert(original, replacement);
    }

    /// Look up the replacement for `original`.
    pub fn get(&self, original: &QuerySource) -> Option<&QuerySource> {
        self.sources.get(original)
    }

    /// Check if `original` has a replacement.
    pub fn contains(&self, original: &QuerySource) -> bool {
        self.sources.contains_key(original)
    }

    /// Number of mapped sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The underlying map, for rewriting expressions.
    pub fn as_map(&self) -> &HashMap<QuerySource, QuerySource> {
        &self.sources
    }
}

/// Context passed to every operator cloned as part of one model clone.
#[derive(Debug, Clone, Default)]
pub struct CloneContext {
    query_source_mapping: QuerySourceMapping,
}

impl CloneContext {
    /// Create a context with an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context around an existing mapping.
    pub fn with_mapping(mapping: QuerySourceMapping) -> Self {
        Self {
            query_source_mapping: mapping,
        }
    }

    /// The source mapping.
    pub fn query_source_mapping(&self) -> &QuerySourceMapping {
        &self.query_source_mapping
    }

    /// Mutable access to the source mapping.
    pub fn query_source_mapping_mut(&mut self) -> &mut QuerySourceMapping {
        &mut self.query_source_mapping
    }
}
