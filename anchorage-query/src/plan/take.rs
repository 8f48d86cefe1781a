//! `Take(n)` result operator.

use std::any::Any;
use std::fmt;

use super::{CloneContext, ResultOperator, StreamedSequence};
use crate::error::{QueryError, QueryResult};
use crate::expr::Expr;

/// Limits the results of a query to the first `count` items.
#[derive(Debug, Clone, PartialEq)]
pub struct TakeOperator {
    count: Expr,
}

impl TakeOperator {
    /// Create a take operator from a count expression.
    pub fn new(count: Expr) -> Self {
        Self { count }
    }

    /// The count expression.
    pub fn count(&self) -> &Expr {
        &self.count
    }

    /// The count, if it is a non-negative integer constant.
    pub fn constant_count(&self) -> Option<usize> {
        match &self.count {
            Expr::Constant(value) => value.as_u64().and_then(|n| usize::try_from(n).ok()),
            _ => None,
        }
    }
}

impl ResultOperator for TakeOperator {
    fn clone_operator(&self, context: &CloneContext) -> Box<dyn ResultOperator> {
        Box::new(Self {
            count: self
                .count
                .remap_sources(context.query_source_mapping().as_map()),
        })
    }

    fn transform_expressions(&mut self, transformation: &mut dyn FnMut(&Expr) -> Expr) {
        self.count = transformation(&self.count);
    }

    fn execute_in_memory(&self, mut input: StreamedSequence) -> QueryResult<StreamedSequence> {
        let count = self.constant_count().ok_or_else(|| {
            QueryError::invalid_argument(
                "count",
                format!("{} is not a constant count", self.count),
            )
            .with_context("Executing Take in memory")
        })?;
        input.items.truncate(count);
        Ok(input)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for TakeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Take({})", self.count)
    }
}
