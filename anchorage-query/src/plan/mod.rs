//! Plan operator and plan annotation contracts.
//!
//! A [`QueryModel`] owns a list of result operators. The plan engine treats
//! them uniformly through [`ResultOperator`]: it clones them when the model is
//! copied, hands them expression rewrites, and runs them over in-memory
//! sequences. Operators that annotate a query source (such as Include
//! directives) additionally expose [`QueryAnnotation`], which lets the engine
//! enumerate and re-link annotations without knowing their concrete kind.

mod clone;
mod model;
mod take;

pub use clone::{CloneContext, QuerySourceMapping};
pub use model::{QueryModel, QueryModelRef, SharedQueryModel};
pub use take::TakeOperator;

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::QueryResult;
use crate::expr::{Expr, QuerySource};

/// A sequence of items flowing through in-memory execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamedSequence {
    /// The entity type of the items.
    pub item_type: SmolStr,
    /// The items.
    pub items: Vec<serde_json::Value>,
}

impl StreamedSequence {
    /// Create a sequence.
    pub fn new(item_type: impl Into<SmolStr>, items: Vec<serde_json::Value>) -> Self {
        Self {
            item_type: item_type.into(),
            items,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An operator applied to the results of a query model.
pub trait ResultOperator: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Produce an independent copy for a cloned query model.
    fn clone_operator(&self, context: &CloneContext) -> Box<dyn ResultOperator>;

    /// Replace every expression held by the operator with `transformation(expr)`.
    fn transform_expressions(&mut self, transformation: &mut dyn FnMut(&Expr) -> Expr);

    /// Apply the operator to an in-memory sequence.
    fn execute_in_memory(&self, input: StreamedSequence) -> QueryResult<StreamedSequence>;

    /// The annotation capability, if the operator has one.
    fn as_annotation(&self) -> Option<&dyn QueryAnnotation> {
        None
    }

    /// Mutable access to the annotation capability.
    fn as_annotation_mut(&mut self) -> Option<&mut dyn QueryAnnotation> {
        None
    }

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;
}

/// A plan annotation tied to a query source and to the model containing it.
pub trait QueryAnnotation {
    /// The query source the annotation is anchored to.
    fn query_source(&self) -> Option<&QuerySource>;

    /// Re-anchor the annotation.
    fn set_query_source(&mut self, source: Option<QuerySource>);

    /// The model currently containing the annotation, if it is still alive.
    fn query_model(&self) -> Option<SharedQueryModel>;

    /// Assign (or clear) the back-reference to the containing model.
    fn set_query_model(&mut self, model: Option<QueryModelRef>);
}
