//! Query models: a main query source plus its result operators.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{CloneContext, QueryAnnotation, ResultOperator, StreamedSequence};
use crate::anchorage_debug;
use crate::error::QueryResult;
use crate::expr::{Expr, QuerySource};
use crate::relations::IncludeDirective;

/// A query model shared between the plan engine and its annotations.
pub type SharedQueryModel = Arc<RwLock<QueryModel>>;

/// Non-owning back-reference from an annotation to its model.
pub type QueryModelRef = Weak<RwLock<QueryModel>>;

/// A logical query: `from <main source> ... => <result operators>`.
///
/// ```rust
/// use anchorage_query::expr::Expr;
/// use anchorage_query::plan::{QueryModel, TakeOperator};
/// use anchorage_query::relations::IncludeDirective;
/// use anchorage_query::QuerySource;
///
/// let o = QuerySource::new("o", "Order");
/// let mut model = QueryModel::new(o.clone());
/// model.add_result_operator(IncludeDirective::named("Customer", Expr::source(&o)).unwrap());
/// model.add_result_operator(TakeOperator::new(Expr::constant(10)));
///
/// let shared = model.into_shared();
/// assert_eq!(shared.read().annotations().count(), 1);
/// assert_eq!(shared.read().to_string(), "from Order o => Include(Customer) => Take(10)");
/// ```
#[derive(Debug)]
pub struct QueryModel {
    main_source: QuerySource,
    result_operators: Vec<Box<dyn ResultOperator>>,
}

impl QueryModel {
    /// Create a model over `main_source` with no result operators.
    pub fn new(main_source: QuerySource) -> Self {
        Self {
            main_source,
            result_operators: Vec::new(),
        }
    }

    /// The main query source.
    pub fn main_source(&self) -> &QuerySource {
        &self.main_source
    }

    /// Append a result operator.
    pub fn add_result_operator(&mut self, operator: impl ResultOperator) {
        self.result_operators.push(Box::new(operator));
    }

    /// Append an already boxed result operator.
    pub fn push_result_operator(&mut self, operator: Box<dyn ResultOperator>) {
        self.result_operators.push(operator);
    }

    /// The result operators, in application order.
    pub fn result_operators(&self) -> &[Box<dyn ResultOperator>] {
        &self.result_operators
    }

    /// Every result operator that is also an annotation.
    pub fn annotations(&self) -> impl Iterator<Item = &dyn QueryAnnotation> {
        self.result_operators.iter().filter_map(|op| op.as_annotation())
    }

    /// Mutable access to every annotation.
    pub fn annotations_mut(&mut self) -> impl Iterator<Item = &mut dyn QueryAnnotation> {
        self.result_operators
            .iter_mut()
            .filter_map(|op| op.as_annotation_mut())
    }

    /// The Include directives among the result operators.
    pub fn include_directives(&self) -> impl Iterator<Item = &IncludeDirective> {
        self.result_operators
            .iter()
            .filter_map(|op| op.as_any().downcast_ref::<IncludeDirective>())
    }

    /// Pass every operator's expressions through `transformation`.
    pub fn transform_expressions(&mut self, transformation: &mut dyn FnMut(&Expr) -> Expr) {
        for operator in &mut self.result_operators {
            operator.transform_expressions(transformation);
        }
    }

    /// Run the result operators over `input` in order.
    pub fn execute_in_memory(&self, input: StreamedSequence) -> QueryResult<StreamedSequence> {
        self.result_operators
            .iter()
            .try_fold(input, |sequence, op| op.execute_in_memory(sequence))
    }

    /// Re-anchor every annotation whose source appears in `context`'s mapping.
    ///
    /// Annotations keep their anchor when cloned; this is the explicit pass a
    /// rewriting step runs when it wants them to follow the cloned sources.
    pub fn reanchor_annotations(&mut self, context: &CloneContext) -> usize {
        let mapping = context.query_source_mapping();
        let mut reanchored = 0;
        for annotation in self.annotations_mut() {
            let replacement = annotation
                .query_source()
                .and_then(|source| mapping.get(source))
                .cloned();
            if let Some(source) = replacement {
                annotation.set_query_source(Some(source));
                reanchored += 1;
            }
        }
        reanchored
    }

    /// Share the model and point every annotation back at it.
    pub fn into_shared(self) -> SharedQueryModel {
        let shared = Arc::new(RwLock::new(self));
        Self::link_annotations(&shared);
        shared
    }

    /// Point every annotation of `shared` back at `shared`.
    pub fn link_annotations(shared: &SharedQueryModel) {
        let back_ref = Arc::downgrade(shared);
        let mut model = shared.write();
        let mut linked = 0usize;
        for annotation in model.annotations_mut() {
            annotation.set_query_model(Some(back_ref.clone()));
            linked += 1;
        }
        anchorage_debug!(
            main_source = %model.main_source,
            annotations = linked,
            "Linked annotations to query model"
        );
    }

    /// Clone the model.
    ///
    /// The main source is replaced by a fresh source recorded in `context`,
    /// every operator is cloned with `context`, and the annotations of the
    /// copy are linked to the copy.
    pub fn clone_model(&self, context: &mut CloneContext) -> SharedQueryModel {
        let main_source = self.main_source.duplicate();
        context
            .query_source_mapping_mut()
            .add_mapping(self.main_source.clone(), main_source.clone());

        let mut copy = Self::new(main_source);
        for operator in &self.result_operators {
            copy.push_result_operator(operator.clone_operator(context));
        }

        anchorage_debug!(
            main_source = %self.main_source,
            operators = copy.result_operators.len(),
            "Cloned query model"
        );

        copy.into_shared()
    }
}

impl fmt::Display for QueryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {} {}",
            self.main_source.item_type(),
            self.main_source.item_name()
        )?;
        for operator in &self.result_operators {
            write!(f, " => {}", operator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::NavigationMember;
    use crate::plan::TakeOperator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn order_lines() -> NavigationMember {
        NavigationMember::new("Order", "OrderLines", "OrderLine")
    }

    fn model_with_include() -> (QuerySource, QueryModel) {
        let o = QuerySource::new("o", "Order");
        let mut model = QueryModel::new(o.clone());
        let mut include = IncludeDirective::named("Customer", Expr::source(&o)).unwrap();
        include.append_chain([NavigationMember::new("Customer", "Address", "Address")]);
        model.add_result_operator(include);
        model.add_result_operator(TakeOperator::new(Expr::parameter("n")));
        (o, model)
    }

    #[test]
    fn test_annotations_enumerates_only_annotations() {
        let (o, model) = model_with_include();
        let anchors: Vec<_> = model.annotations().map(|a| a.query_source().cloned()).collect();
        assert_eq!(anchors, vec![Some(o)]);
        assert_eq!(model.include_directives().count(), 1);
        assert_eq!(model.result_operators().len(), 2);
    }

    #[test]
    fn test_into_shared_links_back_reference() {
        let (_, model) = model_with_include();
        let shared = model.into_shared();

        let guard = shared.read();
        let annotation = guard.annotations().next().unwrap();
        let owner = annotation.query_model().unwrap();
        assert!(Arc::ptr_eq(&owner, &shared));
    }

    #[test]
    fn test_back_reference_does_not_keep_model_alive() {
        let (_, model) = model_with_include();
        let shared = model.into_shared();
        let include = shared
            .read()
            .include_directives()
            .next()
            .unwrap()
            .clone_operator(&CloneContext::new());
        assert!(include.as_annotation().unwrap().query_model().is_none());

        let weak = Arc::downgrade(&shared);
        drop(shared);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_clone_model_links_copy() {
        let (o, model) = model_with_include();
        let original = model.into_shared();

        let mut context = CloneContext::new();
        let copy = original.read().clone_model(&mut context);

        let copy_guard = copy.read();
        assert_ne!(copy_guard.main_source(), &o);
        assert_eq!(context.query_source_mapping().get(&o), Some(copy_guard.main_source()));

        let annotation = copy_guard.annotations().next().unwrap();
        assert!(Arc::ptr_eq(&annotation.query_model().unwrap(), &copy));
        // Include directives keep their anchor identity across clones.
        assert_eq!(annotation.query_source(), Some(&o));

        let original_guard = original.read();
        let original_include = original_guard.include_directives().next().unwrap();
        assert!(Arc::ptr_eq(&original_include.query_model().unwrap(), &original));
        assert_eq!(copy_guard.to_string(), original_guard.to_string());
    }

    #[test]
    fn test_reanchor_annotations() {
        let (o, model) = model_with_include();
        let mut context = CloneContext::new();
        let copy = model.clone_model(&mut context);

        let reanchored = copy.write().reanchor_annotations(&context);
        assert_eq!(reanchored, 1);

        let guard = copy.read();
        let anchor = guard.annotations().next().unwrap().query_source().cloned();
        assert_eq!(anchor.as_ref(), Some(guard.main_source()));
        assert_ne!(anchor, Some(o));
    }

    #[test]
    fn test_transform_skips_includes() {
        let (_, mut model) = model_with_include();
        let before = model.include_directives().next().unwrap().to_string();

        let mut calls = 0;
        model.transform_expressions(&mut |expr| {
            calls += 1;
            match expr {
                Expr::Parameter(_) => Expr::constant(1),
                other => other.clone(),
            }
        });

        assert_eq!(calls, 1);
        assert_eq!(model.include_directives().next().unwrap().to_string(), before);
        assert_eq!(model.to_string(), "from Order o => Include(Customer.Address) => Take(1)");
    }

    #[test]
    fn test_push_boxed_operator() {
        let o = QuerySource::new("o", "Order");
        let mut model = QueryModel::new(o.clone());
        let boxed: Box<dyn ResultOperator> =
            Box::new(IncludeDirective::named("Customer", Expr::source(&o)).unwrap());
        model.push_result_operator(boxed);
        assert_eq!(model.include_directives().count(), 1);
        assert_eq!(model.to_string(), "from Order o => Include(Customer)");
    }

    #[test]
    fn test_execute_in_memory() {
        let o = QuerySource::new("o", "Order");
        let mut model = QueryModel::new(o.clone());
        model.add_result_operator(IncludeDirective::typed(
            crate::expr::MemberAccess::new(Expr::source(&o), order_lines()),
            Expr::source(&o),
        ));
        model.add_result_operator(TakeOperator::new(Expr::constant(1)));

        let input = StreamedSequence::new("Order", vec![json!({"id": 1}), json!({"id": 2})]);
        let output = model.execute_in_memory(input).unwrap();
        assert_eq!(output.items, vec![json!({"id": 1})]);
    }
}
