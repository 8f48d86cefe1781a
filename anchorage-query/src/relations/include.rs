//! Include directives for eager loading relations.

use std::any::Any;
use std::fmt;

use smallvec::SmallVec;

use super::navigation::{ChainedHops, NavigationPath};
use crate::anchorage_trace;
use crate::error::{QueryError, QueryResult};
use crate::expr::{Expr, MemberAccess, NavigationMember, QuerySource, resolve_query_source};
use crate::plan::{
    CloneContext, QueryAnnotation, QueryModelRef, ResultOperator, SharedQueryModel,
    StreamedSequence,
};

/// Instructs the translator to eager-load a navigation for a query source.
///
/// The anchoring query source is resolved once, when the directive is built,
/// from the `path_from_query_source` expression. Further `ThenInclude` levels
/// are added with [`append_chain`](Self::append_chain), which is the only way
/// the directive changes after construction apart from the plan engine
/// re-anchoring it or assigning its owning model.
///
/// Cloning keeps the navigation path and anchor, copies the chained hops and
/// leaves the owning-model back-reference unset for the plan engine to assign.
///
/// ```rust
/// use anchorage_query::expr::{Expr, NavigationMember};
/// use anchorage_query::plan::QueryAnnotation;
/// use anchorage_query::relations::IncludeDirective;
/// use anchorage_query::QuerySource;
///
/// let o = QuerySource::new("o", "Order");
/// let mut include = IncludeDirective::named("Orders", Expr::source(&o))?;
/// include.append_chain([NavigationMember::new("Order", "OrderLines", "OrderLine")]);
///
/// assert_eq!(include.query_source(), Some(&o));
/// assert_eq!(include.to_string(), "Include(Orders.OrderLines)");
/// # Ok::<(), anchorage_query::QueryError>(())
/// ```
#[derive(Debug)]
pub struct IncludeDirective {
    navigation: NavigationPath,
    path_from_query_source: Expr,
    query_source: Option<QuerySource>,
    chained: ChainedHops,
    query_model: Option<QueryModelRef>,
}

impl IncludeDirective {
    /// Create a directive for an already built navigation path.
    ///
    /// String paths can only come from [`NavigationPath::named`], so they have
    /// been validated and normalized before they reach a directive.
    pub fn new(navigation: NavigationPath, path_from_query_source: Expr) -> Self {
        let query_source = resolve_query_source(&path_from_query_source);

        anchorage_trace!(
            navigation = %navigation,
            typed = navigation.is_typed(),
            anchored = query_source.is_some(),
            "Created include directive"
        );

        Self {
            navigation,
            path_from_query_source,
            query_source,
            chained: SmallVec::new(),
            query_model: None,
        }
    }

    /// Create a directive for a typed member access.
    pub fn typed(navigation: MemberAccess, path_from_query_source: Expr) -> Self {
        Self::new(NavigationPath::typed(navigation), path_from_query_source)
    }

    /// Create a directive for a dotted string path.
    ///
    /// Fails with an invalid argument error if the path is blank or has an
    /// empty segment.
    pub fn named(
        navigation: impl AsRef<str>,
        path_from_query_source: Expr,
    ) -> QueryResult<Self> {
        let navigation = NavigationPath::named(navigation)
            .map_err(|e| e.with_context("Creating include directive"))?;
        Ok(Self::new(navigation, path_from_query_source))
    }

    /// The primary navigation path.
    pub fn navigation(&self) -> &NavigationPath {
        &self.navigation
    }

    /// The typed primary navigation, if the directive was built from one.
    pub fn navigation_property_path(&self) -> Option<&MemberAccess> {
        self.navigation.as_typed()
    }

    /// The string primary navigation, if the directive was built from one.
    pub fn string_navigation_path(&self) -> Option<&str> {
        self.navigation.as_named()
    }

    /// The expression the anchor was resolved from.
    pub fn path_from_query_source(&self) -> &Expr {
        &self.path_from_query_source
    }

    /// Replace the anchoring expression.
    ///
    /// The anchor is not resolved again; build a new directive when it must
    /// follow the new expression.
    pub fn set_path_from_query_source(&mut self, path: Expr) {
        self.path_from_query_source = path;
    }

    /// The additional hops appended after the primary navigation.
    pub fn chained_navigation(&self) -> &[NavigationMember] {
        &self.chained
    }

    /// Append hops to the chain, after any existing ones.
    pub fn append_chain(&mut self, hops: impl IntoIterator<Item = NavigationMember>) {
        let before = self.chained.len();
        self.chained.extend(hops);

        if self.chained.len() != before {
            anchorage_trace!(
                navigation = %self.navigation,
                appended = self.chained.len() - before,
                depth = self.chained.len(),
                "Extended include chain"
            );
        }
    }

    /// Every navigation name addressed by the directive, outermost first.
    pub fn navigation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.navigation.segments().into_iter().collect();
        names.extend(self.chained.iter().map(NavigationMember::name));
        names
    }

    /// The anchor, or an [`UnanchoredInclude`](crate::ErrorCode::UnanchoredInclude)
    /// error for translators that cannot handle unanchored directives.
    pub fn require_anchor(&self) -> QueryResult<&QuerySource> {
        self.query_source
            .as_ref()
            .ok_or_else(|| QueryError::unanchored_include(self.to_string()))
    }

    /// Render the directive, e.g. `Include(Orders.OrderLines)`.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl Clone for IncludeDirective {
    fn clone(&self) -> Self {
        anchorage_trace!(
            navigation = %self.navigation,
            depth = self.chained.len(),
            "Cloned include directive"
        );

        Self {
            navigation: self.navigation.clone(),
            path_from_query_source: self.path_from_query_source.clone(),
            query_source: self.query_source.clone(),
            chained: self.chained.clone(),
            query_model: None,
        }
    }
}

impl ResultOperator for IncludeDirective {
    /// Include directives keep their anchor: the mapping in `context` is not
    /// applied. Use [`QueryModel::reanchor_annotations`](crate::plan::QueryModel::reanchor_annotations)
    /// to move them onto cloned sources.
    fn clone_operator(&self, _context: &CloneContext) -> Box<dyn ResultOperator> {
        Box::new(self.clone())
    }

    /// No-op. The anchor was resolved at construction and navigation paths
    /// are not rewritable expressions, unlike the expressions held by other
    /// result operators.
    fn transform_expressions(&mut self, _transformation: &mut dyn FnMut(&Expr) -> Expr) {}

    /// Identity. Includes are turned into joins before in-memory execution.
    fn execute_in_memory(&self, input: StreamedSequence) -> QueryResult<StreamedSequence> {
        Ok(input)
    }

    fn as_annotation(&self) -> Option<&dyn QueryAnnotation> {
        Some(self)
    }

    fn as_annotation_mut(&mut self) -> Option<&mut dyn QueryAnnotation> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl QueryAnnotation for IncludeDirective {
    fn query_source(&self) -> Option<&QuerySource> {
        self.query_source.as_ref()
    }

    fn set_query_source(&mut self, source: Option<QuerySource>) {
        self.query_source = source;
    }

    fn query_model(&self) -> Option<SharedQueryModel> {
        self.query_model.as_ref().and_then(|model| model.upgrade())
    }

    fn set_query_model(&mut self, model: Option<QueryModelRef>) {
        self.query_model = model;
    }
}

impl fmt::Display for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Include({}", self.navigation)?;
        for hop in &self.chained {
            write!(f, ".{}", hop.name)?;
        }
        f.write_str(")")
    }
}
