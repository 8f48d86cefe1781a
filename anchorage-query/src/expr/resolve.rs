//! Resolution of the query source an expression originates from.

use super::{Expr, QuerySource};

/// Find the query source `expr` is rooted at.
///
/// A query-source reference resolves to its source. A member access resolves
/// to whatever its receiver resolves to, looking through conversions on the
/// receiver. Anything else has no anchor and yields `None`.
///
/// ```rust
/// use anchorage_query::expr::{resolve_query_source, Expr, NavigationMember};
/// use anchorage_query::QuerySource;
///
/// let o = QuerySource::new("o", "Order");
/// let customer = NavigationMember::new("Order", "Customer", "Customer");
///
/// let path = Expr::member(Expr::convert(Expr::source(&o), "IOrder"), customer);
/// assert_eq!(resolve_query_source(&path), Some(o));
/// assert_eq!(resolve_query_source(&Expr::constant(1)), None);
/// ```
pub fn resolve_query_source(expr: &Expr) -> Option<QuerySource> {
    let mut current = expr;
    loop {
        match current {
            Expr::QuerySourceRef(source) => return Some(source.clone()),
            Expr::Member(access) => current = access.receiver().strip_convert(),
            _ => return None,
        }
    }
}
