//! Navigation paths addressed by Include directives.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::{QueryError, QueryResult};
use crate::expr::{MemberAccess, NavigationMember};

/// Additional relationship hops beyond the primary navigation, in nesting order.
///
/// Most `ThenInclude` chains are shallow, so a few hops are stored inline.
pub type ChainedHops = SmallVec<[NavigationMember; 4]>;

/// A validated dotted path of navigation names.
///
/// Only [`NavigationPath::named`] builds one, so every `NamedPath` is
/// non-blank, has no empty segments and has whitespace around its segments
/// removed.
///
/// ```compile_fail
/// use anchorage_query::relations::{NamedPath, NavigationPath};
///
/// let path = NavigationPath::Named(NamedPath("".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedPath(SmolStr);

impl NamedPath {
    /// The normalized path text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The navigation names, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for NamedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The relationship an Include directive starts from.
///
/// Either a typed member access (`o.Customer`) or a dotted string
/// (`"Customer.Address"`) whose segments are matched against entity metadata
/// by the translator. Both payloads are immutable and cheap to clone: the
/// typed form is shared through `Arc`, the string form is a [`NamedPath`].
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationPath {
    /// A strongly typed member access.
    Typed(Arc<MemberAccess>),
    /// A dotted path of navigation names.
    Named(NamedPath),
}

impl NavigationPath {
    /// Create a typed path.
    pub fn typed(access: MemberAccess) -> Self {
        Self::Typed(Arc::new(access))
    }

    /// Create a string path.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`](crate::ErrorCode::InvalidArgument)
    /// for an empty or blank path and with
    /// [`ErrorCode::EmptyNavigationPath`](crate::ErrorCode::EmptyNavigationPath)
    /// when a segment between dots is empty. Whitespace around segments is
    /// dropped, so `" Orders . Lines "` is stored as `"Orders.Lines"`.
    pub fn named(path: impl AsRef<str>) -> QueryResult<Self> {
        let path = path.as_ref();
        if path.trim().is_empty() {
            return Err(QueryError::invalid_argument(
                "navigation_path",
                "must not be empty",
            ));
        }

        let segments: SmallVec<[&str; 4]> = path.split('.').map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(QueryError::empty_navigation_path(path));
        }
        Ok(Self::Named(NamedPath(SmolStr::new(segments.join(".")))))
    }

    /// The typed member access, if this is a typed path.
    pub fn as_typed(&self) -> Option<&MemberAccess> {
        match self {
            Self::Typed(access) => Some(&**access),
            Self::Named(_) => None,
        }
    }

    /// The string path, if this is a string path.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Typed(_) => None,
            Self::Named(path) => Some(path.as_str()),
        }
    }

    /// Check if this is a typed path.
    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }

    /// Navigation names addressed by the path, outermost first.
    pub fn segments(&self) -> SmallVec<[&str; 4]> {
        match self {
            Self::Typed(access) => SmallVec::from_elem(access.member().name(), 1),
            Self::Named(path) => path.segments().collect(),
        }
    }
}

impl fmt::Display for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(access) => write!(f, "{}", access),
            Self::Named(path) => write!(f, "{}", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::expr::Expr;
    use crate::QuerySource;

    #[test]
    fn test_named_validation() {
        assert!(NavigationPath::named("Orders").is_ok());
        assert!(NavigationPath::named("Orders.OrderLines").is_ok());

        let blank = NavigationPath::named("  ").unwrap_err();
        assert_eq!(blank.code, ErrorCode::InvalidArgument);

        let gap = NavigationPath::named("Orders..OrderLines").unwrap_err();
        assert_eq!(gap.code, ErrorCode::EmptyNavigationPath);

        let trailing = NavigationPath::named("Orders.").unwrap_err();
        assert_eq!(trailing.code, ErrorCode::EmptyNavigationPath);
    }

    #[test]
    fn test_mode_accessors() {
        let c = QuerySource::new("c", "Customer");
        let typed = NavigationPath::typed(MemberAccess::new(
            Expr::source(&c),
            NavigationMember::new("Customer", "Address", "Address"),
        ));
        assert!(typed.is_typed());
        assert!(typed.as_named().is_none());
        assert_eq!(typed.as_typed().unwrap().member().name(), "Address");
        assert_eq!(typed.to_string(), "[c].Address");

        let named = NavigationPath::named("Orders").unwrap();
        assert!(!named.is_typed());
        assert!(named.as_typed().is_none());
        assert_eq!(named.as_named(), Some("Orders"));
        assert_eq!(named.to_string(), "Orders");
    }

    #[test]
    fn test_named_is_normalized() {
        let named = NavigationPath::named(" Orders . OrderLines ").unwrap();
        assert_eq!(named.as_named(), Some("Orders.OrderLines"));
        assert_eq!(named.to_string(), "Orders.OrderLines");
        assert_eq!(named.segments().as_slice(), &["Orders", "OrderLines"]);
        assert_eq!(named, NavigationPath::named("Orders.OrderLines").unwrap());
    }

    #[test]
    fn test_segments() {
        let named = NavigationPath::named("Orders.OrderLines.Product").unwrap();
        assert_eq!(named.segments().as_slice(), &["Orders", "OrderLines", "Product"]);

        let c = QuerySource::new("c", "Customer");
        let typed = NavigationPath::typed(MemberAccess::new(
            Expr::source(&c),
            NavigationMember::new("Customer", "Orders", "Order"),
        ));
        assert_eq!(typed.segments().as_slice(), &["Orders"]);
    }
}
