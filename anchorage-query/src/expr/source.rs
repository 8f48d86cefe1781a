//! Query-source identities.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smol_str::SmolStr;

#[derive(Debug)]
struct QuerySourceData {
    item_name: SmolStr,
    item_type: SmolStr,
}

/// A binding point in a query plan that produces a sequence of entities.
///
/// Roughly the `FROM o IN Orders` of a query. Equality and hashing are by
/// identity: two sources with the same name and type are still distinct unless
/// one is a clone of the other handle.
///
/// ```rust
/// use anchorage_query::QuerySource;
///
/// let a = QuerySource::new("o", "Order");
/// let b = QuerySource::new("o", "Order");
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Clone)]
pub struct QuerySource(Arc<QuerySourceData>);

impl QuerySource {
    /// Create a new, distinct query source.
    pub fn new(item_name: impl Into<SmolStr>, item_type: impl Into<SmolStr>) -> Self {
        Self(Arc::new(QuerySourceData {
            item_name: item_name.into(),
            item_type: item_type.into(),
        }))
    }

    /// The name the source binds its items to.
    #[inline]
    pub fn item_name(&self) -> &str {
        &self.0.item_name
    }

    /// The entity type produced by the source.
    #[inline]
    pub fn item_type(&self) -> &str {
        &self.0.item_type
    }

    /// Create a fresh source with the same name and type but a new identity.
    pub fn duplicate(&self) -> Self {
        Self::new(self.0.item_name.clone(), self.0.item_type.clone())
    }
}

impl PartialEq for QuerySource {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for QuerySource {}

impl Hash for QuerySource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuerySource({}: {})", self.0.item_name, self.0.item_type)
    }
}

impl fmt::Display for QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.item_name)
    }
}
