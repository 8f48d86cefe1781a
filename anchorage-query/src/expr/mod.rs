//! Expression trees attached to query plans.
//!
//! Expressions are immutable once built. Child nodes are shared through `Arc`,
//! so cloning an expression or a plan operator holding one never copies the
//! tree itself.
//!
//! ## Example
//!
//! ```rust
//! use anchorage_query::expr::{Expr, NavigationMember};
//! use anchorage_query::QuerySource;
//!
//! let c = QuerySource::new("c", "Customer");
//! let address = NavigationMember::new("Customer", "Address", "Address");
//!
//! // c.Address
//! let path = Expr::member(Expr::source(&c), address);
//! assert_eq!(path.to_string(), "[c].Address");
//! ```

mod resolve;
mod source;

pub use resolve::resolve_query_source;
pub use source::QuerySource;

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A relationship member on an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationMember {
    /// The entity type declaring the member.
    pub declaring_type: SmolStr,
    /// Name of the member.
    pub name: SmolStr,
    /// The entity (or collection element) type the member points at.
    pub target_type: SmolStr,
}

impl NavigationMember {
    /// Create a new navigation member.
    pub fn new(
        declaring_type: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        target_type: impl Into<SmolStr>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            target_type: target_type.into(),
        }
    }

    /// Name of the member.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NavigationMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Access of a member on a receiver expression (`receiver.Member`).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    receiver: Arc<Expr>,
    member: NavigationMember,
}

impl MemberAccess {
    /// Create a member access.
    pub fn new(receiver: Expr, member: NavigationMember) -> Self {
        Self {
            receiver: Arc::new(receiver),
            member,
        }
    }

    /// The expression the member is read from.
    #[inline]
    pub fn receiver(&self) -> &Expr {
        &self.receiver
    }

    /// The accessed member.
    #[inline]
    pub fn member(&self) -> &NavigationMember {
        &self.member
    }
}

impl fmt::Display for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.member.name)
    }
}

/// A node in an expression tree.
///
/// Resolving, [`depth`](Self::depth) and dropping walk the tree without
/// recursion. [`remap_sources`](Self::remap_sources), `Display`, `Debug` and
/// `PartialEq` recurse once per level and need a stack large enough for the
/// deepest tree they are given.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Constant(serde_json::Value),
    /// A named lambda or query parameter.
    Parameter(SmolStr),
    /// A reference to the items of a query source.
    QuerySourceRef(QuerySource),
    /// A member access.
    Member(MemberAccess),
    /// A representation-only type conversion.
    Convert {
        /// The converted expression.
        operand: Arc<Expr>,
        /// The type converted to.
        target_type: SmolStr,
    },
    /// A method call.
    Call {
        /// Method name.
        method: SmolStr,
        /// Arguments, receiver first for instance methods.
        args: Vec<Arc<Expr>>,
    },
}

impl Expr {
    /// Create a constant.
    pub fn constant(value: impl Into<serde_json::Value>) -> Self {
        Self::Constant(value.into())
    }

    /// Create a parameter reference.
    pub fn parameter(name: impl Into<SmolStr>) -> Self {
        Self::Parameter(name.into())
    }

    /// Create a reference to a query source.
    pub fn source(source: &QuerySource) -> Self {
        Self::QuerySourceRef(source.clone())
    }

    /// Create a member access on `receiver`.
    pub fn member(receiver: Expr, member: NavigationMember) -> Self {
        Self::Member(MemberAccess::new(receiver, member))
    }

    /// Wrap `operand` in a type conversion.
    pub fn convert(operand: Expr, target_type: impl Into<SmolStr>) -> Self {
        Self::Convert {
            operand: Arc::new(operand),
            target_type: target_type.into(),
        }
    }

    /// Create a method call.
    pub fn call(method: impl Into<SmolStr>, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call {
            method: method.into(),
            args: args.into_iter().map(Arc::new).collect(),
        }
    }

    /// Remove any number of conversion wrappers.
    pub fn strip_convert(&self) -> &Expr {
        let mut current = self;
        while let Self::Convert { operand, .. } = current {
            current = &**operand;
        }
        current
    }

    /// Depth of the tree, counting this node.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut pending: Vec<(&Expr, usize)> = vec![(self, 1)];
        while let Some((expr, level)) = pending.pop() {
            depth = depth.max(level);
            match expr {
                Self::Constant(_) | Self::Parameter(_) | Self::QuerySourceRef(_) => {}
                Self::Member(access) => pending.push((access.receiver(), level + 1)),
                Self::Convert { operand, .. } => pending.push((&**operand, level + 1)),
                Self::Call { args, .. } => {
                    pending.extend(args.iter().map(|arg| (&**arg, level + 1)));
                }
            }
        }
        depth
    }

    /// Move the children of this node onto `pending`, leaving a shared leaf
    /// in their place.
    fn detach_children(&mut self, pending: &mut Vec<Arc<Expr>>) {
        match self {
            Self::Member(access) => pending.push(mem::replace(&mut access.receiver, detached())),
            Self::Convert { operand, .. } => pending.push(mem::replace(operand, detached())),
            Self::Call { args, .. } => pending.append(args),
            Self::Constant(_) | Self::Parameter(_) | Self::QuerySourceRef(_) => {}
        }
    }

    /// Rebuild the tree with every query-source reference found in `mapping`
    /// replaced by its mapped source. Unmapped sources are kept.
    pub fn remap_sources(&self, mapping: &HashMap<QuerySource, QuerySource>) -> Expr {
        match self {
            Self::QuerySourceRef(source) => {
                Self::QuerySourceRef(mapping.get(source).unwrap_or(source).clone())
            }
            Self::Member(access) => Self::Member(MemberAccess {
                receiver: Arc::new(access.receiver.remap_sources(mapping)),
                member: access.member.clone(),
            }),
            Self::Convert {
                operand,
                target_type,
            } => Self::Convert {
                operand: Arc::new(operand.remap_sources(mapping)),
                target_type: target_type.clone(),
            },
            Self::Call { method, args } => Self::Call {
                method: method.clone(),
                args: args
                    .iter()
                    .map(|a| Arc::new(a.remap_sources(mapping)))
                    .collect(),
            },
            Self::Constant(_) | Self::Parameter(_) => self.clone(),
        }
    }
}

/// Leaf swapped in for children taken apart by `Drop`.
fn detached() -> Arc<Expr> {
    static DETACHED: OnceLock<Arc<Expr>> = OnceLock::new();
    DETACHED
        .get_or_init(|| Arc::new(Expr::Constant(serde_json::Value::Null)))
        .clone()
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        // Nodes still shared elsewhere only lose a reference here.
        while let Some(child) = pending.pop() {
            if let Ok(mut expr) = Arc::try_unwrap(child) {
                expr.detach_children(&mut pending);
            }
        }
    }
}

impl From<MemberAccess> for Expr {
    fn from(access: MemberAccess) -> Self {
        Self::Member(access)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{}", value),
            Self::Parameter(name) => f.write_str(name),
            Self::QuerySourceRef(source) => write!(f, "[{}]", source),
            Self::Member(access) => write!(f, "{}", access),
            Self::Convert {
                operand,
                target_type,
            } => write!(f, "Convert({}, {})", operand, target_type),
            Self::Call { method, args } => {
                write!(f, "{}(", method)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
