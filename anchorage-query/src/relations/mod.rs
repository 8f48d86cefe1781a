//! Relation loading directives attached to query plans.
//!
//! An [`IncludeDirective`] asks the translator to eager-load a navigation of a
//! query source alongside the query results:
//! - a typed [`NavigationPath::Typed`] member access (`o.Customer`), or
//! - a dotted [`NavigationPath::Named`] string (`"Customer.Address"`),
//! - followed by any number of chained hops added by `ThenInclude`.
//!
//! ## Example
//!
//! ```rust
//! use anchorage_query::expr::{Expr, MemberAccess, NavigationMember};
//! use anchorage_query::relations::IncludeDirective;
//! use anchorage_query::QuerySource;
//!
//! let c = QuerySource::new("c", "Customer");
//!
//! // Include(c => c.Orders).ThenInclude(o => o.OrderLines)
//! let orders = MemberAccess::new(
//!     Expr::source(&c),
//!     NavigationMember::new("Customer", "Orders", "Order"),
//! );
//! let mut include = IncludeDirective::typed(orders, Expr::source(&c));
//! include.append_chain([NavigationMember::new("Order", "OrderLines", "OrderLine")]);
//!
//! assert_eq!(include.to_string(), "Include([c].Orders.OrderLines)");
//! ```

mod include;
mod navigation;

pub use include::IncludeDirective;
pub use navigation::{ChainedHops, NamedPath, NavigationPath};
