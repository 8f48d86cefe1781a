//! # anchorage-query
//!
//! Eager-load Include directives for logical query plans.
//!
//! This crate provides:
//! - An immutable expression model (`expr`) and the resolver that finds the
//!   query source a navigation path originates from
//! - Include directives with typed or dotted-string navigation paths and
//!   `ThenInclude` chains (`relations`)
//! - The result operator and plan annotation contracts a plan engine uses to
//!   clone, rewrite and enumerate directives (`plan`)
//! - Structured logging configured from the environment (`logging`)
//!
//! ## Include Directives
//!
//! ```rust
//! use anchorage_query::{Expr, IncludeDirective, NavigationMember, QuerySource};
//!
//! let o = QuerySource::new("o", "Order");
//!
//! let mut include = IncludeDirective::named("Orders", Expr::source(&o))?;
//! include.append_chain([NavigationMember::new("Order", "OrderLines", "OrderLine")]);
//! assert_eq!(include.to_string(), "Include(Orders.OrderLines)");
//!
//! // Clones own their chain.
//! let mut copy = include.clone();
//! copy.append_chain([NavigationMember::new("OrderLine", "Product", "Product")]);
//! assert_eq!(include.chained_navigation().len(), 1);
//! assert_eq!(copy.chained_navigation().len(), 2);
//! # Ok::<(), anchorage_query::QueryError>(())
//! ```
//!
//! ## Query Source Resolution
//!
//! ```rust
//! use anchorage_query::{resolve_query_source, Expr, NavigationMember, QuerySource};
//!
//! let c = QuerySource::new("c", "Customer");
//! let address = Expr::member(
//!     Expr::convert(Expr::source(&c), "ICustomer"),
//!     NavigationMember::new("Customer", "Address", "Address"),
//! );
//!
//! assert_eq!(resolve_query_source(&address), Some(c));
//! assert_eq!(resolve_query_source(&Expr::constant(1)), None);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use anchorage_query::{ErrorCode, Expr, IncludeDirective};
//!
//! let err = IncludeDirective::named("Orders..Lines", Expr::constant(0)).unwrap_err();
//! assert_eq!(err.code, ErrorCode::EmptyNavigationPath);
//! ```

pub mod error;
pub mod expr;
pub mod logging;
pub mod plan;
pub mod relations;

pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use expr::{Expr, MemberAccess, NavigationMember, QuerySource, resolve_query_source};
pub use plan::{
    CloneContext, QueryAnnotation, QueryModel, QueryModelRef, QuerySourceMapping,
    ResultOperator, SharedQueryModel, StreamedSequence, TakeOperator,
};
pub use relations::{ChainedHops, IncludeDirective, NamedPath, NavigationPath};
