//! # Anchorage
//!
//! Eager-load Include directives for logical ORM query plans.
//!
//! Anchorage provides:
//! - Include directives addressed by typed member accesses or dotted strings
//! - Resolution of the query source a navigation path is anchored to
//! - Plan operator and annotation contracts for cloning and rewriting plans
//!
//! ## Quick Start
//!
//! ```rust
//! use anchorage::prelude::*;
//!
//! let o = QuerySource::new("o", "Order");
//! let mut model = QueryModel::new(o.clone());
//!
//! let mut include = IncludeDirective::named("Customer", Expr::source(&o))?;
//! include.append_chain([NavigationMember::new("Customer", "Address", "Address")]);
//! model.add_result_operator(include);
//!
//! let model = model.into_shared();
//! let guard = model.read();
//! let include = guard.include_directives().next().unwrap();
//! assert_eq!(include.query_source(), Some(&o));
//! assert_eq!(include.to_string(), "Include(Customer.Address)");
//! # Ok::<(), anchorage::QueryError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Query plans, expressions and Include directives.
pub mod query {
    pub use anchorage_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::{
        CloneContext, Expr, IncludeDirective, MemberAccess, NavigationMember, NavigationPath,
        QueryAnnotation, QueryModel, QuerySource, ResultOperator, StreamedSequence,
        TakeOperator, resolve_query_source,
    };
}

// Re-export key types at the crate root
pub use query::{ErrorCode, QueryError, QueryResult};
