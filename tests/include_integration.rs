//! Integration tests for Include directives.
//!
//! These tests cover the directive lifecycle as a plan engine drives it:
//! - Construction in typed and string mode
//! - Anchor resolution through member accesses and conversions
//! - Chain extension for nested includes
//! - Cloning and chain isolation

use anchorage::prelude::*;
use anchorage::{ErrorCode, QueryError};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

fn member(declaring: &str, name: &str, target: &str) -> NavigationMember {
    NavigationMember::new(declaring, name, target)
}

/// Include("Orders").ThenInclude("OrderLines") anchored at `o`
#[test]
fn test_string_path_with_chain() {
    let o = QuerySource::new("o", "Customer");
    let mut include = IncludeDirective::named("Orders", Expr::source(&o)).unwrap();
    include.append_chain([member("Order", "OrderLines", "OrderLine")]);

    assert_eq!(include.query_source(), Some(&o));
    assert_snapshot!(include.to_display_string(), @"Include(Orders.OrderLines)");
}

/// Typed Customer.Address with no chain
#[test]
fn test_typed_path_without_chain() {
    let c = QuerySource::new("c", "Customer");
    let address = MemberAccess::new(Expr::source(&c), member("Customer", "Address", "Address"));
    let include = IncludeDirective::typed(address, Expr::source(&c));

    assert_eq!(include.query_source(), Some(&c));
    assert!(include.chained_navigation().is_empty());
    assert_snapshot!(include.to_display_string(), @"Include([c].Address)");
}

/// Anchor found through a nested member chain with conversions
#[test]
fn test_anchor_through_member_chain() {
    let o = QuerySource::new("o", "Order");
    let customer = Expr::member(
        Expr::convert(Expr::source(&o), "IOrder"),
        member("Order", "Customer", "Customer"),
    );
    let address = Expr::member(
        Expr::convert(customer.clone(), "ICustomer"),
        member("Customer", "Address", "Address"),
    );

    let include = IncludeDirective::named("Country", address).unwrap();
    assert_eq!(include.query_source(), Some(&o));
}

/// Constant anchor expressions leave the directive unanchored but usable
#[test]
fn test_constant_anchor() {
    let mut include = IncludeDirective::named("Orders", Expr::constant("orders")).unwrap();
    assert!(include.query_source().is_none());

    include.append_chain([member("Order", "OrderLines", "OrderLine")]);
    assert_snapshot!(include.to_string(), @"Include(Orders.OrderLines)");

    let err: QueryError = include.require_anchor().unwrap_err();
    assert_eq!(err.code, ErrorCode::UnanchoredInclude);
}

/// D1 append [A], clone to D2, append [B] to D2 only
#[test]
fn test_clone_then_append() {
    let o = QuerySource::new("o", "Order");
    let a = member("Order", "A", "A");
    let b = member("A", "B", "B");

    let mut d1 = IncludeDirective::named("Orders", Expr::source(&o)).unwrap();
    d1.append_chain([a.clone()]);

    let mut d2 = d1.clone();
    d2.append_chain([b.clone()]);

    assert_eq!(d1.chained_navigation(), &[a.clone()]);
    assert_eq!(d2.chained_navigation(), &[a, b]);
    assert_eq!(d1.query_source(), d2.query_source());
    assert_eq!(d1.string_navigation_path(), d2.string_navigation_path());
}

/// Appending in pieces matches appending at once
#[test]
fn test_append_is_order_preserving() {
    let o = QuerySource::new("o", "Order");
    let hops = [
        member("Order", "OrderLines", "OrderLine"),
        member("OrderLine", "Product", "Product"),
        member("Product", "Supplier", "Supplier"),
    ];

    let mut piecewise = IncludeDirective::named("Orders", Expr::source(&o)).unwrap();
    for hop in hops.iter().cloned() {
        piecewise.append_chain([hop]);
    }

    let mut at_once = IncludeDirective::named("Orders", Expr::source(&o)).unwrap();
    at_once.append_chain(hops.iter().cloned());

    assert_eq!(piecewise.chained_navigation(), at_once.chained_navigation());
    assert_eq!(piecewise.to_string(), at_once.to_string());
}

/// Malformed string paths are rejected at construction
#[test]
fn test_invalid_string_paths() {
    let o = QuerySource::new("o", "Order");

    for path in ["", "   ", ".Orders", "Orders.", "Orders..Lines"] {
        let err = IncludeDirective::named(path, Expr::source(&o)).unwrap_err();
        assert!(err.is_invalid_argument(), "{path:?} was accepted");
    }
}

/// Errors render with their context
#[test]
fn test_error_display() {
    let err = IncludeDirective::named("Orders..Lines", Expr::constant(0)).unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @r#"[A1002] Navigation path "Orders..Lines" contains an empty segment"#
    );
}

/// String paths are stored with whitespace around segments removed
#[test]
fn test_string_path_is_normalized() {
    let o = QuerySource::new("o", "Order");
    let mut include = IncludeDirective::named(" Orders . Lines ", Expr::source(&o)).unwrap();
    include.append_chain([member("OrderLine", "Product", "Product")]);

    assert_eq!(include.string_navigation_path(), Some("Orders.Lines"));
    assert_eq!(include.navigation_names(), vec!["Orders", "Lines", "Product"]);
    assert_snapshot!(include.to_string(), @"Include(Orders.Lines.Product)");
}
