//! Benchmarks for Include directive construction, chaining and cloning.

use std::hint::black_box;

use anchorage_query::{Expr, IncludeDirective, NavigationMember, QuerySource, resolve_query_source};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn member_chain(source: &QuerySource, depth: usize) -> Expr {
    (0..depth).fold(Expr::source(source), |expr, i| {
        let receiver = if i % 2 == 0 {
            Expr::convert(expr, "Base")
        } else {
            expr
        };
        Expr::member(receiver, NavigationMember::new("Entity", "Next", "Entity"))
    })
}

// ============================================================================
// Resolution Benchmarks
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_query_source");
    let source = QuerySource::new("o", "Order");

    for depth in [1usize, 8, 64] {
        let expr = member_chain(&source, depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &expr, |b, expr| {
            b.iter(|| black_box(resolve_query_source(black_box(expr))))
        });
    }

    group.finish();
}

// ============================================================================
// Directive Benchmarks
// ============================================================================

fn bench_directive(c: &mut Criterion) {
    let mut group = c.benchmark_group("include_directive");
    let source = QuerySource::new("o", "Order");
    let hops: Vec<_> = ["OrderLines", "Product", "Supplier", "Address", "Country", "Region"]
        .into_iter()
        .map(|name| NavigationMember::new("Entity", name, "Entity"))
        .collect();

    group.bench_function("create_named", |b| {
        b.iter(|| black_box(IncludeDirective::named("Orders", Expr::source(&source))))
    });

    group.bench_function("append_chain", |b| {
        b.iter(|| {
            let mut include = IncludeDirective::named("Orders", Expr::source(&source)).unwrap();
            include.append_chain(hops.iter().cloned());
            black_box(include)
        })
    });

    let mut include = IncludeDirective::named("Orders", Expr::source(&source)).unwrap();
    include.append_chain(hops.iter().cloned());

    group.bench_function("clone_chained", |b| b.iter(|| black_box(include.clone())));
    group.bench_function("display_chained", |b| b.iter(|| black_box(include.to_string())));

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_directive);
criterion_main!(benches);
