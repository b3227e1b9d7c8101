use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mpexpr::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const BINARY_KINDS: [ExprKind; 5] = [
    ExprKind::Add,
    ExprKind::Sub,
    ExprKind::Mul,
    ExprKind::Div,
    ExprKind::Pow,
];
const RELATIONAL_KINDS: [ExprKind; 6] = [
    ExprKind::Lt,
    ExprKind::Le,
    ExprKind::Eq,
    ExprKind::Ge,
    ExprKind::Gt,
    ExprKind::Ne,
];

fn build_simple_expr<'a>(factory: &'a ExprFactory<'a>) -> LogicalExpr<'a> {
    // sum(x[0]^2, 3 * x[1], abs(x[2])) <= 10 || x[0] = 1
    let x0 = factory.make_variable(0);
    let x1 = factory.make_variable(1);
    let x2 = factory.make_variable(2);

    let mut sum = factory.begin_sum(3).unwrap();
    sum.add_arg(factory.make_unary(ExprKind::Pow2, x0).unwrap()).unwrap();
    sum.add_arg(
        factory
            .make_binary(ExprKind::Mul, factory.make_numeric_constant(3.0), x1)
            .unwrap(),
    )
    .unwrap();
    sum.add_arg(factory.make_unary(ExprKind::Abs, x2).unwrap()).unwrap();
    let sum = factory.end_sum(sum).unwrap();

    let le = factory
        .make_relational(ExprKind::Le, sum, factory.make_numeric_constant(10.0))
        .unwrap();
    let eq = factory
        .make_relational(ExprKind::Eq, x0, factory.make_numeric_constant(1.0))
        .unwrap();
    factory
        .make_binary_logical(ExprKind::Or, le, eq)
        .unwrap()
        .into()
}

fn next_numeric<'a>(
    budget: usize,
    rng: &mut impl Rng,
    factory: &'a ExprFactory<'a>,
) -> NumericExpr<'a> {
    if budget == 0 || rng.random_bool(0.2) {
        // Select a leaf node randomly sampled uniformly
        return match rng.random_range(0..=1) {
            0 => factory
                .make_numeric_constant(rng.random_range(-10.0..10.0))
                .into(),
            _ => factory.make_variable(rng.random_range(0..64)).into(),
        };
    }

    match rng.random_range(0..=4) {
        0 => {
            let kind = BINARY_KINDS[rng.random_range(0..BINARY_KINDS.len())];
            let lhs = next_numeric(budget - 1, rng, factory);
            let rhs = next_numeric(budget - 1, rng, factory);
            factory.make_binary(kind, lhs, rhs).unwrap().into()
        }
        1 => {
            let arg = next_numeric(budget - 1, rng, factory);
            factory.make_unary(ExprKind::Minus, arg).unwrap().into()
        }
        2 => {
            let condition = next_logical(budget - 1, rng, factory);
            let then = next_numeric(budget - 1, rng, factory);
            let otherwise = next_numeric(budget - 1, rng, factory);
            factory.make_if(condition, then, otherwise).unwrap().into()
        }
        3 => {
            let n = rng.random_range(0..=4);
            let mut builder = factory.begin_sum(n).unwrap();
            for _ in 0..n {
                builder
                    .add_arg(next_numeric(budget - 1, rng, factory))
                    .unwrap();
            }
            factory.end_sum(builder).unwrap().into()
        }
        4 => {
            let n = rng.random_range(1..=3);
            let mut builder = factory.begin_vararg(ExprKind::Max, n).unwrap();
            for _ in 0..n {
                builder
                    .add_arg(next_numeric(budget - 1, rng, factory))
                    .unwrap();
            }
            factory.end_vararg(builder).unwrap().into()
        }
        _ => unreachable!(),
    }
}

fn next_logical<'a>(
    budget: usize,
    rng: &mut impl Rng,
    factory: &'a ExprFactory<'a>,
) -> LogicalExpr<'a> {
    if budget == 0 || rng.random_bool(0.2) {
        return factory.make_logical_constant(rng.random_bool(0.5)).into();
    }

    match rng.random_range(0..=2) {
        0 => {
            let kind = RELATIONAL_KINDS[rng.random_range(0..RELATIONAL_KINDS.len())];
            let lhs = next_numeric(budget - 1, rng, factory);
            let rhs = next_numeric(budget - 1, rng, factory);
            factory.make_relational(kind, lhs, rhs).unwrap().into()
        }
        1 => {
            let kind = if rng.random_bool(0.5) {
                ExprKind::And
            } else {
                ExprKind::Or
            };
            let lhs = next_logical(budget - 1, rng, factory);
            let rhs = next_logical(budget - 1, rng, factory);
            factory.make_binary_logical(kind, lhs, rhs).unwrap().into()
        }
        2 => {
            let arg = next_logical(budget - 1, rng, factory);
            factory.make_not(arg).unwrap().into()
        }
        _ => unreachable!(),
    }
}

fn build_complex_expr<'a>(factory: &'a ExprFactory<'a>) -> NumericExpr<'a> {
    // Seeded for determinism across runs.
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    next_numeric(10, &mut rng, factory)
}

fn count_nodes(expr: impl Into<Expr<'_>>) -> usize {
    let mut count = 0usize;
    walk_no_input(expr, |_| {
        count += 1;
        WalkControl::Continue
    });
    count
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_simple", |b| {
        b.iter(|| {
            let factory = ExprFactory::new();
            black_box(build_simple_expr(&factory).is_null());
        })
    });

    c.bench_function("build_complex", |b| {
        b.iter(|| {
            let factory = ExprFactory::new();
            black_box(build_complex_expr(&factory).is_null());
            black_box(factory.num_nodes());
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let factory = ExprFactory::new();
    let simple_expr = build_simple_expr(&factory);
    let complex_expr = build_complex_expr(&factory);

    c.bench_function("walk_count_simple", |b| {
        b.iter(|| black_box(count_nodes(simple_expr)))
    });

    c.bench_function("walk_count_complex", |b| {
        b.iter(|| black_box(count_nodes(complex_expr)))
    });
}

fn bench_compare(c: &mut Criterion) {
    let lhs = ExprFactory::new();
    let rhs = ExprFactory::new();
    let a = build_complex_expr(&lhs);
    let b = build_complex_expr(&rhs);

    c.bench_function("compare_complex", |bench| {
        bench.iter(|| black_box(compare_expressions(a, b)))
    });
}

fn bench_pretty(c: &mut Criterion) {
    let factory = ExprFactory::new();
    let complex_expr = build_complex_expr(&factory);

    c.bench_function("pretty_string_complex", |b| {
        b.iter(|| black_box(complex_expr.pretty_string()))
    });
}

criterion_group!(benches, bench_build, bench_walk, bench_compare, bench_pretty);
criterion_main!(benches);
