use mpexpr::prelude::*;

/// `x[0] + 2 * x[1]`
fn linear<'a>(factory: &'a ExprFactory<'a>) -> BinaryExpr<'a> {
    let x0 = factory.make_variable(0);
    let x1 = factory.make_variable(1);
    let two = factory.make_numeric_constant(2.0);
    let prod = factory.make_binary(ExprKind::Mul, two, x1).unwrap();
    factory.make_binary(ExprKind::Add, x0, prod).unwrap()
}

/// `f(value)` with a freshly registered `f`.
fn call_of_f<'a>(factory: &'a ExprFactory<'a>, value: f64) -> CallExpr<'a> {
    let f = factory.add_function("f");
    let mut builder = factory.begin_call(f, 1).unwrap();
    builder
        .add_arg(factory.make_numeric_constant(value))
        .unwrap();
    factory.end_call(builder).unwrap()
}

fn bin<'a>(
    factory: &'a ExprFactory<'a>,
    kind: ExprKind,
    lhs: impl Into<NumericExpr<'a>>,
    rhs: impl Into<NumericExpr<'a>>,
) -> NumericExpr<'a> {
    factory.make_binary(kind, lhs, rhs).unwrap().into()
}

#[test]
fn walk_visits_in_pre_order() {
    let factory = ExprFactory::new();
    let root = linear(&factory);

    let mut kinds = Vec::new();
    let completed = walk_no_input(root, |e| {
        kinds.push(e.kind());
        WalkControl::Continue
    });
    assert!(completed);
    assert_eq!(
        kinds,
        [
            ExprKind::Add,
            ExprKind::Variable,
            ExprKind::Mul,
            ExprKind::Constant,
            ExprKind::Variable
        ]
    );
}

#[test]
fn walk_can_skip_and_break() {
    let factory = ExprFactory::new();
    let root = linear(&factory);

    let mut visited = 0;
    walk_no_input(root, |e| {
        visited += 1;
        if e.kind() == ExprKind::Mul {
            WalkControl::SkipChildren
        } else {
            WalkControl::Continue
        }
    });
    assert_eq!(visited, 3);

    let mut seen = Vec::new();
    let completed = walk_no_input(root, |e| {
        seen.push(e);
        if e.kind() == ExprKind::Constant {
            WalkControl::Break
        } else {
            WalkControl::Continue
        }
    });
    assert!(!completed);
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0], root);
}

#[test]
fn walk_threads_state_to_children() {
    let factory = ExprFactory::new();
    let root = linear(&factory);

    let mut depths = Vec::new();
    walk(root, 0usize, |depth, e| {
        depths.push((e.kind(), *depth));
        *depth += 1;
        WalkControl::Continue
    });
    assert_eq!(
        depths,
        [
            (ExprKind::Add, 0),
            (ExprKind::Variable, 1),
            (ExprKind::Mul, 1),
            (ExprKind::Constant, 2),
            (ExprKind::Variable, 2)
        ]
    );
}

#[test]
fn walk_skips_null_handles() {
    let factory = ExprFactory::new();
    let mut calls = 0;
    assert!(walk_no_input(Expr::default(), |_| {
        calls += 1;
        WalkControl::Continue
    }));
    assert_eq!(calls, 0);

    let cond = factory.make_logical_constant(true);
    let then = factory.make_numeric_constant(1.0);
    let e = factory.make_if(cond, then, NumericExpr::default()).unwrap();
    walk_no_input(e, |_| {
        calls += 1;
        WalkControl::Continue
    });
    assert_eq!(calls, 3);
}

#[test]
fn structural_comparison_across_factories() {
    let a = ExprFactory::new();
    let b = ExprFactory::new();
    assert!(compare_expressions(linear(&a), linear(&b)));
    assert_ne!(Expr::from(linear(&a)), Expr::from(linear(&a)));

    assert!(compare_expressions(call_of_f(&a, 1.0), call_of_f(&b, 1.0)));
    assert!(!compare_expressions(call_of_f(&a, 1.0), call_of_f(&b, 2.0)));

    let x = a.make_variable(0);
    let y = b.make_variable(1);
    assert!(!compare_expressions(x, y));
    assert!(!compare_expressions(x, Expr::default()));
    assert!(compare_expressions(Expr::default(), NumericExpr::default()));

    let t = a.make_logical_constant(true);
    let one = b.make_numeric_constant(1.0);
    assert!(!compare_expressions(t, one));
}

#[test]
fn pretty_arithmetic_precedence() {
    let factory = ExprFactory::new();
    let f = &factory;
    let x0 = factory.make_variable(0);
    let x1 = factory.make_variable(1);
    let x2 = factory.make_variable(2);

    assert_eq!(linear(f).to_string(), "x[0] + 2 * x[1]");

    let sum = bin(f, ExprKind::Add, x0, x1);
    assert_eq!(bin(f, ExprKind::Mul, sum, x2).to_string(), "(x[0] + x[1]) * x[2]");

    let diff = bin(f, ExprKind::Sub, x1, x2);
    assert_eq!(bin(f, ExprKind::Sub, x0, diff).to_string(), "x[0] - (x[1] - x[2])");
    let diff = bin(f, ExprKind::Sub, x0, x1);
    assert_eq!(bin(f, ExprKind::Sub, diff, x2).to_string(), "x[0] - x[1] - x[2]");

    let pow = bin(f, ExprKind::Pow, x1, x2);
    assert_eq!(bin(f, ExprKind::Pow, x0, pow).to_string(), "x[0] ^ x[1] ^ x[2]");
    let pow = bin(f, ExprKind::Pow, x0, x1);
    assert_eq!(bin(f, ExprKind::Pow, pow, x2).to_string(), "(x[0] ^ x[1]) ^ x[2]");

    let minus_one = factory.make_numeric_constant(-1.0);
    assert_eq!(bin(f, ExprKind::Pow, minus_one, x0).to_string(), "(-1) ^ x[0]");
    assert_eq!(bin(f, ExprKind::Atan2, x0, x1).to_string(), "atan2(x[0], x[1])");
}

#[test]
fn pretty_unary_forms() {
    let factory = ExprFactory::new();
    let x = factory.make_variable(0);
    let y = factory.make_variable(1);
    let sum = factory.make_binary(ExprKind::Add, x, y).unwrap();

    let abs = factory.make_unary(ExprKind::Abs, x).unwrap();
    let neg = factory.make_unary(ExprKind::Minus, x).unwrap();
    let neg_sum = factory.make_unary(ExprKind::Minus, sum).unwrap();
    let sq = factory.make_unary(ExprKind::Pow2, sum).unwrap();

    assert_eq!(abs.to_string(), "abs(x[0])");
    assert_eq!(neg.to_string(), "-x[0]");
    assert_eq!(neg_sum.to_string(), "-(x[0] + x[1])");
    assert_eq!(sq.to_string(), "(x[0] + x[1])^2");
}

#[test]
fn pretty_conditionals_and_calls() {
    let factory = ExprFactory::new();
    let x0 = factory.make_variable(0);
    let x1 = factory.make_variable(1);
    let one = factory.make_numeric_constant(1.0);
    let zero = factory.make_numeric_constant(0.0);
    let lt = factory.make_relational(ExprKind::Lt, x0, one).unwrap();

    let full = factory.make_if(lt, x1, zero).unwrap();
    assert_eq!(full.to_string(), "if x[0] < 1 then x[1] else 0");
    let partial = factory.make_if(lt, x1, NumericExpr::default()).unwrap();
    assert_eq!(partial.to_string(), "if x[0] < 1 then x[1]");

    let foo = factory.add_function("foo");
    let mut builder = factory.begin_call(foo, 2).unwrap();
    builder.add_arg(x0).unwrap();
    builder.add_arg(factory.make_logical_constant(true)).unwrap();
    assert_eq!(factory.end_call(builder).unwrap().to_string(), "foo(x[0], true)");

    let mut builder = factory.begin_number_of(3, factory.make_numeric_constant(42.0)).unwrap();
    builder.add_arg(x0).unwrap();
    builder.add_arg(x1).unwrap();
    let number_of = factory.end_number_of(builder).unwrap();
    assert_eq!(number_of.to_string(), "numberof 42 in (x[0], x[1])");

    let mut builder = factory.begin_vararg(ExprKind::Max, 2).unwrap();
    builder.add_arg(x0).unwrap();
    builder.add_arg(x1).unwrap();
    assert_eq!(factory.end_vararg(builder).unwrap().to_string(), "max(x[0], x[1])");
}

#[test]
fn pretty_logical_precedence() {
    let factory = ExprFactory::new();
    let t = factory.make_logical_constant(true);
    let f = factory.make_logical_constant(false);

    let and = factory.make_binary_logical(ExprKind::And, t, f).unwrap();
    let or = factory.make_binary_logical(ExprKind::Or, t, f).unwrap();
    assert_eq!(
        factory.make_binary_logical(ExprKind::Or, and, t).unwrap().to_string(),
        "true && false || true"
    );
    assert_eq!(
        factory.make_binary_logical(ExprKind::And, or, t).unwrap().to_string(),
        "(true || false) && true"
    );
    assert_eq!(factory.make_not(and).unwrap().to_string(), "!(true && false)");

    let x = factory.make_variable(0);
    let one = factory.make_numeric_constant(1.0);
    let two = factory.make_numeric_constant(2.0);
    let ge = factory.make_relational(ExprKind::Ge, x, one).unwrap();
    let le = factory.make_relational(ExprKind::Le, x, two).unwrap();
    let imp = factory.make_implication(ge, le, t).unwrap();
    assert_eq!(imp.to_string(), "x[0] >= 1 ==> x[0] <= 2 else true");

    let mut builder = factory.begin_count(2).unwrap();
    builder.add_arg(t).unwrap();
    builder.add_arg(f).unwrap();
    let count = factory.end_count(builder).unwrap();
    assert_eq!(count.to_string(), "count(true, false)");
    let at_most = factory
        .make_logical_count(ExprKind::AtMost, factory.make_numeric_constant(42.0), count)
        .unwrap();
    assert_eq!(at_most.to_string(), "atmost 42 (true, false)");

    let exists = factory
        .end_iterated_logical(factory.begin_iterated_logical(ExprKind::Exists, 0).unwrap())
        .unwrap();
    assert_eq!(exists.to_string(), "exists()");
}

#[test]
fn pretty_pl_term_and_null() {
    let factory = ExprFactory::new();
    let mut builder = factory.begin_pl_term(2).unwrap();
    for slope in [11.0, 22.0, 33.0] {
        builder.add_slope(slope).unwrap();
    }
    for breakpoint in [111.0, 222.0] {
        builder.add_breakpoint(breakpoint).unwrap();
    }
    let term = factory
        .end_pl_term(builder, factory.make_variable(42))
        .unwrap();
    assert_eq!(term.to_string(), "<<111, 222; 11, 22, 33>> x[42]");

    assert_eq!(Expr::default().to_string(), "<null>");
    assert_eq!(CountExpr::default().pretty_string(), "<null>");
}

#[test]
fn pretty_respects_width() {
    let factory = ExprFactory::new();
    let mut builder = factory.begin_sum(12).unwrap();
    for i in 0..12 {
        builder.add_arg(factory.make_variable(i)).unwrap();
    }
    let sum = factory.end_sum(builder).unwrap();

    let flat = sum.pretty_string();
    assert!(!flat.contains('\n'));
    assert!(flat.starts_with("sum(x[0], x[1], "));

    let narrow = sum.to_pretty_string(20);
    assert!(narrow.contains('\n'));
    let squashed: String = narrow.split_whitespace().collect();
    assert_eq!(squashed, flat.split_whitespace().collect::<String>());
}
