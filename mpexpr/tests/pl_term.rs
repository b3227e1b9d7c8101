use mpexpr::prelude::*;

fn two_breakpoint_builder(factory: &ExprFactory<'_>) -> PLTermBuilder {
    let mut builder = factory.begin_pl_term(2).unwrap();
    builder.add_slope(11.0).unwrap();
    builder.add_slope(22.0).unwrap();
    builder.add_slope(33.0).unwrap();
    builder.add_breakpoint(111.0).unwrap();
    builder.add_breakpoint(222.0).unwrap();
    builder
}

#[test]
fn pl_term_with_two_breakpoints() {
    let factory = ExprFactory::new();
    let mut builder = two_breakpoint_builder(&factory);
    assert_eq!(
        builder.add_breakpoint(333.0),
        Err(ExprError::TooManyBreakpoints)
    );
    assert_eq!(builder.add_slope(44.0), Err(ExprError::TooManySlopes));

    let x = factory.make_variable(42);
    let term = factory.end_pl_term(builder, x).unwrap();

    assert_eq!(term.kind(), ExprKind::PLTerm);
    assert_eq!(term.category(), Category::Numeric);
    assert_eq!(term.num_breakpoints(), 2);
    assert_eq!(term.num_slopes(), 3);
    assert_eq!(term.slope(2), Ok(33.0));
    assert_eq!(term.breakpoint(1), Ok(222.0));
    assert_eq!(term.var_index(), 42);
    assert_eq!(term.arg(), x);
    assert_eq!(term.slopes(), [11.0, 22.0, 33.0]);
    assert_eq!(term.breakpoints(), [111.0, 222.0]);
}

#[test]
fn out_of_range_reads() {
    let factory = ExprFactory::new();
    let term = factory
        .end_pl_term(two_breakpoint_builder(&factory), factory.make_variable(0))
        .unwrap();

    assert_eq!(
        term.slope(3),
        Err(ExprError::IndexOutOfBounds { index: 3, len: 3 })
    );
    assert_eq!(
        term.breakpoint(2),
        Err(ExprError::IndexOutOfBounds { index: 2, len: 2 })
    );
}

#[test]
fn zero_breakpoints_is_rejected() {
    let factory = ExprFactory::new();
    assert_eq!(
        factory.begin_pl_term(0).unwrap_err(),
        ExprError::InvalidNumBreakpoints
    );
}

#[test]
fn unrepresentable_slope_count_is_rejected() {
    let factory = ExprFactory::new();
    assert_eq!(
        factory.begin_pl_term(usize::MAX).unwrap_err(),
        ExprError::InvalidNumBreakpoints
    );

    let mut builder = factory.begin_pl_term(usize::MAX - 1).unwrap();
    assert_eq!(builder.num_breakpoints(), usize::MAX - 1);
    builder.add_slope(1.0).unwrap();
    builder.add_breakpoint(0.0).unwrap();
    assert_eq!(
        factory.end_pl_term(builder, factory.make_variable(0)),
        Err(ExprError::TooFewBreakpoints)
    );
}

#[test]
fn incomplete_terms_are_rejected() {
    let factory = ExprFactory::new();
    let x = factory.make_variable(0);

    let mut missing_breakpoint = factory.begin_pl_term(1).unwrap();
    missing_breakpoint.add_slope(1.0).unwrap();
    missing_breakpoint.add_slope(2.0).unwrap();
    assert_eq!(
        factory.end_pl_term(missing_breakpoint, x),
        Err(ExprError::TooFewBreakpoints)
    );

    let mut missing_slope = factory.begin_pl_term(1).unwrap();
    missing_slope.add_slope(1.0).unwrap();
    missing_slope.add_breakpoint(0.0).unwrap();
    assert_eq!(
        factory.end_pl_term(missing_slope, x),
        Err(ExprError::TooFewSlopes)
    );
}

#[test]
fn null_variable_is_rejected() {
    let factory = ExprFactory::new();
    let before = factory.num_nodes();
    assert_eq!(
        factory.end_pl_term(two_breakpoint_builder(&factory), Variable::default()),
        Err(ExprError::InvalidArgument)
    );
    assert_eq!(factory.num_nodes(), before);
}

#[test]
fn slopes_and_breakpoints_may_interleave() {
    let factory = ExprFactory::new();
    let mut builder = factory.begin_pl_term(1).unwrap();
    builder.add_breakpoint(5.0).unwrap();
    builder.add_slope(-1.0).unwrap();
    builder.add_slope(1.0).unwrap();
    let term = factory.end_pl_term(builder, factory.make_variable(3)).unwrap();

    assert_eq!(term.slopes(), [-1.0, 1.0]);
    assert_eq!(term.breakpoint(0), Ok(5.0));
    assert_eq!(Expr::from(term).children().collect::<Vec<_>>(), [Expr::from(term.arg())]);
}
