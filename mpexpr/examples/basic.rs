use mpexpr::prelude::*;

fn main() {
    with_factory(|factory| {
        let x = factory.make_variable(0);
        let y = factory.make_variable(1);
        let z = factory.make_variable(2);

        // sum(x^2, 3 * y, <<0, 10; -1, 0, 2>> z)
        let mut sum = factory.begin_sum(3).unwrap();
        sum.add_arg(factory.make_unary(ExprKind::Pow2, x).unwrap()).unwrap();
        let three = factory.make_numeric_constant(3.0);
        sum.add_arg(factory.make_binary(ExprKind::Mul, three, y).unwrap()).unwrap();

        let mut pl = factory.begin_pl_term(2).unwrap();
        for slope in [-1.0, 0.0, 2.0] {
            pl.add_slope(slope).unwrap();
        }
        for breakpoint in [0.0, 10.0] {
            pl.add_breakpoint(breakpoint).unwrap();
        }
        sum.add_arg(factory.end_pl_term(pl, z).unwrap()).unwrap();
        let objective = factory.end_sum(sum).unwrap();

        // cost(x, y) <= 10 ==> atmost 1 (x >= 1, y >= 1)
        let cost = factory.add_function("cost");
        let mut call = factory.begin_call(cost, 2).unwrap();
        call.add_arg(x).unwrap();
        call.add_arg(y).unwrap();
        let call = factory.end_call(call).unwrap();

        let ten = factory.make_numeric_constant(10.0);
        let one = factory.make_numeric_constant(1.0);
        let budget = factory.make_relational(ExprKind::Le, call, ten).unwrap();

        let mut count = factory.begin_count(2).unwrap();
        count
            .add_arg(factory.make_relational(ExprKind::Ge, x, one).unwrap())
            .unwrap();
        count
            .add_arg(factory.make_relational(ExprKind::Ge, y, one).unwrap())
            .unwrap();
        let count = factory.end_count(count).unwrap();
        let at_most = factory
            .make_logical_count(ExprKind::AtMost, one, count)
            .unwrap();
        let constraint = factory
            .make_implication(budget, at_most, LogicalExpr::default())
            .unwrap();

        objective.pretty_print().unwrap();
        println!();
        constraint.pretty_print().unwrap();
        println!();
    });
}
