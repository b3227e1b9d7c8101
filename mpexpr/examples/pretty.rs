use clap::Parser;
use mpexpr::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Build a random model expression and pretty print it
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Seed of the random generator
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Maximum depth of the generated expression
    #[arg(short, long, default_value_t = 4)]
    pub depth: usize,

    /// Line width used by the layout (defaults to the terminal width)
    #[arg(short, long)]
    pub width: Option<usize>,
}

const NUMERIC_KINDS: [ExprKind; 4] = [ExprKind::Add, ExprKind::Sub, ExprKind::Mul, ExprKind::Pow];

fn numeric<'a>(depth: usize, rng: &mut impl Rng, factory: &'a ExprFactory<'a>) -> NumericExpr<'a> {
    if depth == 0 || rng.random_bool(0.25) {
        return if rng.random_bool(0.5) {
            factory.make_variable(rng.random_range(0..8)).into()
        } else {
            factory
                .make_numeric_constant(rng.random_range(-5..=5) as f64)
                .into()
        };
    }

    match rng.random_range(0..3) {
        0 => {
            let kind = NUMERIC_KINDS[rng.random_range(0..NUMERIC_KINDS.len())];
            let lhs = numeric(depth - 1, rng, factory);
            let rhs = numeric(depth - 1, rng, factory);
            factory.make_binary(kind, lhs, rhs).unwrap().into()
        }
        1 => {
            let cond = logical(depth - 1, rng, factory);
            let then = numeric(depth - 1, rng, factory);
            let otherwise = numeric(depth - 1, rng, factory);
            factory.make_if(cond, then, otherwise).unwrap().into()
        }
        _ => {
            let n = rng.random_range(1..=5);
            let mut builder = factory.begin_sum(n).unwrap();
            for _ in 0..n {
                builder.add_arg(numeric(depth - 1, rng, factory)).unwrap();
            }
            factory.end_sum(builder).unwrap().into()
        }
    }
}

fn logical<'a>(depth: usize, rng: &mut impl Rng, factory: &'a ExprFactory<'a>) -> LogicalExpr<'a> {
    if depth == 0 || rng.random_bool(0.25) {
        return factory.make_logical_constant(rng.random_bool(0.5)).into();
    }

    if rng.random_bool(0.5) {
        let lhs = numeric(depth - 1, rng, factory);
        let rhs = numeric(depth - 1, rng, factory);
        factory.make_relational(ExprKind::Le, lhs, rhs).unwrap().into()
    } else {
        let kind = if rng.random_bool(0.5) {
            ExprKind::And
        } else {
            ExprKind::Or
        };
        let lhs = logical(depth - 1, rng, factory);
        let rhs = logical(depth - 1, rng, factory);
        factory.make_binary_logical(kind, lhs, rhs).unwrap().into()
    }
}

fn main() {
    let args = Args::parse();
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);

    with_factory(|factory| {
        let expr = numeric(args.depth, &mut rng, factory);
        match args.width {
            Some(width) => println!("{}", expr.to_pretty_string(width)),
            None => {
                expr.pretty_print().unwrap();
                println!();
            }
        }
        eprintln!("{} nodes allocated", factory.num_nodes());
    });
}
