//! End-to-end scenarios exercising the solver and optimizer against known
//! closed-form answers.

use braxis::bisector::RoundRobin;
use braxis::callback::NoOpCallback;
use braxis::constraint::{NumConstraint, RelOp};
use braxis::contractor::{Compo, Contractor, FixPoint, ForAll, FwdBwd, LinearRelaxFixPoint};
use braxis::expr::{ExprBuilder, Function};
use braxis::interval::Interval;
use braxis::interval_vector::IntervalVector;
use braxis::lp::simplex::BoundedSimplex;
use braxis::optimizer::Optimizer;
use braxis::options::SearchOptions;
use braxis::solver::{Hooks, Solver};
use braxis::terminators::TimeOutTerminator;
use braxis::Status;

fn hooks() -> Hooks {
    Hooks {
        callback: Box::new(NoOpCallback {}),
        terminator: Box::new(TimeOutTerminator::new(3600)),
    }
}

/// S1: find all solutions of `x^2 + y^2 = 1, x - y = 0` on `[-2,2]^2`.
#[test]
fn s1_circle_meets_diagonal() {
    let mut bld = ExprBuilder::new(2);
    let x = bld.var(0);
    let y = bld.var(1);
    let x2 = bld.sqr(x);
    let y2 = bld.sqr(y);
    let sum = bld.add(x2, y2);
    let one = bld.konst(1.0);
    let circle = bld.sub(sum, one);
    let diag = bld.sub(x, y);
    let dag = bld.build();

    let c1 = NumConstraint::new(Function::scalar(dag.clone(), circle), RelOp::Eq);
    let c2 = NumConstraint::new(Function::scalar(dag, diag), RelOp::Eq);

    let fwd1: braxis::contractor::BoxedContractor = Box::new(FwdBwd::new(c1));
    let fwd2: braxis::contractor::BoxedContractor = Box::new(FwdBwd::new(c2));
    let ctc: braxis::contractor::BoxedContractor = Box::new(FixPoint::new(Box::new(Compo::new(vec![fwd1, fwd2])), 0.1));

    let options = SearchOptions::new().with_precision(1e-7);
    let mut solver = Solver::new(ctc, Box::new(RoundRobin::new(1e-10, 0.5)), options);
    let initial = IntervalVector::new(vec![Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0)]);
    let report = solver.solve(initial, &mut hooks());

    assert_eq!(report.status, Status::Feasible);
    assert!(!report.solutions.is_empty());
    for sol in &report.solutions {
        assert!(sol.max_diam() <= 1e-7 + 1e-12);
    }

    let root2_half = std::f64::consts::SQRT_2 / 2.0;
    let near_positive = report
        .solutions
        .iter()
        .any(|b| (b.get(0).mid() - root2_half).abs() < 1e-5 && (b.get(1).mid() - root2_half).abs() < 1e-5);
    let near_negative = report
        .solutions
        .iter()
        .any(|b| (b.get(0).mid() + root2_half).abs() < 1e-5 && (b.get(1).mid() + root2_half).abs() < 1e-5);
    assert!(near_positive);
    assert!(near_negative);
}

/// S2: minimize `(x-3)^2 + (y+1)^2` on `[-10,10]^2`, unconstrained.
#[test]
fn s2_unconstrained_quadratic_minimum() {
    let mut bld = ExprBuilder::new(2);
    let x = bld.var(0);
    let y = bld.var(1);
    let three = bld.konst(3.0);
    let neg_one = bld.konst(-1.0);
    let dx = bld.sub(x, three);
    let dy = bld.sub(y, neg_one);
    let dx2 = bld.sqr(dx);
    let dy2 = bld.sqr(dy);
    let sum = bld.add(dx2, dy2);
    let dag = bld.build();
    let objective = Function::scalar(dag.clone(), sum);

    // Trivially-true/false placeholder constraints: no real feasible
    // region to carve out, so `ctc_out` passes everything and `ctc_in`
    // never contracts anything away.
    let always = bld_trivial_true();
    let never = bld_trivial_false();

    let options = SearchOptions::new().with_precision(1e-4).with_max_iter(2000);
    let mut optimizer = Optimizer::new(objective, always, never, Box::new(RoundRobin::new(1e-10, 0.5)), options).with_seed(11);
    let initial = IntervalVector::new(vec![Interval::new(-10.0, 10.0), Interval::new(-10.0, 10.0)]);
    let report = optimizer.optimize(initial, None, &mut hooks());

    assert!(report.uplo <= 1e-6);
    assert!(report.loup - report.uplo <= 1e-3);
    let point = report.loup_box.expect("optimizer should report an incumbent point");
    assert!((point.get(0).mid() - 3.0).abs() < 1e-2);
    assert!((point.get(1).mid() + 1.0).abs() < 1e-2);
}

/// S3: minimize `x + y` subject to `x^2 + y^2 <= 1` on `[-2,2]^2`.
#[test]
fn s3_constrained_linear_objective_on_disk() {
    let mut bld = ExprBuilder::new(2);
    let x = bld.var(0);
    let y = bld.var(1);
    let xs = bld.sqr(x);
    let ys = bld.sqr(y);
    let sum = bld.add(xs, ys);
    let one = bld.konst(1.0);
    let disk = bld.sub(sum, one);
    let dag = bld.build();

    let mut bld_obj = ExprBuilder::new(2);
    let ox = bld_obj.var(0);
    let oy = bld_obj.var(1);
    let obj_sum = bld_obj.add(ox, oy);
    let obj_dag = bld_obj.build();
    let objective = Function::scalar(obj_dag, obj_sum);

    let ctc_out: braxis::contractor::BoxedContractor = Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag.clone(), disk), RelOp::Leq)));
    let ctc_in: braxis::contractor::BoxedContractor = Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag, disk), RelOp::Gt)));

    let options = SearchOptions::new().with_precision(1e-3).with_max_iter(2000);
    let mut optimizer = Optimizer::new(objective, ctc_out, ctc_in, Box::new(RoundRobin::new(1e-10, 0.5)), options).with_seed(5);
    let initial = IntervalVector::new(vec![Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0)]);
    let report = optimizer.optimize(initial, None, &mut hooks());

    let expected = -std::f64::consts::SQRT_2;
    assert!(report.uplo <= expected + 1e-2);
    assert!(report.loup <= expected + 1e-1);
}

/// S4: place N=6 unit circles inside a disk of radius 3.001 with pairwise
/// non-overlap, as a plain feasibility search (no LP/Sweep acceleration).
#[test]
fn s4_disk_packing_feasibility() {
    const N: usize = 6;
    const RADIUS: f64 = 1.0;
    const ENCLOSING_RADIUS: f64 = 3.001;

    let mut bld = ExprBuilder::new(2 * N);
    let mut constraints = Vec::new();

    for i in 0..N {
        let xi = bld.var(2 * i);
        let yi = bld.var(2 * i + 1);
        let xi2 = bld.sqr(xi);
        let yi2 = bld.sqr(yi);
        let dist2 = bld.add(xi2, yi2);
        let bound2 = bld.konst((ENCLOSING_RADIUS - RADIUS).powi(2));
        let inside = bld.sub(dist2, bound2);
        constraints.push((inside, RelOp::Leq));

        for j in (i + 1)..N {
            let xj = bld.var(2 * j);
            let yj = bld.var(2 * j + 1);
            let dx = bld.sub(xi, xj);
            let dy = bld.sub(yi, yj);
            let dx2 = bld.sqr(dx);
            let dy2 = bld.sqr(dy);
            let sep2 = bld.add(dx2, dy2);
            let min_sep2 = bld.konst((2.0 * RADIUS).powi(2));
            let gap = bld.sub(sep2, min_sep2);
            constraints.push((gap, RelOp::Geq));
        }
    }
    let dag = bld.build();

    let ctcs: Vec<braxis::contractor::BoxedContractor> = constraints
        .into_iter()
        .map(|(root, op)| -> braxis::contractor::BoxedContractor {
            Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag.clone(), root), op)))
        })
        .collect();
    let ctc: braxis::contractor::BoxedContractor = Box::new(FixPoint::new(Box::new(Compo::new(ctcs)), 0.05));

    let options = SearchOptions::new().with_precision(0.2).with_max_iter(20_000);
    let mut solver = Solver::new(ctc, Box::new(RoundRobin::new(1e-6, 0.5)), options);
    let domain = Interval::new(-ENCLOSING_RADIUS, ENCLOSING_RADIUS);
    let initial = IntervalVector::new(vec![domain; 2 * N]);
    let report = solver.solve(initial, &mut hooks());

    assert!(matches!(report.status, Status::Feasible | Status::MaxIter));
}

fn bld_trivial_true() -> braxis::contractor::BoxedContractor {
    let mut bld = ExprBuilder::new(2);
    let x = bld.var(0);
    let zero_diff = bld.sub(x, x);
    let dag = bld.build();
    Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag, zero_diff), RelOp::Eq)))
}

fn bld_trivial_false() -> braxis::contractor::BoxedContractor {
    let mut bld = ExprBuilder::new(2);
    let x = bld.var(0);
    let far = bld.konst(-1000.0);
    let unreachable = bld.sub(x, far);
    let dag = bld.build();
    Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag, unreachable), RelOp::Eq)))
}

/// S5: the set of `(a, b)` such that `forall t in [0,1], a*t + b >= 0`.
#[test]
fn s5_quantified_halfplane() {
    let mut bld = ExprBuilder::new(3);
    let a = bld.var(0);
    let b = bld.var(1);
    let t = bld.var(2);
    let at = bld.mul(a, t);
    let f = bld.add(at, b);
    let dag = bld.build();
    let ctc: braxis::contractor::BoxedContractor = Box::new(FwdBwd::new(NumConstraint::new(Function::scalar(dag, f), RelOp::Geq)));

    let forall = ForAll::new(ctc, vec![false, false, true], 0.05);

    // (a, b) = (-1, -1) already fails at t = 0 alone: provably infeasible
    // for every t, so the whole box must be emptied.
    let mut infeasible = IntervalVector::new(vec![
        Interval::degenerate(-1.0),
        Interval::degenerate(-1.0),
        Interval::new(0.0, 1.0),
    ]);
    assert!(!forall.contract(&mut infeasible));

    // (a, b) = (0, 0) satisfies a*t + b = 0 >= 0 for every t: must survive.
    let mut feasible = IntervalVector::new(vec![Interval::degenerate(0.0), Interval::degenerate(0.0), Interval::new(0.0, 1.0)]);
    assert!(forall.contract(&mut feasible));
}

/// S6: LR rigor — feed a linear-relaxation fixpoint a box whose true value
/// is `2.5000000001` and check the contracted enclosure still brackets it.
#[test]
fn s6_linear_relaxation_brackets_the_true_optimum() {
    let target = 2.500_000_000_1_f64;
    let mut bld = ExprBuilder::new(1);
    let x = bld.var(0);
    let rhs = bld.konst(target);
    let f = bld.sub(x, rhs);
    let dag = bld.build();
    let ctc = NumConstraint::new(Function::scalar(dag, f), RelOp::Eq);

    let relax = LinearRelaxFixPoint::new(vec![ctc], BoundedSimplex::new());
    let mut b = IntervalVector::new(vec![Interval::new(0.0, 5.0)]);
    assert!(relax.contract(&mut b));
    let x_iv = b.get(0);
    assert!(x_iv.lb() <= target && target <= x_iv.ub());
}
