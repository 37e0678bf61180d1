//! End-to-end runs of the reference problem on $[1, 10] times [1, 5]$
//! with $k_1 = 2$, $h_2 = 5$.

extern crate nalgebra as na;

use fdelliptic::{
  assemble::{assemble_system, EquationKind},
  grid::{Domain, Grid},
  linalg::SolverKind,
  problem::ProblemDef,
  solve::{solve, solve_with, SolveOptions},
  Error,
};

use approx::assert_relative_eq;

fn u1(y: f64) -> f64 {
  3.0 + 2.0 * y.powi(3)
}
fn u2(y: f64) -> f64 {
  15000.0 + 10.0 * y.powi(3) + 1800.0
}
fn u3(x: f64) -> f64 {
  3.0 * x.powi(3) + 2.0
}
fn u4(x: f64) -> f64 {
  3.0 * x.powi(3) + 250.0
}

#[test]
fn reference_5x5() {
  let problem = ProblemDef::reference().unwrap();
  let field = solve(&problem, 5, 5).unwrap();

  assert_eq!(field.nx(), 5);
  assert_eq!(field.ny(), 5);
  assert!(field.is_finite());
  assert_eq!(field.extent(), (1.0, 10.0, 1.0, 5.0));

  let (nx, ny) = (field.nx(), field.ny());

  // bottom and top rows are Dirichlet, except for the Robin corner
  for i in 0..nx - 1 {
    let x = field.x_vals()[i];
    assert_relative_eq!(field.get(i, 0), u3(x), max_relative = 1e-10);
    assert_relative_eq!(field.get(i, ny - 1), u4(x), max_relative = 1e-10);
  }

  // left column is Dirichlet everywhere, corners included
  for j in 0..ny {
    let y = field.y_vals()[j];
    assert_relative_eq!(field.get(0, j), u1(y), max_relative = 1e-10);
  }

  // right column satisfies the discrete Robin relation
  let k_dx = 2.0 / field.grid().dx();
  for j in 0..ny {
    let y = field.y_vals()[j];
    let lhs = (5.0 + k_dx) * field.get(nx - 1, j) - k_dx * field.get(nx - 2, j);
    assert_relative_eq!(lhs, u2(y), max_relative = 1e-10);
  }
}

#[test]
fn reference_corner_rows() {
  let problem = ProblemDef::reference().unwrap();
  let grid = Grid::new(*problem.domain(), 5, 5).unwrap();
  let system = assemble_system(&problem, &grid).unwrap();

  let origin = grid.point_idx(0, 0);
  assert_eq!(system.row_kind(origin), EquationKind::LeftDirichlet);
  assert_eq!(system.matrix().row(origin), vec![(origin, 1.0)]);
  assert_eq!(system.rhs()[origin], u1(1.0));

  let top_left = grid.point_idx(0, 4);
  assert_eq!(system.row_kind(top_left), EquationKind::LeftDirichlet);
  assert_eq!(system.rhs()[top_left], u1(5.0));

  for corner in [grid.point_idx(4, 0), grid.point_idx(4, 4)] {
    assert_eq!(system.row_kind(corner), EquationKind::Robin);
    assert_eq!(system.matrix().row(corner).len(), 2);
  }
}

#[test]
fn reference_default_resolution() {
  let problem = ProblemDef::reference().unwrap();
  let field = solve(&problem, 50, 50).unwrap();
  assert!(field.is_finite());
  assert_eq!(field.as_matrix().shape(), (50, 50));
  for j in 0..50 {
    assert_relative_eq!(field.get(0, j), u1(field.y_vals()[j]), max_relative = 1e-9);
  }
}

#[test]
fn repeated_solves_are_identical() {
  let problem = ProblemDef::reference().unwrap();
  let a = solve(&problem, 17, 11).unwrap();
  let b = solve(&problem, 17, 11).unwrap();
  assert_eq!(a.as_matrix(), b.as_matrix());
}

#[test]
fn dense_backend_matches() {
  let problem = ProblemDef::reference().unwrap();
  let options = SolveOptions::default().with_solver(SolverKind::DenseLu);
  let dense = solve_with(&problem, 6, 5, &options).unwrap();
  let sparse = solve(&problem, 6, 5).unwrap();
  assert_relative_eq!(
    dense.flatten(),
    sparse.flatten(),
    max_relative = 1e-10
  );
}

fn degenerate_robin(hi2: f64) -> ProblemDef {
  ProblemDef::builder(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap())
    .diffusion(|x| 1.0 - x)
    .source(|_, _| 1.0)
    .left(|_| 0.0)
    .right(|_| 1.0)
    .bottom(|_| 0.0)
    .top(|_| 0.0)
    .robin_coeff(hi2)
    .build()
    .unwrap()
}

#[test]
fn vanishing_robin_row_is_singular() {
  let problem = degenerate_robin(0.0);
  for solver in [SolverKind::SparseLu, SolverKind::DenseLu] {
    let options = SolveOptions::default().with_solver(solver);
    assert!(matches!(
      solve_with(&problem, 6, 6, &options),
      Err(Error::SingularSystem { .. })
    ));
  }

  // a nonzero robin coefficient keeps the system regular
  let field = solve(&degenerate_robin(1.0), 6, 6).unwrap();
  assert!(field.is_finite());
  for j in 0..field.ny() {
    assert_relative_eq!(field.get(5, j), 1.0, max_relative = 1e-12);
  }
}

/// On $[0, 3] times [0, 4]$ with a `4 x 3` grid the single interior row
/// couples `u_1, u_2, u_3` through
/// `[[d, c, 0], [c, d, c], [0, -c, h + c]]` with `c = 1.5`, `d = -2.5`.
/// Its determinant $(h + c)(d^2 - c^2) + d c^2$ vanishes for $h = -3/32$.
fn negative_robin_coeff() -> ProblemDef {
  ProblemDef::builder(Domain::new(0.0, 3.0, 0.0, 4.0).unwrap())
    .diffusion(|_| 1.5)
    .source(|_, _| 1.0)
    .left(|_| 0.0)
    .right(|_| 1.0)
    .bottom(|_| 0.0)
    .top(|_| 0.0)
    .robin_coeff(-0.09375)
    .build()
    .unwrap()
}

#[test]
fn fully_populated_singular_system() {
  let problem = negative_robin_coeff();
  let grid = Grid::new(*problem.domain(), 4, 3).unwrap();
  let system = assemble_system(&problem, &grid).unwrap();
  assert!(system.matrix().empty_rows().is_empty());
  assert!(system.matrix().empty_cols().is_empty());

  for solver in [SolverKind::SparseLu, SolverKind::DenseLu] {
    let options = SolveOptions::default().with_solver(solver);
    assert!(matches!(
      solve_with(&problem, 4, 3, &options),
      Err(Error::SingularSystem { .. })
    ));
  }
}

#[test]
fn failing_boundary_function_aborts() {
  let problem = ProblemDef::builder(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap())
    .diffusion(|_| 1.0)
    .source(|_, _| 0.0)
    .left(|_| 0.0)
    .right(|y| (y - 0.5).ln())
    .bottom(|_| 0.0)
    .top(|_| 0.0)
    .robin_coeff(1.0)
    .build()
    .unwrap();
  match solve(&problem, 5, 5) {
    Err(Error::FunctionEvaluation { function, x, y, .. }) => {
      assert_eq!(function, "u2");
      assert_eq!(x, 1.0);
      assert_eq!(y, Some(0.0));
    }
    other => panic!("expected evaluation error, got {other:?}"),
  }
}

#[test]
fn solution_vector_reshapes_row_major() {
  let problem = ProblemDef::reference().unwrap();
  let field = solve(&problem, 7, 4).unwrap();
  let flat = field.flatten();
  assert_eq!(flat.len(), 28);
  for j in 0..4 {
    for i in 0..7 {
      assert_eq!(flat[j * 7 + i], field.get(i, j));
    }
  }
  let _: &na::DMatrix<f64> = field.as_matrix();
}
