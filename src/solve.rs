//! The solve pipeline: grid, assembly, linear solve, reshape.

use crate::{
  assemble::{self, LinearSystem},
  field::Field,
  grid::Grid,
  linalg::{self, SolverKind},
  problem::ProblemDef,
  Result,
};

use tracing::{info, info_span, warn};

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
  pub solver: SolverKind,
  /// Relative residual above which a warning is logged. `None` skips the check.
  pub residual_tolerance: Option<f64>,
}

impl Default for SolveOptions {
  fn default() -> Self {
    Self {
      solver: SolverKind::default(),
      residual_tolerance: Some(1e-8),
    }
  }
}

impl SolveOptions {
  pub fn with_solver(mut self, solver: SolverKind) -> Self {
    self.solver = solver;
    self
  }
  pub fn with_residual_tolerance(mut self, tolerance: Option<f64>) -> Self {
    self.residual_tolerance = tolerance;
    self
  }
}

/// Solves `problem` on a `nx x ny` grid with default options.
pub fn solve(problem: &ProblemDef, nx: usize, ny: usize) -> Result<Field> {
  solve_with(problem, nx, ny, &SolveOptions::default())
}

pub fn solve_with(
  problem: &ProblemDef,
  nx: usize,
  ny: usize,
  options: &SolveOptions,
) -> Result<Field> {
  let _span = info_span!("solve", nx, ny).entered();

  let grid = Grid::new(*problem.domain(), nx, ny)?;
  let system = assemble::assemble_system(problem, &grid)?;
  info!(
    npoints = system.npoints(),
    nnz = system.nnz(),
    "assembled linear system"
  );

  let solution = solve_system(&system, options)?;
  let field = Field::from_solution(grid, &solution)?;
  info!(min = field.min(), max = field.max(), "solved");
  Ok(field)
}

/// Solves an already assembled system.
pub fn solve_system(system: &LinearSystem, options: &SolveOptions) -> Result<na::DVector<f64>> {
  let backend = options.solver.backend();
  let solution = backend.solve(system.matrix(), system.rhs())?;

  if let Some(tolerance) = options.residual_tolerance {
    let residual = linalg::relative_residual(system.matrix(), &solution, system.rhs())?;
    if residual > tolerance {
      warn!(
        residual,
        tolerance,
        solver = backend.name(),
        "large relative residual"
      );
    }
  }

  Ok(solution)
}
