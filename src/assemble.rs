//! Assembly of the finite difference system.
//!
//! Every phase emits one [`RowEquation`] per grid point it covers.
//! Where phases overlap, the equation of the higher [`EquationKind`] wins:
//! $"Interior" < "BottomTopDirichlet" < "LeftDirichlet" < "Robin"$.
//! This makes corner points left Dirichlet on the left edge and Robin on the
//! right edge.

use crate::{grid::Grid, problem::ProblemDef, sparse::SparseMatrix, Error, PointIdx, Result};

use rayon::prelude::*;
use tracing::debug;

/// Kind of equation encoded by a row, ordered by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EquationKind {
  Interior,
  BottomTopDirichlet,
  LeftDirichlet,
  Robin,
}

/// Single equation of the system, for the unknown at flat index `row`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEquation {
  pub row: PointIdx,
  pub kind: EquationKind,
  pub coeffs: Vec<(PointIdx, f64)>,
  pub rhs: f64,
}

impl RowEquation {
  fn identity(row: PointIdx, kind: EquationKind, rhs: f64) -> Self {
    Self {
      row,
      kind,
      coeffs: vec![(row, 1.0)],
      rhs,
    }
  }

  pub fn is_identity(&self) -> bool {
    self.coeffs == [(self.row, 1.0)]
  }
}

/// Assembled system, one equation per grid point.
#[derive(Debug, Clone)]
pub struct LinearSystem {
  matrix: SparseMatrix,
  rhs: na::DVector<f64>,
  kinds: Vec<EquationKind>,
}

impl LinearSystem {
  pub fn matrix(&self) -> &SparseMatrix {
    &self.matrix
  }
  pub fn rhs(&self) -> &na::DVector<f64> {
    &self.rhs
  }
  pub fn npoints(&self) -> usize {
    self.rhs.len()
  }
  pub fn nnz(&self) -> usize {
    self.matrix.nnz()
  }
  pub fn row_kind(&self, row: PointIdx) -> EquationKind {
    self.kinds[row]
  }
  pub fn count_kind(&self, kind: EquationKind) -> usize {
    self.kinds.iter().filter(|&&k| k == kind).count()
  }
  pub fn into_parts(self) -> (SparseMatrix, na::DVector<f64>) {
    (self.matrix, self.rhs)
  }
}

/// Assembles matrix and RHS for `problem` on `grid`.
pub fn assemble_system(problem: &ProblemDef, grid: &Grid) -> Result<LinearSystem> {
  if grid.nx() < 3 || grid.ny() < 3 {
    return Err(Error::invalid(
      "nx, ny",
      format!(
        "need at least one interior point per axis, got nx={}, ny={}",
        grid.nx(),
        grid.ny()
      ),
    ));
  }

  let interior = interior_equations(problem, grid)?;
  debug!(nrows = interior.len(), "assembled interior stencil");
  let dirichlet = dirichlet_equations(problem, grid)?;
  debug!(nrows = dirichlet.len(), "assembled dirichlet rows");
  let robin = robin_equations(problem, grid)?;
  debug!(nrows = robin.len(), "assembled robin rows");

  let equations = interior.into_iter().chain(dirichlet).chain(robin);
  resolve_equations(grid.npoints(), equations)
}

/// Five point stencil on all interior points.
///
/// Only the x-neighbours are scaled by $k_1(x_i)$, neither the diagonal nor
/// the y-neighbours are.
pub fn interior_equations(problem: &ProblemDef, grid: &Grid) -> Result<Vec<RowEquation>> {
  let dx2 = grid.dx().powi(2);
  let dy2 = grid.dy().powi(2);
  let diag = -2.0 * (dx2.recip() + dy2.recip());

  let ninterior_x = grid.nx() - 2;
  (0..grid.ninterior())
    .into_par_iter()
    .map(|k| -> Result<RowEquation> {
      let i = 1 + k % ninterior_x;
      let j = 1 + k / ninterior_x;
      let (x, y) = (grid.x_vals()[i], grid.y_vals()[j]);
      let row = grid.point_idx(i, j);

      let kx = problem.k1(x)? / dx2;
      let coeffs = vec![
        (grid.point_idx(i, j - 1), dy2.recip()),
        (grid.point_idx(i - 1, j), kx),
        (row, diag),
        (grid.point_idx(i + 1, j), kx),
        (grid.point_idx(i, j + 1), dy2.recip()),
      ];
      Ok(RowEquation {
        row,
        kind: EquationKind::Interior,
        coeffs,
        rhs: problem.f(x, y)?,
      })
    })
    .collect()
}

/// Identity rows on the bottom and top edges, then on the left edge.
pub fn dirichlet_equations(problem: &ProblemDef, grid: &Grid) -> Result<Vec<RowEquation>> {
  let (nx, ny) = (grid.nx(), grid.ny());
  let mut equations = Vec::with_capacity(2 * nx + ny);

  for (i, &x) in grid.x_vals().iter().enumerate() {
    equations.push(RowEquation::identity(
      grid.point_idx(i, 0),
      EquationKind::BottomTopDirichlet,
      problem.u3(x)?,
    ));
    equations.push(RowEquation::identity(
      grid.point_idx(i, ny - 1),
      EquationKind::BottomTopDirichlet,
      problem.u4(x)?,
    ));
  }

  for (j, &y) in grid.y_vals().iter().enumerate() {
    equations.push(RowEquation::identity(
      grid.point_idx(0, j),
      EquationKind::LeftDirichlet,
      problem.u1(y)?,
    ));
  }

  Ok(equations)
}

/// First order Robin rows on the right edge:
/// $(h_2 + k_1(x_r) / d x) u_(n_x - 1, j) - k_1(x_r) / d x u_(n_x - 2, j) = u_2(y_j)$.
pub fn robin_equations(problem: &ProblemDef, grid: &Grid) -> Result<Vec<RowEquation>> {
  let i = grid.nx() - 1;
  let k_dx = problem.k1(problem.domain().xr())? / grid.dx();
  let diag = problem.hi2() + k_dx;

  grid
    .y_vals()
    .iter()
    .enumerate()
    .map(|(j, &y)| -> Result<RowEquation> {
      let row = grid.point_idx(i, j);
      Ok(RowEquation {
        row,
        kind: EquationKind::Robin,
        coeffs: vec![(grid.point_idx(i - 1, j), -k_dx), (row, diag)],
        rhs: problem.u2(y)?,
      })
    })
    .collect()
}

/// Keeps the highest priority equation per row and builds the system.
///
/// Among equations of equal kind the later one wins.
/// Fails if a row has no equation at all.
pub fn resolve_equations(
  npoints: usize,
  equations: impl IntoIterator<Item = RowEquation>,
) -> Result<LinearSystem> {
  let mut resolved: Vec<Option<RowEquation>> = vec![None; npoints];
  for equation in equations {
    let slot = &mut resolved[equation.row];
    if slot.as_ref().map_or(true, |current| equation.kind >= current.kind) {
      *slot = Some(equation);
    }
  }

  let mut matrix = SparseMatrix::zeros(npoints, npoints);
  let mut rhs = na::DVector::zeros(npoints);
  let mut kinds = Vec::with_capacity(npoints);
  for (row, equation) in resolved.into_iter().enumerate() {
    let equation = equation.ok_or(Error::UndefinedRow { row })?;
    for (col, value) in equation.coeffs {
      matrix.push(row, col, value);
    }
    rhs[row] = equation.rhs;
    kinds.push(equation.kind);
  }

  Ok(LinearSystem { matrix, rhs, kinds })
}
