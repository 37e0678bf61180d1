//! Direct solvers for the assembled system.
//!
//! The Robin rows make the matrix unsymmetric, so only general LU
//! factorizations are offered.

use crate::{sparse::SparseMatrix, Error, Result};

use faer::solvers::SpSolver;
use std::panic::{self, AssertUnwindSafe};

pub trait LinearSolver {
  fn solve(&self, matrix: &SparseMatrix, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>>;

  fn name(&self) -> &'static str {
    "unknown"
  }
}

/// Selects a [`LinearSolver`] backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverKind {
  #[default]
  SparseLu,
  DenseLu,
}

impl SolverKind {
  pub fn backend(self) -> Box<dyn LinearSolver> {
    match self {
      Self::SparseLu => Box::new(SparseLu),
      Self::DenseLu => Box::new(DenseLu),
    }
  }
}

/// Sparse LU with partial pivoting, backed by faer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparseLu;

impl LinearSolver for SparseLu {
  fn solve(&self, matrix: &SparseMatrix, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    check_dims(matrix, rhs)?;
    check_structure(matrix)?;
    let lu = FaerLu::new(matrix)?;
    check_finite(lu.solve(rhs))
  }

  fn name(&self) -> &'static str {
    "sparse LU (faer)"
  }
}

/// Dense LU with partial pivoting, backed by nalgebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseLu;

impl LinearSolver for DenseLu {
  fn solve(&self, matrix: &SparseMatrix, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    check_dims(matrix, rhs)?;
    let dense = matrix.to_nalgebra_dense()?;
    let solution = dense
      .lu()
      .solve(rhs)
      .ok_or_else(|| Error::singular("zero pivot in dense LU"))?;
    check_finite(solution)
  }

  fn name(&self) -> &'static str {
    "dense LU (nalgebra)"
  }
}

pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  /// faer panics on an exact zero pivot instead of returning an error,
  /// so the factorization runs under `catch_unwind`.
  pub fn new(a: &SparseMatrix) -> Result<Self> {
    let csc = a.to_faer_csc()?;
    let raw = panic::catch_unwind(AssertUnwindSafe(|| csc.sp_lu()))
      .map_err(|_| Error::singular("zero pivot in sparse LU"))?
      .map_err(|err| Error::singular(format!("sparse LU failed: {err:?}")))?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::col::from_slice(b.as_slice());
    na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

/// $||A x - b|| / ||b||$, or the absolute residual if $b = 0$.
pub fn relative_residual(
  matrix: &SparseMatrix,
  x: &na::DVector<f64>,
  b: &na::DVector<f64>,
) -> Result<f64> {
  let csc = matrix.to_nalgebra_csc()?;
  let residual = (&csc * x - b).norm();
  let bnorm = b.norm();
  Ok(if bnorm > 0.0 { residual / bnorm } else { residual })
}

fn check_dims(matrix: &SparseMatrix, rhs: &na::DVector<f64>) -> Result<()> {
  if matrix.nrows() != matrix.ncols() || matrix.nrows() != rhs.len() {
    return Err(Error::DimensionMismatch {
      nrows: matrix.nrows(),
      ncols: matrix.ncols(),
      rhs: rhs.len(),
    });
  }
  Ok(())
}

/// Zero rows or columns make the matrix structurally singular.
fn check_structure(matrix: &SparseMatrix) -> Result<()> {
  if let Some(&row) = matrix.empty_rows().first() {
    return Err(Error::singular(format!("row {row} is identically zero")));
  }
  if let Some(&col) = matrix.empty_cols().first() {
    return Err(Error::singular(format!("column {col} is identically zero")));
  }
  Ok(())
}

fn check_finite(solution: na::DVector<f64>) -> Result<na::DVector<f64>> {
  match solution.iter().position(|v| !v.is_finite()) {
    Some(i) => Err(Error::singular(format!(
      "non-finite solution entry {} at {i}",
      solution[i]
    ))),
    None => Ok(solution),
  }
}
