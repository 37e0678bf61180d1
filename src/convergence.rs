//! Grid refinement study against a known exact solution.

use crate::{
  field::Field,
  problem::ProblemDef,
  solve::{solve_with, SolveOptions},
  Result,
};

use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceRecord {
  pub nx: usize,
  pub ny: usize,
  /// Coarser of the two grid spacings, $max(d x, d y)$.
  pub h: f64,
  /// Max norm of the difference to the exact solution at the grid points.
  pub max_error: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvergenceReport {
  pub records: Vec<ConvergenceRecord>,
}

impl ConvergenceReport {
  /// Observed orders $log(e_k / e_(k+1)) / log(h_k / h_(k+1))$ for
  /// consecutive records.
  ///
  /// `None` where the spacing $h$ does not change or an error vanishes.
  pub fn orders(&self) -> Vec<Option<f64>> {
    self
      .records
      .windows(2)
      .map(|w| observed_order(&w[0], &w[1]))
      .collect()
  }
}

fn observed_order(coarse: &ConvergenceRecord, fine: &ConvergenceRecord) -> Option<f64> {
  let hratio = (coarse.h / fine.h).ln();
  let eratio = (coarse.max_error / fine.max_error).ln();
  let order = eratio / hratio;
  (hratio != 0.0 && order.is_finite()).then_some(order)
}

impl fmt::Display for ConvergenceReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{:<6}{:<6}{:>14}{:>20}", "nx", "ny", "h", "max error")?;
    for record in &self.records {
      writeln!(
        f,
        "{:<6}{:<6}{:>14.6e}{:>20.12e}",
        record.nx, record.ny, record.h, record.max_error
      )?;
    }
    Ok(())
  }
}

/// Sequence of grid resolutions to solve on.
#[derive(Debug, Clone)]
pub struct ConvergenceStudy {
  resolutions: Vec<(usize, usize)>,
}

impl ConvergenceStudy {
  pub fn new(resolutions: Vec<(usize, usize)>) -> Self {
    Self { resolutions }
  }

  /// All pairs of `nxs` and `nys`, x major.
  pub fn tensor(nxs: &[usize], nys: &[usize]) -> Self {
    let resolutions = itertools::iproduct!(nxs.iter().copied(), nys.iter().copied()).collect();
    Self { resolutions }
  }

  pub fn resolutions(&self) -> &[(usize, usize)] {
    &self.resolutions
  }

  pub fn run<F>(
    &self,
    problem: &ProblemDef,
    exact: F,
    options: &SolveOptions,
  ) -> Result<ConvergenceReport>
  where
    F: Fn(f64, f64) -> f64,
  {
    let mut records = Vec::with_capacity(self.resolutions.len());
    for &(nx, ny) in &self.resolutions {
      let field = solve_with(problem, nx, ny, options)?;
      let reference = Field::from_fn(field.grid().clone(), &exact);
      let max_error = field.max_abs_diff(&reference)?;
      let h = field.grid().dx().max(field.grid().dy());
      info!(nx, ny, h, max_error, "convergence step");
      records.push(ConvergenceRecord {
        nx,
        ny,
        h,
        max_error,
      });
    }
    Ok(ConvergenceReport { records })
  }
}
