//! Solution field on the grid and its consumers.

use crate::{
  grid::{Domain, Grid},
  Error, Result,
};

use std::io::Write;

pub const X_LABEL: &str = "x";
pub const Y_LABEL: &str = "y";
pub const VALUE_LABEL: &str = "u(x, y)";

/// Maps a flat solution of length `nx * ny` to a `ny x nx` matrix,
/// with entry `(j, i)` equal to `solution[j * nx + i]`.
pub fn reshape(solution: &[f64], nx: usize, ny: usize) -> Result<na::DMatrix<f64>> {
  if solution.len() != nx * ny {
    return Err(Error::ShapeMismatch {
      len: solution.len(),
      nx,
      ny,
    });
  }
  Ok(na::DMatrix::from_row_slice(ny, nx, solution))
}

/// Inverse of [`reshape`].
pub fn flatten(values: &na::DMatrix<f64>) -> na::DVector<f64> {
  na::DVector::from_column_slice(values.transpose().as_slice())
}

/// Grid values of the solution, row `j` and column `i` belonging to point `(i, j)`.
#[derive(Debug, Clone)]
pub struct Field {
  grid: Grid,
  values: na::DMatrix<f64>,
}

impl Field {
  pub fn from_solution(grid: Grid, solution: &na::DVector<f64>) -> Result<Self> {
    let values = reshape(solution.as_slice(), grid.nx(), grid.ny())?;
    Ok(Self { grid, values })
  }

  /// Samples `u` at every grid point.
  pub fn from_fn(grid: Grid, u: impl Fn(f64, f64) -> f64) -> Self {
    let values = na::DMatrix::from_fn(grid.ny(), grid.nx(), |j, i| {
      u(grid.x_vals()[i], grid.y_vals()[j])
    });
    Self { grid, values }
  }

  pub fn grid(&self) -> &Grid {
    &self.grid
  }
  pub fn domain(&self) -> &Domain {
    self.grid.domain()
  }
  /// (xl, xr, yl, yr)
  pub fn extent(&self) -> (f64, f64, f64, f64) {
    self.domain().extent()
  }
  pub fn x_vals(&self) -> &[f64] {
    self.grid.x_vals()
  }
  pub fn y_vals(&self) -> &[f64] {
    self.grid.y_vals()
  }
  pub fn nx(&self) -> usize {
    self.values.ncols()
  }
  pub fn ny(&self) -> usize {
    self.values.nrows()
  }

  pub fn get(&self, i: usize, j: usize) -> f64 {
    self.values[(j, i)]
  }
  /// Values along $y = y_j$.
  pub fn row(&self, j: usize) -> Vec<f64> {
    self.values.row(j).iter().copied().collect()
  }
  /// Values along $x = x_i$.
  pub fn column(&self, i: usize) -> Vec<f64> {
    self.values.column(i).iter().copied().collect()
  }

  pub fn as_matrix(&self) -> &na::DMatrix<f64> {
    &self.values
  }
  pub fn into_matrix(self) -> na::DMatrix<f64> {
    self.values
  }
  pub fn flatten(&self) -> na::DVector<f64> {
    flatten(&self.values)
  }

  pub fn min(&self) -> f64 {
    self.values.min()
  }
  pub fn max(&self) -> f64 {
    self.values.max()
  }
  pub fn is_finite(&self) -> bool {
    self.values.iter().all(|v| v.is_finite())
  }

  /// Max norm of the pointwise difference.
  pub fn max_abs_diff(&self, other: &Field) -> Result<f64> {
    if self.values.shape() != other.values.shape() {
      return Err(Error::ShapeMismatch {
        len: other.values.len(),
        nx: self.nx(),
        ny: self.ny(),
      });
    }
    Ok((&self.values - &other.values).amax())
  }
}

/// Consumer of a solved field, e.g. a plotting or printing backend.
pub trait FieldSink {
  fn consume(&mut self, field: &Field) -> std::io::Result<()>;
}

/// Writes the field as a plain text table, top row ($y = y_r$) first.
pub struct TextSink<W: Write> {
  writer: W,
  precision: usize,
}

impl<W: Write> TextSink<W> {
  pub fn new(writer: W) -> Self {
    Self {
      writer,
      precision: 6,
    }
  }
  pub fn with_precision(mut self, precision: usize) -> Self {
    self.precision = precision;
    self
  }
  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W: Write> FieldSink for TextSink<W> {
  fn consume(&mut self, field: &Field) -> std::io::Result<()> {
    let prec = self.precision;
    let (xl, xr, yl, yr) = field.extent();
    writeln!(
      self.writer,
      "# {VALUE_LABEL} on {X_LABEL} in [{xl}, {xr}], {Y_LABEL} in [{yl}, {yr}], {}x{}",
      field.nx(),
      field.ny()
    )?;

    write!(self.writer, "{Y_LABEL:>w$} |", w = prec + 8)?;
    for x in field.x_vals() {
      write!(self.writer, " {x:>w$.prec$}", w = prec + 8)?;
    }
    writeln!(self.writer)?;

    for j in (0..field.ny()).rev() {
      write!(self.writer, "{:>w$.prec$} |", field.y_vals()[j], w = prec + 8)?;
      for i in 0..field.nx() {
        write!(self.writer, " {:>w$.prec$e}", field.get(i, j), w = prec + 8)?;
      }
      writeln!(self.writer)?;
    }
    write!(self.writer, "{:>w$}  ", "", w = prec + 8)?;
    writeln!(self.writer, "{X_LABEL}")?;
    self.writer.flush()
  }
}
