use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed domain or degenerate grid, detected before assembly.
  #[error("invalid configuration of `{param}`: {reason}")]
  InvalidConfiguration { param: &'static str, reason: String },

  /// A user supplied function produced a non-finite value.
  #[error("function `{function}` evaluated to {value} at x={x}, y={y:?}")]
  FunctionEvaluation {
    function: &'static str,
    x: f64,
    y: Option<f64>,
    value: f64,
  },

  #[error("singular system: {reason}")]
  SingularSystem { reason: String },

  #[error("shape mismatch: length {len} is not {nx}x{ny}")]
  ShapeMismatch { len: usize, nx: usize, ny: usize },

  /// Linear system whose matrix is not square or does not match the rhs.
  #[error("system matrix is {nrows}x{ncols} but the rhs has length {rhs}")]
  DimensionMismatch {
    nrows: usize,
    ncols: usize,
    rhs: usize,
  },

  /// Assembly left a row without an equation.
  #[error("no equation assembled for row {row}")]
  UndefinedRow { row: usize },
}

impl Error {
  pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidConfiguration {
      param,
      reason: reason.into(),
    }
  }

  pub(crate) fn singular(reason: impl Into<String>) -> Self {
    Self::SingularSystem {
      reason: reason.into(),
    }
  }
}
