//! Finite difference solver for a 2D linear elliptic boundary value problem
//! on a rectangle, with Dirichlet conditions on the left, bottom and top edges
//! and a Robin condition on the right edge.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod convergence;
pub mod error;
pub mod field;
pub mod grid;
pub mod linalg;
pub mod problem;
pub mod solve;
pub mod sparse;

pub use error::{Error, Result};

/// Flat (row-major) index of a grid point, `j * nx + i`.
pub type PointIdx = usize;
