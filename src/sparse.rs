use crate::{Error, Result};

use itertools::Itertools;

/// Sparse matrix in triplet (COO) form.
///
/// Zero values are never stored.
#[derive(Default, Debug, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self {
      nrows,
      ncols,
      triplets: Vec::new(),
    }
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    let mut this = Self::zeros(nrows, ncols);
    this.triplets.reserve(triplets.len());
    for (r, c, v) in triplets {
      this.push(r, c, v);
    }
    this
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn nnz(&self) -> usize {
    self.triplets.len()
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }

  pub fn into_parts(self) -> (usize, usize, Vec<(usize, usize, f64)>) {
    (self.nrows, self.ncols, self.triplets)
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows() && c < self.ncols());
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  /// Entries of row `r`, sorted by column.
  pub fn row(&self, r: usize) -> Vec<(usize, f64)> {
    self
      .triplets
      .iter()
      .filter(|t| t.0 == r)
      .map(|&(_, c, v)| (c, v))
      .sorted_by_key(|&(c, _)| c)
      .collect()
  }

  pub fn diagonal(&self) -> na::DVector<f64> {
    let mut diagonal = na::DVector::zeros(self.nrows.min(self.ncols));
    for &(r, c, v) in &self.triplets {
      if r == c {
        diagonal[r] += v;
      }
    }
    diagonal
  }

  /// Rows without any stored entry.
  pub fn empty_rows(&self) -> Vec<usize> {
    let mut occupied = vec![false; self.nrows];
    self.triplets.iter().for_each(|t| occupied[t.0] = true);
    unset_indices(&occupied)
  }

  /// Columns without any stored entry.
  pub fn empty_cols(&self) -> Vec<usize> {
    let mut occupied = vec![false; self.ncols];
    self.triplets.iter().for_each(|t| occupied[t.1] = true);
    unset_indices(&occupied)
  }

  pub fn to_nalgebra_coo(&self) -> Result<nas::CooMatrix<f64>> {
    let (rows, cols, vals): (Vec<_>, Vec<_>, Vec<_>) =
      self.triplets.iter().copied().multiunzip();
    nas::CooMatrix::try_from_triplets(self.nrows, self.ncols, rows, cols, vals)
      .map_err(|err| Error::singular(format!("invalid sparse triplets: {err}")))
  }

  pub fn to_nalgebra_csc(&self) -> Result<nas::CscMatrix<f64>> {
    Ok((&self.to_nalgebra_coo()?).into())
  }

  pub fn to_nalgebra_dense(&self) -> Result<na::DMatrix<f64>> {
    Ok((&self.to_nalgebra_coo()?).into())
  }

  pub fn to_faer_csc(&self) -> Result<faer::sparse::SparseColMat<usize, f64>> {
    faer::sparse::SparseColMat::try_new_from_triplets(self.nrows, self.ncols, &self.triplets)
      .map_err(|err| Error::singular(format!("failed to build sparse matrix: {err:?}")))
  }
}

fn unset_indices(occupied: &[bool]) -> Vec<usize> {
  occupied
    .iter()
    .enumerate()
    .filter_map(|(i, &flag)| (!flag).then_some(i))
    .collect()
}
