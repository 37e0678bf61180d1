use crate::{Error, PointIdx, Result};

/// converts flat index to cartesian index
///
/// converts flat index in 0..nx*ny to cartesian index (i, j) in (0,0)..(nx,ny)
pub fn flat_index2cartesian_index(idx: PointIdx, nx: usize) -> (usize, usize) {
  (idx % nx, idx / nx)
}

/// converts cartesian index to flat index
///
/// converts cartesian index (i, j) in (0,0)..(nx,ny) to flat index in 0..nx*ny
pub fn cartesian_index2flat_index(i: usize, j: usize, nx: usize) -> PointIdx {
  j * nx + i
}

/// Axis aligned rectangle $[x_l, x_r] times [y_l, y_r]$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
  xl: f64,
  xr: f64,
  yl: f64,
  yr: f64,
}

impl Domain {
  pub fn new(xl: f64, xr: f64, yl: f64, yr: f64) -> Result<Self> {
    if !(xl.is_finite() && xr.is_finite()) || xr <= xl {
      return Err(Error::invalid(
        "xl, xr",
        format!("expected finite xl < xr, got xl={xl}, xr={xr}"),
      ));
    }
    if !(yl.is_finite() && yr.is_finite()) || yr <= yl {
      return Err(Error::invalid(
        "yl, yr",
        format!("expected finite yl < yr, got yl={yl}, yr={yr}"),
      ));
    }
    Ok(Self { xl, xr, yl, yr })
  }

  pub fn xl(&self) -> f64 {
    self.xl
  }
  pub fn xr(&self) -> f64 {
    self.xr
  }
  pub fn yl(&self) -> f64 {
    self.yl
  }
  pub fn yr(&self) -> f64 {
    self.yr
  }
  pub fn width(&self) -> f64 {
    self.xr - self.xl
  }
  pub fn height(&self) -> f64 {
    self.yr - self.yl
  }

  /// (xl, xr, yl, yr)
  pub fn extent(&self) -> (f64, f64, f64, f64) {
    (self.xl, self.xr, self.yl, self.yr)
  }
}

/// Uniform tensor product grid, including the domain boundary.
#[derive(Debug, Clone)]
pub struct Grid {
  domain: Domain,
  x_vals: Vec<f64>,
  y_vals: Vec<f64>,
}

impl Grid {
  pub fn new(domain: Domain, nx: usize, ny: usize) -> Result<Self> {
    if nx < 2 {
      return Err(Error::invalid("nx", format!("need at least 2 points, got {nx}")));
    }
    if ny < 2 {
      return Err(Error::invalid("ny", format!("need at least 2 points, got {ny}")));
    }
    let x_vals = split_interval(domain.xl, domain.xr, nx);
    let y_vals = split_interval(domain.yl, domain.yr, ny);
    Ok(Self {
      domain,
      x_vals,
      y_vals,
    })
  }

  pub fn domain(&self) -> &Domain {
    &self.domain
  }
  pub fn x_vals(&self) -> &[f64] {
    &self.x_vals
  }
  pub fn y_vals(&self) -> &[f64] {
    &self.y_vals
  }
  pub fn nx(&self) -> usize {
    self.x_vals.len()
  }
  pub fn ny(&self) -> usize {
    self.y_vals.len()
  }
  pub fn npoints(&self) -> usize {
    self.nx() * self.ny()
  }
  pub fn dx(&self) -> f64 {
    self.domain.width() / (self.nx() - 1) as f64
  }
  pub fn dy(&self) -> f64 {
    self.domain.height() / (self.ny() - 1) as f64
  }

  pub fn point_idx(&self, i: usize, j: usize) -> PointIdx {
    assert!(i < self.nx() && j < self.ny());
    cartesian_index2flat_index(i, j, self.nx())
  }
  pub fn point_cart_idx(&self, idx: PointIdx) -> (usize, usize) {
    assert!(idx < self.npoints());
    flat_index2cartesian_index(idx, self.nx())
  }
  pub fn point_pos(&self, idx: PointIdx) -> (f64, f64) {
    let (i, j) = self.point_cart_idx(idx);
    (self.x_vals[i], self.y_vals[j])
  }

  pub fn is_point_on_boundary(&self, idx: PointIdx) -> bool {
    let (i, j) = self.point_cart_idx(idx);
    i == 0 || j == 0 || i == self.nx() - 1 || j == self.ny() - 1
  }

  /// Number of points not on the boundary, $(n_x - 2)(n_y - 2)$.
  pub fn ninterior(&self) -> usize {
    (self.nx() - 2) * (self.ny() - 2)
  }
  pub fn nboundary(&self) -> usize {
    self.npoints() - self.ninterior()
  }
}

/// `npoints` uniformly spaced values from `left` to `right`, both ends exact.
fn split_interval(left: f64, right: f64, npoints: usize) -> Vec<f64> {
  let nintervals = npoints - 1;
  let step = (right - left) / nintervals as f64;
  let mut points: Vec<f64> = (0..nintervals).map(|i| left + step * i as f64).collect();
  points.push(right);
  points
}

#[cfg(test)]
mod test {
  use super::{cartesian_index2flat_index, flat_index2cartesian_index, Domain, Grid};
  use crate::Error;

  use approx::assert_relative_eq;

  #[test]
  fn grid_points_span_domain() {
    let domain = Domain::new(1.0, 10.0, 1.0, 5.0).unwrap();
    for (nx, ny) in [(2, 2), (3, 7), (5, 5), (50, 13)] {
      let grid = Grid::new(domain, nx, ny).unwrap();
      assert_eq!(grid.x_vals().len(), nx);
      assert_eq!(grid.y_vals().len(), ny);
      assert_eq!(grid.x_vals()[0], 1.0);
      assert_eq!(grid.x_vals()[nx - 1], 10.0);
      assert_eq!(grid.y_vals()[0], 1.0);
      assert_eq!(grid.y_vals()[ny - 1], 5.0);
      for w in grid.x_vals().windows(2) {
        assert_relative_eq!(w[1] - w[0], grid.dx(), max_relative = 1e-12);
      }
      for w in grid.y_vals().windows(2) {
        assert_relative_eq!(w[1] - w[0], grid.dy(), max_relative = 1e-12);
      }
    }
  }

  #[test]
  fn unit_square_spacing() {
    let grid = Grid::new(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap(), 5, 3).unwrap();
    assert_eq!(grid.x_vals(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(grid.y_vals(), &[0.0, 0.5, 1.0]);
    assert_eq!(grid.dx(), 0.25);
    assert_eq!(grid.dy(), 0.5);
    assert_eq!(grid.ninterior(), 3);
    assert_eq!(grid.nboundary(), 12);
  }

  #[test]
  fn flat_index_is_row_major() {
    let grid = Grid::new(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap(), 4, 3).unwrap();
    let mut expected = 0;
    for j in 0..grid.ny() {
      for i in 0..grid.nx() {
        assert_eq!(grid.point_idx(i, j), expected);
        assert_eq!(grid.point_cart_idx(expected), (i, j));
        expected += 1;
      }
    }
    assert_eq!(cartesian_index2flat_index(2, 1, 4), 6);
    assert_eq!(flat_index2cartesian_index(6, 4), (2, 1));
    assert_eq!(grid.point_pos(6), (grid.x_vals()[2], grid.y_vals()[1]));
  }

  #[test]
  fn boundary_points() {
    let grid = Grid::new(Domain::new(0.0, 1.0, 0.0, 1.0).unwrap(), 4, 3).unwrap();
    let boundary: Vec<_> = (0..grid.npoints())
      .filter(|&idx| grid.is_point_on_boundary(idx))
      .collect();
    assert_eq!(boundary, vec![0, 1, 2, 3, 4, 7, 8, 9, 10, 11]);
    assert_eq!(boundary.len(), grid.nboundary());
  }

  #[test]
  fn invalid_domain() {
    assert!(matches!(
      Domain::new(1.0, 1.0, 0.0, 1.0),
      Err(Error::InvalidConfiguration { param: "xl, xr", .. })
    ));
    assert!(matches!(
      Domain::new(0.0, 1.0, 2.0, 1.0),
      Err(Error::InvalidConfiguration { param: "yl, yr", .. })
    ));
    assert!(Domain::new(0.0, f64::NAN, 0.0, 1.0).is_err());
  }

  #[test]
  fn degenerate_grid() {
    let domain = Domain::new(0.0, 1.0, 0.0, 1.0).unwrap();
    assert!(matches!(
      Grid::new(domain, 1, 5),
      Err(Error::InvalidConfiguration { param: "nx", .. })
    ));
    assert!(matches!(
      Grid::new(domain, 5, 0),
      Err(Error::InvalidConfiguration { param: "ny", .. })
    ));
  }
}
