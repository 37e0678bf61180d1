//! Problem data: domain, coefficient, source and boundary functions.
//!
//! The discretized operator is
//! $k_1(x) u_(x x) + u_(y y) = f(x, y)$ on $[x_l, x_r] times [y_l, y_r]$ with
//! - $u(x_l, y) = u_1(y)$ (left, Dirichlet)
//! - $h_2 u(x_r, y) + k_1(x_r) partial_x u(x_r, y) = u_2(y)$ (right, Robin)
//! - $u(x, y_l) = u_3(x)$ (bottom, Dirichlet)
//! - $u(x, y_r) = u_4(x)$ (top, Dirichlet)

use crate::{grid::Domain, Error, Result};

use std::fmt;

pub type ScalarFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;
pub type ScalarFn2 = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

pub struct ProblemDef {
  domain: Domain,
  k1: ScalarFn,
  f: ScalarFn2,
  u1: ScalarFn,
  u2: ScalarFn,
  u3: ScalarFn,
  u4: ScalarFn,
  hi2: f64,
}

impl ProblemDef {
  pub fn builder(domain: Domain) -> ProblemDefBuilder {
    ProblemDefBuilder::new(domain)
  }

  /// The reference configuration on $[1, 10] times [1, 5]$.
  pub fn reference() -> Result<Self> {
    let domain = Domain::new(1.0, 10.0, 1.0, 5.0)?;
    Self::builder(domain)
      .diffusion(|_| 2.0)
      .source(|x, y| -36.0 * x - 12.0 * y)
      .left(|y| 3.0 + 2.0 * y.powi(3))
      .right(|y| 15000.0 + 10.0 * y.powi(3) + 1800.0)
      .bottom(|x| 3.0 * x.powi(3) + 2.0)
      .top(|x| 3.0 * x.powi(3) + 250.0)
      .robin_coeff(5.0)
      .build()
  }

  pub fn domain(&self) -> &Domain {
    &self.domain
  }
  pub fn hi2(&self) -> f64 {
    self.hi2
  }

  pub fn k1(&self, x: f64) -> Result<f64> {
    checked("k1", x, None, (self.k1)(x))
  }
  pub fn f(&self, x: f64, y: f64) -> Result<f64> {
    checked("f", x, Some(y), (self.f)(x, y))
  }
  pub fn u1(&self, y: f64) -> Result<f64> {
    checked("u1", self.domain.xl(), Some(y), (self.u1)(y))
  }
  pub fn u2(&self, y: f64) -> Result<f64> {
    checked("u2", self.domain.xr(), Some(y), (self.u2)(y))
  }
  pub fn u3(&self, x: f64) -> Result<f64> {
    checked("u3", x, Some(self.domain.yl()), (self.u3)(x))
  }
  pub fn u4(&self, x: f64) -> Result<f64> {
    checked("u4", x, Some(self.domain.yr()), (self.u4)(x))
  }
}

impl fmt::Debug for ProblemDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProblemDef")
      .field("domain", &self.domain)
      .field("hi2", &self.hi2)
      .finish_non_exhaustive()
  }
}

fn checked(function: &'static str, x: f64, y: Option<f64>, value: f64) -> Result<f64> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(Error::FunctionEvaluation {
      function,
      x,
      y,
      value,
    })
  }
}

pub struct ProblemDefBuilder {
  domain: Domain,
  k1: Option<ScalarFn>,
  f: Option<ScalarFn2>,
  u1: Option<ScalarFn>,
  u2: Option<ScalarFn>,
  u3: Option<ScalarFn>,
  u4: Option<ScalarFn>,
  hi2: Option<f64>,
}

impl ProblemDefBuilder {
  fn new(domain: Domain) -> Self {
    Self {
      domain,
      k1: None,
      f: None,
      u1: None,
      u2: None,
      u3: None,
      u4: None,
      hi2: None,
    }
  }

  /// Diffusion coefficient $k_1(x)$.
  pub fn diffusion(mut self, k1: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    self.k1 = Some(Box::new(k1));
    self
  }
  /// Source term $f(x, y)$.
  pub fn source(mut self, f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
    self.f = Some(Box::new(f));
    self
  }
  /// Dirichlet data $u_1(y)$ on the left edge.
  pub fn left(mut self, u1: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    self.u1 = Some(Box::new(u1));
    self
  }
  /// Robin data $u_2(y)$ on the right edge.
  pub fn right(mut self, u2: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    self.u2 = Some(Box::new(u2));
    self
  }
  /// Dirichlet data $u_3(x)$ on the bottom edge.
  pub fn bottom(mut self, u3: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    self.u3 = Some(Box::new(u3));
    self
  }
  /// Dirichlet data $u_4(x)$ on the top edge.
  pub fn top(mut self, u4: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    self.u4 = Some(Box::new(u4));
    self
  }
  /// Robin coefficient $h_2$.
  pub fn robin_coeff(mut self, hi2: f64) -> Self {
    self.hi2 = Some(hi2);
    self
  }

  pub fn build(self) -> Result<ProblemDef> {
    let hi2 = required("hi2", self.hi2)?;
    if !hi2.is_finite() {
      return Err(Error::invalid("hi2", format!("must be finite, got {hi2}")));
    }
    Ok(ProblemDef {
      domain: self.domain,
      k1: required("k1", self.k1)?,
      f: required("f", self.f)?,
      u1: required("u1", self.u1)?,
      u2: required("u2", self.u2)?,
      u3: required("u3", self.u3)?,
      u4: required("u4", self.u4)?,
      hi2,
    })
  }
}

fn required<T>(param: &'static str, value: Option<T>) -> Result<T> {
  value.ok_or_else(|| Error::invalid(param, "not set"))
}
