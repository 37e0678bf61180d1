//! Solves the reference problem and prints the field,
//! followed by a refinement study on a manufactured problem.

use fdelliptic::{
  convergence::ConvergenceStudy,
  field::{FieldSink, TextSink},
  grid::Domain,
  problem::ProblemDef,
  solve::{solve, SolveOptions},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  let problem = ProblemDef::reference()?;
  let field = solve(&problem, 50, 50)?;

  let stdout = std::io::stdout().lock();
  let mut sink = TextSink::new(stdout).with_precision(3);
  sink.consume(&field)?;

  let exact = |x: f64, y: f64| x.powi(3) + 2.0 * y.powi(3);
  let (xl, xr, yl, yr) = (1.0, 10.0, 1.0, 5.0);
  let hi2 = 5.0;
  let manufactured = ProblemDef::builder(Domain::new(xl, xr, yl, yr)?)
    .diffusion(|_| 1.0)
    .source(|x, y| 6.0 * x + 12.0 * y)
    .left(move |y| exact(xl, y))
    .right(move |y| hi2 * exact(xr, y) + 3.0 * xr * xr)
    .bottom(move |x| exact(x, yl))
    .top(move |x| exact(x, yr))
    .robin_coeff(hi2)
    .build()?;

  let study = ConvergenceStudy::tensor(&[5, 10, 20, 40, 80], &[5, 10, 20]);
  let report = study.run(&manufactured, exact, &SolveOptions::default())?;
  println!();
  println!("{report}");

  Ok(())
}
