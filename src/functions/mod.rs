//! Domain solvers and the capability they share.

pub mod algebra;
pub mod arithmetic;
pub mod calculus;
pub mod geometry;
pub mod polynomial;
pub mod system;

use std::collections::BTreeSet;

use log::warn;

use crate::SolveError;
use crate::classifier::ProblemKind;
use crate::config::SolveOptions;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::parser::Parsed;
use crate::steps::{RuleTag, SolutionStep, StepExpr, StepRecorder};
use crate::syntax::{Equation, Expr};
use polynomial::Polynomial;

/// Per-request state: options, the step log and collected warnings.
pub struct SolveContext<'a> {
  options: &'a SolveOptions,
  recorder: StepRecorder,
  warnings: BTreeSet<Warning>,
}

impl<'a> SolveContext<'a> {
  pub fn new(options: &'a SolveOptions) -> Self {
    SolveContext {
      options,
      recorder: StepRecorder::new(options.max_steps),
      warnings: BTreeSet::new(),
    }
  }

  pub fn options(&self) -> &SolveOptions {
    self.options
  }

  pub fn record(
    &mut self,
    description: impl Into<String>,
    rule: RuleTag,
    expression: impl Into<StepExpr>,
  ) -> Result<(), SolveError> {
    self.recorder.record(description, rule, expression)
  }

  pub fn warn(&mut self, warning: Warning) {
    self.warnings.insert(warning);
  }

  pub fn step_count(&self) -> usize {
    self.recorder.len()
  }

  pub fn finish(self) -> (Vec<SolutionStep>, BTreeSet<Warning>) {
    (self.recorder.into_steps(), self.warnings)
  }
}

/// What a solver hands to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
  pub solutions: Solutions,
  pub verified: Option<bool>,
}

impl Outcome {
  pub fn new(solutions: Solutions, verified: Option<bool>) -> Self {
    Outcome {
      solutions,
      verified,
    }
  }
}

pub trait Solver {
  type Input: ?Sized;

  fn solve(
    &self,
    input: &Self::Input,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError>;
}

/// Route a classified problem to its solver.
pub fn dispatch(
  kind: ProblemKind,
  parsed: &Parsed,
  ctx: &mut SolveContext<'_>,
) -> Result<Outcome, SolveError> {
  match (kind, parsed) {
    (ProblemKind::LinearEquation, Parsed::Equation(eq)) => {
      algebra::LinearSolver.solve(eq, ctx)
    }
    (ProblemKind::QuadraticEquation, Parsed::Equation(eq)) => {
      algebra::QuadraticSolver.solve(eq, ctx)
    }
    (ProblemKind::SystemOfEquations, Parsed::System(equations)) => {
      system::SystemSolver.solve(equations.as_slice(), ctx)
    }
    (ProblemKind::GeometryQuery, Parsed::Geometry(query)) => {
      geometry::GeometrySolver.solve(query, ctx)
    }
    (ProblemKind::Differentiation, Parsed::Calculus(query)) => {
      calculus::DifferentiationSolver.solve(query, ctx)
    }
    (ProblemKind::Integration, Parsed::Calculus(query)) => {
      calculus::IntegrationSolver.solve(query, ctx)
    }
    (ProblemKind::Arithmetic, Parsed::Expression(expr)) => {
      arithmetic::ArithmeticSolver.solve(expr, ctx)
    }
    _ => {
      warn!("no solver for {}", parsed);
      ctx.warn(Warning::UnsupportedProblem);
      Ok(Outcome::new(Solutions::Bindings(Vec::new()), None))
    }
  }
}

// ─── Verification ───────────────────────────────────────────────────

/// Substitute `bindings` into `eq`: `Some(true)` when the residue vanishes
/// exactly, `Some(false)` when it is a provably non-zero value, `None`
/// otherwise. Under `assume_real` a closed side that is not a real number,
/// such as `√(-3)`, fails the check.
pub(crate) fn verify_equation(
  eq: &Equation,
  bindings: &[SolutionBinding],
  assume_real: bool,
) -> Result<Option<bool>, SolveError> {
  let mut lhs = eq.lhs().clone();
  let mut rhs = eq.rhs().clone();
  for binding in bindings {
    lhs = lhs.substitute(binding.variable(), binding.value());
    rhs = rhs.substitute(binding.variable(), binding.value());
  }
  if assume_real {
    for side in [&lhs, &rhs] {
      if side.free_variables().is_empty() && side.approximate().is_none() {
        return Ok(Some(false));
      }
    }
  }
  let residue = Polynomial::from_expr(&Expr::sub(lhs.clone(), rhs.clone()))?;
  let exact = lhs.is_exact() && rhs.is_exact() && residue.is_exact();
  Ok(if residue.is_negligible() {
    // floating-point noise can hide a wrong answer
    exact.then_some(true)
  } else if residue.is_algebraic() {
    Some(false)
  } else {
    None
  })
}

/// All checks passed, any failed, or inconclusive.
pub(crate) fn combine_verdicts(
  verdicts: impl IntoIterator<Item = Option<bool>>,
) -> Option<bool> {
  let mut all_true = true;
  for verdict in verdicts {
    match verdict {
      Some(false) => return Some(false),
      None => all_true = false,
      Some(true) => {}
    }
  }
  if all_true {
    Some(true)
  } else {
    None
  }
}

/// `x` when present, otherwise the first of `candidates`.
pub(crate) fn target_variable(candidates: &[String]) -> Option<String> {
  if candidates.iter().any(|v| v == "x") {
    Some("x".to_string())
  } else {
    candidates.first().cloned()
  }
}
