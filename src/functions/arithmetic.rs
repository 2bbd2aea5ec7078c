//! Evaluation of expressions without unknowns.

use log::debug;

use crate::SolveError;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::functions::polynomial::simplify;
use crate::functions::{Outcome, SolveContext, Solver};
use crate::number::format_decimal;
use crate::steps::RuleTag;
use crate::syntax::{Constant, Equation, Expr};

pub struct ArithmeticSolver;

/// Name of the single binding an evaluation produces.
const RESULT: &str = "value";

impl Solver for ArithmeticSolver {
  type Input = Expr;

  fn solve(
    &self,
    expr: &Expr,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    ctx.record("Restate the expression", RuleTag::Restate, expr.clone())?;
    let value = simplify(expr)?;
    debug!("{} evaluates to {}", expr, value);

    if ctx.options().assume_real && value.contains_constant(Constant::I) {
      ctx.warn(Warning::AssumedRealDomain);
      ctx.record(
        format!("{} is not a real number", value),
        RuleTag::Evaluate,
        Equation::new(expr.clone(), value),
      )?;
      return Ok(Outcome::new(Solutions::NoRealSolution, None));
    }

    let approx = value.approximate();
    let description = match approx {
      Some(a) if value.as_number().is_none() => {
        format!("Evaluate (≈ {})", format_decimal(a, 6))
      }
      _ => "Evaluate".to_string(),
    };
    ctx.record(
      description,
      RuleTag::Evaluate,
      Equation::new(expr.clone(), value.clone()),
    )?;

    let verified = match (approx, expr.approximate()) {
      (Some(a), Some(b)) => Some((a - b).abs() <= 1e-9 * b.abs().max(1.0)),
      _ => None,
    };
    let binding = SolutionBinding::new(RESULT, value);
    Ok(Outcome::new(Solutions::Bindings(vec![binding]), verified))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SolveOptions;

  fn evaluate(text: &str, options: &SolveOptions) -> Outcome {
    let expr = match crate::parser::parse(text).unwrap() {
      crate::parser::Parsed::Expression(e) => e,
      other => panic!("not an expression: {}", other),
    };
    let mut ctx = SolveContext::new(options);
    ArithmeticSolver.solve(&expr, &mut ctx).unwrap()
  }

  #[test]
  fn precedence_is_respected() {
    let outcome = evaluate("2 + 3*4", &SolveOptions::default());
    let Solutions::Bindings(bindings) = &outcome.solutions else {
      panic!("expected a binding");
    };
    assert_eq!(bindings[0].to_string(), "value = 14");
    assert_eq!(outcome.verified, Some(true));
  }

  #[test]
  fn radicals_stay_exact() {
    let outcome = evaluate("sqrt(8)", &SolveOptions::default());
    let Solutions::Bindings(bindings) = &outcome.solutions else {
      panic!("expected a binding");
    };
    assert_eq!(bindings[0].value().to_string(), "2√2");
  }

  #[test]
  fn imaginary_value_outside_the_reals() {
    let outcome = evaluate("sqrt(-4)", &SolveOptions::default());
    assert_eq!(outcome.solutions, Solutions::NoRealSolution);
  }
}
