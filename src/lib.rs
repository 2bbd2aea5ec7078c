use log::debug;
use pest_derive::Parser;
use thiserror::Error;

pub mod classifier;
pub mod config;
pub mod format;
pub mod functions;
pub mod hints;
pub mod number;
pub mod parser;
pub mod steps;
pub mod syntax;

pub use classifier::{ProblemKind, classify, classify_with_hint};
pub use config::{DomainHint, SolveOptions};
pub use format::{SolutionBinding, Solutions, SolveResult, Warning};
pub use parser::{Parsed, parse};
pub use steps::{RuleTag, SolutionStep, StepExpr};

#[derive(Parser)]
#[grammar = "math.pest"]
pub struct MathParser;

#[derive(Error, Debug)]
pub enum SolveError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Missing parameter `{parameter}` for the {quantity} of a {shape}")]
  MissingParameterError {
    shape: String,
    quantity: String,
    parameter: String,
  },
  #[error("Invalid parameter `{parameter}` = {value}: {reason}")]
  InvalidParameterError {
    parameter: String,
    value: String,
    reason: String,
  },
  #[error("Unsupported integral: {0}")]
  UnsupportedIntegralError(String),
  #[error("Complexity limit exceeded after {steps} steps")]
  ComplexityLimitExceeded { steps: usize },
  #[error("Arithmetic error: {0}")]
  ArithmeticError(String),
}

impl SolveError {
  /// Fill in the step count for limits tripped outside the step recorder.
  fn with_steps(self, reached: usize) -> Self {
    match self {
      SolveError::ComplexityLimitExceeded { steps } => {
        SolveError::ComplexityLimitExceeded {
          steps: steps.max(reached),
        }
      }
      other => other,
    }
  }
}

/// Parse, classify and solve a problem statement.
pub fn solve(
  problem_text: &str,
  options: &SolveOptions,
) -> Result<SolveResult, SolveError> {
  debug!("solving {:?}", problem_text);
  let parsed = parser::parse_with_limit(problem_text, options.max_depth)?;
  debug!("parsed as {}", parsed);

  let (kind, mismatch) = classify_with_hint(&parsed, options.domain_hint);
  debug!("classified as {}", kind);

  let mut ctx = functions::SolveContext::new(options);
  if let Some(warning) = mismatch {
    ctx.warn(warning);
  }
  let outcome = match functions::dispatch(kind, &parsed, &mut ctx) {
    Ok(outcome) => outcome,
    Err(err) => {
      let err = err.with_steps(ctx.step_count());
      debug!("solver failed: {}", err);
      return Err(err);
    }
  };

  let mut verified = outcome.verified;
  if !outcome.solutions.is_exact() {
    // exact arithmetic overflowed somewhere along the way
    ctx.warn(Warning::InexactArithmetic);
    if verified == Some(true) {
      verified = None;
    }
  }

  let (steps, warnings) = ctx.finish();
  debug!(
    "solved with {} steps, {} warnings",
    steps.len(),
    warnings.len()
  );
  Ok(format::format(
    kind,
    outcome.solutions,
    steps,
    warnings,
    verified,
  ))
}
