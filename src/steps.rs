//! The ordered derivation log threaded through every solver.

use std::fmt;

use log::{trace, warn};
use serde::{Serialize, Serializer};

use crate::SolveError;
use crate::syntax::{Equation, Expr};

/// The rule a step applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTag {
  // Equations
  Restate,
  MoveTerms,
  CombineLikeTerms,
  IsolateTerm,
  DivideCoefficient,
  Identity,
  Contradiction,
  StandardForm,
  Discriminant,
  QuadraticFormula,
  Factor,
  Eliminate,
  Normalize,
  Inconsistent,
  FreeVariable,
  Verify,
  // Geometry
  Formula,
  Substitute,
  Evaluate,
  // Differentiation
  ConstantRule,
  VariableRule,
  SumRule,
  DifferenceRule,
  ConstantMultipleRule,
  ProductRule,
  QuotientRule,
  PowerRule,
  TrigonometricRule,
  ExponentialRule,
  LogarithmicRule,
  ChainRule,
  // Integration
  Linearity,
  ConstantIntegral,
  PowerIntegral,
  ReciprocalIntegral,
  TrigonometricIntegral,
  ExponentialIntegral,
  IntegrationConstant,
  Simplify,
}

impl RuleTag {
  pub fn as_str(self) -> &'static str {
    match self {
      RuleTag::Restate => "restate",
      RuleTag::MoveTerms => "move_terms",
      RuleTag::CombineLikeTerms => "combine_like_terms",
      RuleTag::IsolateTerm => "isolate_term",
      RuleTag::DivideCoefficient => "divide_coefficient",
      RuleTag::Identity => "identity",
      RuleTag::Contradiction => "contradiction",
      RuleTag::StandardForm => "standard_form",
      RuleTag::Discriminant => "discriminant",
      RuleTag::QuadraticFormula => "quadratic_formula",
      RuleTag::Factor => "factor",
      RuleTag::Eliminate => "eliminate",
      RuleTag::Normalize => "normalize",
      RuleTag::Inconsistent => "inconsistent",
      RuleTag::FreeVariable => "free_variable",
      RuleTag::Verify => "verify",
      RuleTag::Formula => "formula",
      RuleTag::Substitute => "substitute",
      RuleTag::Evaluate => "evaluate",
      RuleTag::ConstantRule => "constant_rule",
      RuleTag::VariableRule => "variable_rule",
      RuleTag::SumRule => "sum_rule",
      RuleTag::DifferenceRule => "difference_rule",
      RuleTag::ConstantMultipleRule => "constant_multiple_rule",
      RuleTag::ProductRule => "product_rule",
      RuleTag::QuotientRule => "quotient_rule",
      RuleTag::PowerRule => "power_rule",
      RuleTag::TrigonometricRule => "trigonometric_rule",
      RuleTag::ExponentialRule => "exponential_rule",
      RuleTag::LogarithmicRule => "logarithmic_rule",
      RuleTag::ChainRule => "chain_rule",
      RuleTag::Linearity => "linearity",
      RuleTag::ConstantIntegral => "constant_integral",
      RuleTag::PowerIntegral => "power_integral",
      RuleTag::ReciprocalIntegral => "reciprocal_integral",
      RuleTag::TrigonometricIntegral => "trigonometric_integral",
      RuleTag::ExponentialIntegral => "exponential_integral",
      RuleTag::IntegrationConstant => "integration_constant",
      RuleTag::Simplify => "simplify",
    }
  }
}

impl fmt::Display for RuleTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What a step shows: an expression or an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepExpr {
  Expr(Expr),
  Equation(Equation),
}

impl From<Expr> for StepExpr {
  fn from(e: Expr) -> Self {
    StepExpr::Expr(e)
  }
}

impl From<Equation> for StepExpr {
  fn from(eq: Equation) -> Self {
    StepExpr::Equation(eq)
  }
}

impl fmt::Display for StepExpr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StepExpr::Expr(e) => write!(f, "{}", e),
      StepExpr::Equation(eq) => write!(f, "{}", eq),
    }
  }
}

impl Serialize for StepExpr {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionStep {
  order: usize,
  description: String,
  rule: RuleTag,
  expression: StepExpr,
}

impl SolutionStep {
  /// 1-based position in the derivation.
  pub fn order(&self) -> usize {
    self.order
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn rule(&self) -> RuleTag {
    self.rule
  }

  pub fn expression(&self) -> &StepExpr {
    &self.expression
  }
}

impl fmt::Display for SolutionStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}. {}: {} [{}]",
      self.order, self.description, self.expression, self.rule
    )
  }
}

/// Append-only step log with a budget.
#[derive(Debug)]
pub struct StepRecorder {
  steps: Vec<SolutionStep>,
  max_steps: usize,
}

impl StepRecorder {
  pub fn new(max_steps: usize) -> Self {
    StepRecorder {
      steps: Vec::new(),
      max_steps,
    }
  }

  pub fn record(
    &mut self,
    description: impl Into<String>,
    rule: RuleTag,
    expression: impl Into<StepExpr>,
  ) -> Result<(), SolveError> {
    if self.steps.len() >= self.max_steps {
      warn!("step budget of {} exhausted", self.max_steps);
      return Err(SolveError::ComplexityLimitExceeded {
        steps: self.steps.len(),
      });
    }
    let step = SolutionStep {
      order: self.steps.len() + 1,
      description: description.into(),
      rule,
      expression: expression.into(),
    };
    trace!("{}", step);
    self.steps.push(step);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn steps(&self) -> &[SolutionStep] {
    &self.steps
  }

  pub fn into_steps(self) -> Vec<SolutionStep> {
    self.steps
  }
}
