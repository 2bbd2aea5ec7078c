//! Deciding which solver handles a parsed problem.

use std::fmt;

use serde::Serialize;

use crate::config::DomainHint;
use crate::format::Warning;
use crate::functions::geometry;
use crate::functions::polynomial::Polynomial;
use crate::parser::{CalculusOperation, Parsed};
use crate::syntax::Equation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
  LinearEquation,
  QuadraticEquation,
  SystemOfEquations,
  GeometryQuery,
  Differentiation,
  Integration,
  Arithmetic,
  Unsupported,
}

impl ProblemKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ProblemKind::LinearEquation => "linear_equation",
      ProblemKind::QuadraticEquation => "quadratic_equation",
      ProblemKind::SystemOfEquations => "system_of_equations",
      ProblemKind::GeometryQuery => "geometry_query",
      ProblemKind::Differentiation => "differentiation",
      ProblemKind::Integration => "integration",
      ProblemKind::Arithmetic => "arithmetic",
      ProblemKind::Unsupported => "unsupported",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      ProblemKind::LinearEquation => "linear equation",
      ProblemKind::QuadraticEquation => "quadratic equation",
      ProblemKind::SystemOfEquations => "system of linear equations",
      ProblemKind::GeometryQuery => "geometry",
      ProblemKind::Differentiation => "differentiation",
      ProblemKind::Integration => "integration",
      ProblemKind::Arithmetic => "arithmetic",
      ProblemKind::Unsupported => "unsupported",
    }
  }

  fn domain(self) -> Option<DomainHint> {
    match self {
      ProblemKind::LinearEquation
      | ProblemKind::QuadraticEquation
      | ProblemKind::SystemOfEquations
      | ProblemKind::Arithmetic => Some(DomainHint::Algebra),
      ProblemKind::GeometryQuery => Some(DomainHint::Geometry),
      ProblemKind::Differentiation | ProblemKind::Integration => {
        Some(DomainHint::Calculus)
      }
      ProblemKind::Unsupported => None,
    }
  }
}

impl fmt::Display for ProblemKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

pub fn classify(parsed: &Parsed) -> ProblemKind {
  match parsed {
    Parsed::Equation(eq) => classify_equation(eq),
    Parsed::System(equations) => {
      if is_linear_system(equations) {
        ProblemKind::SystemOfEquations
      } else {
        ProblemKind::Unsupported
      }
    }
    Parsed::Geometry(query) => {
      if geometry::formula_for(query).is_some() {
        ProblemKind::GeometryQuery
      } else {
        ProblemKind::Unsupported
      }
    }
    Parsed::Calculus(query) => match query.operation {
      CalculusOperation::Derivative => ProblemKind::Differentiation,
      CalculusOperation::Integral => ProblemKind::Integration,
    },
    Parsed::Expression(e) if e.free_variables().is_empty() => {
      ProblemKind::Arithmetic
    }
    Parsed::Expression(_) => ProblemKind::Unsupported,
  }
}

/// Classify, then reject kinds outside the hinted domain.
pub fn classify_with_hint(
  parsed: &Parsed,
  hint: DomainHint,
) -> (ProblemKind, Option<Warning>) {
  let kind = classify(parsed);
  if hint == DomainHint::Auto || kind == ProblemKind::Unsupported {
    return (kind, None);
  }
  if kind.domain() == Some(hint) {
    (kind, None)
  } else {
    log::debug!("{} rejected by domain hint {:?}", kind, hint);
    (ProblemKind::Unsupported, Some(Warning::DomainHintMismatch))
  }
}

fn classify_equation(eq: &Equation) -> ProblemKind {
  match Polynomial::from_expr(&eq.residual()) {
    Ok(poly) => match poly.max_variable_degree() {
      Some(0 | 1) => ProblemKind::LinearEquation,
      Some(2) => ProblemKind::QuadraticEquation,
      _ => ProblemKind::Unsupported,
    },
    // The linear solver normalizes again and reports the failure.
    Err(_) => ProblemKind::LinearEquation,
  }
}

fn is_linear_system(equations: &[Equation]) -> bool {
  let mut vars: Vec<String> = Vec::new();
  for eq in equations {
    for v in eq.variables() {
      if !vars.contains(v) {
        vars.push(v.clone());
      }
    }
  }
  equations.iter().all(|eq| {
    Polynomial::from_expr(&eq.residual())
      .map(|p| p.linear_row(&vars).is_some())
      .unwrap_or(false)
  })
}
