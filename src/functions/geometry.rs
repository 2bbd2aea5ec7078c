//! Closed-form geometry: areas, perimeters, volumes, surface areas and the
//! distance between two points.

use std::collections::BTreeMap;

use log::debug;

use crate::SolveError;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::functions::polynomial::simplify;
use crate::functions::{Outcome, SolveContext, Solver};
use crate::number::{Number, format_decimal};
use crate::parser::GeometryQuantity::{
  Area, Circumference, Distance, Perimeter, SurfaceArea, Volume,
};
use crate::parser::{GeometryQuantity, GeometryQuery, Parsed, parse};
use crate::steps::RuleTag;
use crate::syntax::{Equation, Expr};

pub struct GeometrySolver;

/// One entry of the formula table.
#[derive(Debug)]
pub struct Formula {
  pub shape: Option<&'static str>,
  pub quantity: GeometryQuantity,
  /// Parsed with the problem grammar.
  pub template: &'static str,
  pub params: &'static [&'static str],
  /// Name of the result binding.
  pub result: &'static str,
  /// Whether every parameter is a length that must be positive.
  pub lengths: bool,
}

const fn formula(
  shape: &'static str,
  quantity: GeometryQuantity,
  template: &'static str,
  params: &'static [&'static str],
  result: &'static str,
) -> Formula {
  Formula {
    shape: Some(shape),
    quantity,
    template,
    params,
    result,
    lengths: true,
  }
}

const FORMULAS: &[Formula] = &[
  formula("circle", Area, "π r^2", &["r"], "A"),
  formula("circle", Perimeter, "2 π r", &["r"], "P"),
  formula("circle", Circumference, "2 π r", &["r"], "C"),
  formula("square", Area, "s^2", &["s"], "A"),
  formula("square", Perimeter, "4 s", &["s"], "P"),
  formula("rectangle", Area, "l w", &["l", "w"], "A"),
  formula("rectangle", Perimeter, "2(l + w)", &["l", "w"], "P"),
  formula("triangle", Area, "1/2 b h", &["b", "h"], "A"),
  formula("triangle", Perimeter, "a + b + c", &["a", "b", "c"], "P"),
  formula("sphere", Volume, "4/3 π r^3", &["r"], "V"),
  formula("sphere", SurfaceArea, "4 π r^2", &["r"], "S"),
  formula("cube", Volume, "s^3", &["s"], "V"),
  formula("cube", SurfaceArea, "6 s^2", &["s"], "S"),
  formula("cylinder", Volume, "π r^2 h", &["r", "h"], "V"),
  formula("cylinder", SurfaceArea, "2 π r (r + h)", &["r", "h"], "S"),
  formula("cone", Volume, "1/3 π r^2 h", &["r", "h"], "V"),
  formula("box", Volume, "l w h", &["l", "w", "h"], "V"),
  Formula {
    shape: None,
    quantity: Distance,
    template: "sqrt((x2 - x1)^2 + (y2 - y1)^2)",
    params: &["x1", "y1", "x2", "y2"],
    result: "d",
    lengths: false,
  },
];

fn canonical_shape(shape: &str) -> &str {
  match shape {
    "cuboid" | "prism" => "box",
    "ball" => "sphere",
    other => other,
  }
}

/// Canonical parameter name and the divisor its value is scaled by.
fn canonical_param(name: &str) -> (&str, i128) {
  match name {
    "radius" => ("r", 1),
    "d" | "diameter" => ("r", 2),
    "side" => ("s", 1),
    "length" => ("l", 1),
    "width" => ("w", 1),
    "base" => ("b", 1),
    "height" => ("h", 1),
    other => (other, 1),
  }
}

pub fn formula_for(query: &GeometryQuery) -> Option<&'static Formula> {
  let shape = query.shape.as_deref().map(canonical_shape);
  FORMULAS.iter().find(|f| {
    f.quantity == query.quantity
      && (f.quantity == Distance || f.shape == shape)
  })
}

fn template_expr(formula: &Formula) -> Result<Expr, SolveError> {
  match parse(formula.template)? {
    Parsed::Expression(e) => Ok(e),
    _ => Err(SolveError::ArithmeticError(format!(
      "malformed formula `{}`",
      formula.template
    ))),
  }
}

fn invalid(parameter: &str, value: Number, reason: &str) -> SolveError {
  SolveError::InvalidParameterError {
    parameter: parameter.to_string(),
    value: value.to_string(),
    reason: reason.to_string(),
  }
}

/// Reject three lengths that cannot form a triangle.
fn check_triangle(values: &BTreeMap<&str, Number>) -> Result<(), SolveError> {
  let mut sides: Vec<(&str, Number)> = ["a", "b", "c"]
    .iter()
    .filter_map(|k| values.get(k).map(|v| (*k, *v)))
    .collect();
  sides.sort_by(|l, r| {
    l.1.partial_cmp(&r.1).unwrap_or(std::cmp::Ordering::Equal)
  });
  if let [(_, a), (_, b), (name, c)] = sides.as_slice() {
    if *a + *b <= *c {
      return Err(invalid(name, *c, "violates the triangle inequality"));
    }
  }
  Ok(())
}

impl Solver for GeometrySolver {
  type Input = GeometryQuery;

  fn solve(
    &self,
    query: &GeometryQuery,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    let formula = match formula_for(query) {
      Some(f) => f,
      None => {
        ctx.warn(Warning::UnsupportedProblem);
        return Ok(Outcome::new(Solutions::Bindings(Vec::new()), None));
      }
    };

    let mut values: BTreeMap<&str, Number> = BTreeMap::new();
    for param in &query.params {
      let (name, divisor) = canonical_param(&param.name);
      match formula.params.iter().find(|p| **p == name) {
        Some(p) => {
          let value = param
            .value
            .checked_div(Number::int(divisor))
            .unwrap_or(param.value);
          values.insert(*p, value);
        }
        None => {
          debug!("ignoring parameter {}", param.name);
          ctx.warn(Warning::IgnoredParameter);
        }
      }
    }

    let shape = formula.shape.unwrap_or("pair of points");
    for p in formula.params {
      let value = match values.get(p) {
        Some(v) => *v,
        None => {
          return Err(SolveError::MissingParameterError {
            shape: shape.to_string(),
            quantity: formula.quantity.as_str().to_string(),
            parameter: p.to_string(),
          });
        }
      };
      if formula.lengths && value.signum() <= 0 {
        return Err(invalid(p, value, "a length must be positive"));
      }
    }
    if formula.shape == Some("triangle") && formula.quantity == Perimeter {
      check_triangle(&values)?;
    }

    let template = template_expr(formula)?;
    ctx.record(
      format!("Formula for the {} of a {}", formula.quantity.as_str(), shape),
      RuleTag::Formula,
      Equation::new(Expr::var(formula.result), template.clone()),
    )?;

    let mut substituted = template;
    let mut shown = Vec::new();
    for p in formula.params {
      if let Some(v) = values.get(p) {
        substituted = substituted.substitute(p, &Expr::Number(*v));
        shown.push(format!("{} = {}", p, v));
      }
    }
    ctx.record(
      format!("Substitute {}", shown.join(", ")),
      RuleTag::Substitute,
      Equation::new(Expr::var(formula.result), substituted.clone()),
    )?;

    let value = simplify(&substituted)?;
    let approx = value.approximate();
    let description = match approx {
      Some(a) => format!("Evaluate (≈ {})", format_decimal(a, 6)),
      None => "Evaluate".to_string(),
    };
    ctx.record(
      description,
      RuleTag::Evaluate,
      Equation::new(Expr::var(formula.result), value.clone()),
    )?;

    let verified = match (approx, substituted.approximate()) {
      (Some(a), Some(b)) => Some((a - b).abs() <= 1e-9 * b.abs().max(1.0)),
      _ => None,
    };
    let binding = SolutionBinding::new(formula.result, value);
    Ok(Outcome::new(Solutions::Bindings(vec![binding]), verified))
  }
}
