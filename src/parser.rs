//! Problem text → [`Parsed`].
//!
//! The pest grammar in `math.pest` recognizes the problem shape; operator
//! precedence inside expressions is resolved by a Pratt parser:
//! unary minus binds tighter than `^`, which binds tighter than `*`, `/` and
//! implicit multiplication, which bind tighter than `+` and `-`.

use std::fmt;
use std::sync::OnceLock;

use pest::Parser;
use pest::error::{Error as PestError, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::number::Number;
use crate::syntax::{Constant, Equation, Expr};
use crate::{MathParser, Rule, SolveError};

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A problem statement after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
  Expression(Expr),
  Equation(Equation),
  System(Vec<Equation>),
  Geometry(GeometryQuery),
  Calculus(CalculusQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryQuantity {
  Area,
  Perimeter,
  Circumference,
  Volume,
  SurfaceArea,
  Distance,
}

impl GeometryQuantity {
  fn from_keyword(text: &str) -> Option<Self> {
    let normalized = text
      .split_whitespace()
      .collect::<Vec<_>>()
      .join(" ")
      .to_lowercase();
    match normalized.as_str() {
      "area" => Some(GeometryQuantity::Area),
      "perimeter" => Some(GeometryQuantity::Perimeter),
      "circumference" => Some(GeometryQuantity::Circumference),
      "volume" => Some(GeometryQuantity::Volume),
      "surface area" => Some(GeometryQuantity::SurfaceArea),
      "distance" => Some(GeometryQuantity::Distance),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      GeometryQuantity::Area => "area",
      GeometryQuantity::Perimeter => "perimeter",
      GeometryQuantity::Circumference => "circumference",
      GeometryQuantity::Volume => "volume",
      GeometryQuantity::SurfaceArea => "surface area",
      GeometryQuantity::Distance => "distance",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParam {
  pub name: String,
  pub value: Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryQuery {
  /// Lower-cased shape name; `None` for `distance`.
  pub shape: Option<String>,
  pub quantity: GeometryQuantity,
  pub params: Vec<GeometryParam>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculusOperation {
  Derivative,
  Integral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculusQuery {
  pub operation: CalculusOperation,
  pub body: Expr,
  pub variable: String,
}

impl fmt::Display for CalculusQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.operation {
      CalculusOperation::Derivative => {
        write!(f, "d/d{}({})", self.variable, self.body)
      }
      CalculusOperation::Integral => {
        write!(f, "∫({}) d{}", self.body, self.variable)
      }
    }
  }
}

impl fmt::Display for GeometryQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.shape {
      Some(shape) => write!(f, "{} of a {}", self.quantity.as_str(), shape)?,
      None => write!(f, "{}", self.quantity.as_str())?,
    }
    for param in &self.params {
      write!(f, ", {}={}", param.name, param.value)?;
    }
    Ok(())
  }
}

impl fmt::Display for Parsed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Parsed::Expression(e) => write!(f, "{}", e),
      Parsed::Equation(eq) => write!(f, "{}", eq),
      Parsed::System(eqs) => {
        let parts: Vec<String> = eqs.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
      }
      Parsed::Geometry(q) => write!(f, "{}", q),
      Parsed::Calculus(q) => write!(f, "{}", q),
    }
  }
}

// ─── Entry points ───────────────────────────────────────────────────

pub fn parse(text: &str) -> Result<Parsed, SolveError> {
  parse_with_limit(text, DEFAULT_MAX_DEPTH)
}

/// Parse with an explicit nesting bound.
pub fn parse_with_limit(
  text: &str,
  max_depth: usize,
) -> Result<Parsed, SolveError> {
  prescan(text, max_depth)?;
  let mut pairs = MathParser::parse(Rule::Problem, text).map_err(Box::new)?;
  let problem = match pairs.next() {
    Some(pair) => pair,
    None => return Err(custom_error("empty input", text)),
  };
  for pair in problem.into_inner() {
    match pair.as_rule() {
      Rule::Geometry => return parse_geometry(pair).map(Parsed::Geometry),
      Rule::Derivative => {
        return parse_calculus(pair, CalculusOperation::Derivative)
          .map(Parsed::Calculus);
      }
      Rule::Integral => {
        return parse_calculus(pair, CalculusOperation::Integral)
          .map(Parsed::Calculus);
      }
      Rule::System => {
        let mut equations = Vec::new();
        for eq in pair.into_inner() {
          if eq.as_rule() == Rule::Equation {
            equations.push(parse_equation(eq)?);
          }
        }
        return Ok(Parsed::System(equations));
      }
      Rule::Equation => return parse_equation(pair).map(Parsed::Equation),
      Rule::Expression => {
        return build_expr(pair.into_inner()).map(Parsed::Expression);
      }
      _ => {}
    }
  }
  Err(custom_error("expected an equation or expression", text))
}

/// Reject inputs whose nesting would exceed `max_depth` before the grammar
/// runs.
fn prescan(text: &str, max_depth: usize) -> Result<(), SolveError> {
  let mut depth = 0usize;
  let mut deepest = 0usize;
  let mut operators = 0usize;
  for c in text.chars() {
    match c {
      '(' => {
        depth += 1;
        deepest = deepest.max(depth);
      }
      ')' => depth = depth.saturating_sub(1),
      '^' | '-' | '−' | '+' | '√' => operators += 1,
      _ => {}
    }
  }
  if deepest > max_depth || operators > max_depth.saturating_mul(4) {
    log::warn!(
      "input rejected: nesting {} and {} operators exceed depth {}",
      deepest,
      operators,
      max_depth
    );
    return Err(SolveError::ComplexityLimitExceeded { steps: 0 });
  }
  Ok(())
}

fn custom_error(message: &str, text: &str) -> SolveError {
  let pos = pest::Position::from_start(text);
  SolveError::ParseError(Box::new(PestError::new_from_pos(
    ErrorVariant::CustomError {
      message: message.to_string(),
    },
    pos,
  )))
}

fn span_error(message: &str, pair: &Pair<Rule>) -> SolveError {
  SolveError::ParseError(Box::new(PestError::new_from_span(
    ErrorVariant::CustomError {
      message: message.to_string(),
    },
    pair.as_span(),
  )))
}

// ─── Expressions ────────────────────────────────────────────────────

fn pratt() -> &'static PrattParser<Rule> {
  static PRATT: OnceLock<PrattParser<Rule>> = OnceLock::new();
  PRATT.get_or_init(|| {
    PrattParser::new()
      .op(Op::infix(Rule::Add, Assoc::Left) | Op::infix(Rule::Sub, Assoc::Left))
      .op(
        Op::infix(Rule::Mul, Assoc::Left)
          | Op::infix(Rule::Div, Assoc::Left)
          | Op::infix(Rule::ImplicitMul, Assoc::Left)
          | Op::infix(Rule::IntegrandImplicitMul, Assoc::Left),
      )
      .op(Op::infix(Rule::Pow, Assoc::Right))
      .op(Op::postfix(Rule::Squared) | Op::postfix(Rule::Cubed))
      .op(
        Op::prefix(Rule::Neg) | Op::prefix(Rule::Pos) | Op::prefix(Rule::Root),
      )
  })
}

fn build_expr(pairs: Pairs<Rule>) -> Result<Expr, SolveError> {
  pratt()
    .map_primary(build_primary)
    .map_prefix(|op, operand| {
      let operand = operand?;
      Ok(match op.as_rule() {
        Rule::Neg => match operand {
          Expr::Number(n) => Expr::Number(-n),
          other => Expr::neg(other),
        },
        Rule::Root => Expr::call("sqrt", operand),
        _ => operand,
      })
    })
    .map_postfix(|operand, op| {
      let exponent = match op.as_rule() {
        Rule::Cubed => 3,
        _ => 2,
      };
      Ok(Expr::pow(operand?, Expr::int(exponent)))
    })
    .map_infix(|lhs, op, rhs| {
      let (lhs, rhs) = (lhs?, rhs?);
      Ok(match op.as_rule() {
        Rule::Add => Expr::add(lhs, rhs),
        Rule::Sub => Expr::sub(lhs, rhs),
        Rule::Div => Expr::div(lhs, rhs),
        Rule::Pow => Expr::pow(lhs, rhs),
        _ => Expr::mul(lhs, rhs),
      })
    })
    .parse(pairs)
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr, SolveError> {
  match pair.as_rule() {
    Rule::Number => Number::from_decimal(pair.as_str())
      .map(Expr::Number)
      .ok_or_else(|| span_error("invalid number", &pair)),
    Rule::Variable => Ok(Expr::Variable(pair.as_str().replace('_', ""))),
    Rule::Constant => match pair.as_str().to_lowercase().as_str() {
      "pi" | "π" => Ok(Expr::Constant(Constant::Pi)),
      "e" => Ok(Expr::Constant(Constant::E)),
      "i" => Ok(Expr::Constant(Constant::I)),
      _ => Err(span_error("unknown constant", &pair)),
    },
    Rule::Function => {
      let mut inner = pair.into_inner();
      let name = inner
        .next()
        .map(|p| p.as_str().to_lowercase())
        .unwrap_or_default();
      let body = match inner.next() {
        Some(p) => build_expr(p.into_inner())?,
        None => return Err(custom_error("function without argument", "")),
      };
      Ok(Expr::call(&name, body))
    }
    Rule::Expression | Rule::Integrand => build_expr(pair.into_inner()),
    _ => Err(span_error("unexpected token", &pair)),
  }
}

fn parse_equation(pair: Pair<Rule>) -> Result<Equation, SolveError> {
  let span_pair = pair.clone();
  let mut sides = pair
    .into_inner()
    .filter(|p| p.as_rule() == Rule::Expression);
  match (sides.next(), sides.next()) {
    (Some(lhs), Some(rhs)) => Ok(Equation::new(
      build_expr(lhs.into_inner())?,
      build_expr(rhs.into_inner())?,
    )),
    _ => Err(span_error("equation needs two sides", &span_pair)),
  }
}

// ─── Calculus ───────────────────────────────────────────────────────

fn parse_calculus(
  pair: Pair<Rule>,
  operation: CalculusOperation,
) -> Result<CalculusQuery, SolveError> {
  let span_pair = pair.clone();
  let mut body = None;
  let mut variable = None;
  for part in pair.into_inner() {
    match part.as_rule() {
      Rule::Expression | Rule::Integrand => {
        body = Some(build_expr(part.into_inner())?);
      }
      Rule::DerivativeMarker | Rule::Differential => {
        variable = part
          .into_inner()
          .find(|p| p.as_rule() == Rule::Variable)
          .map(|p| p.as_str().replace('_', ""));
      }
      Rule::Variable => variable = Some(part.as_str().replace('_', "")),
      _ => {}
    }
  }
  let body = match (body, operation) {
    (Some(body), _) => body,
    (None, CalculusOperation::Integral) => Expr::int(1),
    (None, CalculusOperation::Derivative) => {
      return Err(span_error("missing expression", &span_pair));
    }
  };
  let variable = variable.unwrap_or_else(|| default_variable(&body));
  Ok(CalculusQuery {
    operation,
    body,
    variable,
  })
}

/// The sole free variable, else `x` when present, else the first one.
fn default_variable(body: &Expr) -> String {
  let vars = body.free_variables();
  if vars.len() == 1 || !vars.iter().any(|v| v == "x") {
    if let Some(first) = vars.into_iter().next() {
      return first;
    }
  }
  "x".to_string()
}

// ─── Geometry ───────────────────────────────────────────────────────

fn parse_geometry(pair: Pair<Rule>) -> Result<GeometryQuery, SolveError> {
  let mut shape = None;
  let mut quantity = None;
  let mut params = Vec::new();
  let mut points = Vec::new();
  for part in pair.into_inner() {
    match part.as_rule() {
      Rule::Quantity | Rule::DistanceKeyword => {
        quantity = GeometryQuantity::from_keyword(part.as_str());
      }
      Rule::Shape => shape = Some(part.as_str().to_lowercase()),
      Rule::Param => {
        let mut inner = part.into_inner();
        let name = inner
          .next()
          .map(|p| p.as_str().to_lowercase())
          .unwrap_or_default();
        let value = match inner.next() {
          Some(p) => signed_number(p)?,
          None => Number::ZERO,
        };
        params.push(GeometryParam { name, value });
      }
      Rule::Point => {
        let mut coords = Vec::new();
        for coord in part.into_inner() {
          coords.push(signed_number(coord)?);
        }
        points.push(coords);
      }
      _ => {}
    }
  }
  for (idx, coords) in points.iter().enumerate() {
    for (axis, value) in ["x", "y"].iter().zip(coords) {
      params.push(GeometryParam {
        name: format!("{}{}", axis, idx + 1),
        value: *value,
      });
    }
  }
  let quantity = match quantity {
    Some(q) => q,
    None => return Err(custom_error("unknown geometric quantity", "")),
  };
  if quantity == GeometryQuantity::Distance {
    shape = None;
  }
  Ok(GeometryQuery {
    shape,
    quantity,
    params,
  })
}

fn signed_number(pair: Pair<Rule>) -> Result<Number, SolveError> {
  let mut negative = false;
  let mut value = None;
  for part in pair.into_inner() {
    match part.as_rule() {
      Rule::Neg => negative = true,
      Rule::Number => {
        value = Some(
          Number::from_decimal(part.as_str())
            .ok_or_else(|| span_error("invalid number", &part))?,
        );
      }
      _ => {}
    }
  }
  let value = value.unwrap_or(Number::ZERO);
  Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_variable_prefers_x() {
    let body = Expr::mul(Expr::var("a"), Expr::var("x"));
    assert_eq!(default_variable(&body), "x");
    assert_eq!(default_variable(&Expr::var("t")), "t");
    assert_eq!(default_variable(&Expr::int(3)), "x");
  }
}
