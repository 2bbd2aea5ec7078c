//! Expression trees, equations and their textual rendering.

use std::fmt;
use std::sync::Arc;

use crate::number::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Minus,
}

/// Reserved mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Constant {
  Pi,
  E,
  I,
}

impl Constant {
  pub fn symbol(self) -> &'static str {
    match self {
      Constant::Pi => "π",
      Constant::E => "e",
      Constant::I => "i",
    }
  }

  /// Real value, `None` for the imaginary unit.
  pub fn value(self) -> Option<f64> {
    match self {
      Constant::Pi => Some(std::f64::consts::PI),
      Constant::E => Some(std::f64::consts::E),
      Constant::I => None,
    }
  }
}

/// Function names of the derivative and integral markers.
const DERIVATIVE: &str = "D";
const INTEGRAL: &str = "Integrate";

/// An immutable expression node. Children are shared through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Number(Number),
  Variable(String),
  Constant(Constant),
  BinaryOp {
    op: BinaryOperator,
    left: Arc<Expr>,
    right: Arc<Expr>,
  },
  UnaryOp {
    op: UnaryOperator,
    operand: Arc<Expr>,
  },
  Function {
    name: String,
    args: Vec<Arc<Expr>>,
  },
}

// ─── Constructors ───────────────────────────────────────────────────

impl Expr {
  pub fn int(n: i128) -> Expr {
    Expr::Number(Number::int(n))
  }

  pub fn var(name: &str) -> Expr {
    Expr::Variable(name.to_string())
  }

  pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
      op,
      left: Arc::new(left),
      right: Arc::new(right),
    }
  }

  pub fn add(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOperator::Plus, left, right)
  }

  pub fn sub(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOperator::Minus, left, right)
  }

  pub fn mul(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOperator::Times, left, right)
  }

  pub fn div(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOperator::Divide, left, right)
  }

  pub fn pow(base: Expr, exponent: Expr) -> Expr {
    Expr::binary(BinaryOperator::Power, base, exponent)
  }

  pub fn neg(operand: Expr) -> Expr {
    Expr::UnaryOp {
      op: UnaryOperator::Minus,
      operand: Arc::new(operand),
    }
  }

  pub fn call(name: &str, arg: Expr) -> Expr {
    Expr::Function {
      name: name.to_string(),
      args: vec![Arc::new(arg)],
    }
  }

  /// `d/dvar(body)`, shown in derivative steps.
  pub fn derivative_of(body: Expr, var: &str) -> Expr {
    Expr::Function {
      name: DERIVATIVE.to_string(),
      args: vec![Arc::new(body), Arc::new(Expr::var(var))],
    }
  }

  /// `∫(body) dvar`, shown in integration steps.
  pub fn integral_of(body: Expr, var: &str) -> Expr {
    Expr::Function {
      name: INTEGRAL.to_string(),
      args: vec![Arc::new(body), Arc::new(Expr::var(var))],
    }
  }

  /// Sum of the given terms, `0` when empty.
  pub fn sum(terms: Vec<Expr>) -> Expr {
    let mut iter = terms.into_iter();
    match iter.next() {
      Some(first) => iter.fold(first, Expr::add),
      None => Expr::int(0),
    }
  }

  /// Product of the given factors, `1` when empty.
  pub fn product(factors: Vec<Expr>) -> Expr {
    let mut iter = factors.into_iter();
    match iter.next() {
      Some(first) => iter.fold(first, Expr::mul),
      None => Expr::int(1),
    }
  }
}

// ─── Queries and rewriting ──────────────────────────────────────────

impl Expr {
  pub fn as_number(&self) -> Option<Number> {
    match self {
      Expr::Number(n) => Some(*n),
      _ => None,
    }
  }

  /// Free variables in order of first appearance.
  pub fn free_variables(&self) -> Vec<String> {
    let mut out = Vec::new();
    self.collect_variables(&mut out);
    out
  }

  pub(crate) fn collect_variables(&self, out: &mut Vec<String>) {
    match self {
      Expr::Variable(name) => {
        if !out.contains(name) {
          out.push(name.clone());
        }
      }
      Expr::Number(_) | Expr::Constant(_) => {}
      Expr::BinaryOp { left, right, .. } => {
        left.collect_variables(out);
        right.collect_variables(out);
      }
      Expr::UnaryOp { operand, .. } => operand.collect_variables(out),
      Expr::Function { args, .. } => {
        for arg in args {
          arg.collect_variables(out);
        }
      }
    }
  }

  pub fn contains_variable(&self, var: &str) -> bool {
    match self {
      Expr::Variable(name) => name == var,
      Expr::Number(_) | Expr::Constant(_) => false,
      Expr::BinaryOp { left, right, .. } => {
        left.contains_variable(var) || right.contains_variable(var)
      }
      Expr::UnaryOp { operand, .. } => operand.contains_variable(var),
      Expr::Function { args, .. } => {
        args.iter().any(|a| a.contains_variable(var))
      }
    }
  }

  pub fn contains_constant(&self, constant: Constant) -> bool {
    match self {
      Expr::Constant(c) => *c == constant,
      Expr::Number(_) | Expr::Variable(_) => false,
      Expr::BinaryOp { left, right, .. } => {
        left.contains_constant(constant) || right.contains_constant(constant)
      }
      Expr::UnaryOp { operand, .. } => operand.contains_constant(constant),
      Expr::Function { args, .. } => {
        args.iter().any(|a| a.contains_constant(constant))
      }
    }
  }

  /// No floating-point number anywhere in the tree.
  pub fn is_exact(&self) -> bool {
    match self {
      Expr::Number(n) => n.is_exact(),
      Expr::Variable(_) | Expr::Constant(_) => true,
      Expr::BinaryOp { left, right, .. } => left.is_exact() && right.is_exact(),
      Expr::UnaryOp { operand, .. } => operand.is_exact(),
      Expr::Function { args, .. } => args.iter().all(|a| a.is_exact()),
    }
  }

  /// Replace every occurrence of `var` by `value`. Unchanged sub-trees are
  /// shared with the original.
  pub fn substitute(&self, var: &str, value: &Expr) -> Expr {
    if !self.contains_variable(var) {
      return self.clone();
    }
    let sub = |e: &Arc<Expr>| -> Arc<Expr> {
      if e.contains_variable(var) {
        Arc::new(e.substitute(var, value))
      } else {
        Arc::clone(e)
      }
    };
    match self {
      Expr::Variable(_) => value.clone(),
      Expr::BinaryOp { op, left, right } => Expr::BinaryOp {
        op: *op,
        left: sub(left),
        right: sub(right),
      },
      Expr::UnaryOp { op, operand } => Expr::UnaryOp {
        op: *op,
        operand: sub(operand),
      },
      Expr::Function { name, args } => Expr::Function {
        name: name.clone(),
        args: args.iter().map(sub).collect(),
      },
      Expr::Number(_) | Expr::Constant(_) => self.clone(),
    }
  }

  /// Height of the tree; a leaf has depth 1.
  pub fn depth(&self) -> usize {
    match self {
      Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => 1,
      Expr::BinaryOp { left, right, .. } => {
        1 + left.depth().max(right.depth())
      }
      Expr::UnaryOp { operand, .. } => 1 + operand.depth(),
      Expr::Function { args, .. } => {
        1 + args.iter().map(|a| a.depth()).max().unwrap_or(0)
      }
    }
  }

  /// Floating-point value of a closed expression.
  pub fn approximate(&self) -> Option<f64> {
    let value = match self {
      Expr::Number(n) => n.to_f64(),
      Expr::Variable(_) => return None,
      Expr::Constant(c) => c.value()?,
      Expr::UnaryOp { operand, .. } => -operand.approximate()?,
      Expr::BinaryOp { op, left, right } => {
        let l = left.approximate()?;
        let r = right.approximate()?;
        match op {
          BinaryOperator::Plus => l + r,
          BinaryOperator::Minus => l - r,
          BinaryOperator::Times => l * r,
          BinaryOperator::Divide => l / r,
          BinaryOperator::Power => l.powf(r),
        }
      }
      Expr::Function { name, args } => {
        let x = args.first()?.approximate()?;
        match name.as_str() {
          "sqrt" => x.sqrt(),
          "sin" => x.sin(),
          "cos" => x.cos(),
          "tan" => x.tan(),
          "exp" => x.exp(),
          "ln" => x.ln(),
          "log" => x.log10(),
          _ => return None,
        }
      }
    };
    if value.is_finite() {
      Some(value)
    } else {
      None
    }
  }
}

// ─── Equations ──────────────────────────────────────────────────────

/// `lhs = rhs` together with the variables it mentions.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
  lhs: Arc<Expr>,
  rhs: Arc<Expr>,
  variables: Vec<String>,
}

impl Equation {
  pub fn new(lhs: Expr, rhs: Expr) -> Self {
    let mut variables = Vec::new();
    lhs.collect_variables(&mut variables);
    rhs.collect_variables(&mut variables);
    Equation {
      lhs: Arc::new(lhs),
      rhs: Arc::new(rhs),
      variables,
    }
  }

  pub fn lhs(&self) -> &Expr {
    &self.lhs
  }

  pub fn rhs(&self) -> &Expr {
    &self.rhs
  }

  /// Variables in order of first appearance, left side first.
  pub fn variables(&self) -> &[String] {
    &self.variables
  }

  /// `lhs - rhs`, the expression whose roots solve the equation.
  pub fn residual(&self) -> Expr {
    Expr::sub((*self.lhs).clone(), (*self.rhs).clone())
  }

  pub fn substitute(&self, var: &str, value: &Expr) -> Equation {
    Equation::new(
      self.lhs.substitute(var, value),
      self.rhs.substitute(var, value),
    )
  }
}

impl fmt::Display for Equation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} = {}", self.lhs, self.rhs)
  }
}

// ─── Rendering ──────────────────────────────────────────────────────

const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const NEGATION: u8 = 3;
const POWER: u8 = 4;
const ATOM: u8 = 5;

fn precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::Number(n) if n.is_negative() => NEGATION,
    Expr::Number(Number::Rational(_, d)) if *d != 1 => PRODUCT,
    Expr::Number(_)
    | Expr::Variable(_)
    | Expr::Constant(_)
    | Expr::Function { .. } => ATOM,
    Expr::UnaryOp { .. } => NEGATION,
    Expr::BinaryOp { op, .. } => match op {
      BinaryOperator::Plus | BinaryOperator::Minus => SUM,
      BinaryOperator::Times | BinaryOperator::Divide => PRODUCT,
      BinaryOperator::Power => POWER,
    },
  }
}

fn starts_negative(expr: &Expr) -> bool {
  match expr {
    Expr::Number(n) => n.is_negative(),
    Expr::UnaryOp { .. } => true,
    Expr::BinaryOp {
      op: BinaryOperator::Power,
      ..
    } => false,
    Expr::BinaryOp { left, .. } => starts_negative(left),
    _ => false,
  }
}

fn leftmost_is_power(expr: &Expr) -> bool {
  match expr {
    Expr::BinaryOp {
      op: BinaryOperator::Power,
      ..
    } => true,
    Expr::BinaryOp {
      op: BinaryOperator::Times | BinaryOperator::Divide,
      left,
      ..
    } => leftmost_is_power(left),
    _ => false,
  }
}

/// The positive counterpart of a term that renders with a leading minus.
fn negated_term(expr: &Expr) -> Option<Expr> {
  match expr {
    Expr::Number(n) if n.is_negative() => Some(Expr::Number(-*n)),
    Expr::UnaryOp { operand, .. } => Some((**operand).clone()),
    Expr::BinaryOp { op, left, right }
      if matches!(op, BinaryOperator::Times | BinaryOperator::Divide) =>
    {
      let positive = negated_term(left)?;
      if *op == BinaryOperator::Times
        && positive.as_number() == Some(Number::ONE)
      {
        Some((**right).clone())
      } else {
        Some(Expr::BinaryOp {
          op: *op,
          left: Arc::new(positive),
          right: Arc::clone(right),
        })
      }
    }
    _ => None,
  }
}

fn render_at(expr: &Expr, min: u8) -> String {
  let s = render(expr);
  if precedence(expr) < min {
    format!("({})", s)
  } else {
    s
  }
}

/// Render a right-hand operand that must not open with a minus sign.
fn render_operand(expr: &Expr, min: u8) -> String {
  if starts_negative(expr) {
    format!("({})", render(expr))
  } else {
    render_at(expr, min)
  }
}

fn render(expr: &Expr) -> String {
  match expr {
    Expr::Number(n) => n.to_string(),
    Expr::Variable(name) => name.clone(),
    Expr::Constant(c) => c.symbol().to_string(),
    Expr::UnaryOp { operand, .. } => {
      let inner = &**operand;
      if precedence(inner) <= NEGATION
        && !matches!(
          inner,
          Expr::BinaryOp {
            op: BinaryOperator::Times | BinaryOperator::Divide,
            ..
          }
        )
        || starts_negative(inner)
        || leftmost_is_power(inner)
      {
        format!("-({})", render(inner))
      } else {
        format!("-{}", render(inner))
      }
    }
    Expr::Function { name, args } => {
      let rendered: Vec<String> = args.iter().map(|a| render(a)).collect();
      if name == "sqrt" && args.len() == 1 {
        let arg = &args[0];
        if precedence(arg) == ATOM
          && !matches!(**arg, Expr::Number(Number::Real(_)))
        {
          format!("√{}", rendered[0])
        } else {
          format!("√({})", rendered[0])
        }
      } else if name == DERIVATIVE && args.len() == 2 {
        format!("d/d{}({})", rendered[1], rendered[0])
      } else if name == INTEGRAL && args.len() == 2 {
        format!("∫({}) d{}", rendered[0], rendered[1])
      } else {
        format!("{}({})", name, rendered.join(", "))
      }
    }
    Expr::BinaryOp { op, left, right } => match op {
      BinaryOperator::Plus => match negated_term(right) {
        Some(positive) => format!(
          "{} - {}",
          render_at(left, SUM),
          render_operand(&positive, PRODUCT)
        ),
        None => {
          format!("{} + {}", render_at(left, SUM), render_operand(right, SUM))
        }
      },
      BinaryOperator::Minus => format!(
        "{} - {}",
        render_at(left, SUM),
        render_operand(right, PRODUCT)
      ),
      BinaryOperator::Times => {
        let l = render_at(left, PRODUCT);
        let r = render_operand(right, PRODUCT);
        let juxtapose = matches!(**left, Expr::Number(Number::Rational(_, 1)))
          && r.starts_with(|c: char| c.is_alphabetic() || c == '√' || c == '(');
        if juxtapose {
          format!("{}{}", l, r)
        } else {
          format!("{}*{}", l, r)
        }
      }
      BinaryOperator::Divide => {
        format!("{}/{}", render_at(left, PRODUCT), render_operand(right, POWER))
      }
      BinaryOperator::Power => {
        format!("{}^{}", render_at(left, ATOM), render_operand(right, POWER))
      }
    },
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", render(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_negative_terms_as_subtraction() {
    let e = Expr::add(
      Expr::mul(Expr::int(2), Expr::var("x")),
      Expr::int(-3),
    );
    assert_eq!(e.to_string(), "2x - 3");
  }

  #[test]
  fn renders_powers_with_grouped_bases() {
    let e = Expr::pow(Expr::int(-2), Expr::int(2));
    assert_eq!(e.to_string(), "(-2)^2");
    let e = Expr::neg(Expr::pow(Expr::var("x"), Expr::int(2)));
    assert_eq!(e.to_string(), "-(x^2)");
  }

  #[test]
  fn substitution_keeps_unrelated_subtrees() {
    let e = Expr::add(Expr::var("x"), Expr::var("y"));
    let s = e.substitute("x", &Expr::int(3));
    assert_eq!(s.to_string(), "3 + y");
    assert_eq!(s.free_variables(), vec!["y".to_string()]);
  }
}
