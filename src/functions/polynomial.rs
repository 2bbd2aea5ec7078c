//! Canonical normal form: an expanded sum of monomials with exact
//! coefficients.
//!
//! Every term is a coefficient times a product of atoms raised to rational
//! exponents. Atoms are variables, the constants `π`, `e` and `i`, square-free
//! radicands (`√5` is the atom `5` with exponent `1/2`), and opaque
//! sub-expressions such as `sin(x)` or `(x + 1)^(-1)` that the normal form does
//! not look into.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::SolveError;
use crate::number::{Number, sqrt_parts};
use crate::syntax::{BinaryOperator, Constant, Expr};

/// Upper bound on the number of terms a normal form may hold.
pub const MAX_TERMS: usize = 10_000;

/// Largest integer power of a multi-term sum that gets expanded.
const MAX_EXPANSION: i128 = 32;

const HALF: Number = Number::Rational(1, 2);

#[derive(Debug, Clone, PartialEq)]
struct Factor {
  atom: Expr,
  exponent: Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
  coeff: Number,
  factors: BTreeMap<String, Factor>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
  terms: BTreeMap<String, Term>,
}

fn atom_rank(atom: &Expr) -> u8 {
  match atom {
    Expr::Number(_) => 0,
    Expr::Constant(_) => 1,
    Expr::Variable(_) => 2,
    _ => 3,
  }
}

fn atom_key(atom: &Expr) -> String {
  format!("{}:{}", atom_rank(atom), atom)
}

fn division_by_zero() -> SolveError {
  SolveError::ArithmeticError("division by zero".into())
}

fn too_many_terms() -> SolveError {
  SolveError::ComplexityLimitExceeded { steps: 0 }
}

// ─── Terms ──────────────────────────────────────────────────────────

impl Term {
  fn constant(coeff: Number) -> Term {
    Term {
      coeff,
      factors: BTreeMap::new(),
    }
  }

  fn atom(atom: Expr, exponent: Number) -> Term {
    let mut factors = BTreeMap::new();
    factors.insert(atom_key(&atom), Factor { atom, exponent });
    Term {
      coeff: Number::ONE,
      factors,
    }
  }

  pub fn coeff(&self) -> Number {
    self.coeff
  }

  fn key(&self) -> String {
    self
      .factors
      .iter()
      .map(|(k, f)| format!("{}^{}", k, f.exponent))
      .collect::<Vec<_>>()
      .join("·")
  }

  fn mul(&self, other: &Term) -> Result<Term, SolveError> {
    let mut factors = self.factors.clone();
    for (key, factor) in &other.factors {
      match factors.get_mut(key) {
        Some(existing) => {
          existing.exponent = existing.exponent + factor.exponent;
        }
        None => {
          factors.insert(key.clone(), factor.clone());
        }
      }
    }
    Term {
      coeff: self.coeff * other.coeff,
      factors,
    }
    .reduce()
  }

  /// Fold numeric powers into the coefficient, merge radicals into a single
  /// square-free radicand and reduce powers of `i`.
  fn reduce(mut self) -> Result<Term, SolveError> {
    self.factors.retain(|_, f| !f.exponent.is_zero());

    let mut radicand = Number::ONE;
    let mut has_radical = false;
    let number_keys: Vec<String> = self
      .factors
      .iter()
      .filter(|(_, f)| matches!(f.atom, Expr::Number(_)))
      .map(|(k, _)| k.clone())
      .collect();
    for key in number_keys {
      let Some(factor) = self.factors.get(&key) else {
        continue;
      };
      let Expr::Number(base) = factor.atom else {
        continue;
      };
      let exponent = factor.exponent;
      if let Some(n) = exponent.to_integer() {
        self.coeff = self.coeff * pow_number(base, n)?;
        self.factors.remove(&key);
      } else if exponent.denom() == Some(2) {
        let whole = (exponent - HALF).to_integer().unwrap_or(0);
        self.coeff = self.coeff * pow_number(base, whole)?;
        radicand = radicand * base;
        has_radical = true;
        self.factors.remove(&key);
      }
    }
    if has_radical {
      self.attach_radical(radicand);
    }

    let i_key = atom_key(&Expr::Constant(Constant::I));
    if let Some(n) = self
      .factors
      .get(&i_key)
      .and_then(|f| f.exponent.to_integer())
    {
      match n.rem_euclid(4) {
        0 => {
          self.factors.remove(&i_key);
        }
        1 => {
          self.set_exponent(&i_key, Number::ONE);
        }
        2 => {
          self.coeff = -self.coeff;
          self.factors.remove(&i_key);
        }
        _ => {
          self.coeff = -self.coeff;
          self.set_exponent(&i_key, Number::ONE);
        }
      }
    }
    Ok(self)
  }

  /// Expand compound atoms whose exponent has become a whole number, so
  /// `√(x^2)·√(x^2)` meets `x^2` again. Atoms that normalize to themselves
  /// stay, as do sums raised to powers that are not expanded.
  fn settle(self) -> Result<Polynomial, SolveError> {
    let mut rest = self;
    let mut expanded = Vec::new();
    for (key, f) in &rest.factors {
      if !matches!(f.atom, Expr::BinaryOp { .. } | Expr::UnaryOp { .. }) {
        continue;
      }
      let Some(n) = f.exponent.to_integer() else {
        continue;
      };
      let base = Polynomial::from_expr(&f.atom)?;
      if base == Polynomial::atom(f.atom.clone()) {
        continue;
      }
      if base.len() > 1 && !(1..=MAX_EXPANSION).contains(&n) {
        continue;
      }
      expanded.push((key.clone(), base.pow(f.exponent)?));
    }
    if expanded.is_empty() {
      return Ok(Polynomial::from_term(rest));
    }
    let mut out = Polynomial::constant(Number::ONE);
    for (key, power) in expanded {
      rest.factors.remove(&key);
      out = out.mul(&power)?;
    }
    out.mul(&Polynomial::from_term(rest))
  }

  fn set_exponent(&mut self, key: &str, exponent: Number) {
    if let Some(f) = self.factors.get_mut(key) {
      f.exponent = exponent;
    }
  }

  /// Multiply by `√radicand`, extracting square factors.
  fn attach_radical(&mut self, radicand: Number) {
    let mut radicand = radicand;
    if radicand.is_negative() {
      radicand = -radicand;
      self.multiply_i();
    }
    match radicand {
      Number::Rational(p, q) => match p.checked_mul(q) {
        Some(n) => {
          let (outside, inside) = sqrt_parts(n);
          self.coeff = self.coeff * Number::int(outside);
          if q != 1 {
            self.coeff = self.coeff * Number::Rational(1, q);
          }
          if inside != 1 {
            let atom = Expr::int(inside);
            self
              .factors
              .insert(atom_key(&atom), Factor { atom, exponent: HALF });
          }
        }
        None => {
          self.coeff = self.coeff * Number::Real(radicand.to_f64().sqrt());
        }
      },
      Number::Real(f) => self.coeff = self.coeff * Number::Real(f.sqrt()),
    }
  }

  fn multiply_i(&mut self) {
    let atom = Expr::Constant(Constant::I);
    let key = atom_key(&atom);
    match self.factors.get_mut(&key) {
      Some(f) => {
        f.exponent = f.exponent + Number::ONE;
        // i·i folds into the sign
        if f.exponent == Number::int(2) {
          self.factors.remove(&key);
          self.coeff = -self.coeff;
        }
      }
      None => {
        self.factors.insert(
          key,
          Factor {
            atom,
            exponent: Number::ONE,
          },
        );
      }
    }
  }

  /// `(c·∏aᵉ)^p = c^p·∏a^(e·p)` holds for every integer `p`. For a
  /// fractional `p` it needs a non-negative coefficient and no factor whose
  /// exponent has an even numerator, since those hide the sign of the atom.
  fn distributes_power(&self, exponent: Number) -> bool {
    if exponent.to_integer().is_some() {
      return true;
    }
    if self.factors.is_empty() {
      return true;
    }
    !self.coeff.is_negative()
      && self.factors.values().all(|f| match f.atom {
        Expr::Number(n) => !n.is_negative(),
        Expr::Constant(Constant::I) => false,
        Expr::Constant(_) => true,
        _ => f.exponent.numer().is_some_and(|n| n % 2 != 0),
      })
  }

  fn variable_degree(&self) -> Number {
    self
      .factors
      .values()
      .filter(|f| matches!(f.atom, Expr::Variable(_)))
      .fold(Number::ZERO, |acc, f| acc + f.exponent)
  }

  /// Split into the part free of `var` and the factors that mention it.
  pub fn split_variable(&self, var: &str) -> (Polynomial, Vec<(Expr, Number)>) {
    let mut constant = Term::constant(self.coeff);
    let mut dependent = Vec::new();
    for (key, f) in &self.factors {
      if f.atom.contains_variable(var) {
        dependent.push((f.atom.clone(), f.exponent));
      } else {
        constant.factors.insert(key.clone(), f.clone());
      }
    }
    (Polynomial::from_term(constant), dependent)
  }

  pub fn to_expr(&self) -> Expr {
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for f in self.factors.values() {
      if f.exponent.is_negative() {
        denom.push(factor_expr(&f.atom, -f.exponent));
      } else {
        numer.push(factor_expr(&f.atom, f.exponent));
      }
    }
    let magnitude = self.coeff.abs();
    let (top, bottom) = match magnitude {
      Number::Rational(n, d) => (Number::int(n), Number::int(d)),
      Number::Real(_) => (magnitude, Number::ONE),
    };
    if !top.is_one() || numer.is_empty() {
      numer.insert(0, Expr::Number(top));
    }
    if !bottom.is_one() {
      denom.insert(0, Expr::Number(bottom));
    }
    let mut expr = Expr::product(numer);
    if !denom.is_empty() {
      expr = Expr::div(expr, Expr::product(denom));
    }
    if self.coeff.is_negative() {
      negate_leading(expr)
    } else {
      expr
    }
  }
}

fn factor_expr(atom: &Expr, exponent: Number) -> Expr {
  if exponent.is_one() {
    atom.clone()
  } else if exponent == HALF {
    Expr::call("sqrt", atom.clone())
  } else {
    Expr::pow(atom.clone(), Expr::Number(exponent))
  }
}

fn negate_leading(expr: Expr) -> Expr {
  match expr {
    Expr::Number(n) => Expr::Number(-n),
    Expr::BinaryOp {
      op: BinaryOperator::Times,
      left,
      right,
    } if matches!(*left, Expr::Number(_)) => Expr::BinaryOp {
      op: BinaryOperator::Times,
      left: Arc::new(negate_leading((*left).clone())),
      right,
    },
    Expr::BinaryOp {
      op: BinaryOperator::Divide,
      left,
      right,
    } => Expr::BinaryOp {
      op: BinaryOperator::Divide,
      left: Arc::new(negate_leading((*left).clone())),
      right,
    },
    other => Expr::neg(other),
  }
}

fn pow_number(base: Number, exponent: i128) -> Result<Number, SolveError> {
  if exponent.unsigned_abs() > 1024 {
    return Ok(Number::Real(base.to_f64().powf(exponent as f64)));
  }
  base.pow_int(exponent as i64).ok_or_else(division_by_zero)
}

/// `base^exponent` for a numeric base.
fn power_of_number(
  base: Number,
  exponent: Number,
) -> Result<Polynomial, SolveError> {
  if let Some(n) = exponent.to_integer() {
    return Ok(Polynomial::constant(pow_number(base, n)?));
  }
  if base.is_zero() {
    if exponent.is_negative() {
      return Err(division_by_zero());
    }
    return Ok(Polynomial::zero());
  }
  if base.is_one() {
    return Ok(Polynomial::constant(Number::ONE));
  }
  if let (Number::Real(b), false) = (base, exponent.denom() == Some(2)) {
    if b > 0.0 {
      return Ok(Polynomial::constant(Number::Real(b.powf(exponent.to_f64()))));
    }
  }
  let term = Term::atom(Expr::Number(base), exponent).reduce()?;
  Ok(Polynomial::from_term(term))
}

/// Exact values of named functions at special rational points.
fn exact_function_value(name: &str, arg: Number) -> Option<Number> {
  match (name, arg.to_integer()) {
    ("sin" | "tan", Some(0)) => Some(Number::ZERO),
    ("cos" | "exp", Some(0)) => Some(Number::ONE),
    ("ln" | "log", Some(1)) => Some(Number::ZERO),
    ("log", Some(n)) if n > 0 => {
      let mut k = 0;
      let mut v = n;
      while v % 10 == 0 {
        v /= 10;
        k += 1;
      }
      (v == 1).then(|| Number::int(k))
    }
    _ => None,
  }
}

// ─── Polynomials ────────────────────────────────────────────────────

impl Polynomial {
  pub fn zero() -> Self {
    Polynomial::default()
  }

  pub fn constant(n: Number) -> Self {
    let mut p = Polynomial::zero();
    p.insert(Term::constant(n));
    p
  }

  pub fn atom(expr: Expr) -> Self {
    Polynomial::from_term(Term::atom(expr, Number::ONE))
  }

  pub fn variable(name: &str) -> Self {
    Polynomial::atom(Expr::var(name))
  }

  fn from_term(term: Term) -> Self {
    let mut p = Polynomial::zero();
    p.insert(term);
    p
  }

  fn insert(&mut self, term: Term) {
    let key = term.key();
    let merged = match self.terms.remove(&key) {
      Some(existing) => Term {
        coeff: existing.coeff + term.coeff,
        factors: term.factors,
      },
      None => term,
    };
    if !merged.coeff.is_zero() {
      self.terms.insert(key, merged);
    }
  }

  pub fn terms(&self) -> impl Iterator<Item = &Term> {
    self.terms.values()
  }

  pub fn len(&self) -> usize {
    self.terms.len()
  }

  pub fn is_zero(&self) -> bool {
    self.terms.is_empty()
  }

  /// Zero up to floating-point noise in `Real` coefficients.
  pub fn is_negligible(&self) -> bool {
    self.terms.values().all(|t| t.coeff.is_negligible())
  }

  pub fn as_number(&self) -> Option<Number> {
    match self.terms.len() {
      0 => Some(Number::ZERO),
      1 => self
        .terms
        .values()
        .next()
        .filter(|t| t.factors.is_empty())
        .map(|t| t.coeff),
      _ => None,
    }
  }

  pub fn add(&self, other: &Polynomial) -> Result<Self, SolveError> {
    let mut out = self.clone();
    for term in other.terms.values() {
      out.insert(term.clone());
    }
    if out.terms.len() > MAX_TERMS {
      return Err(too_many_terms());
    }
    Ok(out)
  }

  pub fn negate(&self) -> Self {
    self.scale(-Number::ONE)
  }

  pub fn sub(&self, other: &Polynomial) -> Result<Self, SolveError> {
    self.add(&other.negate())
  }

  pub fn scale(&self, factor: Number) -> Self {
    let mut out = Polynomial::zero();
    for term in self.terms.values() {
      out.insert(Term {
        coeff: term.coeff * factor,
        factors: term.factors.clone(),
      });
    }
    out
  }

  pub fn mul(&self, other: &Polynomial) -> Result<Self, SolveError> {
    if self.terms.len().saturating_mul(other.terms.len()) > MAX_TERMS * 4 {
      return Err(too_many_terms());
    }
    let mut out = Polynomial::zero();
    for a in self.terms.values() {
      for b in other.terms.values() {
        for term in a.mul(b)?.settle()?.terms.into_values() {
          out.insert(term);
        }
      }
    }
    if out.terms.len() > MAX_TERMS {
      return Err(too_many_terms());
    }
    Ok(out)
  }

  pub fn div(&self, other: &Polynomial) -> Result<Self, SolveError> {
    if other.is_zero() {
      return Err(division_by_zero());
    }
    self.mul(&other.pow(-Number::ONE)?)
  }

  pub fn pow(&self, exponent: Number) -> Result<Self, SolveError> {
    if exponent.is_zero() {
      return Ok(Polynomial::constant(Number::ONE));
    }
    if self.is_zero() {
      if exponent.is_negative() {
        return Err(division_by_zero());
      }
      return Ok(Polynomial::zero());
    }
    if let Some(c) = self.as_number() {
      return power_of_number(c, exponent);
    }
    if self.terms.len() == 1 {
      if let Some(term) = self.terms.values().next() {
        if !term.distributes_power(exponent) {
          // (x^2)^(1/2) is |x|, not x
          return Ok(Polynomial::from_term(Term::atom(
            self.to_expr(),
            exponent,
          )));
        }
        let mut out = power_of_number(term.coeff, exponent)?;
        let mut factors = BTreeMap::new();
        for (key, f) in &term.factors {
          factors.insert(
            key.clone(),
            Factor {
              atom: f.atom.clone(),
              exponent: f.exponent * exponent,
            },
          );
        }
        let rest = Term {
          coeff: Number::ONE,
          factors,
        }
        .reduce()?;
        out = out.mul(&rest.settle()?)?;
        return Ok(out);
      }
    }
    match exponent.to_integer() {
      Some(n) if n > 0 && n <= MAX_EXPANSION => {
        let mut result = Polynomial::constant(Number::ONE);
        let mut base = self.clone();
        let mut k = n;
        while k > 0 {
          if k & 1 == 1 {
            result = result.mul(&base)?;
          }
          k >>= 1;
          if k > 0 {
            base = base.mul(&base)?;
          }
        }
        Ok(result)
      }
      _ => Ok(Polynomial::from_term(Term::atom(self.to_expr(), exponent))),
    }
  }

  /// Bring an expression into normal form.
  pub fn from_expr(expr: &Expr) -> Result<Self, SolveError> {
    match expr {
      Expr::Number(n) => Ok(Polynomial::constant(*n)),
      Expr::Variable(_) | Expr::Constant(_) => {
        Ok(Polynomial::atom(expr.clone()))
      }
      Expr::UnaryOp { operand, .. } => Ok(Self::from_expr(operand)?.negate()),
      Expr::BinaryOp { op, left, right } => {
        let l = Self::from_expr(left)?;
        let r = Self::from_expr(right)?;
        match op {
          BinaryOperator::Plus => l.add(&r),
          BinaryOperator::Minus => l.sub(&r),
          BinaryOperator::Times => l.mul(&r),
          BinaryOperator::Divide => l.div(&r),
          BinaryOperator::Power => match r.as_number() {
            Some(n) => l.pow(n),
            None if l.as_number() == Some(Number::ONE) => {
              Ok(Polynomial::constant(Number::ONE))
            }
            None => Ok(Polynomial::atom(Expr::pow(l.to_expr(), r.to_expr()))),
          },
        }
      }
      Expr::Function { name, args } => {
        if name == "sqrt" && args.len() == 1 {
          return Self::from_expr(&args[0])?.pow(HALF);
        }
        let mut normalized = Vec::with_capacity(args.len());
        for arg in args {
          normalized.push(Self::from_expr(arg)?);
        }
        if let [arg] = normalized.as_slice() {
          if let Some(v) =
            arg.as_number().and_then(|n| exact_function_value(name, n))
          {
            return Ok(Polynomial::constant(v));
          }
          if name == "ln" && arg.to_expr() == Expr::Constant(Constant::E) {
            return Ok(Polynomial::constant(Number::ONE));
          }
        }
        Ok(Polynomial::atom(Expr::Function {
          name: name.clone(),
          args: normalized.iter().map(|p| Arc::new(p.to_expr())).collect(),
        }))
      }
    }
  }

  /// Terms by descending variable degree, then by name, with the purely
  /// numeric term last.
  pub fn ordered_terms(&self) -> Vec<&Term> {
    let mut terms: Vec<&Term> = self.terms.values().collect();
    terms.sort_by(|a, b| {
      let da = a.variable_degree();
      let db = b.variable_degree();
      db.partial_cmp(&da)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(a.factors.is_empty().cmp(&b.factors.is_empty()))
        .then(a.key().cmp(&b.key()))
    });
    terms
  }

  /// Render back to an expression in term order, leading with a positive
  /// term when there is one: `3 - y`, not `-y + 3`.
  pub fn to_expr(&self) -> Expr {
    let mut terms = self.ordered_terms();
    if terms.first().is_some_and(|t| t.coeff.is_negative()) {
      if let Some(idx) = terms.iter().position(|t| !t.coeff.is_negative()) {
        let lead = terms.remove(idx);
        terms.insert(0, lead);
      }
    }
    Expr::sum(terms.into_iter().map(Term::to_expr).collect())
  }

  /// Highest exponent of `var`, or `None` when `var` occurs inside an atom or
  /// with a negative or fractional exponent.
  pub fn degree_in(&self, var: &str) -> Option<u32> {
    let key = atom_key(&Expr::var(var));
    let mut degree = 0;
    for term in self.terms.values() {
      for (k, f) in &term.factors {
        if *k == key {
          let n = f.exponent.to_integer().filter(|n| *n >= 0)?;
          degree = degree.max(u32::try_from(n).ok()?);
        } else if f.atom.contains_variable(var) {
          return None;
        }
      }
    }
    Some(degree)
  }

  /// Highest per-variable degree over all variables, `None` when the
  /// expression is not polynomial in its variables.
  pub fn max_variable_degree(&self) -> Option<u32> {
    let mut degree = 0;
    for var in self.variables() {
      degree = degree.max(self.degree_in(&var)?);
    }
    Some(degree)
  }

  /// Variables in key order.
  pub fn variables(&self) -> Vec<String> {
    let mut out = Vec::new();
    for term in self.terms.values() {
      for f in term.factors.values() {
        f.atom.collect_variables(&mut out);
      }
    }
    out
  }

  pub fn contains_variable(&self, var: &str) -> bool {
    self
      .terms
      .values()
      .any(|t| t.factors.values().any(|f| f.atom.contains_variable(var)))
  }

  pub fn contains_constant(&self, constant: Constant) -> bool {
    self.terms.values().any(|t| {
      t.factors.values().any(|f| f.atom.contains_constant(constant))
    })
  }

  /// Coefficients of `var^0 ..= var^degree`.
  pub fn coefficients_in(&self, var: &str) -> Option<Vec<Polynomial>> {
    let degree = self.degree_in(var)? as usize;
    let key = atom_key(&Expr::var(var));
    let mut coeffs = vec![Polynomial::zero(); degree + 1];
    for term in self.terms.values() {
      let mut rest = term.clone();
      let power = match rest.factors.remove(&key) {
        Some(f) => f.exponent.to_integer()? as usize,
        None => 0,
      };
      coeffs[power].insert(rest);
    }
    Some(coeffs)
  }

  /// Numeric coefficients of each of `vars` plus the constant term, when
  /// the polynomial is linear with numeric coefficients in exactly `vars`.
  pub fn linear_row(&self, vars: &[String]) -> Option<(Vec<Number>, Number)> {
    let mut coeffs = vec![Number::ZERO; vars.len()];
    let mut constant = Number::ZERO;
    for term in self.terms.values() {
      let mut factors = term.factors.values();
      match (factors.next(), factors.next()) {
        (None, _) => constant = constant + term.coeff,
        (Some(f), None) if f.exponent.is_one() => {
          let Expr::Variable(name) = &f.atom else {
            return None;
          };
          let idx = vars.iter().position(|v| v == name)?;
          coeffs[idx] = coeffs[idx] + term.coeff;
        }
        _ => return None,
      }
    }
    Some((coeffs, constant))
  }

  /// Every atom is a variable, a constant or a radicand, so a non-zero
  /// normal form is a genuinely non-zero value.
  pub fn is_algebraic(&self) -> bool {
    self.terms.values().all(|t| {
      t.factors.values().all(|f| {
        matches!(
          f.atom,
          Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_)
        )
      })
    })
  }

  pub fn is_exact(&self) -> bool {
    self.terms.values().all(|t| t.coeff.is_exact())
  }
}

/// Normal form of an expression, rendered back as an expression.
pub fn simplify(expr: &Expr) -> Result<Expr, SolveError> {
  Ok(Polynomial::from_expr(expr)?.to_expr())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn x() -> Expr {
    Expr::var("x")
  }

  #[test]
  fn collects_like_terms() {
    let e = Expr::add(
      Expr::mul(Expr::int(2), x()),
      Expr::add(Expr::mul(Expr::int(3), x()), Expr::int(-5)),
    );
    assert_eq!(simplify(&e).unwrap().to_string(), "5x - 5");
  }

  #[test]
  fn expands_binomial_squares() {
    let e = Expr::pow(Expr::add(x(), Expr::int(1)), Expr::int(2));
    assert_eq!(simplify(&e).unwrap().to_string(), "x^2 + 2x + 1");
  }

  #[test]
  fn simplifies_radicals() {
    let e = Expr::call("sqrt", Expr::int(20));
    assert_eq!(simplify(&e).unwrap().to_string(), "2√5");
    let e = Expr::call("sqrt", Expr::int(-4));
    assert_eq!(simplify(&e).unwrap().to_string(), "2i");
  }

  #[test]
  fn division_by_zero_is_an_error() {
    let e = Expr::div(Expr::int(1), Expr::int(0));
    assert!(matches!(simplify(&e), Err(SolveError::ArithmeticError(_))));
  }

  #[test]
  fn degree_is_undefined_inside_functions() {
    let p = Polynomial::from_expr(&Expr::call("sin", x())).unwrap();
    assert_eq!(p.degree_in("x"), None);
  }
}
