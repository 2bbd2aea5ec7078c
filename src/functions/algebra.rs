//! Linear and quadratic equations in one target variable.

use log::debug;

use crate::SolveError;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::functions::polynomial::{Polynomial, simplify};
use crate::functions::{
  Outcome, SolveContext, Solver, combine_verdicts, target_variable,
  verify_equation,
};
use crate::number::{Number, gcd, lcm, sqrt_parts};
use crate::steps::RuleTag;
use crate::syntax::{Constant, Equation, Expr};

pub struct LinearSolver;

pub struct QuadraticSolver;

/// Variables of `eq` that survive in its normal form, in order of appearance.
fn present_variables(eq: &Equation, residual: &Polynomial) -> Vec<String> {
  eq.variables()
    .iter()
    .filter(|v| residual.contains_variable(v))
    .cloned()
    .collect()
}

/// Record a check of `bindings` against `eq` and return its verdict.
pub(crate) fn record_check(
  ctx: &mut SolveContext<'_>,
  eq: &Equation,
  bindings: &[SolutionBinding],
) -> Result<Option<bool>, SolveError> {
  let assume_real = ctx.options().assume_real;
  let verdict = verify_equation(eq, bindings, assume_real)?;
  let mut lhs = eq.lhs().clone();
  let mut rhs = eq.rhs().clone();
  for binding in bindings {
    lhs = lhs.substitute(binding.variable(), binding.value());
    rhs = rhs.substitute(binding.variable(), binding.value());
  }
  let shown = Equation::new(simplify(&lhs)?, simplify(&rhs)?);
  let names: Vec<String> = bindings.iter().map(|b| b.to_string()).collect();
  let outcome = match verdict {
    Some(true) => "both sides agree",
    Some(false) => "the sides differ",
    None => "the check is inconclusive",
  };
  ctx.record(
    format!("Substitute {} into {}: {}", names.join(", "), eq, outcome),
    RuleTag::Verify,
    shown,
  )?;
  Ok(verdict)
}

// ─── Linear ─────────────────────────────────────────────────────────

impl Solver for LinearSolver {
  type Input = Equation;

  fn solve(
    &self,
    eq: &Equation,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    ctx.record("Restate the equation", RuleTag::Restate, eq.clone())?;
    let residual = Polynomial::from_expr(&eq.residual())?;
    ctx.record(
      "Move all terms to the left side",
      RuleTag::MoveTerms,
      Equation::new(eq.residual(), Expr::int(0)),
    )?;
    ctx.record(
      "Combine like terms",
      RuleTag::CombineLikeTerms,
      Equation::new(residual.to_expr(), Expr::int(0)),
    )?;

    let vars = present_variables(eq, &residual);
    let var = match target_variable(&vars) {
      Some(var) => var,
      None => return solve_constant_equation(eq, &residual, ctx),
    };
    let coeffs = match residual.coefficients_in(&var) {
      Some(c) if c.len() == 2 => c,
      _ => {
        ctx.warn(Warning::UnsupportedProblem);
        return Ok(Outcome::new(Solutions::Bindings(Vec::new()), None));
      }
    };
    let (b, a) = (&coeffs[0], &coeffs[1]);
    debug!("linear in {}: a = {}, b = {}", var, a.to_expr(), b.to_expr());

    let neg_b = b.negate();
    let lhs = a.mul(&Polynomial::variable(&var))?;
    ctx.record(
      format!("Isolate the term containing {}", var),
      RuleTag::IsolateTerm,
      Equation::new(lhs.to_expr(), neg_b.to_expr()),
    )?;

    if a.as_number().is_none() {
      ctx.warn(Warning::AssumedNonzeroCoefficient);
    }
    let value = neg_b.div(a)?.to_expr();
    if a.as_number() != Some(Number::ONE) {
      ctx.record(
        format!("Divide both sides by {}", a.to_expr()),
        RuleTag::DivideCoefficient,
        Equation::new(Expr::var(&var), value.clone()),
      )?;
    }

    if ctx.options().assume_real && leaves_real_domain(&value)? {
      ctx.warn(Warning::AssumedRealDomain);
      ctx.record(
        format!("{} is not real, so there is no real solution", value),
        RuleTag::Contradiction,
        Equation::new(Expr::var(&var), value),
      )?;
      return Ok(Outcome::new(Solutions::NoRealSolution, None));
    }

    let bindings = vec![SolutionBinding::new(var, value)];
    let verified = record_check(ctx, eq, &bindings)?;
    if verified == Some(false) {
      return Ok(rejected(ctx));
    }
    Ok(Outcome::new(Solutions::Bindings(bindings), verified))
  }
}

/// The value still involves `i` once brought into normal form.
fn leaves_real_domain(value: &Expr) -> Result<bool, SolveError> {
  Ok(simplify(value)?.contains_constant(Constant::I))
}

/// Every candidate failed its own substitution check.
pub(crate) fn rejected(ctx: &mut SolveContext<'_>) -> Outcome {
  debug!("all candidates rejected by substitution");
  ctx.warn(Warning::RejectedCandidate);
  Outcome::new(Solutions::Bindings(Vec::new()), None)
}

/// No variable survives: the equation is an identity or a contradiction.
fn solve_constant_equation(
  eq: &Equation,
  residual: &Polynomial,
  ctx: &mut SolveContext<'_>,
) -> Result<Outcome, SolveError> {
  let shown = Equation::new(residual.to_expr(), Expr::int(0));
  if residual.is_negligible() {
    ctx.record(
      "Both sides are equal for every value",
      RuleTag::Identity,
      shown,
    )?;
    Ok(Outcome::new(
      Solutions::InfiniteSolutions {
        relations: Vec::new(),
        free: eq.variables().to_vec(),
      },
      Some(true),
    ))
  } else {
    ctx.record(
      "The equation reduces to a false statement",
      RuleTag::Contradiction,
      shown,
    )?;
    Ok(Outcome::new(Solutions::NoSolution, None))
  }
}

// ─── Quadratic ──────────────────────────────────────────────────────

impl Solver for QuadraticSolver {
  type Input = Equation;

  fn solve(
    &self,
    eq: &Equation,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    ctx.record("Restate the equation", RuleTag::Restate, eq.clone())?;
    let residual = Polynomial::from_expr(&eq.residual())?;
    let vars: Vec<String> = present_variables(eq, &residual)
      .into_iter()
      .filter(|v| residual.degree_in(v) == Some(2))
      .collect();
    let (var, coeffs) = match target_variable(&vars)
      .and_then(|v| residual.coefficients_in(&v).map(|c| (v, c)))
    {
      Some((var, coeffs)) if coeffs.len() == 3 => (var, coeffs),
      _ => {
        ctx.warn(Warning::UnsupportedProblem);
        return Ok(Outcome::new(Solutions::Bindings(Vec::new()), None));
      }
    };
    ctx.record(
      format!("Write in standard form a{0}^2 + b{0} + c = 0", var),
      RuleTag::StandardForm,
      Equation::new(residual.to_expr(), Expr::int(0)),
    )?;

    let numeric: Option<Vec<Number>> =
      coeffs.iter().map(Polynomial::as_number).collect();
    let roots = match numeric {
      None if coeffs[0].is_zero() => {
        factored_roots(&coeffs[2], &coeffs[1], &var, ctx)?
      }
      Some(n) if n.iter().all(|c| c.is_exact()) => {
        exact_roots(n[2], n[1], n[0], &var, ctx)?
      }
      Some(n) => real_roots(n[2], n[1], n[0], &var, ctx)?,
      None => general_roots(&coeffs[2], &coeffs[1], &coeffs[0], &var, ctx)?,
    };
    let roots = match roots {
      Some(roots) => roots,
      None => return Ok(Outcome::new(Solutions::NoRealSolution, None)),
    };

    let mut kept = Vec::new();
    let mut verdicts = Vec::new();
    let (total, mut complex) = (roots.len(), 0);
    for root in roots {
      if ctx.options().assume_real && leaves_real_domain(root.value())? {
        debug!("dropping complex root {}", root);
        complex += 1;
        continue;
      }
      match record_check(ctx, eq, std::slice::from_ref(&root))? {
        Some(false) => ctx.warn(Warning::RejectedCandidate),
        verdict => {
          verdicts.push(verdict);
          kept.push(root);
        }
      }
    }
    if complex > 0 {
      ctx.warn(Warning::AssumedRealDomain);
      if complex == total {
        ctx.record(
          "The roots are not real numbers, so there is no real solution",
          RuleTag::QuadraticFormula,
          Expr::var(&var),
        )?;
        return Ok(Outcome::new(Solutions::NoRealSolution, None));
      }
    }
    if kept.is_empty() {
      return Ok(rejected(ctx));
    }
    Ok(Outcome::new(
      Solutions::Bindings(kept),
      combine_verdicts(verdicts),
    ))
  }
}

fn record_roots(
  var: &str,
  roots: Vec<Expr>,
  ctx: &mut SolveContext<'_>,
) -> Result<Vec<SolutionBinding>, SolveError> {
  let labels: &[&str] = if roots.len() == 1 {
    &["Apply the quadratic formula"]
  } else {
    &[
      "Apply the quadratic formula with the minus sign",
      "Apply the quadratic formula with the plus sign",
    ]
  };
  let mut bindings = Vec::new();
  for (root, label) in roots.into_iter().zip(labels) {
    ctx.record(
      *label,
      RuleTag::QuadraticFormula,
      Equation::new(Expr::var(var), root.clone()),
    )?;
    bindings.push(SolutionBinding::new(var, root));
  }
  Ok(bindings)
}

fn record_discriminant(
  value: Expr,
  ctx: &mut SolveContext<'_>,
) -> Result<(), SolveError> {
  ctx.record(
    "Compute the discriminant Δ = b^2 - 4ac",
    RuleTag::Discriminant,
    Equation::new(Expr::var("Δ"), value),
  )
}

fn no_real_roots(
  ctx: &mut SolveContext<'_>,
) -> Result<Option<Vec<SolutionBinding>>, SolveError> {
  ctx.warn(Warning::AssumedRealDomain);
  ctx.record(
    "Δ < 0, so there is no real solution",
    RuleTag::QuadraticFormula,
    Expr::var("Δ"),
  )?;
  Ok(None)
}

/// Scale rational coefficients to coprime integers.
fn integer_coefficients(coeffs: &[Number]) -> Option<Vec<i128>> {
  let mut l = 1;
  for c in coeffs {
    l = lcm(l, c.denom()?)?;
  }
  coeffs
    .iter()
    .map(|c| c.numer()?.checked_mul(l / c.denom()?))
    .collect()
}

/// `(nb ± so·√inside) / den` in lowest terms, optionally times `i`.
fn surd_root(
  nb: i128,
  so: i128,
  inside: i128,
  den: i128,
  minus: bool,
  imaginary: bool,
) -> Expr {
  let g = gcd(gcd(nb, so), den).max(1);
  let (mut nb, mut so, mut den) = (nb / g, so / g, den / g);
  if den < 0 {
    nb = -nb;
    so = -so;
    den = -den;
  }
  let minus = if so < 0 { !minus } else { minus };
  let so = so.abs();

  let mut parts = Vec::new();
  if so != 1 {
    parts.push(Expr::int(so));
  }
  if inside != 1 {
    parts.push(Expr::call("sqrt", Expr::int(inside)));
  }
  if imaginary {
    parts.push(Expr::Constant(Constant::I));
  }
  let radical = Expr::product(parts);
  let numerator = match (nb, minus) {
    (0, false) => radical,
    (0, true) => Expr::neg(radical),
    (_, false) => Expr::add(Expr::int(nb), radical),
    (_, true) => Expr::sub(Expr::int(nb), radical),
  };
  if den == 1 {
    numerator
  } else {
    Expr::div(numerator, Expr::int(den))
  }
}

fn exact_roots(
  a: Number,
  b: Number,
  c: Number,
  var: &str,
  ctx: &mut SolveContext<'_>,
) -> Result<Option<Vec<SolutionBinding>>, SolveError> {
  let disc = b * b - Number::int(4) * a * c;
  record_discriminant(Expr::Number(disc), ctx)?;

  let scaled = integer_coefficients(&[a, b, c]);
  let (ai, bi, ci) = match scaled.as_deref() {
    Some(&[ai, bi, ci]) => (ai, bi, ci),
    _ => return real_roots(a, b, c, var, ctx),
  };
  let disc_int = match bi
    .checked_mul(bi)
    .zip(ai.checked_mul(ci).and_then(|p| p.checked_mul(4)))
    .and_then(|(l, r)| l.checked_sub(r))
  {
    Some(d) => d,
    None => return real_roots(a, b, c, var, ctx),
  };
  let two_a = 2 * ai;

  if disc_int == 0 {
    ctx.warn(Warning::RepeatedRoot);
    let root = Number::rational(-bi, two_a)
      .ok_or_else(|| {
        SolveError::ArithmeticError("zero leading coefficient".into())
      })?;
    return record_roots(var, vec![Expr::Number(root)], ctx).map(Some);
  }
  if disc_int < 0 && ctx.options().assume_real {
    return no_real_roots(ctx);
  }

  let imaginary = disc_int < 0;
  let (outside, inside) = sqrt_parts(disc_int.abs());
  let mut roots = if inside == 1 && !imaginary {
    let mut rs = Vec::new();
    for numerator in [-bi - outside, -bi + outside] {
      let r = Number::rational(numerator, two_a).ok_or_else(|| {
        SolveError::ArithmeticError("zero leading coefficient".into())
      })?;
      rs.push(Expr::Number(r));
    }
    rs
  } else {
    vec![
      surd_root(-bi, outside, inside, two_a, true, imaginary),
      surd_root(-bi, outside, inside, two_a, false, imaginary),
    ]
  };
  if !imaginary {
    sort_ascending(&mut roots);
  }
  record_roots(var, roots, ctx).map(Some)
}

fn sort_ascending(roots: &mut [Expr]) {
  roots.sort_by(|l, r| {
    let (l, r) = (l.approximate(), r.approximate());
    l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal)
  });
}

/// Roots for floating-point coefficients.
fn real_roots(
  a: Number,
  b: Number,
  c: Number,
  var: &str,
  ctx: &mut SolveContext<'_>,
) -> Result<Option<Vec<SolutionBinding>>, SolveError> {
  let (a, b, c) = (a.to_f64(), b.to_f64(), c.to_f64());
  let disc = b * b - 4.0 * a * c;
  record_discriminant(Expr::Number(Number::Real(disc)), ctx)?;
  let real = |x: f64| Expr::Number(Number::Real(x));

  if disc.abs() < 1e-12 {
    ctx.warn(Warning::RepeatedRoot);
    return record_roots(var, vec![real(-b / (2.0 * a))], ctx).map(Some);
  }
  if disc < 0.0 {
    if ctx.options().assume_real {
      return no_real_roots(ctx);
    }
    let re = -b / (2.0 * a);
    let im = (-disc).sqrt() / (2.0 * a).abs();
    let imag = Expr::mul(real(im), Expr::Constant(Constant::I));
    let roots = vec![
      Expr::sub(real(re), imag.clone()),
      Expr::add(real(re), imag),
    ];
    return record_roots(var, roots, ctx).map(Some);
  }
  let root = disc.sqrt();
  let mut roots = vec![
    real((-b - root) / (2.0 * a)),
    real((-b + root) / (2.0 * a)),
  ];
  sort_ascending(&mut roots);
  record_roots(var, roots, ctx).map(Some)
}

/// `a·x^2 + b·x = x(a·x + b)` for symbolic coefficients, with roots `0` and
/// `-b/a`.
fn factored_roots(
  a: &Polynomial,
  b: &Polynomial,
  var: &str,
  ctx: &mut SolveContext<'_>,
) -> Result<Option<Vec<SolutionBinding>>, SolveError> {
  if a.as_number().is_none() {
    ctx.warn(Warning::AssumedNonzeroCoefficient);
  }
  let x = Polynomial::variable(var);
  let inner = a.mul(&x)?.add(b)?;
  ctx.record(
    format!("Factor out {}", var),
    RuleTag::Factor,
    Equation::new(Expr::mul(x.to_expr(), inner.to_expr()), Expr::int(0)),
  )?;
  let other = b.negate().div(a)?.to_expr();
  let mut bindings = Vec::new();
  for (label, root) in [
    ("The first factor vanishes", Expr::int(0)),
    ("The second factor vanishes", other),
  ] {
    ctx.record(
      label,
      RuleTag::Factor,
      Equation::new(Expr::var(var), root.clone()),
    )?;
    bindings.push(SolutionBinding::new(var, root));
  }
  Ok(Some(bindings))
}

/// The general formula for symbolic coefficients.
fn general_roots(
  a: &Polynomial,
  b: &Polynomial,
  c: &Polynomial,
  var: &str,
  ctx: &mut SolveContext<'_>,
) -> Result<Option<Vec<SolutionBinding>>, SolveError> {
  let four_ac = a.mul(c)?.scale(Number::int(4));
  let disc = b.mul(b)?.sub(&four_ac)?;
  record_discriminant(disc.to_expr(), ctx)?;
  ctx.warn(Warning::DiscriminantSignUnknown);
  if a.as_number().is_none() {
    ctx.warn(Warning::AssumedNonzeroCoefficient);
  }

  let neg_b = b.negate().to_expr();
  let two_a = a.scale(Number::int(2)).to_expr();
  let radical = Expr::call("sqrt", disc.to_expr());
  let root = |minus: bool| {
    let numerator = if b.is_zero() {
      if minus {
        Expr::neg(radical.clone())
      } else {
        radical.clone()
      }
    } else if minus {
      Expr::sub(neg_b.clone(), radical.clone())
    } else {
      Expr::add(neg_b.clone(), radical.clone())
    };
    Expr::div(numerator, two_a.clone())
  };
  record_roots(var, vec![root(true), root(false)], ctx).map(Some)
}
