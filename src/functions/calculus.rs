//! Symbolic differentiation and integration over the expression tree.
//!
//! Differentiation walks the tree bottom-up and records the rule applied at
//! every node. Integration brings the integrand into normal form and
//! integrates it term by term against a fixed table of antiderivatives.

use log::debug;

use crate::SolveError;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::functions::polynomial::{Polynomial, Term, simplify};
use crate::functions::{Outcome, SolveContext, Solver};
use crate::number::Number;
use crate::parser::CalculusQuery;
use crate::steps::RuleTag;
use crate::syntax::{BinaryOperator, Constant, Equation, Expr};

pub struct DifferentiationSolver;

pub struct IntegrationSolver;

/// Receives every differentiated node with its derivative and rule.
type Trace<'t> =
  dyn FnMut(&Expr, &Expr, RuleTag) -> Result<(), SolveError> + 't;

fn is_variable(expr: &Expr, var: &str) -> bool {
  matches!(expr, Expr::Variable(v) if v == var)
}

fn rule_phrase(rule: RuleTag) -> String {
  rule.as_str().replace('_', " ")
}

// ─── Differentiation ────────────────────────────────────────────────

/// Derivative of `expr` with respect to `var`, already simplified.
fn derive(
  expr: &Expr,
  var: &str,
  depth: usize,
  max_depth: usize,
  trace: &mut Trace<'_>,
) -> Result<Expr, SolveError> {
  if depth > max_depth {
    return Err(SolveError::ComplexityLimitExceeded { steps: 0 });
  }
  if !expr.contains_variable(var) {
    let zero = Expr::int(0);
    trace(expr, &zero, RuleTag::ConstantRule)?;
    return Ok(zero);
  }

  let next = depth + 1;

  let (raw, rule) = match expr {
    Expr::Variable(_) => (Expr::int(1), RuleTag::VariableRule),
    Expr::UnaryOp { operand, .. } => {
      let inner = derive(operand, var, next, max_depth, trace)?;
      (Expr::neg(inner), RuleTag::ConstantMultipleRule)
    }
    Expr::BinaryOp { op, left, right } => {
      let (l, r) = (left.as_ref(), right.as_ref());
      let l_const = !l.contains_variable(var);
      let r_const = !r.contains_variable(var);
      match op {
        BinaryOperator::Plus | BinaryOperator::Minus => {
          derive_sum(expr, var, next, max_depth, trace)?
        }
        BinaryOperator::Times if l_const => {
          let dr = derive(r, var, next, max_depth, trace)?;
          (Expr::mul(l.clone(), dr), RuleTag::ConstantMultipleRule)
        }
        BinaryOperator::Times if r_const => {
          let dl = derive(l, var, next, max_depth, trace)?;
          (Expr::mul(dl, r.clone()), RuleTag::ConstantMultipleRule)
        }
        BinaryOperator::Times => {
          let dl = derive(l, var, next, max_depth, trace)?;
          let dr = derive(r, var, next, max_depth, trace)?;
          (
            Expr::add(Expr::mul(dl, r.clone()), Expr::mul(l.clone(), dr)),
            RuleTag::ProductRule,
          )
        }
        BinaryOperator::Divide if r_const => {
          let dl = derive(l, var, next, max_depth, trace)?;
          (Expr::div(dl, r.clone()), RuleTag::ConstantMultipleRule)
        }
        BinaryOperator::Divide => {
          let dl = derive(l, var, next, max_depth, trace)?;
          let dr = derive(r, var, next, max_depth, trace)?;
          (
            Expr::div(
              Expr::sub(Expr::mul(dl, r.clone()), Expr::mul(l.clone(), dr)),
              Expr::pow(r.clone(), Expr::int(2)),
            ),
            RuleTag::QuotientRule,
          )
        }
        BinaryOperator::Power if r_const => {
          // n·u^(n-1)·u'
          let du = derive(l, var, next, max_depth, trace)?;
          let lowered =
            Expr::pow(l.clone(), Expr::sub(r.clone(), Expr::int(1)));
          let rule = if is_variable(l, var) {
            RuleTag::PowerRule
          } else {
            RuleTag::ChainRule
          };
          (Expr::product(vec![r.clone(), lowered, du]), rule)
        }
        BinaryOperator::Power if l_const => {
          // a^u·ln(a)·u'
          let du = derive(r, var, next, max_depth, trace)?;
          let scale = match l {
            Expr::Constant(Constant::E) => Expr::int(1),
            base => Expr::call("ln", base.clone()),
          };
          (
            Expr::product(vec![expr.clone(), scale, du]),
            RuleTag::ExponentialRule,
          )
        }
        BinaryOperator::Power => {
          // f^g = e^(g·ln f)
          let df = derive(l, var, next, max_depth, trace)?;
          let dg = derive(r, var, next, max_depth, trace)?;
          let inner = Expr::add(
            Expr::mul(dg, Expr::call("ln", l.clone())),
            Expr::div(Expr::mul(r.clone(), df), l.clone()),
          );
          (Expr::mul(expr.clone(), inner), RuleTag::ExponentialRule)
        }
      }
    }
    Expr::Function { name, args } => {
      let [u] = args.as_slice() else {
        return Err(SolveError::ArithmeticError(format!(
          "cannot differentiate {}",
          expr
        )));
      };
      let u = u.as_ref();
      let du = derive(u, var, next, max_depth, trace)?;
      let (outer, base_rule) = outer_derivative(name, u, expr)?;
      let rule = if is_variable(u, var) {
        base_rule
      } else {
        RuleTag::ChainRule
      };
      (Expr::mul(outer, du), rule)
    }
    Expr::Number(_) | Expr::Constant(_) => {
      (Expr::int(0), RuleTag::ConstantRule)
    }
  };

  let result = simplify(&raw)?;
  trace(expr, &result, rule)?;
  Ok(result)
}

/// Operands of a left-nested chain of `+` and `-`, flagged when subtracted.
fn sum_operands(expr: &Expr) -> Vec<(bool, &Expr)> {
  let mut operands = Vec::new();
  let mut node = expr;
  while let Expr::BinaryOp {
    op: op @ (BinaryOperator::Plus | BinaryOperator::Minus),
    left,
    right,
  } = node
  {
    operands.push((*op == BinaryOperator::Minus, right.as_ref()));
    node = left.as_ref();
  }
  operands.push((false, node));
  operands.reverse();
  operands
}

/// Differentiates a whole chain `a ± b ± c ...` as one node.
fn derive_sum(
  expr: &Expr,
  var: &str,
  depth: usize,
  max_depth: usize,
  trace: &mut Trace<'_>,
) -> Result<(Expr, RuleTag), SolveError> {
  let operands = sum_operands(expr);
  let rule = if operands.iter().skip(1).all(|(minus, _)| *minus) {
    RuleTag::DifferenceRule
  } else {
    RuleTag::SumRule
  };
  let mut terms = Vec::with_capacity(operands.len());
  for (minus, operand) in operands {
    let d = derive(operand, var, depth, max_depth, trace)?;
    terms.push(if minus { Expr::neg(d) } else { d });
  }
  Ok((Expr::sum(terms), rule))
}

/// `f'(u)` for the supported functions, with the rule it applies.
fn outer_derivative(
  name: &str,
  u: &Expr,
  expr: &Expr,
) -> Result<(Expr, RuleTag), SolveError> {
  Ok(match name {
    "sin" => (Expr::call("cos", u.clone()), RuleTag::TrigonometricRule),
    "cos" => (
      Expr::neg(Expr::call("sin", u.clone())),
      RuleTag::TrigonometricRule,
    ),
    "tan" => (
      Expr::div(
        Expr::int(1),
        Expr::pow(Expr::call("cos", u.clone()), Expr::int(2)),
      ),
      RuleTag::TrigonometricRule,
    ),
    "exp" => (expr.clone(), RuleTag::ExponentialRule),
    "ln" => (Expr::div(Expr::int(1), u.clone()), RuleTag::LogarithmicRule),
    "log" => (
      Expr::div(
        Expr::int(1),
        Expr::mul(u.clone(), Expr::call("ln", Expr::int(10))),
      ),
      RuleTag::LogarithmicRule,
    ),
    "sqrt" => (
      Expr::div(Expr::int(1), Expr::mul(Expr::int(2), expr.clone())),
      RuleTag::PowerRule,
    ),
    _ => {
      return Err(SolveError::ArithmeticError(format!(
        "cannot differentiate {}",
        expr
      )));
    }
  })
}

/// Derivative without a step log.
pub fn differentiate(
  expr: &Expr,
  var: &str,
  max_depth: usize,
) -> Result<Expr, SolveError> {
  derive(expr, var, 0, max_depth, &mut |_: &Expr, _: &Expr, _| Ok(()))
}

impl Solver for DifferentiationSolver {
  type Input = CalculusQuery;

  fn solve(
    &self,
    query: &CalculusQuery,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    let var = query.variable.as_str();
    ctx.record(
      format!("Differentiate with respect to {}", var),
      RuleTag::Restate,
      Expr::derivative_of(query.body.clone(), var),
    )?;

    let max_depth = ctx.options().max_depth;
    let result = derive(
      &query.body,
      var,
      0,
      max_depth,
      &mut |node: &Expr, derivative: &Expr, rule: RuleTag| {
        ctx.record(
          format!("Apply the {} to {}", rule_phrase(rule), node),
          rule,
          Equation::new(
            Expr::derivative_of(node.clone(), var),
            derivative.clone(),
          ),
        )
      },
    )?;
    debug!("d/d{}({}) = {}", var, query.body, result);

    let binding = SolutionBinding::new(format!("f'({})", var), result);
    Ok(Outcome::new(Solutions::Bindings(vec![binding]), None))
  }
}

// ─── Integration ────────────────────────────────────────────────────

/// `a` when `u = a·var + b` with `a` free of `var`.
fn linear_slope(u: &Expr, var: &str) -> Option<Polynomial> {
  let poly = Polynomial::from_expr(u).ok()?;
  if poly.degree_in(var)? != 1 {
    return None;
  }
  poly.coefficients_in(var)?.into_iter().nth(1)
}

fn unsupported(term: &Term, var: &str) -> SolveError {
  SolveError::UnsupportedIntegralError(
    Expr::integral_of(term.to_expr(), var).to_string(),
  )
}

/// Antiderivative of a single normal-form term.
fn integrate_term(
  term: &Term,
  var: &str,
  ctx: &mut SolveContext<'_>,
) -> Result<(Polynomial, RuleTag), SolveError> {
  let (constant, dependent) = term.split_variable(var);
  match dependent.as_slice() {
    [] => Ok((
      constant.mul(&Polynomial::variable(var))?,
      RuleTag::ConstantIntegral,
    )),
    [(Expr::Variable(_), n)] if *n == Number::int(-1) => {
      ctx.warn(Warning::AssumedPositiveArgument);
      let ln = Polynomial::from_expr(&Expr::call("ln", Expr::var(var)))?;
      Ok((constant.mul(&ln)?, RuleTag::ReciprocalIntegral))
    }
    [(Expr::Variable(_), n)] => {
      let raised = *n + Number::ONE;
      let factor = raised.recip().ok_or_else(|| unsupported(term, var))?;
      let power = Polynomial::variable(var).pow(raised)?;
      Ok((constant.scale(factor).mul(&power)?, RuleTag::PowerIntegral))
    }
    [(Expr::Function { name, args }, e)] if e.is_one() && args.len() == 1 => {
      let u = args[0].as_ref();
      let slope = linear_slope(u, var).ok_or_else(|| unsupported(term, var))?;
      let (antiderivative, rule) = match name.as_str() {
        "sin" => (
          Expr::neg(Expr::call("cos", u.clone())),
          RuleTag::TrigonometricIntegral,
        ),
        "cos" => (Expr::call("sin", u.clone()), RuleTag::TrigonometricIntegral),
        "exp" => (Expr::call("exp", u.clone()), RuleTag::ExponentialIntegral),
        _ => return Err(unsupported(term, var)),
      };
      let result = constant
        .mul(&Polynomial::from_expr(&antiderivative)?)?
        .div(&slope)?;
      Ok((result, rule))
    }
    [(Expr::BinaryOp { op: BinaryOperator::Power, left, right }, e)]
      if e.is_one() && **left == Expr::Constant(Constant::E) =>
    {
      let slope =
        linear_slope(right, var).ok_or_else(|| unsupported(term, var))?;
      let exp = Polynomial::from_expr(&Expr::pow(
        Expr::Constant(Constant::E),
        right.as_ref().clone(),
      ))?;
      Ok((constant.mul(&exp)?.div(&slope)?, RuleTag::ExponentialIntegral))
    }
    _ => Err(unsupported(term, var)),
  }
}

impl Solver for IntegrationSolver {
  type Input = CalculusQuery;

  fn solve(
    &self,
    query: &CalculusQuery,
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    let var = query.variable.as_str();
    ctx.record(
      format!("Integrate with respect to {}", var),
      RuleTag::Restate,
      Expr::integral_of(query.body.clone(), var),
    )?;

    let integrand = Polynomial::from_expr(&query.body)?;
    let normal = integrand.to_expr();
    if normal != query.body {
      ctx.record(
        "Expand the integrand",
        RuleTag::Simplify,
        Expr::integral_of(normal.clone(), var),
      )?;
    }

    let terms = integrand.ordered_terms();
    if terms.len() > 1 {
      ctx.record(
        "Integrate term by term",
        RuleTag::Linearity,
        Expr::sum(
          terms
            .iter()
            .map(|t| Expr::integral_of(t.to_expr(), var))
            .collect(),
        ),
      )?;
    }

    let mut antiderivative = Polynomial::zero();
    if terms.is_empty() {
      ctx.record(
        format!("Apply the {} to 0", rule_phrase(RuleTag::ConstantIntegral)),
        RuleTag::ConstantIntegral,
        Equation::new(Expr::integral_of(Expr::int(0), var), Expr::int(0)),
      )?;
    }
    for term in terms {
      let (result, rule) = integrate_term(term, var, ctx)?;
      let shown = term.to_expr();
      ctx.record(
        format!("Apply the {} to {}", rule_phrase(rule), shown),
        rule,
        Equation::new(Expr::integral_of(shown, var), result.to_expr()),
      )?;
      antiderivative = antiderivative.add(&result)?;
    }

    let result = antiderivative.to_expr();
    let with_constant = Expr::add(result.clone(), Expr::var("C"));
    let name = format!("F({})", var);
    ctx.record(
      "Add the constant of integration",
      RuleTag::IntegrationConstant,
      Equation::new(Expr::var(&name), with_constant.clone()),
    )?;

    // d/dx F(x) must give back the integrand
    let derivative = differentiate(&result, var, ctx.options().max_depth)?;
    let residue =
      Polynomial::from_expr(&Expr::sub(derivative, query.body.clone()))?;
    let verified = if residue.is_negligible() {
      (result.is_exact() && residue.is_exact()).then_some(true)
    } else if residue.is_algebraic() {
      Some(false)
    } else {
      None
    };
    debug!("∫({}) d{} = {} ({:?})", query.body, var, result, verified);

    let binding = SolutionBinding::new(name, with_constant);
    Ok(Outcome::new(Solutions::Bindings(vec![binding]), verified))
  }
}
