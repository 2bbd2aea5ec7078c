//! Systems of linear equations by exact Gauss–Jordan elimination.

use log::debug;

use crate::SolveError;
use crate::format::{SolutionBinding, Solutions, Warning};
use crate::functions::algebra::{record_check, rejected};
use crate::functions::polynomial::Polynomial;
use crate::functions::{Outcome, SolveContext, Solver, combine_verdicts};
use crate::number::Number;
use crate::steps::RuleTag;
use crate::syntax::{Equation, Expr};

pub struct SystemSolver;

/// `Σ row[j]·vars[j] = row[n]` as an equation.
fn row_equation(
  row: &[Number],
  vars: &[String],
) -> Result<Equation, SolveError> {
  let mut lhs = Polynomial::zero();
  for (coeff, var) in row.iter().zip(vars) {
    lhs = lhs.add(&Polynomial::variable(var).scale(*coeff))?;
  }
  let rhs = row.last().copied().unwrap_or(Number::ZERO);
  Ok(Equation::new(lhs.to_expr(), Expr::Number(rhs)))
}

fn subtract_multiple(target: &mut [Number], pivot: &[Number], factor: Number) {
  for (t, p) in target.iter_mut().zip(pivot) {
    *t = *t - factor * *p;
  }
}

impl Solver for SystemSolver {
  type Input = [Equation];

  fn solve(
    &self,
    equations: &[Equation],
    ctx: &mut SolveContext<'_>,
  ) -> Result<Outcome, SolveError> {
    let mut vars: Vec<String> = Vec::new();
    for (idx, eq) in equations.iter().enumerate() {
      ctx.record(
        format!("Equation {}", idx + 1),
        RuleTag::Restate,
        eq.clone(),
      )?;
      for v in eq.variables() {
        if !vars.contains(v) {
          vars.push(v.clone());
        }
      }
    }

    let mut rows: Vec<Vec<Number>> = Vec::new();
    for eq in equations {
      let poly = Polynomial::from_expr(&eq.residual())?;
      match poly.linear_row(&vars) {
        Some((mut coeffs, constant)) => {
          coeffs.push(-constant);
          rows.push(coeffs);
        }
        None => {
          ctx.warn(Warning::UnsupportedProblem);
          return Ok(Outcome::new(Solutions::Bindings(Vec::new()), None));
        }
      }
    }

    let n = vars.len();
    let mut pivots: Vec<usize> = Vec::new();
    let mut pivot_row = 0;
    for col in 0..n {
      if pivot_row == rows.len() {
        break;
      }
      let found =
        (pivot_row..rows.len()).find(|&r| !rows[r][col].is_negligible());
      let r = match found {
        Some(r) => r,
        None => continue,
      };
      if r != pivot_row {
        rows.swap(r, pivot_row);
        ctx.record(
          format!("Swap rows {} and {}", pivot_row + 1, r + 1),
          RuleTag::Normalize,
          row_equation(&rows[pivot_row], &vars)?,
        )?;
      }
      let p = rows[pivot_row][col];
      if !p.is_one() {
        let inv = p.recip().ok_or_else(|| {
          SolveError::ArithmeticError("zero pivot".into())
        })?;
        for v in rows[pivot_row].iter_mut() {
          *v = *v * inv;
        }
        ctx.record(
          format!("Divide row {} by {}", pivot_row + 1, p),
          RuleTag::Normalize,
          row_equation(&rows[pivot_row], &vars)?,
        )?;
      }
      let pivot = rows[pivot_row].clone();
      for other in 0..rows.len() {
        if other == pivot_row || rows[other][col].is_negligible() {
          continue;
        }
        let factor = rows[other][col];
        subtract_multiple(&mut rows[other], &pivot, factor);
        ctx.record(
          format!(
            "Eliminate {} from row {} using row {}",
            vars[col],
            other + 1,
            pivot_row + 1
          ),
          RuleTag::Eliminate,
          row_equation(&rows[other], &vars)?,
        )?;
      }
      pivots.push(col);
      pivot_row += 1;
    }
    debug!("pivot columns {:?} of {} variables", pivots, n);

    for (idx, row) in rows.iter().enumerate() {
      let constant = row[n];
      if row[..n].iter().all(|c| c.is_negligible())
        && !constant.is_negligible()
      {
        ctx.record(
          format!("Row {} reduces to 0 = {}", idx + 1, constant),
          RuleTag::Inconsistent,
          Equation::new(Expr::int(0), Expr::Number(constant)),
        )?;
        return Ok(Outcome::new(Solutions::NoSolution, None));
      }
    }

    let free: Vec<String> = (0..n)
      .filter(|c| !pivots.contains(c))
      .map(|c| vars[c].clone())
      .collect();
    for var in &free {
      ctx.record(
        format!("{} is a free variable", var),
        RuleTag::FreeVariable,
        Expr::var(var),
      )?;
    }

    let mut bindings = Vec::new();
    for (row, &col) in rows.iter().zip(&pivots) {
      let mut value = Polynomial::constant(row[n]);
      for (j, var) in vars.iter().enumerate() {
        if j != col && !row[j].is_negligible() {
          value = value.sub(&Polynomial::variable(var).scale(row[j]))?;
        }
      }
      bindings.push(SolutionBinding::new(vars[col].clone(), value.to_expr()));
    }

    let mut verdicts = Vec::new();
    for eq in equations {
      verdicts.push(record_check(ctx, eq, &bindings)?);
    }
    let verified = combine_verdicts(verdicts);
    if verified == Some(false) {
      return Ok(rejected(ctx));
    }
    let solutions = if free.is_empty() {
      Solutions::Bindings(bindings)
    } else {
      Solutions::InfiniteSolutions {
        relations: bindings,
        free,
      }
    };
    Ok(Outcome::new(solutions, verified))
  }
}
