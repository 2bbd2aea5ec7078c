use super::*;
use mathsolve::functions::polynomial::{Polynomial, simplify};
use mathsolve::number::Number;
use mathsolve::syntax::Expr;
use mathsolve::{Parsed, parse};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CASES: usize = 64;

fn nonzero(rng: &mut ChaCha8Rng, bound: i128) -> i128 {
  loop {
    let n = rng.gen_range(-bound..=bound);
    if n != 0 {
      return n;
    }
  }
}

fn normal_form(text: &str) -> Polynomial {
  match parse(text).unwrap() {
    Parsed::Expression(e) => Polynomial::from_expr(&e).unwrap(),
    other => panic!("expected an expression, got {}", other),
  }
}

/// `c·x^n` with small random `c` and `n`.
fn monomial(rng: &mut ChaCha8Rng) -> String {
  format!("{}x^{}", nonzero(rng, 9), rng.gen_range(0..=5))
}

#[test]
fn linear_solution_is_c_minus_b_over_a() {
  let mut rng = ChaCha8Rng::seed_from_u64(7);
  for _ in 0..CASES {
    let a = nonzero(&mut rng, 20);
    let b = rng.gen_range(-20..=20);
    let c = rng.gen_range(-20..=20);
    let problem = format!("{}x + {} = {}", a, b, c);
    let expected = Number::rational(c - b, a).unwrap();
    let result = run(&problem);
    assert_eq!(
      result.solution_strings(),
      vec![format!("x = {}", expected)],
      "{}",
      problem
    );
    assert_eq!(result.verified(), Some(true), "{}", problem);
  }
}

#[test]
fn quadratic_with_integer_roots() {
  let mut rng = ChaCha8Rng::seed_from_u64(11);
  for _ in 0..CASES {
    let r1: i128 = rng.gen_range(-12..=12);
    let r2: i128 = rng.gen_range(-12..=12);
    let problem = format!("x^2 + {}x + {} = 0", -(r1 + r2), r1 * r2);
    let result = run(&problem);
    if r1 == r2 {
      assert_eq!(
        result.solution_strings(),
        vec![format!("x = {}", r1)],
        "{}",
        problem
      );
      assert!(result.has_warning(Warning::RepeatedRoot));
    } else {
      assert_eq!(
        result.solution_strings(),
        vec![
          format!("x = {}", r1.min(r2)),
          format!("x = {}", r1.max(r2))
        ],
        "{}",
        problem
      );
    }
    assert_eq!(result.verified(), Some(true), "{}", problem);
  }
}

#[test]
fn negative_discriminant_never_yields_real_roots() {
  let mut rng = ChaCha8Rng::seed_from_u64(13);
  for _ in 0..CASES {
    let p: i128 = rng.gen_range(-6..=6);
    let q = p * p + rng.gen_range(1..=20);
    // x^2 + 2px + q has Δ = 4(p^2 - q) < 0
    let problem = format!("x^2 + {}x + {} = 0", 2 * p, q);
    let result = run(&problem);
    assert_eq!(result.solutions(), &Solutions::NoRealSolution, "{}", problem);
  }
}

#[test]
fn derivative_is_linear() {
  let mut rng = ChaCha8Rng::seed_from_u64(17);
  for _ in 0..CASES {
    let f = monomial(&mut rng);
    let g = monomial(&mut rng);
    let derivative = |body: &str| -> Expr {
      let result = run(&format!("d/dx({})", body));
      result.solutions().bindings()[0].value().clone()
    };
    let combined = derivative(&format!("{} + {}", f, g));
    let separate = Expr::add(derivative(&f), derivative(&g));
    assert_eq!(
      Polynomial::from_expr(&combined).unwrap(),
      Polynomial::from_expr(&separate).unwrap(),
      "d/dx({} + {})",
      f,
      g
    );
  }
}

#[test]
fn integrals_of_polynomials_verify() {
  let mut rng = ChaCha8Rng::seed_from_u64(19);
  for _ in 0..CASES {
    let body = format!("{} + {}", monomial(&mut rng), monomial(&mut rng));
    let result = run(&format!("integrate {} dx", body));
    assert_eq!(result.verified(), Some(true), "∫ {} dx", body);
  }
}

#[test]
fn simplify_is_idempotent() {
  let mut rng = ChaCha8Rng::seed_from_u64(23);
  for _ in 0..CASES {
    let shift: i128 = rng.gen_range(-9..=9);
    let text = format!(
      "({})(x + {}) - {}",
      monomial(&mut rng),
      shift,
      monomial(&mut rng)
    );
    let once = simplify(&normal_form(&text).to_expr()).unwrap();
    let twice = simplify(&once).unwrap();
    assert_eq!(once, twice, "{}", text);
  }
}

#[test]
fn solving_twice_gives_identical_results() {
  for problem in [
    "2x + 5 = 13",
    "x^2 - x - 1 = 0",
    "x + y = 10, x - y = 2",
    "circle area, r=3",
    "d/dx(x sin(x))",
    "integrate 3x^2 + cos(x) dx",
  ] {
    assert_eq!(run(problem), run(problem), "{}", problem);
  }
}
