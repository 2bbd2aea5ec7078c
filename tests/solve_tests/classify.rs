use super::*;
use mathsolve::{DomainHint, classify, classify_with_hint, parse};

fn kind_of(problem: &str) -> ProblemKind {
  classify(&parse(problem).unwrap())
}

#[test]
fn equations_by_degree() {
  assert_eq!(kind_of("2x + 3 = 11"), ProblemKind::LinearEquation);
  assert_eq!(kind_of("x^2 = 4"), ProblemKind::QuadraticEquation);
  assert_eq!(kind_of("x^3 = 8"), ProblemKind::Unsupported);
}

#[test]
fn systems_must_be_linear() {
  assert_eq!(kind_of("x + y = 1, x - y = 3"), ProblemKind::SystemOfEquations);
  assert_eq!(kind_of("x y = 1, x - y = 3"), ProblemKind::Unsupported);
}

#[test]
fn geometry_and_calculus() {
  assert_eq!(
    kind_of("area of a circle with radius = 1"),
    ProblemKind::GeometryQuery
  );
  assert_eq!(
    kind_of("area of a hexagon with side = 1"),
    ProblemKind::Unsupported
  );
  assert_eq!(kind_of("d/dx(x^2)"), ProblemKind::Differentiation);
  assert_eq!(kind_of("integrate x dx"), ProblemKind::Integration);
}

#[test]
fn bare_expression_is_unsupported() {
  assert_eq!(kind_of("2x + 1"), ProblemKind::Unsupported);
}

#[test]
fn closed_expression_is_arithmetic() {
  assert_eq!(kind_of("2 + 3*4"), ProblemKind::Arithmetic);
  assert_eq!(kind_of("sqrt(16) - π"), ProblemKind::Arithmetic);
}

#[test]
fn arithmetic_is_evaluated() {
  let result = run("2 + 3*4");
  assert_eq!(result.kind(), ProblemKind::Arithmetic);
  assert_eq!(result.solution_strings(), vec!["value = 14"]);
  assert_eq!(result.verified(), Some(true));
  assert_eq!(rules(&result), vec![RuleTag::Restate, RuleTag::Evaluate]);
}

#[test]
fn domain_hint_mismatch() {
  let parsed = parse("2x + 3 = 11").unwrap();
  let (kind, warning) = classify_with_hint(&parsed, DomainHint::Geometry);
  assert_eq!(kind, ProblemKind::Unsupported);
  assert_eq!(warning, Some(Warning::DomainHintMismatch));

  let (kind, warning) = classify_with_hint(&parsed, DomainHint::Algebra);
  assert_eq!(kind, ProblemKind::LinearEquation);
  assert_eq!(warning, None);
}

#[test]
fn unsupported_problem_is_reported_not_failed() {
  let result = run("x^3 = 8");
  assert_eq!(result.kind(), ProblemKind::Unsupported);
  assert!(result.has_warning(Warning::UnsupportedProblem));
  assert!(result.solution_strings().is_empty());
}

#[test]
fn hint_mismatch_through_solve() {
  let options = SolveOptions {
    domain_hint: DomainHint::Calculus,
    ..SolveOptions::default()
  };
  let result = solve("2x + 3 = 11", &options).unwrap();
  assert_eq!(result.kind(), ProblemKind::Unsupported);
  assert!(result.has_warning(Warning::DomainHintMismatch));
}
