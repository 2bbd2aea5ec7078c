use super::*;

#[test]
fn factorable_quadratic() {
  let result = run("x^2 - 5x + 6 = 0");
  assert_eq!(result.kind(), ProblemKind::QuadraticEquation);
  assert_eq!(result.solution_strings(), vec!["x = 2", "x = 3"]);
  assert_eq!(result.verified(), Some(true));
}

#[test]
fn roots_are_listed_in_ascending_order() {
  assert_eq!(answers("x² = 9"), vec!["x = -3", "x = 3"]);
}

#[test]
fn irrational_roots_use_surds() {
  let result = run("x^2 - x - 1 = 0");
  assert_eq!(
    result.solution_strings(),
    vec!["x = (1 - √5)/2", "x = (1 + √5)/2"]
  );
  assert_eq!(result.verified(), Some(true));
}

#[test]
fn steps_include_the_discriminant() {
  let result = run("x^2 - 5x + 6 = 0");
  let tags = rules(&result);
  assert_eq!(tags[0], RuleTag::Restate);
  assert_eq!(tags[1], RuleTag::StandardForm);
  assert_eq!(tags[2], RuleTag::Discriminant);
  assert_eq!(result.steps()[2].expression().to_string(), "Δ = 1");
  assert_eq!(
    tags.iter().filter(|t| **t == RuleTag::QuadraticFormula).count(),
    2
  );
}

#[test]
fn repeated_root() {
  let result = run("x^2 - 4x + 4 = 0");
  assert_eq!(result.solution_strings(), vec!["x = 2"]);
  assert!(result.has_warning(Warning::RepeatedRoot));
}

#[test]
fn negative_discriminant_in_the_reals() {
  let result = run("x^2 + 1 = 0");
  assert_eq!(result.solutions(), &Solutions::NoRealSolution);
  assert!(result.has_warning(Warning::AssumedRealDomain));
}

#[test]
fn negative_discriminant_with_complex_roots() {
  let options = SolveOptions {
    assume_real: false,
    ..SolveOptions::default()
  };
  let result = solve("x^2 + 1 = 0", &options).unwrap();
  assert_eq!(result.solution_strings(), vec!["x = -i", "x = i"]);
  assert!(!result.has_warning(Warning::AssumedRealDomain));
}

#[test]
fn rational_coefficients() {
  assert_eq!(answers("x^2/2 - 2 = 0"), vec!["x = -2", "x = 2"]);
}

#[test]
fn expanded_product_is_quadratic() {
  assert_eq!(answers("(x - 1)(x + 4) = 0"), vec!["x = -4", "x = 1"]);
}

#[test]
fn imaginary_coefficient_in_the_reals() {
  let result = run("x^2 = sqrt(-1)");
  assert_eq!(result.solutions(), &Solutions::NoRealSolution);
  assert!(result.has_warning(Warning::AssumedRealDomain));
}

#[test]
fn common_factor_of_the_variable() {
  let result = run("x^2 + xy = 0");
  assert_eq!(result.solution_strings(), vec!["x = 0", "x = -y"]);
  assert!(rules(&result).contains(&RuleTag::Factor));
  assert!(!rules(&result).contains(&RuleTag::QuadraticFormula));
  assert_eq!(result.verified(), Some(true));
}
