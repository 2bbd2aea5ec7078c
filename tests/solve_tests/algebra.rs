use super::*;

mod linear {
  use super::*;

  #[test]
  fn solve_two_step_equation() {
    let result = run("solve 2x + 3 = 11");
    assert_eq!(result.kind(), ProblemKind::LinearEquation);
    assert_eq!(result.solution_strings(), vec!["x = 4"]);
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn steps_follow_the_isolation_order() {
    let result = run("2x + 3 = 11");
    assert_eq!(
      rules(&result),
      vec![
        RuleTag::Restate,
        RuleTag::MoveTerms,
        RuleTag::CombineLikeTerms,
        RuleTag::IsolateTerm,
        RuleTag::DivideCoefficient,
        RuleTag::Verify,
      ]
    );
    let orders: Vec<usize> = result.steps().iter().map(|s| s.order()).collect();
    assert_eq!(orders, (1..=6).collect::<Vec<_>>());
  }

  #[test]
  fn unit_coefficient_skips_division() {
    let result = run("3(x - 2) = 2x + 1");
    assert_eq!(result.solution_strings(), vec!["x = 7"]);
    assert!(!rules(&result).contains(&RuleTag::DivideCoefficient));
  }

  #[test]
  fn fractional_coefficient() {
    assert_eq!(answers("x/2 = 3"), vec!["x = 6"]);
  }

  #[test]
  fn rational_answer_stays_exact() {
    assert_eq!(answers("2x = 3"), vec!["x = 3/2"]);
    assert_eq!(answers("4x + 6 = 0"), vec!["x = -3/2"]);
  }

  #[test]
  fn decimal_input_is_read_exactly() {
    assert_eq!(answers("0.5x = 2"), vec!["x = 4"]);
  }

  #[test]
  fn other_variables_stay_symbolic() {
    assert_eq!(answers("x + y = 3"), vec!["x = 3 - y"]);
  }

  #[test]
  fn symbolic_coefficient_is_assumed_nonzero() {
    let result = run("ax = 5");
    assert_eq!(result.solution_strings(), vec!["x = 5/a"]);
    assert!(result.has_warning(Warning::AssumedNonzeroCoefficient));
  }

  #[test]
  fn variable_other_than_x() {
    assert_eq!(answers("3t - 4 = 8"), vec!["t = 4"]);
  }

  #[test]
  fn overflowing_coefficient_is_flagged() {
    let result = run("10^40 x = 1");
    assert_eq!(result.solution_strings(), vec!["x = 1e-40"]);
    assert!(result.has_warning(Warning::InexactArithmetic));
    assert_ne!(result.verified(), Some(true));
  }

  #[test]
  fn tiny_power_is_not_rounded_to_zero() {
    let result = run("x = 2^(-200)");
    assert_ne!(result.solution_strings(), vec!["x = 0"]);
    assert!(result.has_warning(Warning::InexactArithmetic));
    assert_ne!(result.verified(), Some(true));
  }
}

mod real_domain {
  use super::*;

  fn complex() -> SolveOptions {
    SolveOptions {
      assume_real: false,
      ..SolveOptions::default()
    }
  }

  #[test]
  fn imaginary_value_has_no_real_solution() {
    let result = run("x = sqrt(-4)");
    assert_eq!(result.solutions(), &Solutions::NoRealSolution);
    assert!(result.has_warning(Warning::AssumedRealDomain));
  }

  #[test]
  fn imaginary_value_when_complex_answers_are_allowed() {
    let result = solve("x = sqrt(-4)", &complex()).unwrap();
    assert_eq!(result.solution_strings(), vec!["x = 2i"]);
  }

  #[test]
  fn root_of_square_is_not_the_variable() {
    let result = run("sqrt(x^2) = -3");
    assert!(result.solution_strings().is_empty());
    assert!(result.has_warning(Warning::UnsupportedProblem));
  }

  #[test]
  fn failed_substitution_rejects_the_candidate() {
    let result = run("sqrt(x)^2 = -3");
    assert!(result.solution_strings().is_empty());
    assert!(result.has_warning(Warning::RejectedCandidate));
    assert_ne!(result.verified(), Some(true));
  }

  #[test]
  fn function_name_without_parentheses_is_an_error() {
    let err = solve("sin x = 1", &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, SolveError::ParseError(_)));
  }
}

mod degenerate {
  use super::*;

  #[test]
  fn division_by_zero_is_an_error() {
    let err = solve("x = 1/0", &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, SolveError::ArithmeticError(_)));
  }

  #[test]
  fn contradiction_has_no_solution() {
    let result = run("2x + 1 = 2x + 5");
    assert_eq!(result.solutions(), &Solutions::NoSolution);
    assert!(rules(&result).contains(&RuleTag::Contradiction));
  }

  #[test]
  fn identity_has_infinitely_many_solutions() {
    let result = run("2(x + 1) = 2x + 2");
    assert!(matches!(
      result.solutions(),
      Solutions::InfiniteSolutions { .. }
    ));
    assert!(rules(&result).contains(&RuleTag::Identity));
    assert_eq!(result.verified(), Some(true));
  }
}
