use super::*;

fn value(problem: &str) -> String {
  let result = run(problem);
  result.solutions().bindings()[0].value().to_string()
}

mod differentiate {
  use super::*;

  #[test]
  fn power_rule() {
    let result = run("d/dx(x^3)");
    assert_eq!(result.kind(), ProblemKind::Differentiation);
    assert_eq!(result.solution_strings(), vec!["f'(x) = 3x^2"]);
    assert!(rules(&result).contains(&RuleTag::PowerRule));
  }

  #[test]
  fn sum_of_terms() {
    let result = run("derivative of x^3 + 2x");
    assert_eq!(value("derivative of x^3 + 2x"), "3x^2 + 2");
    assert!(rules(&result).contains(&RuleTag::SumRule));
  }

  #[test]
  fn constant_derivative() {
    let result = run("d/dx(5)");
    assert_eq!(value("d/dx(5)"), "0");
    assert!(rules(&result).contains(&RuleTag::ConstantRule));
  }

  #[test]
  fn sine() {
    let result = run("d/dx(sin(x))");
    assert_eq!(result.solution_strings(), vec!["f'(x) = cos(x)"]);
    assert!(rules(&result).contains(&RuleTag::TrigonometricRule));
  }

  #[test]
  fn chain_rule() {
    let result = run("d/dx(sin(2x))");
    assert_eq!(value("d/dx(sin(2x))"), "2cos(2x)");
    assert!(rules(&result).contains(&RuleTag::ChainRule));
  }

  #[test]
  fn exponential() {
    assert_eq!(value("d/dx(e^x)"), "e^x");
  }

  #[test]
  fn natural_log() {
    let result = run("d/dx(ln(x))");
    assert_eq!(value("d/dx(ln(x))"), "1/x");
    assert!(rules(&result).contains(&RuleTag::LogarithmicRule));
  }

  #[test]
  fn product_rule() {
    let result = run("d/dx(x sin(x))");
    assert!(rules(&result).contains(&RuleTag::ProductRule));
    assert_eq!(value("d/dx(x sin(x))"), "x*cos(x) + sin(x)");
  }

  #[test]
  fn marker_without_parentheses() {
    assert_eq!(value("d/dx x^2"), "2x");
  }

  #[test]
  fn other_variable() {
    assert_eq!(answers("d/dt(t^2)"), vec!["f'(t) = 2t"]);
  }

  #[test]
  fn every_step_shows_a_derivative() {
    let result = run("d/dx(x^2 + 3x)");
    assert_eq!(result.steps()[0].rule(), RuleTag::Restate);
    assert_eq!(result.steps()[0].expression().to_string(), "d/dx(x^2 + 3x)");
    let last = result.steps().last().unwrap();
    assert_eq!(last.rule(), RuleTag::SumRule);
    assert_eq!(last.expression().to_string(), "d/dx(x^2 + 3x) = 2x + 3");
  }

  #[test]
  fn root_of_square_is_not_the_variable() {
    let derivative = value("d/dx(sqrt(x^2))");
    assert_ne!(derivative, "1");
    assert!(derivative.contains("x^2"), "{}", derivative);
  }

  fn sum_of_squares(terms: usize) -> String {
    format!("d/dx({})", vec!["x^2"; terms].join(" + "))
  }

  /// Solves on a thread with the default 2 MiB stack.
  fn on_default_stack(problem: String) -> Result<SolveResult, SolveError> {
    std::thread::Builder::new()
      .stack_size(2 * 1024 * 1024)
      .spawn(move || solve(&problem, &SolveOptions::default()))
      .unwrap()
      .join()
      .unwrap()
  }

  #[test]
  fn long_sum_stays_on_a_small_stack() {
    let result = on_default_stack(sum_of_squares(100)).unwrap();
    assert_eq!(
      result.solutions().bindings()[0].value().to_string(),
      "200x"
    );
    assert!(rules(&result).contains(&RuleTag::SumRule));
  }

  #[test]
  fn longer_sum_runs_out_of_steps() {
    let err = on_default_stack(sum_of_squares(128)).unwrap_err();
    assert!(matches!(err, SolveError::ComplexityLimitExceeded { .. }));
  }

  #[test]
  fn pure_difference() {
    let result = run("d/dx(x^3 - x^2 - x)");
    assert_eq!(value("d/dx(x^3 - x^2 - x)"), "3x^2 - 2x - 1");
    let last = result.steps().last().unwrap();
    assert_eq!(last.rule(), RuleTag::DifferenceRule);
  }
}

mod integrate {
  use super::*;

  #[test]
  fn power_integral() {
    let result = run("integrate x^2 dx");
    assert_eq!(result.kind(), ProblemKind::Integration);
    assert_eq!(result.solution_strings(), vec!["F(x) = x^3/3 + C"]);
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn term_by_term() {
    let result = run("∫ 2x + 3 dx");
    assert_eq!(value("∫ 2x + 3 dx"), "x^2 + 3x + C");
    let tags = rules(&result);
    assert!(tags.contains(&RuleTag::Linearity));
    assert!(tags.contains(&RuleTag::PowerIntegral));
    assert!(tags.contains(&RuleTag::ConstantIntegral));
    assert_eq!(tags.last(), Some(&RuleTag::IntegrationConstant));
  }

  #[test]
  fn parenthesized_integrand() {
    assert_eq!(value("∫(4x^3)dx"), "x^4 + C");
  }

  #[test]
  fn cosine() {
    assert_eq!(value("integrate cos(x) dx"), "sin(x) + C");
  }

  #[test]
  fn sine() {
    let result = run("integrate sin(x) dx");
    assert_eq!(value("integrate sin(x) dx"), "-cos(x) + C");
    assert!(rules(&result).contains(&RuleTag::TrigonometricIntegral));
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn reciprocal() {
    let result = run("integrate 1/x dx");
    assert_eq!(value("integrate 1/x dx"), "ln(x) + C");
    assert!(result.has_warning(Warning::AssumedPositiveArgument));
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn exponential_with_linear_argument() {
    let result = run("integrate e^(2x) dx");
    assert_eq!(value("integrate e^(2x) dx"), "e^(2x)/2 + C");
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn square_root() {
    assert_eq!(value("integrate sqrt(x) dx"), "2x^(3/2)/3 + C");
  }

  #[test]
  fn bare_differential_integrates_one() {
    let result = run("∫ dx");
    assert_eq!(result.solution_strings(), vec!["F(x) = x + C"]);
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn root_of_square_is_unsupported() {
    let err =
      solve("integrate sqrt(x^2) dx", &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, SolveError::UnsupportedIntegralError(_)));
  }

  #[test]
  fn unsupported_integrand() {
    let err = solve("integrate x sin(x) dx", &SolveOptions::default())
      .unwrap_err();
    assert!(matches!(err, SolveError::UnsupportedIntegralError(_)));
  }
}
