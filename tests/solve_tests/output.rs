use super::*;
use serde_json::Value;

fn json(problem: &str, options: &SolveOptions) -> Value {
  let result = solve(problem, options).unwrap();
  serde_json::from_str(&result.to_json().unwrap()).unwrap()
}

mod json_output {
  use super::*;

  #[test]
  fn linear_solution() {
    let v = json("2x + 3 = 11", &SolveOptions::default());
    assert_eq!(v["kind"], "linear_equation");
    assert_eq!(v["solutions"][0]["variable"], "x");
    assert_eq!(v["solutions"][0]["value"], "4");
    assert_eq!(v["verified"], true);
    assert_eq!(v["steps"][0]["rule"], "restate");
    assert_eq!(v["steps"][0]["order"], 1);
    assert_eq!(v["steps"][0]["expression"], "2x + 3 = 11");
    assert!(!v["hints"].as_array().unwrap().is_empty());
  }

  #[test]
  fn no_real_solution_is_no_solution() {
    let v = json("x^2 + 4 = 0", &SolveOptions::default());
    assert_eq!(v["solutions"], "no_solution");
    assert_eq!(v["warnings"][0], "assumed_real_domain");
    assert_eq!(v["verified"], Value::Null);
  }

  #[test]
  fn infinite_solutions_carry_relations() {
    let v = json("x + y = 2 and 2x + 2y = 4", &SolveOptions::default());
    assert_eq!(v["solutions"], "infinite_solutions");
    assert_eq!(v["relations"][0]["value"], "2 - y");
  }
}

mod text_output {
  use super::*;

  #[test]
  fn display_lists_steps_and_solution() {
    let text = run("2x + 3 = 11").to_string();
    assert!(text.starts_with("Problem type: linear equation\n"));
    assert!(text.contains("Steps:\n  1. Restate the equation: 2x + 3 = 11\n"));
    assert!(text.contains("Solution: x = 4\n"));
    assert!(text.contains("Verified: yes\n"));
    assert!(text.contains("Hints:\n"));
  }

  #[test]
  fn display_of_no_solution() {
    let text = run("x + 1 = x + 2").to_string();
    assert!(text.contains("Result: no solution\n"));
  }
}

mod limits {
  use super::*;

  #[test]
  fn step_budget_is_enforced() {
    let options = SolveOptions {
      max_steps: 3,
      ..SolveOptions::default()
    };
    let err = solve("2x + 3 = 11", &options).unwrap_err();
    assert!(matches!(
      err,
      SolveError::ComplexityLimitExceeded { steps: 3 }
    ));
  }

  #[test]
  fn deep_nesting_is_rejected() {
    let options = SolveOptions {
      max_depth: 8,
      ..SolveOptions::default()
    };
    let problem = format!("{}x{} = 1", "(".repeat(20), ")".repeat(20));
    let err = solve(&problem, &options).unwrap_err();
    assert!(matches!(err, SolveError::ComplexityLimitExceeded { .. }));
  }

  #[test]
  fn malformed_input_is_a_parse_error() {
    let err = solve("2x + = 11", &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, SolveError::ParseError(_)));
  }
}
