use super::*;

#[test]
fn two_by_two_system() {
  let result = run("x + y = 10, x - y = 2");
  assert_eq!(result.kind(), ProblemKind::SystemOfEquations);
  assert_eq!(result.solution_strings(), vec!["x = 6", "y = 4"]);
  assert_eq!(result.verified(), Some(true));
}

#[test]
fn semicolon_separated_system() {
  assert_eq!(
    answers("2x + 3y = 12; x - y = 1"),
    vec!["x = 3", "y = 2"]
  );
}

#[test]
fn three_variables() {
  assert_eq!(
    answers("x + y + z = 6, x - y = 0, y + z = 5"),
    vec!["x = 1", "y = 1", "z = 4"]
  );
}

#[test]
fn elimination_steps_are_recorded() {
  let result = run("x + y = 10, x - y = 2");
  let tags = rules(&result);
  assert_eq!(&tags[..2], &[RuleTag::Restate, RuleTag::Restate]);
  assert!(tags.contains(&RuleTag::Eliminate));
  assert!(tags.contains(&RuleTag::Normalize));
  assert_eq!(tags.iter().filter(|t| **t == RuleTag::Verify).count(), 2);
}

#[test]
fn inconsistent_system() {
  let result = run("x + y = 2; 2x + 2y = 5");
  assert_eq!(result.solutions(), &Solutions::NoSolution);
  assert!(rules(&result).contains(&RuleTag::Inconsistent));
}

#[test]
fn dependent_system_keeps_a_free_variable() {
  let result = run("x + y = 2 and 2x + 2y = 4");
  match result.solutions() {
    Solutions::InfiniteSolutions { relations, free } => {
      assert_eq!(free, &vec!["y".to_string()]);
      assert_eq!(relations.len(), 1);
      assert_eq!(relations[0].to_string(), "x = 2 - y");
    }
    other => panic!("expected infinitely many solutions, got {:?}", other),
  }
  assert!(rules(&result).contains(&RuleTag::FreeVariable));
}
