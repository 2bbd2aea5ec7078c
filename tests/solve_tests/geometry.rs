use super::*;

mod formulas {
  use super::*;

  #[test]
  fn area_of_circle_keeps_pi_symbolic() {
    let result = run("area of a circle with radius = 3");
    assert_eq!(result.kind(), ProblemKind::GeometryQuery);
    assert_eq!(result.solution_strings(), vec!["A = 9π"]);
    assert_eq!(result.verified(), Some(true));
  }

  #[test]
  fn formula_substitute_evaluate() {
    let result = run("area of a circle with radius = 3");
    assert_eq!(
      rules(&result),
      vec![RuleTag::Formula, RuleTag::Substitute, RuleTag::Evaluate]
    );
    assert_eq!(result.steps()[0].expression().to_string(), "A = π*r^2");
    assert!(result.steps()[2].description().contains("28.274334"));
  }

  #[test]
  fn shape_first_phrasing() {
    assert_eq!(answers("circle area, r=3"), vec!["A = 9π"]);
  }

  #[test]
  fn rectangle_area() {
    assert_eq!(
      answers("area of a rectangle with length = 4 and width = 5"),
      vec!["A = 20"]
    );
  }

  #[test]
  fn rectangle_perimeter() {
    assert_eq!(
      answers("perimeter of a rectangle, l = 4, w = 2.5"),
      vec!["P = 13"]
    );
  }

  #[test]
  fn diameter_is_halved() {
    assert_eq!(
      answers("circumference of a circle with diameter = 10"),
      vec!["C = 10π"]
    );
  }

  #[test]
  fn sphere_volume() {
    assert_eq!(answers("volume of a sphere with r = 3"), vec!["V = 36π"]);
  }

  #[test]
  fn cube_surface_area() {
    assert_eq!(answers("surface area of a cube with side = 2"), vec!["S = 24"]);
  }

  #[test]
  fn triangle_area() {
    assert_eq!(
      answers("area of a triangle with base = 6 and height = 5"),
      vec!["A = 15"]
    );
  }

  #[test]
  fn distance_between_points() {
    let result = run("distance between (0, 0) and (3, 4)");
    assert_eq!(result.solution_strings(), vec!["d = 5"]);
  }

  #[test]
  fn distance_with_a_radical() {
    assert_eq!(answers("distance from (1, 1) to (3, 3)"), vec!["d = 2√2"]);
  }
}

mod invalid {
  use super::*;

  #[test]
  fn missing_parameter() {
    let err =
      solve("area of a rectangle with length = 4", &SolveOptions::default())
        .unwrap_err();
    match err {
      SolveError::MissingParameterError { parameter, .. } => {
        assert_eq!(parameter, "w")
      }
      other => panic!("unexpected error {:?}", other),
    }
  }

  #[test]
  fn negative_length() {
    let err =
      solve("area of a circle with radius = -2", &SolveOptions::default())
        .unwrap_err();
    assert!(matches!(err, SolveError::InvalidParameterError { .. }));
  }

  #[test]
  fn impossible_triangle() {
    let err = solve(
      "perimeter of a triangle with a = 1, b = 2, c = 10",
      &SolveOptions::default(),
    )
    .unwrap_err();
    match err {
      SolveError::InvalidParameterError { parameter, .. } => {
        assert_eq!(parameter, "c")
      }
      other => panic!("unexpected error {:?}", other),
    }
  }

  #[test]
  fn extra_parameter_is_ignored() {
    let result = run("area of a circle with radius = 2 and height = 5");
    assert_eq!(result.solution_strings(), vec!["A = 4π"]);
    assert!(result.has_warning(Warning::IgnoredParameter));
  }
}
