//! Study hints and learning points attached to every result.

use crate::classifier::ProblemKind;

const EQUATION_HINTS: &[&str] = &[
  "Rearrange the equation into standard form before solving",
  "Whatever you do to one side, do to the other",
  "Check the solution by substituting it into the original equation",
];

const SYSTEM_HINTS: &[&str] = &[
  "Eliminate one variable at a time",
  "An equation that reduces to 0 = c with c ≠ 0 means no solution",
  "Check the solution against every equation",
];

const GEOMETRY_HINTS: &[&str] = &[
  "Identify the shape and the quantity asked for",
  "Find the formula that matches the quantity",
  "Keep the units consistent",
];

const DIFFERENTIATION_HINTS: &[&str] = &[
  "Recall the derivatives of the basic functions",
  "Apply the chain rule to composite functions",
  "Check the sign and form of the result",
];

const INTEGRATION_HINTS: &[&str] = &[
  "Split sums and pull out constant factors first",
  "Reverse the power rule: add one to the exponent and divide by it",
  "Differentiate the result to check it",
];

const ARITHMETIC_HINTS: &[&str] = &[
  "Evaluate parentheses first, then powers",
  "Multiply and divide before adding and subtracting",
];

const GENERAL_HINTS: &[&str] = &[
  "Read the problem carefully to understand what is asked",
  "List the known quantities and the unknowns",
  "Choose a suitable method or formula",
  "Work step by step to avoid mistakes",
];

fn learning_points(kind: ProblemKind) -> &'static [&'static str] {
  match kind {
    ProblemKind::LinearEquation
    | ProblemKind::QuadraticEquation
    | ProblemKind::SystemOfEquations => &[
      "Learning point: setting up algebraic equations",
      "Learning point: basic techniques for solving equations",
      "Learning point: verifying solutions",
    ],
    ProblemKind::GeometryQuery => &[
      "Learning point: properties of geometric figures",
      "Learning point: area and volume formulas",
    ],
    ProblemKind::Differentiation | ProblemKind::Integration => &[
      "Learning point: derivatives as rates of change",
      "Learning point: the fundamental theorem of calculus",
    ],
    ProblemKind::Arithmetic => &["Learning point: order of operations"],
    ProblemKind::Unsupported => &["Learning point: analysing a problem"],
  }
}

pub fn hints_for(kind: ProblemKind) -> Vec<String> {
  let hints = match kind {
    ProblemKind::LinearEquation | ProblemKind::QuadraticEquation => {
      EQUATION_HINTS
    }
    ProblemKind::SystemOfEquations => SYSTEM_HINTS,
    ProblemKind::GeometryQuery => GEOMETRY_HINTS,
    ProblemKind::Differentiation => DIFFERENTIATION_HINTS,
    ProblemKind::Integration => INTEGRATION_HINTS,
    ProblemKind::Arithmetic => ARITHMETIC_HINTS,
    ProblemKind::Unsupported => GENERAL_HINTS,
  };
  hints
    .iter()
    .chain(learning_points(kind))
    .map(|s| s.to_string())
    .collect()
}
