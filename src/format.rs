//! Assembling the final [`SolveResult`] and rendering it as text or JSON.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::classifier::ProblemKind;
use crate::hints::hints_for;
use crate::steps::SolutionStep;
use crate::syntax::Expr;

/// Conditions the caller should know about; part of the JSON contract.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
  AssumedRealDomain,
  AssumedNonzeroCoefficient,
  AssumedPositiveArgument,
  RepeatedRoot,
  DiscriminantSignUnknown,
  IgnoredParameter,
  DomainHintMismatch,
  UnsupportedProblem,
  RejectedCandidate,
  InexactArithmetic,
}

impl Warning {
  pub fn as_str(self) -> &'static str {
    match self {
      Warning::AssumedRealDomain => "assumed_real_domain",
      Warning::AssumedNonzeroCoefficient => "assumed_nonzero_coefficient",
      Warning::AssumedPositiveArgument => "assumed_positive_argument",
      Warning::RepeatedRoot => "repeated_root",
      Warning::DiscriminantSignUnknown => "discriminant_sign_unknown",
      Warning::IgnoredParameter => "ignored_parameter",
      Warning::DomainHintMismatch => "domain_hint_mismatch",
      Warning::UnsupportedProblem => "unsupported_problem",
      Warning::RejectedCandidate => "rejected_candidate",
      Warning::InexactArithmetic => "inexact_arithmetic",
    }
  }
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// `variable = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionBinding {
  variable: String,
  value: Expr,
}

impl SolutionBinding {
  pub fn new(variable: impl Into<String>, value: Expr) -> Self {
    SolutionBinding {
      variable: variable.into(),
      value,
    }
  }

  pub fn variable(&self) -> &str {
    &self.variable
  }

  pub fn value(&self) -> &Expr {
    &self.value
  }
}

impl fmt::Display for SolutionBinding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} = {}", self.variable, self.value)
  }
}

impl Serialize for SolutionBinding {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("variable", &self.variable)?;
    map.serialize_entry("value", &self.value.to_string())?;
    map.end()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Solutions {
  Bindings(Vec<SolutionBinding>),
  NoSolution,
  NoRealSolution,
  /// Pivot variables expressed through the `free` ones.
  InfiniteSolutions {
    relations: Vec<SolutionBinding>,
    free: Vec<String>,
  },
}

impl Solutions {
  pub fn bindings(&self) -> &[SolutionBinding] {
    match self {
      Solutions::Bindings(b) => b,
      _ => &[],
    }
  }

  /// Every value is free of floating-point numbers.
  pub fn is_exact(&self) -> bool {
    let values = match self {
      Solutions::Bindings(b) => b,
      Solutions::InfiniteSolutions { relations, .. } => relations,
      Solutions::NoSolution | Solutions::NoRealSolution => return true,
    };
    values.iter().all(|b| b.value().is_exact())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
  kind: ProblemKind,
  solutions: Solutions,
  steps: Vec<SolutionStep>,
  warnings: Vec<Warning>,
  verified: Option<bool>,
  hints: Vec<String>,
}

/// Build the immutable result, attaching hints for the problem kind.
pub fn format(
  kind: ProblemKind,
  solutions: Solutions,
  steps: Vec<SolutionStep>,
  warnings: BTreeSet<Warning>,
  verified: Option<bool>,
) -> SolveResult {
  SolveResult {
    kind,
    solutions,
    steps,
    warnings: warnings.into_iter().collect(),
    verified,
    hints: hints_for(kind),
  }
}

impl SolveResult {
  pub fn kind(&self) -> ProblemKind {
    self.kind
  }

  pub fn solutions(&self) -> &Solutions {
    &self.solutions
  }

  pub fn steps(&self) -> &[SolutionStep] {
    &self.steps
  }

  pub fn warnings(&self) -> &[Warning] {
    &self.warnings
  }

  pub fn has_warning(&self, warning: Warning) -> bool {
    self.warnings.contains(&warning)
  }

  /// Whether substituting the solutions back succeeded; `None` when the
  /// check was inconclusive or not applicable.
  pub fn verified(&self) -> Option<bool> {
    self.verified
  }

  pub fn hints(&self) -> &[String] {
    &self.hints
  }

  /// `variable = value` for each binding, the form most callers compare.
  pub fn solution_strings(&self) -> Vec<String> {
    match &self.solutions {
      Solutions::Bindings(b) => b.iter().map(|b| b.to_string()).collect(),
      Solutions::InfiniteSolutions { relations, .. } => {
        relations.iter().map(|b| b.to_string()).collect()
      }
      Solutions::NoSolution | Solutions::NoRealSolution => Vec::new(),
    }
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }
}

impl Serialize for SolveResult {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("kind", &self.kind)?;
    match &self.solutions {
      Solutions::Bindings(bindings) => {
        map.serialize_entry("solutions", bindings)?;
      }
      Solutions::NoSolution | Solutions::NoRealSolution => {
        map.serialize_entry("solutions", "no_solution")?;
      }
      Solutions::InfiniteSolutions { relations, .. } => {
        map.serialize_entry("solutions", "infinite_solutions")?;
        map.serialize_entry("relations", relations)?;
      }
    }
    map.serialize_entry("steps", &self.steps)?;
    map.serialize_entry("warnings", &self.warnings)?;
    map.serialize_entry("verified", &self.verified)?;
    map.serialize_entry("hints", &self.hints)?;
    map.end()
  }
}

impl fmt::Display for SolveResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Problem type: {}", self.kind.description())?;
    if !self.steps.is_empty() {
      writeln!(f, "Steps:")?;
      for step in &self.steps {
        writeln!(
          f,
          "  {}. {}: {}",
          step.order(),
          step.description(),
          step.expression()
        )?;
      }
    }
    match &self.solutions {
      Solutions::Bindings(b) if b.is_empty() => {
        writeln!(f, "Result: cannot solve this problem")?
      }
      Solutions::Bindings(b) => {
        for binding in b {
          writeln!(f, "Solution: {}", binding)?;
        }
      }
      Solutions::NoSolution => writeln!(f, "Result: no solution")?,
      Solutions::NoRealSolution => writeln!(f, "Result: no real solution")?,
      Solutions::InfiniteSolutions { relations, free } => {
        if free.is_empty() {
          writeln!(f, "Result: infinitely many solutions")?;
        } else {
          writeln!(
            f,
            "Result: infinitely many solutions, free: {}",
            free.join(", ")
          )?;
        }
        for relation in relations {
          writeln!(f, "  {}", relation)?;
        }
      }
    }
    match self.verified {
      Some(true) => writeln!(f, "Verified: yes")?,
      Some(false) => writeln!(f, "Verified: no")?,
      None => {}
    }
    if !self.warnings.is_empty() {
      let names: Vec<&str> = self.warnings.iter().map(|w| w.as_str()).collect();
      writeln!(f, "Warnings: {}", names.join(", "))?;
    }
    if !self.hints.is_empty() {
      writeln!(f, "Hints:")?;
      for hint in &self.hints {
        writeln!(f, "  - {}", hint)?;
      }
    }
    Ok(())
  }
}
