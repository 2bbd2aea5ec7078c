//! Solver options and where they come from.
//!
//! Precedence, highest first: command-line flags, `MATHSOLVE_*` environment
//! variables, a JSON config file, built-in defaults.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::parser::DEFAULT_MAX_DEPTH;

pub const DEFAULT_MAX_STEPS: usize = 256;

/// Restricts which problem kinds are accepted.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DomainHint {
  Algebra,
  Geometry,
  Calculus,
  #[default]
  Auto,
}

impl std::str::FromStr for DomainHint {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "algebra" => Ok(DomainHint::Algebra),
      "geometry" => Ok(DomainHint::Geometry),
      "calculus" => Ok(DomainHint::Calculus),
      "auto" => Ok(DomainHint::Auto),
      other => Err(format!("unknown domain `{}`", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
  pub domain_hint: DomainHint,
  /// Step budget per request.
  pub max_steps: usize,
  /// Report `no_solution` instead of complex roots.
  pub assume_real: bool,
  /// Bound on nesting for parsing and recursive rewriting.
  pub max_depth: usize,
}

impl Default for SolveOptions {
  fn default() -> Self {
    SolveOptions {
      domain_hint: DomainHint::Auto,
      max_steps: DEFAULT_MAX_STEPS,
      assume_real: true,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl SolveOptions {
  /// Defaults, overlaid by `path` when given, overlaid by the environment.
  pub fn load(path: Option<&Path>) -> Result<SolveOptions> {
    let mut options = match path {
      Some(path) => SolveOptions::load_from_file(path)?,
      None => SolveOptions::default(),
    };
    options.apply_environment_variables()?;
    Ok(options)
  }

  pub fn load_from_file(path: &Path) -> Result<SolveOptions> {
    let content = fs::read_to_string(path).with_context(|| {
      format!("Failed to read config file: {}", path.display())
    })?;
    serde_json::from_str(&content).with_context(|| {
      format!("Failed to parse JSON config: {}", path.display())
    })
  }

  fn apply_environment_variables(&mut self) -> Result<()> {
    if let Ok(max_steps) = env::var("MATHSOLVE_MAX_STEPS") {
      self.max_steps = max_steps
        .trim()
        .parse()
        .with_context(|| {
          format!("Invalid MATHSOLVE_MAX_STEPS: {}", max_steps)
        })?;
    }
    if let Ok(max_depth) = env::var("MATHSOLVE_MAX_DEPTH") {
      self.max_depth = max_depth
        .trim()
        .parse()
        .with_context(|| {
          format!("Invalid MATHSOLVE_MAX_DEPTH: {}", max_depth)
        })?;
    }
    if let Ok(domain) = env::var("MATHSOLVE_DOMAIN") {
      self.domain_hint = domain.parse().map_err(anyhow::Error::msg)?;
    }
    if let Ok(assume_real) = env::var("MATHSOLVE_ASSUME_REAL") {
      if let Some(value) = parse_bool(&assume_real) {
        self.assume_real = value;
      }
    }
    Ok(())
  }
}

fn parse_bool(s: &str) -> Option<bool> {
  match s.trim().to_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Some(true),
    "0" | "false" | "no" | "off" => Some(false),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_config_keeps_defaults() {
    let options: SolveOptions =
      serde_json::from_str(r#"{ "max_steps": 10, "domain_hint": "geometry" }"#)
        .unwrap();
    assert_eq!(options.max_steps, 10);
    assert_eq!(options.domain_hint, DomainHint::Geometry);
    assert!(options.assume_real);
    assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
  }

  #[test]
  fn parses_booleans() {
    assert_eq!(parse_bool("Yes"), Some(true));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
  }
}
