use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use mathsolve::{DomainHint, SolveOptions, classify, parse, solve};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Log solver internals to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Solve a problem and print the derivation
  Solve {
    /// The problem statement, e.g. "solve 2x + 3 = 11"
    problem: String,

    /// Only accept problems from this domain
    #[arg(short, long, value_enum)]
    domain: Option<DomainHint>,

    /// Maximum number of derivation steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Report complex roots instead of "no solution"
    #[arg(long)]
    complex: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with solver options
    #[arg(short, long, env = "MATHSOLVE_CONFIG")]
    config: Option<PathBuf>,
  },
  /// Print the problem type without solving
  Classify {
    problem: String,
  },
  /// Print the parsed form of a problem
  Parse {
    problem: String,
  },
}

fn run(command: Commands) -> Result<()> {
  match command {
    Commands::Solve {
      problem,
      domain,
      max_steps,
      complex,
      json,
      config,
    } => {
      let mut options = SolveOptions::load(config.as_deref())?;
      if let Some(domain) = domain {
        options.domain_hint = domain;
      }
      if let Some(max_steps) = max_steps {
        options.max_steps = max_steps;
      }
      if complex {
        options.assume_real = false;
      }
      debug!("options: {:?}", options);

      let result = solve(&problem, &options)
        .with_context(|| format!("Failed to solve `{}`", problem))?;
      if json {
        println!("{}", result.to_json()?);
      } else {
        print!("{result}");
      }
    }
    Commands::Classify { problem } => {
      let parsed = parse(&problem)
        .with_context(|| format!("Failed to parse `{}`", problem))?;
      println!("{}", classify(&parsed));
    }
    Commands::Parse { problem } => {
      let parsed = parse(&problem)
        .with_context(|| format!("Failed to parse `{}`", problem))?;
      println!("{parsed}");
    }
  }
  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
    .init();

  match run(cli.command) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("Error: {:#}", e);
      ExitCode::FAILURE
    }
  }
}
