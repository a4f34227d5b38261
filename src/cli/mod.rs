//! CLI argument parsing for difflint.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::linters::{Language, Style};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// difflint: run linters over a repository and report only what changed.
///
/// Messages on lines that a diff against a reference revision did not touch
/// are suppressed, so pre-existing problems do not fail a change.
#[derive(Parser, Debug)]
#[command(name = "difflint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log debugging details (git invocations, selections) to stderr.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands for difflint.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured linters.
    ///
    /// With `--refspec`, only messages on lines changed since that revision
    /// are reported; otherwise every message is reported.
    Check(CheckArgs),

    /// List the linters difflint supports.
    Linters,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Linter ids to run (default: all configured linters).
    pub linters: Vec<String>,

    /// Revision to diff against; only changed lines are reported.
    #[arg(short, long)]
    pub refspec: Option<String>,

    /// Revision to compare with instead of the working tree.
    #[arg(long, requires = "refspec")]
    pub new_ref: Option<String>,

    /// Report every message even when a refspec is given.
    #[arg(long)]
    pub full: bool,

    /// Number of linters to run in parallel, or "auto".
    #[arg(short = 'n', long)]
    pub jobs: Option<String>,

    /// Only run linters for this language.
    #[arg(long, value_enum)]
    pub language: Option<Language>,

    /// Only run static or dynamic linters.
    #[arg(long, value_enum)]
    pub style: Option<Style>,

    /// Run part N of M of the selected linters, e.g. 2/3.
    #[arg(short, long)]
    pub part: Option<String>,

    /// Config file (default: .difflint.yml at the repository root).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_check_minimal() {
        let cli = Cli::try_parse_from(["difflint", "check"]).unwrap();
        if let Command::Check(args) = cli.command {
            assert!(args.linters.is_empty());
            assert_eq!(args.refspec, None);
            assert!(!args.full);
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("Expected Check command");
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_check_full() {
        let cli = Cli::try_parse_from([
            "difflint",
            "check",
            "-r",
            "origin/main",
            "--new-ref",
            "HEAD",
            "-n",
            "auto",
            "--language",
            "python",
            "--style",
            "static",
            "-p",
            "2/3",
            "-c",
            "ci/difflint.yml",
            "--format",
            "json",
            "flake8",
            "pylint",
            "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
        if let Command::Check(args) = cli.command {
            assert_eq!(args.refspec.as_deref(), Some("origin/main"));
            assert_eq!(args.new_ref.as_deref(), Some("HEAD"));
            assert_eq!(args.jobs.as_deref(), Some("auto"));
            assert_eq!(args.language, Some(Language::Python));
            assert_eq!(args.style, Some(Style::Static));
            assert_eq!(args.part.as_deref(), Some("2/3"));
            assert_eq!(args.config, Some(PathBuf::from("ci/difflint.yml")));
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.linters, vec!["flake8", "pylint"]);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn parse_new_ref_requires_refspec() {
        assert!(Cli::try_parse_from(["difflint", "check", "--new-ref", "HEAD"]).is_err());
    }

    #[test]
    fn parse_unknown_language_fails() {
        assert!(Cli::try_parse_from(["difflint", "check", "--language", "cobol"]).is_err());
    }

    #[test]
    fn parse_linters() {
        let cli = Cli::try_parse_from(["difflint", "-v", "linters"]).unwrap();
        assert!(matches!(cli.command, Command::Linters));
        assert!(cli.verbose);
    }
}
