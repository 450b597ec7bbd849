//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// tgo - Go templates with tags, attributes and template literals
#[derive(Parser, Debug, Clone)]
#[command(name = "tgo")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Workspace directory, where tgo.json is looked up
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Re-run whenever a .tgo file changes
    #[arg(long, global = true)]
    pub watch: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Show timing information
    #[arg(long, global = true)]
    pub timings: bool,

    /// Maximum number of errors to show
    #[arg(long, global = true)]
    pub max_errors: Option<usize>,

    /// Ignore patterns (glob)
    #[arg(long, global = true)]
    pub ignore: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse and analyze .tgo files
    Check {
        /// Files or directories, the workspace when empty
        paths: Vec<PathBuf>,
    },
    /// Check .tgo files and write the generated Go for every clean one
    Build {
        /// Files or directories, the workspace when empty
        paths: Vec<PathBuf>,

        /// Directory for generated files instead of next to their sources
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the Go generated from a single file
    Print {
        file: PathBuf,
    },
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rendered reports with source snippets
    #[default]
    Human,
    /// One JSON object per line
    Json,
    /// `file:line:col:code:message` lines
    Machine,
}

impl Args {
    /// The `--out-dir` of a build.
    pub fn out_dir(&self) -> Option<&Path> {
        match &self.command {
            Command::Build { out_dir, .. } => out_dir.as_deref(),
            _ => None,
        }
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "tgo=debug"
        } else {
            "tgo=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "tgo", "build", "views", "--out-dir", "gen", "--output", "json", "--verbose",
        ]);
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.out_dir(), Some(Path::new("gen")));
        assert_eq!(args.default_log_filter(), "tgo=debug");
        let Command::Build { paths, .. } = &args.command else {
            panic!("expected build");
        };
        assert_eq!(paths, &vec![PathBuf::from("views")]);
    }

    #[test]
    fn test_check_defaults() {
        let args = Args::parse_from(["tgo", "check"]);
        assert_eq!(args.output, OutputFormat::Human);
        assert_eq!(args.out_dir(), None);
        assert_eq!(args.default_log_filter(), "tgo=info");
        assert!(args.ignore.is_empty());
    }
}
