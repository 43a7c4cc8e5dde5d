//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Sobind CLI - load the example shared library and call into it
///
/// Resolves the library at runtime, verifies its interface descriptor
/// against the one this binary was built with, then invokes its exported
/// operations.
#[derive(Parser, Debug)]
#[command(
    name = "sobind",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SOBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the shared library (overrides configuration and search paths)
    #[arg(short, long, global = true, env = "SOBIND_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Output format for results [default: from config, else human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every operation once, the way the bundled demos do
    Demo,

    /// Compute n!
    Factorial(FactorialArgs),

    /// Greet someone
    Greet(GreetArgs),

    /// Repeat a string
    Repeat(RepeatArgs),

    /// Have the library shout a message on stdout
    Shout(ShoutArgs),

    /// Flip the library's coin
    Maybe(MaybeArgs),

    /// Sort a JSON array of numbers
    Sort(SortArgs),

    /// Show the library's interface descriptor and whether it is compatible
    Interface,

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the factorial command
#[derive(Parser, Debug)]
pub struct FactorialArgs {
    /// Non-negative integer, at most 20
    #[arg(allow_negative_numbers = true)]
    pub n: i64,
}

/// Arguments for the greet command
#[derive(Parser, Debug)]
pub struct GreetArgs {
    /// Name to greet
    #[arg(default_value = "World")]
    pub name: String,
}

/// Arguments for the repeat command
#[derive(Parser, Debug)]
pub struct RepeatArgs {
    /// Text to repeat
    pub text: String,

    /// Number of repetitions; zero or less gives an empty string
    #[arg(allow_negative_numbers = true)]
    pub count: i64,
}

/// Arguments for the shout command
#[derive(Parser, Debug)]
pub struct ShoutArgs {
    /// Message to shout
    pub message: String,
}

/// Arguments for the maybe command
#[derive(Parser, Debug)]
pub struct MaybeArgs {
    /// Seed the library's generator for a reproducible sequence
    #[arg(long, env = "SOBIND_SEED")]
    pub seed: Option<u64>,

    /// Reseed from OS entropy, overriding any configured or given seed
    #[arg(long)]
    pub entropy: bool,

    /// Number of flips
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub times: u32,
}

/// Arguments for the sort command
#[derive(Parser, Debug)]
pub struct SortArgs {
    /// JSON array of numbers, e.g. '[3,1,2]'
    #[arg(value_name = "JSON")]
    pub json: String,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl OutputFormat {
    /// Parse a format name from a configuration file
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
