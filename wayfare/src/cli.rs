use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use wayfare_format::ChatRole;

use crate::output::OutputFormat;

/// Command line interface for wayfare
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Wayfare: structured markup for generated travel itineraries"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Who a formatted chat message is attributed to.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
  User,
  Assistant,
}

impl From<RoleArg> for ChatRole {
  fn from(role: RoleArg) -> Self {
    match role {
      RoleArg::User => Self::User,
      RoleArg::Assistant => Self::Assistant,
    }
  }
}

/// All supported subcommands for the wayfare CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Format raw itinerary text files.
  Itinerary {
    /// Itinerary text files to format. Use `-` to read standard input.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory. A single input without one is written to standard
    /// output.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Page)]
    format: OutputFormat,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Format a chat message as a chat bubble.
  Chat {
    /// Sender of the message.
    #[arg(short, long, value_enum, default_value_t = RoleArg::Assistant)]
    role: RoleArg,

    /// Message text. Read from standard input when omitted.
    message: Option<String>,
  },

  /// Print the prompt sent to the model for a set of trip preferences.
  Prompt {
    /// Trip preferences file (TOML or JSON).
    #[arg(required_unless_present = "chat")]
    preferences: Option<PathBuf>,

    /// Print the chat prompt for this message instead.
    #[arg(long)]
    chat: Option<String>,
  },

  /// Initialize a new wayfare configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "wayfare.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export default templates to a directory for customization.
  ExportTemplates {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
