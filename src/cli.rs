//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for lora-browse using the `clap` crate.
//!
//! # Commands
//!
//! - **tags**: List candidate tags and base models with active markers
//! - **filters**: Show, toggle, or clear the persisted filters of a view
//! - **open**: Open the filtered listing page in the browser
//! - **copy**: Copy LoRA prompt syntax for items of the filtered listing
//! - **config**: Show the configuration or its location
//!
//! # Examples
//!
//! ```
//! use lora_browse::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["lora-browse", "tags", "--context", "recipes"]);
//! assert!(matches!(cli.command, Commands::Tags { .. }));
//! ```

use crate::filters::{ListingContext, TagKind};
use clap::{Parser, Subcommand, ValueEnum};

/// Listing view selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextArg {
    /// LoRA models
    #[default]
    Loras,
    /// Recipes
    Recipes,
    /// Checkpoints
    Checkpoints,
}

impl From<ContextArg> for ListingContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Loras => Self::Loras,
            ContextArg::Recipes => Self::Recipes,
            ContextArg::Checkpoints => Self::Checkpoints,
        }
    }
}

/// Filter dimension selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindArg {
    /// Category tag
    #[default]
    #[value(alias = "tag")]
    Category,
    /// Base model
    #[value(name = "base-model")]
    BaseModel,
}

impl From<KindArg> for TagKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Category => Self::Category,
            KindArg::BaseModel => Self::Attribute,
        }
    }
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "lora-browse")]
#[command(about = "Filter and select models of a LoRA manager server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Server base URL (overrides config)
    #[arg(short = 's', long = "server", value_name = "URL", global = true)]
    pub server: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List candidate tags and base models
    #[command(visible_alias = "t")]
    Tags {
        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,
    },

    /// Manage the persisted filters of a view
    #[command(visible_alias = "f")]
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },

    /// Open the filtered listing page in the browser
    Open {
        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,
    },

    /// Copy LoRA syntax for items of the filtered listing
    Copy {
        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,

        /// File paths of the items to select
        #[arg(value_name = "FILE_PATH", required = true, num_args = 1..)]
        file_paths: Vec<String>,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Filter subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FilterCommands {
    /// Show the active filters
    #[command(visible_alias = "ls")]
    Show {
        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,
    },

    /// Toggle one tag or base model and reload the listing
    Toggle {
        #[arg(value_name = "TAG")]
        tag: String,

        /// Which filter dimension the value belongs to
        #[arg(short = 'k', long = "kind", value_enum, default_value = "category")]
        kind: KindArg,

        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,
    },

    /// Remove every active filter
    Clear {
        #[arg(short = 'c', long = "context", value_enum, default_value = "loras")]
        context: ContextArg,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
