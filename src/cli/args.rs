//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{GroupingAttribute, StatAttribute};

/// Census explorer for Skyrim characters: cleaned selection, hierarchy and chart data
#[derive(Parser, Debug)]
#[command(name = "skyrim-atlas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Character dataset, overrides the configured data_path
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Directory holding .skyrim-atlas.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Keep Stonehills and Shor's Stone as settlements
    #[arg(long, global = true)]
    pub include_unconfirmed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List selected characters
    Select {
        /// Print characters as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the census hierarchy with aggregates
    Tree {
        #[command(flatten)]
        dims: Dimensions,

        /// Node to start from, e.g. "Whiterun/Nord"
        #[arg(long)]
        focus: Option<String>,
    },

    /// Show bar chart data for a focus node
    Bars {
        #[command(flatten)]
        dims: Dimensions,

        /// Node in focus, e.g. "Whiterun" (default: root)
        #[arg(long)]
        focus: Option<String>,

        /// Print titles, colors and bars as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the hierarchy as chart JSON
    Export {
        #[command(flatten)]
        dims: Dimensions,

        /// Pretty-print
        #[arg(long)]
        pretty: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Grouping and stat dimensions; unset values come from settings.
#[derive(Args, Debug, Clone, Default)]
pub struct Dimensions {
    /// race | class | skill | aggression | morality
    #[arg(short, long)]
    pub group: Option<GroupingAttribute>,

    /// health | magicka | stamina
    #[arg(short, long)]
    pub stat: Option<StatAttribute>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}

/// Split a focus argument like "Whiterun/Nord" into node names.
pub fn parse_focus(focus: &str) -> Vec<&str> {
    focus
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
