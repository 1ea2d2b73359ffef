//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Name-matching auto-binder: wires scene nodes, components and assets into script fields
#[derive(Parser, Debug)]
#[command(name = "autobind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind all scripts of a scene and show the result
    Bind {
        /// Scene document
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
        /// Asset directory (default: from settings)
        #[arg(long, value_hint = ValueHint::DirPath)]
        assets: Option<PathBuf>,
        /// Write bound values back into the scene document
        #[arg(short, long)]
        write: bool,
    },

    /// Run the save hook: bind, write the scene, echo the saved paths
    Save {
        /// Scene document
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
        /// Asset directory (default: from settings)
        #[arg(long, value_hint = ValueHint::DirPath)]
        assets: Option<PathBuf>,
        /// Paths being saved, passed through unchanged
        paths: Vec<String>,
    },

    /// Show how the fields of each bindable type are classified
    Plan {
        /// Scene document
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
        /// Only this type
        #[arg(short, long = "type")]
        type_name: Option<String>,
    },

    /// Show the scene hierarchy as tree
    Tree {
        /// Scene document
        #[arg(value_hint = ValueHint::FilePath)]
        scene: PathBuf,
    },

    /// List the asset index
    Assets {
        /// Asset directory (default: from settings)
        #[arg(long, value_hint = ValueHint::DirPath)]
        assets: Option<PathBuf>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
