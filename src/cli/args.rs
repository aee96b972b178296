//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::EmployeeId;

/// Hierarchical organization chart with reparenting and undo/redo history
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Chart file (.json or .toml), overrides `chart_file` from config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub chart: Option<PathBuf>,

    /// Directory holding a local .orgchart.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the chart as a tree
    Show,

    /// Show an employee and everyone below them
    Find {
        /// Employee id
        id: EmployeeId,
    },

    /// Show the supervisor of an employee
    Supervisor {
        /// Employee id
        id: EmployeeId,
    },

    /// Move an employee under a new supervisor
    Move {
        /// Employee to move
        employee: EmployeeId,
        /// New supervisor
        supervisor: EmployeeId,
    },

    /// Run requests (move/undo/redo/show/find/supervisor) line by line
    Session {
        /// Script file, one request per line (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
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
}
