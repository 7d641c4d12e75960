//! Command-line argument definitions for the callmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options select the configuration file and logging
//! verbosity; each [`Command`] reads one configuration bundle.

use clap::{Parser, Subcommand};

/// Command-line arguments for the callmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one Graphviz DOT call-flow diagram per flow group
    Flows {
        /// Path to the PBX configuration bundle (TOML)
        bundle: String,

        /// Directory the `.dot` files are written to
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Only draw the group with this name, department or extension
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Print the users reachable from each flow group
    Reach {
        /// Path to the PBX configuration bundle (TOML)
        bundle: String,

        /// Only report the group with this name, department or extension
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Print the auto-attendants routing straight to each user
    Attendants {
        /// Path to the PBX configuration bundle (TOML)
        bundle: String,
    },
}

impl Command {
    /// Path of the bundle the command reads.
    pub fn bundle(&self) -> &str {
        match self {
            Self::Flows { bundle, .. } | Self::Reach { bundle, .. } | Self::Attendants { bundle } => {
                bundle
            }
        }
    }
}
