//! Command-line argument definitions for the cwbundle CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; global options select
//! the configuration file, override bundle paths and set logging verbosity.

use clap::{Parser, Subcommand};

use cwbundle::{Stage, archive::ConflictPolicy};

/// Command-line arguments for the cwbundle tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory the bundle files are written into
    #[arg(long, global = true)]
    pub bundle_dir: Option<String>,

    /// Zip archive the bundle files are registered in
    #[arg(long, global = true)]
    pub archive: Option<String>,

    /// What to do when an archive entry already exists (replace, keep, fail)
    #[arg(long, global = true)]
    pub on_conflict: Option<ConflictPolicy>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write bundle stages and register them in the archive
    Write {
        /// Stage to write (base, alarms, scaling, memory); repeatable
        #[arg(short, long = "stage")]
        stages: Vec<Stage>,

        /// Write every stage
        #[arg(long, conflicts_with = "stages")]
        all: bool,
    },

    /// Render the architecture diagram
    Diagram {
        /// Path to the output SVG file
        #[arg(short, long)]
        output: Option<String>,

        /// Also add the image to the archive
        #[arg(long)]
        register: bool,
    },

    /// Print the archive entries, one per line
    List,

    /// Validate every archive entry
    Verify,
}

impl Command {
    /// Stages selected by a `write` command. Without any, only `base` is written.
    pub fn selected_stages(&self) -> Vec<Stage> {
        match self {
            Self::Write { all: true, .. } => Stage::ALL.to_vec(),
            Self::Write { stages, .. } if stages.is_empty() => vec![Stage::Base],
            Self::Write { stages, .. } => stages.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_defaults_to_base() {
        let args = Args::try_parse_from(["cwbundle", "write"]).unwrap();
        assert_eq!(args.command.selected_stages(), [Stage::Base]);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_repeated_stages_keep_order() {
        let args = Args::try_parse_from(["cwbundle", "write", "--stage", "memory", "-s", "alarms"])
            .unwrap();
        assert_eq!(
            args.command.selected_stages(),
            [Stage::Memory, Stage::Alarms]
        );
    }

    #[test]
    fn test_all_conflicts_with_stage() {
        assert!(Args::try_parse_from(["cwbundle", "write", "--all", "--stage", "base"]).is_err());

        let args = Args::try_parse_from(["cwbundle", "write", "--all"]).unwrap();
        assert_eq!(args.command.selected_stages(), Stage::ALL);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "cwbundle",
            "diagram",
            "--register",
            "--on-conflict",
            "keep",
            "--archive",
            "out.zip",
        ])
        .unwrap();

        assert_eq!(args.on_conflict, Some(ConflictPolicy::Keep));
        assert_eq!(args.archive.as_deref(), Some("out.zip"));
        assert!(matches!(
            args.command,
            Command::Diagram { register: true, output: None }
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Args::try_parse_from(["cwbundle", "write", "--stage", "network"]).is_err());
        assert!(Args::try_parse_from(["cwbundle", "list", "--on-conflict", "merge"]).is_err());
    }
}
