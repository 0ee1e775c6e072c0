use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::{
    CommandContext, coverage_command, enums_command, generate_command, list_command,
    snapshot_command,
};

/// Introspection-driven libvips binding generator
#[derive(Parser, Debug)]
#[command(name = "vipsgen")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug          Enable debug logging\n    VIPSGEN_CONFIG=<FILE>   Config file to use")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the registry comes from and which config applies
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Read the registry from a JSON snapshot instead of libvips
    #[arg(short, long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Native introspection library (defaults to the platform name of vipsgen_introspect)
    #[arg(short, long, global = true, value_name = "PATH", conflicts_with = "registry")]
    pub library: Option<PathBuf>,

    /// Config file (defaults to the nearest vipsgen.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered operations and their arguments
    #[command(visible_alias = "ls")]
    List {
        /// Only show this category (e.g. arithmetic, resample)
        #[arg(long)]
        category: Option<String>,
    },
    /// List enum types referenced by operations
    Enums,
    /// Show generated vs excluded operations per category
    Coverage,
    /// Generate the C shim and Go bridge
    #[command(visible_alias = "gen")]
    Generate {
        /// Output directory (overrides generator.output_dir)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Capture the registry and referenced enums as JSON
    Snapshot {
        /// File to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        let ctx = CommandContext::from_args(&self.global)?;

        match self.command {
            Commands::List { category } => list_command(&ctx, category.as_deref()),
            Commands::Enums => enums_command(&ctx),
            Commands::Coverage => coverage_command(&ctx),
            Commands::Generate { output } => generate_command(&ctx, output.as_deref()),
            Commands::Snapshot { output } => snapshot_command(&ctx, &output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vipsgen", "list", "--category", "arithmetic", "--registry", "r.json"]).unwrap();
        assert_eq!(cli.global.registry, Some(PathBuf::from("r.json")));
        match cli.command {
            Commands::List { category } => assert_eq!(category.as_deref(), Some("arithmetic")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_registry_and_library_conflict() {
        let result = Cli::try_parse_from(["vipsgen", "-r", "r.json", "-l", "lib.so", "coverage"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_requires_output() {
        assert!(Cli::try_parse_from(["vipsgen", "snapshot"]).is_err());
    }
}
