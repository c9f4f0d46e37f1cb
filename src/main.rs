//! Toolbelt CLI
//!
//! Runs a demo workload under the sampling profiler and prints or stores
//! the resulting call tree, flamegraph and hot paths.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use toolbelt::calltree::RenderLimits;
use toolbelt::commands::{
    display_schema, display_version, execute_profile, render_profile_file, validate_args,
    validate_profile_file, ProfileArgs,
};
use toolbelt::flamegraph::FlamegraphConfig;

/// Toolbelt - sampling call-tree profiler
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Profile the built-in demo workload
    Profile {
        /// Sampling interval in milliseconds
        #[arg(short, long, default_value = "500", allow_negative_numbers = true)]
        interval_ms: i64,

        /// Label of the profiled thread
        #[arg(long, default_value = "main")]
        label: String,

        /// Pause before the workload loop, in milliseconds
        #[arg(long, default_value = "400")]
        sleep_ms: u64,

        /// Iterations of the workload loop
        #[arg(long, default_value = "2000")]
        iterations: u64,

        /// Maximum number of call tree nodes to print
        #[arg(long, default_value = "50")]
        max_nodes: usize,

        /// Maximum call tree depth to print (0 = root only)
        #[arg(long, default_value = "16")]
        max_depth: usize,

        /// Output path for JSON profile
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for SVG flamegraph
        #[arg(short, long, default_missing_value = "flamegraph.svg", num_args = 0..=1)]
        flamegraph: Option<PathBuf>,

        /// Number of top hot paths to include
        #[arg(long, default_value = "20")]
        top_paths: usize,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print hot path summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Print the call tree stored in a profile JSON file
    Render {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of nodes to print
        #[arg(long, default_value = "50")]
        max_nodes: usize,

        /// Maximum depth to print (0 = root only)
        #[arg(long, default_value = "16")]
        max_depth: usize,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Profile {
            interval_ms,
            label,
            sleep_ms,
            iterations,
            max_nodes,
            max_depth,
            output,
            flamegraph,
            top_paths,
            title,
            width,
            summary,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = ProfileArgs {
                interval_ms,
                label,
                sleep_ms,
                iterations,
                render_limits: RenderLimits::new(max_nodes, max_depth),
                output_json: output,
                output_svg: flamegraph,
                top_paths,
                flamegraph_config: fg_config,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_profile(args)?;
        }

        Commands::Render {
            file,
            max_nodes,
            max_depth,
        } => {
            render_profile_file(&file, RenderLimits::new(max_nodes, max_depth))?;
        }

        Commands::Validate { file } => {
            validate_profile_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
