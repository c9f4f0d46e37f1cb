//! Profile command implementation.
//!
//! The profile command:
//! 1. Runs the demo workload under the sampler
//! 2. Renders the call tree
//! 3. Builds collapsed stacks and hot paths
//! 4. Generates a flamegraph
//! 5. Writes output files

use super::models::ProfileArgs;
use super::workload::DemoWorkload;
use crate::calltree::{
    build_collapsed_stacks, calculate_hot_paths, calculate_sample_distribution, CallTree,
};
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::output::{write_profile, write_svg, ProfileReport};
use crate::sampler::Sampler;
use crate::utils::config::MAX_TOP_PATHS;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::time::{Duration, Instant};

/// Execute the profile command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The frozen call tree of the run
///
/// # Errors
/// * Invalid sampler or render settings
/// * Flamegraph generation failures
/// * File write errors
pub fn execute_profile(args: ProfileArgs) -> Result<CallTree> {
    let start_time = Instant::now();

    info!(
        "Profiling demo workload (pause {}ms, {} iterations)",
        args.sleep_ms, args.iterations
    );

    // Step 1: Run the workload under the sampler
    info!("Step 1/5: Sampling every {}ms...", args.interval_ms);
    let mut sampler = Sampler::new(args.interval_ms).context("Failed to create sampler")?;
    let workload = DemoWorkload::new(Duration::from_millis(args.sleep_ms), args.iterations);

    let (checksum, tree) = sampler
        .profile(&args.label, || workload.run())
        .context("Sampling session failed")?;

    debug!("Workload checksum: {:#x}", checksum);

    if tree.is_empty() {
        warn!(
            "No samples taken; the workload finished before the first {}ms tick",
            args.interval_ms
        );
    }

    // Step 2: Render the call tree
    info!("Step 2/5: Rendering call tree...");
    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        tree.render(&mut out, args.render_limits)
            .context("Failed to render call tree")?;
        out.flush().context("Failed to flush stdout")?;
    }

    // Step 3: Build collapsed stacks and hot paths
    info!("Step 3/5: Building collapsed stacks...");
    let stacks = build_collapsed_stacks(&tree);

    let distribution = calculate_sample_distribution(&stacks);
    info!("Sample distribution: {}", distribution.summary());
    if distribution.is_highly_concentrated() {
        info!("Most samples land in a few stacks; start with the top hot paths");
    }

    let hot_paths = calculate_hot_paths(&stacks, tree.total_samples(), args.top_paths);

    // Step 4: Generate flamegraph (if requested)
    let svg_content = match &args.output_svg {
        Some(_) if stacks.is_empty() => {
            warn!("Step 4/5: Skipping flamegraph (no samples below the root)");
            None
        }
        Some(_) => {
            info!("Step 4/5: Generating flamegraph...");
            let svg = generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
                .context("Failed to generate flamegraph")?;
            Some(svg)
        }
        None => {
            info!("Step 4/5: Skipping flamegraph generation (not requested)");
            None
        }
    };

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");

    if let Some(json_path) = &args.output_json {
        let report = ProfileReport::from_tree(&tree, hot_paths);
        write_profile(&report, json_path).context("Failed to write profile JSON")?;
        info!("✓ Profile written to: {}", json_path.display());
    }

    if let (Some(svg), Some(svg_path)) = (svg_content, &args.output_svg) {
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Thread:        {}", tree.label());
        println!("Interval:      {}ms", tree.interval().as_millis());
        println!("Samples:       {}", tree.total_samples());
        println!("Missed:        {}", tree.missed_samples());
        println!("Unique Stacks: {}", stacks.len());
        println!(
            "\n{}",
            generate_text_summary(&stacks, 10, tree.total_samples())
        );
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Profile completed in {:.2}s", elapsed.as_secs_f64());

    Ok(tree)
}

/// Validate profile arguments
///
/// **Public** - can be called before execute_profile for early validation
pub fn validate_args(args: &ProfileArgs) -> Result<()> {
    if args.interval_ms <= 0 {
        anyhow::bail!("interval must be positive (got {}ms)", args.interval_ms);
    }

    if args.label.trim().is_empty() {
        anyhow::bail!("thread label cannot be empty");
    }

    if args.render_limits.max_nodes == 0 {
        anyhow::bail!("max_nodes must be greater than 0");
    }

    if args.top_paths == 0 {
        anyhow::bail!("top_paths must be greater than 0");
    }

    if args.top_paths > MAX_TOP_PATHS {
        anyhow::bail!("top_paths is too large (max {})", MAX_TOP_PATHS);
    }

    Ok(())
}
