use crate::calltree::RenderLimits;
use crate::output::read_profile;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a profile JSON file
pub fn validate_profile_file(file_path: &Path) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let report = read_profile(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported schema version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    let tree = report.to_tree().context("Call tree is malformed")?;

    if tree.total_samples() != report.total_samples {
        anyhow::bail!(
            "Root count {} does not match total_samples {}",
            tree.total_samples(),
            report.total_samples
        );
    }

    println!("✓ Valid profile JSON");
    println!("  Version: {}", report.version);
    println!("  Thread: {}", report.label);
    println!("  Interval: {}ms", report.interval_ms);
    println!("  Samples: {} ({} missed)", report.total_samples, report.missed_samples);
    println!("  Nodes: {} (depth {})", tree.node_count(), tree.max_depth());
    println!("  Hot Paths: {}", report.hot_paths.len());

    Ok(())
}

/// Print the call tree stored in a profile JSON file
pub fn render_profile_file(file_path: &Path, limits: RenderLimits) -> Result<()> {
    let report = read_profile(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report
        .to_tree()
        .context("Call tree is malformed")?
        .render(&mut out, limits)
        .context("Failed to render call tree")?;

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Toolbelt Profile Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  label: string            - Profiled thread label");
        println!("  interval_ms: number      - Sampling interval");
        println!("  total_samples: number    - Samples folded into the tree");
        println!("  missed_samples: number   - Ticks with no stack captured");
        println!("  started_at: string       - Session start (RFC 3339)");
        println!("  stopped_at: string       - Session stop (RFC 3339)");
        println!("  nodes: array             - Call tree in pre-order, root first");
        println!("    class: string          - Declaring class");
        println!("    method: string         - Method name");
        println!("    count: number          - Samples observing this frame");
        println!("    parent: number?        - Index of the caller; absent on the root");
        println!("  hot_paths: array         - Hottest call paths");
        println!("    stack: string          - Collapsed stack");
        println!("    samples: number        - Self samples of the path");
        println!("    percentage: number     - Percentage of all samples");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Toolbelt v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Sampling call-tree profiler and utility helpers.");
}
