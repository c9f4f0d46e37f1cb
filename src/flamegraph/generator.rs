//! SVG flamegraph generation via inferno, plus a plain-text hot path summary.

use crate::calltree::CollapsedStack;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Sampled Call Tree".to_string(),
            width: 1200,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate an SVG flamegraph from collapsed stacks
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - nothing to draw
/// * `FlamegraphError::GenerationFailed` - inferno rejected the input
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();

    let mut options = Options::default();
    options.title = config.title;
    options.count_name = "samples".to_string();
    options.image_width = Some(config.width);

    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::GenerationFailed(e.to_string()))?;

    let svg = String::from_utf8_lossy(&svg).into_owned();
    info!("Flamegraph generated successfully ({} bytes)", svg.len());

    Ok(svg)
}

/// Text table of the hottest paths with a bar per path
pub fn generate_text_summary(
    stacks: &[CollapsedStack],
    max_lines: usize,
    total_samples: u64,
) -> String {
    let mut lines = Vec::new();
    let total = total_samples.max(1);

    lines.push("  HOT PATHS".to_string());
    lines.push(format!("  {}", "-".repeat(74)));
    lines.push(format!(
        "  {:<50} {:>12} {:>8}",
        "Call Path (Hottest First)", "SAMPLES", "%"
    ));
    lines.push(format!("  {}", "-".repeat(74)));

    for stack in stacks.iter().take(max_lines) {
        let percentage = (stack.weight as f64 / total as f64) * 100.0;

        // Keep the innermost end of long paths visible
        let display_stack = if stack.stack.chars().count() > 50 {
            let tail: String = {
                let chars: Vec<char> = stack.stack.chars().collect();
                chars[chars.len() - 47..].iter().collect()
            };
            format!("...{}", tail)
        } else {
            stack.stack.clone()
        };

        lines.push(format!(
            "  {:<50} {:>12} {:>7.1}%",
            display_stack, stack.weight, percentage
        ));
    }
    lines.push(format!("  {}", "-".repeat(74)));

    lines.push(String::new());
    for stack in stacks.iter().take(5) {
        let percentage = (stack.weight as f64 / total as f64) * 100.0;
        let bar = "#".repeat((percentage / 2.0) as usize);
        lines.push(format!("  {:<30} {:<50} {:>5.1}%", stack.leaf(), bar, percentage));
    }

    if stacks.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} unique paths)",
            max_lines,
            stacks.len()
        ));
    }

    lines.join("\n")
}
