//! Calculate hot paths and sample distribution from collapsed stacks.
//!
//! Hot paths are the call paths where the most samples landed.
//! These are the primary targets for optimization.

use super::collapse::CollapsedStack;
use crate::output::schema::HotPath;
use log::debug;

/// Calculate hot paths from collapsed stacks
///
/// # Arguments
/// * `stacks` - Collapsed stacks, sorted by weight (descending)
/// * `total_samples` - Total samples of the session
/// * `top_n` - Number of top paths to return
pub fn calculate_hot_paths(
    stacks: &[CollapsedStack],
    total_samples: u64,
    top_n: usize,
) -> Vec<HotPath> {
    debug!("Calculating top {} hot paths from {} stacks", top_n, stacks.len());

    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total_samples))
        .collect()
}

/// Create a HotPath from a CollapsedStack
pub fn create_hot_path(stack: &CollapsedStack, total_samples: u64) -> HotPath {
    let percentage = if total_samples > 0 {
        (stack.weight as f64 / total_samples as f64) * 100.0
    } else {
        0.0
    };

    HotPath {
        stack: stack.stack.clone(),
        samples: stack.weight,
        percentage,
    }
}

/// Calculate sample distribution statistics
pub fn calculate_sample_distribution(stacks: &[CollapsedStack]) -> SampleDistribution {
    if stacks.is_empty() {
        return SampleDistribution::default();
    }

    let total: u64 = stacks.iter().map(|s| s.weight).sum();
    let count = stacks.len();
    let mean = total / count as u64;

    let mut weights: Vec<u64> = stacks.iter().map(|s| s.weight).collect();
    weights.sort_unstable();
    let median = weights[weights.len() / 2];

    // Top 10% of stacks (input is sorted by weight)
    let top_10_percent_count = (count as f64 * 0.1).ceil() as usize;
    let top_10_percent_samples: u64 = stacks
        .iter()
        .take(top_10_percent_count)
        .map(|s| s.weight)
        .sum();

    SampleDistribution {
        total_samples: total,
        stack_count: count,
        mean_samples_per_stack: mean,
        median_samples_per_stack: median,
        top_10_percent_samples,
        top_10_percent_percentage: if total > 0 {
            (top_10_percent_samples as f64 / total as f64) * 100.0
        } else {
            0.0
        },
    }
}

/// Sample distribution statistics
#[derive(Debug, Clone, Default)]
pub struct SampleDistribution {
    /// Total samples across all stacks
    pub total_samples: u64,

    /// Number of unique stacks
    pub stack_count: usize,

    pub mean_samples_per_stack: u64,

    pub median_samples_per_stack: u64,

    /// Samples landing in the top 10% of stacks
    pub top_10_percent_samples: u64,

    /// Percentage of all samples in the top 10%
    pub top_10_percent_percentage: f64,
}

impl SampleDistribution {
    /// Returns true if the top 10% of stacks hold more than 80% of samples
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Human-readable summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Total: {} samples | Stacks: {} | Mean: {} | Median: {} | Top 10%: {:.1}%",
            self.total_samples,
            self.stack_count,
            self.mean_samples_per_stack,
            self.median_samples_per_stack,
            self.top_10_percent_percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_hot_paths() {
        let stacks = vec![
            CollapsedStack::new("main;execute".to_string(), 50),
            CollapsedStack::new("main;storage".to_string(), 30),
            CollapsedStack::new("main;compute".to_string(), 20),
        ];

        let hot_paths = calculate_hot_paths(&stacks, 100, 2);

        assert_eq!(hot_paths.len(), 2);
        assert_eq!(hot_paths[0].stack, "main;execute");
        assert_eq!(hot_paths[0].samples, 50);
        assert_eq!(hot_paths[0].percentage, 50.0);
    }

    #[test]
    fn test_calculate_sample_distribution() {
        let stacks = vec![
            CollapsedStack::new("stack1".to_string(), 80),
            CollapsedStack::new("stack2".to_string(), 10),
            CollapsedStack::new("stack3".to_string(), 5),
            CollapsedStack::new("stack4".to_string(), 5),
        ];

        let dist = calculate_sample_distribution(&stacks);

        assert_eq!(dist.total_samples, 100);
        assert_eq!(dist.stack_count, 4);
        assert_eq!(dist.mean_samples_per_stack, 25);
        assert_eq!(dist.median_samples_per_stack, 10);
        assert!(!dist.is_highly_concentrated()); // exactly 80%, not above
    }

    #[test]
    fn test_sample_distribution_empty() {
        let dist = calculate_sample_distribution(&[]);
        assert_eq!(dist.total_samples, 0);
        assert_eq!(dist.stack_count, 0);
    }

    #[test]
    fn test_create_hot_path_with_zero_total() {
        let stack = CollapsedStack::new("a;b".to_string(), 3);
        let hot_path = create_hot_path(&stack, 0);
        assert_eq!(hot_path.percentage, 0.0);
    }
}
