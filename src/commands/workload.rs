//! Built-in workload profiled by the `profile` command.
//!
//! It pauses first, then loops over two inner operations, each running in
//! its own declared frame.

use crate::sampler::enter;
use std::hint::black_box;
use std::thread;
use std::time::Duration;

const CLASS: &str = "DemoWorkload";

#[derive(Debug, Clone, Copy)]
pub struct DemoWorkload {
    pub pause: Duration,
    pub iterations: u64,
}

impl DemoWorkload {
    pub fn new(pause: Duration, iterations: u64) -> Self {
        Self { pause, iterations }
    }

    /// Run the workload on the calling thread and return its checksum
    pub fn run(&self) -> u64 {
        let _run = enter(CLASS, "run");

        {
            let _pause = enter(CLASS, "pause");
            thread::sleep(self.pause);
        }

        let mut acc = 0u64;
        for i in 0..self.iterations {
            acc = acc.wrapping_add(checksum(i));
            acc = mix(acc);
        }
        acc
    }
}

fn checksum(seed: u64) -> u64 {
    let _frame = enter(CLASS, "checksum");
    (0..2_000u64).fold(seed, |acc, x| {
        black_box(acc.wrapping_mul(31).wrapping_add(x))
    })
}

fn mix(value: u64) -> u64 {
    let _frame = enter(CLASS, "mix");
    (0..1_000u32).fold(value, |acc, shift| {
        black_box(acc.rotate_left(shift % 63) ^ 0x9E37_79B9_7F4A_7C15)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::current_stack;

    #[test]
    fn test_workload_is_deterministic() {
        let workload = DemoWorkload::new(Duration::ZERO, 10);
        assert_eq!(workload.run(), workload.run());
    }

    #[test]
    fn test_workload_unwinds_its_frames() {
        DemoWorkload::new(Duration::ZERO, 3).run();
        assert_eq!(current_stack().depth(), 0);
    }
}
