//! The sampling timer.
//!
//! A `Sampler` owns at most one background thread at a time. Between
//! `start()` and `stop()` that thread wakes every `interval`, copies the
//! target stack and folds it into a `CallTreeBuilder` it owns exclusively.
//! `stop()` signals the thread, joins it and freezes the returned builder,
//! so the caller only ever sees the tree after the last mutation.
//!
//! The thread is also halted when the `Sampler` (or a `ProfilingSession`)
//! is dropped, so a forgotten `stop()` never leaks it.

use super::source::StackSource;
use super::stack::{self, StackHandle};
use crate::calltree::{CallTree, CallTreeBuilder};
use crate::utils::config::{DEFAULT_INTERVAL_MS, SAMPLER_THREAD_PREFIX};
use crate::utils::error::SamplerError;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Delay between two samples, in milliseconds; must be positive
    pub interval_ms: i64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SamplerConfig {
    pub fn new(interval_ms: i64) -> Self {
        Self { interval_ms }
    }

    /// Validated interval
    pub fn interval(&self) -> Result<Duration, SamplerError> {
        if self.interval_ms <= 0 {
            return Err(SamplerError::InvalidInterval(self.interval_ms));
        }
        Ok(Duration::from_millis(self.interval_ms as u64))
    }
}

/// Background thread of one running session
struct ActiveSession {
    label: String,
    started_at: DateTime<Utc>,
    stop_tx: Sender<()>,
    handle: JoinHandle<CallTreeBuilder>,
}

impl ActiveSession {
    /// Signal the thread and wait for it to hand back its builder
    fn halt(self) -> Result<CallTreeBuilder, SamplerError> {
        // A send error only means the thread is already gone; join tells us how
        let _ = self.stop_tx.send(());
        self.handle
            .join()
            .map_err(|_| SamplerError::WorkerPanicked(self.label))
    }
}

/// Periodic stack sampler
///
/// # Example
/// ```
/// use toolbelt::sampler::{enter, Sampler};
///
/// let mut sampler = Sampler::new(5).unwrap();
/// let (sum, tree) = sampler
///     .profile("main", || {
///         let _frame = enter("Example", "sum");
///         (0..1_000u64).sum::<u64>()
///     })
///     .unwrap();
///
/// assert_eq!(sum, 499_500);
/// assert!(tree.root().frame().is_root());
/// ```
pub struct Sampler {
    interval: Duration,
    active: Option<ActiveSession>,
}

impl Sampler {
    /// Create a sampler ticking every `interval_ms` milliseconds
    ///
    /// # Errors
    /// * `SamplerError::InvalidInterval` - `interval_ms` is 0 or negative
    pub fn new(interval_ms: i64) -> Result<Self, SamplerError> {
        Self::with_config(SamplerConfig::new(interval_ms))
    }

    pub fn with_config(config: SamplerConfig) -> Result<Self, SamplerError> {
        Ok(Self {
            interval: config.interval()?,
            active: None,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Begin sampling `source` on a background thread
    ///
    /// # Errors
    /// * `SamplerError::AlreadyRunning` - a session is active
    /// * `SamplerError::InvalidLabel` - the label cannot name a thread
    /// * `SamplerError::SpawnFailed` - the timer thread could not be created
    pub fn start<S: StackSource>(&mut self, source: S) -> Result<(), SamplerError> {
        if let Some(active) = &self.active {
            return Err(SamplerError::AlreadyRunning(active.label.clone()));
        }

        let label = source.label().to_string();
        if label.contains('\0') {
            return Err(SamplerError::InvalidLabel(label, "contains a NUL byte"));
        }
        let interval = self.interval;
        let (stop_tx, stop_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(format!("{}{}", SAMPLER_THREAD_PREFIX, label))
            .spawn(move || run_sampling_loop(source, interval, stop_rx))?;

        info!(
            "Started sampling '{}' every {}ms",
            label,
            interval.as_millis()
        );

        self.active = Some(ActiveSession {
            label,
            started_at: Utc::now(),
            stop_tx,
            handle,
        });

        Ok(())
    }

    /// Sample the calling thread, labelled `label`
    pub fn start_current_thread(&mut self, label: &str) -> Result<(), SamplerError> {
        self.start(stack::current_stack().with_label(label))
    }

    /// Sample the thread registered under `label`
    ///
    /// # Errors
    /// * `SamplerError::UnknownThread` - nothing live is registered under `label`
    pub fn start_named(&mut self, label: &str) -> Result<(), SamplerError> {
        let handle: StackHandle =
            stack::lookup(label).ok_or_else(|| SamplerError::UnknownThread(label.to_string()))?;
        self.start(handle)
    }

    /// Halt sampling and return the frozen tree
    ///
    /// The timer thread has exited when this returns.
    ///
    /// # Errors
    /// * `SamplerError::NotStarted` - no session is active
    /// * `SamplerError::WorkerPanicked` - the timer thread panicked
    pub fn stop(&mut self) -> Result<CallTree, SamplerError> {
        let active = self.active.take().ok_or(SamplerError::NotStarted)?;
        let started_at = active.started_at;
        let label = active.label.clone();

        let builder = active.halt()?;
        let tree = builder.freeze(self.interval, started_at, Utc::now());

        info!(
            "Stopped sampling '{}': {} samples, {} missed",
            label,
            tree.total_samples(),
            tree.missed_samples()
        );

        Ok(tree)
    }

    /// Start a session that is stopped when the returned guard is dropped
    pub fn session<S: StackSource>(
        &mut self,
        source: S,
    ) -> Result<ProfilingSession<'_>, SamplerError> {
        self.start(source)?;
        Ok(ProfilingSession { sampler: self })
    }

    /// Run `work` on the calling thread while sampling it
    ///
    /// The timer is halted on every exit path, including a panic in `work`.
    pub fn profile<R>(
        &mut self,
        label: &str,
        work: impl FnOnce() -> R,
    ) -> Result<(R, CallTree), SamplerError> {
        let session = self.session(stack::current_stack().with_label(label))?;
        let result = work();
        let tree = session.finish()?;
        Ok((result, tree))
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            warn!(
                "Sampler for '{}' dropped without stop(); halting timer thread",
                active.label
            );
            if let Err(e) = active.halt() {
                warn!("{}", e);
            }
        }
    }
}

/// Scoped profiling session
///
/// Call [`ProfilingSession::finish`] to get the tree; dropping the guard
/// instead halts the timer and discards the samples.
#[must_use = "dropping the session stops sampling immediately"]
pub struct ProfilingSession<'a> {
    sampler: &'a mut Sampler,
}

impl ProfilingSession<'_> {
    /// Stop sampling and return the frozen tree
    pub fn finish(self) -> Result<CallTree, SamplerError> {
        // Drop runs afterwards and finds nothing to halt
        self.sampler.stop()
    }
}

impl Drop for ProfilingSession<'_> {
    fn drop(&mut self) {
        if self.sampler.is_running() {
            debug!("Profiling session dropped before finish(); discarding samples");
            if let Err(e) = self.sampler.stop() {
                warn!("{}", e);
            }
        }
    }
}

/// Body of the timer thread
fn run_sampling_loop<S: StackSource>(
    source: S,
    interval: Duration,
    stop_rx: Receiver<()>,
) -> CallTreeBuilder {
    let mut builder = CallTreeBuilder::new(source.label());

    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => match source.snapshot() {
                Ok(frames) => builder.record(&frames),
                Err(e) => {
                    debug!("Missed sample: {}", e);
                    builder.record_missed();
                }
            },
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(
        "Sampling loop for '{}' exiting after {} samples",
        source.label(),
        builder.total_samples()
    );

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calltree::{Frame, TreeState};
    use crate::utils::error::CaptureError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Always reports the same stack
    struct FixedStack(Vec<Frame>);

    impl StackSource for FixedStack {
        fn label(&self) -> &str {
            "fixed"
        }

        fn snapshot(&self) -> Result<Vec<Frame>, CaptureError> {
            Ok(self.0.clone())
        }
    }

    /// Fails every other snapshot
    struct Flaky {
        calls: Arc<AtomicUsize>,
    }

    impl StackSource for Flaky {
        fn label(&self) -> &str {
            "flaky"
        }

        fn snapshot(&self) -> Result<Vec<Frame>, CaptureError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Err(CaptureError::ThreadTerminated("flaky".to_string()))
            } else {
                Ok(vec![Frame::new("Flaky", "work")])
            }
        }
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert!(matches!(
            Sampler::new(0),
            Err(SamplerError::InvalidInterval(0))
        ));
        assert!(matches!(
            Sampler::new(-10),
            Err(SamplerError::InvalidInterval(-10))
        ));
    }

    #[test]
    fn test_default_config_interval() {
        let sampler = Sampler::with_config(SamplerConfig::default()).unwrap();
        assert_eq!(sampler.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_stop_without_start_fails() {
        let mut sampler = Sampler::new(10).unwrap();
        assert!(matches!(sampler.stop(), Err(SamplerError::NotStarted)));
    }

    #[test]
    fn test_start_twice_fails() {
        let mut sampler = Sampler::new(10).unwrap();
        sampler.start(FixedStack(vec![])).unwrap();

        let second = sampler.start(FixedStack(vec![]));
        assert!(matches!(second, Err(SamplerError::AlreadyRunning(_))));

        sampler.stop().unwrap();
        assert!(!sampler.is_running());
    }

    #[test]
    fn test_immediate_stop_yields_root_only() {
        let mut sampler = Sampler::new(10_000).unwrap();
        sampler
            .start(FixedStack(vec![Frame::new("A", "run")]))
            .unwrap();
        let tree = sampler.stop().unwrap();

        assert_eq!(tree.total_samples(), 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.state(), TreeState::Frozen);
        assert_eq!(tree.label(), "fixed");
    }

    #[test]
    fn test_samples_follow_fixed_stack() {
        let mut sampler = Sampler::new(2).unwrap();
        sampler
            .start(FixedStack(vec![Frame::new("A", "run"), Frame::new("A", "leaf")]))
            .unwrap();
        thread::sleep(Duration::from_millis(60));
        let tree = sampler.stop().unwrap();

        let total = tree.total_samples();
        assert!(total > 0);

        let run = tree.root().child(&Frame::new("A", "run")).unwrap();
        assert_eq!(run.count(), total);
        assert_eq!(run.child(&Frame::new("A", "leaf")).unwrap().count(), total);
    }

    #[test]
    fn test_capture_failures_are_counted_not_fatal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sampler = Sampler::new(2).unwrap();
        sampler
            .start(Flaky {
                calls: Arc::clone(&calls),
            })
            .unwrap();
        thread::sleep(Duration::from_millis(60));
        let tree = sampler.stop().unwrap();

        let attempts = calls.load(Ordering::SeqCst) as u64;
        assert!(attempts >= 2);
        assert_eq!(tree.total_samples() + tree.missed_samples(), attempts);
        assert!(tree.missed_samples() >= 1);
    }

    #[test]
    fn test_drop_halts_timer_thread() {
        let calls = Arc::new(AtomicUsize::new(0));
        {
            let mut sampler = Sampler::new(1).unwrap();
            sampler
                .start(Flaky {
                    calls: Arc::clone(&calls),
                })
                .unwrap();
            thread::sleep(Duration::from_millis(10));
        }

        let after_drop = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn test_dropped_session_stops_sampler() {
        let mut sampler = Sampler::new(5).unwrap();
        {
            let _session = sampler.session(FixedStack(vec![])).unwrap();
        }
        assert!(!sampler.is_running());
        assert!(matches!(sampler.stop(), Err(SamplerError::NotStarted)));
    }

    #[test]
    fn test_start_named_unknown_thread() {
        let mut sampler = Sampler::new(5).unwrap();
        let result = sampler.start_named("no-such-thread");
        assert!(matches!(result, Err(SamplerError::UnknownThread(_))));
        assert!(!sampler.is_running());
    }

    #[test]
    fn test_nul_in_label_rejected() {
        let mut sampler = Sampler::new(5).unwrap();

        let result = sampler.start_current_thread("a\0b");
        assert!(matches!(result, Err(SamplerError::InvalidLabel(ref label, _)) if label == "a\0b"));
        assert!(!sampler.is_running());

        let profiled = sampler.profile("x\0", || 1);
        assert!(matches!(profiled, Err(SamplerError::InvalidLabel(..))));
    }
}
