//! Per-thread shadow stacks.
//!
//! Profiled code declares its frames with [`enter`], which pushes onto the
//! calling thread's shadow stack and returns a guard that pops on drop. The
//! sampler reads a copy of that stack through a [`StackHandle`], holding the
//! lock only for the copy.
//!
//! A handle keeps a weak reference: once the owning thread exits, snapshots
//! fail with `CaptureError::ThreadTerminated`.
//!
//! Threads can publish their stack under a label with [`register_current`]
//! so another thread can sample them by name.

use super::source::StackSource;
use crate::calltree::Frame;
use crate::utils::error::CaptureError;
use log::debug;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

type SharedFrames = Arc<Mutex<Vec<Frame>>>;

thread_local! {
    static CURRENT: SharedFrames = Arc::new(Mutex::new(Vec::new()));
}

fn registry() -> &'static Mutex<HashMap<String, StackHandle>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, StackHandle>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Read-only view of one thread's shadow stack
#[derive(Debug, Clone)]
pub struct StackHandle {
    label: String,
    frames: Weak<Mutex<Vec<Frame>>>,
}

impl StackHandle {
    /// Same stack, different label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns false once the owning thread has exited
    pub fn is_alive(&self) -> bool {
        self.frames.strong_count() > 0
    }

    /// Current depth of the stack (0 if the thread is gone)
    pub fn depth(&self) -> usize {
        self.frames
            .upgrade()
            .map(|frames| frames.lock().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }
}

impl StackSource for StackHandle {
    fn label(&self) -> &str {
        &self.label
    }

    fn snapshot(&self) -> Result<Vec<Frame>, CaptureError> {
        let frames = self
            .frames
            .upgrade()
            .ok_or_else(|| CaptureError::ThreadTerminated(self.label.clone()))?;

        let guard = frames
            .lock()
            .map_err(|_| CaptureError::Poisoned(self.label.clone()))?;

        Ok(guard.clone())
    }
}

/// Guard for one declared frame; pops it when dropped
///
/// Not `Send`: the frame must be popped on the thread that pushed it.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard {
    frames: SharedFrames,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        // Guards drop in reverse order, so this is normally a single pop
        frames.truncate(self.depth);
    }
}

/// Push a frame onto the calling thread's shadow stack
///
/// # Example
/// ```
/// use toolbelt::sampler::{current_stack, enter, StackSource};
///
/// let _outer = enter("Parser", "parse");
/// {
///     let _inner = enter("Parser", "parse_expr");
///     assert_eq!(current_stack().snapshot().unwrap().len(), 2);
/// }
/// assert_eq!(current_stack().snapshot().unwrap().len(), 1);
/// ```
pub fn enter(class: &'static str, method: &'static str) -> FrameGuard {
    enter_frame(Frame::new(class, method))
}

/// Push an arbitrary frame onto the calling thread's shadow stack
pub fn enter_frame(frame: Frame) -> FrameGuard {
    let frames = CURRENT.with(Arc::clone);
    let depth = {
        let mut stack = frames.lock().unwrap_or_else(PoisonError::into_inner);
        let depth = stack.len();
        stack.push(frame);
        depth
    };

    FrameGuard {
        frames,
        depth,
        _not_send: PhantomData,
    }
}

/// Run `work` inside a declared frame
pub fn in_frame<R>(class: &'static str, method: &'static str, work: impl FnOnce() -> R) -> R {
    let _frame = enter(class, method);
    work()
}

/// Handle to the calling thread's shadow stack
///
/// Labelled with the thread name, or its id for unnamed threads.
pub fn current_stack() -> StackHandle {
    let thread = std::thread::current();
    let label = thread
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", thread.id()));

    StackHandle {
        label,
        frames: CURRENT.with(Arc::downgrade),
    }
}

/// Publish the calling thread's stack under `label`
///
/// Replaces any earlier registration under the same label.
pub fn register_current(label: &str) -> StackHandle {
    let handle = current_stack().with_label(label);
    let mut threads = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if threads.insert(label.to_string(), handle.clone()).is_some() {
        debug!("Replaced stack registration for '{}'", label);
    }
    handle
}

/// Remove a registration; returns true if one existed
pub fn unregister(label: &str) -> bool {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(label)
        .is_some()
}

/// Find the stack registered under `label`
///
/// Registrations whose thread has exited are dropped and reported as absent.
pub fn lookup(label: &str) -> Option<StackHandle> {
    let mut threads = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let handle = threads.get(label)?.clone();
    if handle.is_alive() {
        return Some(handle);
    }

    debug!("Dropping stale stack registration for '{}'", label);
    threads.remove(label);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_enter_pushes_and_guard_pops() {
        let handle = current_stack();
        assert_eq!(handle.depth(), 0);

        let outer = enter("App", "run");
        let inner = enter("App", "step");
        assert_eq!(
            handle.snapshot().unwrap(),
            vec![Frame::new("App", "run"), Frame::new("App", "step")]
        );

        drop(inner);
        assert_eq!(handle.depth(), 1);
        drop(outer);
        assert_eq!(handle.depth(), 0);
    }

    #[test]
    fn test_in_frame_returns_value() {
        let value = in_frame("App", "compute", || {
            assert_eq!(current_stack().depth(), 1);
            42
        });
        assert_eq!(value, 42);
        assert_eq!(current_stack().depth(), 0);
    }

    #[test]
    fn test_snapshot_fails_after_thread_exit() {
        let handle = thread::spawn(current_stack).join().unwrap();

        assert!(!handle.is_alive());
        assert!(matches!(
            handle.snapshot(),
            Err(CaptureError::ThreadTerminated(_))
        ));
    }

    #[test]
    fn test_register_and_lookup() {
        let label = "stack-test-register";
        let handle = register_current(label);
        let _frame = enter("App", "registered");

        let found = lookup(label).unwrap();
        assert_eq!(found.label(), label);
        assert_eq!(found.snapshot().unwrap(), handle.snapshot().unwrap());

        assert!(unregister(label));
        assert!(lookup(label).is_none());
    }

    #[test]
    fn test_lookup_drops_stale_registration() {
        let label = "stack-test-stale";
        thread::spawn(move || {
            register_current(label);
        })
        .join()
        .unwrap();

        assert!(lookup(label).is_none());
        assert!(!unregister(label));
    }
}
