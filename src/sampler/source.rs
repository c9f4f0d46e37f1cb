//! Stack capture seam between the sampling timer and the stacks it reads.

use crate::calltree::Frame;
use crate::utils::error::CaptureError;

/// Something the sampler can take stack snapshots of
///
/// Snapshots are ordered outermost frame first. A failed snapshot is
/// counted as a missed sample; it never stops the session.
pub trait StackSource: Send + 'static {
    /// Label of the sampled thread; becomes the root node's name
    fn label(&self) -> &str;

    /// Copy the current stack
    fn snapshot(&self) -> Result<Vec<Frame>, CaptureError>;
}

impl<S: StackSource + ?Sized> StackSource for Box<S> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn snapshot(&self) -> Result<Vec<Frame>, CaptureError> {
        (**self).snapshot()
    }
}
