//! Error wrapping helpers.
//!
//! `WrappedError` boxes any error behind one concrete type so it can cross
//! boundaries that only accept a single error type. It is transparent: its
//! `Display` and `source()` are those of the wrapped error, so wrapping never
//! hides the cause chain. `unwrap_wrapped` peels those layers back off.

use std::error::Error as StdError;
use std::fmt;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Type-erased wrapper around another error
pub struct WrappedError {
    inner: BoxError,
}

impl WrappedError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
        }
    }

    /// Borrow the wrapped error
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner
    }

    /// Take the wrapped error back out
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Debug for WrappedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WrappedError").field(&self.inner).finish()
    }
}

impl fmt::Display for WrappedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for WrappedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// Wrap any error
pub fn wrap<E>(error: E) -> WrappedError
where
    E: StdError + Send + Sync + 'static,
{
    WrappedError::new(error)
}

/// Strip every `WrappedError` layer from the outside of `error`
pub fn unwrap_wrapped(error: BoxError) -> BoxError {
    let mut current = error;
    loop {
        match current.downcast::<WrappedError>() {
            Ok(wrapped) => current = wrapped.inner,
            Err(other) => return other,
        }
    }
}

/// Innermost error of the `source()` chain
pub fn root_cause<'a>(error: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}

/// First error of type `E` in the chain, starting with `error` itself
///
/// Looks through `WrappedError` layers as well.
pub fn find_cause<'a, E>(error: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    let mut current = Some(error);
    while let Some(mut err) = current {
        if let Some(found) = err.downcast_ref::<E>() {
            return Some(found);
        }
        while let Some(wrapped) = err.downcast_ref::<WrappedError>() {
            err = wrapped.get_ref();
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
        }
        current = err.source();
    }
    None
}

pub fn has_cause<E>(error: &(dyn StdError + 'static)) -> bool
where
    E: StdError + 'static,
{
    find_cause::<E>(error).is_some()
}
