//! Call frame identity.
//!
//! A frame is identified by its declaring class (or module/type) and method
//! name. Overloads that share a name collapse onto the same identity.

use crate::utils::config::ROOT_CLASS;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// One call frame observed in a stack sample
///
/// Ordering is lexicographic by class, then method. Renderers use it to
/// break ties between siblings with equal sample counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Frame {
    /// Declaring class, type or module
    pub class: Cow<'static, str>,

    /// Method or function name
    pub method: Cow<'static, str>,
}

impl Frame {
    /// Create a frame from static names (no allocation)
    pub const fn new(class: &'static str, method: &'static str) -> Self {
        Self {
            class: Cow::Borrowed(class),
            method: Cow::Borrowed(method),
        }
    }

    /// Create a frame from owned names
    pub fn owned(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: Cow::Owned(class.into()),
            method: Cow::Owned(method.into()),
        }
    }

    /// Frame carried by the root node of a session's tree
    pub fn root(label: &str) -> Self {
        Self::owned(ROOT_CLASS, label)
    }

    pub fn is_root(&self) -> bool {
        self.class == ROOT_CLASS
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.method)
    }
}
