//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by the sampling profiler
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Sampling interval must be positive, got {0}ms")]
    InvalidInterval(i64),

    #[error("Sampler is already running for thread '{0}'")]
    AlreadyRunning(String),

    #[error("Sampler was not started")]
    NotStarted,

    #[error("No thread registered under label '{0}'")]
    UnknownThread(String),

    #[error("Failed to spawn sampler thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Sampler thread for '{0}' panicked")]
    WorkerPanicked(String),

    #[error("Invalid thread label {0:?}: {1}")]
    InvalidLabel(String, &'static str),
}

/// Errors that can occur while snapshotting a thread's stack
///
/// These never abort a session; the tick is counted as missed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Target thread '{0}' has terminated")]
    ThreadTerminated(String),

    #[error("Stack of thread '{0}' is poisoned")]
    Poisoned(String),
}

/// Errors that can occur while rendering a call tree
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render limit: {0}")]
    InvalidLimit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to generate flamegraph: {0}")]
    GenerationFailed(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid profile report: {0}")]
    InvalidReport(String),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors raised by the property comparator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Property registered twice: {0}")]
    DuplicateProperty(String),
}
