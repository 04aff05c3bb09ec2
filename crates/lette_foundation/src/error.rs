//! Error types for the Lette system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! "Not loaded yet" and "not found" are never errors here; they are
//! `Option`/`bool` results at the call site.

use std::fmt;

use thiserror::Error;

use crate::aabb::Aabb;
use crate::handle::GenIdx;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Lette operations.
///
/// Displays as the kind's message, followed by the context in parentheses
/// when one is attached.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional note about where the error occurred.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a stale handle error.
    #[must_use]
    pub fn stale_handle(idx: GenIdx) -> Self {
        Self::new(ErrorKind::StaleHandle(idx))
    }

    /// Creates an inverted bounds error.
    #[must_use]
    pub fn inverted_bounds(bounds: Aabb) -> Self {
        Self::new(ErrorKind::InvertedBounds(bounds))
    }

    /// Creates an invalid cell size error.
    #[must_use]
    pub fn invalid_cell_size(size: f32) -> Self {
        Self::new(ErrorKind::InvalidCellSize(size))
    }

    /// Creates an error for bounds whose cell range does not fit the grid.
    #[must_use]
    pub fn out_of_range(bounds: Aabb) -> Self {
        Self::new(ErrorKind::OutOfRange(bounds))
    }

    /// Creates an unknown component error.
    #[must_use]
    pub fn unknown_component(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownComponent(name.into()))
    }

    /// Creates a failed load error.
    #[must_use]
    pub fn load_failed(src: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoadFailed {
            src: src.into(),
            message: message.into(),
        })
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Returns true if this error reports a cancelled operation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({context})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Handle generation does not match a live slot.
    #[error("stale handle: {0:?}")]
    StaleHandle(GenIdx),

    /// Box has `min > max` on some axis.
    #[error("inverted bounds: {0}")]
    InvertedBounds(Aabb),

    /// Box is not finite, or its cells fall outside `i32` coordinates.
    #[error("bounds outside the cell grid: {0}")]
    OutOfRange(Aabb),

    /// Grid cell size must be finite and positive.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f32),

    /// Component name not present in the registry.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// A resource could not be produced by its loader.
    #[error("could not load resource {src}: {message}")]
    LoadFailed {
        /// Resource key.
        src: String,
        /// Loader-provided reason.
        message: String,
    },

    /// The operation observed its cancellation token.
    #[error("cancelled")]
    Cancelled,

    /// I/O failure, typically from a loader or thread spawn.
    #[error("i/o error: {0}")]
    Io(#[source] std::io::Error),
}
