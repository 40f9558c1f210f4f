//! Structured error types for sheetgrid.
//!
//! Recoverable conditions only. Invariant violations (malformed viewports,
//! selection no longer containing its focus) are programmer errors and are
//! asserted at the site that would produce them, not surfaced here.

/// All errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A viewport union was requested over an empty set.
    #[error("Viewport union requires at least one input")]
    EmptyUnion,

    /// A collaborator-supplied capability was read before the host provided
    /// it (e.g. canvas size queried before layout).
    #[error("Host capability not provided yet: {0}")]
    MissingCapability(&'static str),

    /// Sheet index out of range in the manager.
    #[error("Sheet index out of range: {0}")]
    SheetIndex(usize),

    /// Persisted sheet form could not be encoded or decoded.
    #[error("Sheet data JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
