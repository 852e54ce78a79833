//! Error taxonomy for the engine (spec §7).
//!
//! `DegenerateCrossing` and `OverlapConflict` are not surfaced to callers —
//! they're internal conditions the pipeline handles by falling through to a
//! generic rule, logged at `trace`/`debug` level (see `lib.rs`). Only
//! `InvalidInput` and `UnresolvedTouching` are returned from the public API.

use thiserror::Error;

/// Errors a Boolean call can return.
#[derive(Debug, Error)]
pub enum PolygonError {
    /// One of the inputs is structurally malformed: an open face, a
    /// non-closed ring, or a face with fewer than three edges.
    #[error("invalid input polygon: {0}")]
    InvalidInput(String),

    /// After Restitch, a crossing still has no `edge_after`: a dead end in
    /// the reconstructed topology. Callers should not retry with the same
    /// inputs.
    #[error("unresolved touching point at a crossing: {0}")]
    UnresolvedTouching(String),
}
