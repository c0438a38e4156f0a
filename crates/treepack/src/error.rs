//! Error types for the packing engine.

use thiserror::Error;

/// Errors produced by shape construction, solving and scoring.
#[derive(Debug, Error)]
pub enum Error {
    /// The shape polygon is malformed (too few vertices, zero area,
    /// self-intersecting). Detected once at construction, before any solve.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A placement pair shares positive interior area. A set that fails this
    /// check must never be scored.
    #[error("placements {first} and {second} overlap (area {area:.3e})")]
    ValidationFailure {
        /// Index of the first placement of the offending pair.
        first: usize,
        /// Index of the second placement of the offending pair.
        second: usize,
        /// Exact interior intersection area.
        area: f64,
    },

    /// The lattice could not host an expected instance even after widening
    /// the interlock constants. The spec is structurally too tight; the
    /// instance is never silently dropped.
    #[error("cannot place instance {instance} after {retries} widening retries")]
    Unplaceable {
        /// Index of the instance that could not be placed.
        instance: usize,
        /// Number of spec-widening retries that were attempted.
        retries: u32,
    },

    /// A placement center lies outside the coordinate limits accepted by the
    /// official verifier.
    #[error("placement {index} at ({x}, {y}) is outside the +/-100 coordinate bounds")]
    OutOfBounds {
        /// Index of the offending placement.
        index: usize,
        /// Center x coordinate.
        x: f64,
        /// Center y coordinate.
        y: f64,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
