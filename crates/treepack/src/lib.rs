//! # treepack
//!
//! Packing engine for N rigid copies of a fixed non-convex polygon: place
//! every copy with an independent rotation and translation so that no two
//! interiors overlap (boundary contact allowed), minimizing the side of the
//! smallest axis-aligned square containing them all. The per-group quality
//! metric is `side^2 / n`.
//!
//! ## Components
//!
//! - [`ShapeModel`] — immutable, validated unit polygon
//! - [`RigidPlacement`] / [`PlacementSet`] — placed copies and their world
//!   polygons
//! - [`overlap`] — boundary-exact interior overlap predicate
//! - [`SpatialIndex`] — R*-tree broad phase over placed copies
//! - [`BoundsTracker`] — running envelope and bounding square side
//! - [`LatticePacker`] — deterministic constructive solver over an
//!   interlocking brick lattice
//! - [`RotationRefiner`] — global-rotation post-pass
//! - [`Scorer`] — pairwise re-validation plus the `side^2 / n` metric
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use treepack::{LatticePacker, RotationRefiner, Scorer, ShapeModel};
//!
//! let shape = Arc::new(ShapeModel::tree());
//! let packer = LatticePacker::new(shape);
//!
//! let packing = packer.pack(12)?;
//! let refined = RotationRefiner::new().refine(&packing.set);
//!
//! let score = Scorer::new().score(&refined.set)?;
//! println!("n=12: side {:.4}, score {:.4}", refined.side, score);
//! # Ok::<(), treepack::Error>(())
//! ```
//!
//! ## Feature flags
//!
//! - `serde`: serialization support for [`Pose`] and [`LatticeSpec`]

pub mod bounds;
pub mod config;
pub mod error;
pub mod lattice;
pub mod overlap;
pub mod placement;
pub mod refine;
pub mod score;
pub mod shape;
pub mod solver;
pub mod spatial_index;

// Re-exports
pub use bounds::BoundsTracker;
pub use config::PackConfig;
pub use error::{Error, Result};
pub use lattice::{LatticePacker, LatticeSpec, SAFE_TOUCH_BUFFER};
pub use placement::{PlacementSet, Pose, RigidPlacement};
pub use refine::{Refinement, RotationRefiner};
pub use score::{Scorer, COORDINATE_LIMIT};
pub use shape::ShapeModel;
pub use solver::{Packing, PackingStrategy};
pub use spatial_index::{SpatialEntry, SpatialIndex};
