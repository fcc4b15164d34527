//! # kdvox — exact k-nearest-neighbor and radius search over static points
//!
//! ## Architecture Overview
//!
//! ### Four backends behind one trait
//!
//! There is no single "best" index for exact nearest-neighbor search: a
//! KD-tree (`KdTree`) prunes well when the data is roughly uniformly
//! spread and the dimension is low, a uniform grid (`Voxel`) prunes well
//! when points cluster densely into cells, and an exhaustive scan
//! (`Linear`) is the only backend every other one is checked against.
//! Rather than pick one and hope, `Ensemble` runs several of them
//! concurrently against the same query and keeps whichever answer arrives
//! first (nearest-1) or merges every backend's output (k-NN, radius).
//! All four implement [`SearchMethod`], so calling code never has to know
//! which one it's holding.
//!
//! ### Why distance values aren't parameterized per coordinate type
//!
//! A point's coordinates can be `f32`, `f64`, `i32`, or `i64` — see
//! [`Coordinate`] — but every distance computed over them comes back as
//! `f64`. Going further and making the *distance* type itself generic
//! would only buy precision the accumulation doesn't need (an `i32`
//! coordinate's squared L2 distance already fits in `f64` without loss),
//! at the cost of a second generic parameter threaded through every
//! module. See `DESIGN.md` for the fuller argument.
//!
//! ### Global allocator
//!
//! Every backend here builds its index once and queries it many times —
//! there's no steady-state allocation churn to optimize for the way a
//! mutable in-memory store has. `mimalloc` is kept anyway: the KD-tree
//! builder and the voxel grid's bucket map both do a burst of many small
//! allocations during `build`, and mimalloc's segregated free lists make
//! that burst cheaper than the system allocator would.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod bounded;
mod coordinate;
mod ensemble;
mod error;
mod kdtree;
mod linear;
mod metric;
mod rect;
mod search;
mod select;
mod validate;
mod voxel;

pub use bounded::BoundedPriorityList;
pub use coordinate::Coordinate;
pub use ensemble::Ensemble;
pub use error::BuildError;
pub use kdtree::KdTree;
pub use linear::Linear;
pub use metric::MetricKind;
pub use rect::HyperRect;
pub use search::SearchMethod;
pub use voxel::Voxel;
