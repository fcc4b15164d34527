//! The `Coordinate` trait monomorphizes the query engine over a fixed set of
//! concrete numeric types instead of threading a `num-traits`-style generic
//! bound through every module. Four types cover every caller the rest of
//! this crate's tests exercise: `f32`, `f64`, `i32`, `i64`.

use std::fmt::Debug;

/// A single point coordinate.
///
/// Every index backend needs three things from a coordinate type: ordering
/// (to partition a KD-tree node, to quantize a voxel cell), a lossless-enough
/// path to `f64` (every metric accumulates in `f64`, and the voxel grid's
/// `sideLength` is always a real number even for integer coordinates), and
/// identifiable sentinels so an infinite `HyperRect` can be built without a
/// caller-supplied bound. There is no arithmetic bound here: every distance
/// is computed by converting to `f64` first (see `metric.rs`), so the engine
/// never adds, subtracts, or multiplies two `D` values directly.
pub trait Coordinate: Copy + Clone + PartialOrd + PartialEq + Debug + Send + Sync + 'static {
    /// The type's minimum representable value (used as the `-infinity`
    /// sentinel for an unbounded `HyperRect`).
    fn min_value() -> Self;
    /// The type's maximum representable value (the `+infinity` sentinel).
    fn max_value() -> Self;
    /// Convert to `f64` for distance accumulation and voxel geometry.
    fn to_f64(self) -> f64;
}

macro_rules! impl_coordinate_float {
    ($t:ty) => {
        impl Coordinate for $t {
            fn min_value() -> Self {
                <$t>::NEG_INFINITY
            }
            fn max_value() -> Self {
                <$t>::INFINITY
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}
impl_coordinate_float!(f32);
impl_coordinate_float!(f64);

macro_rules! impl_coordinate_int {
    ($t:ty) => {
        impl Coordinate for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }
            fn max_value() -> Self {
                <$t>::MAX
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}
impl_coordinate_int!(i32);
impl_coordinate_int!(i64);
