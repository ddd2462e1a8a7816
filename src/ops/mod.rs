//! Elementary grid transforms.
//!
//! - [`extend`]: pad a raw grid with the periodic/antipodal ghost margin.
//! - [`smooth`]: box-filter mean over a `(2r+1)²` window (snapshot reads).
//! - [`window_sum`]: box-filter sum of an extended grid back onto raw cells.
//! - [`expand`] / [`expand_labels`]: one gap-filling relaxation pass.
//! - [`erode`]: drop cells with too few non-zero 3×3 neighbours.
//! - [`pool`]: block-sum downsampling.
//!
//! Operators that mutate take `&mut` and never read a cell they already
//! wrote in the same pass. Invalid input (empty grid, wrong dimensions) is
//! reported before anything is touched.

mod extend;
mod morph;
mod pool;
mod smooth;

pub use extend::extend;
pub use morph::{erode, expand, expand_labels};
pub use pool::pool;
pub use smooth::{smooth, window_sum};

/// 8-neighbourhood offsets `(dz, da)`.
pub(crate) const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
