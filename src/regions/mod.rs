//! Region extraction on extended grids.
//!
//! - `threshold`: peak-relative thresholding of an intensity map.
//! - `labeler`: run-based union-find labeling with small-region suppression.
//! - `stats`: per-region area, margin split, intensity range and bounding box.
//! - `area_cut`: interior-intensity and border-majority pruning.
//! - `merge`: loose/tight reconciliation (`union_cut`) and `combine`.
pub mod area_cut;
pub mod labeler;
pub mod merge;
pub mod stats;
pub mod threshold;

pub use area_cut::{area_cut, area_cut_until_stable, AreaCutOutcome, AreaCutParams};
pub use labeler::{label_components, Labeling, UnionFind};
pub use merge::{combine, union_cut, UnionCutOutcome, UnionCutParams};
pub use stats::{BBox, RegionStats, RegionTable};
pub use threshold::peak_relative_threshold;
