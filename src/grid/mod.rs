//! Grid containers and the closed shell topology they live on.
pub mod buffer;
pub mod topology;
pub mod traits;

pub use self::buffer::{Grid, LabelGrid, ScalarGrid};
pub use self::topology::GridTopology;
pub use self::traits::{Cells, GridView, Rows};
