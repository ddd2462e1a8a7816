use crate::error::Result;
use crate::grid::ScalarGrid;

/// Keep cells strictly above `fraction × max(grid)`, zero the rest.
///
/// Kept cells retain their intensity. A grid without positive cells comes
/// back all zero.
pub fn peak_relative_threshold(grid: &ScalarGrid, fraction: f64) -> Result<ScalarGrid> {
    grid.ensure_not_empty()?;
    let cut = fraction * grid.max_value();
    let mut out = grid.clone();
    for v in out.data.iter_mut() {
        if *v <= cut {
            *v = 0.0;
        }
    }
    Ok(out)
}
