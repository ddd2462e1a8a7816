use crate::error::{Error, Result};
use crate::grid::{GridView, ScalarGrid};

/// Downsample by summing each `block × block` tile into one cell.
///
/// The output is `floor(Z / block) × floor(A / block)`; trailing rows and
/// columns that do not fill a tile are dropped.
pub fn pool(grid: &ScalarGrid, block: usize) -> Result<ScalarGrid> {
    grid.ensure_not_empty()?;
    if block == 0 {
        return Err(Error::InvalidParameter("pool block must be positive".into()));
    }
    let (nz, na) = (grid.zenith / block, grid.azimuth / block);
    let mut out = ScalarGrid::new(nz, na);
    for (z, row) in grid.rows().take(nz * block).enumerate() {
        let dst = out.row_mut(z / block);
        for (pa, cell) in dst.iter_mut().enumerate() {
            *cell += row[pa * block..(pa + 1) * block].iter().sum::<f64>();
        }
    }
    Ok(out)
}
