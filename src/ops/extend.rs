use crate::error::{Error, Result};
use crate::grid::{Grid, GridTopology};

/// Copy `grid` into the interior of an extended grid and fill the ghost
/// margin through [`GridTopology::wrap_coordinate`].
///
/// Azimuth margins wrap periodically, rows beyond a pole come from the
/// mirrored row at the antipodal azimuth, corners compose both rules.
pub fn extend<T: Copy + Default>(grid: &Grid<T>, topology: &GridTopology) -> Result<Grid<T>> {
    grid.ensure_not_empty()?;
    topology.validate()?;
    if grid.dims() != topology.raw_dims() {
        return Err(Error::DimensionMismatch {
            expected: topology.raw_dims(),
            actual: grid.dims(),
        });
    }

    let (ez_n, ea_n) = topology.extended_dims();
    let mut out = Grid::new(ez_n, ea_n);
    for ez in 0..ez_n {
        let row = out.row_mut(ez);
        for (ea, cell) in row.iter_mut().enumerate() {
            let (z, a) = topology.wrap_coordinate(ez as isize, ea as isize);
            *cell = grid.get(z, a);
        }
    }
    Ok(out)
}
