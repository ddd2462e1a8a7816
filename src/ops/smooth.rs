use crate::error::{Error, Result};
use crate::grid::{GridTopology, ScalarGrid};

/// Replace every cell whose `(2r+1)²` window lies inside the grid with the
/// unweighted window mean.
///
/// Reads come from a snapshot taken before the pass. Cells closer than
/// `radius` to the border keep their value; run this on an extended grid
/// whose margin is at least `radius`.
pub fn smooth(grid: &mut ScalarGrid, radius: usize) -> Result<()> {
    grid.ensure_not_empty()?;
    let (nz, na) = grid.dims();
    if nz <= 2 * radius || na <= 2 * radius {
        return Ok(());
    }
    let snapshot = grid.clone();
    let norm = ((2 * radius + 1) * (2 * radius + 1)) as f64;
    for z in radius..nz - radius {
        for a in radius..na - radius {
            let sum = window_total(&snapshot, z, a, radius);
            grid.set(z, a, sum / norm);
        }
    }
    Ok(())
}

/// Sum the `(2r+1)²` window around every interior cell of an extended grid.
///
/// The output has raw dimensions: cell `(z, a)` holds the window sum centred
/// on extended cell `(z + margin, a + margin)`. `radius` must not exceed the
/// margin.
pub fn window_sum(
    extended: &ScalarGrid,
    topology: &GridTopology,
    radius: usize,
) -> Result<ScalarGrid> {
    extended.ensure_not_empty()?;
    if extended.dims() != topology.extended_dims() {
        return Err(Error::DimensionMismatch {
            expected: topology.extended_dims(),
            actual: extended.dims(),
        });
    }
    if radius > topology.margin {
        return Err(Error::InvalidParameter(format!(
            "window radius {radius} exceeds margin {}",
            topology.margin
        )));
    }
    let (nz, na) = topology.raw_dims();
    let m = topology.margin;
    let mut out = ScalarGrid::new(nz, na);
    for z in 0..nz {
        for a in 0..na {
            out.set(z, a, window_total(extended, z + m, a + m, radius));
        }
    }
    Ok(out)
}

#[inline]
fn window_total(grid: &ScalarGrid, zc: usize, ac: usize, radius: usize) -> f64 {
    let mut sum = 0.0;
    for z in zc - radius..=zc + radius {
        let row = &grid.data[z * grid.azimuth..(z + 1) * grid.azimuth];
        sum += row[ac - radius..=ac + radius].iter().sum::<f64>();
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::extend;

    #[test]
    fn smoothing_reads_from_snapshot() {
        let mut g = ScalarGrid::new(7, 7);
        g.set(3, 3, 25.0);
        smooth(&mut g, 2).expect("smooth");
        // Every interior cell within reach of the spike sees exactly one 25.
        for z in 2..5 {
            for a in 2..5 {
                assert!((g.get(z, a) - 1.0).abs() < 1e-12, "({z},{a}) = {}", g.get(z, a));
            }
        }
        // Border cells are left alone.
        assert_eq!(g.get(0, 0), 0.0);
    }

    #[test]
    fn constant_field_is_a_fixed_point() {
        let mut g = ScalarGrid::from_vec(6, 8, vec![3.0; 48]).expect("grid");
        smooth(&mut g, 2).expect("smooth");
        assert!(g.data.iter().all(|&v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn window_sum_of_constant_field() {
        let topo = GridTopology::new(8, 12, 3).expect("topology");
        let raw = ScalarGrid::from_vec(8, 12, vec![2.0; 96]).expect("grid");
        let ext = extend(&raw, &topo).expect("extend");
        let sums = window_sum(&ext, &topo, 3).expect("window sum");
        assert_eq!(sums.dims(), (8, 12));
        assert!(sums.data.iter().all(|&v| (v - 98.0).abs() < 1e-9));
        assert!(window_sum(&ext, &topo, 4).is_err());
    }
}
