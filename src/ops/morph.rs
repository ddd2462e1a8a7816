//! Gap filling and erosion on intensity and label grids.
//!
//! Cells are treated as set when non-zero. Neighbourhoods are clipped at the
//! grid border; the wrap is expected to be materialised by [`super::extend`].
use super::NEIGH_OFFSETS;
use crate::error::Result;
use crate::grid::{LabelGrid, ScalarGrid};

/// One relaxation pass: every zero cell with at least one non-zero
/// 8-neighbour becomes the mean of those neighbours.
///
/// Returns the number of filled cells; `0` means the pass was a no-op.
pub fn expand(grid: &mut ScalarGrid) -> Result<usize> {
    grid.ensure_not_empty()?;
    let snapshot = grid.clone();
    let mut filled = 0usize;
    for z in 0..snapshot.zenith {
        for a in 0..snapshot.azimuth {
            if snapshot.get(z, a) != 0.0 {
                continue;
            }
            let mut sum = 0.0;
            let mut n = 0usize;
            for (dz, da) in NEIGH_OFFSETS {
                if let Some(v) = snapshot.get_checked(z as isize + dz, a as isize + da) {
                    if v != 0.0 {
                        sum += v;
                        n += 1;
                    }
                }
            }
            if n > 0 {
                grid.set(z, a, sum / n as f64);
                filled += 1;
            }
        }
    }
    Ok(filled)
}

/// Label-map counterpart of [`expand`]: a background cell touching labelled
/// cells takes the smallest neighbouring label. Labels are never averaged.
pub fn expand_labels(labels: &mut LabelGrid) -> Result<usize> {
    labels.ensure_not_empty()?;
    let snapshot = labels.clone();
    let mut filled = 0usize;
    for z in 0..snapshot.zenith {
        for a in 0..snapshot.azimuth {
            if snapshot.get(z, a) != 0 {
                continue;
            }
            let nearest = NEIGH_OFFSETS
                .iter()
                .filter_map(|&(dz, da)| snapshot.get_checked(z as isize + dz, a as isize + da))
                .filter(|&l| l != 0)
                .min();
            if let Some(l) = nearest {
                labels.set(z, a, l);
                filled += 1;
            }
        }
    }
    Ok(filled)
}

/// Zero every set cell whose 3×3 neighbourhood (itself included) holds fewer
/// than `min_neighbors` set cells. Returns the number of removed cells.
pub fn erode(grid: &mut ScalarGrid, min_neighbors: usize) -> Result<usize> {
    grid.ensure_not_empty()?;
    let snapshot = grid.clone();
    let mut removed = 0usize;
    for z in 0..snapshot.zenith {
        for a in 0..snapshot.azimuth {
            if snapshot.get(z, a) == 0.0 {
                continue;
            }
            let set = 1 + NEIGH_OFFSETS
                .iter()
                .filter_map(|&(dz, da)| snapshot.get_checked(z as isize + dz, a as isize + da))
                .filter(|&v| v != 0.0)
                .count();
            if set < min_neighbors {
                grid.set(z, a, 0.0);
                removed += 1;
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_fills_ring_with_neighbour_mean() {
        let mut g = ScalarGrid::new(5, 5);
        g.set(2, 2, 8.0);
        g.set(2, 3, 4.0);
        let filled = expand(&mut g).expect("expand");
        // The 3x4 block around the two seeds, minus the seeds.
        assert_eq!(filled, 10);
        assert_eq!(g.get(1, 2), 6.0);
        assert_eq!(g.get(1, 1), 8.0);
        assert_eq!(g.get(2, 4), 4.0);
        // Seeds themselves are untouched and far cells stay empty.
        assert_eq!(g.get(2, 2), 8.0);
        assert_eq!(g.get(0, 0), 0.0);
    }

    #[test]
    fn expand_is_noop_without_frontier() {
        let mut full = ScalarGrid::from_vec(3, 3, vec![1.0; 9]).expect("grid");
        let before = full.clone();
        assert_eq!(expand(&mut full).expect("expand"), 0);
        assert_eq!(full, before);

        let mut empty = ScalarGrid::new(3, 3);
        assert_eq!(expand(&mut empty).expect("expand"), 0);
        assert_eq!(empty.count_nonzero(), 0);
    }

    #[test]
    fn expand_labels_prefers_smallest_label() {
        let mut l = LabelGrid::new(1, 3);
        l.set(0, 0, 7);
        l.set(0, 2, 3);
        assert_eq!(expand_labels(&mut l).expect("expand"), 1);
        assert_eq!(l.get(0, 1), 3);
    }

    #[test]
    fn erosion_drops_isolated_cells() {
        let mut g = ScalarGrid::new(6, 6);
        for z in 1..4 {
            for a in 1..4 {
                g.set(z, a, 1.0);
            }
        }
        g.set(5, 5, 1.0);
        let removed = erode(&mut g, 4).expect("erode");
        // The speck and nothing from the block (corners see 4 set cells).
        assert_eq!(removed, 1);
        assert_eq!(g.get(5, 5), 0.0);
        assert_eq!(g.get(1, 1), 1.0);
    }
}
