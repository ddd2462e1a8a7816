//! Run-based connected-component labeling.
//!
//! Rows are scanned in order; every horizontal run of set cells gets a
//! provisional id, and runs that overlap a run of the previous row are merged
//! through [`UnionFind`]. Connectivity is 4-neighbour: runs touch only when
//! their azimuth spans share at least one column. The periodic and polar
//! wrap is not handled here, callers label extended grids.
use super::stats::RegionTable;
use crate::error::Result;
use crate::grid::{GridView, LabelGrid, ScalarGrid};
use log::debug;

/// Dense disjoint-set forest over provisional ids.
///
/// `union` keeps the lower id as the root, so the representative of a set is
/// the first id that entered it.
#[derive(Clone, Debug, Default)]
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            parent: Vec::with_capacity(n),
        }
    }

    /// Allocate a new singleton set and return its id.
    pub fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `x`, halving the path on the way up.
    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    pub fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb) as usize] = ra.min(rb);
        }
    }
}

/// Result of [`label_components`]: the label map and its region table.
#[derive(Clone, Debug)]
pub struct Labeling {
    /// `0` for background, dense ids `1..=n` otherwise.
    pub labels: LabelGrid,
    pub regions: RegionTable,
}

impl Labeling {
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

#[derive(Clone, Copy)]
struct Run {
    a0: usize,
    a1: usize,
    id: u32,
}

/// Label the set cells of `mask` and drop regions smaller than `min_area`.
///
/// Surviving regions receive dense ids in row-major first-seen order.
/// Cells of dropped regions are zeroed in `mask` as well as in the label map,
/// so the mask and labels always agree afterwards.
pub fn label_components(mask: &mut ScalarGrid, min_area: usize) -> Result<Labeling> {
    mask.ensure_not_empty()?;
    let (nz, na) = mask.dims();

    let mut uf = UnionFind::with_capacity(nz);
    let mut runs: Vec<(usize, Run)> = Vec::new();
    let mut prev_row: Vec<Run> = Vec::new();
    let mut cur_row: Vec<Run> = Vec::new();

    for (z, row) in mask.rows().enumerate() {
        cur_row.clear();
        let mut a = 0;
        while a < na {
            if row[a] == 0.0 {
                a += 1;
                continue;
            }
            let a0 = a;
            while a < na && row[a] != 0.0 {
                a += 1;
            }
            let run = Run {
                a0,
                a1: a - 1,
                id: uf.make_set(),
            };
            for p in prev_row.iter() {
                if p.a0 <= run.a1 && run.a0 <= p.a1 {
                    uf.union(p.id, run.id);
                }
            }
            cur_row.push(run);
        }
        runs.extend(cur_row.iter().map(|&r| (z, r)));
        std::mem::swap(&mut prev_row, &mut cur_row);
    }

    // Region sizes per root.
    let mut size = vec![0usize; uf.len()];
    for (_, run) in runs.iter_mut() {
        run.id = uf.find(run.id);
        size[run.id as usize] += run.a1 - run.a0 + 1;
    }

    // Dense ids in first-seen order; `0` marks a dropped root.
    let mut dense = vec![u32::MAX; uf.len()];
    let mut next = 1u32;
    let mut dropped = 0usize;
    let mut labels = LabelGrid::new(nz, na);
    for (z, run) in runs.iter() {
        let root = run.id as usize;
        if dense[root] == u32::MAX {
            if size[root] >= min_area {
                dense[root] = next;
                next += 1;
            } else {
                dense[root] = 0;
                dropped += 1;
            }
        }
        let id = dense[root];
        if id == 0 {
            mask.row_mut(*z)[run.a0..=run.a1].fill(0.0);
        } else {
            labels.row_mut(*z)[run.a0..=run.a1].fill(id);
        }
    }

    let regions = RegionTable::from_labels(mask, &labels);
    debug!(
        "label_components runs={} regions={} dropped={} min_area={}",
        runs.len(),
        regions.len(),
        dropped,
        min_area
    );
    Ok(Labeling { labels, regions })
}
