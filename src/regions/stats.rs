//! Per-region statistics over a label map.
use crate::error::Result;
use crate::grid::{GridTopology, GridView, LabelGrid, ScalarGrid};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Inclusive bounding box in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BBox {
    pub z_min: usize,
    pub z_max: usize,
    pub a_min: usize,
    pub a_max: usize,
}

impl BBox {
    fn point(z: usize, a: usize) -> Self {
        Self {
            z_min: z,
            z_max: z,
            a_min: a,
            a_max: a,
        }
    }

    fn include(&mut self, z: usize, a: usize) {
        self.z_min = self.z_min.min(z);
        self.z_max = self.z_max.max(z);
        self.a_min = self.a_min.min(a);
        self.a_max = self.a_max.max(a);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RegionStats {
    /// Cell count.
    pub area: usize,
    /// Cells inside the raw part of an extended grid.
    pub interior: usize,
    /// Cells in the ghost margin.
    pub exterior: usize,
    pub intensity_max: f64,
    pub intensity_min: f64,
    pub bbox: BBox,
}

impl RegionStats {
    fn first(z: usize, a: usize, v: f64, interior: bool) -> Self {
        Self {
            area: 1,
            interior: usize::from(interior),
            exterior: usize::from(!interior),
            intensity_max: v,
            intensity_min: v,
            bbox: BBox::point(z, a),
        }
    }

    fn add(&mut self, z: usize, a: usize, v: f64, interior: bool) {
        self.area += 1;
        if interior {
            self.interior += 1;
        } else {
            self.exterior += 1;
        }
        self.intensity_max = self.intensity_max.max(v);
        self.intensity_min = self.intensity_min.min(v);
        self.bbox.include(z, a);
    }

    /// More of the region lies in the ghost margin than in the raw grid.
    pub fn is_border_majority(&self) -> bool {
        self.exterior > self.interior
    }
}

/// Sparse table of regions keyed by label, iterated in label order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: BTreeMap<u32, RegionStats>,
}

impl RegionTable {
    /// Statistics of every labelled cell of an extended grid.
    pub fn collect(
        mask: &ScalarGrid,
        labels: &LabelGrid,
        topology: &GridTopology,
    ) -> Result<Self> {
        mask.ensure_same_dims(labels)?;
        let ext = topology.extended_dims();
        if mask.dims() != ext {
            return Err(crate::error::Error::DimensionMismatch {
                expected: ext,
                actual: mask.dims(),
            });
        }
        Ok(Self::scan(mask, labels, |z, a| topology.is_interior(z, a)))
    }

    /// Statistics without a topology: every cell counts as interior.
    pub fn from_labels(mask: &ScalarGrid, labels: &LabelGrid) -> Self {
        Self::scan(mask, labels, |_, _| true)
    }

    fn scan(mask: &ScalarGrid, labels: &LabelGrid, interior: impl Fn(usize, usize) -> bool) -> Self {
        let mut regions: BTreeMap<u32, RegionStats> = BTreeMap::new();
        for (z, a, id) in labels.cells() {
            if id == 0 {
                continue;
            }
            let v = mask.get(z, a);
            let inside = interior(z, a);
            match regions.entry(id) {
                btree_map::Entry::Vacant(e) => {
                    e.insert(RegionStats::first(z, a, v, inside));
                }
                btree_map::Entry::Occupied(mut e) => e.get_mut().add(z, a, v, inside),
            }
        }
        Self { regions }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, label: u32) -> Option<&RegionStats> {
        self.regions.get(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &RegionStats)> {
        self.regions.iter().map(|(&k, v)| (k, v))
    }

    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.regions.keys().copied()
    }
}
