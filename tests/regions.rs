use shell_track::grid::{GridTopology, LabelGrid, ScalarGrid};
use shell_track::ops::{expand, extend};
use shell_track::regions::{combine, label_components, peak_relative_threshold};

fn block_grid(blocks: &[(usize, usize)]) -> ScalarGrid {
    let mut g = ScalarGrid::new(10, 10);
    for &(z0, a0) in blocks {
        for z in z0..z0 + 3 {
            for a in a0..a0 + 3 {
                g.set(z, a, 100.0);
            }
        }
    }
    g
}

#[test]
fn single_block_scenario() {
    let g = block_grid(&[(3, 3)]);

    let mut mask = g.clone();
    let labeling = label_components(&mut mask, 1).expect("labeling");
    assert_eq!(labeling.region_count(), 1);
    let (_, region) = labeling.regions.iter().next().expect("one region");
    assert_eq!(region.area, 9);

    let thresholded = peak_relative_threshold(&g, 0.5).expect("threshold");
    assert_eq!(thresholded, g, "block must survive and nothing else appear");
}

#[test]
fn two_block_scenario() {
    let g = block_grid(&[(1, 1), (6, 6)]);
    let mut mask = g.clone();
    let labeling = label_components(&mut mask, 1).expect("labeling");
    assert_eq!(labeling.region_count(), 2);

    let (_, combined) = combine(&labeling.labels, &labeling.labels, 5).expect("combine");
    assert_eq!(combined.region_count(), 2, "disjoint blocks must not merge");
}

#[test]
fn size_pruning_removes_only_small_regions() {
    let mut g = block_grid(&[(1, 1)]);
    g.set(8, 8, 100.0);
    let labeling = label_components(&mut g, 5).expect("labeling");
    assert_eq!(labeling.region_count(), 1);
    assert!(labeling.regions.iter().all(|(_, r)| r.area >= 5));
    assert_eq!(g.get(8, 8), 0.0);
    let labelled: LabelGrid = labeling.labels;
    assert_eq!(labelled.count_nonzero(), 9);
}

#[test]
fn labels_are_dense_and_ordered_by_first_cell() {
    let g = block_grid(&[(6, 1), (1, 6), (1, 1)]);
    let mut mask = g;
    let labeling = label_components(&mut mask, 1).expect("labeling");
    let ids: Vec<u32> = labeling.regions.labels().collect();
    assert_eq!(ids, vec![1, 2, 3]);
    // Scan order reaches (1, 1) before (1, 6) and both before (6, 1).
    assert_eq!(labeling.labels.get(1, 1), 1);
    assert_eq!(labeling.labels.get(1, 6), 2);
    assert_eq!(labeling.labels.get(6, 1), 3);
}

#[test]
fn region_across_the_seam_is_connected_in_the_extended_grid() {
    let topo = GridTopology::new(12, 16, 3).expect("topology");
    let mut raw = ScalarGrid::new(12, 16);
    for z in 4..7 {
        raw.set(z, 0, 1.0);
        raw.set(z, 15, 1.0);
    }
    let mut ext = extend(&raw, &topo).expect("extend");
    let labeling = label_components(&mut ext, 1).expect("labeling");
    let (ez, ea) = topo.to_extended(5, 15);
    let right = labeling.labels.get(ez, ea);
    let (ez, ea) = topo.to_extended(5, 0);
    // The ghost copy of column 0 sits right of column 15.
    assert_eq!(labeling.labels.get(ez, ea + 16), right);
}

#[test]
fn expand_reaches_a_fixed_point() {
    let mut g = block_grid(&[(3, 3)]);
    let mut passes = 0;
    while expand(&mut g).expect("expand") > 0 {
        passes += 1;
        assert!(passes < 20, "expand must settle");
    }
    let settled = g.clone();
    assert_eq!(expand(&mut g).expect("expand"), 0);
    assert_eq!(g, settled);
    assert_eq!(g.count_nonzero(), 100);
}
