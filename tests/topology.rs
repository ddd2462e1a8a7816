use shell_track::grid::{GridTopology, ScalarGrid};
use shell_track::ops::{extend, window_sum};

fn numbered(topo: &GridTopology) -> ScalarGrid {
    let (nz, na) = topo.raw_dims();
    let data = (0..nz * na).map(|i| i as f64 + 1.0).collect();
    ScalarGrid::from_vec(nz, na, data).expect("grid")
}

#[test]
fn extended_cells_replicate_their_canonical_cell() {
    let topo = GridTopology::default();
    let raw = numbered(&topo);
    let ext = extend(&raw, &topo).expect("extend");
    let (ez_n, ea_n) = topo.extended_dims();
    for ez in 0..ez_n {
        for ea in 0..ea_n {
            let (z, a) = topo.wrap_coordinate(ez as isize, ea as isize);
            assert_eq!(ext.get(ez, ea), raw.get(z, a), "cell ({ez}, {ea})");
        }
    }
}

#[test]
fn crossing_the_north_pole_lands_on_the_antipode() {
    let topo = GridTopology::default();
    let raw = numbered(&topo);
    let ext = extend(&raw, &topo).expect("extend");
    // One row above raw row 0 at raw azimuth 30 shows raw (0, 130).
    let (ez, ea) = topo.to_extended(0, 30);
    assert_eq!(ext.get(ez - 1, ea), raw.get(0, 130));
    // Antipode of the upper half wraps back down.
    let (ez, ea) = topo.to_extended(0, 150);
    assert_eq!(ext.get(ez - 1, ea), raw.get(0, 50));
}

#[test]
fn every_alias_reads_back_the_raw_value() {
    let topo = GridTopology::new(30, 40, 6).expect("topology");
    let raw = numbered(&topo);
    let ext = extend(&raw, &topo).expect("extend");
    for &(z, a) in &[(0, 0), (0, 39), (2, 17), (29, 3), (15, 20)] {
        let aliases = topo.aliases(z, a);
        assert_eq!(aliases[0], topo.to_extended(z, a));
        for (ez, ea) in aliases {
            assert_eq!(ext.get(ez, ea), raw.get(z, a));
        }
    }
}

#[test]
fn window_sum_of_constant_field_counts_the_window() {
    let topo = GridTopology::new(20, 30, 4).expect("topology");
    let mut raw = ScalarGrid::new(20, 30);
    raw.fill(2.0);
    let ext = extend(&raw, &topo).expect("extend");
    let sum = window_sum(&ext, &topo, 3).expect("window sum");
    assert_eq!(sum.dims(), (20, 30));
    assert!(sum.data.iter().all(|&v| (v - 98.0).abs() < 1e-9));
}
