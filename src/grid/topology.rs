//! Closed (zenith, azimuth) topology of the shell grid.
//!
//! Azimuth is periodic. Crossing a zenith pole lands on the mirrored zenith
//! row at the antipodal azimuth (`a + N/2`). An extended grid pads the raw grid
//! with a ghost margin of `margin` cells on every side; [`GridTopology::wrap_coordinate`]
//! maps any extended cell back to the raw cell it replicates and
//! [`GridTopology::aliases`] enumerates the inverse.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTopology {
    /// Raw zenith bins covering `[0, π]`.
    pub zenith_bins: usize,
    /// Raw azimuth bins covering `[-π, π)`; must be even.
    pub azimuth_bins: usize,
    /// Ghost margin width on each side of the extended grid.
    pub margin: usize,
}

impl Default for GridTopology {
    fn default() -> Self {
        Self {
            zenith_bins: 100,
            azimuth_bins: 200,
            margin: 10,
        }
    }
}

impl GridTopology {
    pub fn new(zenith_bins: usize, azimuth_bins: usize, margin: usize) -> Result<Self> {
        let topo = Self {
            zenith_bins,
            azimuth_bins,
            margin,
        };
        topo.validate()?;
        Ok(topo)
    }

    pub fn validate(&self) -> Result<()> {
        if self.zenith_bins == 0 || self.azimuth_bins == 0 {
            return Err(Error::InvalidTopology("grid has no bins".into()));
        }
        if self.azimuth_bins % 2 != 0 {
            return Err(Error::InvalidTopology(format!(
                "azimuth bins ({}) must be even for the polar wrap",
                self.azimuth_bins
            )));
        }
        if self.margin > self.zenith_bins || self.margin > self.azimuth_bins {
            return Err(Error::InvalidTopology(format!(
                "margin {} exceeds raw grid {}x{}",
                self.margin, self.zenith_bins, self.azimuth_bins
            )));
        }
        Ok(())
    }

    pub fn raw_dims(&self) -> (usize, usize) {
        (self.zenith_bins, self.azimuth_bins)
    }

    pub fn extended_dims(&self) -> (usize, usize) {
        (
            self.zenith_bins + 2 * self.margin,
            self.azimuth_bins + 2 * self.margin,
        )
    }

    #[inline]
    pub fn antipodal(&self, a: usize) -> usize {
        (a + self.azimuth_bins / 2) % self.azimuth_bins
    }

    #[inline]
    pub fn to_extended(&self, z: usize, a: usize) -> (usize, usize) {
        (z + self.margin, a + self.margin)
    }

    /// True for extended cells that are not part of the ghost margin.
    #[inline]
    pub fn is_interior(&self, ez: usize, ea: usize) -> bool {
        let m = self.margin;
        ez >= m && ez < m + self.zenith_bins && ea >= m && ea < m + self.azimuth_bins
    }

    /// Canonical raw cell replicated by extended cell `(ez, ea)`.
    ///
    /// Accepts any signed coordinate: the zenith axis reflects with period
    /// `2 * zenith_bins` (each reflection flips to the antipodal azimuth) and
    /// the azimuth axis wraps with period `azimuth_bins`.
    pub fn wrap_coordinate(&self, ez: isize, ea: isize) -> (usize, usize) {
        let nz = self.zenith_bins as isize;
        let na = self.azimuth_bins as isize;
        let m = self.margin as isize;

        let r = (ez - m).rem_euclid(2 * nz);
        let (z, flipped) = if r >= nz {
            ((2 * nz - 1 - r) as usize, true)
        } else {
            (r as usize, false)
        };
        let a = (ea - m).rem_euclid(na) as usize;
        let a = if flipped { self.antipodal(a) } else { a };
        (z, a)
    }

    /// Every extended cell whose canonical raw cell is `(z, a)`.
    ///
    /// The first entry is always the interior copy.
    pub fn aliases(&self, z: usize, a: usize) -> Vec<(usize, usize)> {
        let m = self.margin;
        let nz = self.zenith_bins;
        let mut rows = vec![(z + m, a)];
        if z < m {
            rows.push((m - 1 - z, self.antipodal(a)));
        }
        if z + m >= nz {
            rows.push((m + 2 * nz - 1 - z, self.antipodal(a)));
        }

        let mut out = Vec::with_capacity(rows.len() * 2);
        for (ez, ra) in rows {
            out.push((ez, ra + m));
            if ra < m {
                out.push((ez, ra + m + self.azimuth_bins));
            }
            if ra + m >= self.azimuth_bins {
                out.push((ez, ra + m - self.azimuth_bins));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GridTopology {
        GridTopology::new(6, 8, 2).expect("valid topology")
    }

    #[test]
    fn rejects_odd_azimuth_and_wide_margin() {
        assert!(GridTopology::new(6, 7, 2).is_err());
        assert!(GridTopology::new(3, 8, 4).is_err());
        assert!(GridTopology::new(0, 8, 0).is_err());
    }

    #[test]
    fn interior_maps_to_itself() {
        let t = small();
        for z in 0..6 {
            for a in 0..8 {
                let (ez, ea) = t.to_extended(z, a);
                assert_eq!(t.wrap_coordinate(ez as isize, ea as isize), (z, a));
            }
        }
    }

    #[test]
    fn azimuth_seam_is_periodic() {
        let t = small();
        // Left margin column 1 replicates raw column 7.
        assert_eq!(t.wrap_coordinate(3, 1), (1, 7));
        // Right margin column 10 replicates raw column 0.
        assert_eq!(t.wrap_coordinate(3, 10), (1, 0));
    }

    #[test]
    fn pole_rows_use_antipodal_azimuth() {
        let t = small();
        // Extended row 1 is one row beyond the north pole: mirror of raw row 0.
        assert_eq!(t.wrap_coordinate(1, 2), (0, 4));
        // Extended row 0 mirrors raw row 1.
        assert_eq!(t.wrap_coordinate(0, 3), (1, 5));
        // Row just past the south pole mirrors the last raw row.
        assert_eq!(t.wrap_coordinate(8, 2), (5, 4));
    }

    #[test]
    fn corners_compose_both_rules() {
        let t = small();
        // Column 0 wraps to raw column 6, row 0 mirrors raw row 1 with flip.
        assert_eq!(t.wrap_coordinate(0, 0), (1, 2));
    }

    #[test]
    fn aliases_invert_wrap() {
        let t = small();
        let (ez_n, ea_n) = t.extended_dims();
        for ez in 0..ez_n {
            for ea in 0..ea_n {
                let (z, a) = t.wrap_coordinate(ez as isize, ea as isize);
                let aliases = t.aliases(z, a);
                assert!(
                    aliases.contains(&(ez, ea)),
                    "extended ({ez},{ea}) missing from aliases of ({z},{a}): {aliases:?}"
                );
                for &(az, aa) in &aliases {
                    assert_eq!(t.wrap_coordinate(az as isize, aa as isize), (z, a));
                }
            }
        }
    }
}
