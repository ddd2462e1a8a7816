/// Read-only row access shared by intensity and label grids.
pub trait GridView {
    type Cell: Copy;

    fn zenith_bins(&self) -> usize;
    fn azimuth_bins(&self) -> usize;

    fn row(&self, z: usize) -> &[Self::Cell];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { grid: self, z: 0 }
    }

    /// Iterate `(zenith, azimuth, value)` in row-major scan order.
    fn cells(&self) -> Cells<'_, Self>
    where
        Self: Sized,
    {
        Cells {
            grid: self,
            z: 0,
            a: 0,
        }
    }
}

pub struct Rows<'a, G: ?Sized + GridView> {
    grid: &'a G,
    z: usize,
}

impl<'a, G: GridView> Iterator for Rows<'a, G> {
    type Item = &'a [G::Cell];

    fn next(&mut self) -> Option<Self::Item> {
        if self.z >= self.grid.zenith_bins() {
            return None;
        }
        let z = self.z;
        self.z += 1;
        Some(self.grid.row(z))
    }
}

pub struct Cells<'a, G: ?Sized + GridView> {
    grid: &'a G,
    z: usize,
    a: usize,
}

impl<'a, G: GridView> Iterator for Cells<'a, G> {
    type Item = (usize, usize, G::Cell);

    fn next(&mut self) -> Option<Self::Item> {
        if self.grid.azimuth_bins() == 0 || self.z >= self.grid.zenith_bins() {
            return None;
        }
        let item = (self.z, self.a, self.grid.row(self.z)[self.a]);
        self.a += 1;
        if self.a == self.grid.azimuth_bins() {
            self.a = 0;
            self.z += 1;
        }
        Some(item)
    }
}
