use std::collections::HashMap;

use crate::column::Column;
use crate::coordinate::XYPair;

/// Per-column canopy structure measurements over the ground plane, following
/// Viedma et al. (2021), <https://doi.org/10.1016/j.foreco.2021.119037>.
/// All values are in voxel units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    pub canopy_height: HashMap<XYPair, i32>,
    pub understory_height: HashMap<XYPair, i32>,
    pub canopy_base_height: HashMap<XYPair, i32>,
    pub fuel_strata_gap: HashMap<XYPair, i32>,
}

impl Measurements {
    pub fn new() -> Self {
        Measurements::default()
    }

    /// Derives the four measurements for one column.
    ///
    /// Voxel heights index cells from their bottom face, hence the +1 when
    /// converting a filled height into a canopy or understory height.
    pub fn add_column(&mut self, coords: XYPair, column: &Column) {
        let ch = column.max_height + 1;
        let (fill, empty) = column.longest_empty_run();
        let uh = fill + 1;
        let cbh = empty + 1;
        let fsg = cbh - uh;

        self.canopy_height.insert(coords, ch);
        self.understory_height.insert(coords, uh);
        self.canopy_base_height.insert(coords, cbh);
        self.fuel_strata_gap.insert(coords, fsg);
    }

    pub fn len(&self) -> usize {
        self.canopy_height.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canopy_height.is_empty()
    }
}
