use std::collections::HashSet;

/// Vertical stack of occupied voxels sharing an `(x, y)` cell.
#[derive(Debug, Clone)]
pub struct Column {
    pub heights: HashSet<i32>,
    pub min_height: i32,
    pub max_height: i32,
    /// Approximate ground level; never above `min_height`.
    pub ground_height: i32,
}

impl Column {
    pub fn new(height: i32) -> Self {
        let mut heights = HashSet::new();
        heights.insert(height);
        Column {
            heights,
            min_height: height,
            max_height: height,
            ground_height: height,
        }
    }

    pub fn add_height(&mut self, height: i32) {
        self.heights.insert(height);

        if height < self.ground_height {
            self.ground_height = height;
        }
        if height < self.min_height {
            self.min_height = height;
        }
        if height > self.max_height {
            self.max_height = height;
        }
    }

    /// Finds the longest run of empty voxels between the column's filled
    /// voxels, returned as `(fill, empty)`: the filled voxel below the run
    /// and the last empty voxel of the run. The two are equal when the
    /// column has no interior gap.
    ///
    /// The scan stops below `max_height`, so a gap reaching the very top of
    /// the column is not considered.
    pub fn longest_empty_run(&self) -> (i32, i32) {
        let mut best_start = self.min_height;
        let mut best_end = self.min_height;

        // A minimum floating above the ground counts as an initial gap.
        if self.ground_height < self.min_height {
            best_start = self.ground_height;
            best_end = self.min_height - 1;
        }

        let mut cur_start = self.min_height;

        for i in (self.min_height + 1)..self.max_height {
            if self.heights.contains(&i) {
                cur_start = i;
            } else if i - cur_start > best_end - best_start {
                best_start = cur_start;
                best_end = i;
            }
        }

        (best_start, best_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_of(heights: &[i32]) -> Column {
        let mut column = Column::new(heights[0]);
        for &height in &heights[1..] {
            column.add_height(height);
        }
        column
    }

    #[test]
    fn test_longest_empty_run_picks_widest_gap() {
        let column = column_of(&[0, 1, 5, 6, 12]);
        assert_eq!(column.min_height, 0);
        assert_eq!(column.max_height, 12);
        assert_eq!(column.ground_height, 0);
        assert_eq!(column.longest_empty_run(), (6, 11));
    }

    #[test]
    fn test_solid_column_has_no_gap() {
        let column = column_of(&[3, 4, 5, 6]);
        assert_eq!(column.longest_empty_run(), (3, 3));
    }

    #[test]
    fn test_ground_below_minimum_seeds_initial_gap() {
        let mut column = column_of(&[5, 6, 7]);
        column.ground_height = 0;
        assert_eq!(column.longest_empty_run(), (0, 4));
    }

    #[test]
    fn test_gap_touching_the_top_is_ignored() {
        // 2..9 is empty but reaches max_height, so only the interior gap
        // between 1 and the scan limit is eligible.
        let column = column_of(&[0, 1, 9]);
        assert_eq!(column.longest_empty_run(), (1, 8));

        let column = column_of(&[0, 9]);
        assert_eq!(column.longest_empty_run(), (0, 8));
    }
}
