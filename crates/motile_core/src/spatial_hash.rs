/// Uniform grid over particle centers.
///
/// Implements a grid-based spatial hash using offset-indexed particle lists.
/// The grid is anchored at the bounding box of the positions it was built
/// from, so particles outside the simulation area (boundaries disabled) are
/// still indexed.
///
/// # Performance Characteristics
/// - Construction: O(n + cells)
/// - 3×3 neighborhood scan: O(particles in the nine cells)
/// - Memory: O(n) indices + O(cells) offsets
///
/// # Fields
/// - `cell_size`: Width/height of each grid cell in world units
/// - `origin_x/origin_y`: World coordinate of the grid's top-left corner
/// - `cols/rows`: Grid dimensions (# cells horizontally/vertically)
/// - `cell_offsets`: Offset indices into `entity_indices` for each cell
/// - `entity_indices`: Compact storage of all particle indices, sorted by cell
///
/// # Implementation Notes
/// - Uses "offset array" pattern (like compressed sparse rows)
/// - `cell_offsets[i]..cell_offsets[i+1]` contains all particles in cell i
/// - Non-finite positions are never bucketed
/// - The cell count is capped; past the cap cells grow, which only widens
///   the 3×3 neighborhood
///
/// # Examples
/// ```
/// use motile_core::spatial_hash::SpatialHash;
///
/// let mut spatial = SpatialHash::new(10.0);
/// let positions = vec![(15.0, 15.0), (25.0, 25.0), (85.0, 85.0)];
/// spatial.build(&positions);
///
/// let mut nearby = Vec::new();
/// spatial.query_into(15.0, 15.0, 20.0, &mut nearby);
/// assert_eq!(nearby.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialHash {
    pub cell_size: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

const MIN_CELL_SIZE: f64 = 1e-6;
const MIN_CELL_BUDGET: usize = 4096;

impl SpatialHash {
    /// Creates an empty hash with the requested cell size.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            origin_x: 0.0,
            origin_y: 0.0,
            cols: 0,
            rows: 0,
            cell_offsets: vec![0],
            entity_indices: Vec::new(),
        }
    }

    /// Changes the cell size for the next [`build`](Self::build). The index
    /// buffers keep their capacity.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.cell_size = cell_size.max(MIN_CELL_SIZE);
    }

    /// Cell coordinates of a world position, `None` if outside the grid.
    #[inline]
    pub fn cell_coords(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let fx = (x - self.origin_x) / self.cell_size;
        let fy = (y - self.origin_y) / self.cell_size;

        // Check for i32 overflow before casting
        if fx.abs() > i32::MAX as f64 || fy.abs() > i32::MAX as f64 {
            return None;
        }

        let cx = fx.floor() as i32;
        let cy = fy.floor() as i32;
        if cx < 0 || cx >= self.cols as i32 || cy < 0 || cy >= self.rows as i32 {
            None
        } else {
            Some((cx as usize, cy as usize))
        }
    }

    /// Flat cell index for a world position.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        self.cell_coords(x, y).map(|(cx, cy)| cy * self.cols + cx)
    }

    /// Rebuilds the grid from scratch. Index `i` in queries refers to `positions[i]`.
    pub fn build(&mut self, positions: &[(f64, f64)]) {
        let finite = positions
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in finite {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if min_x > max_x {
            self.cols = 0;
            self.rows = 0;
            self.cell_offsets.clear();
            self.cell_offsets.push(0);
            self.entity_indices.clear();
            return;
        }

        let span = (max_x - min_x).max(max_y - min_y);
        let budget = (positions.len() * 4).max(MIN_CELL_BUDGET) as f64;
        let min_size_for_budget = span / budget.sqrt();
        if self.cell_size < min_size_for_budget {
            self.cell_size = min_size_for_budget;
        }

        self.origin_x = min_x;
        self.origin_y = min_y;
        self.cols = ((max_x - min_x) / self.cell_size).floor() as usize + 1;
        self.rows = ((max_y - min_y) / self.cell_size).floor() as usize + 1;

        let cell_count = self.cols * self.rows;
        let mut counts = vec![0usize; cell_count];
        for &(x, y) in positions {
            if let Some(idx) = self.get_cell_idx(x, y) {
                counts[idx] += 1;
            }
        }

        self.cell_offsets.clear();
        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);

        let mut current_offsets = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &(x, y)) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(x, y) {
                let write_idx = current_offsets[cell_idx];
                self.entity_indices[write_idx] = entity_idx;
                current_offsets[cell_idx] += 1;
            }
        }
    }

    #[inline]
    fn cell_slice(&self, cx: usize, cy: usize) -> &[usize] {
        let cell_idx = cy * self.cols + cx;
        let start = self.cell_offsets[cell_idx];
        let end = self.cell_offsets[cell_idx + 1];
        &self.entity_indices[start..end]
    }

    /// Visits every particle in the 3×3 block of cells around `(x, y)`'s cell.
    pub fn for_each_in_block<F>(&self, x: f64, y: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        let Some((cx, cy)) = self.cell_coords(x, y) else {
            return;
        };
        for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
            for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                for &entity_idx in self.cell_slice(nx, ny) {
                    callback(entity_idx);
                }
            }
        }
    }

    /// Visits every particle in cells overlapping the square of half-width `radius`.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if self.cols == 0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let min_cx = ((x - radius - self.origin_x) / self.cell_size).floor() as i64;
        let max_cx = ((x + radius - self.origin_x) / self.cell_size).floor() as i64;
        let min_cy = ((y - radius - self.origin_y) / self.cell_size).floor() as i64;
        let max_cy = ((y + radius - self.origin_y) / self.cell_size).floor() as i64;

        for cy in min_cy.max(0)..=max_cy.min(self.rows as i64 - 1) {
            for cx in min_cx.max(0)..=max_cx.min(self.cols as i64 - 1) {
                for &entity_idx in self.cell_slice(cx as usize, cy as usize) {
                    callback(entity_idx);
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(x, y, radius, |idx| result.push(idx));
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let mut count = 0;
        self.query_callback(x, y, radius, |_| count += 1);
        count
    }

    pub fn len(&self) -> usize {
        self.entity_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_indices.is_empty()
    }
}
