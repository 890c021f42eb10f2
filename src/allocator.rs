//! Position Allocation
//!
//! Fractional sort keys for cards dropped into a column. Neighbour positions
//! are always the destination column's keys sorted ascending, with the moved
//! card already left out.

/// Key given to the first card of an empty column.
pub const FIRST_POSITION: f64 = 1.0;

/// Floor for inserts in front of the first card.
pub const MIN_HEAD_POSITION: f64 = 0.1;

/// Decimal digits kept for midpoints unless configured otherwise.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Computes new sort keys; holds only the rounding precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAllocator {
    decimals: u32,
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMALS)
    }
}

impl PositionAllocator {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Key for a card dropped at `target_index` among `neighbors`.
    ///
    /// Empty column gives 1, the head slot halves the first key (never below
    /// 0.1), the tail slot adds 1 to the last key, and anything in between is
    /// the rounded midpoint of the two bounding keys.
    pub fn allocate(&self, neighbors: &[f64], target_index: usize) -> f64 {
        let (Some(first), Some(last)) = (neighbors.first(), neighbors.last()) else {
            return FIRST_POSITION;
        };

        if target_index == 0 {
            return MIN_HEAD_POSITION.max(first / 2.0);
        }
        if target_index >= neighbors.len() {
            return last + 1.0;
        }

        let prev = neighbors[target_index - 1];
        let next = neighbors[target_index];
        self.round((prev + next) / 2.0)
    }

    /// Like [`allocate`](Self::allocate) but returns `None` when the key would
    /// not sort strictly between its neighbours, i.e. the gap is exhausted at
    /// the configured precision and the column needs renumbering.
    pub fn allocate_strict(&self, neighbors: &[f64], target_index: usize) -> Option<f64> {
        let position = self.allocate(neighbors, target_index);
        let index = target_index.min(neighbors.len());

        let after_prev = index == 0 || neighbors[index - 1] < position;
        let before_next = neighbors.get(index).map_or(true, |next| position < *next);
        (after_prev && before_next).then_some(position)
    }

    /// Round to the configured number of decimal digits
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round() / scale
    }
}

/// Evenly spaced keys 1, 2, 3, ... for a column of `count` cards.
pub fn rebalanced_positions(count: usize) -> Vec<f64> {
    (1..=count).map(|n| n as f64).collect()
}
