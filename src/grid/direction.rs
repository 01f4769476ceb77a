/// Already generated neighbours of a cell, when walking a grid in raster order (row by row, left to right).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Neighbour {
    Left = 0,
    Above = 1,
    AboveRight = 2,
}

/// Offset between two positions of a grid
pub struct GridDelta {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

impl Neighbour {
    /// Returns the offset from a cell to this neighbour. Y grows downwards.
    #[inline]
    pub fn delta(&self) -> &'static GridDelta {
        &RASTER_NEIGHBOURS_DELTAS[*self as usize]
    }
}

const RASTER_NEIGHBOURS_DELTAS: &'static [GridDelta] = &[
    GridDelta {
        // Left
        dx: -1,
        dy: 0,
    },
    GridDelta {
        // Above
        dx: 0,
        dy: -1,
    },
    GridDelta {
        // AboveRight
        dx: 1,
        dy: -1,
    },
];
