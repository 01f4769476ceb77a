use std::fmt;

/// Corners of a tile, in the order used by [`TransitionType::corners`]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

/// All the corners of a tile, in their natural order
pub const ALL_CORNERS: &'static [Corner] = &[
    Corner::TopLeft,
    Corner::TopRight,
    Corner::BottomLeft,
    Corner::BottomRight,
];

/// Describes how the secondary type of a tile sits on one of its edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeState {
    /// Both corners of the edge show the primary type
    Primary,
    /// Both corners of the edge show the secondary type
    Secondary,
    /// Only the first corner of the edge (top or left) shows the secondary type
    SplitFirst,
    /// Only the second corner of the edge (bottom or right) shows the secondary type
    SplitSecond,
}

impl EdgeState {
    fn from_corners(first: bool, second: bool) -> Self {
        match (first, second) {
            (false, false) => EdgeState::Primary,
            (true, true) => EdgeState::Secondary,
            (true, false) => EdgeState::SplitFirst,
            (false, true) => EdgeState::SplitSecond,
        }
    }

    /// Returns `true` if both corners of the edge show the same type
    #[inline]
    pub fn is_uniform(&self) -> bool {
        matches!(self, EdgeState::Primary | EdgeState::Secondary)
    }
}

/// Shape of the blend between the primary and secondary type of a tile.
///
/// Each shape tells which corners of the tile show the secondary type:
/// - the 4 edges cover two adjacent corners (`Up` covers the top-left and top-right corners),
/// - the 4 outer corners cover a single corner (`Outer1` top-left, `Outer2` top-right, `Outer3` bottom-left, `Outer4` bottom-right),
/// - the 4 inner corners cover every corner except one (`Inner1` leaves the top-left corner to the primary type, and so on),
/// - `None` covers nothing: the tile is uniform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum TransitionType {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Inner1 = 4,
    Inner2 = 5,
    Inner3 = 6,
    Inner4 = 7,
    Outer1 = 8,
    Outer2 = 9,
    Outer3 = 10,
    Outer4 = 11,
    None = 12,
}

/// All the transition types, indexed by their natural position
pub const ALL_TRANSITIONS: &'static [TransitionType] = &[
    TransitionType::Up,
    TransitionType::Down,
    TransitionType::Left,
    TransitionType::Right,
    TransitionType::Inner1,
    TransitionType::Inner2,
    TransitionType::Inner3,
    TransitionType::Inner4,
    TransitionType::Outer1,
    TransitionType::Outer2,
    TransitionType::Outer3,
    TransitionType::Outer4,
    TransitionType::None,
];

/// `TRANSITION_CORNERS[shape.index()]` holds the corners covered by the secondary type, in [`ALL_CORNERS`] order
const TRANSITION_CORNERS: [[bool; 4]; 13] = [
    [true, true, false, false],  // Up
    [false, false, true, true],  // Down
    [true, false, true, false],  // Left
    [false, true, false, true],  // Right
    [false, true, true, true],   // Inner1
    [true, false, true, true],   // Inner2
    [true, true, false, true],   // Inner3
    [true, true, true, false],   // Inner4
    [true, false, false, false], // Outer1
    [false, true, false, false], // Outer2
    [false, false, true, false], // Outer3
    [false, false, false, true], // Outer4
    [false, false, false, false], // None
];

impl TransitionType {
    /// Returns the index of the enum member in [`ALL_TRANSITIONS`]
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the [`TransitionType`] at `index` in [`ALL_TRANSITIONS`], if any
    pub fn from_index(index: usize) -> Option<TransitionType> {
        ALL_TRANSITIONS.get(index).copied()
    }

    /// Returns, for each corner in [`ALL_CORNERS`] order, `true` if the corner shows the secondary type.
    #[inline]
    pub fn corners(&self) -> [bool; 4] {
        TRANSITION_CORNERS[self.index()]
    }

    /// Returns `true` if `corner` shows the secondary type
    #[inline]
    pub fn is_secondary_at(&self, corner: Corner) -> bool {
        self.corners()[corner as usize]
    }

    /// Finds the shape covering exactly the given corners.
    ///
    /// Returns `None` for the three patterns that are not shapes: all corners covered, and both diagonals.
    pub fn from_corners(corners: [bool; 4]) -> Option<TransitionType> {
        ALL_TRANSITIONS
            .iter()
            .find(|shape| shape.corners() == corners)
            .copied()
    }

    /// State of the right edge (top-right and bottom-right corners)
    pub fn right_edge(&self) -> EdgeState {
        let [_, top_right, _, bottom_right] = self.corners();
        EdgeState::from_corners(top_right, bottom_right)
    }

    /// State of the bottom edge (bottom-left and bottom-right corners)
    pub fn bottom_edge(&self) -> EdgeState {
        let [_, _, bottom_left, bottom_right] = self.corners();
        EdgeState::from_corners(bottom_left, bottom_right)
    }

    /// State of the left edge (top-left and bottom-left corners)
    pub fn left_edge(&self) -> EdgeState {
        let [top_left, _, bottom_left, _] = self.corners();
        EdgeState::from_corners(top_left, bottom_left)
    }

    /// State of the top edge (top-left and top-right corners)
    pub fn top_edge(&self) -> EdgeState {
        let [top_left, top_right, _, _] = self.corners();
        EdgeState::from_corners(top_left, top_right)
    }

    /// Returns `true` if the two bottom corners of a tile with this shape show different types.
    ///
    /// A tile placed below-left of such a tile cannot introduce a third type on its bottom-right corner.
    #[inline]
    pub fn splits_bottom_edge(&self) -> bool {
        !self.bottom_edge().is_uniform()
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionType::Up => "UP",
            TransitionType::Down => "DOWN",
            TransitionType::Left => "LEFT",
            TransitionType::Right => "RIGHT",
            TransitionType::Inner1 => "INNER_1",
            TransitionType::Inner2 => "INNER_2",
            TransitionType::Inner3 => "INNER_3",
            TransitionType::Inner4 => "INNER_4",
            TransitionType::Outer1 => "OUTER_1",
            TransitionType::Outer2 => "OUTER_2",
            TransitionType::Outer3 => "OUTER_3",
            TransitionType::Outer4 => "OUTER_4",
            TransitionType::None => "NONE",
        };
        write!(f, "{}", name)
    }
}
