use std::{fmt, ops::Range};

use self::direction::{GridDelta, Neighbour};

/// Defines the neighbourhood read during raster-order generation
pub mod direction;

/// Index of a cell in a grid
pub type NodeIndex = usize;

/// Represents a position in a grid in a practical format
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridPosition {
    /// Position on the x axis
    pub x: u32,
    /// Position on the y axis
    pub y: u32,
}

impl GridPosition {
    fn get_delta_position(&self, delta: &GridDelta) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(delta.dx),
            i64::from(self.y) + i64::from(delta.dy),
        )
    }

    pub fn new(x: u32, y: u32) -> GridPosition {
        Self { x, y }
    }
}

/// Size of a 2d map. Cells are stored row by row: the cell at `(x, y)` has the index `x + y * size_x`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridDefinition {
    size_x: u32,
    size_y: u32,
}

impl fmt::Display for GridDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( size: {} {} )", self.size_x, self.size_y)
    }
}

impl GridDefinition {
    /// Creates a new [`GridDefinition`]
    pub fn new(size_x: u32, size_y: u32) -> GridDefinition {
        Self { size_x, size_y }
    }

    /// Returns the size of the grid in the X axis.
    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Returns the size of the grid in the Y axis.
    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Returns the total size of the grid
    pub fn total_size(&self) -> usize {
        self.size_x as usize * self.size_y as usize
    }

    /// Returns a [`Range`] over all cell indexes in this grid
    pub fn indexes(&self) -> Range<NodeIndex> {
        0..self.total_size()
    }

    /// Returns the index from a grid position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    #[inline]
    pub fn get_index(&self, x: u32, y: u32) -> NodeIndex {
        x as usize + y as usize * self.size_x as usize
    }

    /// Returns the index from a grid position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    #[inline]
    pub fn get_index_from_pos(&self, grid_position: &GridPosition) -> NodeIndex {
        self.get_index(grid_position.x, grid_position.y)
    }

    /// Returns a [`GridPosition`] from the index of a cell in this [`GridDefinition`].
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get_position(&self, grid_index: NodeIndex) -> GridPosition {
        let size_x = self.size_x as usize;
        GridPosition {
            x: (grid_index % size_x) as u32,
            y: (grid_index / size_x) as u32,
        }
    }

    /// Returns the next position in the grid when moving by `delta` from `grid_position`.
    ///
    /// Returns `None` if the destination is not in the grid.
    pub fn get_next_pos(
        &self,
        grid_position: &GridPosition,
        delta: &GridDelta,
    ) -> Option<GridPosition> {
        let (x, y) = grid_position.get_delta_position(delta);
        if x < 0 || y < 0 || x >= i64::from(self.size_x) || y >= i64::from(self.size_y) {
            return None;
        }
        Some(GridPosition {
            x: x as u32,
            y: y as u32,
        })
    }

    /// Returns the index of `neighbour` from `grid_position`.
    ///
    /// Returns `None` if the neighbour is not in the grid.
    pub fn get_neighbour_index(
        &self,
        grid_position: &GridPosition,
        neighbour: Neighbour,
    ) -> Option<NodeIndex> {
        self.get_next_pos(grid_position, neighbour.delta())
            .map(|next_pos| self.get_index_from_pos(&next_pos))
    }

    /// Creates a default [`GridData`] with the size of the [`GridDefinition`] with each element value set to its default one.
    pub fn default_grid_data<D: Default + Clone>(&self) -> GridData<D> {
        GridData {
            grid: self.clone(),
            data: vec![D::default(); self.total_size()],
        }
    }

    /// Creates a [`GridData`] with the size of the [`GridDefinition`] with each element value being a copy of the given one.
    pub fn new_grid_data<D: Clone>(&self, element: D) -> GridData<D> {
        GridData {
            grid: self.clone(),
            data: vec![element; self.total_size()],
        }
    }
}

/// Holds a [`GridDefinition`] and generic data in a linear buffer that can be accessed through the grid definition to represent the grid content.
/// ### Example
///
/// Create a default `GridData` from a `GridDefinition`
/// ```
/// use ghx_autotile::grid::GridDefinition;
///
/// let grid = GridDefinition::new(10, 10);
/// let grid_data = grid.default_grid_data::<Option<u64>>();
/// assert_eq!(grid_data.get_2d(3, 4), &None);
/// ```
/// A filled `GridData` is also what a [`crate::generator::MapGenerator`] returns.
#[derive(Clone, Debug)]
pub struct GridData<D> {
    grid: GridDefinition,
    data: Vec<D>,
}

impl<D> GridData<D> {
    /// Prefer using `default_grid_data` or `new_grid_data` directly on an existing grid definition to create a `GridData` with a correct data Vec.
    pub fn new(grid: GridDefinition, data: Vec<D>) -> Self {
        Self { grid, data }
    }

    /// Returns a reference to the `GridDefinition` this is based on
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Sets the value of the element at `index` in the grid.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn set(&mut self, index: NodeIndex, value: D) {
        self.data[index] = value;
    }

    /// Returns a reference to the element at this index.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get(&self, index: NodeIndex) -> &D {
        &self.data[index]
    }

    /// Returns a mutable reference to the element at this index.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get_mut(&mut self, index: NodeIndex) -> &mut D {
        &mut self.data[index]
    }

    /// Returns a reference to the element at this position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    pub fn get_2d(&self, x: u32, y: u32) -> &D {
        &self.data[self.grid.get_index(x, y)]
    }

    /// Returns a mutable reference to the element at this position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    pub fn get_2d_mut(&mut self, x: u32, y: u32) -> &mut D {
        let index = self.grid.get_index(x, y);
        &mut self.data[index]
    }

    /// Returns a reference to the undelying data buffer.
    pub fn nodes(&self) -> &Vec<D> {
        &self.data
    }

    /// Consumes the `GridData` and returns its data buffer.
    pub fn into_nodes(self) -> Vec<D> {
        self.data
    }
}

impl<D: Clone> GridData<D> {
    /// Resets the whole grid buffer by setting the value of each element to `value`
    pub fn reset(&mut self, value: D) {
        for d in self.data.iter_mut() {
            *d = value.clone();
        }
    }
}
