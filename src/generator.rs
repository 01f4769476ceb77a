use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::warn;

#[cfg(feature = "debug-traces")]
use tracing::{debug, info, trace};

use crate::{
    grid::{direction::Neighbour, GridData, GridDefinition, GridPosition, NodeIndex},
    resolver::{resolve_giver, resolve_shape, GiverStrategy, NeighbourFlags},
    tileset::TileSet,
    transition::{Corner, TransitionType, ALL_CORNERS},
    GenerationError, Terrain,
};

use self::{
    builder::{GeneratorBuilder, Unset},
    observer::GenerationUpdate,
};

/// Defines a [`GeneratorBuilder`] used to create a generator
pub mod builder;
/// Defines different possible observers to view the results of a [`MapGenerator`]
pub mod observer;

/// Different ways to seed the RNG of the generator.
///
/// Note: No matter the selected mode, after each call to [`MapGenerator::generate`] the generator will generate and use a new `u64` seed using the previous `u64` seed. A generator created with the same seed will give the same sequence of maps.
pub enum RngMode {
    /// The generator will use the given seed for its random source.
    Seeded(u64),
    /// The generator will use a random seed for its random source.
    ///
    /// The randomly generated seed can still be retrieved by calling `seed` on the generator once created.
    RandomSeed,
}

/// Content of a generated cell: two terrain types and the shape of the blend between them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GeneratedTile<T> {
    /// Type shown by the corners not covered by the shape
    pub primary: T,
    /// Type shown by the corners covered by the shape. Equal to `primary` for uniform tiles
    pub secondary: T,
    pub shape: TransitionType,
}

impl<T: Terrain> GeneratedTile<T> {
    /// A tile showing a single type
    pub fn uniform(ty: T) -> Self {
        Self {
            primary: ty,
            secondary: ty,
            shape: TransitionType::None,
        }
    }

    /// Returns `true` if the tile shows a single type
    pub fn is_uniform(&self) -> bool {
        self.shape == TransitionType::None
    }

    /// Returns the type shown at `corner`
    #[inline]
    pub fn corner_type(&self, corner: Corner) -> T {
        match self.shape.is_secondary_at(corner) {
            true => self.secondary,
            false => self.primary,
        }
    }

    /// Returns the types shown at each corner, in [`ALL_CORNERS`] order
    pub fn corner_types(&self) -> [T; 4] {
        [
            self.corner_type(ALL_CORNERS[0]),
            self.corner_type(ALL_CORNERS[1]),
            self.corner_type(ALL_CORNERS[2]),
            self.corner_type(ALL_CORNERS[3]),
        ]
    }
}

/// Output of a [`MapGenerator`] for a single cell, sent to observers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridTile<T> {
    /// Index of the cell in the [`GridDefinition`]
    pub node_index: NodeIndex,
    pub position: GridPosition,
    pub tile: GeneratedTile<T>,
}

/// Generates tile maps from a [`TileSet`].
///
/// Cells are generated row by row, left to right. Each cell only looks at its left, above and above-right neighbours: see [`resolve_shape`] and [`resolve_giver`]. Cell `(0, 0)` is always a uniform tile of the primary type.
pub struct MapGenerator<T: Terrain> {
    // Configuration
    tileset: Arc<TileSet<T>>,
    grid: GridDefinition,

    // Internal
    rng: StdRng,
    seed: u64,

    observers: Vec<crossbeam_channel::Sender<GenerationUpdate<T>>>,
}

impl<T: Terrain> MapGenerator<T> {
    /// Returns a new `GeneratorBuilder`
    pub fn builder() -> GeneratorBuilder<Unset, Unset, T> {
        GeneratorBuilder::new()
    }

    pub(crate) fn create(
        tileset: Arc<TileSet<T>>,
        grid: GridDefinition,
        rng_mode: RngMode,
        observers: Vec<crossbeam_channel::Sender<GenerationUpdate<T>>>,
    ) -> Self {
        let seed = match rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::RandomSeed => rand::thread_rng().gen::<u64>(),
        };

        #[cfg(feature = "debug-traces")]
        info!(
            "Creating a map generator for {}, tile set {}, seed {}",
            grid,
            tileset.name(),
            seed
        );

        Self {
            tileset,
            grid,
            rng: StdRng::seed_from_u64(seed),
            seed,
            observers,
        }
    }

    /// Returns the seed that will be used by the next call to [`MapGenerator::generate`]. See [`RngMode`] for more information.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the [`GridDefinition`] used by the generator
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Returns the [`TileSet`] used by the generator
    pub fn tileset(&self) -> &Arc<TileSet<T>> {
        &self.tileset
    }

    /// Generates a whole map with the generator own random source, then advances its seed.
    ///
    /// Fails without generating any tile if the tile set is not valid.
    pub fn generate(&mut self) -> Result<GridData<GeneratedTile<T>>, GenerationError> {
        #[cfg(feature = "debug-traces")]
        info!("Generating {} with seed {}", self.grid, self.seed);

        let result = assemble(&self.tileset, &self.grid, &mut self.rng, &self.observers);
        // Gen next seed from current rng
        self.seed = self.rng.gen::<u64>();
        self.rng = StdRng::seed_from_u64(self.seed);
        result
    }

    /// Generates a whole map using `rng` as the random source. The seed of the generator is left untouched.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<GridData<GeneratedTile<T>>, GenerationError> {
        assemble(&self.tileset, &self.grid, rng, &self.observers)
    }

    pub(crate) fn add_observer_queue(
        &mut self,
    ) -> crossbeam_channel::Receiver<GenerationUpdate<T>> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.observers.push(sender);
        receiver
    }
}

fn notify<T: Terrain>(
    observers: &[crossbeam_channel::Sender<GenerationUpdate<T>>],
    update: GenerationUpdate<T>,
) {
    for obs in observers {
        // A dropped observer is not an error
        let _ = obs.send(update);
    }
}

fn assemble<T: Terrain, R: Rng + ?Sized>(
    tileset: &TileSet<T>,
    grid: &GridDefinition,
    rng: &mut R,
    observers: &[crossbeam_channel::Sender<GenerationUpdate<T>>],
) -> Result<GridData<GeneratedTile<T>>, GenerationError> {
    let primary = match (tileset.is_valid(), tileset.primary_type()) {
        (true, Some(primary)) => primary,
        _ => {
            warn!("Tile set {} is not valid, generation refused", tileset.name());
            notify(observers, GenerationUpdate::Refused);
            return Err(GenerationError::InvalidTileSet(tileset.name().to_string()));
        }
    };

    // Raster order: every neighbour read is already in `tiles`
    let mut tiles = Vec::with_capacity(grid.total_size());
    for node_index in grid.indexes() {
        let position = grid.get_position(node_index);
        let tile = resolve_tile(tileset, grid, &tiles, &position, primary, rng);

        #[cfg(feature = "debug-traces")]
        trace!(
            "Cell ({}, {}): {} {:?}/{:?}",
            position.x,
            position.y,
            tile.shape,
            tile.primary,
            tile.secondary
        );

        notify(
            observers,
            GenerationUpdate::Generated(GridTile {
                node_index,
                position,
                tile,
            }),
        );
        tiles.push(tile);
    }

    #[cfg(feature = "debug-traces")]
    debug!("Generated {} tiles", tiles.len());

    notify(observers, GenerationUpdate::Done);
    Ok(GridData::new(grid.clone(), tiles))
}

/// Generates the tile at `position` from its already generated neighbours.
///
/// Falls back to a uniform tile ([`TransitionType::None`]) when no giver matches the resolved shape, or when the random target roll finds no candidate. The type of this tile is the type at its top-left corner, taken from `left`, so that the map stays continuous around it.
fn resolve_tile<T: Terrain, R: Rng + ?Sized>(
    tileset: &TileSet<T>,
    grid: &GridDefinition,
    tiles: &[GeneratedTile<T>],
    position: &GridPosition,
    primary: T,
    rng: &mut R,
) -> GeneratedTile<T> {
    let neighbour = |neighbour: Neighbour| {
        grid.get_neighbour_index(position, neighbour)
            .and_then(|index| tiles.get(index))
            .copied()
    };

    // Missing neighbours are replaced by uniform tiles of the type at the shared corner
    let (left, above) = match (neighbour(Neighbour::Left), neighbour(Neighbour::Above)) {
        (Some(left), Some(above)) => (left, above),
        (None, Some(above)) => (
            GeneratedTile::uniform(above.corner_type(Corner::BottomLeft)),
            above,
        ),
        (Some(left), None) => (
            left,
            GeneratedTile::uniform(left.corner_type(Corner::TopRight)),
        ),
        (None, None) => return GeneratedTile::uniform(primary),
    };
    let above_right = neighbour(Neighbour::AboveRight)
        .unwrap_or_else(|| GeneratedTile::uniform(above.corner_type(Corner::BottomRight)));

    let flags = NeighbourFlags::from_neighbours(&left, &above, &above_right);
    let shape = resolve_shape(left.shape, above.shape, above_right.shape, flags, rng);
    let top_left = left.corner_type(Corner::TopRight);
    let Some(giver) = resolve_giver(
        shape,
        left.shape,
        above.shape,
        above_right.shape,
        flags.inverse_type,
    ) else {
        return GeneratedTile::uniform(top_left);
    };

    let pair = match giver {
        GiverStrategy::Left => Some((left.primary, left.secondary)),
        GiverStrategy::LeftInvert => Some((left.secondary, left.primary)),
        GiverStrategy::Above => Some((above.primary, above.secondary)),
        GiverStrategy::Primary => Some((left.primary, left.primary)),
        GiverStrategy::Secondary => Some((left.secondary, left.secondary)),
        GiverStrategy::PrimaryRandom => {
            roll_target(tileset, left.primary, &above_right, rng).map(|ty| (left.primary, ty))
        }
        GiverStrategy::SecondaryRandom | GiverStrategy::LeftInvertRandom => {
            roll_target(tileset, left.secondary, &above_right, rng)
                .map(|ty| (left.secondary, ty))
        }
    };

    match pair {
        Some((primary, secondary)) => GeneratedTile {
            primary,
            secondary,
            shape,
        },
        None => GeneratedTile::uniform(top_left),
    }
}

/// Picks a random transition target of `ty`.
///
/// When the bottom edge of `above_right` is split, the next cell of the row already shows two types: the target must be the one at the bottom-right corner of `above_right`.
fn roll_target<T: Terrain, R: Rng + ?Sized>(
    tileset: &TileSet<T>,
    ty: T,
    above_right: &GeneratedTile<T>,
    rng: &mut R,
) -> Option<T> {
    let targets = tileset.transitions(ty).unwrap_or_default();
    let candidates: Vec<T> = match above_right.shape.splits_bottom_edge() {
        true => {
            let forced = above_right.corner_type(Corner::BottomRight);
            targets.iter().copied().filter(|ty| *ty == forced).collect()
        }
        false => targets.to_vec(),
    };
    if candidates.is_empty() {
        #[cfg(feature = "debug-traces")]
        debug!("No transition target available for {:?}", ty);
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}
