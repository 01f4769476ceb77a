use std::{marker::PhantomData, sync::Arc};

use crate::{grid::GridDefinition, tileset::TileSet, Terrain};

use super::{
    observer::{GenerationUpdate, QueuedObserver, QueuedStatefulObserver},
    MapGenerator, RngMode,
};

/// Internal type used to provide a type-safe builder with a [`GridDefinition`] and a [`TileSet`]
pub enum Set {}
/// Internal type used to provide a type-safe builder with a [`GridDefinition`] and a [`TileSet`]
pub enum Unset {}

/// Used to instantiate a new [`MapGenerator`].
///
/// A [`TileSet`] and a [`GridDefinition`] are the two non-optionnal parameters needed before being able to call `build`.
///
/// ### Example
///
/// Create a `MapGenerator` from a `GeneratorBuilder`.
/// ```
/// use ghx_autotile::{grid::GridDefinition, generator::{builder::GeneratorBuilder, RngMode}, tileset::TileSet};
/// use image::RgbaImage;
///
/// let atlas = vec![RgbaImage::new(4, 4), RgbaImage::new(4, 4)];
/// let mut tileset = TileSet::new("plain", vec!['g', 's'], &atlas);
/// tileset.regenerate_images();
/// tileset.validate().unwrap();
///
/// let mut generator = GeneratorBuilder::new()
///    .with_tileset(tileset)
///    .with_grid(GridDefinition::new(10, 10))
///    .with_rng(RngMode::Seeded(42))
///    .build();
/// let map = generator.generate().unwrap();
/// assert_eq!(map.get_2d(0, 0).primary, 'g');
/// ```
pub struct GeneratorBuilder<G, S, T: Terrain> {
    tileset: Option<Arc<TileSet<T>>>,
    grid: Option<GridDefinition>,
    rng_mode: RngMode,
    observers: Vec<crossbeam_channel::Sender<GenerationUpdate<T>>>,
    typestate: PhantomData<(G, S)>,
}

impl<T: Terrain> GeneratorBuilder<Unset, Unset, T> {
    /// Creates a [`GeneratorBuilder`] with its values set to their default.
    pub fn new() -> Self {
        Self {
            tileset: None,
            grid: None,
            rng_mode: RngMode::RandomSeed,
            observers: Vec::new(),
            typestate: PhantomData,
        }
    }

    /// Sets the [`TileSet`] to be used by the [`MapGenerator`]
    pub fn with_tileset(self, tileset: TileSet<T>) -> GeneratorBuilder<Unset, Set, T> {
        self.with_shared_tileset(Arc::new(tileset))
    }

    /// Sets the [`TileSet`] to be used by the [`MapGenerator`]. The `MapGenerator` will hold a read-only Arc onto this `TileSet` which can be safely shared by multiple `MapGenerator`.
    pub fn with_shared_tileset(self, tileset: Arc<TileSet<T>>) -> GeneratorBuilder<Unset, Set, T> {
        GeneratorBuilder {
            tileset: Some(tileset),

            grid: self.grid,
            rng_mode: self.rng_mode,
            observers: self.observers,

            typestate: PhantomData,
        }
    }
}

impl<T: Terrain> GeneratorBuilder<Unset, Set, T> {
    /// Sets the [`GridDefinition`] to be used by the [`MapGenerator`].
    pub fn with_grid(self, grid: GridDefinition) -> GeneratorBuilder<Set, Set, T> {
        GeneratorBuilder {
            grid: Some(grid),

            tileset: self.tileset,
            rng_mode: self.rng_mode,
            observers: self.observers,

            typestate: PhantomData,
        }
    }
}

impl<G, S, T: Terrain> GeneratorBuilder<G, S, T> {
    /// Specifies the [`RngMode`] to be used by the [`MapGenerator`]. Defaults to [`RngMode::RandomSeed`].
    pub fn with_rng(mut self, rng_mode: RngMode) -> Self {
        self.rng_mode = rng_mode;
        self
    }
}

impl<T: Terrain> GeneratorBuilder<Set, Set, T> {
    /// Adds a [`QueuedStatefulObserver`] to the future [`MapGenerator`]
    pub fn add_queued_stateful_observer(&mut self) -> QueuedStatefulObserver<T> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.observers.push(sender);
        let grid = self.grid.clone().unwrap(); // We know that self.grid is `Some` thanks to the typing.
        QueuedStatefulObserver::create(receiver, &grid)
    }

    /// Adds a [`QueuedObserver`] to the future [`MapGenerator`]
    pub fn add_queued_observer(&mut self) -> QueuedObserver<T> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.observers.push(sender);
        QueuedObserver::create(receiver)
    }

    /// Instantiates a [`MapGenerator`] as specified by the various builder parameters.
    pub fn build(self) -> MapGenerator<T> {
        // We know that self.tileset and self.grid are `Some` thanks to the typing.
        let tileset = self.tileset.unwrap();
        let grid = self.grid.unwrap();
        MapGenerator::create(tileset, grid, self.rng_mode, self.observers)
    }
}
