use crate::{
    grid::{GridData, GridDefinition},
    Terrain,
};

use super::{GeneratedTile, GridTile, MapGenerator};

/// Update sent by a [`MapGenerator`] to its observers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationUpdate<T> {
    /// A tile has been generated
    Generated(GridTile<T>),
    /// The map is complete
    Done,
    /// The tile set was not valid, nothing was generated
    Refused,
}

/// Observer with a queue of the [`GenerationUpdate`] sent by the generator, keeping its own copy of the map being generated.
pub struct QueuedStatefulObserver<T: Terrain> {
    grid_data: GridData<Option<GeneratedTile<T>>>,
    receiver: crossbeam_channel::Receiver<GenerationUpdate<T>>,
}

impl<T: Terrain> QueuedStatefulObserver<T> {
    /// Creates a new [`QueuedStatefulObserver`] for a given [`MapGenerator`]
    pub fn new(generator: &mut MapGenerator<T>) -> Self {
        let receiver = generator.add_observer_queue();
        QueuedStatefulObserver::create(receiver, generator.grid())
    }

    pub(crate) fn create(
        receiver: crossbeam_channel::Receiver<GenerationUpdate<T>>,
        grid: &GridDefinition,
    ) -> Self {
        QueuedStatefulObserver {
            grid_data: grid.new_grid_data(None),
            receiver,
        }
    }

    /// Returns a reference to the observer's grid data
    pub fn grid_data(&self) -> &GridData<Option<GeneratedTile<T>>> {
        &self.grid_data
    }

    /// Updates the internal state of the observer by dequeuing all queued updates.
    pub fn dequeue_all(&mut self) {
        while let Ok(update) = self.receiver.try_recv() {
            self.apply(&update);
        }
    }

    /// Updates the internal state of the observer by dequeuing 1 queued update.
    ///
    /// Returns [`Some(GenerationUpdate)`] if there was an update to process, else returns `None`.
    pub fn dequeue_one(&mut self) -> Option<GenerationUpdate<T>> {
        match self.receiver.try_recv() {
            Ok(update) => {
                self.apply(&update);
                Some(update)
            }
            Err(_) => None,
        }
    }

    fn apply(&mut self, update: &GenerationUpdate<T>) {
        match update {
            GenerationUpdate::Generated(grid_tile) => {
                // A new map starts at cell 0
                if grid_tile.node_index == 0 {
                    self.grid_data.reset(None);
                }
                self.grid_data
                    .set(grid_tile.node_index, Some(grid_tile.tile))
            }
            GenerationUpdate::Done => (),
            GenerationUpdate::Refused => self.grid_data.reset(None),
        }
    }
}

/// Observer with a queue of the [`GenerationUpdate`] sent by the generator
pub struct QueuedObserver<T: Terrain> {
    receiver: crossbeam_channel::Receiver<GenerationUpdate<T>>,
}

impl<T: Terrain> QueuedObserver<T> {
    /// Creates a new [`QueuedObserver`] for a given [`MapGenerator`]
    pub fn new(generator: &mut MapGenerator<T>) -> Self {
        let receiver = generator.add_observer_queue();
        QueuedObserver { receiver }
    }

    pub(crate) fn create(receiver: crossbeam_channel::Receiver<GenerationUpdate<T>>) -> Self {
        QueuedObserver { receiver }
    }

    /// Dequeues all queued updates.
    ///
    /// Returns all retrieved [`GenerationUpdate`] in a `Vec`.
    /// The `Vec` may be empty if no update was queued.
    pub fn dequeue_all(&mut self) -> Vec<GenerationUpdate<T>> {
        self.receiver.try_iter().collect()
    }

    /// Dequeues 1 queued update.
    ///
    /// Returns [`Some(GenerationUpdate)`] if there was an update to process, else returns `None`.
    pub fn dequeue_one(&mut self) -> Option<GenerationUpdate<T>> {
        self.receiver.try_recv().ok()
    }
}
