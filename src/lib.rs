//! Terrain autotiling for 2d tile maps.
//!
//! A [`tileset::TileSet`] holds the terrain types of a map, the transition rules telling which type may blend into which, and the blend images for each transition. A [`generator::MapGenerator`] walks a grid in raster order and, for each cell, resolves a [`transition::TransitionType`] and a pair of terrain types from the three already generated neighbours of the cell.

use std::{fmt, hash::Hash};

/// Defines a [`generator::MapGenerator`] and its builder & observers
pub mod generator;
/// Defines [`grid::GridDefinition`] and [`grid::GridData`]
pub mod grid;
/// Defines the decision tables used to resolve the shape and the types of a cell
pub mod resolver;
/// Defines the [`tileset::TileSet`] transition rules graph and its blend images
pub mod tileset;
/// Defines [`transition::TransitionType`] and the corner model of the transition shapes
pub mod transition;

/// Identifier of a terrain type. Any small copyable type can be used, typically a fieldless enum.
pub trait Terrain: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> Terrain for T {}

/// Errors that can occur when building, editing or validating a [`tileset::TileSet`]
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum TileSetError {
    #[error("Tile set has no terrain types")]
    EmptyTypes,
    #[error("Terrain type {0} is listed more than once")]
    DuplicateType(String),
    #[error("Atlas only has {frames} frames for {types} terrain types")]
    NotEnoughFrames { frames: usize, types: usize },
    #[error("Primary type {primary} is not the first terrain type {first}")]
    PrimaryMismatch { primary: String, first: String },
    #[error("Terrain type {0} is not part of the tile set")]
    UnknownType(String),
    #[error("Transitions of the primary type {0} are derived and cannot be edited")]
    PrimaryRulesLocked(String),
    #[error("Terrain type {0} cannot transition into itself")]
    SelfTransition(String),
    #[error("Terrain type {0} has no transition rules entry")]
    MissingRules(String),
    #[error("Transition rules have an entry for {0}, which is not part of the tile set")]
    UnknownRulesEntry(String),
    #[error("Transition from {from} targets {target}, which is not part of the tile set")]
    UnknownTarget { from: String, target: String },
    #[error("Transition from {from} to {target} is listed more than once")]
    DuplicateTarget { from: String, target: String },
    #[error("Transition from {from} to {target} has no way back")]
    AsymmetricTransition { from: String, target: String },
    #[error("Terrain type {0} is not exclusive but cannot transition into the primary type")]
    MissingPrimaryTransition(String),
    #[error("Terrain type {0} has no base image")]
    MissingImage(String),
    #[error("A base image is registered for {0}, which is not part of the tile set")]
    UnknownImage(String),
    #[error("Blend images are stale, they must be regenerated after a transition rules change")]
    StaleBlendImages,
    #[error("Tile set {0} is not valid")]
    InvalidParent(String),
}

/// Errors that can occur while generating a map
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum GenerationError {
    #[error("Tile set {0} is not valid, generation refused")]
    InvalidTileSet(String),
}
