use crate::{generator::GeneratedTile, Terrain};

pub use self::{
    giver::{resolve_giver, GiverStrategy},
    shape::resolve_shape,
};

/// Defines [`GiverStrategy`] and the table used to pick the types of a cell
pub mod giver;
/// Defines the table used to pick the [`crate::transition::TransitionType`] of a cell
pub mod shape;

/// Type-level relations between the already generated neighbours of a cell.
///
/// The resolvers only see shapes, these flags carry what they need to know about the terrain types.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NeighbourFlags {
    /// The left, above and above-right neighbours together use at most two terrain types
    pub all_match: bool,
    /// The above and above-right neighbours together use at most two terrain types
    pub above_match: bool,
    /// The left and above neighbours hold the same two terrain types, with primary and secondary swapped
    pub inverse_type: bool,
}

impl NeighbourFlags {
    /// Computes the flags of a cell from the type pairs of its neighbours
    pub fn from_neighbours<T: Terrain>(
        left: &GeneratedTile<T>,
        above: &GeneratedTile<T>,
        above_right: &GeneratedTile<T>,
    ) -> Self {
        Self {
            all_match: distinct_types(&[left, above, above_right]) <= 2,
            above_match: distinct_types(&[above, above_right]) <= 2,
            inverse_type: left.primary != left.secondary
                && left.primary == above.secondary
                && left.secondary == above.primary,
        }
    }
}

fn distinct_types<T: Terrain>(tiles: &[&GeneratedTile<T>]) -> usize {
    let mut types: Vec<T> = Vec::with_capacity(2 * tiles.len());
    for tile in tiles {
        for ty in [tile.primary, tile.secondary] {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
    }
    types.len()
}

#[cfg(test)]
mod tests {
    use crate::{generator::GeneratedTile, transition::TransitionType};

    use super::NeighbourFlags;

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    enum Biome {
        Grass,
        Sand,
        Water,
    }

    fn tile(primary: Biome, secondary: Biome, shape: TransitionType) -> GeneratedTile<Biome> {
        GeneratedTile {
            primary,
            secondary,
            shape,
        }
    }

    #[test]
    fn flags_on_two_types() {
        let left = tile(Biome::Grass, Biome::Sand, TransitionType::Right);
        let above = tile(Biome::Grass, Biome::Sand, TransitionType::Down);
        let above_right = tile(Biome::Sand, Biome::Sand, TransitionType::None);
        let flags = NeighbourFlags::from_neighbours(&left, &above, &above_right);
        assert!(flags.all_match);
        assert!(flags.above_match);
        assert!(!flags.inverse_type);
    }

    #[test]
    fn flags_on_three_types() {
        let left = tile(Biome::Grass, Biome::Sand, TransitionType::Right);
        let above = tile(Biome::Grass, Biome::Sand, TransitionType::Down);
        let above_right = tile(Biome::Sand, Biome::Water, TransitionType::Outer3);
        let flags = NeighbourFlags::from_neighbours(&left, &above, &above_right);
        assert!(!flags.all_match);
        assert!(!flags.above_match);

        let above_right = tile(Biome::Grass, Biome::Grass, TransitionType::None);
        let left = tile(Biome::Water, Biome::Water, TransitionType::None);
        let flags = NeighbourFlags::from_neighbours(&left, &above, &above_right);
        assert!(!flags.all_match);
        assert!(flags.above_match);
    }

    #[test]
    fn inverse_needs_a_mirrored_blend() {
        let left = tile(Biome::Sand, Biome::Grass, TransitionType::Left);
        let above = tile(Biome::Grass, Biome::Sand, TransitionType::Down);
        let same = tile(Biome::Grass, Biome::Sand, TransitionType::Up);
        assert!(NeighbourFlags::from_neighbours(&left, &above, &same).inverse_type);
        assert!(!NeighbourFlags::from_neighbours(&above, &same, &same).inverse_type);

        let uniform = tile(Biome::Grass, Biome::Grass, TransitionType::None);
        assert!(!NeighbourFlags::from_neighbours(&uniform, &uniform, &uniform).inverse_type);
    }
}
