use tracing::warn;

use crate::transition::{EdgeState, TransitionType};

/// Where a cell takes its pair of terrain types from.
///
/// `L` is the left neighbour, `A` the above neighbour, `roll(t)` a random transition target of `t`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GiverStrategy {
    /// `(L.primary, L.secondary)`
    Left,
    /// `(L.secondary, L.primary)`
    LeftInvert,
    /// `(L.secondary, roll(L.secondary))`, left and above holding mirrored pairs
    LeftInvertRandom,
    /// `(A.primary, A.secondary)`
    Above,
    /// `(L.primary, L.primary)`
    Primary,
    /// `(L.primary, roll(L.primary))`
    PrimaryRandom,
    /// `(L.secondary, L.secondary)`
    Secondary,
    /// `(L.secondary, roll(L.secondary))`
    SecondaryRandom,
}

impl GiverStrategy {
    /// Returns `true` if the secondary type of the cell is picked among the transitions of its primary type
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            GiverStrategy::PrimaryRandom
                | GiverStrategy::SecondaryRandom
                | GiverStrategy::LeftInvertRandom
        )
    }
}

/// Picks the [`GiverStrategy`] of a cell for a `shape` returned by [`super::resolve_shape`] with the same neighbours.
///
/// The giver is always the neighbour owning the blend the cell continues:
/// - when left's right edge is split, the cell continues left's blend,
/// - when only above's bottom edge is split, the cell continues above's blend, read through left's pair when `inverse_type` is set,
/// - when both are uniform, the cell starts from the type at its top-left corner, as a uniform tile (`None`) or as the primary type of a new blend (`Outer4`).
///
/// Returns `None` and logs a warning if `shape` cannot follow these neighbours.
pub fn resolve_giver(
    shape: TransitionType,
    left: TransitionType,
    above: TransitionType,
    _above_right: TransitionType,
    inverse_type: bool,
) -> Option<GiverStrategy> {
    let giver = match left.right_edge() {
        EdgeState::SplitFirst => matches!(
            shape,
            TransitionType::Up | TransitionType::Inner3 | TransitionType::Outer1
        )
        .then_some(GiverStrategy::Left),
        EdgeState::SplitSecond => matches!(
            shape,
            TransitionType::Down | TransitionType::Outer3 | TransitionType::Inner1
        )
        .then_some(GiverStrategy::Left),
        left_edge @ (EdgeState::Primary | EdgeState::Secondary) => {
            match (above.bottom_edge(), shape) {
                (EdgeState::SplitFirst, TransitionType::Left | TransitionType::Inner2)
                | (EdgeState::SplitSecond, TransitionType::Right | TransitionType::Outer2) => {
                    Some(if inverse_type {
                        GiverStrategy::LeftInvert
                    } else {
                        GiverStrategy::Above
                    })
                }
                (EdgeState::Primary | EdgeState::Secondary, TransitionType::None) => {
                    Some(match left_edge {
                        EdgeState::Primary => GiverStrategy::Primary,
                        _ => GiverStrategy::Secondary,
                    })
                }
                (EdgeState::Primary | EdgeState::Secondary, TransitionType::Outer4) => {
                    Some(match left_edge {
                        EdgeState::Primary => GiverStrategy::PrimaryRandom,
                        _ if inverse_type => GiverStrategy::LeftInvertRandom,
                        _ => GiverStrategy::SecondaryRandom,
                    })
                }
                _ => None,
            }
        }
    };

    if giver.is_none() {
        warn!(
            "No type giver for shape {} after left {}, above {} (inverse: {})",
            shape, left, above, inverse_type
        );
    }
    giver
}
