use rand::Rng;
use tracing::warn;

#[cfg(feature = "debug-traces")]
use tracing::trace;

use crate::transition::{Corner, EdgeState, TransitionType};

use super::NeighbourFlags;

/// Picks the [`TransitionType`] of a cell from the shapes of its already generated neighbours.
///
/// The top-left, top-right and bottom-left corners of the cell are shared with `left` and `above`, only the bottom-right corner is free. When both values of this corner are possible, `rng.gen_bool(0.5)` decides, `true` being the first listed branch:
/// - left's right edge is uniform and above's bottom edge is uniform: `Outer4` or `None`
/// - left's right edge is uniform and above's bottom edge is split: `Left` or `Inner2`, `Right` or `Outer2`. The second shape needs `flags.above_match`, else the first one is returned
/// - left's right edge is split: `Up` or `Inner3`, `Down` or `Outer3` when above's bottom edge is uniform. The first shape needs `flags.all_match`, else the second one is returned without looking further at `above`. When above's bottom edge is split, the cell closes the blend with `Outer1` or `Inner1`
///
/// Combinations where the corners of `left` and `above` cannot belong to the same map are reported with a warning and resolve to [`TransitionType::None`].
///
/// ### Example
/// ```
/// use ghx_autotile::{resolver::{resolve_shape, NeighbourFlags}, transition::TransitionType};
/// use rand::rngs::mock::StepRng;
///
/// // StepRng(0, 0) always takes the first branch
/// let mut rng = StepRng::new(0, 0);
/// let flags = NeighbourFlags { all_match: true, above_match: true, inverse_type: false };
/// let shape = resolve_shape(TransitionType::Outer4, TransitionType::None, TransitionType::None, flags, &mut rng);
/// assert_eq!(shape, TransitionType::Down);
/// ```
pub fn resolve_shape<R: Rng + ?Sized>(
    left: TransitionType,
    above: TransitionType,
    above_right: TransitionType,
    flags: NeighbourFlags,
    rng: &mut R,
) -> TransitionType {
    let resolved = match left {
        TransitionType::None
        | TransitionType::Left
        | TransitionType::Outer1
        | TransitionType::Outer3 => after_uniform_left(false, above, flags, rng),
        TransitionType::Right | TransitionType::Inner1 | TransitionType::Inner3 => {
            after_uniform_left(true, above, flags, rng)
        }
        TransitionType::Up | TransitionType::Outer2 | TransitionType::Inner4 => {
            after_split_top_left(above, flags, rng)
        }
        TransitionType::Down | TransitionType::Outer4 | TransitionType::Inner2 => {
            after_split_bottom_left(above, flags, rng)
        }
    };

    match resolved {
        Some(shape) => {
            #[cfg(feature = "debug-traces")]
            trace!(
                "Shape {} after left {}, above {}, above right {}, {:?}",
                shape,
                left,
                above,
                above_right,
                flags
            );
            shape
        }
        None => {
            warn!(
                "Impossible neighbourhood: left {}, above {}, above right {}, {:?}",
                left, above, above_right, flags
            );
            TransitionType::None
        }
    }
}

/// Left's right edge shows a single type: the top-left and bottom-left corners of the cell are equal.
fn after_uniform_left<R: Rng + ?Sized>(
    left_secondary: bool,
    above: TransitionType,
    flags: NeighbourFlags,
    rng: &mut R,
) -> Option<TransitionType> {
    if flags.inverse_type {
        // Mirrored pairs: above's bottom-left corner must show the other role of the shared type
        let above_secondary = above.is_secondary_at(Corner::BottomLeft);
        if above_secondary == left_secondary {
            return None;
        }
    }

    let shape = match above.bottom_edge() {
        EdgeState::Primary | EdgeState::Secondary => {
            if rng.gen_bool(0.5) {
                TransitionType::Outer4
            } else {
                TransitionType::None
            }
        }
        EdgeState::SplitFirst => {
            if !flags.above_match || rng.gen_bool(0.5) {
                TransitionType::Left
            } else {
                TransitionType::Inner2
            }
        }
        EdgeState::SplitSecond => {
            if !flags.above_match || rng.gen_bool(0.5) {
                TransitionType::Right
            } else {
                TransitionType::Outer2
            }
        }
    };
    Some(shape)
}

/// Left's right edge shows its secondary type at the top only.
fn after_split_top_left<R: Rng + ?Sized>(
    above: TransitionType,
    flags: NeighbourFlags,
    rng: &mut R,
) -> Option<TransitionType> {
    match above.bottom_edge() {
        EdgeState::Primary | EdgeState::Secondary if flags.all_match => {
            // The top corners must show left's secondary type
            if !above_matches_corner(above, EdgeState::Secondary, flags.inverse_type) {
                return None;
            }
            if rng.gen_bool(0.5) {
                Some(TransitionType::Up)
            } else {
                Some(TransitionType::Inner3)
            }
        }
        EdgeState::Primary | EdgeState::Secondary => Some(TransitionType::Inner3),
        EdgeState::SplitFirst if !flags.inverse_type => Some(TransitionType::Outer1),
        EdgeState::SplitSecond if flags.inverse_type => Some(TransitionType::Outer1),
        EdgeState::SplitFirst | EdgeState::SplitSecond => None,
    }
}

/// Left's right edge shows its secondary type at the bottom only.
fn after_split_bottom_left<R: Rng + ?Sized>(
    above: TransitionType,
    flags: NeighbourFlags,
    rng: &mut R,
) -> Option<TransitionType> {
    match above.bottom_edge() {
        EdgeState::Primary | EdgeState::Secondary if flags.all_match => {
            // The top corners must show left's primary type
            if !above_matches_corner(above, EdgeState::Primary, flags.inverse_type) {
                return None;
            }
            if rng.gen_bool(0.5) {
                Some(TransitionType::Down)
            } else {
                Some(TransitionType::Outer3)
            }
        }
        EdgeState::Primary | EdgeState::Secondary => Some(TransitionType::Outer3),
        EdgeState::SplitSecond if !flags.inverse_type => Some(TransitionType::Inner1),
        EdgeState::SplitFirst if flags.inverse_type => Some(TransitionType::Inner1),
        EdgeState::SplitFirst | EdgeState::SplitSecond => None,
    }
}

/// Checks that the uniform bottom edge of `above` can show the role `expected` has in left's pair.
///
/// Only meaningful when the neighbours share at most two types. A uniform `above` holds a single type and always matches.
fn above_matches_corner(above: TransitionType, expected: EdgeState, inverse_type: bool) -> bool {
    if above == TransitionType::None {
        return true;
    }
    // With mirrored pairs, the role of the shared type is swapped in above's frame
    (above.bottom_edge() == expected) != inverse_type
}
