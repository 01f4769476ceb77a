use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use tracing::warn;

#[cfg(feature = "debug-traces")]
use tracing::{debug, info};

use crate::{
    transition::{TransitionType, ALL_TRANSITIONS},
    Terrain, TileSetError,
};

use self::{atlas::TileAtlas, blend::TransitionMasks};

/// Defines the [`TileAtlas`] collaborator providing base images
pub mod atlas;
pub(crate) mod blend;

/// Terrain types of a map, the transitions allowed between them and their images.
///
/// The first type given to [`TileSet::new`] is the primary type. Every other type can transition into the primary type, unless it is marked as exclusive with [`TileSet::set_exclusive_transition`]. Transitions are always symmetric.
///
/// A tile set starts invalid: once the transitions are set, [`TileSet::regenerate_images`] then [`TileSet::validate`] must be called before generating a map with it. Any later successful edit makes the set invalid again, a rejected edit keeps it valid.
///
/// ### Example
/// ```
/// use ghx_autotile::tileset::TileSet;
/// use image::{Rgba, RgbaImage};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Biome { Grass, Sand, Water }
///
/// let atlas: Vec<RgbaImage> = [[60, 160, 60], [220, 200, 120], [40, 80, 200]]
///     .iter()
///     .map(|[r, g, b]| RgbaImage::from_pixel(8, 8, Rgba([*r, *g, *b, 255])))
///     .collect();
///
/// let mut tileset = TileSet::new("coast", vec![Biome::Grass, Biome::Sand, Biome::Water], &atlas);
/// tileset.set_exclusive_transition(Biome::Water).unwrap();
/// tileset.add_tile_transition_set(Biome::Water, [Biome::Sand]).unwrap();
/// tileset.regenerate_images();
/// tileset.validate().unwrap();
///
/// assert!(tileset.has_transition(Biome::Sand, Biome::Water));
/// assert!(!tileset.has_transition(Biome::Grass, Biome::Water));
/// ```
#[derive(Clone)]
pub struct TileSet<T: Terrain> {
    name: String,
    types: Vec<T>,
    primary: Option<T>,
    /// `rules[ty]` holds all the types `ty` can transition into, in insertion order
    rules: HashMap<T, Vec<T>>,
    /// Types without an implicit transition with the primary type
    exclusive: HashSet<T>,
    images: HashMap<T, RgbaImage>,
    blend_images: HashMap<(T, T, TransitionType), RgbaImage>,

    valid: bool,
    images_stale: bool,
    last_error: Option<TileSetError>,
}

impl<T: Terrain> TileSet<T> {
    /// Creates a tile set where `types[0]` is the primary type and can transition into every other type.
    ///
    /// The base image of `types[i]` is the frame `i` of `atlas`. Errors (empty or duplicated types, not enough frames) are logged and leave the returned set invalid, see [`TileSet::last_error`].
    pub fn new<A: TileAtlas + ?Sized>(name: impl Into<String>, types: Vec<T>, atlas: &A) -> Self {
        let mut tileset = Self {
            name: name.into(),
            types,
            primary: None,
            rules: HashMap::new(),
            exclusive: HashSet::new(),
            images: HashMap::new(),
            blend_images: HashMap::new(),
            valid: false,
            images_stale: true,
            last_error: None,
        };
        if let Err(err) = tileset.init(atlas) {
            tileset.reject(err);
        }
        tileset
    }

    fn init<A: TileAtlas + ?Sized>(&mut self, atlas: &A) -> Result<(), TileSetError> {
        let primary = *self.types.first().ok_or(TileSetError::EmptyTypes)?;
        check_unique(&self.types)?;
        self.primary = Some(primary);

        for ty in self.types.iter() {
            self.rules.insert(*ty, Vec::new());
        }
        for ty in self.types.iter().skip(1) {
            add_edge(&mut self.rules, primary, *ty);
        }

        let frames = atlas.frame_count();
        if frames < self.types.len() {
            return Err(TileSetError::NotEnoughFrames {
                frames,
                types: self.types.len(),
            });
        }
        for (index, ty) in self.types.iter().enumerate() {
            let image = atlas
                .frame(index)
                .ok_or(TileSetError::NotEnoughFrames {
                    frames: index,
                    types: self.types.len(),
                })?;
            self.images.insert(*ty, image);
        }

        #[cfg(feature = "debug-traces")]
        info!(
            "Tile set {} created with {} types, primary {:?}",
            self.name,
            self.types.len(),
            primary
        );
        Ok(())
    }

    /// Logs `err` and records it as the last error.
    fn reject(&mut self, err: TileSetError) -> TileSetError {
        warn!("Tile set {}: {}", self.name, err);
        self.last_error = Some(err.clone());
        err
    }

    /// Any edit of the transitions makes the set and its blend images invalid.
    fn invalidate(&mut self) {
        self.valid = false;
        self.images_stale = true;
    }

    /// Checks that `ty` is a non-primary type of the set and returns the primary type.
    fn editable_type(&self, ty: T) -> Result<T, TileSetError> {
        let primary = self.primary.ok_or(TileSetError::EmptyTypes)?;
        if ty == primary {
            return Err(TileSetError::PrimaryRulesLocked(type_name(ty)));
        }
        if !self.contains(ty) {
            return Err(TileSetError::UnknownType(type_name(ty)));
        }
        Ok(primary)
    }

    /// Allows `ty` to transition into each type of `targets`, and each of them to transition into `ty`.
    ///
    /// The primary type is added to the targets unless `ty` is exclusive. Existing transitions are kept, and never duplicated.
    ///
    /// Fails without any change if `ty` is the primary type, if `ty` or one of the targets is not part of the set, or if `ty` is one of its own targets.
    /// A rejected edit only records [`TileSet::last_error`]: a valid set stays valid and can still be used for generation.
    pub fn add_tile_transition_set<I: IntoIterator<Item = T>>(
        &mut self,
        ty: T,
        targets: I,
    ) -> Result<(), TileSetError> {
        let mut targets: Vec<T> = targets.into_iter().collect();
        let primary = match self.check_transition_set(ty, &targets) {
            Ok(primary) => primary,
            Err(err) => return Err(self.reject(err)),
        };

        if !self.exclusive.contains(&ty) && !targets.contains(&primary) {
            targets.push(primary);
        }
        for target in targets {
            add_edge(&mut self.rules, ty, target);
        }
        self.invalidate();

        #[cfg(feature = "debug-traces")]
        debug!("Transitions of {:?}: {:?}", ty, self.rules.get(&ty));
        Ok(())
    }

    fn check_transition_set(&self, ty: T, targets: &[T]) -> Result<T, TileSetError> {
        let primary = self.editable_type(ty)?;
        for target in targets {
            if *target == ty {
                return Err(TileSetError::SelfTransition(type_name(ty)));
            }
            if !self.contains(*target) {
                return Err(TileSetError::UnknownTarget {
                    from: type_name(ty),
                    target: type_name(*target),
                });
            }
        }
        Ok(primary)
    }

    /// Removes the implicit transition between `ty` and the primary type. Does nothing if `ty` is already exclusive.
    pub fn set_exclusive_transition(&mut self, ty: T) -> Result<(), TileSetError> {
        let primary = match self.editable_type(ty) {
            Ok(primary) => primary,
            Err(err) => return Err(self.reject(err)),
        };
        if !self.exclusive.insert(ty) {
            return Ok(());
        }
        remove_one(self.rules.entry(ty).or_default(), primary);
        remove_one(self.rules.entry(primary).or_default(), ty);
        self.invalidate();
        Ok(())
    }

    /// Restores the implicit transition between `ty` and the primary type. Does nothing if `ty` is not exclusive.
    pub fn remove_exclusive_transition(&mut self, ty: T) -> Result<(), TileSetError> {
        let primary = match self.editable_type(ty) {
            Ok(primary) => primary,
            Err(err) => return Err(self.reject(err)),
        };
        if !self.exclusive.remove(&ty) {
            return Ok(());
        }
        add_edge(&mut self.rules, ty, primary);
        self.invalidate();
        Ok(())
    }

    /// Rebuilds the blend images: for each transition `(ty, target)` and each shape other than [`TransitionType::None`], the base image of `target` is blended over the base image of `ty` through the shape mask.
    ///
    /// Blend images of removed transitions are dropped. Calling this twice in a row gives the same images.
    pub fn regenerate_images(&mut self) {
        let mut masks: HashMap<(u32, u32), TransitionMasks> = HashMap::new();
        self.blend_images.clear();

        for ty in self.types.iter() {
            let (Some(base), Some(targets)) = (self.images.get(ty), self.rules.get(ty)) else {
                continue;
            };
            let tile_masks = masks
                .entry(base.dimensions())
                .or_insert_with(|| TransitionMasks::new(base.width(), base.height()));
            for target in targets {
                let Some(overlay) = self.images.get(target) else {
                    warn!(
                        "Tile set {}: no base image for {:?}, skipping its blend images",
                        self.name, target
                    );
                    continue;
                };
                for shape in ALL_TRANSITIONS
                    .iter()
                    .filter(|shape| **shape != TransitionType::None)
                {
                    let image = blend::composite(base, overlay, tile_masks.get(*shape));
                    self.blend_images.insert((*ty, *target, *shape), image);
                }
            }
        }
        self.images_stale = false;

        #[cfg(feature = "debug-traces")]
        info!(
            "Tile set {}: {} blend images generated",
            self.name,
            self.blend_images.len()
        );
    }

    /// Checks the tile set, stopping at the first broken rule. The set can be used for generation once this succeeds.
    pub fn validate(&mut self) -> Result<(), TileSetError> {
        match self.check() {
            Ok(()) => {
                self.valid = true;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.valid = false;
                Err(self.reject(err))
            }
        }
    }

    fn check(&self) -> Result<(), TileSetError> {
        let first = *self.types.first().ok_or(TileSetError::EmptyTypes)?;
        check_unique(&self.types)?;
        match self.primary {
            Some(primary) if primary == first => (),
            primary => {
                return Err(TileSetError::PrimaryMismatch {
                    primary: primary.map(type_name).unwrap_or_default(),
                    first: type_name(first),
                })
            }
        }

        for ty in self.types.iter() {
            if !self.rules.contains_key(ty) {
                return Err(TileSetError::MissingRules(type_name(*ty)));
            }
        }
        for ty in self.rules.keys() {
            if !self.contains(*ty) {
                return Err(TileSetError::UnknownRulesEntry(type_name(*ty)));
            }
        }

        for ty in self.types.iter() {
            let targets = self.transitions(*ty).unwrap_or_default();
            let mut seen = HashSet::with_capacity(targets.len());
            for target in targets {
                if target == ty {
                    return Err(TileSetError::SelfTransition(type_name(*ty)));
                }
                if !self.contains(*target) {
                    return Err(TileSetError::UnknownTarget {
                        from: type_name(*ty),
                        target: type_name(*target),
                    });
                }
                if !seen.insert(*target) {
                    return Err(TileSetError::DuplicateTarget {
                        from: type_name(*ty),
                        target: type_name(*target),
                    });
                }
                if !self.has_transition(*target, *ty) {
                    return Err(TileSetError::AsymmetricTransition {
                        from: type_name(*ty),
                        target: type_name(*target),
                    });
                }
            }
        }

        for ty in self.types.iter().skip(1) {
            if !self.exclusive.contains(ty) && !self.has_transition(*ty, first) {
                return Err(TileSetError::MissingPrimaryTransition(type_name(*ty)));
            }
        }

        for ty in self.types.iter() {
            if !self.images.contains_key(ty) {
                return Err(TileSetError::MissingImage(type_name(*ty)));
            }
        }
        for ty in self.images.keys() {
            if !self.contains(*ty) {
                return Err(TileSetError::UnknownImage(type_name(*ty)));
            }
        }

        if self.images_stale {
            return Err(TileSetError::StaleBlendImages);
        }
        Ok(())
    }

    /// Creates a new valid tile set restricted to `subset`, whose first type becomes the primary type.
    ///
    /// Transitions between kept types are kept, exclusivity of kept types is kept, and every non-exclusive type gets a transition with the new primary type. Fails if this set is not valid, or if `subset` is empty, has duplicates or contains a type not in this set.
    pub fn generate_sub_set(
        &self,
        name: impl Into<String>,
        subset: &[T],
    ) -> Result<TileSet<T>, TileSetError> {
        let name = name.into();
        let sub_set = self.restrict(name.clone(), subset).and_then(|mut sub_set| {
            sub_set.regenerate_images();
            sub_set.validate().map(|_| sub_set)
        });
        if let Err(err) = &sub_set {
            warn!("Sub set {} of tile set {}: {}", name, self.name, err);
        }
        sub_set
    }

    fn restrict(&self, name: String, subset: &[T]) -> Result<TileSet<T>, TileSetError> {
        if !self.valid {
            return Err(TileSetError::InvalidParent(self.name.clone()));
        }
        let primary = *subset.first().ok_or(TileSetError::EmptyTypes)?;
        check_unique(subset)?;
        if let Some(ty) = subset.iter().find(|ty| !self.contains(**ty)) {
            return Err(TileSetError::UnknownType(type_name(*ty)));
        }

        let mut rules = HashMap::with_capacity(subset.len());
        for ty in subset {
            let targets = self
                .transitions(*ty)
                .unwrap_or_default()
                .iter()
                .filter(|target| subset.contains(target))
                .copied()
                .collect::<Vec<_>>();
            rules.insert(*ty, targets);
        }
        let exclusive: HashSet<T> = subset
            .iter()
            .skip(1)
            .filter(|ty| self.exclusive.contains(*ty))
            .copied()
            .collect();
        for ty in subset.iter().skip(1) {
            if !exclusive.contains(ty) {
                add_edge(&mut rules, primary, *ty);
            }
        }
        let images = subset
            .iter()
            .filter_map(|ty| self.images.get(ty).map(|image| (*ty, image.clone())))
            .collect();

        Ok(TileSet {
            name,
            types: subset.to_vec(),
            primary: Some(primary),
            rules,
            exclusive,
            images,
            blend_images: HashMap::new(),
            valid: false,
            images_stale: true,
            last_error: None,
        })
    }

    /// Returns the name of the tile set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the terrain types of the set, the primary type first
    pub fn types(&self) -> &[T] {
        &self.types
    }

    /// Returns the primary type, `None` only if the set was created without any type
    pub fn primary_type(&self) -> Option<T> {
        self.primary
    }

    /// Returns `true` if the last call to [`TileSet::validate`] succeeded and nothing changed since
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the last error met while creating, editing or validating the set
    pub fn last_error(&self) -> Option<&TileSetError> {
        self.last_error.as_ref()
    }

    /// Returns `true` if `ty` is one of the terrain types of the set
    pub fn contains(&self, ty: T) -> bool {
        self.types.contains(&ty)
    }

    /// Returns the types `ty` can transition into, or `None` if `ty` has no rules entry
    pub fn transitions(&self, ty: T) -> Option<&[T]> {
        self.rules.get(&ty).map(|targets| targets.as_slice())
    }

    /// Returns `true` if `from` can transition into `to`
    pub fn has_transition(&self, from: T, to: T) -> bool {
        self.rules
            .get(&from)
            .map_or(false, |targets| targets.contains(&to))
    }

    /// Returns `true` if `ty` has no implicit transition with the primary type
    pub fn is_exclusive(&self, ty: T) -> bool {
        self.exclusive.contains(&ty)
    }

    /// Returns the base image of `ty`, sliced from the atlas
    pub fn base_image(&self, ty: T) -> Option<&RgbaImage> {
        self.images.get(&ty)
    }

    /// Returns the image of a tile showing `primary`, blended with `secondary` as `shape`.
    ///
    /// Logs a warning and returns `None` when there is no such image: same types, no transition between them, [`TransitionType::None`] shape or stale blend images.
    pub fn blend_image(&self, primary: T, secondary: T, shape: TransitionType) -> Option<&RgbaImage> {
        let reason = if primary == secondary {
            "a type does not blend with itself"
        } else if shape == TransitionType::None {
            "NONE is not a blend shape"
        } else if !self.has_transition(primary, secondary) {
            "no transition between these types"
        } else if self.images_stale {
            "blend images are stale"
        } else {
            return self.blend_images.get(&(primary, secondary, shape));
        };
        warn!(
            "Tile set {}: no blend image for {:?} into {:?} as {}, {}",
            self.name, primary, secondary, shape, reason
        );
        None
    }

    /// Returns the number of blend images currently generated
    pub fn blend_images_count(&self) -> usize {
        self.blend_images.len()
    }

    /// Test helper breaking the rules table on purpose
    #[cfg(test)]
    pub(crate) fn rules_mut(&mut self) -> &mut HashMap<T, Vec<T>> {
        &mut self.rules
    }

    /// Test helper breaking the base images on purpose
    #[cfg(test)]
    pub(crate) fn images_mut(&mut self) -> &mut HashMap<T, RgbaImage> {
        &mut self.images
    }
}

fn type_name<T: Terrain>(ty: T) -> String {
    format!("{:?}", ty)
}

fn check_unique<T: Terrain>(types: &[T]) -> Result<(), TileSetError> {
    let mut seen = HashSet::with_capacity(types.len());
    match types.iter().find(|ty| !seen.insert(**ty)) {
        Some(ty) => Err(TileSetError::DuplicateType(type_name(*ty))),
        None => Ok(()),
    }
}

/// Adds the symmetric transition between `a` and `b`, if missing.
fn add_edge<T: Terrain>(rules: &mut HashMap<T, Vec<T>>, a: T, b: T) {
    for (from, to) in [(a, b), (b, a)] {
        let targets = rules.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }
}

fn remove_one<T: Terrain>(targets: &mut Vec<T>, ty: T) {
    if let Some(position) = targets.iter().position(|target| *target == ty) {
        targets.remove(position);
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::{transition::TransitionType, TileSetError};

    use super::TileSet;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Biome {
        Grass,
        Sand,
        Water,
        Rock,
    }

    const ALL_BIOMES: [Biome; 4] = [Biome::Grass, Biome::Sand, Biome::Water, Biome::Rock];

    fn atlas(count: usize) -> Vec<RgbaImage> {
        (0..count)
            .map(|i| RgbaImage::from_pixel(4, 4, Rgba([40 * i as u8, 100, 200, 255])))
            .collect()
    }

    fn coast() -> TileSet<Biome> {
        let mut tileset = TileSet::new("coast", ALL_BIOMES.to_vec(), &atlas(4));
        tileset.set_exclusive_transition(Biome::Water).unwrap();
        tileset
            .add_tile_transition_set(Biome::Water, [Biome::Sand])
            .unwrap();
        tileset
            .add_tile_transition_set(Biome::Rock, [Biome::Sand])
            .unwrap();
        tileset.regenerate_images();
        tileset.validate().unwrap();
        tileset
    }

    fn assert_symmetric(tileset: &TileSet<Biome>) {
        for ty in tileset.types() {
            for target in tileset.transitions(*ty).unwrap() {
                assert!(tileset.has_transition(*target, *ty), "{ty:?} -> {target:?}");
            }
        }
    }

    #[test]
    fn primary_transitions_to_every_type() {
        let tileset = TileSet::new("plain", ALL_BIOMES.to_vec(), &atlas(4));
        assert_eq!(tileset.primary_type(), Some(Biome::Grass));
        assert_eq!(
            tileset.transitions(Biome::Grass).unwrap(),
            &[Biome::Sand, Biome::Water, Biome::Rock]
        );
        assert_eq!(tileset.transitions(Biome::Water).unwrap(), &[Biome::Grass]);
        assert!(!tileset.is_valid());
        assert_symmetric(&tileset);
    }

    #[test]
    fn not_enough_frames_is_reported() {
        let tileset = TileSet::new("short", ALL_BIOMES.to_vec(), &atlas(2));
        assert!(!tileset.is_valid());
        assert_eq!(
            tileset.last_error(),
            Some(&TileSetError::NotEnoughFrames {
                frames: 2,
                types: 4
            })
        );

        let empty = TileSet::<Biome>::new("empty", Vec::new(), &atlas(2));
        assert_eq!(empty.last_error(), Some(&TileSetError::EmptyTypes));
        assert_eq!(empty.primary_type(), None);
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut tileset = coast();
        let before = tileset.transitions(Biome::Sand).unwrap().to_vec();

        assert_eq!(
            tileset.add_tile_transition_set(Biome::Grass, [Biome::Sand]),
            Err(TileSetError::PrimaryRulesLocked("Grass".to_string()))
        );
        assert_eq!(
            tileset.add_tile_transition_set(Biome::Sand, [Biome::Water, Biome::Sand]),
            Err(TileSetError::SelfTransition("Sand".to_string()))
        );
        assert_eq!(
            tileset.set_exclusive_transition(Biome::Grass),
            Err(TileSetError::PrimaryRulesLocked("Grass".to_string()))
        );
        assert_eq!(tileset.transitions(Biome::Sand).unwrap(), before.as_slice());
        assert!(tileset.is_valid());
        assert_eq!(
            tileset.last_error(),
            Some(&TileSetError::PrimaryRulesLocked("Grass".to_string()))
        );
    }

    #[test]
    fn unknown_types_are_rejected() {
        let mut tileset = TileSet::new("small", vec![Biome::Grass, Biome::Sand], &atlas(2));
        assert_eq!(
            tileset.add_tile_transition_set(Biome::Water, [Biome::Sand]),
            Err(TileSetError::UnknownType("Water".to_string()))
        );
        assert_eq!(
            tileset.add_tile_transition_set(Biome::Sand, [Biome::Rock]),
            Err(TileSetError::UnknownTarget {
                from: "Sand".to_string(),
                target: "Rock".to_string()
            })
        );
    }

    #[test]
    fn transitions_are_symmetric_and_unique() {
        let mut tileset = coast();
        tileset
            .add_tile_transition_set(Biome::Rock, [Biome::Sand, Biome::Water])
            .unwrap();
        assert_eq!(
            tileset.transitions(Biome::Rock).unwrap(),
            &[Biome::Grass, Biome::Sand, Biome::Water]
        );
        assert_eq!(
            tileset.transitions(Biome::Water).unwrap(),
            &[Biome::Sand, Biome::Rock]
        );
        assert_symmetric(&tileset);
        // Edits invalidate the set and its blend images
        assert!(!tileset.is_valid());
        assert_eq!(tileset.validate(), Err(TileSetError::StaleBlendImages));
    }

    #[test]
    fn exclusive_toggle() {
        let mut tileset = coast();
        assert!(tileset.is_exclusive(Biome::Water));
        assert!(!tileset.has_transition(Biome::Grass, Biome::Water));

        tileset.remove_exclusive_transition(Biome::Water).unwrap();
        assert!(tileset.has_transition(Biome::Grass, Biome::Water));
        assert!(tileset.has_transition(Biome::Water, Biome::Grass));

        tileset.set_exclusive_transition(Biome::Water).unwrap();
        tileset.set_exclusive_transition(Biome::Water).unwrap();
        assert!(!tileset.has_transition(Biome::Grass, Biome::Water));
        assert!(!tileset.has_transition(Biome::Water, Biome::Grass));
        assert!(tileset.has_transition(Biome::Water, Biome::Sand));
        assert_symmetric(&tileset);
    }

    #[test]
    fn validation_names_the_broken_rule() {
        let mut tileset = coast();
        tileset.rules_mut().remove(&Biome::Rock);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::MissingRules("Rock".to_string()))
        );
        assert!(!tileset.is_valid());

        let mut tileset = coast();
        tileset
            .rules_mut()
            .get_mut(&Biome::Sand)
            .unwrap()
            .push(Biome::Sand);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::SelfTransition("Sand".to_string()))
        );

        let mut tileset = coast();
        tileset
            .rules_mut()
            .get_mut(&Biome::Sand)
            .unwrap()
            .push(Biome::Water);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::DuplicateTarget {
                from: "Sand".to_string(),
                target: "Water".to_string()
            })
        );

        let mut tileset = coast();
        tileset
            .rules_mut()
            .get_mut(&Biome::Rock)
            .unwrap()
            .retain(|ty| *ty != Biome::Grass);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::AsymmetricTransition {
                from: "Grass".to_string(),
                target: "Rock".to_string()
            })
        );
    }

    #[test]
    fn validation_checks_primary_transitions() {
        let mut tileset = coast();
        tileset
            .rules_mut()
            .get_mut(&Biome::Rock)
            .unwrap()
            .retain(|ty| *ty != Biome::Grass);
        tileset
            .rules_mut()
            .get_mut(&Biome::Grass)
            .unwrap()
            .retain(|ty| *ty != Biome::Rock);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::MissingPrimaryTransition("Rock".to_string()))
        );

        // Exclusive types may miss it
        let mut tileset = coast();
        assert!(!tileset.has_transition(Biome::Water, Biome::Grass));
        assert!(tileset.validate().is_ok());

        let mut tileset = coast();
        tileset.primary = Some(Biome::Sand);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::PrimaryMismatch {
                primary: "Sand".to_string(),
                first: "Grass".to_string()
            })
        );
    }

    #[test]
    fn validation_checks_entries_of_unknown_types() {
        let small = || {
            let mut tileset = TileSet::new("small", vec![Biome::Grass, Biome::Sand], &atlas(2));
            tileset.regenerate_images();
            tileset.validate().unwrap();
            tileset
        };

        let mut tileset = small();
        tileset.rules_mut().insert(Biome::Water, Vec::new());
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::UnknownRulesEntry("Water".to_string()))
        );

        let mut tileset = small();
        tileset
            .images_mut()
            .insert(Biome::Rock, RgbaImage::new(4, 4));
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::UnknownImage("Rock".to_string()))
        );
        assert!(!tileset.is_valid());
    }

    #[test]
    fn validation_checks_base_images() {
        let mut tileset = coast();
        tileset.images_mut().remove(&Biome::Sand);
        assert_eq!(
            tileset.validate(),
            Err(TileSetError::MissingImage("Sand".to_string()))
        );
        assert_eq!(
            tileset.last_error(),
            Some(&TileSetError::MissingImage("Sand".to_string()))
        );
    }

    #[test]
    fn blend_images_cover_every_transition() {
        let tileset = coast();
        // 4 symmetric transitions, 12 shapes per direction
        assert_eq!(tileset.blend_images_count(), 4 * 2 * 12);
        assert!(tileset
            .blend_image(Biome::Sand, Biome::Water, TransitionType::Outer4)
            .is_some());
        assert!(tileset
            .blend_image(Biome::Grass, Biome::Water, TransitionType::Outer4)
            .is_none());
        assert!(tileset
            .blend_image(Biome::Sand, Biome::Sand, TransitionType::Up)
            .is_none());
        assert!(tileset
            .blend_image(Biome::Sand, Biome::Grass, TransitionType::None)
            .is_none());
    }

    #[test]
    fn regenerate_images_is_idempotent() {
        let mut tileset = coast();
        let first = tileset
            .blend_image(Biome::Grass, Biome::Sand, TransitionType::Inner3)
            .unwrap()
            .clone();
        let count = tileset.blend_images_count();

        tileset.regenerate_images();
        assert_eq!(tileset.blend_images_count(), count);
        assert_eq!(
            tileset.blend_image(Biome::Grass, Biome::Sand, TransitionType::Inner3),
            Some(&first)
        );
    }

    #[test]
    fn removed_transitions_lose_their_images() {
        let mut tileset = coast();
        tileset.set_exclusive_transition(Biome::Rock).unwrap();
        assert!(tileset
            .blend_image(Biome::Rock, Biome::Grass, TransitionType::Up)
            .is_none());
        tileset.regenerate_images();
        tileset.validate().unwrap();
        assert_eq!(tileset.blend_images_count(), 3 * 2 * 12);
    }

    #[test]
    fn sub_set_keeps_inner_transitions() {
        let tileset = coast();
        let shore = tileset
            .generate_sub_set("shore", &[Biome::Sand, Biome::Water])
            .unwrap();
        assert!(shore.is_valid());
        assert_eq!(shore.primary_type(), Some(Biome::Sand));
        assert_eq!(shore.transitions(Biome::Water).unwrap(), &[Biome::Sand]);
        assert_eq!(shore.transitions(Biome::Sand).unwrap(), &[Biome::Water]);
        assert_eq!(shore.blend_images_count(), 2 * 12);
        assert_eq!(
            shore.base_image(Biome::Water),
            tileset.base_image(Biome::Water)
        );
        assert!(shore.base_image(Biome::Water).is_some());
        assert!(shore.base_image(Biome::Grass).is_none());
    }

    #[test]
    fn sub_set_of_every_type_is_the_same_graph() {
        let tileset = coast();
        let copy = tileset.generate_sub_set("copy", &ALL_BIOMES).unwrap();
        for ty in ALL_BIOMES {
            assert_eq!(copy.transitions(ty), tileset.transitions(ty));
            assert_eq!(copy.is_exclusive(ty), tileset.is_exclusive(ty));
        }
        assert_eq!(copy.blend_images_count(), tileset.blend_images_count());
    }

    #[test]
    fn sub_set_errors() {
        let tileset = coast();
        assert_eq!(
            tileset.generate_sub_set("none", &[]).err(),
            Some(TileSetError::EmptyTypes)
        );
        assert_eq!(
            tileset
                .generate_sub_set("twice", &[Biome::Sand, Biome::Sand])
                .err(),
            Some(TileSetError::DuplicateType("Sand".to_string()))
        );

        let small = TileSet::new("small", vec![Biome::Grass, Biome::Sand], &atlas(2));
        assert_eq!(
            small.generate_sub_set("sub", &[Biome::Grass]).err(),
            Some(TileSetError::InvalidParent("small".to_string()))
        );
    }
}
