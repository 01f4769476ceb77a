use image::{Rgba, RgbaImage};
use ndarray::Array2;

use crate::transition::{TransitionType, ALL_TRANSITIONS};

/// Coverage under which a pixel only shows the base image
const MASK_EDGE_LOW: f32 = 0.35;
/// Coverage over which a pixel only shows the blended image
const MASK_EDGE_HIGH: f32 = 0.65;

/// One coverage mask per [`TransitionType`], for a given tile size.
pub(crate) struct TransitionMasks {
    /// `masks[shape.index()][(y, x)]` is the coverage of the blended type at pixel `(x, y)`, in `[0, 1]`
    masks: Vec<Array2<f32>>,
}

impl TransitionMasks {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            masks: ALL_TRANSITIONS
                .iter()
                .map(|shape| transition_mask(*shape, width, height))
                .collect(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, shape: TransitionType) -> &Array2<f32> {
        &self.masks[shape.index()]
    }
}

/// Bilinear interpolation of the corners of `shape`, sharpened around the middle value.
pub(crate) fn transition_mask(shape: TransitionType, width: u32, height: u32) -> Array2<f32> {
    let [top_left, top_right, bottom_left, bottom_right] =
        shape.corners().map(|covered| if covered { 1.0 } else { 0.0 });
    Array2::from_shape_fn((height as usize, width as usize), |(py, px)| {
        let u = (px as f32 + 0.5) / width as f32;
        let v = (py as f32 + 0.5) / height as f32;
        let top = top_left + (top_right - top_left) * u;
        let bottom = bottom_left + (bottom_right - bottom_left) * u;
        smoothstep(MASK_EDGE_LOW, MASK_EDGE_HIGH, top + (bottom - top) * v)
    })
}

fn smoothstep(edge_low: f32, edge_high: f32, value: f32) -> f32 {
    let t = ((value - edge_low) / (edge_high - edge_low)).clamp(0., 1.);
    t * t * (3. - 2. * t)
}

/// Alpha-composites `overlay` through `mask` over `base`. The output has the size of `base`.
pub(crate) fn composite(base: &RgbaImage, overlay: &RgbaImage, mask: &Array2<f32>) -> RgbaImage {
    RgbaImage::from_fn(base.width(), base.height(), |x, y| {
        let over = overlay
            .get_pixel_checked(x, y)
            .copied()
            .unwrap_or(Rgba([0, 0, 0, 0]));
        let coverage = mask
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(0.);
        blend_pixel(base.get_pixel(x, y), &over, coverage)
    })
}

fn blend_pixel(under: &Rgba<u8>, over: &Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let alpha = coverage * f32::from(over[3]) / 255.;
    let mut blended = [0u8; 4];
    for channel in 0..3 {
        let value = f32::from(under[channel]) * (1. - alpha) + f32::from(over[channel]) * alpha;
        blended[channel] = value.round() as u8;
    }
    blended[3] = (alpha * 255. + f32::from(under[3]) * (1. - alpha)).round() as u8;
    Rgba(blended)
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::transition::TransitionType;

    use super::{composite, transition_mask, TransitionMasks};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn masks_cover_secondary_corners() {
        let outer = transition_mask(TransitionType::Outer4, 4, 4);
        assert_eq!(outer[(0, 0)], 0.);
        assert_eq!(outer[(3, 3)], 1.);
        assert_eq!(outer[(0, 3)], 0.);

        let inner = transition_mask(TransitionType::Inner1, 4, 4);
        assert_eq!(inner[(0, 0)], 0.);
        assert_eq!(inner[(3, 3)], 1.);
        assert_eq!(inner[(0, 3)], 1.);

        let none = transition_mask(TransitionType::None, 4, 4);
        assert!(none.iter().all(|coverage| *coverage == 0.));
    }

    #[test]
    fn masks_have_the_tile_size() {
        let masks = TransitionMasks::new(6, 3);
        assert_eq!(masks.get(TransitionType::Up).dim(), (3, 6));
    }

    #[test]
    fn left_edge_composites_overlay_on_the_left() {
        let base = RgbaImage::from_pixel(4, 4, RED);
        let overlay = RgbaImage::from_pixel(4, 4, BLUE);
        let mask = transition_mask(TransitionType::Left, 4, 4);
        let blended = composite(&base, &overlay, &mask);

        for y in 0..4 {
            assert_eq!(*blended.get_pixel(0, y), BLUE);
            assert_eq!(*blended.get_pixel(3, y), RED);
        }
    }

    #[test]
    fn transparent_overlay_keeps_base() {
        let base = RgbaImage::from_pixel(4, 4, RED);
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 0]));
        let mask = transition_mask(TransitionType::Down, 4, 4);
        let blended = composite(&base, &overlay, &mask);
        assert!(blended.pixels().all(|p| *p == RED));
    }
}
