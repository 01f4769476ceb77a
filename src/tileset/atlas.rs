use image::{imageops, RgbaImage};

/// Source of base images for a [`super::TileSet`]: frame `i` is the base image of the `i`-th terrain type of the set.
pub trait TileAtlas {
    /// Number of frames available in the atlas
    fn frame_count(&self) -> usize;
    /// Returns a copy of the frame at `index`, or `None` if there is no such frame
    fn frame(&self, index: usize) -> Option<RgbaImage>;
}

impl TileAtlas for [RgbaImage] {
    fn frame_count(&self) -> usize {
        self.len()
    }

    fn frame(&self, index: usize) -> Option<RgbaImage> {
        self.get(index).cloned()
    }
}

impl TileAtlas for Vec<RgbaImage> {
    fn frame_count(&self) -> usize {
        self.len()
    }

    fn frame(&self, index: usize) -> Option<RgbaImage> {
        self.get(index).cloned()
    }
}

/// A single sheet cut into square frames, read row by row.
pub struct SpriteSheet {
    sheet: RgbaImage,
    tile_size: u32,
}

impl SpriteSheet {
    /// Creates a sprite sheet cut into `tile_size` x `tile_size` frames. Incomplete frames on the right and bottom borders are ignored.
    pub fn new(sheet: RgbaImage, tile_size: u32) -> Self {
        Self { sheet, tile_size }
    }

    /// Number of frames in a row of the sheet
    pub fn columns(&self) -> u32 {
        match self.tile_size {
            0 => 0,
            size => self.sheet.width() / size,
        }
    }

    /// Number of rows of frames in the sheet
    pub fn rows(&self) -> u32 {
        match self.tile_size {
            0 => 0,
            size => self.sheet.height() / size,
        }
    }

    /// Size in pixels of a frame
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

impl TileAtlas for SpriteSheet {
    fn frame_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    fn frame(&self, index: usize) -> Option<RgbaImage> {
        if index >= self.frame_count() {
            return None;
        }
        let columns = self.columns() as usize;
        let x = (index % columns) as u32 * self.tile_size;
        let y = (index / columns) as u32 * self.tile_size;
        Some(imageops::crop_imm(&self.sheet, x, y, self.tile_size, self.tile_size).to_image())
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{SpriteSheet, TileAtlas};

    #[test]
    fn sprite_sheet_frames_are_row_major() {
        // 3 columns, 2 rows of 2x2 frames, each frame filled with its own index
        let sheet = RgbaImage::from_fn(6, 4, |x, y| {
            let index = (x / 2 + (y / 2) * 3) as u8;
            Rgba([index, 0, 0, 255])
        });
        let atlas = SpriteSheet::new(sheet, 2);
        assert_eq!(atlas.columns(), 3);
        assert_eq!(atlas.rows(), 2);
        assert_eq!(atlas.frame_count(), 6);

        for index in 0..6 {
            let frame = atlas.frame(index).unwrap();
            assert_eq!(frame.dimensions(), (2, 2));
            assert!(frame.pixels().all(|p| p[0] == index as u8));
        }
        assert!(atlas.frame(6).is_none());
    }

    #[test]
    fn sprite_sheet_ignores_partial_frames() {
        let atlas = SpriteSheet::new(RgbaImage::new(5, 3), 2);
        assert_eq!(atlas.frame_count(), 2);

        let empty = SpriteSheet::new(RgbaImage::new(5, 3), 0);
        assert_eq!(empty.frame_count(), 0);
        assert!(empty.frame(0).is_none());
    }
}
