//! Sprite sheets and sprites.
//!
//! A sprite sheet packs many images into one texture together with a table
//! of named source rectangles. A [`Sprite`] is a drawable reference to
//! either a sheet region or a whole standalone texture.

use std::collections::HashMap;

use crate::backend::{RenderBackend, TextureId};
use crate::error::{Result, TesseraError};
use crate::geometry::ViewRect;

/// A texture with named sub-regions.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture: TextureId,
    regions: HashMap<String, ViewRect>,
}

impl SpriteSheet {
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            regions: HashMap::new(),
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Register a named region. Later registrations of the same name win;
    /// sheets are authored once, not merged.
    pub fn insert_region(&mut self, name: impl Into<String>, rect: ViewRect) {
        self.regions.insert(name.into(), rect);
    }

    /// Look up the source rectangle of a named region.
    pub fn source_rect(&self, name: &str) -> Result<ViewRect> {
        self.regions
            .get(name)
            .copied()
            .ok_or_else(|| TesseraError::Resource(format!("no region \"{name}\" in sprite sheet")))
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

/// A drawable image: a texture plus the source region to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub texture: TextureId,
    pub source: ViewRect,
}

impl Sprite {
    /// A sprite covering a whole standalone texture.
    pub fn from_texture(texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            texture,
            source: ViewRect::new(0, 0, width, height),
        }
    }

    /// A sprite referencing a named region of a sheet.
    pub fn from_sheet(sheet: &SpriteSheet, name: &str) -> Result<Self> {
        Ok(Self {
            texture: sheet.texture(),
            source: sheet.source_rect(name)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.source.width
    }

    pub fn height(&self) -> u32 {
        self.source.height
    }

    /// Draw at natural size.
    pub fn draw(&self, backend: &mut dyn RenderBackend, x: i32, y: i32) -> Result<()> {
        backend.blit_sub(self.texture, self.source, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_lookup() {
        let mut sheet = SpriteSheet::new(TextureId(7));
        sheet.insert_region("knob", ViewRect::new(0, 0, 8, 8));
        sheet.insert_region("track", ViewRect::new(8, 0, 4, 16));
        assert_eq!(sheet.source_rect("knob").unwrap(), ViewRect::new(0, 0, 8, 8));
        assert_eq!(sheet.region_count(), 2);
    }

    #[test]
    fn sheet_missing_region_errors() {
        let sheet = SpriteSheet::new(TextureId(7));
        let err = sheet.source_rect("nope").unwrap_err();
        assert!(format!("{err}").contains("nope"));
    }

    #[test]
    fn sprite_from_texture_covers_all() {
        let s = Sprite::from_texture(TextureId(1), 32, 16);
        assert_eq!(s.width(), 32);
        assert_eq!(s.height(), 16);
        assert_eq!(s.source, ViewRect::new(0, 0, 32, 16));
    }

    #[test]
    fn sprite_from_sheet_uses_region() {
        let mut sheet = SpriteSheet::new(TextureId(9));
        sheet.insert_region("icon", ViewRect::new(16, 16, 12, 12));
        let s = Sprite::from_sheet(&sheet, "icon").unwrap();
        assert_eq!(s.texture, TextureId(9));
        assert_eq!(s.source, ViewRect::new(16, 16, 12, 12));
    }

    #[test]
    fn sprite_from_sheet_missing_region() {
        let sheet = SpriteSheet::new(TextureId(9));
        assert!(Sprite::from_sheet(&sheet, "icon").is_err());
    }
}
