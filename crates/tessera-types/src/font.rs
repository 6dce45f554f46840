//! Fixed-grid bitmap fonts.
//!
//! A [`MonoFont`] is a texture partitioned into uniform `grid_size` x
//! `grid_size` pixel cells, one glyph per cell. The character set is given
//! row by row; the glyph for row `r`, column `c` occupies the top-left
//! `char_width` x `char_height` pixels of cell `(c, r)`. Rasterization
//! happens in the backend via [`RenderBackend::blit_sub`]; this type only
//! holds metrics and source rectangles.

use std::collections::HashMap;

use crate::backend::{Color, RenderBackend, TextureId};
use crate::error::Result;
use crate::geometry::ViewRect;

/// A monospaced bitmap font loaded from a glyph-grid texture.
#[derive(Debug, Clone)]
pub struct MonoFont {
    texture: TextureId,
    char_width: u32,
    char_height: u32,
    h_space: u32,
    v_space: u32,
    glyphs: HashMap<char, ViewRect>,
}

impl MonoFont {
    /// Build the glyph table from character rows.
    ///
    /// Each string in `rows` names the glyphs of one texture row, left to
    /// right. A character listed twice keeps its first cell.
    pub fn new(
        texture: TextureId,
        rows: &[String],
        char_width: u32,
        char_height: u32,
        grid_size: u32,
        h_space: u32,
        v_space: u32,
    ) -> Self {
        let mut glyphs = HashMap::new();
        for (row, chars) in rows.iter().enumerate() {
            for (col, ch) in chars.chars().enumerate() {
                let rect = ViewRect::new(
                    col as i32 * grid_size as i32,
                    row as i32 * grid_size as i32,
                    char_width,
                    char_height,
                );
                glyphs.entry(ch).or_insert(rect);
            }
        }
        Self {
            texture,
            char_width,
            char_height,
            h_space,
            v_space,
            glyphs,
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn char_width(&self) -> u32 {
        self.char_width
    }

    pub fn char_height(&self) -> u32 {
        self.char_height
    }

    /// Advance from one glyph origin to the next.
    pub fn advance(&self) -> u32 {
        self.char_width + self.h_space
    }

    /// Height of one text line including vertical spacing.
    pub fn line_height(&self) -> u32 {
        self.char_height + self.v_space
    }

    /// Source rectangle of a glyph, if the font defines it.
    pub fn glyph_rect(&self, ch: char) -> Option<ViewRect> {
        self.glyphs.get(&ch).copied()
    }

    /// Pixel width of a single-line string.
    pub fn measure(&self, text: &str) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * self.char_width + (n - 1) * self.h_space
    }

    /// Index of the character under pixel offset `px`, for caret placement.
    pub fn char_index_at(&self, text: &str, px: i32) -> usize {
        if px <= 0 {
            return 0;
        }
        let idx = (px as u32 + self.advance() / 2) / self.advance().max(1);
        (idx as usize).min(text.chars().count())
    }

    /// Draw a single line tinted with `color`. Glyphs the font does not
    /// define still advance the pen, leaving a gap.
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<()> {
        let mut pen = x;
        for ch in text.chars() {
            if let Some(src) = self.glyph_rect(ch) {
                backend.blit_sub_tinted(self.texture, src, pen, y, color)?;
            }
            pen += self.advance() as i32;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_font() -> MonoFont {
        MonoFont::new(
            TextureId(1),
            &["AB".to_string(), "ab".to_string()],
            6,
            9,
            10,
            1,
            2,
        )
    }

    #[test]
    fn glyph_rects_follow_grid() {
        let f = ascii_font();
        assert_eq!(f.glyph_rect('A'), Some(ViewRect::new(0, 0, 6, 9)));
        assert_eq!(f.glyph_rect('B'), Some(ViewRect::new(10, 0, 6, 9)));
        assert_eq!(f.glyph_rect('a'), Some(ViewRect::new(0, 10, 6, 9)));
        assert_eq!(f.glyph_rect('b'), Some(ViewRect::new(10, 10, 6, 9)));
        assert_eq!(f.glyph_rect('z'), None);
    }

    #[test]
    fn duplicate_char_keeps_first_cell() {
        let f = MonoFont::new(TextureId(1), &["AA".to_string()], 6, 9, 10, 1, 0);
        assert_eq!(f.glyph_rect('A'), Some(ViewRect::new(0, 0, 6, 9)));
    }

    #[test]
    fn measure_counts_spacing_between_glyphs() {
        let f = ascii_font();
        assert_eq!(f.measure(""), 0);
        assert_eq!(f.measure("A"), 6);
        assert_eq!(f.measure("AB"), 13); // 6 + 1 + 6
        assert_eq!(f.measure("ABA"), 20);
    }

    #[test]
    fn line_height_includes_vertical_space() {
        assert_eq!(ascii_font().line_height(), 11);
    }

    #[test]
    fn char_index_at_midpoints() {
        let f = ascii_font(); // advance 7
        assert_eq!(f.char_index_at("ABAB", -5), 0);
        assert_eq!(f.char_index_at("ABAB", 0), 0);
        assert_eq!(f.char_index_at("ABAB", 4), 1);
        assert_eq!(f.char_index_at("ABAB", 7), 1);
        assert_eq!(f.char_index_at("ABAB", 500), 4);
    }
}
