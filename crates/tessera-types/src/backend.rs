//! Render backend trait definitions.
//!
//! The toolkit never talks to a platform API directly. A host engine
//! implements [`RenderBackend`] and hands it to the frame driver; widgets
//! draw exclusively through this narrow surface.

use crate::error::Result;
use crate::geometry::ViewRect;

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

/// Opaque handle to a texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// The drawing primitives tessera consumes from a host engine.
///
/// Implementations are expected to honor the active clip rectangle for
/// every primitive. All coordinates are in screen pixels.
pub trait RenderBackend {
    /// Fill the whole target with a color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw a full texture stretched to `w` x `h`.
    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Draw a sub-region of a texture at its natural size.
    fn blit_sub(&mut self, tex: TextureId, src: ViewRect, x: i32, y: i32) -> Result<()>;

    /// Tinted variant of [`blit_sub`](Self::blit_sub), used for font
    /// glyphs. Backends without color modulation may ignore the tint.
    fn blit_sub_tinted(
        &mut self,
        tex: TextureId,
        src: ViewRect,
        x: i32,
        y: i32,
        _tint: Color,
    ) -> Result<()> {
        self.blit_sub(tex, src, x, y)
    }

    /// Restrict subsequent drawing to `rect`.
    fn set_clip_rect(&mut self, rect: ViewRect) -> Result<()>;

    /// Remove the clip rectangle.
    fn reset_clip_rect(&mut self) -> Result<()>;

    /// Blend a translucent mask over everything drawn so far. Used to
    /// darken siblings beneath the active dialogue.
    fn dim_screen(&mut self, mask: Color) -> Result<()>;

    /// Present the finished frame.
    fn swap_buffers(&mut self) -> Result<()>;
}
