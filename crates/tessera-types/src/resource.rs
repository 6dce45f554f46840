//! Resource loading trait.
//!
//! Textures and sprite sheets are owned by a host-side resource manager
//! that tracks them in numbered groups so a whole screen's assets can be
//! released together. The toolkit only ever borrows through this trait.

use std::rc::Rc;

use crate::backend::TextureId;
use crate::error::Result;
use crate::sprite::SpriteSheet;

/// Lifetime tag grouping resources for bulk unloading.
pub type ResourceGroup = u32;

/// A loaded standalone texture with its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Loader interface the host engine provides.
///
/// Loading the same path twice within one group must return the same
/// handle; unloading a group invalidates every handle it produced.
pub trait ResourceLoader {
    /// Load (or fetch the cached) texture at `path`.
    fn load_texture(&mut self, path: &str, group: ResourceGroup) -> Result<Texture>;

    /// Load (or fetch the cached) sprite sheet at `path`.
    fn load_spritesheet(&mut self, path: &str, group: ResourceGroup) -> Result<Rc<SpriteSheet>>;

    /// Release every resource tagged with `group`.
    fn unload_group(&mut self, group: ResourceGroup);
}
