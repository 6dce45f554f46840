//! The widget capability surface.
//!
//! Widgets are plain structs that embed a [`WidgetCore`] by composition
//! and implement [`Widget`]. The core carries everything a container needs
//! to lay a child out: position, size with min/max extents, the assigned
//! clipping boundaries and origin, anchors, and lifecycle flags. Nothing
//! here dispatches on concrete widget types.

use tessera_types::config::UiConfig;
use tessera_types::diag::Diagnostics;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::InputState;
use tessera_types::sprite::Sprite;
use tessera_types::{Color, Origin, RenderBackend, ViewRect};

use crate::runtime::FrameClock;

/// Which edges of its boundaries a widget is anchored to.
///
/// A widget anchored on both horizontal edges stretches with its
/// boundaries; anchored on one edge it keeps its distance to that edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchors {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Anchors {
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    pub const fn new(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

/// Layout and lifecycle state shared by every widget.
#[derive(Debug, Clone)]
pub struct WidgetCore {
    /// Position relative to the boundary origin.
    pub x: i32,
    pub y: i32,
    width: u32,
    height: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    /// Clipping rectangle assigned by the owning container, screen space.
    pub boundaries: ViewRect,
    /// Clipping rectangle of the whole container chain above.
    pub master_boundaries: ViewRect,
    /// Extra offset applied by the container (scroll offset).
    pub origin: Origin,
    pub anchors: Anchors,
    /// Set by the widget itself once its skin resources are loaded.
    /// Containers refuse to place uninitialized widgets.
    pub initialized: bool,
    pub closed: bool,
    /// A suspended widget keeps its slot but relinquishes focus.
    pub suspended: bool,
    pub hidden: bool,
    /// Maintained by the owning container each frame.
    pub has_focus: bool,
    /// Maintained by the owning container each frame.
    pub under_mouse: bool,
}

impl Default for WidgetCore {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            min_width: 0,
            max_width: u32::MAX,
            min_height: 0,
            max_height: u32::MAX,
            boundaries: ViewRect::EMPTY,
            master_boundaries: ViewRect::EMPTY,
            origin: Origin::ZERO,
            anchors: Anchors::NONE,
            initialized: false,
            closed: false,
            suspended: false,
            hidden: false,
            has_focus: false,
            under_mouse: false,
        }
    }
}

impl WidgetCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the width, clamped into the declared min/max extents.
    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(self.min_width, self.max_width);
    }

    /// Set the height, clamped into the declared min/max extents.
    pub fn set_height(&mut self, height: u32) {
        self.height = height.clamp(self.min_height, self.max_height);
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Whether this widget accepts living in a slot of the given width.
    pub fn accepts_width(&self, width: u32) -> bool {
        width >= self.min_width && width <= self.max_width
    }

    /// Whether this widget accepts living in a slot of the given height.
    pub fn accepts_height(&self, height: u32) -> bool {
        height >= self.min_height && height <= self.max_height
    }

    /// Screen-space x of the widget's top-left corner.
    pub fn real_x(&self) -> i32 {
        self.boundaries.x + self.origin.x + self.x
    }

    /// Screen-space y of the widget's top-left corner.
    pub fn real_y(&self) -> i32 {
        self.boundaries.y + self.origin.y + self.y
    }

    /// Screen-space rectangle, unclipped.
    pub fn rect(&self) -> ViewRect {
        ViewRect::new(self.real_x(), self.real_y(), self.width, self.height)
    }

    /// Screen-space rectangle clipped by boundaries and master boundaries.
    pub fn visible_rect(&self) -> ViewRect {
        self.rect()
            .intersect(self.boundaries)
            .intersect(self.master_boundaries)
    }

    /// Assign new boundaries, repositioning and stretching along anchored
    /// edges so the widget keeps its edge distances.
    pub fn apply_boundaries(&mut self, new: ViewRect) {
        let old = self.boundaries;

        if !old.is_empty() {
            let right_gap = old.width as i32 - (self.x + self.width as i32);
            if self.anchors.left && self.anchors.right {
                let stretched = new.width as i32 - self.x - right_gap;
                self.set_width(stretched.max(0) as u32);
            } else if self.anchors.right && !self.anchors.left {
                self.x = new.width as i32 - self.width as i32 - right_gap;
            }

            let bottom_gap = old.height as i32 - (self.y + self.height as i32);
            if self.anchors.top && self.anchors.bottom {
                let stretched = new.height as i32 - self.y - bottom_gap;
                self.set_height(stretched.max(0) as u32);
            } else if self.anchors.bottom && !self.anchors.top {
                self.y = new.height as i32 - self.height as i32 - bottom_gap;
            }
        }

        self.boundaries = new;
    }
}

/// Per-frame state threaded through every widget update.
///
/// This object is owned by the application loop and passed down the tree;
/// there are no global singletons behind it.
pub struct UpdateContext<'a> {
    pub input: &'a InputState,
    pub clock: &'a FrameClock,
    pub config: &'a UiConfig,
    pub diag: &'a mut dyn Diagnostics,
}

/// Drawing entry point handed to widgets; wraps the backend with
/// view-rect-aware primitives.
pub struct DrawContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
}

impl<'a> DrawContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Self { backend }
    }

    /// Fill a rectangle clipped against `view`.
    pub fn fill_rect(&mut self, view: ViewRect, rect: ViewRect, color: Color) -> Result<()> {
        let r = rect.intersect(view);
        if r.is_empty() {
            return Ok(());
        }
        self.backend.fill_rect(r.x, r.y, r.width, r.height, color)
    }

    /// Draw a one-pixel frame clipped against `view`.
    pub fn frame_rect(&mut self, view: ViewRect, rect: ViewRect, color: Color) -> Result<()> {
        if rect.width == 0 || rect.height == 0 {
            return Ok(());
        }
        self.fill_rect(view, ViewRect::new(rect.x, rect.y, rect.width, 1), color)?;
        self.fill_rect(
            view,
            ViewRect::new(rect.x, rect.bottom() - 1, rect.width, 1),
            color,
        )?;
        self.fill_rect(view, ViewRect::new(rect.x, rect.y, 1, rect.height), color)?;
        self.fill_rect(
            view,
            ViewRect::new(rect.right() - 1, rect.y, 1, rect.height),
            color,
        )
    }

    /// Draw a sprite with the backend clip set to `view`.
    pub fn draw_sprite(&mut self, view: ViewRect, sprite: &Sprite, x: i32, y: i32) -> Result<()> {
        if view.is_empty() {
            return Ok(());
        }
        self.backend.set_clip_rect(view)?;
        let result = sprite.draw(self.backend, x, y);
        self.backend.reset_clip_rect()?;
        result
    }

    /// Draw one line of text with the backend clip set to `view`.
    pub fn draw_text(
        &mut self,
        view: ViewRect,
        font: &MonoFont,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<()> {
        if view.is_empty() || text.is_empty() {
            return Ok(());
        }
        self.backend.set_clip_rect(view)?;
        let result = font.draw(self.backend, text, x, y, color);
        self.backend.reset_clip_rect()?;
        result
    }
}

/// The capability interface every widget implements.
pub trait Widget {
    fn core(&self) -> &WidgetCore;
    fn core_mut(&mut self) -> &mut WidgetCore;

    /// Downcast support so containers can expose typed children.
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// Per-frame logic. Default: nothing.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Draw inside `view`; drawing outside it is clipped by the context
    /// helpers.
    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()>;

    /// Whether this widget claims focus this frame. Containers pick the
    /// topmost claimant.
    fn wants_focus(&self, _input: &InputState) -> bool {
        false
    }

    /// Hook invoked after the widget has been placed into a slot.
    fn added_to_container(&mut self) {}

    /// Hook invoked after the widget has been detached from its slot.
    fn removed_from_container(&mut self) {}

    /// Release resources and mark closed. Containers close their children
    /// recursively.
    fn close(&mut self) {
        self.core_mut().closed = true;
    }
}

/// Standard focus claim: the primary button went down inside the widget's
/// visible rectangle.
pub fn clicked_inside(core: &WidgetCore, input: &InputState) -> bool {
    input.was_pressed(tessera_types::input::MouseButton::Left)
        && input.mouse_in(core.visible_rect())
}
