//! Vertically scrolling panel.
//!
//! A panel with a scrollbar strip on the right. Content children keep
//! their own positions; the layout shifts their origin upward by the
//! scrollbar value, and their boundaries stop at the scrollbar strip.

use tessera_skin::SkinFile;
use tessera_types::diag::Diagnostics;
use tessera_types::error::Result;
use tessera_types::input::InputState;
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, Origin, ViewRect};

use crate::container::{PlaceError, SlotContainer, SlotId, SlotLayout};
use crate::scrollbar::VScrollbar;
use crate::widget::{clicked_inside, Anchors, DrawContext, UpdateContext, Widget, WidgetCore};

#[derive(Debug, Clone, Copy)]
struct ScrollLayout {
    scrollbar: SlotId,
    scrollbar_width: u32,
    offset_y: i32,
}

impl SlotLayout for ScrollLayout {
    fn slot_bounds(&self, slot: SlotId, frame: &WidgetCore, width: u32, height: u32) -> ViewRect {
        let x = frame.real_x();
        let y = frame.real_y();
        if slot == self.scrollbar {
            ViewRect::new(
                x + width as i32 - self.scrollbar_width as i32,
                y,
                self.scrollbar_width,
                height,
            )
        } else {
            ViewRect::new(x, y, width.saturating_sub(self.scrollbar_width), height)
        }
    }

    fn child_origin(&self, slot: SlotId) -> Origin {
        if slot == self.scrollbar {
            Origin::ZERO
        } else {
            Origin::new(0, -self.offset_y)
        }
    }
}

/// A panel whose content scrolls under a right-hand scrollbar.
pub struct VScrollPanel {
    core: WidgetCore,
    slots: SlotContainer,
    layout: ScrollLayout,
    face: Color,
}

impl VScrollPanel {
    pub fn new() -> Self {
        let mut slots = SlotContainer::new();
        let scrollbar = slots.add_slot();
        Self {
            core: WidgetCore::new(),
            slots,
            layout: ScrollLayout {
                scrollbar,
                scrollbar_width: VScrollbar::DEFAULT_WIDTH,
                offset_y: 0,
            },
            face: Color::BLACK,
        }
    }

    /// Load colors and place the scrollbar child.
    pub fn init(&mut self, skin: &SkinFile, _loader: &mut dyn ResourceLoader, _group: ResourceGroup) -> Result<()> {
        self.face = skin.color("Panel", "Face")?;
        self.core.set_size(160, 120);
        self.core.initialized = true;

        let mut bar = VScrollbar::new();
        bar.init(skin, None)?;
        bar.core_mut().anchors = Anchors::ALL;
        bar.core_mut()
            .set_size(self.layout.scrollbar_width, self.core.height());
        self.slots
            .place(Box::new(bar), self.layout.scrollbar, &self.core, &self.layout)
            .map_err(|e| e.error)?;
        if let Some(child) = self.slots.child_mut(self.layout.scrollbar) {
            let bounds = child.core().boundaries;
            child.core_mut().x = 0;
            child.core_mut().y = 0;
            child.core_mut().set_size(bounds.width, bounds.height);
        }
        Ok(())
    }

    /// Add a content widget; it scrolls with the panel.
    pub fn add(&mut self, widget: Box<dyn Widget>) -> std::result::Result<SlotId, PlaceError> {
        let slot = self.slots.add_slot();
        match self.slots.place(widget, slot, &self.core, &self.layout) {
            Ok(()) => Ok(slot),
            Err(err) => {
                let _ = self.slots.remove_slot(slot);
                Err(err)
            }
        }
    }

    pub fn slots(&self) -> &SlotContainer {
        &self.slots
    }

    pub fn scrollbar(&self) -> Option<&VScrollbar> {
        self.slots
            .child(self.layout.scrollbar)
            .and_then(|w| w.as_any().downcast_ref())
    }

    pub fn scrollbar_mut(&mut self) -> Option<&mut VScrollbar> {
        self.slots
            .child_mut(self.layout.scrollbar)
            .and_then(|w| w.as_any_mut().downcast_mut())
    }

    /// Current vertical scroll offset in pixels.
    pub fn scroll_offset(&self) -> i32 {
        self.layout.offset_y
    }

    /// Bottom edge of the lowest content child, panel space.
    fn content_height(&self) -> i32 {
        self.slots
            .iter()
            .filter(|(slot, _)| *slot != self.layout.scrollbar)
            .map(|(_, w)| w.core().y + w.core().height() as i32)
            .max()
            .unwrap_or(0)
    }

    pub fn set_size(&mut self, width: u32, height: u32, diag: &mut dyn Diagnostics) {
        let (old_w, old_h) = (self.core.width(), self.core.height());
        self.core.set_size(width, height);
        self.slots
            .make_size_valid(&mut self.core, &self.layout, old_w, old_h, diag);
    }
}

impl Default for VScrollPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for VScrollPanel {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        // Scroll range follows the lowest content child.
        let overflow = self.content_height() - self.core.height() as i32;
        if let Some(bar) = self.scrollbar_mut() {
            bar.set_max(overflow.max(0));
        }

        let has_focus = self.core.has_focus;
        let under_mouse = self.core.under_mouse || ctx.input.mouse_in(self.core.visible_rect());
        self.slots
            .update(&self.core, &self.layout, ctx, has_focus, under_mouse);

        self.layout.offset_y = self.scrollbar().map(VScrollbar::value).unwrap_or(0);
        self.slots.sync_child_frames(&self.core, &self.layout);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        ctx.fill_rect(view, self.core.rect(), self.face)?;
        self.slots.draw(ctx, view)
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        clicked_inside(&self.core, input)
    }

    fn close(&mut self) {
        self.core.closed = true;
        self.slots.clear_children();
    }
}
