//! Horizontally split panel pair with a draggable divider.
//!
//! Two panels stacked vertically, separated by a border strip. The top
//! slot's boundaries end at the divider, the bottom slot's start below it;
//! dragging the divider re-partitions the space.

use tessera_skin::SkinFile;
use tessera_types::diag::Diagnostics;
use tessera_types::error::Result;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::{Color, ViewRect};

use crate::container::{SlotContainer, SlotId, SlotLayout};
use crate::panel::Panel;
use crate::widget::{clicked_inside, Anchors, DrawContext, UpdateContext, Widget, WidgetCore};

#[derive(Debug, Clone, Copy)]
struct SplitLayout {
    top: SlotId,
    bottom: SlotId,
    border_position: i32,
    border_size: u32,
}

impl SlotLayout for SplitLayout {
    fn slot_bounds(&self, slot: SlotId, frame: &WidgetCore, width: u32, height: u32) -> ViewRect {
        let x = frame.real_x();
        let y = frame.real_y();
        if slot == self.top {
            ViewRect::new(x, y, width, self.border_position.max(0) as u32)
        } else if slot == self.bottom {
            let below = self.border_position + self.border_size as i32;
            ViewRect::new(x, y + below, width, height.saturating_sub(below.max(0) as u32))
        } else {
            ViewRect::new(x, y, width, height)
        }
    }
}

/// Two stacked panels with a movable horizontal divider.
pub struct SplitPanel {
    core: WidgetCore,
    slots: SlotContainer,
    layout: SplitLayout,
    inner_border: Color,
    outer_border: Color,
    pub can_move_border: bool,
    pub draw_border: bool,
    holding_border: bool,
}

impl SplitPanel {
    pub const DEFAULT_CATEGORY: &'static str = "SplitPanel";

    pub fn new() -> Self {
        let mut slots = SlotContainer::new();
        let top = slots.add_slot();
        let bottom = slots.add_slot();
        Self {
            core: WidgetCore::new(),
            slots,
            layout: SplitLayout {
                top,
                bottom,
                border_position: 50,
                border_size: 5,
            },
            inner_border: Color::WHITE,
            outer_border: Color::BLACK,
            can_move_border: true,
            draw_border: true,
            holding_border: false,
        }
    }

    /// Load colors and create the two content panels.
    pub fn init(&mut self, skin: &SkinFile, category: Option<&str>) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.inner_border = skin.color(category, "InnerBorderColor")?;
        self.outer_border = skin.color(category, "OuterBorderColor")?;

        self.core.set_size(100, 100);
        self.core.min_height = self.layout.border_size;
        self.set_border_position(50);
        self.core.initialized = true;

        for slot in [self.layout.top, self.layout.bottom] {
            let mut panel = Panel::new();
            panel.init(skin, None)?;
            panel.core_mut().anchors = Anchors::ALL;
            panel
                .core_mut()
                .set_size(self.core.width(), self.core.height());
            self.slots
                .place(Box::new(panel), slot, &self.core, &self.layout)
                .map_err(|e| e.error)?;
            // Fill the slot exactly so the anchors track it from now on.
            if let Some(child) = self.slots.child_mut(slot) {
                let bounds = child.core().boundaries;
                child.core_mut().x = 0;
                child.core_mut().y = 0;
                child.core_mut().set_size(bounds.width, bounds.height);
            }
        }
        Ok(())
    }

    pub fn border_size(&self) -> u32 {
        self.layout.border_size
    }

    /// Divider thickness, floored at 3 and capped by the height.
    pub fn set_border_size(&mut self, size: u32) {
        self.layout.border_size = size.clamp(3, self.core.height().max(3));
        self.core.min_height = self.layout.border_size;
        self.set_border_position(self.layout.border_position);
    }

    pub fn border_position(&self) -> i32 {
        self.layout.border_position
    }

    /// Divider offset from the top, clamped into the container.
    pub fn set_border_position(&mut self, position: i32) {
        let limit = self.core.height() as i32 - self.layout.border_size as i32;
        self.layout.border_position = position.clamp(0, limit.max(0));
    }

    pub fn top_panel(&self) -> Option<&Panel> {
        self.slots
            .child(self.layout.top)
            .and_then(|w| w.as_any().downcast_ref())
    }

    pub fn top_panel_mut(&mut self) -> Option<&mut Panel> {
        self.slots
            .child_mut(self.layout.top)
            .and_then(|w| w.as_any_mut().downcast_mut())
    }

    pub fn bottom_panel(&self) -> Option<&Panel> {
        self.slots
            .child(self.layout.bottom)
            .and_then(|w| w.as_any().downcast_ref())
    }

    pub fn bottom_panel_mut(&mut self) -> Option<&mut Panel> {
        self.slots
            .child_mut(self.layout.bottom)
            .and_then(|w| w.as_any_mut().downcast_mut())
    }

    /// Screen rectangle of the divider strip.
    fn border_rect(&self) -> ViewRect {
        let rect = self.core.rect();
        ViewRect::new(
            rect.x,
            rect.y + self.layout.border_position,
            rect.width,
            self.layout.border_size,
        )
    }

    pub fn set_size(&mut self, width: u32, height: u32, diag: &mut dyn Diagnostics) {
        let (old_w, old_h) = (self.core.width(), self.core.height());
        self.core.set_size(width, height);
        self.set_border_position(self.layout.border_position);
        self.slots
            .make_size_valid(&mut self.core, &self.layout, old_w, old_h, diag);
    }
}

impl Default for SplitPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for SplitPanel {
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
        let input = ctx.input;
        if self.can_move_border {
            if input.was_pressed(MouseButton::Left)
                && input.mouse_in(self.border_rect().intersect(self.core.visible_rect()))
            {
                self.holding_border = true;
            }
            if self.holding_border {
                if input.is_down(MouseButton::Left) {
                    let local = input.mouse_y
                        - self.core.real_y()
                        - self.layout.border_size as i32 / 2;
                    self.set_border_position(local);
                } else {
                    self.holding_border = false;
                }
            }
        }

        let has_focus = self.core.has_focus;
        let under_mouse = self.core.under_mouse || ctx.input.mouse_in(self.core.visible_rect());
        self.slots
            .update(&self.core, &self.layout, ctx, has_focus, under_mouse);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        self.slots.draw(ctx, view)?;
        if self.draw_border {
            let border = self.border_rect();
            ctx.fill_rect(view, border, self.outer_border)?;
            let inset = ViewRect::new(
                border.x,
                border.y + border.height as i32 / 2,
                border.width,
                1,
            );
            ctx.fill_rect(view, inset, self.inner_border)?;
        }
        Ok(())
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        clicked_inside(&self.core, input)
    }

    fn close(&mut self) {
        self.core.closed = true;
        self.slots.clear_children();
    }
}
