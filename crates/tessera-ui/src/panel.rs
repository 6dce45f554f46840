//! Plain container panel.
//!
//! A `Panel` owns a slot container with the default containment rules:
//! every child gets the panel's full rectangle as boundaries and positions
//! itself with `x`/`y` and anchors. Other containers build on the same
//! pattern with their own [`SlotLayout`] rules.

use tessera_skin::SkinFile;
use tessera_types::diag::Diagnostics;
use tessera_types::error::Result;
use tessera_types::input::InputState;
use tessera_types::{Color, ViewRect};

use crate::container::{DefaultLayout, PlaceError, SlotContainer, SlotId};
use crate::tab_order::TabOrder;
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// A skinnable rectangle that contains freely positioned children.
pub struct Panel {
    core: WidgetCore,
    slots: SlotContainer,
    layout: DefaultLayout,
    tab_order: TabOrder,
    face: Color,
    border: Color,
    pub draw_background: bool,
}

impl Panel {
    pub const DEFAULT_CATEGORY: &'static str = "Panel";

    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            slots: SlotContainer::new(),
            layout: DefaultLayout,
            tab_order: TabOrder::new(),
            face: Color::BLACK,
            border: Color::WHITE,
            draw_background: true,
        }
    }

    pub fn init(&mut self, skin: &SkinFile, category: Option<&str>) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.face = skin.color(category, "Face")?;
        self.border = skin.color(category, "Border")?;
        self.core.set_size(100, 100);
        self.core.initialized = true;
        Ok(())
    }

    /// Create a slot and place the widget into it.
    pub fn add(&mut self, widget: Box<dyn Widget>) -> std::result::Result<SlotId, PlaceError> {
        let slot = self.slots.add_slot();
        match self.slots.place(widget, slot, &self.core, &self.layout) {
            Ok(()) => Ok(slot),
            Err(err) => {
                // An empty slot from a failed placement is not kept around.
                let _ = self.slots.remove_slot(slot);
                Err(err)
            }
        }
    }

    /// Close and detach a child; its slot goes too.
    pub fn remove(&mut self, slot: SlotId) -> Result<Option<Box<dyn Widget>>> {
        self.slots.remove_slot(slot)
    }

    pub fn slots(&self) -> &SlotContainer {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut SlotContainer {
        &mut self.slots
    }

    /// The Tab traversal cycle. Slots must be registered explicitly.
    pub fn tab_order_mut(&mut self) -> &mut TabOrder {
        &mut self.tab_order
    }

    /// Resize, negotiating with children's extents.
    pub fn set_size(&mut self, width: u32, height: u32, diag: &mut dyn Diagnostics) {
        let (old_w, old_h) = (self.core.width(), self.core.height());
        self.core.set_size(width, height);
        self.slots
            .make_size_valid(&mut self.core, &self.layout, old_w, old_h, diag);
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Panel {
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
        let has_focus = self.core.has_focus;
        let under_mouse = self.core.under_mouse || ctx.input.mouse_in(self.core.visible_rect());

        if has_focus
            && ctx.input.key_pressed(tessera_types::input::Key::Tab)
            && !self.tab_order.is_empty()
        {
            let next = match self.slots.focused() {
                Some(current) => self
                    .tab_order
                    .next_after(current)
                    .or_else(|| self.tab_order.first()),
                None => self.tab_order.first(),
            };
            self.slots.set_focus(next);
        }

        self.slots
            .update(&self.core, &self.layout, ctx, has_focus, under_mouse);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        if self.draw_background {
            ctx.fill_rect(view, self.core.rect(), self.face)?;
            ctx.frame_rect(view, self.core.rect(), self.border)?;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FrameClock;
    use crate::test_utils::{probe, test_skin, MockBackend};
    use tessera_types::config::UiConfig;
    use tessera_types::diag::RecordingDiagnostics;

    fn make_panel() -> Panel {
        let skin = test_skin();
        let mut panel = Panel::new();
        panel.init(&skin, None).unwrap();
        let core = panel.core_mut();
        core.boundaries = ViewRect::new(0, 0, 400, 300);
        core.master_boundaries = core.boundaries;
        panel
    }

    #[test]
    fn add_places_child_with_panel_bounds() {
        let mut panel = make_panel();
        let slot = panel.add(Box::new(probe())).unwrap();
        let child = panel.slots().child(slot).unwrap();
        assert_eq!(child.core().boundaries, ViewRect::new(0, 0, 100, 100));
    }

    #[test]
    fn failed_add_does_not_leak_slot() {
        let mut panel = make_panel();
        let mut w = probe();
        w.core.initialized = false;
        let before = panel.slots().child_count();
        assert!(panel.add(Box::new(w)).is_err());
        assert_eq!(panel.slots().child_count(), before);
    }

    #[test]
    fn remove_returns_closed_child() {
        let mut panel = make_panel();
        let slot = panel.add(Box::new(probe())).unwrap();
        let removed = panel.remove(slot).unwrap().unwrap();
        assert!(removed.core().closed);
        assert!(!panel.slots().has_slot(slot));
    }

    #[test]
    fn set_size_negotiates_with_children() {
        let mut panel = make_panel();
        let mut diag = RecordingDiagnostics::new();
        panel.set_size(70, 70, &mut diag);
        let mut w = probe();
        w.core.min_width = 50;
        w.core.max_width = 80;
        panel.add(Box::new(w)).unwrap();

        panel.set_size(200, 70, &mut diag);
        assert_eq!(panel.core().width(), 80);
        assert!(diag.is_empty());
    }

    #[test]
    fn update_drives_children() {
        let mut panel = make_panel();
        let w = probe();
        let updates = w.updates.clone();
        panel.add(Box::new(w)).unwrap();

        let input = InputState::new();
        let clock = FrameClock::new();
        let config = UiConfig::default();
        let mut diag = RecordingDiagnostics::new();
        let mut ctx = UpdateContext {
            input: &input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        panel.update(&mut ctx);
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn draw_paints_face_then_children() {
        let skin = test_skin();
        let mut panel = make_panel();
        panel.add(Box::new(probe())).unwrap();
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            panel.draw(&mut ctx, ViewRect::new(0, 0, 400, 300)).unwrap();
        }
        let fills = backend.fill_rects();
        assert_eq!(fills[0].1, skin.color("Panel", "Face").unwrap());
        assert!(fills.len() > 1);
    }

    #[test]
    fn tab_key_cycles_registered_slots() {
        let mut panel = make_panel();
        panel.core_mut().has_focus = true;
        let first = panel.add(Box::new(probe())).unwrap();
        let second = panel.add(Box::new(probe())).unwrap();
        let mut diag = RecordingDiagnostics::new();
        panel.tab_order_mut().add(first, &mut diag);
        panel.tab_order_mut().add(second, &mut diag);

        let mut input = InputState::new();
        input.push_key(tessera_types::input::Key::Tab);
        let clock = FrameClock::new();
        let config = UiConfig::default();
        let mut ctx = UpdateContext {
            input: &input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        panel.update(&mut ctx);
        assert_eq!(panel.slots().focused(), Some(first));

        let mut ctx = UpdateContext {
            input: &input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        panel.update(&mut ctx);
        assert_eq!(panel.slots().focused(), Some(second));

        let mut ctx = UpdateContext {
            input: &input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        panel.update(&mut ctx);
        assert_eq!(panel.slots().focused(), Some(first)); // wraps
    }

    #[test]
    fn close_closes_children() {
        let mut panel = make_panel();
        panel.add(Box::new(probe())).unwrap();
        panel.close();
        assert!(panel.core().closed);
        assert_eq!(panel.slots().child_count(), 0);
    }

    #[test]
    fn background_can_be_disabled() {
        let mut panel = make_panel();
        panel.draw_background = false;
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            panel.draw(&mut ctx, ViewRect::new(0, 0, 400, 300)).unwrap();
        }
        assert_eq!(backend.fill_rect_count(), 0);
    }
}
