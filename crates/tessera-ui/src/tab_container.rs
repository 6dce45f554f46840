//! Tab container: a header strip of tabs over one content page at a time.
//!
//! The content slots all map to the area below the header strip; switching
//! tabs hides and suspends the inactive pages. This is the standard
//! example of overriding [`SlotLayout::slot_bounds`] to carve a
//! sub-rectangle out of the container.

use tessera_skin::SkinFile;
use tessera_types::diag::Diagnostics;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::container::{PlaceError, SlotContainer, SlotId, SlotLayout};
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// Containment rules: every page lives below the header strip.
#[derive(Debug, Clone, Copy)]
struct TabLayout {
    header_height: u32,
}

impl SlotLayout for TabLayout {
    fn slot_bounds(&self, _slot: SlotId, frame: &WidgetCore, width: u32, height: u32) -> ViewRect {
        ViewRect::new(
            frame.real_x(),
            frame.real_y() + self.header_height as i32,
            width,
            height.saturating_sub(self.header_height),
        )
    }
}

struct Page {
    title: String,
    slot: SlotId,
}

/// A container with one selectable page per tab.
pub struct TabContainer {
    core: WidgetCore,
    slots: SlotContainer,
    layout: TabLayout,
    pages: Vec<Page>,
    active: usize,
    font: Option<MonoFont>,
    header_face: Color,
    tab_face: Color,
    tab_active: Color,
    text_color: Color,
    border: Color,
}

impl TabContainer {
    pub const DEFAULT_CATEGORY: &'static str = "TabContainer";

    const TAB_PAD: u32 = 6;

    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            slots: SlotContainer::new(),
            layout: TabLayout { header_height: 16 },
            pages: Vec::new(),
            active: 0,
            font: None,
            header_face: Color::BLACK,
            tab_face: Color::BLACK,
            tab_active: Color::WHITE,
            text_color: Color::WHITE,
            border: Color::WHITE,
        }
    }

    pub fn init(
        &mut self,
        skin: &SkinFile,
        category: Option<&str>,
        loader: &mut dyn ResourceLoader,
        group: ResourceGroup,
    ) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.header_face = skin.color(category, "HeaderFace")?;
        self.tab_face = skin.color(category, "TabFace")?;
        self.tab_active = skin.color(category, "TabActive")?;
        self.text_color = skin.color(category, "Text")?;
        self.border = skin.color(category, "Border")?;
        let font = skin.font(loader, group, category, "Font")?;
        self.layout.header_height = font.line_height() + 6;
        self.core.min_height = self.layout.header_height;
        self.core.set_size(200, 150);
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    pub fn header_height(&self) -> u32 {
        self.layout.header_height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn active_page(&self) -> usize {
        self.active
    }

    /// Add a page; the first page added becomes active.
    pub fn add_page(
        &mut self,
        title: impl Into<String>,
        widget: Box<dyn Widget>,
    ) -> std::result::Result<SlotId, PlaceError> {
        let slot = self.slots.add_slot();
        match self.slots.place(widget, slot, &self.core, &self.layout) {
            Ok(()) => {
                self.pages.push(Page {
                    title: title.into(),
                    slot,
                });
                self.refresh_page_visibility();
                Ok(slot)
            }
            Err(err) => {
                let _ = self.slots.remove_slot(slot);
                Err(err)
            }
        }
    }

    /// Access a page's widget for population.
    pub fn page_mut(&mut self, slot: SlotId) -> Option<&mut (dyn Widget + 'static)> {
        self.slots.child_mut(slot)
    }

    /// Switch the visible page.
    pub fn set_active(&mut self, index: usize) {
        if index < self.pages.len() {
            self.active = index;
            self.refresh_page_visibility();
        }
    }

    fn refresh_page_visibility(&mut self) {
        for (index, page) in self.pages.iter().enumerate() {
            if let Some(child) = self.slots.child_mut(page.slot) {
                let core = child.core_mut();
                core.hidden = index != self.active;
                core.suspended = index != self.active;
            }
        }
    }

    /// Screen rectangle of one tab in the header strip.
    fn tab_rect(&self, index: usize) -> ViewRect {
        let Some(font) = &self.font else {
            return ViewRect::EMPTY;
        };
        let mut x = self.core.real_x();
        for (i, page) in self.pages.iter().enumerate() {
            let width = font.measure(&page.title) + 2 * Self::TAB_PAD;
            if i == index {
                return ViewRect::new(x, self.core.real_y(), width, self.layout.header_height);
            }
            x += width as i32;
        }
        ViewRect::EMPTY
    }

    fn tab_at(&self, mx: i32, my: i32) -> Option<usize> {
        (0..self.pages.len()).find(|i| self.tab_rect(*i).contains(mx, my))
    }

    /// Resize, negotiating with the active page's extents.
    pub fn set_size(&mut self, width: u32, height: u32, diag: &mut dyn Diagnostics) {
        let (old_w, old_h) = (self.core.width(), self.core.height());
        self.core.set_size(width, height);
        self.slots
            .make_size_valid(&mut self.core, &self.layout, old_w, old_h, diag);
    }
}

impl Default for TabContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TabContainer {
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
        if ctx.input.was_pressed(MouseButton::Left)
            && let Some(tab) = self.tab_at(ctx.input.mouse_x, ctx.input.mouse_y)
        {
            self.set_active(tab);
        }
        let has_focus = self.core.has_focus;
        let under_mouse = self.core.under_mouse || ctx.input.mouse_in(self.core.visible_rect());
        self.slots
            .update(&self.core, &self.layout, ctx, has_focus, under_mouse);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        let header = ViewRect::new(rect.x, rect.y, rect.width, self.layout.header_height);
        ctx.fill_rect(view, header, self.header_face)?;

        if let Some(font) = &self.font {
            for (index, page) in self.pages.iter().enumerate() {
                let tab = self.tab_rect(index);
                let face = if index == self.active {
                    self.tab_active
                } else {
                    self.tab_face
                };
                ctx.fill_rect(view, tab, face)?;
                ctx.draw_text(
                    view,
                    font,
                    &page.title,
                    tab.x + Self::TAB_PAD as i32,
                    tab.y + (tab.height as i32 - font.line_height() as i32) / 2,
                    self.text_color,
                )?;
            }
        }

        ctx.frame_rect(view, rect, self.border)?;
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
