//! Draggable titled form container for the dialogue stack.
//!
//! A `Dialogue` is a panel with a title bar. Its content slots cover the
//! area below the title bar; dragging the title bar moves the whole form
//! within its boundaries. The owning container decides modality by
//! pushing the dialogue's slot onto its dialogue stack.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::container::{PlaceError, SlotContainer, SlotId, SlotLayout};
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// Content lives below the title bar.
#[derive(Debug, Clone, Copy)]
struct DialogueLayout {
    title_height: u32,
}

impl SlotLayout for DialogueLayout {
    fn slot_bounds(&self, _slot: SlotId, frame: &WidgetCore, width: u32, height: u32) -> ViewRect {
        ViewRect::new(
            frame.real_x(),
            frame.real_y() + self.title_height as i32,
            width,
            height.saturating_sub(self.title_height),
        )
    }
}

/// A movable form with a title bar.
pub struct Dialogue {
    core: WidgetCore,
    slots: SlotContainer,
    layout: DialogueLayout,
    pub title: String,
    font: Option<MonoFont>,
    face: Color,
    title_face: Color,
    title_text: Color,
    border: Color,
    /// Grab offset while the title bar is being dragged.
    dragging: Option<(i32, i32)>,
}

impl Dialogue {
    pub const DEFAULT_CATEGORY: &'static str = "Dialogue";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            core: WidgetCore::new(),
            slots: SlotContainer::new(),
            layout: DialogueLayout { title_height: 16 },
            title: title.into(),
            font: None,
            face: Color::BLACK,
            title_face: Color::BLACK,
            title_text: Color::WHITE,
            border: Color::WHITE,
            dragging: None,
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
        self.face = skin.color(category, "Face")?;
        self.title_face = skin.color(category, "TitleFace")?;
        self.title_text = skin.color(category, "TitleText")?;
        self.border = skin.color(category, "Border")?;
        let font = skin.font(loader, group, category, "Font")?;
        self.layout.title_height = font.line_height() + 4;
        self.core.min_height = self.layout.title_height;
        self.core.min_width = font.measure(&self.title) + 8;
        self.core.set_size(180, 120);
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    pub fn title_height(&self) -> u32 {
        self.layout.title_height
    }

    /// Add a content widget below the title bar.
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

    pub fn slots_mut(&mut self) -> &mut SlotContainer {
        &mut self.slots
    }

    fn title_rect(&self) -> ViewRect {
        let rect = self.core.rect();
        ViewRect::new(rect.x, rect.y, rect.width, self.layout.title_height)
    }
}

impl Widget for Dialogue {
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

        if input.was_pressed(MouseButton::Left)
            && input.mouse_in(self.title_rect().intersect(self.core.visible_rect()))
        {
            self.dragging = Some((
                input.mouse_x - self.core.x,
                input.mouse_y - self.core.y,
            ));
        }
        if let Some((grab_x, grab_y)) = self.dragging {
            if input.is_down(MouseButton::Left) {
                self.core.x = input.mouse_x - grab_x;
                self.core.y = input.mouse_y - grab_y;
            } else {
                self.dragging = None;
            }
        }

        let has_focus = self.core.has_focus;
        let under_mouse = self.core.under_mouse || input.mouse_in(self.core.visible_rect());
        self.slots
            .update(&self.core, &self.layout, ctx, has_focus, under_mouse);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        ctx.fill_rect(view, rect, self.face)?;
        ctx.fill_rect(view, self.title_rect(), self.title_face)?;
        if let Some(font) = &self.font {
            ctx.draw_text(
                view,
                font,
                &self.title,
                rect.x + 4,
                rect.y + 2,
                self.title_text,
            )?;
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
