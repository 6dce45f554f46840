//! Single-line text editor widget.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::{InputState, Key, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::observer::{ObserverId, Observers};
use crate::runtime::Blink;
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// A focusable single-line editor with caret, selection-free editing keys,
/// and horizontal scroll-into-view.
pub struct TextField {
    core: WidgetCore,
    text: String,
    /// Caret position in characters.
    cursor: usize,
    /// Horizontal scroll in pixels.
    scroll_px: i32,
    font: Option<MonoFont>,
    face: Color,
    border: Color,
    text_color: Color,
    cursor_color: Color,
    blink: Blink,
    blink_interval: u32,
    changed: Observers<String>,
}

impl TextField {
    pub const DEFAULT_CATEGORY: &'static str = "TextField";

    const PAD: i32 = 3;

    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            text: String::new(),
            cursor: 0,
            scroll_px: 0,
            font: None,
            face: Color::BLACK,
            border: Color::WHITE,
            text_color: Color::WHITE,
            cursor_color: Color::WHITE,
            blink: Blink::new(530),
            blink_interval: 530,
            changed: Observers::new(),
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
        self.border = skin.color(category, "Border")?;
        self.text_color = skin.color(category, "Text")?;
        self.cursor_color = skin.color(category, "Cursor")?;
        let font = skin.font(loader, group, category, "Font")?;

        let height = font.line_height() + 2 * Self::PAD as u32;
        self.core.min_width = font.advance() + 2 * Self::PAD as u32;
        self.core.min_height = height;
        self.core.set_size(120, height);
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.cursor.min(self.char_count());
        self.scroll_px = 0;
    }

    /// Register a callback fired with the new text after every edit.
    pub fn on_change(&mut self, callback: impl FnMut(&String) + 'static) -> ObserverId {
        self.changed.subscribe(callback)
    }

    pub fn remove_change_observer(&mut self, id: ObserverId) -> bool {
        self.changed.unsubscribe(id)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn remove_char(&mut self, char_index: usize) {
        let at = self.byte_index(char_index);
        self.text.remove(at);
    }

    /// Keep the caret within the visible text span.
    fn scroll_cursor_into_view(&mut self) {
        let Some(font) = &self.font else {
            return;
        };
        let inner_width = self.core.width() as i32 - 2 * Self::PAD;
        let cursor_px = self.cursor as i32 * font.advance() as i32;
        if cursor_px - self.scroll_px < 0 {
            self.scroll_px = cursor_px;
        } else if cursor_px - self.scroll_px > inner_width {
            self.scroll_px = cursor_px - inner_width;
        }
    }

    fn handle_edit_keys(&mut self, input: &InputState) -> bool {
        let mut edited = false;
        let mut moved = false;

        for ch in input.typed() {
            if !ch.is_control() {
                self.insert_char(*ch);
                edited = true;
            }
        }

        for key in input.keys() {
            match key {
                Key::Left => {
                    self.cursor = self.cursor.saturating_sub(1);
                    moved = true;
                }
                Key::Right => {
                    self.cursor = (self.cursor + 1).min(self.char_count());
                    moved = true;
                }
                Key::Home => {
                    self.cursor = 0;
                    moved = true;
                }
                Key::End => {
                    self.cursor = self.char_count();
                    moved = true;
                }
                Key::Backspace => {
                    if self.cursor > 0 {
                        self.cursor -= 1;
                        self.remove_char(self.cursor);
                        edited = true;
                    }
                }
                Key::Delete => {
                    if self.cursor < self.char_count() {
                        self.remove_char(self.cursor);
                        edited = true;
                    }
                }
                _ => {}
            }
        }

        if edited {
            let text = self.text.clone();
            self.changed.emit(&text);
        }
        edited || moved
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TextField {
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
        if self.blink_interval != ctx.config.cursor_blink_ms {
            self.blink_interval = ctx.config.cursor_blink_ms;
            self.blink = Blink::new(self.blink_interval);
        }

        if ctx.input.was_pressed(MouseButton::Left)
            && ctx.input.mouse_in(self.core.visible_rect())
            && let Some(font) = &self.font
        {
            let text_x = self.core.real_x() + Self::PAD - self.scroll_px;
            self.cursor = font.char_index_at(&self.text, ctx.input.mouse_x - text_x);
            self.blink.reset();
        }

        if self.core.has_focus {
            if self.handle_edit_keys(ctx.input) {
                self.blink.reset();
            }
            self.scroll_cursor_into_view();
            self.blink.tick(ctx.clock.delta_ms());
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        ctx.fill_rect(view, rect, self.face)?;
        ctx.frame_rect(view, rect, self.border)?;

        let Some(font) = &self.font else {
            return Ok(());
        };

        // Text and caret clip to the inner area, inside the border.
        let inner = view.intersect(ViewRect::new(
            rect.x + 1,
            rect.y + 1,
            rect.width.saturating_sub(2),
            rect.height.saturating_sub(2),
        ));
        let text_x = rect.x + Self::PAD - self.scroll_px;
        let text_y = rect.y + Self::PAD;
        ctx.draw_text(inner, font, &self.text, text_x, text_y, self.text_color)?;

        if self.core.has_focus && self.blink.visible() {
            let cursor_x = text_x + self.cursor as i32 * font.advance() as i32;
            ctx.fill_rect(
                inner,
                ViewRect::new(cursor_x, text_y, 1, font.char_height()),
                self.cursor_color,
            )?;
        }
        Ok(())
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        clicked_inside(&self.core, input)
    }
}
