//! Scrollable string list with single selection.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::observer::{ObserverId, Observers};
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// A vertical list of rows; wheel scrolls, click selects.
pub struct ListBox {
    core: WidgetCore,
    items: Vec<String>,
    selected: Option<usize>,
    /// Scroll offset in pixels, non-negative.
    scroll_y: i32,
    row_height: u32,
    font: Option<MonoFont>,
    face: Color,
    text_color: Color,
    selection: Color,
    select: Observers<usize>,
}

impl ListBox {
    pub const DEFAULT_CATEGORY: &'static str = "ListBox";

    const PAD: i32 = 2;

    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            items: Vec::new(),
            selected: None,
            scroll_y: 0,
            row_height: 1,
            font: None,
            face: Color::BLACK,
            text_color: Color::WHITE,
            selection: Color::WHITE,
            select: Observers::new(),
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
        self.text_color = skin.color(category, "Text")?;
        self.selection = skin.color(category, "Selection")?;
        let font = skin.font(loader, group, category, "Font")?;
        self.row_height = font.line_height() + 2;
        self.core.min_height = self.row_height;
        self.core.set_size(140, self.row_height * 6);
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = None;
        self.scroll_y = 0;
    }

    pub fn push_item(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected.map(|i| self.items[i].as_str())
    }

    /// Select a row programmatically; observers do not fire.
    pub fn set_selected(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.items.len());
    }

    /// Register a callback fired with the row index on click selection.
    pub fn on_select(&mut self, callback: impl FnMut(&usize) + 'static) -> ObserverId {
        self.select.subscribe(callback)
    }

    pub fn remove_select_observer(&mut self, id: ObserverId) -> bool {
        self.select.unsubscribe(id)
    }

    pub fn content_height(&self) -> u32 {
        self.items.len() as u32 * self.row_height
    }

    fn max_scroll(&self) -> i32 {
        (self.content_height() as i32 - self.core.height() as i32).max(0)
    }

    /// Scroll the given row into the viewport.
    pub fn scroll_to(&mut self, index: usize) {
        let row_top = index as i32 * self.row_height as i32;
        let row_bottom = row_top + self.row_height as i32;
        let height = self.core.height() as i32;
        if row_top < self.scroll_y {
            self.scroll_y = row_top;
        } else if row_bottom > self.scroll_y + height {
            self.scroll_y = row_bottom - height;
        }
        self.scroll_y = self.scroll_y.clamp(0, self.max_scroll());
    }

    fn row_at(&self, screen_y: i32) -> Option<usize> {
        let local = screen_y - self.core.real_y() + self.scroll_y;
        if local < 0 {
            return None;
        }
        let index = (local / self.row_height as i32) as usize;
        (index < self.items.len()).then_some(index)
    }
}

impl Default for ListBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for ListBox {
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
        let inside = ctx.input.mouse_in(self.core.visible_rect());

        if inside && ctx.input.wheel_delta != 0 {
            self.scroll_y -= ctx.input.wheel_delta * ctx.config.scroll_step as i32;
            self.scroll_y = self.scroll_y.clamp(0, self.max_scroll());
        }

        if inside
            && ctx.input.was_pressed(MouseButton::Left)
            && let Some(row) = self.row_at(ctx.input.mouse_y)
        {
            self.selected = Some(row);
            self.select.emit(&row);
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        ctx.fill_rect(view, rect, self.face)?;

        let Some(font) = &self.font else {
            return Ok(());
        };
        let inner = view.intersect(rect);
        if inner.is_empty() {
            return Ok(());
        }

        let first = (self.scroll_y / self.row_height as i32).max(0) as usize;
        let visible = (rect.height / self.row_height + 2) as usize;
        let last = (first + visible).min(self.items.len());

        for index in first..last {
            let row_y = rect.y + index as i32 * self.row_height as i32 - self.scroll_y;
            if self.selected == Some(index) {
                ctx.fill_rect(
                    inner,
                    ViewRect::new(rect.x, row_y, rect.width, self.row_height),
                    self.selection,
                )?;
            }
            ctx.draw_text(
                inner,
                font,
                &self.items[index],
                rect.x + Self::PAD,
                row_y + 1,
                self.text_color,
            )?;
        }
        Ok(())
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        clicked_inside(&self.core, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FrameClock;
    use crate::test_utils::{test_skin, MockBackend, StubLoader};
    use tessera_types::config::UiConfig;
    use tessera_types::diag::RecordingDiagnostics;

    fn make_list(rows: usize) -> ListBox {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let mut list = ListBox::new();
        list.init(&skin, None, &mut loader, 0).unwrap();
        list.set_items((0..rows).map(|i| format!("row{i}")).collect());
        let core = list.core_mut();
        core.boundaries = ViewRect::new(0, 0, 300, 300);
        core.master_boundaries = core.boundaries;
        list
    }

    fn update_with(list: &mut ListBox, input: &InputState) {
        let clock = FrameClock::new();
        let config = UiConfig::default();
        let mut diag = RecordingDiagnostics::new();
        let mut ctx = UpdateContext {
            input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        list.update(&mut ctx);
    }

    #[test]
    fn row_height_follows_font() {
        let list = make_list(0);
        assert_eq!(list.row_height, 13); // 11px line + 2
        assert_eq!(list.core().height(), 78);
    }

    #[test]
    fn click_selects_row_and_fires() {
        let mut list = make_list(10);
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let s = std::rc::Rc::clone(&seen);
        list.on_select(move |i| s.borrow_mut().push(*i));

        let mut input = InputState::new();
        input.set_mouse_position(10, 30); // row 2 at 13px rows
        input.press(MouseButton::Left);
        update_with(&mut list, &input);
        assert_eq!(list.selected(), Some(2));
        assert_eq!(list.selected_item(), Some("row2"));
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn click_below_rows_selects_nothing() {
        let mut list = make_list(2);
        let mut input = InputState::new();
        input.set_mouse_position(10, 70);
        input.press(MouseButton::Left);
        update_with(&mut list, &input);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn wheel_scrolls_and_clamps() {
        let mut list = make_list(20); // content 260, viewport 78
        let mut input = InputState::new();
        input.set_mouse_position(10, 10);
        input.wheel_delta = -2; // scroll down
        update_with(&mut list, &input);
        assert_eq!(list.scroll_y, 24); // 2 * 12px step

        // Scrolling up past the top clamps to zero.
        input.begin_frame();
        input.wheel_delta = 50;
        update_with(&mut list, &input);
        assert_eq!(list.scroll_y, 0);
    }

    #[test]
    fn wheel_outside_does_nothing() {
        let mut list = make_list(20);
        let mut input = InputState::new();
        input.set_mouse_position(500, 500);
        input.wheel_delta = -2;
        update_with(&mut list, &input);
        assert_eq!(list.scroll_y, 0);
    }

    #[test]
    fn scroll_accounts_for_click_row() {
        let mut list = make_list(30);
        list.scroll_y = 26; // two rows scrolled off
        let mut input = InputState::new();
        input.set_mouse_position(10, 0);
        input.press(MouseButton::Left);
        update_with(&mut list, &input);
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn scroll_to_clamps_to_content() {
        let mut list = make_list(20);
        list.scroll_to(19);
        assert_eq!(list.scroll_y, list.max_scroll());
        list.scroll_to(0);
        assert_eq!(list.scroll_y, 0);
    }

    #[test]
    fn set_selected_validates_index() {
        let mut list = make_list(3);
        list.set_selected(Some(2));
        assert_eq!(list.selected(), Some(2));
        list.set_selected(Some(99));
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn draw_highlights_selection() {
        let skin = test_skin();
        let mut list = make_list(5);
        list.set_selected(Some(1));
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            list.draw(&mut ctx, ViewRect::new(0, 0, 300, 300)).unwrap();
        }
        assert!(backend.filled_with(skin.color("ListBox", "Selection").unwrap()));
        assert!(backend.blit_sub_count() > 0);
    }

    #[test]
    fn draw_skips_rows_above_scroll() {
        let mut list = make_list(20);
        list.scroll_y = 40; // rows 0-2 fully above
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            list.draw(&mut ctx, ViewRect::new(0, 0, 300, 300)).unwrap();
        }
        // Row 0 has 4 glyphs; if it were drawn there would be blits at
        // negative y. All recorded glyph blits sit inside the widget.
        for call in &backend.calls {
            if let crate::test_utils::DrawCall::BlitSub { y, .. } = call {
                assert!(*y >= -(list.row_height as i32));
            }
        }
    }

    #[test]
    fn empty_list_draws_background_only() {
        let list = make_list(0);
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            list.draw(&mut ctx, ViewRect::new(0, 0, 300, 300)).unwrap();
        }
        assert_eq!(backend.fill_rect_count(), 1);
        assert_eq!(backend.blit_sub_count(), 0);
    }
}
