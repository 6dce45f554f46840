//! Clickable button widget.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::observer::{ObserverId, Observers};
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// A push button with a text label.
///
/// Click observers fire when the primary button is released over the
/// button after having been pressed over it.
pub struct Button {
    core: WidgetCore,
    pub label: String,
    font: Option<MonoFont>,
    face: Color,
    face_hover: Color,
    face_pressed: Color,
    border: Color,
    text_color: Color,
    pressed: bool,
    click: Observers<()>,
}

impl Button {
    pub const DEFAULT_CATEGORY: &'static str = "Button";

    const PAD_X: u32 = 6;
    const PAD_Y: u32 = 3;

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            core: WidgetCore::new(),
            label: label.into(),
            font: None,
            face: Color::BLACK,
            face_hover: Color::BLACK,
            face_pressed: Color::BLACK,
            border: Color::WHITE,
            text_color: Color::WHITE,
            pressed: false,
            click: Observers::new(),
        }
    }

    /// Load colors and font from the skin and size to the label.
    pub fn init(
        &mut self,
        skin: &SkinFile,
        category: Option<&str>,
        loader: &mut dyn ResourceLoader,
        group: ResourceGroup,
    ) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.face = skin.color(category, "Face")?;
        self.face_hover = skin.color(category, "FaceHover")?;
        self.face_pressed = skin.color(category, "FacePressed")?;
        self.border = skin.color(category, "Border")?;
        self.text_color = skin.color(category, "Text")?;
        let font = skin.font(loader, group, category, "Font")?;

        let width = font.measure(&self.label) + 2 * Self::PAD_X;
        let height = font.line_height() + 2 * Self::PAD_Y;
        self.core.min_width = width;
        self.core.min_height = height;
        self.core.set_size(width, height);
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    /// Register a click callback; fires in registration order.
    pub fn on_click(&mut self, callback: impl FnMut(&()) + 'static) -> ObserverId {
        self.click.subscribe(callback)
    }

    /// Remove a click callback; safe to call twice.
    pub fn remove_click_observer(&mut self, id: ObserverId) -> bool {
        self.click.unsubscribe(id)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Widget for Button {
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
        if ctx.input.was_pressed(MouseButton::Left) && inside {
            self.pressed = true;
        }
        if self.pressed && ctx.input.was_released(MouseButton::Left) {
            self.pressed = false;
            if inside {
                self.click.emit(&());
            }
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        let face = if self.pressed {
            self.face_pressed
        } else if self.core.under_mouse {
            self.face_hover
        } else {
            self.face
        };
        ctx.fill_rect(view, rect, face)?;
        ctx.frame_rect(view, rect, self.border)?;

        if let Some(font) = &self.font {
            let text_w = font.measure(&self.label);
            let tx = rect.x + (rect.width as i32 - text_w as i32) / 2;
            let ty = rect.y + (rect.height as i32 - font.line_height() as i32) / 2;
            ctx.draw_text(view, font, &self.label, tx, ty, self.text_color)?;
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
    use std::cell::Cell;
    use std::rc::Rc;
    use tessera_types::config::UiConfig;
    use tessera_types::diag::RecordingDiagnostics;

    fn make_button(label: &str) -> Button {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let mut button = Button::new(label);
        button.init(&skin, None, &mut loader, 0).unwrap();
        let core = button.core_mut();
        core.boundaries = ViewRect::new(0, 0, 200, 100);
        core.master_boundaries = core.boundaries;
        button
    }

    fn update_with(button: &mut Button, input: &InputState) {
        let clock = FrameClock::new();
        let config = UiConfig::default();
        let mut diag = RecordingDiagnostics::new();
        let mut ctx = UpdateContext {
            input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        button.update(&mut ctx);
    }

    #[test]
    fn init_sizes_to_label() {
        let button = make_button("OK");
        // 2 glyphs: 13px text + 12px padding; 11px line + 6px padding
        assert_eq!(button.core().width(), 25);
        assert_eq!(button.core().height(), 17);
        assert!(button.core().initialized);
    }

    #[test]
    fn click_fires_on_release_inside() {
        let mut button = make_button("Go");
        let fired = Rc::new(Cell::new(0u32));
        let f = Rc::clone(&fired);
        button.on_click(move |_| f.set(f.get() + 1));

        let mut input = InputState::new();
        input.set_mouse_position(5, 5);
        input.press(MouseButton::Left);
        update_with(&mut button, &input);
        assert!(button.is_pressed());
        assert_eq!(fired.get(), 0);

        input.begin_frame();
        input.release(MouseButton::Left);
        update_with(&mut button, &input);
        assert!(!button.is_pressed());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn release_outside_does_not_fire() {
        let mut button = make_button("Go");
        let fired = Rc::new(Cell::new(0u32));
        let f = Rc::clone(&fired);
        button.on_click(move |_| f.set(f.get() + 1));

        let mut input = InputState::new();
        input.set_mouse_position(5, 5);
        input.press(MouseButton::Left);
        update_with(&mut button, &input);

        input.begin_frame();
        input.set_mouse_position(500, 500);
        input.release(MouseButton::Left);
        update_with(&mut button, &input);
        assert_eq!(fired.get(), 0);
        assert!(!button.is_pressed());
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut button = make_button("Go");
        let mut input = InputState::new();
        input.set_mouse_position(500, 500);
        input.press(MouseButton::Left);
        update_with(&mut button, &input);
        assert!(!button.is_pressed());
    }

    #[test]
    fn observers_fire_in_order_and_unsubscribe() {
        let mut button = make_button("Go");
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _a = button.on_click(move |_| l1.borrow_mut().push(1));
        let l2 = Rc::clone(&log);
        let b = button.on_click(move |_| l2.borrow_mut().push(2));
        assert!(button.remove_click_observer(b));
        assert!(!button.remove_click_observer(b));

        let mut input = InputState::new();
        input.set_mouse_position(5, 5);
        input.press(MouseButton::Left);
        update_with(&mut button, &input);
        input.begin_frame();
        input.release(MouseButton::Left);
        update_with(&mut button, &input);
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn draw_uses_state_colors() {
        let skin = test_skin();
        let mut button = make_button("Go");
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            button
                .draw(&mut ctx, ViewRect::new(0, 0, 200, 100))
                .unwrap();
        }
        assert!(backend.filled_with(skin.color("Button", "Face").unwrap()));
        assert!(backend.blit_sub_count() > 0, "label glyphs drawn");

        button.pressed = true;
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            button
                .draw(&mut ctx, ViewRect::new(0, 0, 200, 100))
                .unwrap();
        }
        assert!(backend.filled_with(skin.color("Button", "FacePressed").unwrap()));
    }

    #[test]
    fn hover_color_when_under_mouse() {
        let skin = test_skin();
        let mut button = make_button("Go");
        button.core_mut().under_mouse = true;
        let mut backend = MockBackend::new();
        {
            let mut ctx = DrawContext::new(&mut backend);
            button
                .draw(&mut ctx, ViewRect::new(0, 0, 200, 100))
                .unwrap();
        }
        assert!(backend.filled_with(skin.color("Button", "FaceHover").unwrap()));
    }

    #[test]
    fn wants_focus_on_click_inside() {
        let button = make_button("Go");
        let mut input = InputState::new();
        input.set_mouse_position(5, 5);
        input.press(MouseButton::Left);
        assert!(button.wants_focus(&input));

        let mut outside = InputState::new();
        outside.set_mouse_position(500, 5);
        outside.press(MouseButton::Left);
        assert!(!button.wants_focus(&outside));
    }
}
