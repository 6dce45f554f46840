//! Vertical scrollbar widget.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::observer::{ObserverId, Observers};
use crate::widget::{clicked_inside, DrawContext, UpdateContext, Widget, WidgetCore};

/// A vertical scrollbar: step buttons at both ends, draggable thumb, a
/// value in `0..=max`.
pub struct VScrollbar {
    core: WidgetCore,
    value: i32,
    max: i32,
    track: Color,
    thumb: Color,
    button: Color,
    /// Grab offset within the thumb while dragging.
    dragging: Option<i32>,
    changed: Observers<i32>,
}

impl VScrollbar {
    pub const DEFAULT_CATEGORY: &'static str = "VScrollbar";

    pub const DEFAULT_WIDTH: u32 = 15;
    const MIN_THUMB: u32 = 8;

    pub fn new() -> Self {
        Self {
            core: WidgetCore::new(),
            value: 0,
            max: 0,
            track: Color::BLACK,
            thumb: Color::WHITE,
            button: Color::WHITE,
            dragging: None,
            changed: Observers::new(),
        }
    }

    pub fn init(&mut self, skin: &SkinFile, category: Option<&str>) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.track = skin.color(category, "Track")?;
        self.thumb = skin.color(category, "Thumb")?;
        self.button = skin.color(category, "Button")?;
        self.core.min_width = Self::DEFAULT_WIDTH;
        self.core.max_width = Self::DEFAULT_WIDTH;
        self.core.min_height = 3 * Self::DEFAULT_WIDTH;
        self.core.set_size(Self::DEFAULT_WIDTH, 100);
        self.core.initialized = true;
        Ok(())
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn set_value(&mut self, value: i32) {
        let clamped = value.clamp(0, self.max);
        if clamped != self.value {
            self.value = clamped;
            let v = self.value;
            self.changed.emit(&v);
        }
    }

    /// Set the scroll range; 0 disables the bar. The value is re-clamped.
    pub fn set_max(&mut self, max: i32) {
        self.max = max.max(0);
        self.value = self.value.clamp(0, self.max);
    }

    /// Register a callback fired with the new value after every change.
    pub fn on_change(&mut self, callback: impl FnMut(&i32) + 'static) -> ObserverId {
        self.changed.subscribe(callback)
    }

    pub fn remove_change_observer(&mut self, id: ObserverId) -> bool {
        self.changed.unsubscribe(id)
    }

    fn button_height(&self) -> u32 {
        self.core.width()
    }

    /// Track span between the step buttons, screen space.
    fn track_rect(&self) -> ViewRect {
        let rect = self.core.rect();
        let bh = self.button_height();
        ViewRect::new(
            rect.x,
            rect.y + bh as i32,
            rect.width,
            rect.height.saturating_sub(2 * bh),
        )
    }

    fn thumb_height(&self) -> u32 {
        let track_h = self.track_rect().height;
        if self.max <= 0 {
            return track_h;
        }
        let proportional = track_h as u64 * track_h as u64 / (track_h as u64 + self.max as u64);
        (proportional as u32).clamp(Self::MIN_THUMB.min(track_h), track_h)
    }

    fn thumb_rect(&self) -> ViewRect {
        let track = self.track_rect();
        let thumb_h = self.thumb_height();
        let span = track.height.saturating_sub(thumb_h) as i64;
        let offset = if self.max > 0 {
            (span * self.value as i64 / self.max as i64) as i32
        } else {
            0
        };
        ViewRect::new(track.x, track.y + offset, track.width, thumb_h)
    }

    fn value_for_thumb_top(&self, thumb_top: i32) -> i32 {
        let track = self.track_rect();
        let span = track.height.saturating_sub(self.thumb_height()) as i64;
        if span == 0 {
            return 0;
        }
        let offset = (thumb_top - track.y).clamp(0, span as i32) as i64;
        (offset * self.max as i64 / span) as i32
    }
}

impl Default for VScrollbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for VScrollbar {
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
        if self.max <= 0 {
            self.dragging = None;
            return;
        }
        let input = ctx.input;
        let step = ctx.config.scroll_step as i32;
        let rect = self.core.rect();
        let visible = self.core.visible_rect();
        let bh = self.button_height() as i32;

        if input.was_pressed(MouseButton::Left) && input.mouse_in(visible) {
            let thumb = self.thumb_rect();
            if input.mouse_in(thumb) {
                self.dragging = Some(input.mouse_y - thumb.y);
            } else if input.mouse_y < rect.y + bh {
                self.set_value(self.value - step);
            } else if input.mouse_y >= rect.bottom() - bh {
                self.set_value(self.value + step);
            } else {
                // Track click: jump a viewport's worth toward the click.
                let thumb = self.thumb_rect();
                if input.mouse_y < thumb.y {
                    self.set_value(self.value - self.track_rect().height as i32);
                } else {
                    self.set_value(self.value + self.track_rect().height as i32);
                }
            }
        }

        if let Some(grab) = self.dragging {
            if input.is_down(MouseButton::Left) {
                let new_value = self.value_for_thumb_top(input.mouse_y - grab);
                self.set_value(new_value);
            } else {
                self.dragging = None;
            }
        }

        if input.wheel_delta != 0 && input.mouse_in(visible) {
            self.set_value(self.value - input.wheel_delta * step);
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let rect = self.core.rect();
        let bh = self.button_height();
        ctx.fill_rect(view, self.track_rect(), self.track)?;
        ctx.fill_rect(view, ViewRect::new(rect.x, rect.y, rect.width, bh), self.button)?;
        ctx.fill_rect(
            view,
            ViewRect::new(rect.x, rect.bottom() - bh as i32, rect.width, bh),
            self.button,
        )?;
        if self.max > 0 {
            ctx.fill_rect(view, self.thumb_rect(), self.thumb)?;
        }
        Ok(())
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        clicked_inside(&self.core, input)
    }
}
