//! Static text widget.

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::font::MonoFont;
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::{Color, ViewRect};

use crate::widget::{DrawContext, Widget, WidgetCore};

/// A single line of text, sized to its content.
pub struct Label {
    core: WidgetCore,
    text: String,
    font: Option<MonoFont>,
    color: Color,
}

impl Label {
    pub const DEFAULT_CATEGORY: &'static str = "Label";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            core: WidgetCore::new(),
            text: text.into(),
            font: None,
            color: Color::WHITE,
        }
    }

    /// Load font and color from the skin. `category` defaults to `Label`.
    pub fn init(
        &mut self,
        skin: &SkinFile,
        category: Option<&str>,
        loader: &mut dyn ResourceLoader,
        group: ResourceGroup,
    ) -> Result<()> {
        let category = category.unwrap_or(Self::DEFAULT_CATEGORY);
        self.color = skin.color(category, "Text")?;
        let font = skin.font(loader, group, category, "Font")?;
        self.core
            .set_size(font.measure(&self.text), font.line_height());
        self.font = Some(font);
        self.core.initialized = true;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; the label resizes to fit.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if let Some(font) = &self.font {
            self.core
                .set_size(font.measure(&self.text), font.line_height());
        }
    }
}

impl Widget for Label {
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

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let Some(font) = &self.font else {
            return Ok(());
        };
        ctx.draw_text(
            view,
            font,
            &self.text,
            self.core.real_x(),
            self.core.real_y(),
            self.color,
        )
    }
}
