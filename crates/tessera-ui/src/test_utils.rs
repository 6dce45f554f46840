//! Shared test utilities for tessera-ui widget tests.
//!
//! Provides a [`MockBackend`] that records draw calls, a [`StubLoader`]
//! that fabricates textures, a [`ProbeWidget`] for container tests, and a
//! canned skin covering every widget category.

use std::cell::Cell;
use std::rc::Rc;

use tessera_skin::SkinFile;
use tessera_types::diag::RecordingDiagnostics;
use tessera_types::error::Result;
use tessera_types::input::InputState;
use tessera_types::resource::{ResourceGroup, ResourceLoader, Texture};
use tessera_types::sprite::SpriteSheet;
use tessera_types::{Color, RenderBackend, TextureId, ViewRect};

use crate::widget::{clicked_inside, DrawContext, Widget, WidgetCore};

/// A recorded draw call from the mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum DrawCall {
    Clear(Color),
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    Blit {
        tex: TextureId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    BlitSub {
        tex: TextureId,
        src: ViewRect,
        x: i32,
        y: i32,
    },
    SetClip(ViewRect),
    ResetClip,
    Dim(Color),
}

/// Records every draw call for assertions.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }

    pub fn blit_sub_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::BlitSub { .. }))
            .count()
    }

    pub fn dim_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Dim(_)))
            .count()
    }

    /// All fill rectangles with their colors, in draw order.
    pub fn fill_rects(&self) -> Vec<(ViewRect, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { x, y, w, h, color } => {
                    Some((ViewRect::new(*x, *y, *w, *h), *color))
                }
                _ => None,
            })
            .collect()
    }

    /// Whether some fill used the given color.
    pub fn filled_with(&self, color: Color) -> bool {
        self.fill_rects().iter().any(|(_, c)| *c == color)
    }
}

impl RenderBackend for MockBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn blit_sub(&mut self, tex: TextureId, src: ViewRect, x: i32, y: i32) -> Result<()> {
        self.calls.push(DrawCall::BlitSub { tex, src, x, y });
        Ok(())
    }

    fn set_clip_rect(&mut self, rect: ViewRect) -> Result<()> {
        self.calls.push(DrawCall::SetClip(rect));
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.calls.push(DrawCall::ResetClip);
        Ok(())
    }

    fn dim_screen(&mut self, mask: Color) -> Result<()> {
        self.calls.push(DrawCall::Dim(mask));
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fabricates textures and sheets without touching the filesystem.
pub struct StubLoader {
    next_id: u64,
    pub loads: Vec<String>,
}

impl StubLoader {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            loads: Vec::new(),
        }
    }
}

impl ResourceLoader for StubLoader {
    fn load_texture(&mut self, path: &str, _group: ResourceGroup) -> Result<Texture> {
        self.loads.push(path.to_string());
        let id = TextureId(self.next_id);
        self.next_id += 1;
        Ok(Texture {
            id,
            width: 64,
            height: 64,
        })
    }

    fn load_spritesheet(&mut self, path: &str, _group: ResourceGroup) -> Result<Rc<SpriteSheet>> {
        self.loads.push(path.to_string());
        let id = TextureId(self.next_id);
        self.next_id += 1;
        let mut sheet = SpriteSheet::new(id);
        sheet.insert_region("knob", ViewRect::new(0, 0, 8, 8));
        Ok(Rc::new(sheet))
    }

    fn unload_group(&mut self, _group: ResourceGroup) {}
}

/// The skin every widget test initializes from.
const TEST_SKIN: &str = r#"
[FONTS]
Font font_tex "ABCDEFGHIJKLMNOPQRSTUVWXYZ|#|abcdefghijklmnopqrstuvwxyz|#|0123456789 .,:;!?" 6 9 10 1 2
CATEGORY Button
IMPORT_CATEGORY General
CATEGORY TextField
IMPORT_CATEGORY General
CATEGORY ListBox
IMPORT_CATEGORY General
CATEGORY TabContainer
IMPORT_CATEGORY General
CATEGORY Dialogue
IMPORT_CATEGORY General
CATEGORY Label
IMPORT_CATEGORY General

[COLORS]
CATEGORY Panel
Face 40 40 48
Border 70 70 80
CATEGORY Button
Face 60 60 70
FaceHover 75 75 85
FacePressed 50 50 58
Border 110 110 120
Text 230 230 230
CATEGORY TextField
Face 25 25 30
Border 90 90 100
Text 220 220 220
Cursor 255 255 255
CATEGORY ListBox
Face 30 30 36
Text 220 220 220
Selection 70 90 140
CATEGORY VScrollbar
Track 35 35 40
Thumb 80 80 90
Button 60 60 70
CATEGORY SplitPanel
InnerBorderColor 90 90 100
OuterBorderColor 50 50 60
CATEGORY TabContainer
HeaderFace 45 45 52
TabFace 60 60 70
TabActive 80 80 95
Text 225 225 225
Border 100 100 110
CATEGORY Dialogue
Face 40 40 46
TitleFace 60 60 90
TitleText 240 240 240
Border 120 120 130
CATEGORY Label
Text 230 230 230
"#;

/// Parse the shared test skin, asserting it is clean.
pub fn test_skin() -> SkinFile {
    let mut diag = RecordingDiagnostics::new();
    let skin = SkinFile::parse_str(TEST_SKIN, &mut diag);
    assert!(diag.is_empty(), "test skin has errors: {:?}", diag.reports());
    skin
}

/// A minimal widget for exercising the container engine.
pub struct ProbeWidget {
    pub core: WidgetCore,
    pub updates: Rc<Cell<u32>>,
    pub removed: Rc<Cell<bool>>,
    pub focus_claim: bool,
}

/// A ready-to-place probe: initialized, 100x100, no focus claim.
pub fn probe() -> ProbeWidget {
    let mut core = WidgetCore::new();
    core.initialized = true;
    core.set_size(100, 100);
    ProbeWidget {
        core,
        updates: Rc::new(Cell::new(0)),
        removed: Rc::new(Cell::new(false)),
        focus_claim: false,
    }
}

impl ProbeWidget {
    pub fn claim_focus(mut self) -> Self {
        self.focus_claim = true;
        self
    }
}

impl Widget for ProbeWidget {
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

    fn update(&mut self, _ctx: &mut crate::widget::UpdateContext<'_>) {
        self.updates.set(self.updates.get() + 1);
    }

    fn removed_from_container(&mut self) {
        self.removed.set(true);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        ctx.fill_rect(view, self.core.rect(), Color::WHITE)
    }

    fn wants_focus(&self, input: &InputState) -> bool {
        self.focus_claim && clicked_inside(&self.core, input)
    }
}
