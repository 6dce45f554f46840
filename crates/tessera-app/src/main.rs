//! Headless tessera demo.
//!
//! Loads the demo skin, assembles a small widget tree, and drives a few
//! frames through a counting backend. Useful as a smoke test of the whole
//! pipeline and as a template for wiring tessera into a real engine.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use tessera_skin::{SkinFile, StoreKind};
use tessera_types::config::UiConfig;
use tessera_types::diag::LogDiagnostics;
use tessera_types::error::Result;
use tessera_types::input::{InputState, MouseButton};
use tessera_types::resource::{ResourceGroup, ResourceLoader, Texture};
use tessera_types::sprite::SpriteSheet;
use tessera_types::{Color, RenderBackend, TextureId, ViewRect};
use tessera_ui::button::Button;
use tessera_ui::list_box::ListBox;
use tessera_ui::panel::Panel;
use tessera_ui::runtime::FrameClock;
use tessera_ui::text_field::TextField;
use tessera_ui::widget::{DrawContext, UpdateContext, Widget};

/// Counts primitives instead of rasterizing them.
#[derive(Debug, Default)]
struct HeadlessBackend {
    fills: u64,
    blits: u64,
    frames: u64,
}

impl RenderBackend for HeadlessBackend {
    fn clear(&mut self, _color: Color) -> Result<()> {
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: Color) -> Result<()> {
        self.fills += 1;
        Ok(())
    }

    fn blit(&mut self, _tex: TextureId, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<()> {
        self.blits += 1;
        Ok(())
    }

    fn blit_sub(&mut self, _tex: TextureId, _src: ViewRect, _x: i32, _y: i32) -> Result<()> {
        self.blits += 1;
        Ok(())
    }

    fn set_clip_rect(&mut self, _rect: ViewRect) -> Result<()> {
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        Ok(())
    }

    fn dim_screen(&mut self, _mask: Color) -> Result<()> {
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Hands out fabricated texture handles; a real engine would hit disk.
#[derive(Debug, Default)]
struct DemoLoader {
    next_id: u64,
}

impl ResourceLoader for DemoLoader {
    fn load_texture(&mut self, path: &str, group: ResourceGroup) -> Result<Texture> {
        self.next_id += 1;
        log::info!("load texture \"{path}\" into group {group}");
        Ok(Texture {
            id: TextureId(self.next_id),
            width: 256,
            height: 256,
        })
    }

    fn load_spritesheet(&mut self, path: &str, group: ResourceGroup) -> Result<Rc<SpriteSheet>> {
        self.next_id += 1;
        log::info!("load spritesheet \"{path}\" into group {group}");
        Ok(Rc::new(SpriteSheet::new(TextureId(self.next_id))))
    }

    fn unload_group(&mut self, group: ResourceGroup) {
        log::info!("unload group {group}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let skin_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/demo.skin");
    let mut diag = LogDiagnostics;
    let skin = SkinFile::load_file(&skin_path, &mut diag);
    log::info!(
        "skin loaded: {} values, {} colors, {} sprites, {} fonts",
        skin.count(StoreKind::Value),
        skin.count(StoreKind::Color),
        skin.count(StoreKind::Texture),
        skin.count(StoreKind::Font),
    );

    let mut loader = DemoLoader::default();
    let group: ResourceGroup = 1;

    let mut root = build_ui(&skin, &mut loader, group).context("building the demo tree")?;

    let config = UiConfig::default();
    let mut clock = FrameClock::new();
    let mut input = InputState::new();
    let mut backend = HeadlessBackend::default();
    let clicks = wire_click_counter(&mut root);

    for frame in 0..5u32 {
        input.begin_frame();
        // Poke the button on the second frame.
        if frame == 1 {
            input.set_mouse_position(30, 30);
            input.press(MouseButton::Left);
        }
        if frame == 2 {
            input.release(MouseButton::Left);
        }

        clock.advance(Duration::from_millis(16));
        let mut diag = LogDiagnostics;
        let mut ctx = UpdateContext {
            input: &input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        root.core_mut().has_focus = true;
        root.update(&mut ctx);

        let mut draw = DrawContext::new(&mut backend);
        let view = root.core().boundaries;
        root.draw(&mut draw, view)?;
        backend.swap_buffers()?;
    }

    log::info!(
        "ran {} frames: {} fills, {} glyph/sprite blits, {} button clicks",
        backend.frames,
        backend.fills,
        backend.blits,
        clicks.get(),
    );
    println!(
        "tessera demo: {} frames, {} fills, {} blits, title {:?}",
        backend.frames,
        backend.fills,
        backend.blits,
        skin.value("App", "Title").unwrap_or("<missing>"),
    );
    Ok(())
}

fn build_ui(
    skin: &SkinFile,
    loader: &mut dyn ResourceLoader,
    group: ResourceGroup,
) -> Result<Panel> {
    let mut root = Panel::new();
    root.init(skin, None)?;
    {
        let core = root.core_mut();
        core.boundaries = ViewRect::new(0, 0, 640, 480);
        core.master_boundaries = core.boundaries;
        core.set_size(640, 480);
    }

    let mut button = Button::new("Click me");
    button.init(skin, None, loader, group)?;
    button.core_mut().x = 20;
    button.core_mut().y = 20;
    root.add(Box::new(button)).map_err(|e| e.error)?;

    let mut field = TextField::new();
    field.init(skin, None, loader, group)?;
    field.set_text("hello");
    field.core_mut().x = 20;
    field.core_mut().y = 60;
    root.add(Box::new(field)).map_err(|e| e.error)?;

    let mut list = ListBox::new();
    list.init(skin, None, loader, group)?;
    list.set_items(vec!["alpha".into(), "beta".into(), "gamma".into()]);
    list.core_mut().x = 20;
    list.core_mut().y = 100;
    root.add(Box::new(list)).map_err(|e| e.error)?;

    Ok(root)
}

/// Attach a counter to the first button in the tree.
fn wire_click_counter(root: &mut Panel) -> Rc<Cell<u32>> {
    let clicks = Rc::new(Cell::new(0u32));
    let slots: Vec<_> = root.slots().iter().map(|(slot, _)| slot).collect();
    for slot in slots {
        if let Some(widget) = root.slots_mut().child_mut(slot)
            && let Some(button) = widget.as_any_mut().downcast_mut::<Button>()
        {
            let counter = Rc::clone(&clicks);
            button.on_click(move |_| counter.set(counter.get() + 1));
            break;
        }
    }
    clicks
}
