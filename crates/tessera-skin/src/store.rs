//! The resolved, read-only skin store.
//!
//! Four independent two-level lookups keyed by `(category, name)`: fonts,
//! sprites, colors, and raw string values. Once built the store is
//! immutable; lookups of absent pairs return a typed
//! [`TesseraError::MissingEntry`].
//!
//! Duplicate `(category, name)` rows within one store kind keep the first
//! entry; the duplicate is skipped and reported.

use std::collections::HashMap;
use std::path::Path;

use tessera_types::diag::Diagnostics;
use tessera_types::error::{Result, TesseraError};
use tessera_types::font::MonoFont;
use tessera_types::resource::{ResourceGroup, ResourceLoader};
use tessera_types::sprite::Sprite;
use tessera_types::Color;

use crate::element::{Command, Element, StoreKind};
use crate::resolver;
use crate::source::{FsSource, MemorySource, SkinSource};

/// Everything needed to build a [`MonoFont`] once its texture is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub texture: String,
    /// Glyph rows of the grid texture, in order.
    pub characters: Vec<String>,
    pub char_width: u32,
    pub char_height: u32,
    pub grid_size: u32,
    pub h_space: u32,
    pub v_space: u32,
}

/// A sprite reference: a sheet region, or a standalone texture when
/// `spritesheet` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSpec {
    pub spritesheet: Option<String>,
    pub texture: String,
}

type Key = (String, String);

/// The typed skin store built by [`SkinFile::load`].
#[derive(Debug, Default)]
pub struct SkinFile {
    fonts: HashMap<Key, FontSpec>,
    sprites: HashMap<Key, SpriteSpec>,
    colors: HashMap<Key, Color>,
    values: HashMap<Key, String>,
}

impl SkinFile {
    /// Load and resolve a skin-file tree through `source`.
    ///
    /// Soft errors degrade individual constructs and are reported through
    /// `diag`; the returned store always contains every row that survived.
    pub fn load(path: &Path, source: &dyn SkinSource, diag: &mut dyn Diagnostics) -> Self {
        let elements = resolver::resolve(path, source, diag);
        Self::from_elements(elements, diag)
    }

    /// Load from the filesystem.
    pub fn load_file(path: &Path, diag: &mut dyn Diagnostics) -> Self {
        Self::load(path, &FsSource, diag)
    }

    /// Parse a single in-memory skin (no includes).
    pub fn parse_str(text: &str, diag: &mut dyn Diagnostics) -> Self {
        let mut src = MemorySource::new();
        src.insert("<inline>", text);
        Self::load(Path::new("<inline>"), &src, diag)
    }

    fn from_elements(elements: Vec<Element>, diag: &mut dyn Diagnostics) -> Self {
        let mut store = Self::default();
        for element in elements {
            store.add(element, diag);
        }
        store
    }

    fn add(&mut self, element: Element, diag: &mut dyn Diagnostics) {
        let Command::Data(name) = &element.command else {
            return;
        };
        let name = name.clone();

        match element.kind {
            StoreKind::Value => {
                let Some(value) = element.params.first() else {
                    report_row(diag, &element, "value row needs a parameter");
                    return;
                };
                let value = value.clone();
                self.insert(StoreKind::Value, &element, name, value, diag, |s| {
                    &mut s.values
                });
            }
            StoreKind::Texture => {
                let Some(texture) = element.params.first() else {
                    report_row(diag, &element, "texture row needs a texture name");
                    return;
                };
                let spec = if element.spritesheet.is_empty() {
                    SpriteSpec {
                        spritesheet: None,
                        texture: join_content_dir(&element.content_dir, texture),
                    }
                } else {
                    SpriteSpec {
                        spritesheet: Some(join_content_dir(
                            &element.content_dir,
                            &element.spritesheet,
                        )),
                        texture: normalize_path(texture),
                    }
                };
                self.insert(StoreKind::Texture, &element, name, spec, diag, |s| {
                    &mut s.sprites
                });
            }
            StoreKind::Color => {
                let channels: Vec<i64> = match element
                    .params
                    .iter()
                    .map(|p| p.parse::<i64>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                {
                    Ok(v) => v,
                    Err(_) => {
                        report_row(diag, &element, "color row has a non-numeric channel");
                        return;
                    }
                };
                let color = match channels.as_slice() {
                    [r, g, b] => Color::rgb(clamp_channel(*r), clamp_channel(*g), clamp_channel(*b)),
                    [r, g, b, a] => Color::rgba(
                        clamp_channel(*r),
                        clamp_channel(*g),
                        clamp_channel(*b),
                        clamp_channel(*a),
                    ),
                    _ => {
                        report_row(diag, &element, "color row needs 3 or 4 channels");
                        return;
                    }
                };
                self.insert(StoreKind::Color, &element, name, color, diag, |s| {
                    &mut s.colors
                });
            }
            StoreKind::Font => {
                if element.params.len() != 7 {
                    report_row(diag, &element, "font row needs 7 parameters");
                    return;
                }
                let metrics: Vec<u32> = match element.params[2..7]
                    .iter()
                    .map(|p| p.parse::<u32>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                {
                    Ok(v) => v,
                    Err(_) => {
                        report_row(diag, &element, "font row has a non-numeric metric");
                        return;
                    }
                };
                let spec = FontSpec {
                    texture: join_content_dir(&element.content_dir, &element.params[0]),
                    characters: element.params[1]
                        .split("|#|")
                        .filter(|row| !row.is_empty())
                        .map(str::to_string)
                        .collect(),
                    char_width: metrics[0],
                    char_height: metrics[1],
                    grid_size: metrics[2],
                    h_space: metrics[3],
                    v_space: metrics[4],
                };
                self.insert(StoreKind::Font, &element, name, spec, diag, |s| {
                    &mut s.fonts
                });
            }
        }
    }

    fn insert<T>(
        &mut self,
        kind: StoreKind,
        element: &Element,
        name: String,
        value: T,
        diag: &mut dyn Diagnostics,
        map: impl FnOnce(&mut Self) -> &mut HashMap<Key, T>,
    ) {
        let key = (element.category.clone(), name);
        let map = map(self);
        if map.contains_key(&key) {
            diag.report(
                &element.file,
                Some(element.line),
                &format!(
                    "duplicate {} entry \"{};{}\"; first definition wins",
                    kind.label(),
                    key.0,
                    key.1
                ),
            );
            return;
        }
        map.insert(key, value);
    }

    // -- Query surface ----------------------------------------------------

    pub fn color(&self, category: &str, name: &str) -> Result<Color> {
        self.colors
            .get(&(category.to_string(), name.to_string()))
            .copied()
            .ok_or_else(|| TesseraError::missing("color", category, name))
    }

    pub fn value(&self, category: &str, name: &str) -> Result<&str> {
        self.values
            .get(&(category.to_string(), name.to_string()))
            .map(String::as_str)
            .ok_or_else(|| TesseraError::missing("value", category, name))
    }

    pub fn font_spec(&self, category: &str, name: &str) -> Result<&FontSpec> {
        self.fonts
            .get(&(category.to_string(), name.to_string()))
            .ok_or_else(|| TesseraError::missing("font", category, name))
    }

    pub fn sprite_spec(&self, category: &str, name: &str) -> Result<&SpriteSpec> {
        self.sprites
            .get(&(category.to_string(), name.to_string()))
            .ok_or_else(|| TesseraError::missing("sprite", category, name))
    }

    /// Load the font's texture and build a usable [`MonoFont`].
    pub fn font(
        &self,
        loader: &mut dyn ResourceLoader,
        group: ResourceGroup,
        category: &str,
        name: &str,
    ) -> Result<MonoFont> {
        let spec = self.font_spec(category, name)?;
        let texture = loader.load_texture(&spec.texture, group)?;
        Ok(MonoFont::new(
            texture.id,
            &spec.characters,
            spec.char_width,
            spec.char_height,
            spec.grid_size,
            spec.h_space,
            spec.v_space,
        ))
    }

    /// Resolve a sprite, loading its sheet or standalone texture.
    pub fn sprite(
        &self,
        loader: &mut dyn ResourceLoader,
        group: ResourceGroup,
        category: &str,
        name: &str,
    ) -> Result<Sprite> {
        let spec = self.sprite_spec(category, name)?;
        match &spec.spritesheet {
            None => {
                let tex = loader.load_texture(&spec.texture, group)?;
                Ok(Sprite::from_texture(tex.id, tex.width, tex.height))
            }
            Some(sheet_path) => {
                let sheet = loader.load_spritesheet(sheet_path, group)?;
                Sprite::from_sheet(&sheet, &spec.texture)
            }
        }
    }

    /// Number of entries in one store kind, for load-time statistics.
    pub fn count(&self, kind: StoreKind) -> usize {
        match kind {
            StoreKind::Value => self.values.len(),
            StoreKind::Texture => self.sprites.len(),
            StoreKind::Color => self.colors.len(),
            StoreKind::Font => self.fonts.len(),
        }
    }
}

fn report_row(diag: &mut dyn Diagnostics, element: &Element, message: &str) {
    diag.report(&element.file, Some(element.line), message);
}

fn clamp_channel(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn join_content_dir(dir: &str, path: &str) -> String {
    let path = normalize_path(path);
    if dir.is_empty() {
        return path;
    }
    let dir = normalize_path(dir);
    format!("{}/{}", dir.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tessera_types::TextureId;
    use tessera_types::diag::RecordingDiagnostics;
    use tessera_types::geometry::ViewRect;
    use tessera_types::resource::Texture;
    use tessera_types::sprite::SpriteSheet;

    fn parse(text: &str) -> (SkinFile, RecordingDiagnostics) {
        let mut diag = RecordingDiagnostics::new();
        let skin = SkinFile::parse_str(text, &mut diag);
        (skin, diag)
    }

    /// Fabricates textures and sheets without touching the filesystem.
    struct StubLoader {
        next_id: u64,
        loads: Vec<String>,
    }

    impl StubLoader {
        fn new() -> Self {
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

        fn load_spritesheet(
            &mut self,
            path: &str,
            _group: ResourceGroup,
        ) -> Result<Rc<SpriteSheet>> {
            self.loads.push(path.to_string());
            let id = TextureId(self.next_id);
            self.next_id += 1;
            let mut sheet = SpriteSheet::new(id);
            sheet.insert_region("knob", ViewRect::new(0, 0, 8, 8));
            Ok(Rc::new(sheet))
        }

        fn unload_group(&mut self, _group: ResourceGroup) {}
    }

    #[test]
    fn color_row_three_channels_gets_full_alpha() {
        let (skin, diag) = parse("[COLORS]\nCATEGORY Btn\nMain 255 0 0\n");
        assert!(diag.is_empty());
        assert_eq!(skin.color("Btn", "Main").unwrap(), Color::rgba(255, 0, 0, 255));
    }

    #[test]
    fn color_row_four_channels() {
        let (skin, _) = parse("[COLORS]\nCATEGORY Btn\nGlass 10 20 30 40\n");
        assert_eq!(skin.color("Btn", "Glass").unwrap(), Color::rgba(10, 20, 30, 40));
    }

    #[test]
    fn color_out_of_range_channels_clamp() {
        let (skin, _) = parse("[COLORS]\nCATEGORY C\nHot 300 -5 128\n");
        assert_eq!(skin.color("C", "Hot").unwrap(), Color::rgb(255, 0, 128));
    }

    #[test]
    fn color_wrong_arity_skips_entry() {
        let (skin, diag) = parse("[COLORS]\nCATEGORY C\nBad 1 2\n");
        assert!(diag.contains("3 or 4 channels"));
        assert!(matches!(
            skin.color("C", "Bad"),
            Err(TesseraError::MissingEntry { .. })
        ));
    }

    #[test]
    fn color_non_numeric_skips_entry() {
        let (skin, diag) = parse("[COLORS]\nCATEGORY C\nBad red green blue\n");
        assert!(diag.contains("non-numeric"));
        assert!(skin.color("C", "Bad").is_err());
    }

    #[test]
    fn value_row_via_variable() {
        let (skin, diag) = parse("VAR X 10\n[VALUES]\nCATEGORY A\nSize $X\n");
        assert!(diag.is_empty());
        assert_eq!(skin.value("A", "Size").unwrap(), "10");
    }

    #[test]
    fn value_row_via_address() {
        let (skin, diag) = parse("[VALUES]\nCATEGORY A\nV1 hello\nCATEGORY B\nV2 @A;V1\n");
        assert!(diag.is_empty());
        assert_eq!(skin.value("B", "V2").unwrap(), "hello");
    }

    #[test]
    fn missing_entry_is_typed_error() {
        let (skin, _) = parse("[VALUES]\nCATEGORY A\nX 1\n");
        match skin.value("A", "Y") {
            Err(TesseraError::MissingEntry {
                kind,
                category,
                name,
            }) => {
                assert_eq!(kind, "value");
                assert_eq!(category, "A");
                assert_eq!(name, "Y");
            }
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let (skin, _) = parse("[VALUES]\nCATEGORY A\nSize 1\n");
        assert!(skin.value("A", "Size").is_ok());
        assert!(skin.value("a", "Size").is_err());
        assert!(skin.value("A", "size").is_err());
    }

    #[test]
    fn duplicate_entry_first_wins_and_reports() {
        let (skin, diag) = parse("[VALUES]\nCATEGORY A\nX first\nX second\n");
        assert!(diag.contains("duplicate value entry \"A;X\""));
        assert_eq!(skin.value("A", "X").unwrap(), "first");
    }

    #[test]
    fn same_name_in_different_kinds_is_no_duplicate() {
        let (skin, diag) = parse("[VALUES]\nCATEGORY A\nX 1\n[COLORS]\nCATEGORY A\nX 1 2 3\n");
        assert!(diag.is_empty());
        assert!(skin.value("A", "X").is_ok());
        assert!(skin.color("A", "X").is_ok());
    }

    #[test]
    fn texture_row_standalone() {
        let (skin, _) = parse("[TEXTURES]\nCATEGORY Panel\nFace panel_face\n");
        let spec = skin.sprite_spec("Panel", "Face").unwrap();
        assert_eq!(spec.spritesheet, None);
        assert_eq!(spec.texture, "panel_face");
    }

    #[test]
    fn texture_row_with_spritesheet_context() {
        let (skin, _) = parse("[TEXTURES]\nCATEGORY Bar\nUSE_SPRITESHEET ui.sheet\nKnob knob\n");
        let spec = skin.sprite_spec("Bar", "Knob").unwrap();
        assert_eq!(spec.spritesheet.as_deref(), Some("ui.sheet"));
        assert_eq!(spec.texture, "knob");
    }

    #[test]
    fn content_dir_prefixes_standalone_texture() {
        let (skin, _) = parse("[TEXTURES]\nUSE_CONTENTDIR gfx/ui\nCATEGORY P\nFace face\n");
        assert_eq!(skin.sprite_spec("P", "Face").unwrap().texture, "gfx/ui/face");
    }

    #[test]
    fn content_dir_prefixes_sheet_not_region() {
        let (skin, _) = parse(
            "[TEXTURES]\nUSE_CONTENTDIR gfx\nCATEGORY P\nUSE_SPRITESHEET ui.sheet\nKnob knob\n",
        );
        let spec = skin.sprite_spec("P", "Knob").unwrap();
        assert_eq!(spec.spritesheet.as_deref(), Some("gfx/ui.sheet"));
        assert_eq!(spec.texture, "knob");
    }

    #[test]
    fn backslash_paths_are_normalized() {
        assert_eq!(join_content_dir("a\\b", "c\\d.png"), "a/b/c/d.png");
        assert_eq!(join_content_dir("", "x\\y"), "x/y");
        assert_eq!(join_content_dir("dir/", "f"), "dir/f");
    }

    #[test]
    fn font_row_builds_spec() {
        let (skin, diag) = parse(
            "[FONTS]\nCATEGORY Text\nMain font_tex \"AB|#|ab\" 6 9 10 1 2\n",
        );
        assert!(diag.is_empty());
        let spec = skin.font_spec("Text", "Main").unwrap();
        assert_eq!(spec.texture, "font_tex");
        assert_eq!(spec.characters, vec!["AB", "ab"]);
        assert_eq!(
            (spec.char_width, spec.char_height, spec.grid_size),
            (6, 9, 10)
        );
        assert_eq!((spec.h_space, spec.v_space), (1, 2));
    }

    #[test]
    fn font_row_wrong_arity_skips_entry() {
        let (skin, diag) = parse("[FONTS]\nCATEGORY Text\nMain font_tex AB 6 9\n");
        assert!(diag.contains("font row needs 7 parameters"));
        assert!(skin.font_spec("Text", "Main").is_err());
    }

    #[test]
    fn font_row_non_numeric_metric_skips_entry() {
        let (skin, diag) = parse("[FONTS]\nCATEGORY Text\nMain tex AB six 9 10 1 2\n");
        assert!(diag.contains("non-numeric metric"));
        assert!(skin.font_spec("Text", "Main").is_err());
    }

    #[test]
    fn font_loads_through_resource_loader() {
        let (skin, _) = parse(
            "[FONTS]\nUSE_CONTENTDIR fonts\nCATEGORY Text\nMain mono \"AB|#|ab\" 6 9 10 1 2\n",
        );
        let mut loader = StubLoader::new();
        let font = skin.font(&mut loader, 0, "Text", "Main").unwrap();
        assert_eq!(loader.loads, vec!["fonts/mono"]);
        assert_eq!(font.char_width(), 6);
        assert!(font.glyph_rect('b').is_some());
    }

    #[test]
    fn sprite_standalone_covers_texture() {
        let (skin, _) = parse("[TEXTURES]\nCATEGORY P\nFace face_tex\n");
        let mut loader = StubLoader::new();
        let sprite = skin.sprite(&mut loader, 0, "P", "Face").unwrap();
        assert_eq!(sprite.source, ViewRect::new(0, 0, 64, 64));
    }

    #[test]
    fn sprite_from_sheet_region() {
        let (skin, _) = parse("[TEXTURES]\nCATEGORY P\nUSE_SPRITESHEET ui.sheet\nKnob knob\n");
        let mut loader = StubLoader::new();
        let sprite = skin.sprite(&mut loader, 0, "P", "Knob").unwrap();
        assert_eq!(sprite.source, ViewRect::new(0, 0, 8, 8));
        assert_eq!(loader.loads, vec!["ui.sheet"]);
    }

    #[test]
    fn sprite_with_unknown_region_errors() {
        let (skin, _) = parse("[TEXTURES]\nCATEGORY P\nUSE_SPRITESHEET ui.sheet\nGhost ghost\n");
        let mut loader = StubLoader::new();
        assert!(skin.sprite(&mut loader, 0, "P", "Ghost").is_err());
    }

    #[test]
    fn counts_reflect_store_sizes() {
        let (skin, _) = parse(
            "[VALUES]\nA 1\nB 2\n[COLORS]\nC 1 2 3\n[TEXTURES]\nT tex\n",
        );
        assert_eq!(skin.count(StoreKind::Value), 2);
        assert_eq!(skin.count(StoreKind::Color), 1);
        assert_eq!(skin.count(StoreKind::Texture), 1);
        assert_eq!(skin.count(StoreKind::Font), 0);
    }

    #[test]
    fn imported_rows_land_in_store_under_both_categories() {
        let (skin, diag) = parse(
            "[COLORS]\nCATEGORY Base\nFace 9 9 9\nCATEGORY Button\nIMPORT_CATEGORY Base\n",
        );
        assert!(diag.is_empty());
        assert_eq!(skin.color("Base", "Face").unwrap(), Color::rgb(9, 9, 9));
        assert_eq!(skin.color("Button", "Face").unwrap(), Color::rgb(9, 9, 9));
    }

    #[test]
    fn value_row_without_parameter_is_skipped() {
        let (skin, diag) = parse("[VALUES]\nCATEGORY A\nEmptyRow\n");
        assert!(diag.contains("value row needs a parameter"));
        assert!(skin.value("A", "EmptyRow").is_err());
    }

    #[test]
    fn empty_quoted_value_is_kept() {
        let (skin, diag) = parse("[VALUES]\nCATEGORY A\nBlank \"\"\n");
        assert!(diag.is_empty());
        assert_eq!(skin.value("A", "Blank").unwrap(), "");
    }
}
