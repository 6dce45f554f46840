//! Intermediate representation of one parsed skin-file command.
//!
//! Every non-empty line becomes an [`Element`]. Structural commands
//! (headers, `CATEGORY`, `VAR`, ...) are consumed by the resolver passes;
//! only data rows and `IMPORT_CATEGORY` directives survive categorization.

use crate::tokenize::Token;

/// Which typed store a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Value,
    Texture,
    Font,
    Color,
}

impl StoreKind {
    /// Store name used in diagnostics and lookup errors.
    pub fn label(self) -> &'static str {
        match self {
            StoreKind::Value => "value",
            StoreKind::Texture => "sprite",
            StoreKind::Font => "font",
            StoreKind::Color => "color",
        }
    }
}

/// The command a line encodes, selected by its first token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `[VALUES]` / `[TEXTURES]` / `[FONTS]` / `[COLORS]`
    Header(StoreKind),
    /// `CATEGORY <name>`
    Category,
    /// `USE_SPRITESHEET <path>`
    UseSpritesheet,
    /// `INCLUDE_FILE <relativePath>`
    IncludeFile,
    /// `IMPORT_CATEGORY <sourceCategory>`
    ImportCategory,
    /// `USE_CONTENTDIR <path>`
    UseContentDir,
    /// `VAR <name> <value>`
    Var,
    /// Any other first token: a data row named by that token.
    Data(String),
}

impl Command {
    fn classify(first: &str) -> Self {
        match first {
            "[VALUES]" => Command::Header(StoreKind::Value),
            "[TEXTURES]" => Command::Header(StoreKind::Texture),
            "[FONTS]" => Command::Header(StoreKind::Font),
            "[COLORS]" => Command::Header(StoreKind::Color),
            "CATEGORY" => Command::Category,
            "USE_SPRITESHEET" => Command::UseSpritesheet,
            "INCLUDE_FILE" => Command::IncludeFile,
            "IMPORT_CATEGORY" => Command::ImportCategory,
            "USE_CONTENTDIR" => Command::UseContentDir,
            "VAR" => Command::Var,
            other => Command::Data(other.to_string()),
        }
    }
}

/// One resolved command with its positional parameters and the context
/// stamped on it during ingestion and categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub command: Command,
    /// Positional arguments (every token after the first).
    pub params: Vec<String>,
    /// Enclosing category; assigned during categorization.
    pub category: String,
    /// Value kind of the enclosing category; assigned during categorization.
    pub kind: StoreKind,
    /// Spritesheet context active where this row appeared.
    pub spritesheet: String,
    /// Content-dir prefix active where this row appeared.
    pub content_dir: String,
    /// Source file, for diagnostics.
    pub file: String,
    /// Zero-based source line, for diagnostics.
    pub line: u32,
}

impl Element {
    /// Build an element from a tokenized line, or `None` for a line with
    /// no tokens.
    pub fn from_tokens(tokens: Vec<Token>, file: &str, line: u32) -> Option<Self> {
        let mut iter = tokens.into_iter();
        let first = iter.next()?;
        Some(Self {
            command: Command::classify(&first.text),
            params: iter.map(|t| t.text).collect(),
            category: String::new(),
            kind: StoreKind::Value,
            spritesheet: String::new(),
            content_dir: String::new(),
            file: file.to_string(),
            line,
        })
    }

    /// The data-row name, for `Command::Data` elements.
    pub fn data_name(&self) -> Option<&str> {
        match &self.command {
            Command::Data(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn parse(line: &str) -> Option<Element> {
        Element::from_tokens(tokenize(line), "test.skin", 0)
    }

    #[test]
    fn header_lines() {
        assert_eq!(
            parse("[VALUES]").unwrap().command,
            Command::Header(StoreKind::Value)
        );
        assert_eq!(
            parse("[TEXTURES]").unwrap().command,
            Command::Header(StoreKind::Texture)
        );
        assert_eq!(
            parse("[FONTS]").unwrap().command,
            Command::Header(StoreKind::Font)
        );
        assert_eq!(
            parse("[COLORS]").unwrap().command,
            Command::Header(StoreKind::Color)
        );
    }

    #[test]
    fn structural_commands() {
        assert_eq!(parse("CATEGORY Button").unwrap().command, Command::Category);
        assert_eq!(
            parse("USE_SPRITESHEET ui.sheet").unwrap().command,
            Command::UseSpritesheet
        );
        assert_eq!(
            parse("INCLUDE_FILE other.skin").unwrap().command,
            Command::IncludeFile
        );
        assert_eq!(
            parse("IMPORT_CATEGORY Base").unwrap().command,
            Command::ImportCategory
        );
        assert_eq!(
            parse("USE_CONTENTDIR gfx").unwrap().command,
            Command::UseContentDir
        );
        assert_eq!(parse("VAR x 1").unwrap().command, Command::Var);
    }

    #[test]
    fn data_row_takes_name_and_params() {
        let e = parse("Border 200 200 200").unwrap();
        assert_eq!(e.command, Command::Data("Border".into()));
        assert_eq!(e.data_name(), Some("Border"));
        assert_eq!(e.params, vec!["200", "200", "200"]);
    }

    #[test]
    fn blank_line_is_none() {
        assert!(parse("").is_none());
        assert!(parse("   # just a comment").is_none());
    }

    #[test]
    fn provenance_is_recorded() {
        let e = Element::from_tokens(tokenize("X 1"), "skins/a.skin", 41).unwrap();
        assert_eq!(e.file, "skins/a.skin");
        assert_eq!(e.line, 41);
    }

    #[test]
    fn clone_copies_params_deeply() {
        let mut a = parse("Row one two").unwrap();
        let b = a.clone();
        a.params[0] = "changed".into();
        assert_eq!(b.params[0], "one");
    }

    #[test]
    fn store_kind_labels() {
        assert_eq!(StoreKind::Value.label(), "value");
        assert_eq!(StoreKind::Texture.label(), "sprite");
        assert_eq!(StoreKind::Font.label(), "font");
        assert_eq!(StoreKind::Color.label(), "color");
    }
}
