//! tessera-skin: the skin definition language.
//!
//! Skin files are line-oriented UTF-8 text describing fonts, textures,
//! colors, and named values per widget category. Loading runs in two
//! stages: ingest (tokenize every line, following `INCLUDE_FILE`
//! directives depth-first) and resolve (variable substitution,
//! categorization, category import, address splicing, escape
//! normalization). The result is an immutable [`SkinFile`] store queried
//! by `(category, name)`.
//!
//! ```text
//! [COLORS]
//! CATEGORY Button
//! Border   200 200 200
//! Face     @Panel;Face        # splice another row's parameters
//! ```

pub mod element;
pub mod resolver;
pub mod source;
pub mod store;
pub mod tokenize;

pub use element::{Command, Element, StoreKind};
pub use source::{FsSource, MemorySource, SkinSource};
pub use store::{FontSpec, SkinFile, SpriteSpec};
