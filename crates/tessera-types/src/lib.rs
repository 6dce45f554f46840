//! Foundation types and traits for tessera.
//!
//! This crate contains the platform-agnostic core types shared by all
//! tessera crates: geometry, colors, the render/resource backend traits,
//! bitmap fonts, sprite sheets, input snapshots, diagnostics, configuration,
//! and error types.

pub mod backend;
pub mod config;
pub mod diag;
pub mod error;
pub mod font;
pub mod geometry;
pub mod input;
pub mod resource;
pub mod sprite;

pub use backend::{Color, RenderBackend, TextureId};
pub use diag::Diagnostics;
pub use error::{Result, TesseraError};
pub use geometry::{Origin, Point, ViewRect};
