//! File access for skin loading.
//!
//! The resolver reads every file through [`SkinSource`], so include chains
//! can be tested against an in-memory map and embedded skins can ship
//! inside a binary.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Provider of skin-file text.
pub trait SkinSource {
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the real filesystem.
#[derive(Debug, Default)]
pub struct FsSource;

impl SkinSource for FsSource {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory file map, keyed by exact path.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl SkinSource for MemorySource {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display())))
    }
}
