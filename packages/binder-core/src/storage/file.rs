/// Local filesystem state store.
///
/// The whole document lives in one JSON file:
/// - re-read on every `load`
/// - pretty-printed with 4-space indentation on every `save`
/// - overwritten in place by default; `WriteMode::Atomic` writes a sibling
///   temp file and renames it over the original instead

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{StateStore, StoreError};
use crate::types::State;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and rewrite the file. A crash mid-write can truncate it.
    #[default]
    Overwrite,
    /// Write to `.tmp`, fsync, rename.
    Atomic,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_mode: WriteMode,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_mode: WriteMode::Overwrite,
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Serialize the document the way it is kept on disk.
    pub fn render(state: &State) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        state.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<State, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, state: &State) -> Result<(), StoreError> {
        let content = Self::render(state)?;
        match self.write_mode {
            WriteMode::Overwrite => fs::write(&self.path, content),
            WriteMode::Atomic => Self::atomic_write(&self.path, &content),
        }
        .map_err(|e| self.io_error(e))?;
        log::debug!(
            target: "binder.store",
            "Saved {} cards to {}",
            state.cards.len(),
            self.path.display()
        );
        Ok(())
    }
}
