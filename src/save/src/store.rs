// src/save/src/store.rs

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Persistence medium for save payloads. The game core never assumes a
/// particular storage backend.
pub trait SaveStore {
    fn write(&mut self, slot: u32, payload: &str) -> Result<()>;
    fn read(&self, slot: u32) -> Result<Option<String>>;
    fn delete(&mut self, slot: u32) -> Result<()>;
    fn occupied_slots(&self) -> Result<Vec<u32>>;
}

/// One JSON file per slot under a save directory. Writes go through a
/// temporary file and a rename so a crash mid-write never clobbers the
/// previous save.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: u32) -> PathBuf {
        self.dir.join(format!("slot_{slot}.json"))
    }
}

impl SaveStore for FileStore {
    fn write(&mut self, slot: u32, payload: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating save directory {}", self.dir.display()))?;
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)
            .with_context(|| format!("writing save file {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("committing save file {}", path.display()))?;
        Ok(())
    }

    fn read(&self, slot: u32) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("reading save file {}", path.display()))
            }
        }
    }

    fn delete(&mut self, slot: u32) -> Result<()> {
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("deleting save file {}", path.display()))
            }
        }
    }

    fn occupied_slots(&self) -> Result<Vec<u32>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("listing save directory {}", self.dir.display()));
            }
        };

        let mut slots = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(slot) = name
                .strip_prefix("slot_")
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse().ok())
            {
                slots.push(slot);
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}

/// In-memory backend for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<u32, String>,
}

impl SaveStore for MemoryStore {
    fn write(&mut self, slot: u32, payload: &str) -> Result<()> {
        self.slots.insert(slot, payload.to_string());
        Ok(())
    }

    fn read(&self, slot: u32) -> Result<Option<String>> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn delete(&mut self, slot: u32) -> Result<()> {
        self.slots.remove(&slot);
        Ok(())
    }

    fn occupied_slots(&self) -> Result<Vec<u32>> {
        let mut slots: Vec<u32> = self.slots.keys().copied().collect();
        slots.sort_unstable();
        Ok(slots)
    }
}
