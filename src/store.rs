//! Persistence hooks for the pity counter and ticket ledger.
//!
//! The session calls the save hooks after every mutation. In-memory state stays
//! authoritative: a failed save is logged by the caller and never rolled back.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreError;
use crate::ledger::TicketLedger;

pub const SAVE_FILE: &str = "gacha_save.json"; // Exposed so the CLI reset flag can remove it
const SAVE_VERSION: u32 = 1;

pub trait Store {
    /// `None` when nothing was ever saved.
    fn load_pity_count(&mut self) -> Result<Option<u32>, StoreError>;
    fn save_pity_count(&mut self, count: u32) -> Result<(), StoreError>;
    fn load_ledger(&mut self) -> Result<Option<TicketLedger>, StoreError>;
    fn save_ledger(&mut self, ledger: &TicketLedger) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub pity_count: Option<u32>,
    #[serde(default)]
    pub tickets: Option<TicketLedger>,
}

#[derive(Debug, Default)]
struct MemoryState {
    data: SaveData,
    saves: usize,
}

/// Process-local store. Clones share the same state, so a second session built
/// from a clone sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SaveData) -> Self {
        Self { inner: Rc::new(RefCell::new(MemoryState { data, saves: 0 })) }
    }

    pub fn data(&self) -> SaveData {
        self.inner.borrow().data.clone()
    }

    /// Number of save hook invocations.
    pub fn saves(&self) -> usize {
        self.inner.borrow().saves
    }
}

impl Store for MemoryStore {
    fn load_pity_count(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(self.inner.borrow().data.pity_count)
    }

    fn save_pity_count(&mut self, count: u32) -> Result<(), StoreError> {
        let mut state = self.inner.borrow_mut();
        state.data.pity_count = Some(count);
        state.saves += 1;
        Ok(())
    }

    fn load_ledger(&mut self) -> Result<Option<TicketLedger>, StoreError> {
        Ok(self.inner.borrow().data.tickets)
    }

    fn save_ledger(&mut self, ledger: &TicketLedger) -> Result<(), StoreError> {
        let mut state = self.inner.borrow_mut();
        state.data.tickets = Some(*ledger);
        state.saves += 1;
        Ok(())
    }
}

/// JSON save file written atomically (tmp file + rename) with a `.bak` copy of
/// the previous save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: SaveData,
}

impl JsonFileStore {
    /// Open `path`, falling back to its backup when the main file is missing
    /// or unreadable, or start empty when neither exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let bak = backup_path(&path);
        let data = if path.exists() {
            match read_save(&path) {
                Ok(data) => data,
                Err(e) if bak.exists() => {
                    log::warn!("save file {} unreadable ({e}), loading backup", path.display());
                    read_save(&bak)?
                }
                Err(e) => return Err(e),
            }
        } else if bak.exists() {
            log::warn!("save file {} missing, loading backup", path.display());
            read_save(&bak)?
        } else {
            SaveData::default()
        };
        Ok(Self { path, data })
    }

    /// Delete the save file and its backup.
    pub fn remove(path: &Path) -> Result<(), StoreError> {
        for p in [path.to_path_buf(), backup_path(path)] {
            if p.exists() {
                fs::remove_file(p)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.data.version = SAVE_VERSION;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, json)?;
        if self.path.exists()
            && let Err(e) = fs::copy(&self.path, backup_path(&self.path))
        {
            log::warn!("failed to back up {}: {e}", self.path.display());
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load_pity_count(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(self.data.pity_count)
    }

    fn save_pity_count(&mut self, count: u32) -> Result<(), StoreError> {
        self.data.pity_count = Some(count);
        self.flush()
    }

    fn load_ledger(&mut self) -> Result<Option<TicketLedger>, StoreError> {
        Ok(self.data.tickets)
    }

    fn save_ledger(&mut self, ledger: &TicketLedger) -> Result<(), StoreError> {
        self.data.tickets = Some(*ledger);
        self.flush()
    }
}

fn read_save(path: &Path) -> Result<SaveData, StoreError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}
