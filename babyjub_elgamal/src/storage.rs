//! Durable mirror of lookup tables, keyed by precompute size.

use crate::{discrete_log::LookupTable, error::TableStorageError};
use ark_std::{end_timer, start_timer};
use std::{
    collections::BTreeMap,
    fs,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

/// Directory used by `FileTableStorage::default`, relative to the working directory
pub const DEFAULT_TABLE_DIR: &str = "lookupTables";

/// Where a `TableCache` loads tables from and saves freshly built tables to.
pub trait TableStorage: Send + Sync {
    /// Returns `None` if no table was saved for this size.
    fn load(&self, precompute_size: u8) -> Result<Option<LookupTable>, TableStorageError>;

    fn save(&self, precompute_size: u8, table: &LookupTable) -> Result<(), TableStorageError>;
}

/// One JSON file per precompute size, named `x{p}xlookupTable.json`. The directory is created on
/// the first save.
#[derive(Clone, Debug)]
pub struct FileTableStorage {
    dir: PathBuf,
}

impl FileTableStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, precompute_size: u8) -> PathBuf {
        self.dir
            .join(format!("x{}xlookupTable.json", precompute_size))
    }
}

impl Default for FileTableStorage {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_DIR)
    }
}

impl TableStorage for FileTableStorage {
    fn load(&self, precompute_size: u8) -> Result<Option<LookupTable>, TableStorageError> {
        let file = match fs::File::open(self.table_path(precompute_size)) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let load_time = start_timer!(|| format!("Load lookup table of size 2^{}", precompute_size));
        let table = serde_json::from_reader(BufReader::new(file))?;
        end_timer!(load_time);
        Ok(Some(table))
    }

    fn save(&self, precompute_size: u8, table: &LookupTable) -> Result<(), TableStorageError> {
        let save_time = start_timer!(|| format!("Save lookup table of size 2^{}", precompute_size));
        fs::create_dir_all(&self.dir)?;
        let mut writer = BufWriter::new(fs::File::create(self.table_path(precompute_size))?);
        serde_json::to_writer(&mut writer, table)?;
        writer.flush()?;
        end_timer!(save_time);
        Ok(())
    }
}

/// Keeps tables in memory only, for tests and for processes that should not touch the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryTableStorage {
    tables: RwLock<BTreeMap<u8, LookupTable>>,
}

impl InMemoryTableStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStorage for InMemoryTableStorage {
    fn load(&self, precompute_size: u8) -> Result<Option<LookupTable>, TableStorageError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.get(&precompute_size).cloned())
    }

    fn save(&self, precompute_size: u8, table: &LookupTable) -> Result<(), TableStorageError> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.insert(precompute_size, table.clone());
        Ok(())
    }
}
