//! Process-wide memoization of lookup tables.
//!
//! A `TableCache` owns a [`TableStorage`] and at most one table per precompute size. The first
//! request for a size loads the table from storage, or builds and saves it if storage has none (or
//! has one of the wrong size). Concurrent first requests for the same size wait on each other, so a
//! table is built at most once; requests for other sizes are not blocked. Cached tables are
//! immutable and handed out as `Arc`s. They stay until `invalidate` or `clear` is called.

use crate::{
    curve::BabyJubjubAffine,
    discrete_log::{check_precompute_size, LookupTable},
    split::merge64,
    storage::{FileTableStorage, TableStorage},
};
use ark_std::{end_timer, start_timer};
use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

type Slot = Arc<Mutex<Option<Arc<LookupTable>>>>;

pub struct TableCache<S: TableStorage = FileTableStorage> {
    storage: S,
    slots: Mutex<BTreeMap<u8, Slot>>,
}

impl TableCache<FileTableStorage> {
    /// Cache backed by JSON files in `dir`
    pub fn with_table_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileTableStorage::new(dir))
    }
}

impl Default for TableCache<FileTableStorage> {
    fn default() -> Self {
        Self::new(FileTableStorage::default())
    }
}

impl<S: TableStorage> TableCache<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The table for `precompute_size`, loading or building it if this is the first request since
    /// creation or invalidation. This can block for a long time, so callers that care about latency
    /// should call it once at startup.
    pub fn table(&self, precompute_size: u8) -> crate::Result<Arc<LookupTable>> {
        check_precompute_size(precompute_size)?;
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(precompute_size).or_default().clone()
        };

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = slot.as_ref() {
            if table.has_size(precompute_size) {
                return Ok(table.clone());
            }
        }

        let table = match self.storage.load(precompute_size)? {
            Some(table) if table.is_complete(precompute_size) => table,
            _ => {
                let table = LookupTable::build(precompute_size)?;
                self.storage.save(precompute_size, &table)?;
                table
            }
        };
        let table = Arc::new(table);
        *slot = Some(table.clone());
        Ok(table)
    }

    /// Find `m < 2^32` such that `m * BASE = target`
    pub fn decode(&self, target: &BabyJubjubAffine, precompute_size: u8) -> crate::Result<u32> {
        let decode_time = start_timer!(|| "Decode");
        let m = self.table(precompute_size)?.solve(target, precompute_size)?;
        end_timer!(decode_time);
        Ok(m)
    }

    /// Decode the two halves produced by decrypting the output of `encrypt_u64` and merge them.
    pub fn decode_u64(
        &self,
        lo: &BabyJubjubAffine,
        hi: &BabyJubjubAffine,
        precompute_size: u8,
    ) -> crate::Result<u64> {
        let table = self.table(precompute_size)?;
        let lo = table.solve(lo, precompute_size)?;
        let hi = table.solve(hi, precompute_size)?;
        Ok(merge64(lo, hi))
    }

    /// Drop the cached table for this size. Tables already handed out stay valid. Storage is not
    /// touched, so the next request loads the table again.
    pub fn invalidate(&self, precompute_size: u8) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&precompute_size);
    }

    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.clear();
    }

    /// Returns true if the table for this size is in memory
    pub fn is_cached(&self, precompute_size: u8) -> bool {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.get(&precompute_size) {
                Some(slot) => slot.clone(),
                None => return false,
            }
        };
        let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.is_some()
    }
}
