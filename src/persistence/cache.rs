//! Process-wide memo of loaded tables.
//!
//! A dataset is loaded at most once per (canonical path, format) and then
//! shared as an immutable `Arc<CalendarTable>`. The lock guards only the map;
//! loading happens outside it, and the first table inserted wins.

use super::{CalendarSource, DatasetFile, LoadResult};
use crate::CalendarTable;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

static TABLES: Lazy<Mutex<HashMap<DatasetFile, Arc<CalendarTable>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cache_key(source: &DatasetFile) -> DatasetFile {
    let path = source
        .path
        .canonicalize()
        .unwrap_or_else(|_| source.path.clone());
    DatasetFile::new(path, source.format)
}

pub fn load_cached(source: &DatasetFile) -> LoadResult<Arc<CalendarTable>> {
    let key = cache_key(source);
    if let Some(table) = TABLES.lock().get(&key) {
        debug!(path = %key.path.display(), "calendar table served from cache");
        return Ok(Arc::clone(table));
    }

    let loaded = Arc::new(source.load_table()?);
    info!(
        path = %key.path.display(),
        format = key.format.as_str(),
        events = loaded.len(),
        years = loaded.years().len(),
        "calendar table loaded"
    );

    let mut tables = TABLES.lock();
    Ok(Arc::clone(tables.entry(key).or_insert(loaded)))
}

/// Drops the memoized table for `source`, if any.
pub fn evict(source: &DatasetFile) -> bool {
    TABLES.lock().remove(&cache_key(source)).is_some()
}
