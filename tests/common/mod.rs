#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use site_inventory::{
    core::{FixedClock, LedgerEngine},
    storage::json_backend::JsonStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const SITE: &str = "Test Site";

/// A fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap()
}

pub fn store_in(base: &Path) -> JsonStore {
    JsonStore::new(
        base.join("materials_data.json"),
        base.join("backups"),
        Some(3),
    )
}

/// Engine over a seeded inventory in its own temp directory.
pub fn setup_engine() -> (LedgerEngine, PathBuf) {
    let base = test_dir();
    (open_engine(&base), base)
}

pub fn open_engine(base: &Path) -> LedgerEngine {
    LedgerEngine::open(
        Box::new(store_in(base)),
        Arc::new(FixedClock(fixed_time())),
        SITE,
    )
}
