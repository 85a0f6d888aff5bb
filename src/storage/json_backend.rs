use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    errors::StoreError,
    inventory::{Snapshot, CURRENT_SCHEMA_VERSION},
};

use super::{legacy, snapshot_warnings, BackupInfo, LoadOutcome, LoadReport, Result, SnapshotStore};

const BACKUP_PREFIX: &str = "materials_backup_";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;
const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";
const DEFAULT_RETENTION: usize = 10;

/// Stores the inventory snapshot as a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(data_file: PathBuf, backups_dir: PathBuf, retention: Option<usize>) -> Self {
        Self {
            data_file,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    fn read_snapshot(&self, seed: &Snapshot) -> Result<(Snapshot, LoadOutcome, Vec<String>)> {
        let data = fs::read_to_string(&self.data_file)?;
        let value: Value = serde_json::from_str(&data)?;
        if legacy::is_legacy_layout(&value) {
            let (snapshot, warnings) =
                legacy::import(value, seed).map_err(StoreError::Persistence)?;
            return Ok((snapshot, LoadOutcome::Migrated, warnings));
        }
        let snapshot: Snapshot = serde_json::from_value(value)?;
        if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(StoreError::Persistence(format!(
                "inventory schema v{} is newer than supported v{}",
                snapshot.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok((snapshot, LoadOutcome::Loaded, Vec::new()))
    }

    /// Keeps a copy of an unusable data file so the next save does not destroy it.
    fn quarantine(&self) {
        let target = suffixed_path(&self.data_file, CORRUPT_SUFFIX);
        match fs::copy(&self.data_file, &target) {
            Ok(_) => warn!(path = %target.display(), "kept a copy of the unreadable inventory file"),
            Err(err) => warn!(error = %err, "could not keep a copy of the unreadable inventory file"),
        }
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for entry in backups.iter().skip(self.retention) {
            debug!(path = %entry.path.display(), "pruning old backup");
            let _ = fs::remove_file(&entry.path);
        }
        Ok(())
    }
}

impl SnapshotStore for JsonStore {
    fn load(&self, seed: Snapshot) -> LoadReport {
        if !self.data_file.exists() {
            info!(path = %self.data_file.display(), "no inventory file yet; starting from seed data");
            return LoadReport::seeded(seed);
        }
        match self.read_snapshot(&seed) {
            Ok((snapshot, outcome, mut warnings)) => {
                if outcome == LoadOutcome::Migrated {
                    info!(path = %self.data_file.display(), "imported inventory from the flat legacy layout");
                }
                warnings.extend(snapshot_warnings(&snapshot));
                for warning in &warnings {
                    warn!("{}", warning);
                }
                LoadReport {
                    snapshot,
                    outcome,
                    warnings,
                }
            }
            Err(err) => {
                warn!(
                    path = %self.data_file.display(),
                    error = %err,
                    "inventory file unreadable; starting from seed data"
                );
                self.quarantine();
                LoadReport {
                    snapshot: seed,
                    outcome: LoadOutcome::Recovered {
                        reason: err.to_string(),
                    },
                    warnings: Vec::new(),
                }
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        save_snapshot_to_path(snapshot, &self.data_file)?;
        debug!(
            path = %self.data_file.display(),
            transactions = snapshot.transaction_count(),
            "inventory saved"
        );
        Ok(())
    }

    fn backup(&self, snapshot: &Snapshot, label: Option<&str>, at: DateTime<Utc>) -> Result<PathBuf> {
        ensure_dir(&self.backups_dir)?;
        let mut file_stem = format!("{}{}", BACKUP_PREFIX, at.format(BACKUP_TIMESTAMP_FORMAT));
        if let Some(label) = sanitize_backup_label(label) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let mut path = self
            .backups_dir
            .join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let mut attempt = 2;
        while path.exists() {
            path = self
                .backups_dir
                .join(format!("{}-{}.{}", file_stem, attempt, BACKUP_EXTENSION));
            attempt += 1;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        write_staged(&path, &json)?;
        info!(path = %path.display(), "backup written");
        self.prune_backups()?;
        Ok(path)
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) if name.starts_with(BACKUP_PREFIX) => name.to_string(),
                _ => continue,
            };
            let (created_at, label, attempt) = parse_backup_name(&file_name);
            entries.push(BackupInfo {
                path,
                file_name,
                created_at,
                label,
                attempt,
            });
        }
        entries.sort_by_key(|info| {
            Reverse((info.created_at, info.attempt, info.file_name.clone()))
        });
        Ok(entries)
    }
}

pub fn save_snapshot_to_path(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = suffixed_path(path, TMP_SUFFIX);
    write_staged(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<Snapshot> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut target = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    target.set_extension(ext);
    target
}

fn write_staged(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn sanitize_backup_label(label: Option<&str>) -> Option<String> {
    let raw = label?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Splits `materials_backup_<stamp>[_label][-N].json` into its parts. A
/// trailing `-N` with `N >= 2` is read as the same-second copy number.
fn parse_backup_name(file_name: &str) -> (Option<DateTime<Utc>>, Option<String>, u32) {
    let Some(rest) = file_name
        .strip_prefix(BACKUP_PREFIX)
        .and_then(|rest| rest.strip_suffix(&format!(".{}", BACKUP_EXTENSION)))
    else {
        return (None, None, 1);
    };
    let Some(stamp) = rest.get(..BACKUP_TIMESTAMP_LEN) else {
        return (None, None, 1);
    };
    let created_at = NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc));

    let mut tail = rest.get(BACKUP_TIMESTAMP_LEN..).unwrap_or_default();
    let mut attempt = 1;
    if let Some((head, digits)) = tail.rsplit_once('-') {
        if let Ok(number) = digits.parse::<u32>() {
            if number >= 2 && digits.bytes().all(|b| b.is_ascii_digit()) {
                attempt = number;
                tail = head;
            }
        }
    }
    let label = tail
        .strip_prefix('_')
        .filter(|label| !label.is_empty())
        .map(str::to_string);
    (created_at, label, attempt)
}
