use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::pool::UnitId;
use crate::session::result::StatsSink;
use crate::store::schema::StatsData;

const STATS_FILE: &str = "stats.json";
pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub wordtiles_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub stats: StatsData,
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordtiles");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Load stats. Returns None if the file exists but cannot be parsed
    /// or carries a different schema version.
    pub fn load_stats(&self) -> Option<StatsData> {
        let path = self.file_path(STATS_FILE);
        if !path.exists() {
            return Some(StatsData::default());
        }
        let content = fs::read_to_string(&path).ok()?;
        let stats: StatsData = serde_json::from_str(&content).ok()?;
        (!stats.needs_reset()).then_some(stats)
    }

    pub fn save_stats(&self, stats: &StatsData) -> Result<()> {
        write_atomic(&self.file_path(STATS_FILE), &serde_json::to_string_pretty(stats)?)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let data = ExportData {
            wordtiles_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            stats: self.load_stats().unwrap_or_default(),
        };
        write_atomic(path, &serde_json::to_string_pretty(&data)?)
    }

    pub fn import_from(&self, path: &Path) -> Result<StatsData> {
        let content = fs::read_to_string(path)?;
        let data: ExportData = serde_json::from_str(&content)?;
        if data.wordtiles_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.wordtiles_export_version,
                EXPORT_VERSION
            );
        }
        if data.stats.needs_reset() {
            bail!("Unsupported stats schema: {}", data.stats.schema_version);
        }
        self.save_stats(&data.stats)?;
        Ok(data.stats)
    }
}

fn write_atomic(path: &Path, json: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Stats sink that writes through to a `JsonStore` at the end of every trial.
pub struct StoredStatsSink {
    store: JsonStore,
    stats: StatsData,
}

impl StoredStatsSink {
    pub fn open(store: JsonStore) -> Self {
        let stats = store.load_stats().unwrap_or_else(|| {
            warn!("stats file unreadable or outdated; starting fresh");
            StatsData::default()
        });
        Self { store, stats }
    }

    pub fn stats(&self) -> &StatsData {
        &self.stats
    }
}

impl StatsSink for StoredStatsSink {
    fn record_unit_outcome(&mut self, unit: &UnitId, correct: bool) {
        self.stats.record_unit_outcome(unit, correct);
    }

    fn record_answer_time(&mut self, secs: f64) {
        self.stats.record_answer_time(secs);
    }

    // The score delta closes each trial's events, so persist here.
    fn record_score_delta(&mut self, delta: i64) {
        self.stats.record_score_delta(delta);
        if let Err(e) = self.store.save_stats(&self.stats) {
            warn!("failed to save stats: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = make_test_store();
        let stats = store.load_stats().unwrap();
        assert_eq!(stats.trials, 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (_dir, store) = make_test_store();
        let mut stats = StatsData::default();
        stats.record_unit_outcome(&UnitId::from("川"), true);
        stats.record_score_delta(1);
        store.save_stats(&stats).unwrap();

        let loaded = store.load_stats().unwrap();
        assert_eq!(loaded.trials, 1);
        assert_eq!(loaded.counts(&UnitId::from("川")).unwrap().correct, 1);
        assert!(!store.file_path("stats.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported_as_none() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(STATS_FILE), "{ not json").unwrap();
        assert!(store.load_stats().is_none());
    }

    #[test]
    fn test_stale_schema_is_reported_as_none() {
        let (_dir, store) = make_test_store();
        let mut stats = StatsData::default();
        stats.schema_version = 99;
        store.save_stats(&stats).unwrap();
        assert!(store.load_stats().is_none());
    }

    #[test]
    fn test_sink_persists_after_each_trial() {
        let (dir, store) = make_test_store();
        let mut sink = StoredStatsSink::open(store);
        sink.record_unit_outcome(&UnitId::from("日"), false);
        sink.record_score_delta(0);

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let stats = reopened.load_stats().unwrap();
        assert_eq!(stats.trials, 1);
        assert_eq!(stats.counts(&UnitId::from("日")).unwrap().wrong, 1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_dir, store) = make_test_store();
        let mut stats = StatsData::default();
        stats.record_score_delta(5);
        store.save_stats(&stats).unwrap();

        let export_dir = TempDir::new().unwrap();
        let export_path = export_dir.path().join("export.json");
        store.export_to(&export_path).unwrap();

        let (_dir2, store2) = make_test_store();
        let imported = store2.import_from(&export_path).unwrap();
        assert_eq!(imported.total_score, 5);
        assert_eq!(store2.load_stats().unwrap().total_score, 5);
    }

    #[test]
    fn test_version_rejection() {
        let (_dir, store) = make_test_store();
        let export_dir = TempDir::new().unwrap();
        let path = export_dir.path().join("export.json");
        let data = ExportData {
            wordtiles_export_version: 99,
            exported_at: Utc::now(),
            stats: StatsData::default(),
        };
        fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        let err_msg = store.import_from(&path).unwrap_err().to_string();
        assert!(err_msg.contains("Unsupported export version"));
        assert!(err_msg.contains("99"));
    }
}
