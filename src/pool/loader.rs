use std::fs;
use std::path::Path;

use icu_normalizer::ComposingNormalizerBorrowed;
use rust_embed::Embed;
use serde::Deserialize;

use crate::pool::{Pool, PoolError, Unit, UnitId};

#[derive(Embed)]
#[folder = "assets/pools/"]
struct BuiltinPools;

/// A pool file entry. `reverse` may be a single label or a list of synonyms.
#[derive(Debug, Deserialize)]
struct UnitRecord {
    #[serde(default)]
    id: Option<String>,
    forward: String,
    reverse: Labels,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Labels {
    One(String),
    Many(Vec<String>),
}

impl Labels {
    fn into_vec(self) -> Vec<String> {
        match self {
            Labels::One(label) => vec![label],
            Labels::Many(labels) => labels,
        }
    }
}

/// NFC-normalize and trim so composed and decomposed input compare equal.
pub fn normalize_label(label: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(label.trim()).into_owned()
}

fn into_unit(record: UnitRecord) -> Unit {
    let forward = normalize_label(&record.forward);
    let mut synonyms = record
        .reverse
        .into_vec()
        .into_iter()
        .map(|s| normalize_label(&s))
        .filter(|s| !s.is_empty());
    // An empty synonym list leaves `reverse` empty, which Pool::new rejects.
    let reverse = synonyms.next().unwrap_or_default();
    let alternates = synonyms.collect();
    let id = record
        .id
        .map(|id| normalize_label(&id))
        .unwrap_or_else(|| forward.clone());

    Unit {
        id: UnitId(id),
        forward,
        reverse,
        alternates,
        hints: record.hints.iter().map(|h| normalize_label(h)).collect(),
    }
}

pub fn from_json(json: &str) -> Result<Pool, PoolError> {
    let records: Vec<UnitRecord> = serde_json::from_str(json)?;
    Pool::new(records.into_iter().map(into_unit).collect())
}

pub fn load_file(path: &Path) -> Result<Pool, PoolError> {
    let content = fs::read_to_string(path)?;
    from_json(&content)
}

pub fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = BuiltinPools::iter()
        .filter_map(|file| file.strip_suffix(".json").map(str::to_string))
        .collect();
    names.sort();
    names
}

pub fn load_builtin(name: &str) -> Result<Pool, PoolError> {
    let file = BuiltinPools::get(&format!("{name}.json"))
        .ok_or_else(|| PoolError::UnknownBuiltin(name.to_string()))?;
    let content = String::from_utf8_lossy(&file.data);
    from_json(&content)
}

/// Resolve a pool setting: a built-in name first, otherwise a file path.
pub fn load(source: &str) -> Result<Pool, PoolError> {
    if builtin_names().iter().any(|n| n == source) {
        load_builtin(source)
    } else {
        let path = Path::new(source);
        if path.exists() {
            load_file(path)
        } else {
            Err(PoolError::UnknownBuiltin(source.to_string()))
        }
    }
}
