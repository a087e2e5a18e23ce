use std::fs;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use wordtiles::engine::reverse_mode::StreakReverseMode;
use wordtiles::engine::selector::WeightedSelector;
use wordtiles::generator::trial::TrialGenerator;
use wordtiles::pool::{Direction, PoolError, UnitId, loader};
use wordtiles::session::state_machine::TrialStateMachine;
use wordtiles::session::{Collaborators, SessionOptions};
use wordtiles::store::json_store::{JsonStore, StoredStatsSink};

const COLORS: &str = r#"[
    {"forward": "赤", "reverse": ["red", "crimson"], "hints": ["aka"]},
    {"forward": "青", "reverse": "blue", "hints": ["ao"]},
    {"forward": "白", "reverse": "white"},
    {"id": "black", "forward": "黒", "reverse": " black "}
]"#;

#[test]
fn load_pool_from_file_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("colors.json");
    fs::write(&path, COLORS).unwrap();

    let pool = loader::load(path.to_str().unwrap()).unwrap();
    assert_eq!(pool.len(), 4);

    let red = pool.by_label(Direction::Forward, "赤").unwrap();
    assert_eq!(red.reverse, "red");
    assert_eq!(red.alternates, vec!["crimson".to_string()]);
    assert_eq!(red.hints, vec!["aka".to_string()]);

    let black = pool.get(&UnitId::from("black")).unwrap();
    assert_eq!(black.reverse, "black");
    assert!(pool.get(&UnitId::from("白")).is_some());
}

#[test]
fn builtin_name_wins_over_missing_path() {
    assert!(loader::load("hiragana").is_ok());
    assert!(matches!(
        loader::load("no-such-pool"),
        Err(PoolError::UnknownBuiltin(name)) if name == "no-such-pool"
    ));
}

#[test]
fn malformed_pool_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"[{"forward": "赤"}]"#).unwrap();
    assert!(matches!(loader::load_file(&path), Err(PoolError::Json(_))));
}

#[test]
fn session_on_file_pool_persists_stats() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("colors.json");
    fs::write(&path, COLORS).unwrap();
    let pool = loader::load_file(&path).unwrap();

    let store = JsonStore::with_base_dir(dir.path().join("data")).unwrap();
    let mut machine = TrialStateMachine::new(
        pool,
        2,
        TrialGenerator::new(SmallRng::seed_from_u64(4)),
        SessionOptions::default(),
        Collaborators {
            selector: Box::new(WeightedSelector::new(SmallRng::seed_from_u64(5))),
            reverse_mode: Box::new(StreakReverseMode::default()),
            sink: Box::new(StoredStatsSink::open(store)),
        },
    );

    let answer = machine.trial().unwrap().answer_tokens.clone();
    for token in &answer {
        assert!(machine.tap_tile(token));
    }
    assert!(machine.submit().unwrap().correct);

    let reloaded = JsonStore::with_base_dir(dir.path().join("data"))
        .unwrap()
        .load_stats()
        .unwrap();
    assert_eq!(reloaded.total_score, 2);
    assert_eq!(reloaded.answer_times.len(), 1);
    assert_eq!(reloaded.unit_stats.len(), 2);
}
