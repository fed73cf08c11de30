//! Integration tests for the headless runner: content files, save files,
//! sessions and batches.

use std::fs;
use std::path::PathBuf;

use gauntlet_core::content::{ContentDatabase, ContentProvider};
use gauntlet_core::persistence::ProgressRepository;
use gauntlet_core::progression::ProgressionState;
use gauntlet_headless::batch::{run_batch, BatchConfig};
use gauntlet_headless::content_loader::{load_content, validate_content_file};
use gauntlet_headless::error::HeadlessError;
use gauntlet_headless::report::{write_json_line, BattleReport};
use gauntlet_headless::repository::RonFileProgressRepository;
use gauntlet_headless::session::{EncounterSession, SessionConfig};
use gauntlet_test_utils::fixtures::{content_with_layout, single_battle_content, skeleton_wave};

fn two_acts_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/content/two_acts.ron")
}

#[test]
fn test_shipped_content_is_valid() {
    let path = two_acts_path();
    assert!(validate_content_file(&path).unwrap().is_empty());

    let content = load_content(Some(&path)).unwrap();
    assert_eq!(content.tier_count(), 2);
    assert_eq!(content.map_count(0), 2);
    assert_eq!(content.total_battle_count(), 7);
    assert_eq!(content.items().len(), 3);
}

#[test]
fn test_validate_reports_dangling_enemy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ron");
    let mut data = single_battle_content(vec![skeleton_wave(1, 0.0)]).data().clone();
    data.battles[0].waves[0].spawns[0].enemy_id = "dragon".to_string();
    fs::write(&path, ContentDatabase::new(data).to_ron_string().unwrap()).unwrap();

    let problems = validate_content_file(&path).unwrap();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("dragon"));

    let err = load_content(Some(&path)).unwrap_err();
    assert!(matches!(err, HeadlessError::Encounter(_)));
}

#[test]
fn test_progress_survives_restart_through_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("saves/hero.ron");
    let content = content_with_layout(&[&[2, 1]], 2);

    let mut repo = RonFileProgressRepository::new(&save_path);
    let mut first = EncounterSession::resume(content.clone(), &repo, SessionConfig::default())
        .unwrap();
    let summary = first.run_battles(2, 0.05, 100_000, |_| Ok(())).unwrap();
    first.save(&mut repo).unwrap();

    assert_eq!(summary.final_cursor.map, 1);
    assert!(save_path.exists());

    let repo = RonFileProgressRepository::new(&save_path);
    let saved = repo.load().unwrap().unwrap();
    assert_eq!(saved.cursor(), (0, 1, 0));
    assert_eq!(saved.total_kills, 4);

    let mut second = EncounterSession::resume(content, &repo, SessionConfig::default()).unwrap();
    let summary = second.run_battles(1, 0.05, 100_000, |_| Ok(())).unwrap();
    assert_eq!(summary.total_kills, 6);
    // Last battle of the last map repeats.
    assert_eq!(second.progression().cursor(), (0, 1, 0));
}

#[test]
fn test_out_of_range_save_halts_session() {
    let content = content_with_layout(&[&[1]], 1);
    let mut session = EncounterSession::new(
        content,
        ProgressionState::at(3, 0, 0),
        SessionConfig::default(),
    );

    let err = session.run_battles(1, 0.05, 100, |_| Ok(())).unwrap_err();
    assert!(matches!(err, HeadlessError::Encounter(_)));
    assert!(session.controller().is_halted());
}

#[test]
fn test_battle_reports_are_json_lines() {
    let content = content_with_layout(&[&[3]], 1);
    let mut session = EncounterSession::new(
        content,
        ProgressionState::default(),
        SessionConfig::default().with_seed(17),
    );

    let mut out = Vec::new();
    session
        .run_battles(3, 0.05, 100_000, |report| write_json_line(&mut out, report))
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let reports: Vec<BattleReport> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 3);
    assert_eq!(
        reports.iter().map(|r| r.battle).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(reports.iter().all(|r| r.kills == 1));
    assert!(reports.windows(2).all(|w| w[0].tick < w[1].tick));
}

#[test]
fn test_batch_is_deterministic_per_seed() {
    let content = load_content(Some(&two_acts_path())).unwrap();
    let config = BatchConfig::new(3, 3).with_seed(100);

    let a = run_batch(&content, config.clone());
    let b = run_batch(&content, config);

    assert!(a.errors.is_empty(), "{:?}", a.errors);
    assert_eq!(a.runs, b.runs);
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.summary.total_battles, 9);
}
