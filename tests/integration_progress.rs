// Integration tests for progress tracking on the SQLite store.
// These verify that answers, sessions and settings survive reopening the
// database and that bad data degrades to empty state.

use chrono::Utc;
use tempfile::tempdir;
use times_tables::game::{Difficulty, GameSettings};
use times_tables::progress::{GameSession, IncorrectAnswer, MAX_SESSIONS, SESSIONS_KEY};
use times_tables::{KeyValueStore, ProgressStore, SqliteStore};

fn session(score: u32) -> GameSession {
    GameSession {
        date: Utc::now(),
        score,
        total: 10,
        difficulty: Difficulty::Medium,
        tables: vec![7],
        incorrect_questions: vec![IncorrectAnswer {
            multiplier: 7,
            multiplicand: 8,
            user_answer: Some(54),
            correct_answer: 56,
        }],
    }
}

#[test]
fn progress_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.db");

    {
        let progress = ProgressStore::new(SqliteStore::open(&path).unwrap());
        progress.record_answer(7, 8, false);
        progress.record_answer(7, 8, true);
        progress.record_answer(3, 4, true);
        progress.save_session(session(9));
        progress.save_settings(&GameSettings {
            tables: [7, 8].into_iter().collect(),
            ..GameSettings::default()
        });
    }

    let progress = ProgressStore::new(SqliteStore::open(&path).unwrap());
    let records = progress.get_progress();
    assert_eq!(records.len(), 2);
    assert_eq!(records["7x8"].times_wrong, 1);
    assert_eq!(records["7x8"].times_correct, 1);
    assert_eq!(records["3x4"].times_correct, 1);

    let sessions = progress.get_sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0], {
        let mut expected = session(9);
        expected.date = sessions[0].date;
        expected
    });

    assert_eq!(
        progress.saved_settings().tables.into_iter().collect::<Vec<_>>(),
        vec![7, 8]
    );
}

#[test]
fn history_is_capped_on_disk() {
    let dir = tempdir().unwrap();
    let progress = ProgressStore::new(SqliteStore::open(dir.path().join("p.db")).unwrap());

    for i in 0..60 {
        progress.save_session(session(i));
    }

    let sessions = progress.get_sessions();
    assert_eq!(sessions.len(), MAX_SESSIONS);
    assert_eq!(sessions[0].score, 10);
    assert_eq!(sessions[MAX_SESSIONS - 1].score, 59);

    let stats = progress.get_total_stats();
    assert_eq!(stats.total_games, MAX_SESSIONS);
    assert_eq!(stats.total_correct, (10..60).sum::<u64>());
    assert_eq!(stats.total_questions, 10 * MAX_SESSIONS as u64);
}

#[test]
fn corrupt_history_on_disk_is_ignored() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("p.db")).unwrap();
    store.set(SESSIONS_KEY, "definitely not json").unwrap();

    let progress = ProgressStore::new(store);
    assert!(progress.get_sessions().is_empty());

    // saving replaces the corrupt blob with a valid history
    progress.save_session(session(1));
    assert_eq!(progress.get_sessions().len(), 1);
}

#[test]
fn sessions_json_uses_camel_case() {
    let dir = tempdir().unwrap();
    let progress = ProgressStore::new(SqliteStore::open(dir.path().join("p.db")).unwrap());
    progress.save_session(session(5));

    let raw = progress.store().get(SESSIONS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["difficulty"], "medium");
    assert_eq!(json[0]["incorrectQuestions"][0]["userAnswer"], 54);
    assert_eq!(json[0]["incorrectQuestions"][0]["correctAnswer"], 56);
}
