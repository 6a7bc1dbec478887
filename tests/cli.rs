// Drives the compiled binary with piped stdin. Every run points --db and
// --config into a temp dir so the real state directory is never touched.

use assert_cmd::Command;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use times_tables::progress::SETTINGS_KEY;
use times_tables::{KeyValueStore, SqliteStore};

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            br#"{"feedback_delay_ms": 0, "log_filter": "off"}"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("times-tables").unwrap();
        cmd.env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.path().join("progress.db"))
            .arg("--config")
            .arg(self.path().join("config.json"));
        cmd
    }

    fn run(&self, args: &[&str], stdin: &str) -> String {
        let output = self
            .cmd()
            .args(args)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).unwrap()
    }
}

#[test]
fn stats_and_history_on_fresh_install() {
    let sandbox = Sandbox::new();
    assert!(sandbox.run(&["stats"], "").contains("No games played yet."));
    assert!(sandbox.run(&["history"], "").contains("No games played yet."));
}

#[test]
fn typed_game_is_scored_and_saved() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(
        &["play", "--tables", "3", "--difficulty", "hard", "--questions", "3"],
        "x\nnope\n-1\n",
    );
    assert!(out.contains("Not quite!"), "{out}");
    assert!(out.contains("0/3  (0% correct)"), "{out}");
    assert!(out.contains("Questions to practise:"), "{out}");
    assert!(out.contains("(you said -1)"), "{out}");

    let stats = sandbox.run(&["stats"], "");
    assert!(stats.contains("Games played:      1"), "{stats}");
    assert!(stats.contains("Answered correctly: 0 of 3"), "{stats}");
    assert!(stats.contains("Trickiest questions:"), "{stats}");

    let history = sandbox.run(&["history"], "");
    assert_eq!(history.lines().count(), 1);
    assert!(history.contains("0/3"), "{history}");
    assert!(history.contains("hard"), "{history}");
    assert!(history.contains("tables 3"), "{history}");
}

#[test]
fn saved_settings_prefill_next_game() {
    let sandbox = Sandbox::new();
    sandbox.run(
        &["play", "--tables", "5,6", "--difficulty", "hard", "--questions", "2"],
        "q\n",
    );

    // no flags: the last settings are reused
    let out = sandbox.run(&["play"], "q\n");
    assert!(out.contains("Tables 5, 6 | hard | 2 questions"), "{out}");
    assert!(out.contains("Bye!"), "{out}");

    // quitting does not record a game
    assert!(sandbox.run(&["history"], "").contains("No games played yet."));
}

#[test]
fn multiple_choice_letters_pick_options() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(
        &["play", "--tables", "2", "--difficulty", "medium", "--questions", "2"],
        "a\nb\n",
    );
    assert!(out.contains("a) "), "{out}");
    assert!(out.contains("c) "), "{out}");
    assert!(out.contains("/2  ("), "{out}");
}

#[test]
fn closing_input_ends_a_timed_game() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(
        &["play", "--tables", "9", "--difficulty", "hard", "--mode", "time", "--time-limit", "60"],
        "0\n",
    );
    assert!(out.contains("1:00"), "{out}");
    assert!(out.contains("/1  ("), "{out}");
}

#[test]
fn reset_clears_history() {
    let sandbox = Sandbox::new();
    sandbox.run(
        &["play", "--tables", "4", "--difficulty", "hard", "--questions", "1"],
        "16\n",
    );
    assert!(sandbox.run(&["stats"], "").contains("Games played:      1"));

    assert!(sandbox.run(&["reset"], "").contains("All progress cleared."));
    assert!(sandbox.run(&["stats"], "").contains("No games played yet."));
}

#[test]
fn zero_question_count_in_saved_settings_falls_back() {
    let sandbox = Sandbox::new();
    sandbox.run(&["play", "--tables", "3", "--difficulty", "hard"], "q\n");

    let store = SqliteStore::open(sandbox.path().join("progress.db")).unwrap();
    store
        .set(
            SETTINGS_KEY,
            r#"{"tables":[3],"difficulty":"hard","gameMode":"questions","questionCount":0,"timeLimit":0}"#,
        )
        .unwrap();
    drop(store);

    let out = sandbox.run(&["play"], "q\n");
    assert!(out.contains("Tables 3 | hard | 10 questions"), "{out}");
}

#[test]
fn rejects_out_of_range_table() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["play", "--tables", "13"])
        .assert()
        .failure();
}

#[test]
fn ephemeral_runs_leave_no_database() {
    let sandbox = Sandbox::new();
    let mut cmd = Command::cargo_bin("times-tables").unwrap();
    cmd.arg("--ephemeral")
        .arg("--config")
        .arg(sandbox.path().join("config.json"))
        .args(["play", "--tables", "1", "--difficulty", "hard", "--questions", "1"])
        .write_stdin("1\n")
        .assert()
        .success();
    assert!(!sandbox.path().join("progress.db").exists());
}
