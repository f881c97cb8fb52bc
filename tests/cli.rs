use std::fs;

use predicates::prelude::*;

fn lessonbook(store: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lessonbook");
    cmd.env_remove("LESSONBOOK_BASE_URL")
        .env("LESSONBOOK_STORE", store);
    cmd
}

#[test]
fn toggle_persists_across_runs() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("state").join("storage.json");

    lessonbook(&store)
        .args(["toggle", "p0-m1"])
        .assert()
        .success()
        .stdout("p0-m1 marked as completed\n");

    let raw = fs::read_to_string(&store).expect("read store");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("parse store");
    assert_eq!(json["completed-p0-m1"], "true");

    lessonbook(&store)
        .args(["progress"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Completed 1/15 (7%)\n"))
        .stdout(predicate::str::contains("p0-m1  JVM Basics"));

    lessonbook(&store)
        .args(["toggle", "p0-m1"])
        .assert()
        .success()
        .stdout("p0-m1 marked as not completed\n");

    let raw = fs::read_to_string(&store).expect("read store");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("parse store");
    assert_eq!(json["completed-p0-m1"], "false");

    lessonbook(&store)
        .args(["progress"])
        .assert()
        .success()
        .stdout("Completed 0/15 (0%)\n");
}

#[test]
fn store_flag_overrides_environment() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let env_store = dir.path().join("env.json");
    let flag_store = dir.path().join("flag.json");

    lessonbook(&env_store)
        .args(["--store"])
        .arg(&flag_store)
        .args(["toggle", "p3-m1"])
        .assert()
        .success();

    assert!(flag_store.exists());
    assert!(!env_store.exists());
}

#[test]
fn unknown_module_fails() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["toggle", "p9-m9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown module id: p9-m9"));
    assert!(!store.exists());
}

#[test]
fn corrupt_store_degrades_to_nothing_completed() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");
    fs::write(&store, "{ not json").expect("write store");

    lessonbook(&store)
        .args(["progress"])
        .assert()
        .success()
        .stdout("Completed 0/15 (0%)\n");
}

#[test]
fn completion_scan_only_counts_exact_true() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");
    fs::write(
        &store,
        r#"{
  "completed-p0-m2": "true",
  "completed-p1-m1": "TRUE",
  "completed-p1-m2": "false",
  "theme": "true"
}"#,
    )
    .expect("write store");

    lessonbook(&store)
        .args(["progress"])
        .assert()
        .success()
        .stdout("Completed 1/15 (7%)\np0-m2  Types and Variables\n");
}

#[test]
fn foreign_store_entries_survive_toggles() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");
    fs::write(&store, r#"{"completed-p0-m1":"true","volume":7}"#).expect("write store");

    lessonbook(&store)
        .args(["toggle", "p0-m2"])
        .assert()
        .success()
        .stdout("p0-m2 marked as completed\n");

    let raw = fs::read_to_string(&store).expect("read store");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("parse store");
    assert_eq!(json["volume"], 7);
    assert_eq!(json["completed-p0-m2"], "true");

    lessonbook(&store)
        .args(["progress"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Completed 2/15 (13%)\n"));
}

#[test]
fn sidebar_marks_selected_and_completed() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["toggle", "p0-m1"])
        .assert()
        .success();

    lessonbook(&store)
        .args(["sidebar", "--select", "p3-m1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("    [x] p0-m1  JVM Basics\n"))
        .stdout(predicate::str::contains("  > [ ] p3-m1  Null Safety\n"));
}

#[test]
fn tracks_lists_all_three() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["tracks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Java [java] 0/7 (0%)"))
        .stdout(predicate::str::contains("Kotlin [kotlin] 0/4 (0%)"))
        .stdout(predicate::str::contains("Spring [spring] 0/4 (0%)"));
}

#[test]
fn show_prints_lesson_and_neighbours() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["show", "p0-m1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("JVM Basics [p0-m1]\n"))
        .stdout(predicate::str::contains("Status: not completed"))
        .stdout(predicate::str::contains("Previous: -  Next: p0-m2"));
}

#[test]
fn show_html_uses_renderer_overrides() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["show", "p0-m1", "--html"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<h2 id="from-source-to-bytecode" class="heading-2">"#,
        ))
        .stdout(predicate::str::contains(r#"<div class="table-scroll">"#))
        .stdout(predicate::str::contains(r#"<pre class="code-block" data-language="bash">"#));
}

#[test]
fn toc_goto_moves_active_entry_and_fragment() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["toc", "p0-m1", "--goto", "class-loading"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  From Source to Bytecode (#from-source-to-bytecode)",
        ))
        .stdout(predicate::str::contains(">     Class Loading (#class-loading)"))
        .stdout(predicate::str::contains(
            "Location: http://localhost/p0-m1#class-loading",
        ));
}

#[test]
fn toc_goto_uses_base_url() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .env("LESSONBOOK_BASE_URL", "https://learn.example.com/course")
        .args(["toc", "p3-m1", "--goto", "platform-types"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Location: https://learn.example.com/course/p3-m1#platform-types",
        ));
}

#[test]
fn toc_goto_unknown_heading_fails() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["toc", "p0-m1", "--goto", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("heading not in table of contents: nowhere"));
}

#[test]
fn export_json_is_the_curriculum_tree() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    let output = lessonbook(&store)
        .args(["export", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("parse export");
    let tracks = json["tracks"].as_array().expect("tracks array");
    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0]["phases"][0]["modules"][0]["id"], "p0-m1");
}

#[test]
fn export_defaults_to_yaml() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .args(["export"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("tracks:\n"))
        .stdout(predicate::str::contains("id: p0-m1"));
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = dir.path().join("storage.json");

    lessonbook(&store)
        .env("RUST_LOG", "debug")
        .args(["tracks"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}
