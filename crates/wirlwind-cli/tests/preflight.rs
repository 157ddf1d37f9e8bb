use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn write(path: &std::path::Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn preflight_succeeds_when_all_templates_resolve() {
    let root = tempdir().unwrap();
    write(
        &root.path().join("collections/cpu/cisco_ios.yaml"),
        "command: show processes cpu\ninterval: 30\nparsers:\n  - kind: text_fsm\n    templates: [cpu.textfsm]\n",
    );
    write(&root.path().join("collections/cpu/_schema.yaml"), "five_sec_total: int\n");
    write(
        &root.path().join("templates/textfsm/cpu.textfsm"),
        "Value FIVE_SEC_TOTAL (\\d+)\n\nStart\n  ^CPU ${FIVE_SEC_TOTAL}% -> Record\n",
    );

    Command::cargo_bin("wirlwind")
        .unwrap()
        .args([
            "--host",
            "switch1.example.net",
            "--vendor",
            "cisco_ios",
            "--user",
            "admin",
            "--root",
            root.path().to_str().unwrap(),
            "--preflight-only",
        ])
        .assert()
        .success()
        .stdout(contains("All templates resolved."));
}

#[test]
fn preflight_fails_when_a_template_is_missing() {
    let root = tempdir().unwrap();
    write(
        &root.path().join("collections/cpu/cisco_ios.yaml"),
        "command: show processes cpu\ninterval: 30\nparsers:\n  - kind: text_fsm\n    templates: [missing.textfsm]\n",
    );
    write(&root.path().join("collections/cpu/_schema.yaml"), "five_sec_total: int\n");

    Command::cargo_bin("wirlwind")
        .unwrap()
        .args([
            "--host",
            "switch1.example.net",
            "--vendor",
            "cisco_ios",
            "--user",
            "admin",
            "--root",
            root.path().to_str().unwrap(),
            "--preflight-only",
        ])
        .assert()
        .failure()
        .stdout(contains("missing.textfsm"));
}

#[test]
fn preflight_warns_but_still_succeeds_on_missing_schema() {
    let root = tempdir().unwrap();
    write(
        &root.path().join("collections/memory/cisco_ios.yaml"),
        "command: show memory\ninterval: 60\nparsers: []\n",
    );

    Command::cargo_bin("wirlwind")
        .unwrap()
        .args([
            "--host",
            "switch1.example.net",
            "--vendor",
            "cisco_ios",
            "--user",
            "admin",
            "--root",
            root.path().to_str().unwrap(),
            "--preflight-only",
        ])
        .assert()
        .success()
        .stdout(contains("no _schema.yaml present"));
}
