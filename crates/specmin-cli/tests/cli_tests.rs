use std::fs;
use std::process::Command;

const SPEC: &str = r##"
servers: [{url: "https://cli.test"}]
paths:
  /ping:
    get:
      operationId: ping
      summary: Health check.
"##;

fn specmin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_specmin"))
}

#[test]
fn compact_prints_text() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("ping.yaml");
    fs::write(&input, SPEC).unwrap();

    let output = specmin()
        .current_dir(tmp.path())
        .args(["compact", "-i"])
        .arg(&input)
        .output()
        .expect("failed to run specmin");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("##IMPORTANT: base_url:https://cli.test\n---\n"));
    assert!(stdout.contains("-method:get\npath: /ping\nopid: ping\nsum: Health check\n---\n"));
}

#[test]
fn compact_honours_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("ping.yaml"), SPEC).unwrap();
    fs::write(
        tmp.path().join(".specmin.yaml"),
        "options:\n  endpoint_summaries: false\n",
    )
    .unwrap();

    let output = specmin()
        .current_dir(tmp.path())
        .args(["compact", "-i", "ping.yaml", "-o", "out"])
        .output()
        .expect("failed to run specmin");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = fs::read_to_string(tmp.path().join("out/ping.txt")).unwrap();
    assert!(!text.contains("sum:"));
    assert_eq!(fs::read_to_string(tmp.path().join("out/ping.json")).unwrap(), "{}");
}

#[test]
fn validate_rejects_missing_server() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("bad.yaml");
    fs::write(&input, "paths:\n  /a:\n    get: {}\n").unwrap();

    let output = specmin()
        .current_dir(tmp.path())
        .args(["validate", "-i"])
        .arg(&input)
        .output()
        .expect("failed to run specmin");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing server URL"), "{stderr}");
}

#[test]
fn batch_fails_only_when_every_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let specs = tmp.path().join("specs");
    fs::create_dir(&specs).unwrap();
    fs::write(specs.join("bad.json"), "{").unwrap();

    let failing = specmin()
        .current_dir(tmp.path())
        .args(["batch", "-i", "specs", "-o", "out"])
        .output()
        .expect("failed to run specmin");
    assert!(!failing.status.success());

    fs::write(specs.join("ping.yaml"), SPEC).unwrap();
    let partial = specmin()
        .current_dir(tmp.path())
        .args(["batch", "-i", "specs", "-o", "out", "--jobs", "2"])
        .output()
        .expect("failed to run specmin");
    assert!(partial.status.success(), "{}", String::from_utf8_lossy(&partial.stderr));
    assert!(tmp.path().join("out/ping.txt").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let tmp = tempfile::tempdir().unwrap();

    let first = specmin().current_dir(tmp.path()).arg("init").output().unwrap();
    assert!(first.status.success());
    assert!(tmp.path().join(".specmin.yaml").exists());

    let second = specmin().current_dir(tmp.path()).arg("init").output().unwrap();
    assert!(!second.status.success());

    let forced = specmin()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .output()
        .unwrap();
    assert!(forced.status.success());
}
