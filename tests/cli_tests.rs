mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn test_grouped_output() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "hello");
    fixture.create_file("b.txt", "hello");
    fixture.create_file("c.txt", "world");

    fdup!()
        .arg("-d")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#0\n\t"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("b.txt"))
        .stdout(predicate::str::contains("c.txt").not())
        .stdout(predicate::str::contains("#1").not());
}

#[test]
fn test_list_output_omits_first_member() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "hello");
    fixture.create_file("b.txt", "hello");

    let output = fdup!().arg("--list").arg(fixture.path()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("a.txt") || lines[0].ends_with("b.txt"));
    assert!(!lines[0].starts_with('#') && !lines[0].starts_with('\t'));
}

#[test]
fn test_no_duplicates_is_success() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "hello");

    fdup!()
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No duplicate files found!"));
}

#[test]
fn test_ignore_and_exclude_empty_flags() {
    let fixture = TestFixture::new();
    fixture.create_file("x.tmp", "same");
    fixture.create_file("y.tmp", "same");
    fixture.create_file("e1", "");
    fixture.create_file("e2", "");

    fdup!()
        .args(["-i", "*.tmp", "-e", "-d"])
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_root_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("missing-dir");

    fdup!()
        .arg("-d")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing-dir"));
}

#[test]
fn test_invalid_pattern_fails() {
    let fixture = TestFixture::new();

    fdup!()
        .args(["-i", "[oops"])
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[oops"));
}

#[test]
fn test_json_output() {
    let fixture = TestFixture::new();
    fixture.create_file("a.bin", "payload");
    fixture.create_file("b.bin", "payload");

    let output = fdup!()
        .args(["--json", "--hash", "blake3"])
        .arg(fixture.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = value.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["size"], 7);
    assert_eq!(groups[0]["files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_list_and_json_conflict() {
    fdup!().args(["--list", "--json"]).assert().failure().code(2);
}

#[cfg(unix)]
fn non_utf8_duplicates(fixture: &TestFixture) {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    for name in [&b"a\xff.bin"[..], &b"b\xfe.bin"[..]] {
        std::fs::write(fixture.path().join(OsStr::from_bytes(name)), "same bytes").unwrap();
    }
}

#[test]
#[cfg(unix)]
fn test_list_output_keeps_raw_name_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    non_utf8_duplicates(&fixture);

    let output = fdup!().arg("--list").arg(fixture.path()).output().unwrap();

    assert!(output.status.success());
    let listed = output.stdout.strip_suffix(b"\n").unwrap();
    assert!(!listed.contains(&b'\n'));
    assert!(std::path::Path::new(OsStr::from_bytes(listed)).exists());
}

#[test]
#[cfg(unix)]
fn test_json_output_with_non_utf8_names() {
    let fixture = TestFixture::new();
    non_utf8_duplicates(&fixture);

    let output = fdup!().arg("--json").arg(fixture.path()).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = value[0]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.as_str().unwrap().contains('\u{FFFD}')));
}
