use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn licensekit(dir: &Path) -> Command {
    let binary_path = assert_cmd::cargo::cargo_bin!("licensekit");
    let mut cmd = Command::new(binary_path);
    cmd.arg("--dir").arg(dir);
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf8")
}

fn run_gen(dir: &Path) {
    let output = licensekit(dir).arg("gen").output().expect("gen runs");
    assert!(output.status.success(), "gen failed: {:?}", output);
}

#[test]
fn gen_writes_all_three_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_gen(dir.path());

    let secret = std::fs::read_to_string(dir.path().join("secret_key.txt")).expect("secret file");
    let public = std::fs::read_to_string(dir.path().join("public_key.txt")).expect("public file");
    let salt = std::fs::read_to_string(dir.path().join("salt_key.txt")).expect("salt file");

    let secret_lines: Vec<&str> = secret.lines().collect();
    let public_lines: Vec<&str> = public.lines().collect();
    assert_eq!(secret_lines.len(), 3);
    assert_eq!(public_lines.len(), 2);
    assert_eq!(salt.lines().count(), 64);

    // every line is a decimal integer, and the public point matches the
    // secret record
    for line in secret_lines.iter().chain(&public_lines) {
        line.parse::<u64>().expect("decimal integer line");
    }
    for line in salt.lines() {
        let value: u64 = line.parse().expect("decimal salt line");
        assert!(value >= 1 && value < 2_147_483_647);
    }
    assert_eq!(secret_lines[1], public_lines[0]);
    assert_eq!(secret_lines[2], public_lines[1]);
}

#[test]
fn sign_then_open_accepts_the_same_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_gen(dir.path());

    let text = "art&bee&artbee@email.com";
    let output = licensekit(dir.path())
        .arg("sign")
        .arg(text)
        .output()
        .expect("sign runs");
    assert!(output.status.success(), "sign failed: {:?}", output);
    let code = stdout_of(&output).trim().to_string();
    assert!(
        code.split('-').count() == 2
            && code
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase() || c == '-'),
        "unexpected code format: {code}"
    );

    let output = licensekit(dir.path())
        .arg("open")
        .arg(&code)
        .arg(text)
        .output()
        .expect("open runs");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("SUCCESSFULLY OPENED"));
}

#[test]
fn open_is_case_insensitive_in_the_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_gen(dir.path());

    let output = licensekit(dir.path())
        .arg("sign")
        .arg("Art&Bee&ArtBee@Email.Com")
        .output()
        .expect("sign runs");
    assert!(output.status.success());
    let code = stdout_of(&output).trim().to_string();

    let output = licensekit(dir.path())
        .arg("open")
        .arg(&code)
        .arg("ART&BEE&ARTBEE@EMAIL.COM")
        .output()
        .expect("open runs");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("SUCCESSFULLY OPENED"));
}

#[test]
fn open_rejects_wrong_text_and_tampered_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_gen(dir.path());

    let output = licensekit(dir.path())
        .arg("sign")
        .arg("art&bee&artbee@email.com")
        .output()
        .expect("sign runs");
    let code = stdout_of(&output).trim().to_string();

    // same code, different licensee
    let output = licensekit(dir.path())
        .arg("open")
        .arg(&code)
        .arg("mallory&eve&mallory@example.com")
        .output()
        .expect("open runs");
    assert!(!output.status.success());
    assert!(stdout_of(&output).contains("FAIL TO OPEN"));

    // flip the last hex digit of the code
    let mut tampered = code.clone();
    let last = tampered.pop().expect("non-empty code");
    tampered.push(if last == '0' { '1' } else { '0' });
    let output = licensekit(dir.path())
        .arg("open")
        .arg(&tampered)
        .arg("art&bee&artbee@email.com")
        .output()
        .expect("open runs");
    assert!(!output.status.success());
    assert!(stdout_of(&output).contains("FAIL TO OPEN"));
}

#[test]
fn open_rejects_malformed_codes_without_crashing() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_gen(dir.path());

    for bad in ["garbage", "a3f", "a3f-7b-9c", "a3f--7b", "xyz-123", ""] {
        let output = licensekit(dir.path())
            .arg("open")
            .arg(bad)
            .arg("art&bee&artbee@email.com")
            .output()
            .expect("open runs");
        assert!(!output.status.success(), "code {bad:?} accepted");
        let stdout = stdout_of(&output);
        assert!(
            stdout.contains("ERROR") || stdout.contains("FAIL TO OPEN"),
            "no rejection message for {bad:?}: {stdout}"
        );
    }
}

#[test]
fn compose_builds_canonical_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = licensekit(dir.path())
        .arg("compose")
        .arg("Art")
        .arg("Bee")
        .arg("artbee@email.com")
        .output()
        .expect("compose runs");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), "Art&Bee&artbee@email.com");
}

#[test]
fn json_surface_is_consistent() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = licensekit(dir.path())
        .arg("--json")
        .arg("gen")
        .output()
        .expect("gen runs");
    assert!(output.status.success());
    let gen: Value = serde_json::from_str(&stdout_of(&output)).expect("gen emits json");
    let public_x = gen["public_x"].as_str().expect("public_x present");
    let public_file =
        std::fs::read_to_string(dir.path().join("public_key.txt")).expect("public file");
    assert_eq!(public_file.lines().next().expect("first line"), public_x);
    assert!(!gen["fingerprint"].as_str().expect("fingerprint").is_empty());

    let output = licensekit(dir.path())
        .arg("--json")
        .arg("sign")
        .arg("art&bee&artbee@email.com")
        .output()
        .expect("sign runs");
    let signed: Value = serde_json::from_str(&stdout_of(&output)).expect("sign emits json");
    let code = signed["code"].as_str().expect("code present").to_string();
    assert!(signed["hash"].as_u64().expect("hash present") < (1 << 40));

    let output = licensekit(dir.path())
        .arg("--json")
        .arg("open")
        .arg(&code)
        .arg("art&bee&artbee@email.com")
        .output()
        .expect("open runs");
    let opened: Value = serde_json::from_str(&stdout_of(&output)).expect("open emits json");
    assert_eq!(opened["valid"], Value::Bool(true));

    let output = licensekit(dir.path())
        .arg("--json")
        .arg("open")
        .arg("not-a-code-at-all")
        .arg("art&bee&artbee@email.com")
        .output()
        .expect("open runs");
    assert!(!output.status.success());
    let opened: Value = serde_json::from_str(&stdout_of(&output)).expect("open emits json");
    assert_eq!(opened["valid"], Value::Bool(false));
    assert_eq!(opened["error"], Value::String("malformed code".into()));
}
