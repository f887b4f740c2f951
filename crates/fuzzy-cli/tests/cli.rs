use assert_cmd::Command;
use predicates::prelude::*;

fn fuzzy() -> Command {
    let mut cmd = Command::cargo_bin("fuzzy").unwrap();
    cmd.env_remove("FUZZY_LOG");
    cmd
}

// ── build ───────────────────────────────────────────────────────────────────

#[test]
fn test_build_at_rule() {
    fuzzy()
        .args([
            "build",
            "--start",
            "2013-02-01T01:01:00",
            "--reference",
            "2013-02-01T01:01:30",
            "--at",
            "T30S=half a minute ago!",
        ])
        .assert()
        .success()
        .stdout("half a minute ago!\n");
}

#[test]
fn test_build_before_rules_in_order() {
    let rules = ["--before", "T16H=%h hours ago", "--before", "1D=yesterday"];

    fuzzy()
        .args([
            "build",
            "--start",
            "2013-10-21T15:00:00",
            "--reference",
            "2013-10-22T12:54:58",
        ])
        .args(rules)
        .assert()
        .success()
        .stdout("yesterday\n");

    fuzzy()
        .args([
            "build",
            "--start",
            "2013-10-22T12:54:58",
            "--reference",
            "2013-10-22T14:54:58",
        ])
        .args(rules)
        .assert()
        .success()
        .stdout("2 hours ago\n");
}

#[test]
fn test_build_fallback_formats_start() {
    fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-04",
            "--reference",
            "2013-01-05",
            "--after",
            "P3D=%d days ago",
        ])
        .assert()
        .success()
        .stdout("1/4/2013, 12:00:00 AM\n");
}

#[test]
fn test_build_custom_fallback_format() {
    fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-04",
            "--reference",
            "2013-01-05",
            "--fallback-format",
            "%Y-%m-%d",
        ])
        .assert()
        .success()
        .stdout("2013-01-04\n");
}

#[test]
fn test_build_rfc3339_in_timezone() {
    // 23:30 UTC on Jan 1 is 00:30 on Jan 2 in Paris.
    fuzzy()
        .args([
            "build",
            "--start",
            "2026-01-01T23:30:00Z",
            "--reference",
            "2026-01-02T00:30:00+01:00",
            "--timezone",
            "Europe/Paris",
            "--fallback-format",
            "%Y-%m-%d %H:%M",
        ])
        .assert()
        .success()
        .stdout("2026-01-02 00:30\n");
}

#[test]
fn test_build_from_rules_file() {
    let path = std::env::temp_dir().join(format!("fuzzy-cli-rules-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "before": [{"template": "%m minutes ago", "duration": "T1H"}],
            "after": [{"template": "%d days ago", "duration": [{"magnitude": 1, "unit": "day"}]}]
        }"#,
    )
    .unwrap();

    fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-01T00:00:00",
            "--reference",
            "2013-01-01T00:42:00",
            "--rules",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout("42 minutes ago\n");

    fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-01T00:00:00",
            "--reference",
            "2013-01-04T06:00:00",
            "--rules",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout("3 days ago\n");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_build_explain_reports_match() {
    let output = fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-01T00:00:00",
            "--reference",
            "2013-01-01T03:00:00",
            "--before",
            "T1H=%m minutes ago",
            "--before",
            "1D=%h hours ago",
            "--explain",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kind"], "before");
    assert_eq!(json["index"], 1);
    assert_eq!(json["delta_seconds"], 10_800);
    assert_eq!(json["text"], "3 hours ago");
}

#[test]
fn test_build_explain_reports_fallback() {
    let output = fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-02",
            "--reference",
            "2013-01-01",
            "--explain",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["kind"].is_null());
    assert_eq!(json["delta_seconds"], -86_400);
    assert_eq!(json["text"], "1/2/2013, 12:00:00 AM");
}

#[test]
fn test_build_malformed_inline_rule_fails() {
    fuzzy()
        .args([
            "build",
            "--start",
            "2013-01-01",
            "--reference",
            "2013-01-02",
            "--at",
            "P1Q=oops",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed duration"));
}

#[test]
fn test_build_inline_rule_without_separator_fails() {
    fuzzy()
        .args(["build", "--start", "2013-01-01", "--at", "T30S"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DURATION=TEMPLATE"));
}

#[test]
fn test_build_invalid_start_fails() {
    fuzzy()
        .args(["build", "--start", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --start"));
}

#[test]
fn test_build_invalid_timezone_fails() {
    fuzzy()
        .args(["build", "--start", "2013-01-01", "--timezone", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timezone"));
}

#[test]
fn test_build_without_reference_uses_now() {
    // Far in the past, so the after rule applies whatever the clock says.
    fuzzy()
        .args(["build", "--start", "2000-01-01", "--after", "P1Y=a long time ago"])
        .assert()
        .success()
        .stdout("a long time ago\n");
}

// ── parse / add / render ────────────────────────────────────────────────────

#[test]
fn test_parse_prints_components() {
    let output = fuzzy().args(["parse", "P1Y2WT2M3S"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected = serde_json::json!([
        {"magnitude": 1.0, "unit": "year"},
        {"magnitude": 2.0, "unit": "week"},
        {"magnitude": 2.0, "unit": "minute"},
        {"magnitude": 3.0, "unit": "second"}
    ]);
    assert_eq!(json, expected);
}

#[test]
fn test_parse_malformed_fails() {
    fuzzy()
        .args(["parse", "P3H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown unit 'H'"));
}

#[test]
fn test_add_fractional_month() {
    fuzzy()
        .args([
            "add",
            "--date",
            "2013-01-01",
            "--magnitude",
            "2.5",
            "--unit",
            "month",
        ])
        .assert()
        .success()
        .stdout("2013-03-16T12:00:00\n");
}

#[test]
fn test_add_negative_hours() {
    fuzzy()
        .args([
            "add",
            "--date",
            "2013-01-01T01:00:00",
            "--magnitude",
            "-3",
            "--unit",
            "hours",
        ])
        .assert()
        .success()
        .stdout("2012-12-31T22:00:00\n");
}

#[test]
fn test_add_invalid_unit_fails() {
    fuzzy()
        .args([
            "add",
            "--date",
            "2013-01-01",
            "--magnitude",
            "1",
            "--unit",
            "fortnight",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit"));
}

#[test]
fn test_render_template() {
    fuzzy()
        .args(["render", "--seconds", "93784", "%d d %h h %m m %s s"])
        .assert()
        .success()
        .stdout("1 d 2 h 3 m 4 s\n");
}
