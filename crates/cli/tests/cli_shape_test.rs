use std::process::Command;

fn run_schemadiff(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_schemadiff"))
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run schemadiff: {error}"))
}

#[test]
fn help_lists_diff_and_migrate_subcommands() {
    let output = run_schemadiff(&["--help"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("diff"));
    assert!(stdout.contains("migrate"));
}

#[test]
fn diff_help_lists_connection_flags() {
    let output = run_schemadiff(&["diff", "--help"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--dialect"));
    assert!(stdout.contains("--source-url"));
    assert!(stdout.contains("--target-url"));
}

#[test]
fn missing_required_flags_exits_nonzero() {
    let output = run_schemadiff(&["diff"]);
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn unknown_dialect_is_rejected_with_usage_category() {
    let output = run_schemadiff(&[
        "diff",
        "--dialect",
        "oracle",
        "--source-url",
        "oracle://a/b",
        "--target-url",
        "oracle://a/b",
    ]);
    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage") || stderr.contains("dialect"));
}
