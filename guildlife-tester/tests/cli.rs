use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "guildlife-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_rivals_writes_output() {
    let exe = env!("CARGO_BIN_EXE_guildlife-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-rivals", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available rivals"));
    assert!(content.contains("grinder"));
}

#[test]
fn cli_runs_a_short_match_with_csv_report() {
    let exe = env!("CARGO_BIN_EXE_guildlife-tester");
    let output_path = temp_path("csv");
    let output = Command::new(exe)
        .args([
            "--difficulty",
            "medium",
            "--rivals",
            "scholar",
            "--seeds",
            "1,2",
            "--weeks",
            "4",
            "--verify-replay",
            "--report",
            "csv",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Guild Life Opponent Tester"));
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn cli_rejects_unknown_rival() {
    let exe = env!("CARGO_BIN_EXE_guildlife-tester");
    let output = Command::new(exe)
        .args(["--rivals", "bard", "--weeks", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown rival"));
}
