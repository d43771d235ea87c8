use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "hustings-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_hustings-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("mmp"));
}

#[test]
fn cli_runs_every_scenario_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_hustings-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hustings Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = report["results"].as_array().expect("results array");
    assert!(results.len() >= 2 * 9);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_fingerprints_repeat_across_runs() {
    let exe = env!("CARGO_BIN_EXE_hustings-tester");
    let fingerprints = |label: &str| {
        let path = temp_path(label);
        let status = Command::new(exe)
            .args(["--report", "json", "--scenarios", "mmd", "--iterations", "3", "--output"])
            .arg(&path)
            .status()
            .expect("run cli");
        assert!(status.success());
        let content = std::fs::read_to_string(path).expect("read report");
        let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
        report["results"][0]["fingerprint"].clone()
    };
    let first = fingerprints("fp-a");
    assert!(first.is_string());
    assert_eq!(first, fingerprints("fp-b"));
}

#[test]
fn cli_rejects_invalid_config() {
    let exe = env!("CARGO_BIN_EXE_hustings-tester");
    let config_path = temp_path("bad-config");
    std::fs::write(&config_path, r#"{ "cache_ttl_secs": 0 }"#).expect("write config");
    let output = Command::new(exe)
        .args(["--scenarios", "fptp", "--iterations", "1", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid generation config"));
}
