//! Startup refuses to run on bad configuration.

use std::process::Command;

use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn tsvwatch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tsvwatch"))
}

#[test]
fn test_missing_config_file_exits_non_zero() -> TestResult {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.yaml");

    let output = tsvwatch().arg("--config").arg(&missing).output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"), "{stderr}");
    Ok(())
}

#[test]
fn test_malformed_config_exits_before_creating_directories() -> TestResult {
    let dir = TempDir::new()?;
    let config = dir.path().join("bad.yaml");
    std::fs::write(&config, "port: [oops\n")?;
    let source = dir.path().join("incoming");

    let output = tsvwatch()
        .arg("--config")
        .arg(&config)
        .arg("--dir")
        .arg(&source)
        .output()?;

    assert!(!output.status.success());
    assert!(!source.exists());
    Ok(())
}

#[test]
fn test_invalid_override_exits_non_zero() -> TestResult {
    let dir = TempDir::new()?;
    let config = dir.path().join("ok.yaml");
    std::fs::write(&config, "source_dir: in\n")?;

    let output = tsvwatch()
        .arg("--config")
        .arg(&config)
        .args(["--interval", "0"])
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scan_interval_secs"), "{stderr}");
    Ok(())
}
