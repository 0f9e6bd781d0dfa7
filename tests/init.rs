use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_warden"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "warden init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".warden.toml");
    assert!(config_path.exists(), ".warden.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[llm]"));
    assert!(content.contains("[github]"));

    // Verify it's valid TOML that warden-core can parse
    let config: warden_core::WardenConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.llm.provider, "gemini");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".warden.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_warden"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
