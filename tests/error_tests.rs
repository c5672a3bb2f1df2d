//! Error scenario integration tests

use std::process::Command;

use tempfile::TempDir;

fn aait_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aait"))
}

fn isolated(home: &TempDir) -> Command {
    let mut cmd = aait_bin();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("ASSEMBLY_AI_KEY")
        .env_remove("AAIT_API_URL");
    cmd
}

#[test]
fn missing_api_key_error() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ASSEMBLY_AI_KEY"),
        "Expected error about missing API key, got: {}",
        stderr
    );
}

#[test]
fn malformed_config_is_reported_and_ignored() {
    let home = TempDir::new().expect("temp dir");
    let config_dir = home.path().join("config").join("assemblyai-tool");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::write(config_dir.join("config.toml"), "upload_concurrency = [").expect("write");

    let output = isolated(&home)
        .env_remove("RUST_LOG")
        .args(["list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring config file"), "got: {}", stderr);
    assert!(stderr.contains("config.toml"), "got: {}", stderr);
    assert!(stderr.contains("ASSEMBLY_AI_KEY"), "got: {}", stderr);
}

#[test]
fn missing_api_key_stops_convert_before_upload() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["convert", "missing.mp3", "out.txt"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!home.path().join("out.txt").exists());
}

#[test]
fn convert_missing_input_file() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .env("ASSEMBLY_AI_KEY", "dummy")
        .args(["convert", "missing.mp3", "out.txt"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.mp3"), "got: {}", stderr);
}

#[test]
fn convert_rejects_inverted_audio_window() {
    let home = TempDir::new().expect("temp dir");
    std::fs::write(home.path().join("clip.mp3"), b"audio").expect("write clip");
    let output = isolated(&home)
        .env("ASSEMBLY_AI_KEY", "dummy")
        .args([
            "convert",
            "clip.mp3",
            "out.txt",
            "--audio-start-from",
            "5000",
            "--audio-end-at",
            "1000",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("audio_end_at"), "got: {}", stderr);
}

#[test]
fn batch_missing_input_dir() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .env("ASSEMBLY_AI_KEY", "dummy")
        .args(["batch", "nope", "out"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn batch_empty_input_dir_succeeds() {
    let home = TempDir::new().expect("temp dir");
    std::fs::create_dir(home.path().join("in")).expect("create dir");
    std::fs::write(home.path().join("in").join("notes.txt"), b"not audio").expect("write");
    let output = isolated(&home)
        .env("ASSEMBLY_AI_KEY", "dummy")
        .args(["batch", "in", "out"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No audio files"), "got: {}", stderr);
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_format() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["config", "set", "format", "docx"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid output format"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_boolean() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["config", "set", "speaker_labels", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") && stderr.contains("false"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().expect("temp dir");
    let output = isolated(&home)
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set"),
        "Expected config list output, got: {}",
        stdout
    );
}
