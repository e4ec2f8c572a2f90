use super::{load_settings_from, normalize_base_url, Settings, DEFAULT_API_BASE_URL};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("timetable_console_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("console.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_file_or_env() {
    let settings = load_settings_from(&env::temp_dir().join("missing-console.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn file_values_apply_and_env_wins() {
    let path = temp_config("api_url = \"http://file:5000\"\napi_token = \"file-token\"\n");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.api_base_url, "http://file:5000");
    assert_eq!(settings.api_token.as_deref(), Some("file-token"));

    let vars: HashMap<&str, &str> = HashMap::from([
        ("TIMETABLE_API_URL", "http://env:1"),
        ("APP__API_URL", "http://app-env:2"),
        ("TIMETABLE_API_TOKEN", "env-token"),
    ]);
    let settings = load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(settings.api_base_url, "http://app-env:2");
    assert_eq!(settings.api_token.as_deref(), Some("env-token"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn blank_token_counts_as_none() {
    let settings = load_settings_from(&env::temp_dir().join("missing-console.toml"), |key| {
        (key == "APP__API_TOKEN").then(|| "   ".to_string())
    });
    assert_eq!(settings.api_token, None);
}

#[test]
fn malformed_file_is_ignored() {
    let path = temp_config("api_url = [not valid");
    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings, Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn normalizes_base_urls() {
    assert_eq!(
        normalize_base_url(" http://localhost:5000/ ").expect("url"),
        "http://localhost:5000"
    );
    assert_eq!(
        normalize_base_url("api.example.com").expect("url"),
        "http://api.example.com"
    );
    assert_eq!(normalize_base_url("").expect("url"), DEFAULT_API_BASE_URL);
    assert!(normalize_base_url("ftp://files.example.com").is_err());
}
