#[path = "common/mod.rs"]
mod common;

use common::InterEdTest;

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_empty() {
    let intered = InterEdTest::new();

    let output = intered.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("not configured"));
    assert!(output.contains("page_size: 10"));
}

#[test]
fn test_config_set_and_get_url() {
    let intered = InterEdTest::new();

    intered.run_success(&["config", "set", "api.url", "https://dashboard.intered.io"]);
    let output = intered.run_success(&["config", "get", "api.url"]);
    assert_eq!(output.trim(), "https://dashboard.intered.io");

    let saved = intered.read_config().expect("config file should exist");
    assert!(saved.contains("url: https://dashboard.intered.io"));
}

#[test]
fn test_config_token_is_masked() {
    let intered = InterEdTest::new();

    let set_output = intered.run_success(&["config", "set", "api.token", "tok_live_abcdef"]);
    assert!(!set_output.contains("tok_live_abcdef"));

    let show = intered.run_success(&["config", "show"]);
    assert!(show.contains("to...ef"));
    assert!(!show.contains("tok_live_abcdef"));

    let get = intered.run_success(&["config", "get", "api.token", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&get).unwrap();
    assert_eq!(json["value"], "to...ef");
    assert_eq!(json["masked"], true);
}

#[test]
fn test_config_get_not_set() {
    let intered = InterEdTest::new();

    let stderr = intered.run_failure(&["config", "get", "api.url"]);
    assert!(stderr.contains("not set"));
}

#[test]
fn test_config_set_invalid_key() {
    let intered = InterEdTest::new();

    let stderr = intered.run_failure(&["config", "set", "invalid.key", "value"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_underscore_key_suggests_dot_notation() {
    let intered = InterEdTest::new();

    let stderr = intered.run_failure(&["config", "set", "api_url", "https://x.io"]);
    assert!(stderr.contains("Use dot notation: 'api.url'"));
}

#[test]
fn test_config_rejects_bad_values() {
    let intered = InterEdTest::new();

    intered.run_failure(&["config", "set", "list.page_size", "0"]);
    intered.run_failure(&["config", "set", "api.timeout", "soon"]);
    intered.run_failure(&["config", "set", "api.url", "ftp://files.intered.io"]);
    assert!(intered.read_config().is_none());
}

#[test]
fn test_page_size_from_config_applies_to_ls() {
    let intered = InterEdTest::with_fixtures();
    intered.write_config("list:\n  page_size: 3\n");

    let output = intered.run_offline_success(&["ls", "students", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["page_size"], 3);
    assert_eq!(json["records"].as_array().unwrap().len(), 3);
    assert_eq!(json["total_pages"], 2);
}

#[test]
fn test_missing_api_url_is_reported() {
    let intered = InterEdTest::new();

    let stderr = intered.run_failure(&["ls", "students"]);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("API URL not configured"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let intered = InterEdTest::new();
    intered.write_config("api: [not, a, mapping");

    let stderr = intered.run_failure(&["config", "show"]);
    assert!(stderr.contains("failed to parse config file"));
}
