use std::path::{Path, PathBuf};

use command_dispatch::process_config;
use command_dispatch_core::DispatchError;
use command_dispatch_table::{TableDocument, TableError, load_config};
use serde_json::json;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DEV_SERVER_YAML: &str = r#"
version: "1.0"
global:
  fields:
    - name: verbose
      type: boolean
      default: false
    - name: logLevel
      type: choice
      choices: [error, warn, info, debug]
      default: warn
  aliases:
    v: verbose
commands:
  - key: serve
    aliases: [s]
    description: Start the dev server
    options:
      fields:
        - name: port
          type: number
          min: 1024
          integer: true
          default: 3000
        - name: open
          type: boolean
          default: false
      aliases:
        p: port
    args:
      kind: array
      field:
        type: string
  - key: remoteAdd
    description: Add a remote
    args:
      kind: tuple
      fields:
        - type: string
        - type: string
"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading and dispatching
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_table_dispatches_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "dev.yaml", DEV_SERVER_YAML);
    let config = load_config(&path).unwrap();

    let result = process_config(
        &config,
        &["-v", "--log-level=debug", "s", "src", "-p=8080", "--open"],
    )
    .unwrap();

    assert_eq!(result.command_name, "serve");
    assert_eq!(
        result.global_options,
        json!({"verbose": true, "logLevel": "debug"})
    );
    assert_eq!(result.options, json!({"port": 8080, "open": true}));
    assert_eq!(result.args, json!(["src"]));
}

#[test]
fn test_multi_word_command_from_table() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "dev.yml", DEV_SERVER_YAML);
    let config = load_config(&path).unwrap();

    let result = process_config(&config, &["remote", "add", "origin", "git@host:repo"]).unwrap();
    assert_eq!(result.command_name, "remoteAdd");
    assert_eq!(result.path_length, 2);
    assert_eq!(result.args, json!(["origin", "git@host:repo"]));
}

#[test]
fn test_table_field_rules_apply() {
    let config = TableDocument::from_yaml_str(DEV_SERVER_YAML)
        .unwrap()
        .into_config()
        .unwrap();

    let err = process_config(&config, &["serve", "--port=8080.5"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid command flags: port: expected integer, received \"8080.5\""
    );

    let err = process_config(&config, &["--log-level=trace", "serve"]).unwrap_err();
    assert!(matches!(err, DispatchError::Validation { .. }));
}

#[test]
fn test_unknown_command_lists_table_descriptions() {
    let config = TableDocument::from_yaml_str(DEV_SERVER_YAML)
        .unwrap()
        .into_config()
        .unwrap();

    let message = process_config(&config, &["deploy"]).unwrap_err().to_string();
    assert!(message.contains("serve (s) - Start the dev server"), "{message}");
    assert!(message.contains("remoteAdd - Add a remote"), "{message}");
}

#[test]
fn test_json_table_with_default_command() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "build.json",
        r#"{
            "default_command": "build",
            "commands": [
                {
                    "key": "build",
                    "options": {"fields": [{"name": "watch", "type": "boolean", "default": false}]}
                }
            ]
        }"#,
    );
    let config = load_config(&path).unwrap();

    let result = process_config(&config, &["--watch"]).unwrap();
    assert_eq!(result.command_name, "build");
    assert_eq!(result.path_length, 0);
    assert_eq!(result.options, json!({"watch": true}));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_yaml_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "bad.yaml", "commands: [unterminated");
    assert!(matches!(load_config(&path), Err(TableError::YamlError(_))));
}

#[test]
fn test_unsupported_extension_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "table.toml", "");
    assert!(matches!(
        load_config(&path),
        Err(TableError::UnknownFormat(_))
    ));
}

#[test]
fn test_global_alias_to_missing_field_is_reported() {
    let yaml = r#"
global:
  fields: [{name: verbose, type: boolean}]
  aliases: {q: quiet}
commands: [{key: run}]
"#;
    let err = TableDocument::from_yaml_str(yaml)
        .unwrap()
        .into_config()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid table: alias `q` targets unknown field `quiet`"
    );
}
