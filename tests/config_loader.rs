use revalidate::{ConfigError, FormOptions, ValidateOnChange};
use std::fs;
use tempfile::TempDir;

fn write_options(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("form.toml");
    fs::write(&path, content).expect("Failed to write options file");
    (temp_dir, path)
}

/// Missing file falls back to defaults.
#[test]
fn test_load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let options = FormOptions::load(&temp_dir.path().join("absent.toml")).unwrap();

    assert!(options.validate_single);
    assert!(matches!(options.validate_on_change, ValidateOnChange::Always));
    assert_eq!(options.debounce_ms, 300);
}

/// All keys are read; omitted ones keep their defaults.
#[test]
fn test_load_from_reads_values() {
    let (_dir, path) = write_options(
        r#"
validate_single = false
validate_on_change = "after_submit"
debounce_ms = 150
"#,
    );
    let options = FormOptions::load_from(&path).unwrap();

    assert!(!options.validate_single);
    assert!(matches!(options.validate_on_change, ValidateOnChange::AfterSubmit));
    assert_eq!(options.debounce_ms, 150);
    assert_eq!(
        options.async_failure_message,
        FormOptions::default().async_failure_message
    );
}

/// The on-change policy also accepts a plain boolean.
#[test]
fn test_policy_accepts_bool() {
    let (_dir, path) = write_options("validate_on_change = false\n");
    let options = FormOptions::load(&path).unwrap();
    assert!(matches!(options.validate_on_change, ValidateOnChange::Never));
}

/// Custom failure messages keep their placeholder.
#[test]
fn test_custom_failure_message() {
    let (_dir, path) = write_options("async_failure_message = \"Check failed ({error})\"\n");
    let options = FormOptions::load(&path).unwrap();
    assert_eq!(options.async_failure("offline"), "Check failed (offline)");
}

/// Malformed TOML is a parse error naming the file.
#[test]
fn test_parse_error() {
    let (_dir, path) = write_options("debounce_ms = [not valid\n");
    match FormOptions::load(&path).unwrap_err() {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

/// Unknown policy keywords are rejected at parse time.
#[test]
fn test_unknown_policy_keyword() {
    let (_dir, path) = write_options("validate_on_change = \"sometimes\"\n");
    assert!(matches!(
        FormOptions::load(&path),
        Err(ConfigError::ParseError { .. })
    ));
}

/// Debounce periods above one minute fail validation.
#[test]
fn test_validation_rejects_long_debounce() {
    let (_dir, path) = write_options("debounce_ms = 90000\n");
    match FormOptions::load(&path).unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("debounce_ms"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

/// Blank failure messages fail validation.
#[test]
fn test_validation_rejects_blank_failure_message() {
    let options = FormOptions {
        async_failure_message: "   ".to_string(),
        ..FormOptions::default()
    };
    assert!(matches!(
        options.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// A directory where the file should be is a read error.
#[test]
fn test_read_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        FormOptions::load_from(temp_dir.path()),
        Err(ConfigError::ReadError { .. })
    ));
}
