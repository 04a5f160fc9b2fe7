// redact-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use redact_core::{MethodRegistry, Redact, Redactor, RedactorConfig};

#[derive(Debug, Clone, PartialEq, Redact)]
struct Ticket {
    #[redact("guest=star(2)")]
    reference: String,
    #[redact("all=remove(3)")]
    summary: String,
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
default_groups:
  - guest
disabled_methods:
  - redact
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = RedactorConfig::load_from_file(file.path())?;
    assert_eq!(config.default_groups, vec!["guest".to_string()]);
    assert_eq!(config.disabled_methods, vec!["redact".to_string()]);
    Ok(())
}

#[test]
fn test_load_from_missing_file() {
    let err = RedactorConfig::load_from_file("/nonexistent/redactor.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_load_invalid_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"default_groups: [guest, guest]\n")?;
    let err = RedactorConfig::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Duplicate name"));
    Ok(())
}

#[test]
fn test_default_groups_apply_when_caller_passes_none() -> Result<()> {
    let config = RedactorConfig::from_yaml_str("default_groups: [guest]\n")?;
    let redactor = Redactor::with_config(MethodRegistry::builtin(), config);
    let ticket = Ticket {
        reference: "TCK-1001".to_string(),
        summary: "printer on fire".to_string(),
    };

    let copy = redactor.redact::<_, &str>(&ticket, &[])?;
    assert_eq!(copy.reference, "TC******");
    assert_eq!(copy.summary, "pri");

    let copy = redactor.redact(&ticket, &["staff"])?;
    assert_eq!(copy.reference, "TCK-1001");
    assert_eq!(copy.summary, "pri");
    Ok(())
}

#[test_log::test]
fn test_disabled_method_fails_compilation() -> Result<()> {
    let config = RedactorConfig::from_yaml_str("disabled_methods: [remove]\n")?;
    let redactor = Redactor::with_config(MethodRegistry::builtin(), config);
    let ticket = Ticket {
        reference: "TCK-1001".to_string(),
        summary: "printer on fire".to_string(),
    };
    let err = redactor.redact(&ticket, &["guest"]).unwrap_err();
    assert!(err.to_string().contains("summary"));
    assert!(err.to_string().contains("remove"));
    Ok(())
}
