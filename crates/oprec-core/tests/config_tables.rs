//! Loading operation tables from TOML and YAML

use anyhow::Result;
use oprec_core::{
    ArgType, ConfigError, Hook, InvocationContext, LogFormat, Recorder, RecorderConfig,
    StrategyId, StrategyRegistry,
};
use oprec_test_utils::{user, CallLog, ReturnSpy};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;

const TOML: &str = r#"
[telemetry]
log_filter = "oprec_core=debug,info"
log_format = "compact"

[[operations]]
class = "UserService"
method = "update"
strategy = "user-audit"
args = "User"
comparable = true
target = "USER"
action = "UPDATE"

[[operations]]
class = "UserService"
method = "delete"
strategy = "user-audit"
removed = true

[[operations]]
class = "UserService"
method = "find"
strategy = "user-read"
"#;

const YAML: &str = r#"
telemetry:
  log_filter: "oprec_core=debug,info"
  log_format: compact
operations:
  - class: UserService
    method: update
    strategy: user-audit
    args: User
    comparable: true
    target: USER
    action: UPDATE
  - class: UserService
    method: delete
    strategy: user-audit
    removed: true
  - class: UserService
    method: find
    strategy: user-read
"#;

#[test]
fn toml_and_yaml_build_the_same_table() -> Result<()> {
    let from_toml = RecorderConfig::from_toml_str(TOML)?;
    let from_yaml = RecorderConfig::from_yaml_str(YAML)?;

    assert_eq!(from_toml, from_yaml);
    assert_eq!(from_toml.operation_table()?, from_yaml.operation_table()?);
    Ok(())
}

#[test]
fn table_entries_carry_every_field() -> Result<()> {
    let config = RecorderConfig::from_toml_str(TOML)?;
    assert_eq!(config.telemetry.log_format, LogFormat::Compact);

    let table = config.operation_table()?;
    assert_eq!(table.len(), 3);

    let update = table.get("UserService", "update").unwrap();
    assert_eq!(update.strategy(), &StrategyId::new("user-audit"));
    assert_eq!(update.args(), &ArgType::named("User"));
    assert!(update.comparable());
    assert_eq!(update.target(), Some("USER"));
    assert_eq!(update.action(), Some("UPDATE"));

    let delete = table.get("UserService", "delete").unwrap();
    assert!(delete.removed());
    assert!(!delete.comparable());
    assert_eq!(delete.args(), &ArgType::Any);
    Ok(())
}

#[test]
fn load_picks_format_from_extension() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let toml_path = dir.path().join("oprec.toml");
    std::fs::File::create(&toml_path)?.write_all(TOML.as_bytes())?;
    let yaml_path = dir.path().join("oprec.YML");
    std::fs::File::create(&yaml_path)?.write_all(YAML.as_bytes())?;

    assert_eq!(RecorderConfig::load(&toml_path)?, RecorderConfig::load(&yaml_path)?);
    Ok(())
}

#[test]
fn load_reports_parse_errors() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(b"[[operations]]\nclass = 3\n")?;

    let err = RecorderConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    Ok(())
}

#[test]
fn loaded_config_drives_recording() -> Result<()> {
    let log = CallLog::new();
    let registry = Arc::new(StrategyRegistry::with_defaults());
    registry.register("user-read", ReturnSpy::new(log.clone()).into_strategy())?;

    let recorder = Recorder::from_config(&RecorderConfig::from_yaml_str(YAML)?, registry)?;
    let ctx = InvocationContext::new("UserService", "find").with_arg(7_i64);
    let found: Result<Arc<oprec_test_utils::User>, ()> =
        recorder.invoke(ctx, || Ok(Arc::new(user(7, "X"))));

    assert!(found.is_ok());
    assert_eq!(log.hooks(), vec![Hook::RecordReturn]);
    Ok(())
}

#[test]
fn duplicate_entries_rejected_at_build() {
    let yaml = "operations:\n  - {class: A, method: x}\n  - {class: A, method: x}\n";
    let config = RecorderConfig::from_yaml_str(yaml).unwrap();
    let err = Recorder::from_config(&config, Arc::new(StrategyRegistry::new())).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateOperation { .. }));
}
