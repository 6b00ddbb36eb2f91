//! Integration tests for envlayer

use envlayer::*;
use serde::{Deserialize, Serialize};
use std::fs;
use temp_env::with_vars;
use tempfile::TempDir;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
struct ServerSection {
    #[validate(custom(function = "envlayer::validation::not_blank"))]
    host: String,
    #[validate(custom(function = "envlayer::validation::port"))]
    port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
struct AppConfig {
    #[validate(nested)]
    server: ServerSection,
    debug: bool,
}

impl Fillable for AppConfig {
    fn schema() -> Schema<Self> {
        Schema::<Self>::builder()
            .field("server.host", |c: &mut AppConfig| &mut c.server.host)
            .field("server.port", |c: &mut AppConfig| &mut c.server.port)
            .field("debug", |c: &mut AppConfig| &mut c.debug)
            .build()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
struct Credentials {
    #[validate(length(min = 8))]
    api_key: String,
}

impl Fillable for Credentials {
    fn schema() -> Schema<Self> {
        Schema::<Self>::builder()
            .field_with(
                "api_key",
                |c: &mut Credentials| &mut c.api_key,
                FieldOptions::new().required().describe("Upstream API key"),
            )
            .build()
    }
}

const APP_YAML: &str = "server:\n  host: localhost\n  port: 8080\ndebug: false\n";

/// Every variable these tests read, cleared so the host environment cannot leak in
const CLEARED: [(&str, Option<&str>); 7] = [
    ("SERVER_HOST", None),
    ("SERVER_PORT", None),
    ("DEBUG", None),
    ("API_KEY", None),
    ("APP_SERVER_HOST", None),
    ("APP_SERVER_PORT", None),
    ("APP_DEBUG", None),
];

fn cleared_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    let mut vars: Vec<_> = CLEARED.to_vec();
    for (key, value) in overrides {
        vars.retain(|(k, _)| k != key);
        vars.push((*key, Some(*value)));
    }
    vars
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn missing_env_file(dir: &TempDir) -> String {
    dir.path().join("absent.env").to_string_lossy().into_owned()
}

#[test]
fn test_yaml_only_equals_decoded_value() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir));

    with_vars(CLEARED, || {
        let mut config = AppConfig::default();
        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();

        let decoded: AppConfig = serde_yaml::from_str(APP_YAML).unwrap();
        assert_eq!(config, decoded);
        assert!(report.applied.is_empty());
    });
}

#[test]
fn test_environment_overrides_yaml() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir));

    with_vars(cleared_with(&[("SERVER_PORT", "9090")]), || {
        let mut config = AppConfig::default();
        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 9090);
        assert!(!config.debug);
        assert_eq!(
            report.applied,
            vec![AppliedVar {
                field: "server.port".to_string(),
                key: "SERVER_PORT".to_string(),
            }]
        );
    });
}

#[test]
fn test_prefixed_variables() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir))
        .with_env_prefix("APP");

    with_vars(
        cleared_with(&[("APP_DEBUG", "true"), ("APP_SERVER_HOST", "0.0.0.0"), ("SERVER_HOST", "ignored")]),
        || {
            let mut config = AppConfig::default();
            ConfigFiller::new(&settings).fill(&mut config).unwrap();

            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 8080);
            assert!(config.debug);
        },
    );
}

#[test]
fn test_prefix_ignores_unprefixed_variables() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir))
        .with_env_prefix("APP");

    with_vars(cleared_with(&[("SERVER_HOST", "0.0.0.0"), ("DEBUG", "true")]), || {
        let mut config = AppConfig::default();
        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert!(!config.debug);
        assert!(report.applied.is_empty());
    });
}

#[test]
fn test_bare_fallback_reads_unprefixed_variables() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir))
        .with_env_prefix("APP");

    with_vars(cleared_with(&[("SERVER_HOST", "0.0.0.0")]), || {
        let mut config = AppConfig::default();
        ConfigFiller::new(&settings)
            .with_naming(BareFallback)
            .fill(&mut config)
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
    });
}

#[test]
fn test_empty_yaml_path_is_noop() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new().with_env_path(missing_env_file(&dir));

    with_vars(CLEARED, || {
        let mut config = AppConfig {
            server: ServerSection {
                host: "preset".to_string(),
                port: 3000,
            },
            debug: true,
        };
        let before = config.clone();

        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();
        assert_eq!(config, before);
        assert_eq!(report.yaml_file, None);
    });
}

#[test]
fn test_missing_env_files_do_not_fail() {
    let dir = TempDir::new().unwrap();
    let missing = format!(
        "{},{}",
        dir.path().join("one.env").display(),
        dir.path().join("two.env").display()
    );
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing);

    with_vars(CLEARED, || {
        let mut config = AppConfig::default();
        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();

        assert_eq!(report.env_files.len(), 2);
        assert!(report.env_files.iter().all(|status| !status.loaded));
        assert!(!report.env_file_loaded());
        assert_eq!(config.server.port, 8080);
    });
}

#[test]
fn test_env_file_values_override_yaml() {
    let dir = TempDir::new().unwrap();
    let env_file = write_file(&dir, "app.env", "SERVER_PORT=7070\nDEBUG=1\n");
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(format!("{},{}", missing_env_file(&dir), env_file));

    with_vars(CLEARED, || {
        let mut config = AppConfig::default();
        let report = ConfigFiller::new(&settings).fill(&mut config).unwrap();

        assert!(report.env_file_loaded());
        assert!(!report.env_files[0].loaded);
        assert!(report.env_files[1].loaded);
        assert_eq!(config.server.port, 7070);
        assert!(config.debug);
    });
}

#[test]
fn test_process_env_beats_env_file() {
    let dir = TempDir::new().unwrap();
    let env_file = write_file(&dir, "app.env", "SERVER_PORT=7070\n");
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(env_file);

    with_vars(cleared_with(&[("SERVER_PORT", "6060")]), || {
        let mut config = AppConfig::default();
        ConfigFiller::new(&settings).fill(&mut config).unwrap();
        assert_eq!(config.server.port, 6060);
    });
}

#[test]
fn test_missing_yaml_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(dir.path().join("absent.yaml").to_string_lossy())
        .with_env_path(missing_env_file(&dir));

    let err = ConfigFiller::new(&settings)
        .fill(&mut AppConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_unconvertible_env_value_is_process_error() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", APP_YAML))
        .with_env_path(missing_env_file(&dir));

    with_vars(cleared_with(&[("SERVER_PORT", "eighty")]), || {
        let err = ConfigFiller::new(&settings)
            .fill(&mut AppConfig::default())
            .unwrap_err();

        match err {
            ConfigError::Process(process) => assert_eq!(process.field(), "server.port"),
            other => panic!("Expected process error, got {:?}", other),
        }
    });
}

#[test]
fn test_required_field_unresolved_is_process_error() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new().with_env_path(missing_env_file(&dir));

    with_vars(CLEARED, || {
        let err = ConfigFiller::new(&settings)
            .fill(&mut Credentials::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Process);
        assert!(matches!(
            err,
            ConfigError::Process(ProcessError::Missing { ref field, .. }) if field == "api_key"
        ));
    });
}

#[test]
fn test_required_field_from_yaml() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "creds.yaml", "api_key: secret-value\n"))
        .with_env_path(missing_env_file(&dir));

    with_vars(CLEARED, || {
        let mut creds = Credentials::default();
        ConfigFiller::new(&settings).fill(&mut creds).unwrap();
        assert_eq!(creds.api_key, "secret-value");
    });
}

#[test]
fn test_rule_violation_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new()
        .with_yaml_path(write_file(&dir, "config.yaml", "server:\n  host: localhost\n  port: 0\n"))
        .with_env_path(missing_env_file(&dir));

    with_vars(CLEARED, || {
        let err = ConfigFiller::new(&settings)
            .fill(&mut AppConfig::default())
            .unwrap_err();

        match err {
            ConfigError::Validation(report) => {
                assert!(report.has_field("server.port"));
                assert_eq!(report.violations[0].rule, "port");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    });
}

#[test]
fn test_short_key_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let settings = ProcessSettings::new().with_env_path(missing_env_file(&dir));

    with_vars(cleared_with(&[("API_KEY", "short")]), || {
        let err = ConfigFiller::new(&settings)
            .fill(&mut Credentials::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    });
}

#[test]
fn test_global_settings_fill() {
    let dir = TempDir::new().unwrap();
    let yaml = write_file(&dir, "config.yaml", APP_YAML);

    install(
        ProcessSettings::new()
            .with_yaml_path(yaml)
            .with_env_path(missing_env_file(&dir))
            .with_env_prefix("APP"),
    );

    with_vars(cleared_with(&[("APP_SERVER_PORT", "9191")]), || {
        let mut config = AppConfig::default();
        envlayer::fill(&mut config).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 9191);
    });
}

#[test]
fn test_usage_lists_environment_surface() {
    let usage = Credentials::schema().usage("APP", &UpperSnake);
    assert!(usage.contains("APP_API_KEY"));
    assert!(usage.contains("Upstream API key"));

    let usage = AppConfig::schema().usage("", &BareFallback);
    assert!(usage.contains("SERVER_HOST"));
    assert!(usage.contains("True or False"));
}
