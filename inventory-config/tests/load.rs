use std::fs;

use inventory_config::shared::GatewayConfig;
use inventory_config::{Environment, LoadConfigError, load_config_from};
use tempfile::TempDir;

fn write_configuration(files: &[(&str, &str)]) -> TempDir {
    let root = TempDir::new().unwrap();
    let configuration_dir = root.path().join("configuration");
    fs::create_dir(&configuration_dir).unwrap();

    for (name, contents) in files {
        fs::write(configuration_dir.join(name), contents).unwrap();
    }

    root
}

#[test]
fn environment_file_overrides_base() {
    let root = write_configuration(&[
        (
            "base.yaml",
            "service:\n  port: 8080\nqueue:\n  tasks_maxsize: 10\n",
        ),
        (
            "dev.yaml",
            "queue:\n  tasks_maxsize: 25\n  results_maxsize: 50\n",
        ),
    ]);

    let config: GatewayConfig = load_config_from(root.path(), Environment::Dev).unwrap();

    assert_eq!(config.service.port, 8080);
    assert_eq!(config.queue.tasks_maxsize, 25);
    assert_eq!(config.queue.results_maxsize, 50);
    // Untouched values fall back to their defaults.
    assert_eq!(config.queue.put_timeout_ms, 2000);
}

#[test]
fn defaults_fill_missing_sections() {
    let root = write_configuration(&[
        ("base.yaml", "service:\n  port: 9090\n"),
        ("prod.yaml", "service:\n  host: 127.0.0.1\n"),
    ]);

    let config: GatewayConfig = load_config_from(root.path(), Environment::Prod).unwrap();

    assert_eq!(config.service.address(), "127.0.0.1:9090");
    assert_eq!(config.redis.host, "127.0.0.1");
    assert_eq!(config.redis.task_queue_key, "inventory:tasks");
    assert!(config.validate().is_ok());
}

#[test]
fn missing_environment_file_is_an_error() {
    let root = write_configuration(&[("base.yaml", "service:\n  port: 8080\n")]);

    let error = load_config_from::<GatewayConfig>(root.path(), Environment::Staging).unwrap_err();
    assert!(matches!(
        error,
        LoadConfigError::ConfigurationFileMissing { .. }
    ));
}

#[test]
fn missing_configuration_directory_is_an_error() {
    let root = TempDir::new().unwrap();

    let error = load_config_from::<GatewayConfig>(root.path(), Environment::Dev).unwrap_err();
    assert!(matches!(
        error,
        LoadConfigError::MissingConfigurationDirectory(_)
    ));
}
