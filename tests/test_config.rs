use std::time::Duration;

use servus::config::{CONFIG_ENV, Config, DEFAULT_LISTEN_ADDR, LISTEN_ENV};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(cfg.initial_buffer_size, 8);
    // No timeouts unless configured.
    assert_eq!(cfg.read_timeout(), None);
    assert_eq!(cfg.write_timeout(), None);
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "listen_addr: 0.0.0.0:8080\nread_timeout_ms: 1500\ninitial_buffer_size: 64\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.read_timeout(), Some(Duration::from_millis(1500)));
    assert_eq!(cfg.write_timeout(), None);
    assert_eq!(cfg.initial_buffer_size, 64);
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml("write_timeout_ms: 250\n").unwrap();

    assert_eq!(cfg.listen_addr, DEFAULT_LISTEN_ADDR);
    assert_eq!(cfg.write_timeout(), Some(Duration::from_millis(250)));
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml("initial_buffer_size: 0\n").is_err());
}

#[test]
fn test_config_rejects_unknown_types() {
    assert!(Config::from_yaml("read_timeout_ms: soon\n").is_err());
}

#[test]
fn test_config_missing_file() {
    let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

// Environment handling lives in a single test so parallel tests never race
// on process-wide variables.
#[test]
fn test_config_load_from_environment() {
    let path = std::env::temp_dir().join(format!("servus-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "listen_addr: 127.0.0.1:9000\nread_timeout_ms: 10\n").unwrap();

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    assert_eq!(Config::load().unwrap(), Config::default());

    unsafe {
        std::env::set_var(CONFIG_ENV, &path);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    assert_eq!(cfg.read_timeout(), Some(Duration::from_millis(10)));

    unsafe {
        std::env::set_var(LISTEN_ENV, "0.0.0.0:3000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.read_timeout(), Some(Duration::from_millis(10)));

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    std::fs::remove_file(&path).unwrap();
}
