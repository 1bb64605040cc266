//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use servo_joints::config::AppConfig;
use servo_joints::input::InputScript;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SERVO_VEHICLE__ENGINE_TORQUE", "750.0");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.vehicle.engine_torque, 750.0);
    std::env::remove_var("SERVO_VEHICLE__ENGINE_TORQUE");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("SERVO_VEHICLE__ENGINE_TORQUE");

    let config = AppConfig::load().unwrap();
    assert_eq!(config.physics.gravity, -10.0);
    assert_eq!(config.scene.lumber_yards.len(), 2);
    assert!(config.demo.steps > 0);
}

#[test]
#[serial]
fn test_default_script_parses() {
    let config = AppConfig::load().unwrap();
    let script = InputScript::parse(&config.demo.script).unwrap();
    assert_eq!(script.len(), config.demo.script.len());
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("no_such_config_dir").unwrap();
    assert_eq!(config.vehicle.spawn_height, 1.5);
    assert_eq!(config.debug.log_level, "info");
}
