//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use cobertura_core::config::{
    CliConfigOverrides, ConfigSource, LayeredConfig, MetricKind, RepairKind,
};
use cobertura_core::models::BoundingBox;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 7] = [
    "COBERTURA_BBOX",
    "COBERTURA_DISTANCE_METRIC",
    "COBERTURA_KM_PER_DEGREE",
    "COBERTURA_COUNTRY",
    "COBERTURA_REPAIRS",
    "COBERTURA_DEV_KEY",
    "COBERTURA_SHORTFALL_LIMIT",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
country = "ARGENTINA"
# Only override the metric, leave others as defaults
distance_metric = "haversine"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    assert_eq!(config.distance_metric.value, MetricKind::Haversine);
    assert_eq!(config.distance_metric.source, ConfigSource::File);
    assert_eq!(config.bounding_box.value, BoundingBox::argentina());
    assert_eq!(config.bounding_box.source, ConfigSource::Default);
    assert_eq!(config.km_per_degree.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/cobertura.toml");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("COBERTURA_BBOX", "-40,-30,-70,-55");
    env::set_var("COBERTURA_DISTANCE_METRIC", "haversine");
    env::set_var("COBERTURA_REPAIRS", "missing_decimal_point,decimal_comma");
    env::set_var("COBERTURA_SHORTFALL_LIMIT", "3");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
distance_metric = "scaled"
shortfall_limit = 10
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(
        config.bounding_box.value,
        BoundingBox::new(-40.0, -30.0, -70.0, -55.0)
    );
    assert_eq!(config.bounding_box.source, ConfigSource::Environment);
    assert_eq!(config.distance_metric.value, MetricKind::Haversine);
    assert_eq!(config.distance_metric.source, ConfigSource::Environment);
    assert_eq!(
        config.coordinate_repairs.value,
        vec![RepairKind::MissingDecimalPoint, RepairKind::DecimalComma]
    );
    assert_eq!(config.shortfall_limit.value, 3);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("COBERTURA_BBOX", "not-a-box");
    env::set_var("COBERTURA_KM_PER_DEGREE", "-5");
    env::set_var("COBERTURA_DISTANCE_METRIC", "manhattan");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.bounding_box.source, ConfigSource::Default);
    assert_eq!(config.km_per_degree.value, 111.13);
    assert_eq!(config.distance_metric.value, MetricKind::Scaled);

    clear_env();
}

#[test]
#[serial]
fn test_dev_key_from_environment() {
    clear_env();
    env::set_var("COBERTURA_DEV_KEY", "from-env");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.dev_key.value.as_deref(), Some("from-env"));
    assert_eq!(config.dev_key.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("COBERTURA_COUNTRY", "URUGUAY");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "country = \"CHILE\"").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // At this point, environment should have overridden file
    assert_eq!(config.country.value, "URUGUAY");
    assert_eq!(config.country.source, ConfigSource::Environment);

    // Now CLI should override environment
    config.update_from_cli(CliConfigOverrides {
        country: Some("ARGENTINA".to_string()),
        ..Default::default()
    });

    assert_eq!(config.country.value, "ARGENTINA");
    assert_eq!(config.country.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}
