use crate::error::{CoberturaError, Result};
use crate::models::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

/// Degree-to-kilometre factor used by the scaled planar metric
pub const DEFAULT_KM_PER_DEGREE: f64 = 111.13;

/// Default number of rows in the shortfall ranking
pub const DEFAULT_SHORTFALL_LIMIT: usize = 15;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

impl<T: ToString> ConfigValue<T> {
    /// Display form paired with the winning source
    pub fn inspect(&self) -> (String, ConfigSource) {
        (self.value.to_string(), self.source)
    }
}

/// How nearest-provider distances are converted to kilometres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Degree-space Euclidean distance times `km_per_degree`
    Scaled,
    /// Great-circle distance
    Haversine,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Scaled => f.write_str("scaled"),
            MetricKind::Haversine => f.write_str("haversine"),
        }
    }
}

/// Coordinate repairs applied before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    MissingDecimalPoint,
    DecimalComma,
}

impl fmt::Display for RepairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairKind::MissingDecimalPoint => f.write_str("missing_decimal_point"),
            RepairKind::DecimalComma => f.write_str("decimal_comma"),
        }
    }
}

/// Layered configuration for Cobertura
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub bounding_box: ConfigValue<BoundingBox>,
    pub distance_metric: ConfigValue<MetricKind>,
    pub km_per_degree: ConfigValue<f64>,
    pub country: ConfigValue<String>,
    pub coordinate_repairs: ConfigValue<Vec<RepairKind>>,
    pub dev_key: ConfigValue<Option<String>>,
    pub shortfall_limit: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            bounding_box: ConfigValue::new(BoundingBox::argentina(), ConfigSource::Default),
            distance_metric: ConfigValue::new(MetricKind::Scaled, ConfigSource::Default),
            km_per_degree: ConfigValue::new(DEFAULT_KM_PER_DEGREE, ConfigSource::Default),
            country: ConfigValue::new("ARGENTINA".to_string(), ConfigSource::Default),
            coordinate_repairs: ConfigValue::new(Vec::new(), ConfigSource::Default),
            dev_key: ConfigValue::new(None, ConfigSource::Default),
            shortfall_limit: ConfigValue::new(DEFAULT_SHORTFALL_LIMIT, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| file_error(format!("Failed to read config file: {}", e)))?;

        let file_config: FileConfig = toml::from_str(&content)
            .map_err(|e| file_error(format!("Failed to parse TOML: {}", e)))?;

        if let Some(bbox) = file_config.bounding_box {
            if bbox.min_latitude > bbox.max_latitude || bbox.min_longitude > bbox.max_longitude {
                return Err(CoberturaError::ConfigInvalid {
                    key: "bounding_box".to_string(),
                    reason: "minimum exceeds maximum".to_string(),
                });
            }
            self.bounding_box.update(bbox, ConfigSource::File);
        }

        if let Some(metric) = file_config.distance_metric {
            self.distance_metric.update(metric, ConfigSource::File);
        }

        if let Some(km) = file_config.km_per_degree {
            let km = validate_km_per_degree(km)?;
            self.km_per_degree.update(km, ConfigSource::File);
        }

        if let Some(country) = file_config.country {
            self.country.update(country, ConfigSource::File);
        }

        if let Some(repairs) = file_config.coordinate_repairs {
            self.coordinate_repairs.update(repairs, ConfigSource::File);
        }

        if let Some(key) = file_config.dev_key {
            self.dev_key.update(Some(key), ConfigSource::File);
        }

        if let Some(limit) = file_config.shortfall_limit {
            self.shortfall_limit.update(limit, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        let source = ConfigSource::Environment;

        // COBERTURA_BBOX
        if let Ok(bbox_str) = env::var("COBERTURA_BBOX") {
            match BoundingBox::parse(&bbox_str) {
                Some(bbox) => self.bounding_box.update(bbox, source),
                None => tracing::warn!(
                    "Invalid COBERTURA_BBOX value '{}': expected min_lat,max_lat,min_lon,max_lon",
                    bbox_str
                ),
            }
        }

        // COBERTURA_DISTANCE_METRIC
        if let Ok(metric_str) = env::var("COBERTURA_DISTANCE_METRIC") {
            match parse_metric_kind(&metric_str) {
                Ok(metric) => self.distance_metric.update(metric, source),
                Err(_) => tracing::warn!(
                    "Invalid COBERTURA_DISTANCE_METRIC value '{}': expected scaled or haversine",
                    metric_str
                ),
            }
        }

        // COBERTURA_KM_PER_DEGREE
        if let Ok(km_str) = env::var("COBERTURA_KM_PER_DEGREE") {
            let km = km_str.trim().parse::<f64>().ok();
            match km.filter(|km| km.is_finite() && *km > 0.0) {
                Some(km) => self.km_per_degree.update(km, source),
                None => tracing::warn!(
                    "Invalid COBERTURA_KM_PER_DEGREE value '{}': expected a positive number",
                    km_str
                ),
            }
        }

        // COBERTURA_COUNTRY
        if let Ok(country) = env::var("COBERTURA_COUNTRY") {
            self.country.update(country, source);
        }

        // COBERTURA_REPAIRS
        if let Ok(repairs_str) = env::var("COBERTURA_REPAIRS") {
            match parse_repairs(&repairs_str) {
                Ok(repairs) => self.coordinate_repairs.update(repairs, source),
                Err(_) => tracing::warn!(
                    value = %repairs_str,
                    "Ignoring invalid COBERTURA_REPAIRS value"
                ),
            }
        }

        // COBERTURA_DEV_KEY
        if let Ok(key) = env::var("COBERTURA_DEV_KEY") {
            if !key.is_empty() {
                self.dev_key.update(Some(key), source);
            }
        }

        // COBERTURA_SHORTFALL_LIMIT
        if let Ok(limit_str) = env::var("COBERTURA_SHORTFALL_LIMIT") {
            match limit_str.trim().parse::<usize>() {
                Ok(limit) => self.shortfall_limit.update(limit, source),
                Err(_) => tracing::warn!(
                    "Invalid COBERTURA_SHORTFALL_LIMIT value '{}': expected a non-negative integer",
                    limit_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(metric) = overrides.distance_metric {
            self.distance_metric.update(metric, ConfigSource::Cli);
        }

        if let Some(country) = overrides.country {
            self.country.update(country, ConfigSource::Cli);
        }

        if let Some(repairs) = overrides.coordinate_repairs {
            self.coordinate_repairs.update(repairs, ConfigSource::Cli);
        }

        if let Some(key) = overrides.dev_key {
            self.dev_key.update(Some(key), ConfigSource::Cli);
        }

        if let Some(limit) = overrides.shortfall_limit {
            self.shortfall_limit.update(limit, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection. The developer key is masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("bounding_box".to_string(), self.bounding_box.inspect());
        map.insert(
            "distance_metric".to_string(),
            self.distance_metric.inspect(),
        );
        map.insert("km_per_degree".to_string(), self.km_per_degree.inspect());
        map.insert("country".to_string(), self.country.inspect());

        let repairs = self
            .coordinate_repairs
            .value
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let repairs = if repairs.is_empty() {
            "none".to_string()
        } else {
            repairs
        };
        map.insert(
            "coordinate_repairs".to_string(),
            (repairs, self.coordinate_repairs.source),
        );

        let dev_key = if self.dev_key.value.is_some() {
            "set"
        } else {
            "unset"
        };
        map.insert(
            "dev_key".to_string(),
            (dev_key.to_string(), self.dev_key.source),
        );

        map.insert(
            "shortfall_limit".to_string(),
            self.shortfall_limit.inspect(),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    bounding_box: Option<BoundingBox>,
    distance_metric: Option<MetricKind>,
    km_per_degree: Option<f64>,
    country: Option<String>,
    coordinate_repairs: Option<Vec<RepairKind>>,
    dev_key: Option<String>,
    shortfall_limit: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub distance_metric: Option<MetricKind>,
    pub country: Option<String>,
    pub coordinate_repairs: Option<Vec<RepairKind>>,
    pub dev_key: Option<String>,
    pub shortfall_limit: Option<usize>,
}

/// Parse distance metric from string
pub fn parse_metric_kind(s: &str) -> Result<MetricKind> {
    match s.trim().to_lowercase().as_str() {
        "scaled" | "euclidean" | "planar" => Ok(MetricKind::Scaled),
        "haversine" | "geodesic" => Ok(MetricKind::Haversine),
        _ => Err(CoberturaError::ConfigInvalid {
            key: "distance_metric".to_string(),
            reason: format!("Invalid distance metric: {}. Use scaled or haversine", s),
        }),
    }
}

/// Parse a single repair name
pub fn parse_repair_kind(s: &str) -> Result<RepairKind> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "missing_decimal_point" => Ok(RepairKind::MissingDecimalPoint),
        "decimal_comma" => Ok(RepairKind::DecimalComma),
        _ => Err(CoberturaError::ConfigInvalid {
            key: "coordinate_repairs".to_string(),
            reason: format!(
                "Invalid repair: {}. Use missing_decimal_point or decimal_comma",
                s
            ),
        }),
    }
}

/// Parse a comma-separated repair list. An empty string means no repairs.
pub fn parse_repairs(s: &str) -> Result<Vec<RepairKind>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_repair_kind)
        .collect()
}

fn file_error(reason: String) -> CoberturaError {
    CoberturaError::ConfigInvalid {
        key: "file".to_string(),
        reason,
    }
}

fn validate_km_per_degree(km: f64) -> Result<f64> {
    if km.is_finite() && km > 0.0 {
        Ok(km)
    } else {
        Err(CoberturaError::ConfigInvalid {
            key: "km_per_degree".to_string(),
            reason: format!("must be a positive number, got {}", km),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.bounding_box.value, BoundingBox::argentina());
        assert_eq!(config.bounding_box.source, ConfigSource::Default);
        assert_eq!(config.distance_metric.value, MetricKind::Scaled);
        assert_eq!(config.km_per_degree.value, 111.13);
        assert_eq!(config.country.value, "ARGENTINA");
        assert!(config.coordinate_repairs.value.is_empty());
        assert!(config.dev_key.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
distance_metric = "haversine"
km_per_degree = 111.32
country = "Uruguay"
coordinate_repairs = ["missing_decimal_point"]
dev_key = "s3cret"
shortfall_limit = 5

[bounding_box]
min_latitude = -35.0
max_latitude = -30.0
min_longitude = -59.0
max_longitude = -53.0
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults()
            .load_from_file(file.path())
            .unwrap();

        assert_eq!(config.distance_metric.value, MetricKind::Haversine);
        assert_eq!(config.distance_metric.source, ConfigSource::File);
        assert_eq!(config.km_per_degree.value, 111.32);
        assert_eq!(config.country.value, "Uruguay");
        assert_eq!(
            config.coordinate_repairs.value,
            vec![RepairKind::MissingDecimalPoint]
        );
        assert_eq!(config.dev_key.value.as_deref(), Some("s3cret"));
        assert_eq!(config.shortfall_limit.value, 5);
        assert_eq!(
            config.bounding_box.value,
            BoundingBox::new(-35.0, -30.0, -59.0, -53.0)
        );
    }

    #[test]
    fn test_file_rejects_inverted_bbox() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[bounding_box]
min_latitude = -21.0
max_latitude = -56.0
min_longitude = -74.0
max_longitude = -53.0
"#
        )
        .unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(CoberturaError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_file_rejects_non_positive_scale() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "km_per_degree = 0.0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            distance_metric: Some(MetricKind::Haversine),
            country: Some("CHILE".to_string()),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.distance_metric.value, MetricKind::Haversine);
        assert_eq!(config.distance_metric.source, ConfigSource::Cli);
        assert_eq!(config.country.value, "CHILE");
        // These should still be defaults
        assert_eq!(config.bounding_box.source, ConfigSource::Default);
        assert_eq!(config.dev_key.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_metric_kind() {
        assert_eq!(parse_metric_kind("scaled").unwrap(), MetricKind::Scaled);
        assert_eq!(
            parse_metric_kind("HAVERSINE").unwrap(),
            MetricKind::Haversine
        );
        assert!(parse_metric_kind("manhattan").is_err());
    }

    #[test]
    fn test_parse_repairs() {
        assert_eq!(
            parse_repairs("missing-decimal-point, decimal_comma").unwrap(),
            vec![RepairKind::MissingDecimalPoint, RepairKind::DecimalComma]
        );
        assert!(parse_repairs("").unwrap().is_empty());
        assert!(parse_repairs("guess").is_err());
    }

    #[test]
    fn test_inspection_map_masks_dev_key() {
        let mut config = LayeredConfig::with_defaults();
        let key = Some("hunter2".to_string());
        config.dev_key.update(key, ConfigSource::Cli);
        let map = config.to_inspection_map();

        let (dev_key, source) = &map["dev_key"];
        assert_eq!(dev_key, "set");
        assert_eq!(*source, ConfigSource::Cli);
        assert!(map.values().all(|(v, _)| !v.contains("hunter2")));
        assert_eq!(map["coordinate_repairs"].0, "none");
    }
}
