use crate::error::{ExportError, ExportResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Default value functions for serde
fn default_latitude_keys() -> Vec<String> {
    vec!["y".to_string(), "lat".to_string()]
}

fn default_longitude_keys() -> Vec<String> {
    vec!["x".to_string(), "lon".to_string()]
}

fn default_security_cost_factor() -> f64 {
    1.0
}

/// How a coordinate alias list is resolved when the primary key holds a zero-like value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFallback {
    /// First alias present on the node wins, whatever its value.
    /// A node with `y = 0.0` and `lat = 25.0` exports latitude 0.0.
    #[default]
    Presence,
    /// Logical-OR chain: an alias holding `false`, zero or `""` is skipped in
    /// favour of the next one. The last alias is taken as-is when present.
    /// A node with `y = 0.0` and `lat = 25.0` exports latitude 25.0.
    Falsy,
}

impl FromStr for CoordinateFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "presence" => Ok(CoordinateFallback::Presence),
            "falsy" => Ok(CoordinateFallback::Falsy),
            other => Err(format!(
                "unknown coordinate fallback '{other}', expected 'presence' or 'falsy'"
            )),
        }
    }
}

impl fmt::Display for CoordinateFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateFallback::Presence => write!(f, "presence"),
            CoordinateFallback::Falsy => write!(f, "falsy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Resolution policy for the coordinate alias lists
    #[serde(default)]
    pub coordinate_fallback: CoordinateFallback,
    /// Node attributes tried for latitude, in precedence order
    #[serde(default = "default_latitude_keys")]
    pub latitude_keys: Vec<String>,
    /// Node attributes tried for longitude, in precedence order
    #[serde(default = "default_longitude_keys")]
    pub longitude_keys: Vec<String>,
    /// Edge length used when `length` is absent
    #[serde(default)]
    pub default_length: f64,
    /// Edge cost factor used when `security_cost_factor` is absent
    #[serde(default = "default_security_cost_factor")]
    pub default_security_cost_factor: f64,
    /// Camera count used when `covered_by_cameras` is absent
    #[serde(default)]
    pub default_covered_by_cameras: i64,
    /// Fill attributes missing on an element from the `<default>` of their GraphML key
    #[serde(default)]
    pub apply_key_defaults: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            coordinate_fallback: CoordinateFallback::Presence,
            latitude_keys: default_latitude_keys(),
            longitude_keys: default_longitude_keys(),
            default_length: 0.0,
            default_security_cost_factor: default_security_cost_factor(),
            default_covered_by_cameras: 0,
            apply_key_defaults: false,
        }
    }
}

impl ExportConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ExportConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default, reporting which one is in use
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => match Self::load_from_file(p) {
                Ok(config) => {
                    println!("📋 Loaded config from: {}", p);
                    config
                }
                Err(e) => {
                    eprintln!("⚠️  Failed to load config from {}, using defaults: {}", p, e);
                    Self::default()
                }
            },
            None => {
                println!("📋 Using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ExportResult<()> {
        if self.latitude_keys.is_empty() {
            return Err(ExportError::Config(
                "latitude_keys must name at least one attribute".to_string(),
            ));
        }
        if self.longitude_keys.is_empty() {
            return Err(ExportError::Config(
                "longitude_keys must name at least one attribute".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: ExportConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = "coordinate_fallback: falsy\nlatitude_keys: [lat]\ndefault_security_cost_factor: 1.5\n";
        let config: ExportConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.coordinate_fallback, CoordinateFallback::Falsy);
        assert_eq!(config.latitude_keys, vec!["lat".to_string()]);
        assert_eq!(config.longitude_keys, vec!["x".to_string(), "lon".to_string()]);
        assert_eq!(config.default_security_cost_factor, 1.5);
        assert_eq!(config.default_covered_by_cameras, 0);
    }

    #[test]
    fn test_empty_alias_list_rejected() {
        let config = ExportConfig {
            longitude_keys: vec![],
            ..ExportConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));
    }

    #[test]
    fn test_fallback_from_str() {
        assert_eq!("Falsy".parse::<CoordinateFallback>(), Ok(CoordinateFallback::Falsy));
        assert_eq!(" presence ".parse::<CoordinateFallback>(), Ok(CoordinateFallback::Presence));
        assert!("or".parse::<CoordinateFallback>().is_err());
    }

    #[test]
    fn test_invalid_config_file_falls_back() {
        let dir = std::env::temp_dir().join("roadnet_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty_aliases.yaml");
        std::fs::write(&path, "latitude_keys: []\n").unwrap();
        let path = path.to_str().unwrap();

        assert!(ExportConfig::load_from_file(path).is_err());
        assert_eq!(ExportConfig::load_with_fallback(Some(path)), ExportConfig::default());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_config_file_falls_back() {
        let config = ExportConfig::load_with_fallback(Some("/nonexistent/roadnet.yaml"));
        assert_eq!(config, ExportConfig::default());
    }
}
