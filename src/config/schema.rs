use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;

use crate::estimate::{validate, FieldError, InputSpec, RawInput};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Main configuration file.
///
/// Example YAML:
/// ```yaml
/// theme: auto
/// server:
///   bind: "127.0.0.1:8080"
/// defaults:
///   shippingMethod: Express
///   distance: 250
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// TUI color theme
    #[serde(default)]
    pub theme: ThemeMode,

    #[serde(default)]
    pub server: ServerConfig,

    /// Initial form values; any subset of the ten input fields.
    /// Missing fields fall back to the built-in form defaults.
    #[serde(default)]
    pub defaults: RawInput,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ThemeMode::Auto),
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => anyhow::bail!("unknown theme '{}', expected auto, dark or light", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Config {
    /// Configured defaults layered over the built-in form defaults.
    pub fn merged_defaults(&self) -> RawInput {
        self.defaults
            .clone()
            .or(&RawInput::from(&InputSpec::FORM_DEFAULTS))
    }

    /// The form's starting values.
    pub fn default_input(&self) -> Result<InputSpec, Vec<FieldError>> {
        validate(&self.merged_defaults())
    }

    /// Validate configuration at startup.
    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(field_errors) = self.default_input() {
            for e in field_errors {
                errors.push(format!("defaults.{}", e));
            }
        }

        if let Err(e) = self.server.bind.parse::<SocketAddr>() {
            errors.push(format!(
                "server.bind: invalid address '{}' - {}",
                self.server.bind, e
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::ShippingMethod;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeMode::Auto);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.defaults, RawInput::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.default_input().unwrap(), InputSpec::default());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
theme: light
server:
  bind: "0.0.0.0:9000"
defaults:
  shippingMethod: Express
  distance: 250
  warehouseProximity: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.server.bind, "0.0.0.0:9000");

        let input = config.default_input().unwrap();
        assert_eq!(input.shipping_method, ShippingMethod::Express);
        assert_eq!(input.distance.km(), 250);
        assert!(!input.warehouse_proximity);
        // Untouched fields keep form defaults
        assert_eq!(input.package_weight.kg(), 5.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "queries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.theme = ThemeMode::Dark;
        config.defaults.weather = Some("Rainy".to_string());
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = Config::default();
        config.defaults.shipping_method = Some("Teleport".to_string()); // Error 1
        config.defaults.distance = Some(0.0); // Error 2
        config.server.bind = "not an address".to_string(); // Error 3
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("defaults.shippingMethod:"));
        assert!(errors[1].starts_with("defaults.distance:"));
        assert!(errors[2].starts_with("server.bind:"));
    }

    #[test]
    fn test_theme_mode_from_str() {
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(" auto ".parse::<ThemeMode>().unwrap(), ThemeMode::Auto);
        assert!("neon".parse::<ThemeMode>().is_err());
    }
}
