//! Configuration loading and validation for stockscan.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the user's configuration directory
//!    (`~/.config/stockscan/` on Linux), if it exists,
//! 3. an explicitly given file (TOML, YAML or JSON, by extension),
//! 4. `STOCKSCAN_` environment variables, with `__` separating nested keys
//!    (`STOCKSCAN_SCANNER__STRATEGY=heuristic`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stockscan_form::Fields;
use stockscan_scanner::{ScannerConfig, Strategy};

/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "STOCKSCAN_";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub lookup: LookupConfig,
    pub table: TableConfig,
    pub log: LogConfig,
}

/// Where the lookup strategy sends its queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the ERP site, e.g. `https://erp.example.com`.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}
impl LookupConfig {
    /// API key and secret, when both are set.
    pub fn token(&self) -> Option<(&str, &str)> {
        Some((self.api_key.as_deref()?, self.api_secret.as_deref()?))
    }
}

/// Shape of the item table the command-line tool works on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Values written into every newly appended row, before the scan's own.
    pub defaults: Fields,
    /// Columns beyond the bound scanner fields.
    pub extra_fields: Vec<String>,
}
impl TableConfig {
    /// Every column of the table: the scanner's bound fields, the extra
    /// fields, and any field with a default.
    pub fn schema(&self, scanner: &ScannerConfig) -> Vec<String> {
        let mut schema: Vec<String> = scanner.fields.names().iter().map(|name| name.to_string()).collect();
        for name in self.extra_fields.iter().chain(self.defaults.keys()) {
            if !schema.contains(name) {
                schema.push(name.clone());
            }
        }
        schema
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Config {
    /// Loads and validates the configuration from every source.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(user_config_path(), explicit)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Layers the configuration sources without extracting them.
    ///
    /// `user` is only read if it exists; `explicit` must exist.
    pub fn figment(user: Option<PathBuf>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = user.filter(|path| path.is_file()) {
            tracing::debug!(path = %path.display(), "Reading user configuration");
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Reading configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn validate(&self) -> Result<()> {
        let scanner = &self.scanner;
        let bound = [scanner.scan_field.as_str(), scanner.warehouse_field.as_str(), scanner.table.as_str()];
        if bound.into_iter().chain(scanner.fields.names()).any(|name| name.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("field names must not be empty"));
        }
        if scanner.rules.prefix_length == 0 {
            exn::bail!(ErrorKind::Invalid("prefix_length must be greater than zero"));
        }
        if scanner.rules.min_length < scanner.rules.prefix_length {
            exn::bail!(ErrorKind::Invalid("min_length must not be less than prefix_length"));
        }
        if scanner.strategy == Strategy::Lookup {
            if scanner.lookup_method.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid("lookup strategy requires a lookup method"));
            }
            if scanner.lookup_timeout_ms == 0 {
                exn::bail!(ErrorKind::Invalid("lookup timeout must be greater than zero"));
            }
        }
        if self.lookup.api_key.is_some() != self.lookup.api_secret.is_some() {
            exn::bail!(ErrorKind::Invalid("api_key and api_secret must be set together"));
        }
        Ok(())
    }
}

/// `config.toml` in the platform configuration directory, if there is one.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "stockscan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use serde_json::json;

    fn extract(user: Option<PathBuf>, explicit: Option<&Path>) -> figment::error::Result<Config> {
        Config::figment(user, explicit).map_err(|err| figment::Error::from((*err).to_string()))?.extract()
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = extract(None, None)?;
            assert_eq!(config, Config::default());
            assert_eq!(config.log.level, "info");
            assert_eq!(config.scanner.strategy, Strategy::Lookup);
            assert!(config.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "user.toml",
                r#"
                [scanner]
                strategy = "heuristic"
                item_tag = "ZZ"

                [log]
                level = "debug"
                "#,
            )?;
            jail.create_file(
                "explicit.yaml",
                "scanner:\n  item_tag: YY\n  fields:\n    qty: picked_qty\nlookup:\n  base_url: https://erp.example.com\n",
            )?;
            jail.set_env("STOCKSCAN_SCANNER__SCAN_FIELD", "barcode_input");
            jail.set_env("STOCKSCAN_LOG__LEVEL", "warn");

            let config = extract(Some(jail.directory().join("user.toml")), Some(Path::new("explicit.yaml")))?;
            assert_eq!(config.scanner.strategy, Strategy::Heuristic);
            assert_eq!(config.scanner.item_tag, "YY");
            assert_eq!(config.scanner.fields.qty, "picked_qty");
            assert_eq!(config.scanner.fields.item_code, "item_code");
            assert_eq!(config.scanner.scan_field, "barcode_input");
            assert_eq!(config.lookup.base_url.as_deref(), Some("https://erp.example.com"));
            assert_eq!(config.log.level, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_missing_user_file_is_skipped() {
        Jail::expect_with(|jail| {
            let config = extract(Some(jail.directory().join("absent.toml")), None)?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::figment(None, Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "strategy=heuristic").unwrap();
        let err = Config::figment(None, Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(path));
    }

    #[test]
    fn test_json_table_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"table":{"defaults":{"uom":"Nos"},"extra_fields":["rate","uom"]}}"#).unwrap();
        let config: Config = Config::figment(None, Some(&path)).unwrap().extract().unwrap();
        assert_eq!(config.table.defaults.get("uom"), Some(&json!("Nos")));
        let schema = config.table.schema(&config.scanner);
        assert_eq!(schema.len(), 8);
        assert!(schema.iter().any(|name| name == "rate"));
    }

    #[rstest]
    #[case::empty_field(|c: &mut Config| c.scanner.fields.serial_no = " ".to_string())]
    #[case::empty_scan_field(|c: &mut Config| c.scanner.scan_field.clear())]
    #[case::zero_prefix(|c: &mut Config| c.scanner.rules.prefix_length = 0)]
    #[case::min_below_prefix(|c: &mut Config| c.scanner.rules.min_length = 4)]
    #[case::no_method(|c: &mut Config| c.scanner.lookup_method.clear())]
    #[case::no_timeout(|c: &mut Config| c.scanner.lookup_timeout_ms = 0)]
    #[case::half_token(|c: &mut Config| c.lookup.api_key = Some("key".to_string()))]
    fn test_validation_rejects(#[case] change: fn(&mut Config)) {
        let mut config = Config::default();
        change(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_heuristic_does_not_need_a_method() {
        let mut config = Config::default();
        config.scanner.strategy = Strategy::Heuristic;
        config.scanner.lookup_method.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_needs_both_parts() {
        let mut lookup = LookupConfig { api_key: Some("key".to_string()), ..LookupConfig::default() };
        assert_eq!(lookup.token(), None);
        lookup.api_secret = Some("secret".to_string());
        assert_eq!(lookup.token(), Some(("key", "secret")));
    }
}
