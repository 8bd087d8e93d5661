use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entry::EntryId;
use crate::shop::SeedItem;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub shop: ShopConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ShopConfig {
    pub currency: String,
    pub seed: Vec<SeedItem>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub currency: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shop: ShopConfig { currency: "USD".to_string(), seed: default_seed() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn default_seed() -> Vec<SeedItem> {
    [
        ("Teddy bear", Decimal::new(2500, 2), 3),
        ("Yo-yo", Decimal::new(450, 2), 10),
        ("Kite", Decimal::new(1200, 2), 2),
        ("Wind-up robot", Decimal::new(4500, 2), 1),
        ("Bag of marbles", Decimal::new(300, 2), 5),
    ]
    .into_iter()
    .map(|(name, price, stock)| SeedItem { id: None, name: name.to_string(), price, stock })
    .collect()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Layers defaults, the config file, `TOYSHOP_*` environment variables and
    /// explicit overrides, in that order, then validates the result.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match locate_config_file(options.config_path.as_deref()) {
            Some(path) => ConfigPatch::from_file(&path)?.merge_into(&mut config),
            None if options.require_file => {
                let expected = options.config_path.unwrap_or_else(|| PathBuf::from("toyshop.toml"));
                return Err(ConfigError::MissingConfigFile(expected));
            }
            None => {}
        }

        config.merge_env()?;
        options.overrides.merge_into(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn merge_env(&mut self) -> Result<(), ConfigError> {
        replace(&mut self.shop.currency, read_env(&["TOYSHOP_SHOP_CURRENCY"]));
        replace(&mut self.logging.level, read_env(&["TOYSHOP_LOGGING_LEVEL", "TOYSHOP_LOG_LEVEL"]));
        if let Some(format) = read_env(&["TOYSHOP_LOGGING_FORMAT", "TOYSHOP_LOG_FORMAT"]) {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shop(&self.shop)?;
        validate_logging(&self.logging)
    }
}

impl ConfigOverrides {
    fn merge_into(self, config: &mut AppConfig) {
        replace(&mut config.shop.currency, self.currency);
        replace(&mut config.logging.level, self.log_level);
        replace(&mut config.logging.format, self.log_format);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn locate_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    match explicit_path {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => ["toyshop.toml", "config/toyshop.toml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists()),
    }
}

/// Replaces every `${NAME}` with the value of environment variable `NAME`.
fn expand_env_refs(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn validate_shop(shop: &ShopConfig) -> Result<(), ConfigError> {
    if shop.currency.trim().is_empty() {
        return Err(ConfigError::Validation("shop.currency must not be empty".to_string()));
    }

    // Mirrors the store's id counter so implicit ids are checked too.
    let mut taken = HashSet::new();
    let mut next_auto = 0u32;
    for (index, item) in shop.seed.iter().enumerate() {
        let invalid = |reason: String| ConfigError::Validation(format!("shop.seed[{index}] {reason}"));

        if item.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if item.price < Decimal::ZERO {
            return Err(invalid(format!("price must not be negative (got {})", item.price)));
        }
        if item.price.checked_mul(Decimal::from(item.stock)).is_none() {
            return Err(invalid("price * stock does not fit a decimal amount".to_string()));
        }

        let id = item.id.unwrap_or(EntryId(next_auto));
        if !taken.insert(id) {
            return Err(invalid(format!("resolves to id {id}, already used by an earlier item")));
        }
        next_auto = next_auto.max(id.0.saturating_add(1));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    match logging.level.trim().to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// First non-blank value among `keys`.
fn read_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok().filter(|value| !value.trim().is_empty()))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    #[serde(default)]
    shop: ShopPatch,
    #[serde(default)]
    logging: LoggingPatch,
}

#[derive(Debug, Default, Deserialize)]
struct ShopPatch {
    currency: Option<String>,
    seed: Option<Vec<SeedItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl ConfigPatch {
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        toml::from_str(&expand_env_refs(&raw)?)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
    }

    fn merge_into(self, config: &mut AppConfig) {
        replace(&mut config.shop.currency, self.shop.currency);
        replace(&mut config.shop.seed, self.shop.seed);
        replace(&mut config.logging.level, self.logging.level);
        replace(&mut config.logging.format, self.logging.format);
    }
}
