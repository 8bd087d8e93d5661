use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use toyshop_core::config::AppConfig;

pub fn run(config: &AppConfig, config_path: Option<&Path>) -> String {
    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "shop.currency",
        &config.shop.currency,
        source("shop.currency", &["TOYSHOP_SHOP_CURRENCY"]),
    ));
    lines.push(render_line(
        "shop.seed",
        &format!("{} item(s)", config.shop.seed.len()),
        source("shop.seed", &[]),
    ));
    for item in &config.shop.seed {
        let id = item.id.map(|id| id.to_string()).unwrap_or_else(|| "auto".to_string());
        lines.push(format!("    - {} @ {} x {} (id: {id})", item.name, item.price, item.stock));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["TOYSHOP_LOGGING_LEVEL", "TOYSHOP_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["TOYSHOP_LOGGING_FORMAT", "TOYSHOP_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("toyshop.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/toyshop.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
