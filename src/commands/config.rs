use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

/// Look up a dot-separated key such as `picker.hide_seconds`.
pub fn lookup(config: &Config, key: &str) -> Result<serde_json::Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }
    Ok(current.clone())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(config, key)? {
        serde_json::Value::String(s) => println!("{}", s),
        serde_json::Value::Null => println!("(unset)"),
        v => println!("{}", v),
    }
    Ok(())
}

/// Parse a command-line value into the TOML type it most likely means.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    toml::Value::String(raw.to_string())
}

/// Set a dot-separated key in the config file at `path`.
///
/// The file is rewritten through `toml`, so comments are not preserved. The
/// result must still load and validate, otherwise nothing is written.
pub fn set_in_path(path: &Path, key: &str, value: &str) -> Result<Config> {
    let mut root = if path.exists() {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        content
            .parse::<toml::Table>()
            .context("Failed to parse config file")?
    } else {
        toml::Table::new()
    };

    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("Empty config key");
    };

    let mut table = &mut root;
    for section in sections {
        table = table
            .entry(section.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()))
            .as_table_mut()
            .with_context(|| format!("'{}' is not a section", section))?;
    }
    table.insert(leaf.to_string(), parse_value(value));

    let updated: Config = toml::Value::Table(root)
        .try_into()
        .with_context(|| format!("Invalid value for {}: {}", key, value))?;
    updated.validate()?;

    // Reject keys the config does not know about
    lookup(&updated, key)?;

    config::save_to_path(&updated, path)?;
    Ok(updated)
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let path = config::config_path()?;
    set_in_path(&path, key, value)?;
    println!("✓ {} = {}", key, value);
    Ok(())
}
