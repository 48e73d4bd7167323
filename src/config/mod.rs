pub mod init;
mod schema;

pub use schema::{ColorMode, Config, DisplayConfig, FormDefaults, ThemeMode};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Most decimals a percentage may be shown with.
pub const MAX_PRECISION: usize = 6;

/// Get the config directory path (~/.config/nu-aggregate/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("nu-aggregate"))
}

/// Get the default config file path (~/.config/nu-aggregate/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

fn check_total(errors: &mut Vec<String>, key: &str, value: Option<f64>) {
    if let Some(total) = value {
        if !total.is_finite() || total <= 0.0 {
            errors.push(format!("{}: must be a positive number (got {})", key, total));
        }
    }
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref defaults) = config.defaults {
        check_total(&mut errors, "defaults.matric_total", defaults.matric_total);
        check_total(&mut errors, "defaults.inter_total", defaults.inter_total);
        check_total(&mut errors, "defaults.test_total", defaults.test_total);
    }

    if let Some(ref display) = config.display {
        if let Some(precision) = display.precision {
            if precision > MAX_PRECISION {
                errors.push(format!(
                    "display.precision: must be at most {} (got {})",
                    MAX_PRECISION, precision
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
