//! Configuration loader.
//!
//! 配置加载器。
//!
//! Pure data loading: read the file, parse the TOML, hand back the
//! config. Defaults for missing sections come from `CoreConfig`'s serde
//! attributes, not from logic here, and nothing is validated. Accept
//! whatever is in the file.

use std::path::Path;

use anyhow::Context;

use hn_core::config::CoreConfig;

/// Load configuration from a TOML file.
///
/// 从 TOML 文件加载配置。
pub fn load_config(path: &Path) -> anyhow::Result<CoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    CoreConfig::from_toml_str(&content).context("Failed to parse config as TOML")
}

/// Like [`load_config`], but a missing file is the default configuration.
/// Shells that ship without a config file boot on defaults; any other
/// read or parse problem still fails.
pub fn load_config_or_default(path: &Path) -> anyhow::Result<CoreConfig> {
    if !path.exists() {
        return Ok(CoreConfig::default());
    }
    load_config(path)
}
