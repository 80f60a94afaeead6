use anyhow::{Context, Result};
use std::path::PathBuf;

/// Root directory for HomeNet data on desktop hosts.
///
/// HomeNet 桌面端数据根目录。
///
/// - macOS: ~/Library/Application Support/HomeNet
/// - Windows: %APPDATA%\HomeNet
/// - Linux: $XDG_DATA_HOME/HomeNet or ~/.local/share/HomeNet
///
/// On phones the shell passes its sandbox path in directly and never
/// calls this. Nothing is created here; callers make the directory when
/// they first write.
pub fn app_data_dir() -> Result<PathBuf> {
    let base = platform_data_root().context("no usable platform data directory")?;
    Ok(base.join("HomeNet"))
}

/// 默认配置文件路径
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("homenet.toml"))
}

/// `XDG_DATA_HOME` wins when set, so tests and packaging can relocate the
/// whole tree; otherwise whatever the OS calls its data directory.
fn platform_data_root() -> Result<PathBuf> {
    if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg_data_home));
    }
    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("platform data directory unavailable"))
}
