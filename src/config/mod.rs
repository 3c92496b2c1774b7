use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration (stored in ~/.config/sdd-hub/)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Host process the hub talks to
    #[serde(default)]
    pub host: HostConfig,

    /// Log level and location
    #[serde(default)]
    pub logging: LoggingConfig,

    /// UI theme/colors
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// How to start the host process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Executable name or path, resolved through PATH
    #[serde(default = "default_host_command")]
    pub command: String,

    /// Extra arguments passed to the host
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            command: default_host_command(),
            args: vec![],
        }
    }
}

fn default_host_command() -> String {
    "sdd-host".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by SDD_HUB_LOG
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files; defaults to the data directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Theme configuration with hex colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Border color for selected elements (hex, e.g. "#FFFF00")
    #[serde(default = "default_color_selected")]
    pub color_selected: String,

    /// Border color for normal/unselected elements
    #[serde(default = "default_color_normal")]
    pub color_normal: String,

    /// Color for dimmed/inactive text and disabled options
    #[serde(default = "default_color_dimmed")]
    pub color_dimmed: String,

    /// Text color for titles
    #[serde(default = "default_color_text")]
    pub color_text: String,

    /// Color for success banners and healthy status
    #[serde(default = "default_color_ok")]
    pub color_ok: String,

    /// Color for warnings
    #[serde(default = "default_color_warning")]
    pub color_warning: String,

    /// Color for errors and failed results
    #[serde(default = "default_color_error")]
    pub color_error: String,

    /// Color for popup borders
    #[serde(default = "default_color_popup_border")]
    pub color_popup_border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_selected: default_color_selected(),
            color_normal: default_color_normal(),
            color_dimmed: default_color_dimmed(),
            color_text: default_color_text(),
            color_ok: default_color_ok(),
            color_warning: default_color_warning(),
            color_error: default_color_error(),
            color_popup_border: default_color_popup_border(),
        }
    }
}

fn default_color_selected() -> String {
    "#ead49a".to_string() // Yellow
}

fn default_color_normal() -> String {
    "#5cfff7".to_string() // Cyan
}

fn default_color_dimmed() -> String {
    "#9C9991".to_string() // Dark Gray
}

fn default_color_text() -> String {
    "#f2ece6".to_string() // Light Rose
}

fn default_color_ok() -> String {
    "#7ee787".to_string() // Green
}

fn default_color_warning() -> String {
    "#f0b72f".to_string() // Amber
}

fn default_color_error() -> String {
    "#ff6b6b".to_string() // Red
}

fn default_color_popup_border() -> String {
    "#9ffcf8".to_string() // Light Cyan
}

impl ThemeConfig {
    /// Parse a hex color string to RGB tuple
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

impl GlobalConfig {
    /// Load config from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            toml::from_str(&content).context("Failed to parse global config")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the global config file
    /// Always uses ~/.config/sdd-hub/ on all platforms
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("sdd-hub").join("config.toml"))
    }

    /// Get the path to the global data directory
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "sdd-hub")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory log files are written to
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("logs")),
        }
    }
}
