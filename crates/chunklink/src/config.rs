//! Configuration file support for chunklink
//!
//! Config file location: `~/.config/chunklink/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [ui]
//! mode = "replace"
//! link_map_width = 8
//! rtl = false
//!
//! [panes]
//! readonly = [0]
//!
//! [colors]
//! current_chunk_highlight = "#ffff0040"
//!
//! [colors.fill]
//! insert = "#d0ffa3"
//! conflict = "#ffa5a3"
//!
//! [colors.line]
//! conflict = "#ff6666"
//! ```

use chunklink_core::{ChangeKind, ColorScheme, Mode, Rgba};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default gutter action: "replace", "delete" or "insert"
    pub mode: Option<String>,
    /// Width of each link map in columns
    pub link_map_width: u16,
    /// Lay panes out right-to-left
    pub rtl: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mode: None,
            link_map_width: 8,
            rtl: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PanesConfig {
    /// 0-based indices of panes that cannot be edited
    pub readonly: Vec<usize>,
}

/// Per-kind colour overrides, as hex strings
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ColorsConfig {
    pub fill: HashMap<String, String>,
    pub line: HashMap<String, String>,
    pub current_chunk_highlight: Option<String>,
}

impl ColorsConfig {
    /// Overlay configured colours on the default scheme. Invalid entries
    /// are skipped with a warning.
    pub fn resolve(&self) -> ColorScheme {
        let mut scheme = ColorScheme::default();
        apply_overrides(&mut scheme.fill, &self.fill, "fill");
        apply_overrides(&mut scheme.line, &self.line, "line");
        if let Some(hex) = &self.current_chunk_highlight {
            match Rgba::parse_hex(hex) {
                Ok(color) => scheme.current_chunk_highlight = color,
                Err(e) => warn!("Ignoring current_chunk_highlight: {}", e),
            }
        }
        scheme
    }
}

fn apply_overrides<S: std::hash::BuildHasher>(
    target: &mut HashMap<ChangeKind, Rgba, S>,
    overrides: &HashMap<String, String>,
    table: &str,
) {
    for (name, hex) in overrides {
        let Some(kind) = parse_kind(name) else {
            warn!("Unknown change kind '{}' in [colors.{}]", name, table);
            continue;
        };
        match Rgba::parse_hex(hex) {
            Ok(color) => {
                target.insert(kind, color);
            }
            Err(e) => warn!("Ignoring [colors.{}] {}: {}", table, name, e),
        }
    }
}

fn parse_kind(name: &str) -> Option<ChangeKind> {
    let name = name.trim().to_ascii_lowercase();
    ChangeKind::ALL.into_iter().find(|kind| kind.name() == name)
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub panes: PanesConfig,
    pub colors: ColorsConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("chunklink").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("chunklink").join("config.toml"));
        }

        // Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("chunklink").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .map(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    pub fn parse(content: &str) -> Self {
        toml::from_str(content)
            .map_err(|e| {
                warn!("Failed to parse config: {}", e);
                e
            })
            .unwrap_or_default()
    }

    /// Parse mode string to Mode
    pub fn parse_mode(&self) -> Option<Mode> {
        self.ui.mode.as_deref().and_then(|s| match s.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
    }
}
