use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const CONFIG_DIR_ENV: &str = "DIFFNAV_CONFIG_DIR";
const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "diffnav";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub hide_header: bool,
    pub hide_footer: bool,
    pub show_file_tree: bool,
    pub file_tree_width: u16,
    pub search_tree_width: u16,
    pub icons: String,
    pub color_file_names: bool,
    pub side_by_side: bool,
    pub show_diff_stats: bool,
    /// Start the tree at the top-level entries instead of a `.` row.
    pub hide_root: bool,
    /// Program that turns a patch into styled text.
    pub formatter: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            hide_header: false,
            hide_footer: false,
            show_file_tree: true,
            file_tree_width: 26,
            search_tree_width: 50,
            icons: IconStyle::Ascii.name().to_string(),
            color_file_names: true,
            side_by_side: true,
            show_diff_stats: true,
            hide_root: false,
            formatter: "delta".to_string(),
        }
    }
}

impl UiConfig {
    pub fn icon_style(&self) -> IconStyle {
        IconStyle::from_name(&self.icons).unwrap_or_else(|| {
            warn!(icons = %self.icons, "unknown icon style, using ascii");
            IconStyle::Ascii
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconStyle {
    #[default]
    Ascii,
    Unicode,
    NerdFontsStatus,
    NerdFontsSimple,
    NerdFontsFiletype,
    NerdFontsFull,
}

impl IconStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ascii" => Some(IconStyle::Ascii),
            "unicode" => Some(IconStyle::Unicode),
            "nerd-fonts-status" => Some(IconStyle::NerdFontsStatus),
            "nerd-fonts-simple" => Some(IconStyle::NerdFontsSimple),
            "nerd-fonts-filetype" => Some(IconStyle::NerdFontsFiletype),
            "nerd-fonts-full" => Some(IconStyle::NerdFontsFull),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IconStyle::Ascii => "ascii",
            IconStyle::Unicode => "unicode",
            IconStyle::NerdFontsStatus => "nerd-fonts-status",
            IconStyle::NerdFontsSimple => "nerd-fonts-simple",
            IconStyle::NerdFontsFiletype => "nerd-fonts-filetype",
            IconStyle::NerdFontsFull => "nerd-fonts-full",
        }
    }

    /// Next style in the in-session cycle.
    pub fn next(self) -> Self {
        match self {
            IconStyle::Ascii => IconStyle::Unicode,
            IconStyle::Unicode => IconStyle::NerdFontsStatus,
            IconStyle::NerdFontsStatus => IconStyle::NerdFontsSimple,
            IconStyle::NerdFontsSimple => IconStyle::NerdFontsFiletype,
            IconStyle::NerdFontsFiletype => IconStyle::NerdFontsFull,
            IconStyle::NerdFontsFull => IconStyle::Ascii,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let s = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Config::from_toml_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the user's config, falling back to defaults on any failure.
    pub fn load() -> Config {
        let Some(path) = config_path() else {
            debug!("no config file found, using defaults");
            return Config::default();
        };
        debug!(path = %path.display(), "loading config");
        match Config::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "invalid config, using defaults");
                Config::default()
            }
        }
    }
}

/// Locates the config file, preferring `$DIFFNAV_CONFIG_DIR`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        let dir = PathBuf::from(dir);
        if dir.is_dir() {
            return Some(dir.join(CONFIG_FILE));
        }
    }
    candidate_dirs()
        .into_iter()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .find(|path| path.is_file())
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();
    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            dirs_out.push(home.join(".config"));
        }
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            dirs_out.push(PathBuf::from(xdg));
        }
    }
    if let Some(dir) = dirs::config_dir() {
        dirs_out.push(dir);
    }
    dirs_out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml_str("[ui]\nfile_tree_width = 40\nicons = \"unicode\"\n").unwrap();
        assert_eq!(cfg.ui.file_tree_width, 40);
        assert_eq!(cfg.ui.icon_style(), IconStyle::Unicode);
        assert_eq!(cfg.ui.search_tree_width, 50);
        assert!(cfg.ui.show_file_tree);
        assert!(!cfg.ui.hide_root);
    }

    #[test]
    fn unknown_icon_style_falls_back_to_ascii() {
        let cfg = Config::from_toml_str("[ui]\nicons = \"emoji\"\n").unwrap();
        assert_eq!(cfg.ui.icon_style(), IconStyle::Ascii);
    }

    #[test]
    fn icon_cycle_visits_every_style_once() {
        let mut style = IconStyle::Ascii;
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(style.name());
            style = style.next();
        }
        assert_eq!(style, IconStyle::Ascii);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn missing_file_is_default_and_bad_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        std::fs::write(&path, "[ui\nbroken").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
