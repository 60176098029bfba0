//! Viewer settings, passed by reference to whoever needs them.

use std::env;
use std::path::PathBuf;

use crossterm::style::Color;
use tracing::warn;

use crate::cursor::PageGeometry;

pub const ROWS_VAR: &str = "HEXING_ROWS";
pub const COLUMNS_VAR: &str = "HEXING_COLUMNS";
pub const CLIP_VAR: &str = "HEXING_CLIP";
pub const LOG_VAR: &str = "HEXING_LOG";

const DEFAULT_ROWS: usize = 16;
const DEFAULT_COLUMNS: usize = 16;

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8 & 0xff) as u8,
        b: (hex & 0xff) as u8,
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Offsets, prompts, the cursor and non-data text.
    pub special: Color,
    /// Bytes belonging to a detected signature.
    pub magic: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: rgb(0x151515),
            foreground: rgb(0xdfdfdf),
            special: rgb(0xde8972),
            magic: rgb(0x71c6de),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub geometry: PageGeometry,
    pub theme: Theme,
    /// Where exported byte strings are written.
    pub clip_path: PathBuf,
    /// Debug log destination; logging is off when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            geometry: PageGeometry::new(DEFAULT_ROWS, DEFAULT_COLUMNS),
            theme: Theme::default(),
            clip_path: env::temp_dir().join("hexing.clip"),
            log_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for missing or bad values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let defaults = Config::default();
        let rows = parse_count(ROWS_VAR, lookup(ROWS_VAR), DEFAULT_ROWS);
        let columns = parse_count(COLUMNS_VAR, lookup(COLUMNS_VAR), DEFAULT_COLUMNS);
        Config {
            geometry: PageGeometry::new(rows, columns),
            clip_path: lookup(CLIP_VAR)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.clip_path),
            log_path: lookup(LOG_VAR).filter(|p| !p.is_empty()).map(PathBuf::from),
            ..defaults
        }
    }
}

fn parse_count(key: &str, value: Option<String>, default: usize) -> usize {
    let value = match value {
        Some(value) => value,
        None => return default,
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 && n <= 0x100 => n,
        _ => {
            warn!(key, value = %value, default, "ignoring invalid setting");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn defaults_are_sixteen_by_sixteen() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.geometry.page_size, 256);
        assert_eq!(config.geometry.column_size, 16);
        assert!(config.log_path.is_none());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let vars = hashmap! {
            ROWS_VAR => "4".to_string(),
            COLUMNS_VAR => "zero".to_string(),
            LOG_VAR => "/tmp/hexing.log".to_string(),
        };
        let config = Config::from_lookup(|key| vars.get(key).cloned());
        assert_eq!(config.geometry, PageGeometry::new(4, 16));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/hexing.log")));
    }
}
