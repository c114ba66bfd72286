use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

/// Tape length used by the command line when nothing else is configured.
pub const CLI_DEFAULT_CELLS: usize = 8;

/// Environment variable consulted when `--cells` is not given.
pub const CELLS_ENV: &str = "BF_CELLS";

/// Settings read from `brainfrick.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub cells: Option<usize>,
}

/// Resolve the tape length: flag -> env -> config file -> default.
pub fn resolve_cells(flag: Option<usize>) -> usize {
    if let Some(cells) = flag {
        return cells;
    }

    if let Ok(raw) = std::env::var(CELLS_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(cells) => return cells,
            Err(e) => {
                warn!(var = CELLS_ENV, value = %raw, error = %e, "ignoring unparsable cell count")
            }
        }
    }

    if let Some(cells) = load_from_toml().and_then(|s| s.cells) {
        return cells;
    }

    CLI_DEFAULT_CELLS
}

fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("brainfrick.toml");
    Some(path)
}

fn load_from_toml() -> Option<FileSettings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!(path = %path.display(), "loaded config file");
    Some(parse_settings(&content))
}

/// Very small hand-rolled parser: `key = value` pairs under a `[machine]` header.
/// Values may be quoted. Later keys override earlier ones.
pub fn parse_settings(content: &str) -> FileSettings {
    let mut in_machine = false;
    let mut cells_raw = None;
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_machine = section.trim() == "machine";
            continue;
        }
        if !in_machine {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == "cells" {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            cells_raw = Some(unquoted);
        }
    }

    let mut settings = FileSettings::default();
    if let Some(raw) = cells_raw {
        match raw.parse::<usize>() {
            Ok(cells) => settings.cells = Some(cells),
            Err(e) => warn!(value = %raw, error = %e, "ignoring unparsable cells in config file"),
        }
    }
    settings
}
