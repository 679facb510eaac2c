use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::outline::IdPolicy;
use crate::tracker::DEFAULT_TRIGGER_OFFSET;
use crate::ui::ScrollBehavior;
use crate::view::EngineOptions;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub json: bool,
    pub watch: bool,
    pub keep_duplicate_ids: bool,
    pub instant_scroll: bool,
    pub perf: bool,
    pub trigger_offset: Option<f64>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            json: self.json || other.json,
            watch: self.watch || other.watch,
            keep_duplicate_ids: self.keep_duplicate_ids || other.keep_duplicate_ids,
            instant_scroll: self.instant_scroll || other.instant_scroll,
            perf: self.perf || other.perf,
            trigger_offset: other.trigger_offset.or(self.trigger_offset),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    /// Engine tunables selected by these flags.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            trigger_offset: self.trigger_offset.unwrap_or(DEFAULT_TRIGGER_OFFSET),
            id_policy: if self.keep_duplicate_ids {
                IdPolicy::Preserve
            } else {
                IdPolicy::Suffix
            },
            scroll_behavior: if self.instant_scroll {
                ScrollBehavior::Instant
            } else {
                ScrollBehavior::Smooth
            },
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markline").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markline")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markline").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markline")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".marklinerc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markline defaults (saved with --save)".to_string()];
    let switches = [
        (flags.json, "--json"),
        (flags.watch, "--watch"),
        (flags.keep_duplicate_ids, "--keep-duplicate-ids"),
        (flags.instant_scroll, "--instant-scroll"),
        (flags.perf, "--perf"),
    ];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(offset) = flags.trigger_offset {
        lines.push(format!("--trigger-offset {offset}"));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Parse known flags out of command-line style tokens. Unknown tokens
/// (the program name, positional arguments) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--json" => flags.json = true,
            "--watch" | "-w" => flags.watch = true,
            "--keep-duplicate-ids" => flags.keep_duplicate_ids = true,
            "--instant-scroll" => flags.instant_scroll = true,
            "--perf" => flags.perf = true,
            "--trigger-offset" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.trigger_offset = parse_offset(next);
                    i += 1;
                }
            }
            "--debug-log" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.debug_log = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--trigger-offset=") {
                    flags.trigger_offset = parse_offset(value);
                } else if let Some(value) = token.strip_prefix("--debug-log=") {
                    flags.debug_log = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

fn parse_offset(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
