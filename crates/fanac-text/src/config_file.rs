use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::TextError;
use crate::config::{CaseMode, TextConfigBuilder};
use crate::scanner::ScanOptions;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub names: Option<NamesConfig>,
    pub serial: Option<SerialConfig>,
    pub scan: Option<ScanConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamesConfig {
    /// Replaces the built-in suffix phrases.
    pub suffixes: Option<Vec<String>>,
    /// Added to the suffix phrases.
    pub extra_suffixes: Option<Vec<String>>,
    /// Replaces the built-in prefix phrases.
    pub prefixes: Option<Vec<String>>,
    /// Added to the prefix phrases.
    pub extra_prefixes: Option<Vec<String>>,
    /// Regex separating names in a list.
    pub delimiter: Option<String>,
    pub lower_case_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    pub strict: Option<bool>,
    pub complete: Option<bool>,
    pub ignore_roman: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub case_insensitive: Option<bool>,
    pub strip_markup: Option<bool>,
    pub include_markers: Option<bool>,
    pub trim_whitespace: Option<bool>,
}

/// Platform config directory path: `<config_dir>/fanac-text/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fanac-text").join("config.toml"))
}

/// Load config by cascading CWD `.fanac-text.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".fanac-text.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Like [`load_from_path`], but a missing or malformed file is an error.
/// Used for paths the user named explicitly.
pub fn read_from_path(path: &Path) -> Result<ConfigFile, TextError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TextError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| TextError::InvalidConfig(format!("{}: {}", path.display(), e)))
}

fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bn, on) = (base.names.as_ref(), overlay.names.as_ref());
    let (bs, os) = (base.serial.as_ref(), overlay.serial.as_ref());
    let (bc, oc) = (base.scan.as_ref(), overlay.scan.as_ref());

    ConfigFile {
        names: Some(NamesConfig {
            suffixes: pick(on, bn, |n| n.suffixes.clone()),
            extra_suffixes: pick(on, bn, |n| n.extra_suffixes.clone()),
            prefixes: pick(on, bn, |n| n.prefixes.clone()),
            extra_prefixes: pick(on, bn, |n| n.extra_prefixes.clone()),
            delimiter: pick(on, bn, |n| n.delimiter.clone()),
            lower_case_only: pick(on, bn, |n| n.lower_case_only),
        }),
        serial: Some(SerialConfig {
            strict: pick(os, bs, |s| s.strict),
            complete: pick(os, bs, |s| s.complete),
            ignore_roman: pick(os, bs, |s| s.ignore_roman),
        }),
        scan: Some(ScanConfig {
            case_insensitive: pick(oc, bc, |c| c.case_insensitive),
            strip_markup: pick(oc, bc, |c| c.strip_markup),
            include_markers: pick(oc, bc, |c| c.include_markers),
            trim_whitespace: pick(oc, bc, |c| c.trim_whitespace),
        }),
    }
}

impl ConfigFile {
    /// Seed a [`TextConfigBuilder`] with every value set in this file.
    pub fn into_builder(self) -> TextConfigBuilder {
        let mut builder = TextConfigBuilder::new();

        if let Some(names) = self.names {
            if let Some(suffixes) = names.suffixes {
                builder = builder.set_name_suffixes(suffixes);
            }
            for suffix in names.extra_suffixes.unwrap_or_default() {
                builder = builder.add_name_suffix(suffix);
            }
            if let Some(prefixes) = names.prefixes {
                builder = builder.set_name_prefixes(prefixes);
            }
            for prefix in names.extra_prefixes.unwrap_or_default() {
                builder = builder.add_name_prefix(prefix);
            }
            if let Some(delimiter) = names.delimiter {
                builder = builder.name_delimiter_regex(&delimiter);
            }
            if let Some(lower) = names.lower_case_only {
                builder = builder.case_mode(if lower {
                    CaseMode::LowerOnly
                } else {
                    CaseMode::Mixed
                });
            }
        }

        if let Some(serial) = self.serial {
            builder = builder
                .strict(serial.strict.unwrap_or(false))
                .complete(serial.complete.unwrap_or(false))
                .ignore_roman(serial.ignore_roman.unwrap_or(false));
        }

        if let Some(scan) = self.scan {
            builder = builder.scan_options(ScanOptions {
                case_insensitive: scan.case_insensitive.unwrap_or(false),
                strip_markup: scan.strip_markup.unwrap_or(false),
                include_markers: scan.include_markers.unwrap_or(false),
                trim_whitespace: scan.trim_whitespace.unwrap_or(false),
            });
        }

        builder
    }
}
