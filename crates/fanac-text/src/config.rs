use regex::Regex;

use crate::TextError;
use crate::scanner::ScanOptions;
use crate::serial::SerialOptions;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Which protected-phrase tables apply to name text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseMode {
    /// Input is known to be lower case; only the lower-case tables are used.
    LowerOnly,
    /// Input may hold any case; lower- and mixed-case tables are both used.
    #[default]
    Mixed,
}

/// Name suffixes kept attached to the surname, lower-case forms.
pub(crate) const LOWER_SUFFIXES: &[&str] = &[
    ", jr.", " jr.", ", jr", " jr", ", sr.", " sr.", ", sr", " sr", ", iii", " iii", ", ii",
    " ii", ", et al.", ", et al", " et. al.", " et al.", " et al",
];

/// Name suffixes, capitalized forms.
pub(crate) const MIXED_SUFFIXES: &[&str] = &[
    ", Jr.", " Jr.", ", Jr", " Jr", ", Sr.", " Sr.", ", Sr", " Sr", ", III", " III", ", II",
    " II",
];

/// Surname particles that bind to the following word, lower-case forms.
pub(crate) const LOWER_PREFIXES: &[&str] = &[" van ", " von ", " del ", " de ", " le "];

/// Surname particles, capitalized forms.
pub(crate) const MIXED_PREFIXES: &[&str] = &[" Van ", " Von ", " Del ", " De ", " Le "];

/// Configuration for scanning, serial extraction and name handling.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`TextConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    // ── names.rs ──
    /// Protected suffix phrases (", Jr.", " III", …).
    pub(crate) name_suffixes: ListOverride<String>,
    /// Protected surname particles (" van ", " de ", …).
    pub(crate) name_prefixes: ListOverride<String>,
    /// Delimiters between names in a list.
    pub(crate) name_delimiter_re: Option<Regex>,
    pub(crate) case_mode: CaseMode,

    // ── serial.rs ──
    pub serial: SerialOptions,

    // ── scanner.rs ──
    pub scan: ScanOptions,
}

impl TextConfig {
    /// Suffix phrases in effect, longest first.
    pub(crate) fn suffix_phrases(&self) -> Vec<String> {
        resolve_phrases(
            &self.name_suffixes,
            LOWER_SUFFIXES,
            MIXED_SUFFIXES,
            self.case_mode,
        )
    }

    /// Prefix phrases in effect, longest first.
    pub(crate) fn prefix_phrases(&self) -> Vec<String> {
        resolve_phrases(
            &self.name_prefixes,
            LOWER_PREFIXES,
            MIXED_PREFIXES,
            self.case_mode,
        )
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }
}

fn resolve_phrases(
    overrides: &ListOverride<String>,
    lower: &[&str],
    mixed: &[&str],
    mode: CaseMode,
) -> Vec<String> {
    let mut defaults: Vec<String> = lower.iter().map(|s| s.to_string()).collect();
    if mode == CaseMode::Mixed {
        defaults.extend(mixed.iter().map(|s| s.to_string()));
    }
    let mut phrases = overrides.resolve(&defaults);
    phrases.retain(|p| !p.is_empty());
    // Longer phrases first so ", jr." wins over ", jr" at the same position.
    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    phrases
}

/// Builder for [`TextConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`TextError::InvalidPattern`] if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct TextConfigBuilder {
    name_suffixes: ListOverride<String>,
    name_prefixes: ListOverride<String>,
    name_delimiter_re: Option<String>,
    case_mode: Option<CaseMode>,
    serial: SerialOptions,
    scan: ScanOptions,
}

impl TextConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Name phrases ──

    pub fn set_name_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.name_suffixes = ListOverride::Replace(suffixes);
        self
    }

    pub fn add_name_suffix(mut self, suffix: String) -> Self {
        match &mut self.name_suffixes {
            ListOverride::Extend(v) => v.push(suffix),
            _ => self.name_suffixes = ListOverride::Extend(vec![suffix]),
        }
        self
    }

    pub fn set_name_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.name_prefixes = ListOverride::Replace(prefixes);
        self
    }

    pub fn add_name_prefix(mut self, prefix: String) -> Self {
        match &mut self.name_prefixes {
            ListOverride::Extend(v) => v.push(prefix),
            _ => self.name_prefixes = ListOverride::Extend(vec![prefix]),
        }
        self
    }

    pub fn name_delimiter_regex(mut self, pattern: &str) -> Self {
        self.name_delimiter_re = Some(pattern.to_string());
        self
    }

    pub fn case_mode(mut self, mode: CaseMode) -> Self {
        self.case_mode = Some(mode);
        self
    }

    // ── Serial extraction ──

    pub fn strict(mut self, strict: bool) -> Self {
        self.serial.strict = strict;
        self
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.serial.complete = complete;
        self
    }

    pub fn ignore_roman(mut self, ignore: bool) -> Self {
        self.serial.ignore_roman = ignore;
        self
    }

    // ── Scanning ──

    pub fn scan_options(mut self, options: ScanOptions) -> Self {
        self.scan = options;
        self
    }

    /// Compile all string patterns and produce a [`TextConfig`].
    pub fn build(self) -> Result<TextConfig, TextError> {
        let name_delimiter_re = self
            .name_delimiter_re
            .map(|p| Regex::new(&p))
            .transpose()?;

        if let ListOverride::Replace(v) = &self.name_suffixes
            && v.iter().any(|s| s.trim().is_empty())
        {
            return Err(TextError::InvalidConfig(
                "name suffixes must not be blank".to_string(),
            ));
        }
        if let ListOverride::Replace(v) = &self.name_prefixes
            && v.iter().any(|s| s.trim().is_empty())
        {
            return Err(TextError::InvalidConfig(
                "name prefixes must not be blank".to_string(),
            ));
        }

        Ok(TextConfig {
            name_suffixes: self.name_suffixes,
            name_prefixes: self.name_prefixes,
            name_delimiter_re,
            case_mode: self.case_mode.unwrap_or_default(),
            serial: self.serial,
            scan: self.scan,
        })
    }
}
