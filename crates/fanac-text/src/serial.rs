use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::roman::decode_roman;

/// The volume/number tail of a citation string, e.g. `V3#12a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SerialDesignation {
    /// Everything before the designation, trimmed (usually the title).
    pub label: String,
    pub volume: Option<String>,
    pub number: Option<String>,
    /// Single-letter issue suffix such as the `a` in `#12a`.
    pub suffix: Option<char>,
}

impl SerialDesignation {
    fn unmatched(text: &str) -> Self {
        Self {
            label: text.to_string(),
            ..Default::default()
        }
    }

    /// True when any designation was recovered.
    pub fn is_match(&self) -> bool {
        self.volume.is_some() || self.number.is_some()
    }

    /// The number with its suffix letter appended (`12a`), or an empty string.
    pub fn number_with_suffix(&self) -> String {
        let mut out = self.number.clone().unwrap_or_default();
        if let Some(c) = self.suffix {
            out.push(c);
        }
        out
    }
}

/// Knobs for [`extract_trailing_serial_designation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SerialOptions {
    /// Skip the ambiguous bare-number and spaced-Roman fallbacks.
    pub strict: bool,
    /// The designation must run to the very end of the text. Otherwise a tail
    /// of closing punctuation (`.`, `,`, `;`, `:`) is tolerated.
    pub complete: bool,
    /// Never read trailing letters as Roman numerals.
    pub ignore_roman: bool,
}

/// One rule of the extraction cascade. [`SerialRule::ALL`] lists them in
/// priority order; earlier rules win over later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialRule {
    /// `V3#12a`
    CompactVolume,
    /// `Vol 3 #12a`
    SpelledVolume,
    /// `3 1/2`
    Fraction,
    /// `3/12` read as volume/number
    VolumeSlashNumber,
    /// `XIV`
    TrailingRoman,
    /// `29-35`, first bound kept
    Range,
    /// `#7`
    HashNumber,
    /// `12.5`
    Decimal,
    /// `12a`, lenient only
    BareNumber,
    /// ` XIV` after whitespace, lenient only
    SpacedRoman,
}

impl SerialRule {
    pub const ALL: [SerialRule; 10] = [
        SerialRule::CompactVolume,
        SerialRule::SpelledVolume,
        SerialRule::Fraction,
        SerialRule::VolumeSlashNumber,
        SerialRule::TrailingRoman,
        SerialRule::Range,
        SerialRule::HashNumber,
        SerialRule::Decimal,
        SerialRule::BareNumber,
        SerialRule::SpacedRoman,
    ];

    /// Whether the rule takes part in a cascade run with `options`.
    pub fn enabled(self, options: SerialOptions) -> bool {
        match self {
            SerialRule::TrailingRoman => !options.ignore_roman,
            SerialRule::BareNumber => !options.strict,
            SerialRule::SpacedRoman => !options.strict && !options.ignore_roman,
            _ => true,
        }
    }

    fn pattern(self) -> &'static Regex {
        static COMPACT_VOLUME: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)V(\d+),?\s*#(\d+)([a-zA-Z]?)$").unwrap());
        static SPELLED_VOLUME: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(.*?)V[oO][lL]\.?\s*(\d+),?\s*#(\d+)([a-zA-Z]?)$").unwrap()
        });
        static FRACTION: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)(\d+)\s+(\d+)/(\d+)$").unwrap());
        static VOLUME_SLASH_NUMBER: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)(\d+)/(\d+)$").unwrap());
        static TRAILING_ROMAN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)([IVXLC]+)$").unwrap());
        static RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)(\d+)-(\d+)$").unwrap());
        static HASH_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)#(\d+)$").unwrap());
        static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)(\d+\.\d+)$").unwrap());
        static BARE_NUMBER: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)(\d+)([a-zA-Z]?)$").unwrap());
        static SPACED_ROMAN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)\s+([IVXLC]+)$").unwrap());

        match self {
            SerialRule::CompactVolume => &COMPACT_VOLUME,
            SerialRule::SpelledVolume => &SPELLED_VOLUME,
            SerialRule::Fraction => &FRACTION,
            SerialRule::VolumeSlashNumber => &VOLUME_SLASH_NUMBER,
            SerialRule::TrailingRoman => &TRAILING_ROMAN,
            SerialRule::Range => &RANGE,
            SerialRule::HashNumber => &HASH_NUMBER,
            SerialRule::Decimal => &DECIMAL,
            SerialRule::BareNumber => &BARE_NUMBER,
            SerialRule::SpacedRoman => &SPACED_ROMAN,
        }
    }

    /// Try this rule alone against already-prepared text.
    pub fn apply(self, text: &str) -> Option<SerialDesignation> {
        let caps = self.pattern().captures(text)?;
        let label = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        let group = |caps: &Captures, i: usize| caps.get(i).map(|m| m.as_str().to_string());

        let designation = match self {
            SerialRule::CompactVolume | SerialRule::SpelledVolume => SerialDesignation {
                label,
                volume: group(&caps, 2),
                number: group(&caps, 3),
                suffix: caps.get(4).and_then(|m| m.as_str().chars().next()),
            },
            SerialRule::Fraction => SerialDesignation {
                label,
                volume: None,
                number: Some(format!("{} {}/{}", &caps[2], &caps[3], &caps[4])),
                suffix: None,
            },
            SerialRule::VolumeSlashNumber => SerialDesignation {
                label,
                volume: group(&caps, 2),
                number: group(&caps, 3),
                suffix: None,
            },
            SerialRule::TrailingRoman | SerialRule::SpacedRoman => SerialDesignation {
                label,
                volume: None,
                number: Some(decode_roman(&caps[2])?.to_string()),
                suffix: None,
            },
            SerialRule::Range | SerialRule::HashNumber | SerialRule::Decimal => {
                SerialDesignation {
                    label,
                    volume: None,
                    number: group(&caps, 2),
                    suffix: None,
                }
            }
            SerialRule::BareNumber => SerialDesignation {
                label,
                volume: None,
                number: group(&caps, 2),
                suffix: caps.get(3).and_then(|m| m.as_str().chars().next()),
            },
        };
        Some(designation)
    }
}

/// Recover a trailing volume/number designation from a citation string.
///
/// Rules are tried in [`SerialRule::ALL`] order and the first match wins:
/// - `Title V3#12a` and `Title Vol 3 #12a` → volume 3, number 12, suffix a
/// - `Title 3 1/2` → number "3 1/2"
/// - `Title 3/12` → volume 3, number 12
/// - `Title XIV` → number 14 (unless `ignore_roman`)
/// - `Title 29-35` → number 29
/// - `Title #7` → number 7
/// - `Title 12.5` → number 12.5
/// - `Title 12a` → number 12, suffix a (unless `strict`)
///
/// When nothing matches, the trimmed input comes back as the label with every
/// other field empty.
pub fn extract_trailing_serial_designation(
    text: &str,
    strict: bool,
    complete: bool,
    ignore_roman: bool,
) -> SerialDesignation {
    extract_with_options(
        text,
        SerialOptions {
            strict,
            complete,
            ignore_roman,
        },
    )
}

/// [`extract_trailing_serial_designation`] taking its flags as a struct.
pub fn extract_with_options(text: &str, options: SerialOptions) -> SerialDesignation {
    let text = text.trim();
    let subject = if options.complete {
        text
    } else {
        strip_closing_tail(text)
    };

    for rule in SerialRule::ALL {
        if !rule.enabled(options) {
            continue;
        }
        if let Some(designation) = rule.apply(subject) {
            tracing::debug!(?rule, input = text, "serial designation matched");
            return designation;
        }
    }

    SerialDesignation::unmatched(text)
}

fn strip_closing_tail(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':'))
}

/// Remove a plain trailing issue number (`Fooman 12`, `Fooman #12`) and
/// return the rest, trimmed. The number must stand alone after whitespace,
/// so `Fooman 12.5` or `Fooman V3#12` come back trimmed but otherwise
/// untouched.
pub fn drop_trailing_number(text: &str) -> String {
    static TRAILING_NUMBER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(.*?)(?:^|\s)#?\d+\s*$").unwrap());
    match TRAILING_NUMBER.captures(text).and_then(|c| c.get(1)) {
        Some(rest) => rest.as_str().trim().to_string(),
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> SerialDesignation {
        extract_trailing_serial_designation(text, false, false, false)
    }

    #[test]
    fn test_compact_volume_number() {
        let d = extract("Fooman V3#12a");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.volume.as_deref(), Some("3"));
        assert_eq!(d.number.as_deref(), Some("12"));
        assert_eq!(d.suffix, Some('a'));
    }

    #[test]
    fn test_compact_volume_with_comma_and_space() {
        let d = extract("Fooman V3, #12");
        assert_eq!(d.volume.as_deref(), Some("3"));
        assert_eq!(d.number.as_deref(), Some("12"));
        assert_eq!(d.suffix, None);
    }

    #[test]
    fn test_spelled_volume() {
        let d = extract("Fooman Vol 4 #2b");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.volume.as_deref(), Some("4"));
        assert_eq!(d.number.as_deref(), Some("2"));
        assert_eq!(d.suffix, Some('b'));

        let d = extract("Fooman VOL. 4 #2");
        assert_eq!(d.volume.as_deref(), Some("4"));
    }

    #[test]
    fn test_fraction_beats_volume_slash_number() {
        let d = extract("Fooman 3 1/2");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.volume, None);
        assert_eq!(d.number.as_deref(), Some("3 1/2"));
    }

    #[test]
    fn test_volume_slash_number() {
        let d = extract("Fooman 3/12");
        assert_eq!(d.volume.as_deref(), Some("3"));
        assert_eq!(d.number.as_deref(), Some("12"));
    }

    #[test]
    fn test_trailing_roman() {
        let d = extract("Fooman XIV");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.number.as_deref(), Some("14"));

        let d = extract_trailing_serial_designation("Fooman XIV", false, false, true);
        assert!(!d.is_match());
        assert_eq!(d.label, "Fooman XIV");
    }

    #[test]
    fn test_range_keeps_first_bound() {
        let d = extract_trailing_serial_designation("Fooman 29-35", false, true, false);
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.number.as_deref(), Some("29"));
    }

    #[test]
    fn test_hash_number() {
        let d = extract("Fooman #7");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.volume, None);
        assert_eq!(d.number.as_deref(), Some("7"));
    }

    #[test]
    fn test_decimal() {
        let d = extract("Fooman 12.5");
        assert_eq!(d.number.as_deref(), Some("12.5"));
    }

    #[test]
    fn test_bare_number_only_when_lenient() {
        let d = extract("Fooman 12a");
        assert_eq!(d.number.as_deref(), Some("12"));
        assert_eq!(d.suffix, Some('a'));

        let d = extract_trailing_serial_designation("Fooman 12a", true, false, false);
        assert!(!d.is_match());
        assert_eq!(d.label, "Fooman 12a");
    }

    #[test]
    fn test_complete_rejects_trailing_punctuation() {
        let lenient = extract("Fooman #7.");
        assert_eq!(lenient.number.as_deref(), Some("7"));

        let complete = extract_trailing_serial_designation("Fooman #7.", true, true, false);
        assert!(!complete.is_match());
        assert_eq!(complete.label, "Fooman #7.");
    }

    #[test]
    fn test_no_match_returns_label() {
        let d = extract("  Just a title  ");
        assert_eq!(d, SerialDesignation::unmatched("Just a title"));
    }

    #[test]
    fn test_rules_individually() {
        assert!(SerialRule::HashNumber.apply("Fooman 7").is_none());
        let d = SerialRule::SpacedRoman.apply("Fooman IX").unwrap();
        assert_eq!(d.number.as_deref(), Some("9"));
        assert!(SerialRule::SpacedRoman.apply("FoomanIX").is_none());
        assert!(!SerialRule::BareNumber.enabled(SerialOptions {
            strict: true,
            ..Default::default()
        }));
    }

    #[test]
    fn test_number_with_suffix() {
        assert_eq!(extract("Fooman V3#12a").number_with_suffix(), "12a");
        assert_eq!(extract("Fooman").number_with_suffix(), "");
    }

    #[test]
    fn test_drop_trailing_number() {
        assert_eq!(drop_trailing_number("Fooman 12"), "Fooman");
        assert_eq!(drop_trailing_number("Fooman #12 "), "Fooman");
        assert_eq!(drop_trailing_number(" Fooman V3#12a "), "Fooman V3#12a");
        assert_eq!(drop_trailing_number("Fooman"), "Fooman");
        assert_eq!(drop_trailing_number("#12"), "");
    }

    #[test]
    fn test_drop_trailing_number_leaves_other_designations() {
        for text in [
            "Fooman 12.5",
            "Fooman 3/12",
            "Fooman 29-35",
            "Fooman V3#12",
            "Fooman#12",
            "Fooman 12a",
        ] {
            assert_eq!(drop_trailing_number(text), text, "{:?}", text);
        }
    }

    #[test]
    fn test_closing_bracket_is_not_trimmed() {
        let d = extract("Fooman (V3#12)");
        assert!(!d.is_match());
        assert_eq!(d.label, "Fooman (V3#12)");

        let d = extract("Fooman V3#12.");
        assert_eq!(d.label, "Fooman");
        assert_eq!(d.number.as_deref(), Some("12"));
    }
}
