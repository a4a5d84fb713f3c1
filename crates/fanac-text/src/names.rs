use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::{CaseMode, TextConfig};

/// Separators between names in a list: `,` `, and` ` and` `/` `&`.
static DEFAULT_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*and\b|,|/|\s+and\b|&").unwrap());

/// A run of name text, either free text or a protected phrase.
///
/// Protected phrases are never split by delimiters. Concatenating the
/// segments returned by [`protect`] reproduces the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// A suffix such as `", Jr."` that stays attached to the surname.
    Suffix(&'a str),
    /// A particle such as `" van "` that binds to the following word.
    Prefix(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Suffix(s) | Segment::Prefix(s) => s,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Segment::Text(_))
    }
}

/// Concatenate segments back into text.
pub fn render(segments: &[Segment<'_>]) -> String {
    segments.iter().map(Segment::as_str).collect()
}

/// Mark the suffix and prefix phrases in `text` so that their commas and
/// spaces are not mistaken for list delimiters.
///
/// Scans left to right; at each position suffixes are tried before prefixes,
/// longest phrase first. A phrase ending in a letter or digit only matches
/// when the next character is not one (`" II"` does not match `" IIlla"`).
pub fn protect<'a>(text: &'a str, config: &TextConfig) -> Vec<Segment<'a>> {
    let suffixes = config.suffix_phrases();
    let prefixes = config.prefix_phrases();

    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let hit = if let Some(len) = phrase_at(rest, &suffixes) {
            Some(Segment::Suffix(&rest[..len]))
        } else {
            phrase_at(rest, &prefixes).map(|len| Segment::Prefix(&rest[..len]))
        };

        match hit {
            Some(segment) => {
                if text_start < pos {
                    segments.push(Segment::Text(&text[text_start..pos]));
                }
                pos += segment.as_str().len();
                text_start = pos;
                segments.push(segment);
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if text_start < text.len() {
        segments.push(Segment::Text(&text[text_start..]));
    }
    segments
}

fn phrase_at(rest: &str, phrases: &[String]) -> Option<usize> {
    phrases
        .iter()
        .find(|p| rest.starts_with(p.as_str()) && ends_on_boundary(p, &rest[p.len()..]))
        .map(|p| p.len())
}

fn ends_on_boundary(phrase: &str, after: &str) -> bool {
    let ends_in_word = phrase.chars().last().is_some_and(char::is_alphanumeric);
    !ends_in_word || !after.chars().next().is_some_and(char::is_alphanumeric)
}

/// A personal name split into given names, surname and an optional suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub given: Vec<String>,
    /// Last word of the name, including any bound particle (`"van Vogt"`).
    pub surname: String,
    /// Suffix exactly as written, leading separator included (`", Jr."`).
    pub suffix: Option<String>,
}

impl PersonName {
    /// Parse a name written in display order ("First Middle Last").
    pub fn parse(name: &str) -> Self {
        Self::parse_with_config(name, &TextConfig::default())
    }

    pub fn parse_with_config(name: &str, config: &TextConfig) -> Self {
        Self::from_segments(&protect(name.trim(), config))
    }

    fn from_segments(segments: &[Segment<'_>]) -> Self {
        let last_meaningful = segments
            .iter()
            .rposition(|s| !s.as_str().trim().is_empty());

        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut suffix = None;

        fn flush(current: &mut String, words: &mut Vec<String>) {
            let word = current.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
            current.clear();
        }

        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Text(t) => {
                    for c in t.chars() {
                        if c.is_whitespace() {
                            flush(&mut current, &mut words);
                        } else {
                            current.push(c);
                        }
                    }
                }
                Segment::Suffix(s) if Some(i) == last_meaningful => {
                    suffix = Some(s.to_string());
                }
                // A suffix in mid-name stays glued to the word before it.
                Segment::Suffix(s) => current.push_str(s),
                Segment::Prefix(p) => {
                    flush(&mut current, &mut words);
                    current.push_str(p.trim_start());
                }
            }
        }
        flush(&mut current, &mut words);

        let surname = words.pop().unwrap_or_default();
        PersonName {
            given: words,
            surname,
            suffix,
        }
    }

    /// "First Middle Last[, Suffix]"
    pub fn display(&self) -> String {
        let mut out = self.given.join(" ");
        if !out.is_empty() && !self.surname.is_empty() {
            out.push(' ');
        }
        out.push_str(&self.surname);
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix);
        }
        out
    }

    /// "Last, First Middle[, Suffix]"
    pub fn sort_form(&self) -> String {
        let mut out = self.surname.clone();
        if !self.given.is_empty() {
            out.push_str(", ");
            out.push_str(&self.given.join(" "));
        }
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix);
        }
        out
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Convert a display-order name to "Last, Rest" order.
///
/// A name that already holds a comma outside its protected phrases is taken
/// to be in sort order and returned trimmed.
pub fn sort_form(name: &str) -> String {
    sort_form_with_config(name, &TextConfig::default())
}

pub fn sort_form_with_config(name: &str, config: &TextConfig) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }

    let segments = protect(name, config);
    let has_bare_comma = segments
        .iter()
        .any(|s| matches!(s, Segment::Text(t) if t.contains(',')));
    if has_bare_comma {
        return name.to_string();
    }
    PersonName::from_segments(&segments).sort_form()
}

/// Split a list of names into display-order names.
///
/// - `"Asimov, Isaac"` (one comma, a single word before it) is one inverted
///   name and comes back as `["Isaac Asimov"]`
/// - anything else is split on `,` `/` `&` and `and`:
///   `"A, B, and C"` → `["A", "B", "C"]`
///
/// Suffixes and particles are protected first, so `"Harry Warner, Jr."` stays
/// one name.
pub fn split_name_list(text: &str) -> Vec<String> {
    split_name_list_with_config(text, &TextConfig::default())
}

pub fn split_name_list_with_config(text: &str, config: &TextConfig) -> Vec<String> {
    let segments = protect(text, config);
    if let Some(name) = inverted_name(&segments) {
        return if name.is_empty() { Vec::new() } else { vec![name] };
    }
    let delimiter = config
        .name_delimiter_re
        .as_ref()
        .unwrap_or(&*DEFAULT_DELIMITER_RE);
    split_segments(&segments, delimiter)
}

/// Split a list of names on a caller-supplied delimiter pattern.
///
/// Protected phrases are honored, but no inverted-name detection is done.
pub fn split_name_list_on(text: &str, delimiter: &Regex) -> Vec<String> {
    split_segments(&protect(text, &TextConfig::default()), delimiter)
}

/// Normalize a single name to display order.
///
/// Input that reads as more than one name is returned unchanged.
pub fn normalize_persons_name(name: &str) -> String {
    let mut names = split_name_list(name);
    if names.len() == 1 {
        return names.remove(0);
    }
    name.to_string()
}

/// Lower-case ASCII sort key for a name: sort order, accents removed, only
/// letters, digits, spaces and apostrophes kept.
pub fn flatten_name_for_sorting(name: &str) -> String {
    let config = TextConfig {
        case_mode: CaseMode::LowerOnly,
        ..TextConfig::default()
    };
    sort_form_with_config(&name.to_lowercase(), &config)
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '\'')
        .collect()
}

fn inverted_name(segments: &[Segment<'_>]) -> Option<String> {
    let commas: usize = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Text(t) => Some(t.matches(',').count()),
            _ => None,
        })
        .sum();
    if commas != 1 {
        return None;
    }

    let (idx, text) = segments.iter().enumerate().find_map(|(i, s)| match s {
        Segment::Text(t) if t.contains(',') => Some((i, *t)),
        _ => None,
    })?;
    let comma = text.find(',')?;

    // Protected phrases count as part of a single word here.
    let mut glued: String = segments[..idx]
        .iter()
        .map(|s| match s {
            Segment::Text(t) => t.to_string(),
            other => other.as_str().split_whitespace().collect(),
        })
        .collect();
    glued.push_str(&text[..comma]);
    if glued.trim().contains(char::is_whitespace) {
        return None;
    }

    let before = render(&segments[..idx]) + &text[..comma];
    let after = text[comma + 1..].to_string() + &render(&segments[idx + 1..]);
    let name = format!("{} {}", after.trim(), before.trim());
    Some(name.trim().to_string())
}

fn split_segments(segments: &[Segment<'_>], delimiter: &Regex) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();
    for segment in segments {
        match segment {
            Segment::Text(t) => {
                let mut last = 0;
                for m in delimiter.find_iter(t) {
                    if m.start() == m.end() {
                        continue;
                    }
                    current.push_str(&t[last..m.start()]);
                    names.push(std::mem::take(&mut current));
                    last = m.end();
                }
                current.push_str(&t[last..]);
            }
            protected => current.push_str(protected.as_str()),
        }
    }
    names.push(current);

    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextConfigBuilder;

    #[test]
    fn test_protect_is_reversible() {
        let config = TextConfig::default();
        for input in [
            "Harry Warner, Jr.",
            "A. E. van Vogt and L. Sprague de Camp",
            "Smith, John, III & Jones",
            "",
            "   ",
            "Ursula K. Le Guin, et al.",
            "Ærnö Đuro jr",
        ] {
            assert_eq!(render(&protect(input, &config)), input);
        }
    }

    #[test]
    fn test_protect_marks_phrases() {
        let config = TextConfig::default();
        let segments = protect("Harry Warner, Jr.", &config);
        assert_eq!(
            segments,
            vec![Segment::Text("Harry Warner"), Segment::Suffix(", Jr.")]
        );

        let segments = protect("A. E. van Vogt", &config);
        assert_eq!(
            segments,
            vec![
                Segment::Text("A. E."),
                Segment::Prefix(" van "),
                Segment::Text("Vogt"),
            ]
        );
    }

    #[test]
    fn test_protect_respects_word_boundary() {
        let config = TextConfig::default();
        let segments = protect("John IIlla", &config);
        assert!(segments.iter().all(|s| !s.is_protected()));
    }

    #[test]
    fn test_lower_only_ignores_capitalized_phrases() {
        let config = TextConfigBuilder::new()
            .case_mode(CaseMode::LowerOnly)
            .build()
            .unwrap();
        assert!(protect("Harry Warner, Jr.", &config)
            .iter()
            .all(|s| !s.is_protected()));
        assert!(protect("harry warner, jr.", &config)
            .iter()
            .any(Segment::is_protected));
    }

    #[test]
    fn test_sort_form() {
        assert_eq!(sort_form("Isaac Asimov"), "Asimov, Isaac");
        assert_eq!(sort_form("John W. Campbell"), "Campbell, John W.");
        assert_eq!(sort_form("Cher"), "Cher");
        assert_eq!(sort_form("  "), "");
    }

    #[test]
    fn test_sort_form_keeps_suffix_attached() {
        assert_eq!(sort_form("Harry Warner, Jr."), "Warner, Harry, Jr.");
        assert_eq!(sort_form("John Smith III"), "Smith, John III");
    }

    #[test]
    fn test_sort_form_binds_particles() {
        assert_eq!(sort_form("A. E. van Vogt"), "van Vogt, A. E.");
        assert_eq!(sort_form("Ursula K. Le Guin"), "Le Guin, Ursula K.");
    }

    #[test]
    fn test_sort_form_already_sorted() {
        assert_eq!(sort_form(" Asimov, Isaac "), "Asimov, Isaac");
    }

    #[test]
    fn test_person_name_display() {
        let name = PersonName::parse("Harry  Warner, Jr.");
        assert_eq!(name.given, vec!["Harry".to_string()]);
        assert_eq!(name.surname, "Warner");
        assert_eq!(name.suffix.as_deref(), Some(", Jr."));
        assert_eq!(name.display(), "Harry Warner, Jr.");
        assert_eq!(name.to_string(), "Harry Warner, Jr.");
    }

    #[test]
    fn test_split_inverted_name() {
        assert_eq!(split_name_list("Smith, John"), vec!["John Smith"]);
        assert_eq!(
            split_name_list("Heinlein, Robert A."),
            vec!["Robert A. Heinlein"]
        );
    }

    #[test]
    fn test_split_inverted_name_with_suffix() {
        assert_eq!(
            split_name_list("Warner, Jr., Harry"),
            vec!["Harry Warner, Jr."]
        );
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_name_list("A, B, and C"), vec!["A", "B", "C"]);
        assert_eq!(
            split_name_list("E. E. Smith, Poul Anderson"),
            vec!["E. E. Smith", "Poul Anderson"]
        );
        assert_eq!(
            split_name_list("Bob Tucker & Walt Willis/Lee Hoffman"),
            vec!["Bob Tucker", "Walt Willis", "Lee Hoffman"]
        );
    }

    #[test]
    fn test_split_keeps_suffix_with_name() {
        assert_eq!(
            split_name_list("Harry Warner, Jr. and Bob Tucker"),
            vec!["Harry Warner, Jr.", "Bob Tucker"]
        );
    }

    #[test]
    fn test_split_does_not_break_inside_words() {
        assert_eq!(
            split_name_list("Ferdinand Andrews and Sandy Grand"),
            vec!["Ferdinand Andrews", "Sandy Grand"]
        );
    }

    #[test]
    fn test_split_particle_at_start_of_name() {
        assert_eq!(
            split_name_list("Jim Smith and Del Coger"),
            vec!["Jim Smith", "Del Coger"]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split_name_list("").is_empty());
        assert!(split_name_list(" , ").is_empty());
    }

    #[test]
    fn test_split_on_custom_pattern() {
        let re = Regex::new(r";\s*").unwrap();
        assert_eq!(
            split_name_list_on("Harry Warner, Jr.; Bob Tucker", &re),
            vec!["Harry Warner, Jr.", "Bob Tucker"]
        );
    }

    #[test]
    fn test_split_with_configured_delimiter() {
        let config = TextConfigBuilder::new()
            .name_delimiter_regex(r"\s*\+\s*")
            .build()
            .unwrap();
        assert_eq!(
            split_name_list_with_config("Bob Tucker + Walt Willis", &config),
            vec!["Bob Tucker", "Walt Willis"]
        );
    }

    #[test]
    fn test_normalize_persons_name() {
        assert_eq!(
            normalize_persons_name("Johnson, Lyndon Baines"),
            "Lyndon Baines Johnson"
        );
        assert_eq!(normalize_persons_name("A, B, and C"), "A, B, and C");
    }

    #[test]
    fn test_flatten_name_for_sorting() {
        assert_eq!(flatten_name_for_sorting("Jörg O'Neil"), "o'neil jorg");
        assert_eq!(flatten_name_for_sorting("Harry Warner, Jr."), "warner harry jr");
    }
}
