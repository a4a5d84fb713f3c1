//! Locating `<tag>…</tag>` spans in scraped HTML-ish text.
//!
//! Every scan is non-greedy and does not count nesting: for
//! `<b>a<b>c</b>d</b>` the span for `b` ends at the first `</b>`. A miss is
//! never an error; it yields [`TaggedSpan::default()`], the all-empty span.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::Serialize;

/// Tag name that matches any opening marker.
pub const WILDCARD: &str = "*";

/// One `leading <tag>inner</tag> trailing` split of a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaggedSpan {
    pub leading: String,
    pub tag: String,
    pub inner: String,
    pub trailing: String,
}

impl TaggedSpan {
    /// True for the "not found" sentinel.
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty()
            && self.tag.is_empty()
            && self.inner.is_empty()
            && self.trailing.is_empty()
    }

    /// The input with the matched span cut out.
    pub fn remainder(&self) -> String {
        format!("{}{}", self.leading, self.trailing)
    }
}

/// Variations on a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Match the tag name regardless of case.
    pub case_insensitive: bool,
    /// Remove simple `<x>`/`</x>` markup from the captured inner text.
    pub strip_markup: bool,
    /// Return the opening and closing markers as part of `inner`.
    pub include_markers: bool,
    /// Trim surrounding whitespace from the input before scanning.
    pub trim_whitespace: bool,
}

/// Find the first `<tag …>…</tag>` in `text`.
///
/// `tag` may be [`WILDCARD`], in which case the name read from each opening
/// marker decides which closer ends the span, so `<i>x</b>` never pairs up.
pub fn find_tagged(text: &str, tag: &str, options: &ScanOptions) -> TaggedSpan {
    let text = if options.trim_whitespace {
        text.trim()
    } else {
        text
    };

    let found = if tag == WILDCARD {
        find_any_tag(text, options.case_insensitive)
    } else {
        find_named_tag(text, tag, options.case_insensitive)
    };

    let Some(m) = found else {
        tracing::trace!(tag, "no tagged span");
        return TaggedSpan::default();
    };

    let inner = if options.include_markers {
        &text[m.outer_start..m.outer_end]
    } else {
        &text[m.inner_start..m.inner_end]
    };
    let inner = if options.strip_markup {
        remove_all_html_tags(inner)
    } else {
        inner.to_string()
    };

    TaggedSpan {
        leading: text[..m.outer_start].to_string(),
        tag: m.name,
        inner,
        trailing: text[m.outer_end..].to_string(),
    }
}

/// Find the first pair of matching markers of any name (case-insensitive).
pub fn find_next_tagged(text: &str) -> TaggedSpan {
    let options = ScanOptions {
        case_insensitive: true,
        ..Default::default()
    };
    find_tagged(text, WILDCARD, &options)
}

/// Return the inner text of the first `tag` span and the input with that span
/// removed. On a miss the inner text is empty and the input comes back whole.
pub fn find_bracketed_text(text: &str, tag: &str, options: &ScanOptions) -> (String, String) {
    let span = find_tagged(text, tag, options);
    if span.is_empty() {
        let text = if options.trim_whitespace {
            text.trim()
        } else {
            text
        };
        return (String::new(), text.to_string());
    }
    let remainder = span.remainder();
    (span.inner, remainder)
}

/// [`find_bracketed_text`] on trimmed input with the inner markup left alone.
pub fn find_bracketed_text_trimmed(
    text: &str,
    tag: &str,
    case_insensitive: bool,
    include_markers: bool,
) -> (String, String) {
    let options = ScanOptions {
        case_insensitive,
        strip_markup: false,
        include_markers,
        trim_whitespace: true,
    };
    find_bracketed_text(text, tag, &options)
}

struct TagMatch {
    name: String,
    outer_start: usize,
    inner_start: usize,
    inner_end: usize,
    outer_end: usize,
}

fn find_named_tag(text: &str, tag: &str, case_insensitive: bool) -> Option<TagMatch> {
    let tag = regex::escape(tag);
    let pattern = format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>");
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .build()
        .ok()?;
    let caps = re.captures(text)?;
    let outer = caps.get(0)?;
    let inner = caps.get(1)?;
    // Report the name as written, which may differ in case from `tag`.
    let after_bracket = &text[outer.start() + 1..];
    Some(TagMatch {
        name: after_bracket[..tag_name_len(after_bracket)].to_string(),
        outer_start: outer.start(),
        inner_start: inner.start(),
        inner_end: inner.end(),
        outer_end: outer.end(),
    })
}

fn find_any_tag(text: &str, case_insensitive: bool) -> Option<TagMatch> {
    static OPEN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<([a-zA-Z0-9][^\s/>]*)(?:\s[^>]*)?>").unwrap());

    for open in OPEN_RE.captures_iter(text) {
        let (Some(outer), Some(name)) = (open.get(0), open.get(1)) else {
            continue;
        };
        if let Some((start, end)) =
            find_closer(&text[outer.end()..], name.as_str(), case_insensitive)
        {
            return Some(TagMatch {
                name: name.as_str().to_string(),
                outer_start: outer.start(),
                inner_start: outer.end(),
                inner_end: outer.end() + start,
                outer_end: outer.end() + end,
            });
        }
    }
    None
}

/// Byte range of the first `</name>` in `haystack`, allowing whitespace
/// before the `>`. Case folding is ASCII only.
fn find_closer(haystack: &str, name: &str, case_insensitive: bool) -> Option<(usize, usize)> {
    let name = name.as_bytes();
    for (start, _) in haystack.match_indices("</") {
        let name_end = start + 2 + name.len();
        let Some(candidate) = haystack.as_bytes().get(start + 2..name_end) else {
            break;
        };
        let same = if case_insensitive {
            candidate.eq_ignore_ascii_case(name)
        } else {
            candidate == name
        };
        if !same {
            continue;
        }
        // Only ASCII bytes may differ, so this is still a char boundary.
        let after = haystack[name_end..].trim_start();
        if after.starts_with('>') {
            return Some((start, haystack.len() - after.len() + 1));
        }
    }
    None
}

fn tag_name_len(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '>')
        .unwrap_or(s.len())
}

/// Split at the first span delimited by the literal markers `open` and
/// `close`, which must enclose at least one character.
///
/// Returns `(leading, inner, trailing)`, or `(text, "", "")` when there is no
/// such span.
pub fn parse_first_bracketed(text: &str, open: &str, close: &str) -> (String, String, String) {
    let miss = || (text.to_string(), String::new(), String::new());
    if open.is_empty() || close.is_empty() {
        return miss();
    }
    let Some(start) = text.find(open) else {
        return miss();
    };
    let inner_start = start + open.len();
    // The interior must hold at least one character.
    let Some(first) = text[inner_start..].chars().next() else {
        return miss();
    };
    let search_from = inner_start + first.len_utf8();
    let Some(rel) = text[search_from..].find(close) else {
        return miss();
    };
    let inner_end = search_from + rel;
    (
        text[..start].to_string(),
        text[inner_start..inner_end].to_string(),
        text[inner_end + close.len()..].to_string(),
    )
}

/// If the whole of `text` (outer whitespace aside) is one `<tag>…</tag>`,
/// peel it off. Returns the inside and whether anything was peeled.
pub fn remove_top_tag(text: &str, tag: &str) -> (String, bool) {
    let tag = regex::escape(tag);
    let Ok(re) = Regex::new(&format!(r"(?s)^\s*<{tag}>(.*?)</{tag}>\s*$")) else {
        return (text.to_string(), false);
    };
    match re.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => (inner.as_str().to_string(), true),
        None => (text.to_string(), false),
    }
}

/// Replace the first `<tag>…</tag>` span, markers included, with
/// `replacement` (taken literally). Returns the text and whether a span was
/// replaced.
pub fn replace_first_tagged(
    text: &str,
    tag: &str,
    replacement: &str,
    case_insensitive: bool,
) -> (String, bool) {
    let tag = regex::escape(tag);
    let Ok(re) = RegexBuilder::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>"))
        .case_insensitive(case_insensitive)
        .build()
    else {
        return (text.to_string(), false);
    };
    if !re.is_match(text) {
        return (text.to_string(), false);
    }
    (re.replacen(text, 1, NoExpand(replacement)).into_owned(), true)
}

/// Peel up to `layers` outer `<tag>…</tag>` wrappers from `text`.
pub fn strip_specific_tag(text: &str, tag: &str, case_sensitive: bool, layers: usize) -> String {
    let tag = regex::escape(tag);
    let Ok(re) = RegexBuilder::new(&format!(r"(?s)^<{tag}>(.*)</{tag}>$"))
        .case_insensitive(!case_sensitive)
        .build()
    else {
        return text.to_string();
    };

    let mut current = text.to_string();
    for _ in 0..layers {
        let Some(inner) = re.captures(&current).and_then(|c| c.get(1)) else {
            break;
        };
        current = inner.as_str().to_string();
    }
    current
}

/// Whether `text` contains any `<…>` marker with something inside it.
pub fn contains_tagged_text(text: &str) -> bool {
    static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]+>").unwrap());
    MARKER_RE.is_match(text)
}

/// Remove simple attribute-free markers such as `<b>`, `</i>`, `<br>`.
pub fn remove_all_html_tags(text: &str) -> String {
    static SIMPLE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z0-9]+>").unwrap());
    SIMPLE_TAG_RE.replace_all(text, "").into_owned()
}

/// Replace `<a …>text</a>` with `text`. With `repeat` every link is
/// unwrapped, otherwise only the first.
pub fn remove_hyperlinks(text: &str, repeat: bool) -> String {
    static LINK_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)<a(?:\s[^>]*)?>([^<>]*?)</a>").unwrap());
    let limit = if repeat { 0 } else { 1 };
    LINK_RE.replacen(text, limit, "$1").into_owned()
}

/// Contents of the first `[[…]]` wiki link, or an empty string.
pub fn find_wiki_bracketed_text(text: &str) -> String {
    static WIKI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.+?)\]\]").unwrap());
    WIKI_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Split on runs of line breaks: `<br>`, `</br>`, `<br/>` in any case, and the
/// literal two-character markers `\n` and `/n`. Pieces are trimmed and empty
/// pieces dropped.
pub fn split_on_line_breaks(text: &str) -> Vec<String> {
    static ESCAPED_NL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([\\/]n)+").unwrap());
    static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?br/?>").unwrap());

    let text = ESCAPED_NL_RE.replace_all(text, "<br>");
    BR_RE
        .split(&text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
