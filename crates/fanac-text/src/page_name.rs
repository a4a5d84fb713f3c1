//! Conversions between a wiki page name and its URL and file-system forms.
//!
//! The file-system form must survive case-insensitive file systems, so case
//! is carried explicitly: a letter whose case differs from what its position
//! suggests (upper at the start and after a space, lower elsewhere) is
//! written in the opposite case and followed by [`CASE_FLAG`]. Characters
//! that are illegal in file names are spelled out as `;name;` tokens.
//!
//! `file_name_to_page_name(&page_name_to_file_name(p)) == p` holds for any
//! page name made of letters, digits, spaces and the escaped characters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Marks a letter whose case was inverted in a file name.
pub const CASE_FLAG: &str = "^^";

/// Characters percent-escaped in URL names.
const URL_ESCAPES: &[(char, &str)] = &[('&', "%26"), ('?', "%3F")];

/// Characters illegal in file names and the tokens standing in for them.
const FILE_NAME_ESCAPES: &[(char, &str)] = &[
    ('*', ";star;"),
    ('/', ";slash;"),
    ('?', ";ques;"),
    ('"', ";quot;"),
    ('<', ";lt;"),
    ('>', ";gt;"),
    ('\\', ";back;"),
    ('|', ";bar;"),
    (':', ";colon;"),
];

/// `"the fooman & co?"` → `"The_fooman_%26_co%3F"`.
///
/// Only `&` and `?` are escaped; other URL-unsafe characters pass through,
/// so the inverse is lossy for them.
pub fn page_name_to_url_name(page: &str) -> String {
    let mut out = String::with_capacity(page.len());
    for c in page.chars() {
        if c == ' ' {
            out.push('_');
        } else if let Some((_, escaped)) = URL_ESCAPES.iter().find(|(k, _)| *k == c) {
            out.push_str(escaped);
        } else {
            out.push(c);
        }
    }
    upper_first(&out)
}

pub fn url_name_to_page_name(url: &str) -> String {
    let mut page = url.to_string();
    for (c, escaped) in URL_ESCAPES {
        page = page.replace(escaped, &c.to_string());
    }
    page.replace('_', " ")
}

/// Encode a page name as a legal, case-preserving file name.
///
/// `"Fancy 3"` → `"Fancy 3"`, `"iPhone"` → `"I^^p^^hone"`,
/// `"What?"` → `"What;ques;"`. The reserved device name `con` in any case
/// is wrapped as `;con;`.
pub fn page_name_to_file_name(page: &str) -> String {
    let wrapped;
    let page = if page.eq_ignore_ascii_case("con") {
        wrapped = format!(";{page};");
        wrapped.as_str()
    } else {
        page
    };

    let mut out = String::with_capacity(page.len() + 8);
    let mut prev: Option<char> = None;
    for c in page.chars() {
        let want_upper = prev.is_none_or(|p| p == ' ');
        match flip_case(c) {
            Some(flipped) if c.is_uppercase() != want_upper => {
                out.push(flipped);
                out.push_str(CASE_FLAG);
            }
            _ => out.push(c),
        }
        prev = Some(c);
    }

    let mut escaped = String::with_capacity(out.len());
    for c in out.chars() {
        match FILE_NAME_ESCAPES.iter().find(|(k, _)| *k == c) {
            Some((_, token)) => escaped.push_str(token),
            None => escaped.push(c),
        }
    }
    escaped
}

/// Inverse of [`page_name_to_file_name`].
pub fn file_name_to_page_name(file: &str) -> String {
    let unescaped = unescape_file_tokens(file);

    let mut page = String::with_capacity(unescaped.len());
    let mut rest = unescaped.as_str();
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        if let Some(after) = rest.strip_prefix(CASE_FLAG)
            && let Some(flipped) = flip_case(c)
        {
            page.push(flipped);
            rest = after;
        } else {
            page.push(c);
        }
    }

    if page.eq_ignore_ascii_case(";con;") {
        return page[1..page.len() - 1].to_string();
    }
    page
}

/// Single left-to-right pass, so the tail of one token and the head of the
/// next can never be read as a third.
fn unescape_file_tokens(file: &str) -> String {
    let mut out = String::with_capacity(file.len());
    let mut rest = file;
    'scan: while let Some(c) = rest.chars().next() {
        if c == ';' {
            for (plain, token) in FILE_NAME_ESCAPES {
                if let Some(after) = rest.strip_prefix(token) {
                    out.push(*plain);
                    rest = after;
                    continue 'scan;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// The other-case form of `c`, for letters whose case maps one-to-one.
fn flip_case(c: char) -> Option<char> {
    let flipped = if c.is_uppercase() {
        single_char(c.to_lowercase())?
    } else if c.is_lowercase() {
        single_char(c.to_uppercase())?
    } else {
        return None;
    };
    let back = if flipped.is_uppercase() {
        single_char(flipped.to_lowercase())
    } else {
        single_char(flipped.to_uppercase())
    };
    (back == Some(c) && flipped.is_uppercase() != c.is_uppercase()).then_some(flipped)
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Legacy Wikidot page name: first character upper, the rest lower, runs of
/// anything but ASCII letters and digits collapsed to `-`, no hyphen at
/// either end.
pub fn wikidot_canonical_name(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let cased: String = first
        .to_uppercase()
        .chain(chars.as_str().to_lowercase().chars())
        .collect();
    if chars.next().is_none() {
        return cased;
    }

    static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());
    let hyphenated = NON_ALNUM_RE.replace_all(&cased, "-");
    let mut canonical: &str = &hyphenated;
    if canonical.len() > 1 {
        canonical = canonical.strip_prefix('-').unwrap_or(canonical);
    }
    if canonical.len() > 1 {
        canonical = canonical.strip_suffix('-').unwrap_or(canonical);
    }
    canonical.to_string()
}

/// The parts of a MediaWiki link `[[link#anchor|display]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WikiLink {
    /// Target page, first character upper-cased.
    pub link: String,
    pub anchor: String,
    pub display: String,
}

/// Split `[[link#anchor|display]]` into its parts. The brackets are optional
/// and so are the anchor and display text.
pub fn split_wiki_link(text: &str) -> WikiLink {
    static LINK_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(?:\[\[)?([^|#\]]+)(?:#([^|\]]*))?(?:\|([^\]]*))?(?:\]\])?").unwrap()
    });
    let Some(caps) = LINK_RE.captures(text) else {
        return WikiLink::default();
    };
    let part = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
    WikiLink {
        link: upper_first(&part(1)),
        anchor: part(2),
        display: part(3),
    }
}

/// The target page of a link. Text outside `[[…]]` is ignored when the
/// brackets are present; anchor and display text are dropped.
///
/// `"see [[Fancy 3#Intro|the intro]] here"` → `"Fancy 3"`.
pub fn extract_wiki_link(text: &str) -> String {
    let inner = match (text.find("[["), text.find("]]")) {
        (Some(open), Some(close)) if close > open => &text[open + 2..close],
        _ => text,
    };
    let without_display = inner.split('|').next().unwrap_or_default();
    without_display
        .split('#')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
