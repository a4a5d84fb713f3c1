use once_cell::sync::Lazy;
use regex::Regex;

use crate::number::interpret_number;
use crate::roman::decode_roman;

/// Key for empty designations, which sort before everything.
pub const SORT_FIRST: f64 = -99_999_999.0;
/// Key for designations that can't be read as a number, which sort last.
pub const SORT_LAST: f64 = 99_999_999.0;

/// Rank order for suffix letters. The leading blank ranks a missing letter
/// below `a`; lower case ranks below upper case.
const LETTER_RANKS: &str = " abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Map a messy serial number to a float that orders issues sensibly.
///
/// - `""` sorts first, unreadable text sorts last
/// - `12`, `12.5`, `29-35`, `3 1/2` key to their numeric value
/// - `XIV` keys to 14
/// - `32a` keys to 32 plus a fraction ranking the letters, so that
///   `32 < 32a < 32b < 33`
///
/// Only the first two suffix letters are ranked: `32abc` and `32ab` share a
/// key. Distinct inputs may collide.
pub fn sort_key_for_messy_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return SORT_FIRST;
    }

    static SPLIT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([0-9,./ \-]*)([a-zA-Z ]*)$").unwrap());
    let Some(caps) = SPLIT_RE.captures(text) else {
        tracing::debug!(input = text, "messy number has no numeric/alphabetic split");
        return SORT_LAST;
    };
    let numeric = caps.get(1).map_or("", |m| m.as_str()).trim();
    let alpha = caps.get(2).map_or("", |m| m.as_str()).trim();

    if numeric.is_empty() {
        return decode_roman(alpha).map_or(SORT_LAST, f64::from);
    }

    let Some(value) = interpret_number(numeric) else {
        return SORT_LAST;
    };
    let value = value.as_f64();

    let mut letters = alpha.chars();
    let Some(first) = letters.next() else {
        return value;
    };
    let Some(first_rank) = letter_rank(first) else {
        return SORT_LAST;
    };
    let second_rank = letters.next().and_then(letter_rank).unwrap_or(0);

    value + first_rank as f64 / 100.0 + second_rank as f64 / 10_000.0
}

fn letter_rank(c: char) -> Option<usize> {
    LETTER_RANKS.find(c)
}

/// Case-folded sort form of a title with a leading article moved to the end:
/// `"The Foo"` → `"foo, the"`.
pub fn sort_title(text: &str) -> String {
    let text = text.trim().to_lowercase();
    for article in ["a", "an", "the"] {
        if let Some(rest) = text
            .strip_prefix(article)
            .and_then(|r| r.strip_prefix(' '))
        {
            return format!("{}, {}", rest, article);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(sort_key_for_messy_number(""), SORT_FIRST);
        assert!(sort_key_for_messy_number("  ") < sort_key_for_messy_number("1"));
    }

    #[test]
    fn test_consecutive_integers_increase() {
        for n in 0..500u32 {
            assert!(
                sort_key_for_messy_number(&n.to_string())
                    < sort_key_for_messy_number(&(n + 1).to_string()),
                "{} should sort before {}",
                n,
                n + 1
            );
        }
    }

    #[test]
    fn test_letter_suffixes_between_numbers() {
        let k32 = sort_key_for_messy_number("32");
        let k32a = sort_key_for_messy_number("32a");
        let k32b = sort_key_for_messy_number("32b");
        let k33 = sort_key_for_messy_number("33");
        assert!(k32 < k32a);
        assert!(k32a < k32b);
        assert!(k32b < k33);
        assert!(sort_key_for_messy_number("32Z") < k33);
    }

    #[test]
    fn test_two_letter_suffixes() {
        assert!(sort_key_for_messy_number("32a") < sort_key_for_messy_number("32aa"));
        assert!(sort_key_for_messy_number("32ab") < sort_key_for_messy_number("32b"));
    }

    #[test]
    fn test_long_suffixes_alias_to_first_two_letters() {
        assert_eq!(
            sort_key_for_messy_number("32abc"),
            sort_key_for_messy_number("32abz")
        );
    }

    #[test]
    fn test_roman_only() {
        assert_eq!(sort_key_for_messy_number("XIV"), 14.0);
    }

    #[test]
    fn test_unreadable_sorts_last() {
        assert_eq!(sort_key_for_messy_number("Annual"), SORT_LAST);
        assert_eq!(sort_key_for_messy_number("12#"), SORT_LAST);
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(sort_key_for_messy_number("29-35"), 29.0);
        assert_eq!(sort_key_for_messy_number("12.5"), 12.5);
        assert_eq!(sort_key_for_messy_number("3 1/2"), 3.5);
    }

    #[test]
    fn test_sort_title() {
        assert_eq!(sort_title("The Fooman"), "fooman, the");
        assert_eq!(sort_title(" An Apple"), "apple, an");
        assert_eq!(sort_title("Theory"), "theory");
        assert_eq!(sort_title(""), "");
    }
}
