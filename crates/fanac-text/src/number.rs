use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::TextError;
use crate::roman::decode_roman;

/// A value recovered from a messy serial number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Decimal(d) => d,
        }
    }

    /// Truncate toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Integer(i) => i,
            Number::Decimal(d) => d.trunc() as i64,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// Interpret a loosely formatted serial number, logging when nothing fits.
///
/// See [`try_interpret_number`] for the accepted forms. Empty input yields
/// `None` without a diagnostic.
pub fn interpret_number(text: &str) -> Option<Number> {
    match try_interpret_number(text) {
        Ok(n) => Some(n),
        Err(TextError::Uninterpretable { input }) if !input.is_empty() => {
            tracing::warn!(input = %input, "uninterpretable number");
            None
        }
        Err(_) => None,
    }
}

/// [`interpret_number`] truncated to an integer.
pub fn interpret_integer(text: &str) -> Option<i64> {
    interpret_number(text).map(Number::as_i64)
}

/// Interpret a loosely formatted serial number.
///
/// Tries, in order:
/// - `12` plain integer
/// - `12-15` range (first bound only)
/// - `12.5` and `.5` decimals
/// - `3 1/2` whole number plus fraction
/// - `12a` / `12 ab` number with trailing letters (letters dropped)
/// - `XIV` a run of Roman numerals
pub fn try_interpret_number(text: &str) -> Result<Number, TextError> {
    let text = text.trim();
    let uninterpretable = || TextError::Uninterpretable {
        input: text.to_string(),
    };

    if let Ok(i) = text.parse::<i64>() {
        return Ok(Number::Integer(i));
    }

    static RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)\s*-\s*[0-9]+$").unwrap());
    if let Some(caps) = RANGE_RE.captures(text) {
        return caps[1]
            .parse()
            .map(Number::Integer)
            .map_err(|_| uninterpretable());
    }

    static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*\.[0-9]+$").unwrap());
    if DECIMAL_RE.is_match(text) {
        return text
            .parse()
            .map(Number::Decimal)
            .map_err(|_| uninterpretable());
    }

    static FRACTION_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([0-9]+)\s+([0-9]+)/([0-9]+)$").unwrap());
    if let Some(caps) = FRACTION_RE.captures(text) {
        let whole: f64 = caps[1].parse().map_err(|_| uninterpretable())?;
        let numerator: f64 = caps[2].parse().map_err(|_| uninterpretable())?;
        let denominator: f64 = caps[3].parse().map_err(|_| uninterpretable())?;
        if denominator == 0.0 {
            return Err(uninterpretable());
        }
        return Ok(Number::Decimal(whole + numerator / denominator));
    }

    static LETTERS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([0-9]+)\s?[a-zA-Z]+$").unwrap());
    if let Some(caps) = LETTERS_RE.captures(text) {
        return caps[1]
            .parse()
            .map(Number::Integer)
            .map_err(|_| uninterpretable());
    }

    static ROMAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[IVXLC]+$").unwrap());
    if ROMAN_RE.is_match(text)
        && let Some(value) = decode_roman(text)
    {
        return Ok(Number::Integer(i64::from(value)));
    }

    Err(uninterpretable())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integer() {
        assert_eq!(try_interpret_number("42").unwrap(), Number::Integer(42));
        assert_eq!(try_interpret_number("  7 ").unwrap(), Number::Integer(7));
    }

    #[test]
    fn test_range_keeps_first_bound() {
        assert_eq!(try_interpret_number("29-35").unwrap(), Number::Integer(29));
        assert_eq!(try_interpret_number("29 - 35").unwrap(), Number::Integer(29));
    }

    #[test]
    fn test_decimals() {
        assert_eq!(try_interpret_number("12.5").unwrap(), Number::Decimal(12.5));
        assert_eq!(try_interpret_number(".5").unwrap(), Number::Decimal(0.5));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(try_interpret_number("3 1/2").unwrap(), Number::Decimal(3.5));
        assert_eq!(
            try_interpret_number("10 3/4").unwrap(),
            Number::Decimal(10.75)
        );
        assert!(try_interpret_number("3 1/0").is_err());
    }

    #[test]
    fn test_trailing_letters_dropped() {
        assert_eq!(try_interpret_number("32a").unwrap(), Number::Integer(32));
        assert_eq!(try_interpret_number("32 ab").unwrap(), Number::Integer(32));
    }

    #[test]
    fn test_roman() {
        assert_eq!(try_interpret_number("XIV").unwrap(), Number::Integer(14));
    }

    #[test]
    fn test_uninterpretable() {
        let err = try_interpret_number("fnord").unwrap_err();
        assert!(matches!(err, TextError::Uninterpretable { ref input } if input == "fnord"));
        assert_eq!(interpret_number("fnord"), None);
        assert_eq!(interpret_number(""), None);
    }

    #[test]
    fn test_interpret_integer_truncates() {
        assert_eq!(interpret_integer("12.9"), Some(12));
        assert_eq!(interpret_integer("3 1/2"), Some(3));
    }
}
