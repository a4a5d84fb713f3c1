/// Decode a run of Roman numerals into an integer.
///
/// The run is read right to left: a numeral worth less than the last one
/// added is subtracted (`IX` = 9), anything else is added. Spaces are ignored
/// and case does not matter.
///
/// There is no well-formedness check, so `IIII` decodes to 4 and `VX` to 5.
/// Any character outside `MDCLXVI` fails the whole run, as does an empty run.
pub fn decode_roman(text: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let mut last: u32 = 0;
    let mut seen = false;

    for c in text.chars().rev().filter(|c| *c != ' ') {
        let value = numeral_value(c)?;
        seen = true;
        if value < last {
            total = total.saturating_sub(value);
            continue;
        }
        total = total.saturating_add(value);
        last = value;
    }

    seen.then_some(total)
}

fn numeral_value(c: char) -> Option<u32> {
    match c.to_ascii_lowercase() {
        'm' => Some(1000),
        'd' => Some(500),
        'c' => Some(100),
        'l' => Some(50),
        'x' => Some(10),
        'v' => Some(5),
        'i' => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_numerals() {
        assert_eq!(decode_roman("i"), Some(1));
        assert_eq!(decode_roman("xiv"), Some(14));
        assert_eq!(decode_roman("XLII"), Some(42));
        assert_eq!(decode_roman("mcmxcix"), Some(1999));
    }

    #[test]
    fn test_non_standard_sequences_still_decode() {
        assert_eq!(decode_roman("IIII"), Some(4));
        assert_eq!(decode_roman("VX"), Some(5));
    }

    #[test]
    fn test_invalid_character_fails_whole_run() {
        assert_eq!(decode_roman("xyz"), None);
        assert_eq!(decode_roman("XIV2"), None);
    }

    #[test]
    fn test_spaces_ignored() {
        assert_eq!(decode_roman("X IV"), Some(14));
    }

    #[test]
    fn test_long_run_saturates() {
        assert_eq!(decode_roman(&"M".repeat(5_000_000)), Some(u32::MAX));
    }

    #[test]
    fn test_empty() {
        assert_eq!(decode_roman(""), None);
        assert_eq!(decode_roman("   "), None);
    }
}
