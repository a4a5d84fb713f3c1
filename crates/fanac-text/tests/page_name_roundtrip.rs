//! Property tests for the page-name codecs.
//!
//! Page names are generated from letters, digits, spaces and every character
//! the file-name form has to escape.

use fanac_text::{
    file_name_to_page_name, page_name_to_file_name, page_name_to_url_name, url_name_to_page_name,
};
use proptest::prelude::*;

const FILE_ILLEGAL: &[char] = &['*', '/', '?', '"', '<', '>', '\\', '|', ':'];

fn page_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r#"[a-zA-Z0-9 *?/"<>\\|:]{0,40}"#,
        1 => r"[cC][oO][nN]",
        1 => r"([A-Z][a-z]{1,8} ){0,4}[A-Z]?[a-z]{0,8}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn file_name_round_trips(page in page_name()) {
        let file = page_name_to_file_name(&page);
        prop_assert_eq!(file_name_to_page_name(&file), page);
    }

    #[test]
    fn file_name_has_no_illegal_characters(page in page_name()) {
        let file = page_name_to_file_name(&page);
        prop_assert!(!file.contains(FILE_ILLEGAL), "{:?} -> {:?}", page, file);
        prop_assert!(!file.eq_ignore_ascii_case("con"));
    }

    #[test]
    fn conventionally_cased_names_are_unflagged(page in r"([A-Z][a-z]{1,8} ){0,4}[A-Z][a-z]{0,8}") {
        prop_assume!(!page.eq_ignore_ascii_case("con"));
        prop_assert_eq!(page_name_to_file_name(&page), page);
    }

    #[test]
    fn page_to_url_name_is_idempotent(page in r"[a-zA-Z0-9 &?]{0,40}") {
        let once = page_name_to_url_name(&page);
        prop_assert_eq!(page_name_to_url_name(&once), once);
    }

    #[test]
    fn url_to_page_name_is_idempotent(url in r"[a-zA-Z0-9 _]{0,40}") {
        let once = url_name_to_page_name(&url);
        prop_assert_eq!(url_name_to_page_name(&once), once);
    }

    #[test]
    fn url_name_round_trips_up_to_first_letter(page in r"[a-zA-Z0-9 &?]{0,40}") {
        let mut expected = page.clone();
        if let Some(first) = expected.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        prop_assert_eq!(url_name_to_page_name(&page_name_to_url_name(&page)), expected);
    }
}

#[test]
fn url_name_leaves_other_characters_alone() {
    // Characters beyond `&` and `?` are not escaped, so `%` survives as-is
    // and the inverse cannot tell a literal "%26" from an escaped `&`.
    assert_eq!(page_name_to_url_name("100% fan"), "100%_fan");
    assert_eq!(url_name_to_page_name("A%26B"), "A&B");
}
