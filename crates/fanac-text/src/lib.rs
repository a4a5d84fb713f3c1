use thiserror::Error;

pub mod config;
pub mod config_file;
pub mod names;
pub mod number;
pub mod page_name;
pub mod roman;
pub mod scanner;
pub mod serial;
pub mod sort_key;

pub use config::{CaseMode, ListOverride, TextConfig, TextConfigBuilder};
pub use names::{
    PersonName, flatten_name_for_sorting, normalize_persons_name, sort_form, split_name_list,
    split_name_list_on,
};
pub use number::{Number, interpret_integer, interpret_number, try_interpret_number};
pub use page_name::{
    WikiLink, extract_wiki_link, file_name_to_page_name, page_name_to_file_name,
    page_name_to_url_name, split_wiki_link, url_name_to_page_name, wikidot_canonical_name,
};
pub use roman::decode_roman;
pub use scanner::{ScanOptions, TaggedSpan, find_bracketed_text, find_next_tagged, find_tagged};
pub use serial::{
    SerialDesignation, SerialOptions, SerialRule, drop_trailing_number,
    extract_trailing_serial_designation,
};
pub use sort_key::{sort_key_for_messy_number, sort_title};

#[derive(Error, Debug)]
pub enum TextError {
    #[error("uninterpretable number: '{input}'")]
    Uninterpretable { input: String },
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Pull the serial designation out of the first `<tag>…</tag>` span of a
/// scraped citation and compute its sort key.
///
/// Pipeline:
/// 1. Scan `html` for the first `tag` span using `config.scan`
/// 2. Extract the trailing serial designation from the span text
/// 3. Key the designation's number for ordering
///
/// Returns `None` when the tag is not present.
pub fn designation_from_markup(
    html: &str,
    tag: &str,
    config: &TextConfig,
) -> Option<(SerialDesignation, f64)> {
    let span = find_tagged(html, tag, &config.scan);
    if span.is_empty() {
        return None;
    }
    let designation = serial::extract_with_options(&span.inner, config.serial);
    let key = sort_key_for_messy_number(&designation.number_with_suffix());
    Some((designation, key))
}
