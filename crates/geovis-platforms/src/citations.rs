//! Citation derivation for providers without a structured citation list.

use regex::Regex;

/// Pull URLs out of free answer text.
///
/// Used for providers that embed their sources inline instead of returning
/// a structured citation array. Trailing sentence punctuation and closing
/// brackets are trimmed since prose URLs usually butt up against them.
#[must_use]
pub fn derive_citation_urls(text: &str) -> Vec<String> {
    let re = Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("valid url regex");
    let mut urls: Vec<String> = re
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?'])
                .to_string()
        })
        .filter(|u| !u.is_empty())
        .collect();
    urls.dedup();
    urls
}
