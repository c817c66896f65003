//! HTML metadata extraction helpers.
//!
//! Regex-based pulls of the handful of head/body fields probe generation
//! cares about. Not a general HTML parser: attribute order is handled for
//! the two common layouts (`name` before `content` and the reverse) and
//! everything else is ignored.

use regex::Regex;

use crate::fetch::SiteContext;

const MAX_HEADINGS: usize = 6;
const MAX_HEADING_CHARS: usize = 120;

pub(crate) fn extract_site_context(html: &str) -> SiteContext {
    let title = extract_title(html).or_else(|| extract_meta_property(html, "og:title"));
    let description = extract_meta_name(html, "description")
        .or_else(|| extract_meta_property(html, "og:description"));
    let site_name = extract_meta_property(html, "og:site_name");
    let headings = extract_headings(html);

    SiteContext {
        title,
        description,
        headings,
        site_name,
    }
}

fn extract_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex");
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Extract `<meta name="..." content="...">`, either attribute order.
fn extract_meta_name(html: &str, name: &str) -> Option<String> {
    extract_meta(html, "name", name)
}

/// Extract `<meta property="..." content="...">`, either attribute order.
fn extract_meta_property(html: &str, property: &str) -> Option<String> {
    extract_meta(html, "property", property)
}

fn extract_meta(html: &str, attr: &str, key: &str) -> Option<String> {
    let key = regex::escape(key);
    let forward = format!(
        r#"(?is)<meta[^>]*{attr}\s*=\s*["']{key}["'][^>]*content\s*=\s*["']([^"']*)["']"#
    );
    let backward = format!(
        r#"(?is)<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*{attr}\s*=\s*["']{key}["']"#
    );
    for pattern in [forward, backward] {
        let re = Regex::new(&pattern).expect("valid meta regex");
        if let Some(value) = re
            .captures(html)
            .and_then(|cap| cap.get(1))
            .map(|m| clean_text(m.as_str()))
            .filter(|s| !s.is_empty())
        {
            return Some(value);
        }
    }
    None
}

fn extract_headings(html: &str) -> Vec<String> {
    let re = Regex::new(r"(?is)<h[12][^>]*>(.*?)</h[12]>").expect("valid heading regex");
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| clean_text(&strip_html(m.as_str())))
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.chars().count() > MAX_HEADING_CHARS {
                s.chars().take(MAX_HEADING_CHARS).collect()
            } else {
                s
            }
        })
        .take(MAX_HEADINGS)
        .collect()
}

/// Strip HTML tags from a string, returning plain text.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Collapse whitespace runs and trim.
fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
