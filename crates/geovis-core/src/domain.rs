//! Scan-target normalization and validation.
//!
//! Every entry point (HTTP, CLI) funnels raw user input through
//! [`normalize_domain`] before anything else touches it. Normalization is
//! idempotent: `normalize_domain(normalize_domain(x)) == normalize_domain(x)`.

use crate::DomainError;

/// Normalize a raw scan target to a bare lowercase hostname.
///
/// Steps, in order: lowercase, strip a leading `http://` or `https://`,
/// strip a leading `www.`, truncate at the first `/` (dropping any path or
/// query), and trim surrounding whitespace.
#[must_use]
pub fn normalize_domain(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();
    if let Some(rest) = s.strip_prefix("https://") {
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix("http://") {
        s = rest.to_string();
    }
    if let Some(rest) = s.strip_prefix("www.") {
        s = rest.to_string();
    }
    if let Some(idx) = s.find('/') {
        s.truncate(idx);
    }
    s
}

/// Derive the bare brand token from a normalized domain.
///
/// The brand is the first label: `projecthub.io` → `projecthub`,
/// `app.example.com` → `app`. Callers wanting the organization name for a
/// subdomain should normalize to the registrable domain first.
#[must_use]
pub fn brand_token(domain: &str) -> String {
    domain.split('.').next().unwrap_or(domain).to_string()
}

/// Validate a normalized domain.
///
/// Accepts hostnames of the shape `label(.label)*.tld` where labels are
/// alphanumeric/hyphen and the final suffix is 2–24 ASCII letters. This is a
/// gate against garbage input, not a full RFC hostname parser.
///
/// # Errors
///
/// Returns [`DomainError::Empty`] for an empty string and
/// [`DomainError::Malformed`] for anything that does not look like a hostname.
pub fn validate_domain(domain: &str) -> Result<(), DomainError> {
    if domain.is_empty() {
        return Err(DomainError::Empty);
    }

    let Some((head, tld)) = domain.rsplit_once('.') else {
        return Err(DomainError::Malformed(domain.to_string()));
    };

    let tld_ok = (2..=24).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());
    if !tld_ok {
        return Err(DomainError::Malformed(domain.to_string()));
    }

    let labels_ok = head.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return Err(DomainError::Malformed(domain.to_string()));
    }

    Ok(())
}
