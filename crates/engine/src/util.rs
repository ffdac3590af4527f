//! Internal helpers for text normalization and validation.
//!
//! These utilities are **not** part of the public API. They centralize the
//! matching and URL rules so search, import and mutations agree.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Case-folded NFKC form used for plain substring matching.
pub(crate) fn fold(input: &str) -> String {
    input.nfkc().flat_map(char::to_lowercase).collect()
}

/// Phonetic Latin key: transliterated, lowercased, alphanumerics only.
///
/// `代码仓库` becomes `daimacangku`, `Café` becomes `cafe`.
pub(crate) fn phonetic_key(input: &str) -> String {
    let folded: String = input.nfkc().collect();
    deunicode::deunicode(&folded)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// True when `raw` parses as an absolute `http`/`https` URL with a host.
pub(crate) fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
        .unwrap_or(false)
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

/// Validate a link URL for user-facing mutations.
pub(crate) fn required_url(value: &str) -> ResultEngine<String> {
    let url = required(value, "url")?;
    if !is_http_url(&url) {
        return Err(EngineError::Validation(format!("invalid url: {url}")));
    }
    Ok(url)
}

/// Empty optional text is treated as absent.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
