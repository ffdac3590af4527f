//! Parse a pasted block of links, one per line.
//!
//! Accepted line shapes:
//!
//! ```text
//! [Figma](https://figma.com)
//! https://stackoverflow.com Stack Overflow
//! Google Search https://www.google.com
//! https://github.com
//! ```
//!
//! Lines in none of these shapes are skipped. A line whose URL does not
//! parse is reported as a [`LineError`] and never becomes an entry.

use crate::util::is_http_url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineError {
    /// 1-based position among the recognised lines.
    pub line: usize,
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchParse {
    pub entries: Vec<BatchEntry>,
    pub errors: Vec<LineError>,
}

pub fn parse(text: &str) -> BatchParse {
    let mut parsed = BatchParse::default();
    let candidates = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line);

    for (index, (url, name)) in candidates.enumerate() {
        if !is_http_url(&url) {
            parsed.errors.push(LineError {
                line: index + 1,
                url,
            });
            continue;
        }
        let name = name.unwrap_or_else(|| name_from_url(&url));
        parsed.entries.push(BatchEntry { name, url });
    }
    parsed
}

/// `(url, name)` of one trimmed line.
fn parse_line(line: &str) -> Option<(String, Option<String>)> {
    if let Some(found) = markdown_link(line) {
        return Some(found);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() >= 2
        && let Some(at) = parts.iter().position(|part| looks_like_url(part))
    {
        let name = if at == 0 {
            parts[1..].join(" ")
        } else {
            parts[..at].join(" ")
        };
        return Some((parts[at].to_string(), Some(name).filter(|n| !n.is_empty())));
    }

    looks_like_url(line).then(|| (line.to_string(), None))
}

fn markdown_link(line: &str) -> Option<(String, Option<String>)> {
    let open = line.find('[')?;
    let rest = &line[open + 1..];
    let close = rest.find("](")?;
    let name = &rest[..close];
    let after = &rest[close + 2..];
    let end = after.find(')')?;
    let url = &after[..end];
    if name.is_empty() || url.is_empty() {
        return None;
    }
    Some((url.to_string(), Some(name.to_string())))
}

fn looks_like_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// `https://www.github.com/x` becomes `Github`.
pub fn name_from_url(url: &str) -> String {
    let Some(host) = url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
    else {
        return "New link".to_string();
    };
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').collect();
    let base = if labels.len() > 1 {
        labels[labels.len() - 2]
    } else {
        host
    };
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "New link".to_string(),
    }
}
