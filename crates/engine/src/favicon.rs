//! Favicon lookups and the letter icon used when none can be fetched.

use base64::{Engine as _, engine::general_purpose::STANDARD};

const DEFAULT_SIZE: u32 = 128;

const GRADIENTS: [(&str, &str); 8] = [
    ("#667eea", "#764ba2"),
    ("#f093fb", "#4facfe"),
    ("#4facfe", "#00f2fe"),
    ("#fa709a", "#fee140"),
    ("#30cfd0", "#330867"),
    ("#a8edea", "#fed6e3"),
    ("#ff9a9e", "#fecfef"),
    ("#ffecd2", "#fcb69f"),
];

/// Host of `url` without a leading `www.`.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Favicon service URLs for `domain`, best first.
pub fn candidate_urls(domain: &str) -> Vec<String> {
    candidate_urls_sized(domain, DEFAULT_SIZE)
}

pub fn candidate_urls_sized(domain: &str, size: u32) -> Vec<String> {
    let domain = domain
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let domain = domain.strip_prefix("www.").unwrap_or(domain);
    vec![
        format!("https://icon.horse/icon/{domain}"),
        format!("https://www.google.com/s2/favicons?domain={domain}&sz={size}"),
        format!("https://favicon.io/favicon?url={domain}&size={size}"),
        format!("https://icons.duckduckgo.com/ip3/{domain}.ico"),
        format!("https://{domain}/favicon.ico"),
    ]
}

/// Best guess to show immediately, or a letter icon for unparseable URLs.
pub fn favicon_for(url: &str, name: &str) -> String {
    match extract_domain(url) {
        Some(domain) => candidate_urls(&domain).swap_remove(0),
        None => letter_icon(name, url),
    }
}

/// `data:` URL of a rounded square holding the first letter of `name`
/// (or of `domain` when the name is empty).
pub fn letter_icon(name: &str, domain: &str) -> String {
    let letter = name
        .chars()
        .chain(domain.chars())
        .find(|c| !c.is_whitespace())
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "?".to_string());
    let code = letter.chars().next().map_or(0, u32::from);
    let (start, end) = GRADIENTS[code as usize % GRADIENTS.len()];
    let svg = format!(
        concat!(
            r#"<svg width="64" height="64" xmlns="http://www.w3.org/2000/svg">"#,
            r#"<defs><linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">"#,
            r#"<stop offset="0%" style="stop-color:{start};stop-opacity:1" />"#,
            r#"<stop offset="100%" style="stop-color:{end};stop-opacity:1" />"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="64" height="64" rx="12" fill="url(#grad)"/>"#,
            r#"<text x="32" y="42" font-family="Arial, sans-serif" font-size="32" "#,
            r#"font-weight="bold" fill="white" text-anchor="middle">{letter}</text>"#,
            r#"</svg>"#
        ),
        start = start,
        end = end,
        letter = escape(&letter),
    );
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_drops_www_and_path() {
        assert_eq!(
            extract_domain("https://www.github.com/rust-lang").as_deref(),
            Some("github.com")
        );
        assert_eq!(extract_domain("not a url"), None);
    }

    #[test]
    fn candidates_start_with_icon_horse_and_end_with_favicon_ico() {
        let urls = candidate_urls("https://www.figma.com");
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "https://icon.horse/icon/figma.com");
        assert!(urls[1].ends_with("domain=figma.com&sz=128"));
        assert_eq!(urls[4], "https://figma.com/favicon.ico");
    }

    #[test]
    fn letter_icon_encodes_svg() {
        let icon = letter_icon("slack", "slack.com");
        let payload = icon
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("data url prefix");
        let svg = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        assert!(svg.contains(">S</text>"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn letter_icon_falls_back_to_domain_then_question_mark() {
        let decode = |icon: String| {
            let payload = icon.split_once(',').unwrap().1.to_string();
            String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
        };
        assert!(decode(letter_icon("", "example.com")).contains(">E</text>"));
        assert!(decode(letter_icon(" ", "")).contains(">?</text>"));
    }

    #[test]
    fn favicon_for_bad_urls_is_a_letter_icon() {
        assert!(favicon_for("nope", "Notes").starts_with("data:image/svg+xml"));
        assert_eq!(
            favicon_for("https://slack.com", "Slack"),
            "https://icon.horse/icon/slack.com"
        );
    }
}
