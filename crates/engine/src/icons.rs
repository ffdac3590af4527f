//! Symbolic icon vocabulary for links.
//!
//! Links store the icon as a plain string (`iconType`). Only the names in
//! [`Icon::ALL`] are valid; anything else is resolved to [`Icon::DEFAULT`].

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    Home,
    Link,
    Code,
    FileText,
    Folder,
    Video,
    Music,
    Picture,
    Message,
    Email,
    Shopping,
    Calendar,
    Setting,
    Search,
    Star,
    Heart,
    Like,
    Share,
    Download,
    Upload,
    Lock,
    Unlock,
    User,
    Team,
    Phone,
    Location,
    Map,
    Fire,
    Trend,
    Chart,
    Github,
    Twitter,
    Facebook,
    Instagram,
}

impl Icon {
    pub const DEFAULT: Icon = Icon::Link;

    pub const ALL: [Icon; 34] = [
        Icon::Home,
        Icon::Link,
        Icon::Code,
        Icon::FileText,
        Icon::Folder,
        Icon::Video,
        Icon::Music,
        Icon::Picture,
        Icon::Message,
        Icon::Email,
        Icon::Shopping,
        Icon::Calendar,
        Icon::Setting,
        Icon::Search,
        Icon::Star,
        Icon::Heart,
        Icon::Like,
        Icon::Share,
        Icon::Download,
        Icon::Upload,
        Icon::Lock,
        Icon::Unlock,
        Icon::User,
        Icon::Team,
        Icon::Phone,
        Icon::Location,
        Icon::Map,
        Icon::Fire,
        Icon::Trend,
        Icon::Chart,
        Icon::Github,
        Icon::Twitter,
        Icon::Facebook,
        Icon::Instagram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Link => "Link",
            Self::Code => "Code",
            Self::FileText => "FileText",
            Self::Folder => "Folder",
            Self::Video => "Video",
            Self::Music => "Music",
            Self::Picture => "Picture",
            Self::Message => "Message",
            Self::Email => "Email",
            Self::Shopping => "Shopping",
            Self::Calendar => "Calendar",
            Self::Setting => "Setting",
            Self::Search => "Search",
            Self::Star => "Star",
            Self::Heart => "Heart",
            Self::Like => "Like",
            Self::Share => "Share",
            Self::Download => "Download",
            Self::Upload => "Upload",
            Self::Lock => "Lock",
            Self::Unlock => "Unlock",
            Self::User => "User",
            Self::Team => "Team",
            Self::Phone => "Phone",
            Self::Location => "Location",
            Self::Map => "Map",
            Self::Fire => "Fire",
            Self::Trend => "Trend",
            Self::Chart => "Chart",
            Self::Github => "Github",
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
        }
    }

    /// Exact, case-sensitive lookup in the vocabulary.
    pub fn parse(name: &str) -> Option<Icon> {
        Self::ALL.into_iter().find(|icon| icon.as_str() == name)
    }

    pub fn is_valid(name: Option<&str>) -> bool {
        name.and_then(Self::parse).is_some()
    }

    /// Icon to render for a stored `iconType`; never fails.
    pub fn resolve(name: Option<&str>) -> Icon {
        name.and_then(Self::parse).unwrap_or(Self::DEFAULT)
    }

    /// Single-cell glyph used by the terminal front-end.
    pub fn glyph(self) -> char {
        match self {
            Self::Home => '⌂',
            Self::Code | Self::Github => '⌘',
            Self::FileText | Self::Folder => '▤',
            Self::Video => '▶',
            Self::Music => '♪',
            Self::Picture => '▣',
            Self::Message | Self::Twitter | Self::Facebook | Self::Instagram => '✉',
            Self::Email => '@',
            Self::Shopping => '$',
            Self::Calendar => '▦',
            Self::Setting => '⚙',
            Self::Search => '⌕',
            Self::Star | Self::Like => '★',
            Self::Heart => '♥',
            Self::Share | Self::Upload => '↑',
            Self::Download => '↓',
            Self::Lock | Self::Unlock => '⚿',
            Self::User | Self::Team => '☺',
            Self::Phone => '☎',
            Self::Location | Self::Map => '⌖',
            Self::Fire | Self::Trend | Self::Chart => '▲',
            Self::Link => '∞',
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known sites, checked in order.
const KEYWORD_ICONS: &[(&str, Icon)] = &[
    ("github", Icon::Github),
    ("stack overflow", Icon::Code),
    ("stackoverflow", Icon::Code),
    ("gitlab", Icon::Github),
    ("bitbucket", Icon::Code),
    ("vscode", Icon::Code),
    ("visual studio", Icon::Code),
    ("figma", Icon::Picture),
    ("adobe", Icon::Picture),
    ("photoshop", Icon::Picture),
    ("illustrator", Icon::Picture),
    ("sketch", Icon::Picture),
    ("facebook", Icon::Facebook),
    ("twitter", Icon::Twitter),
    ("instagram", Icon::Picture),
    ("linkedin", Icon::Link),
    ("youtube", Icon::Video),
    ("tiktok", Icon::Video),
    ("discord", Icon::Message),
    ("slack", Icon::Message),
    ("telegram", Icon::Message),
    ("wechat", Icon::Message),
    ("whatsapp", Icon::Message),
    ("aws", Icon::Link),
    ("google", Icon::Search),
    ("microsoft", Icon::Setting),
    ("apple", Icon::Home),
    ("docker", Icon::Code),
    ("kubernetes", Icon::Setting),
    ("amazon", Icon::Shopping),
    ("alibaba", Icon::Shopping),
    ("taobao", Icon::Shopping),
    ("netflix", Icon::Video),
    ("bilibili", Icon::Video),
    ("gmail", Icon::Email),
    ("outlook", Icon::Email),
    ("dropbox", Icon::Folder),
    ("drive", Icon::Folder),
    ("notion", Icon::FileText),
    ("trello", Icon::Folder),
    ("jira", Icon::Setting),
];

/// Generic word families, tried when no site matched.
const FAMILY_ICONS: &[(&[&str], Icon)] = &[
    (&["code", "dev", "git"], Icon::Code),
    (&["design", "ui", "figma"], Icon::Picture),
    (&["doc", "note", "wiki"], Icon::FileText),
    (&["video", "youtube", "bilibili"], Icon::Video),
    (&["social", "chat", "message"], Icon::Message),
    (&["shop", "buy", "mall"], Icon::Shopping),
    (&["music", "audio", "sound"], Icon::Music),
];

/// Partial matching below this length produces too many false hits.
const MIN_PARTIAL_LEN: usize = 3;

const COMMON_TLDS: [&str; 7] = [".com", ".cn", ".net", ".org", ".io", ".co", ".dev"];

fn keywords(url: &str, name: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    match url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
    {
        Some(host) => {
            let domain = host.strip_prefix("www.").unwrap_or(&host).to_string();
            let labels: Vec<&str> = domain.split('.').collect();
            if labels.len() > 1 {
                keywords.push(labels[0].to_string());
                let bare = COMMON_TLDS
                    .iter()
                    .find_map(|tld| domain.strip_suffix(tld))
                    .unwrap_or(&domain);
                keywords.push(bare.to_string());
            }
            keywords.push(domain.clone());
            keywords.push(host);
        }
        None => keywords.push(url.to_lowercase()),
    }
    keywords.push(name.to_lowercase());
    keywords
}

/// Guess an icon for a link from its URL and display name.
pub fn suggest(url: &str, name: &str) -> Icon {
    let keywords = keywords(url, name);

    for keyword in &keywords {
        if let Some((_, icon)) = KEYWORD_ICONS.iter().find(|(key, _)| key == keyword) {
            return *icon;
        }
        if keyword.chars().count() < MIN_PARTIAL_LEN {
            continue;
        }
        if let Some((_, icon)) = KEYWORD_ICONS.iter().find(|(key, _)| {
            key.len() >= MIN_PARTIAL_LEN && (keyword.contains(key) || key.contains(keyword.as_str()))
        }) {
            return *icon;
        }
    }

    FAMILY_ICONS
        .iter()
        .find(|(words, _)| {
            keywords
                .iter()
                .any(|keyword| words.iter().any(|word| keyword.contains(word)))
        })
        .map(|(_, icon)| *icon)
        .unwrap_or(Icon::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_icon_resolves_to_link() {
        assert_eq!(Icon::resolve(Some("Bogus")), Icon::Link);
        assert_eq!(Icon::resolve(None), Icon::Link);
        assert_eq!(Icon::resolve(Some("github")), Icon::Link);
        assert_eq!(Icon::resolve(Some("Github")), Icon::Github);
    }

    #[test]
    fn vocabulary_round_trips_through_names() {
        for icon in Icon::ALL {
            assert_eq!(Icon::parse(icon.as_str()), Some(icon));
        }
        assert!(!Icon::is_valid(Some("Cloud")));
        assert!(!Icon::is_valid(None));
    }

    #[test]
    fn suggest_prefers_known_sites() {
        assert_eq!(suggest("https://github.com/rust-lang", "Rust"), Icon::Github);
        assert_eq!(suggest("https://www.youtube.com", "Tube"), Icon::Video);
        assert_eq!(suggest("https://mail.google.com", "Inbox"), Icon::Email);
        assert_eq!(suggest("https://www.google.com", "Search"), Icon::Search);
        assert_eq!(suggest("https://www.notion.so/page", "Notes"), Icon::FileText);
    }

    #[test]
    fn suggest_falls_back_to_word_families_then_default() {
        assert_eq!(suggest("https://example.org/wiki", "Team wiki"), Icon::FileText);
        assert_eq!(suggest("https://tunes.example.net", "My music"), Icon::Music);
        assert_eq!(suggest("https://example.org", "Somewhere"), Icon::Link);
    }

    #[test]
    fn suggest_handles_unparseable_urls() {
        assert_eq!(suggest("not a url", "Slack"), Icon::Message);
        assert_eq!(suggest("not a url", "???"), Icon::Link);
    }
}
