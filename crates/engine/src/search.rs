//! Search and filter over the library.
//!
//! A link matches when at least one enabled field contains the query,
//! case-insensitively. When the direct comparison fails, both sides are
//! transliterated to phonetic Latin and compared again, so `daima` finds
//! `代码仓库`.

use crate::{
    Category, Library, Link,
    util::{fold, phonetic_key},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Alias,
    Url,
}

/// Which link fields take part in matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchFields {
    pub name: bool,
    pub alias: bool,
    pub url: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            name: true,
            alias: true,
            url: true,
        }
    }
}

impl SearchFields {
    pub const NONE: SearchFields = SearchFields {
        name: false,
        alias: false,
        url: false,
    };

    pub fn any(self) -> bool {
        self.name || self.alias || self.url
    }

    pub fn is_enabled(self, field: SearchField) -> bool {
        match field {
            SearchField::Name => self.name,
            SearchField::Alias => self.alias,
            SearchField::Url => self.url,
        }
    }

    pub fn toggle(&mut self, field: SearchField) {
        match field {
            SearchField::Name => self.name = !self.name,
            SearchField::Alias => self.alias = !self.alias,
            SearchField::Url => self.url = !self.url,
        }
    }
}

/// A prepared query: folded once, compared against many candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    folded: String,
    phonetic: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self {
            folded: fold(trimmed),
            phonetic: phonetic_key(trimmed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Substring match on `text`, directly or through transliteration.
    pub fn matches(&self, text: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        if fold(text).contains(&self.folded) {
            return true;
        }
        !self.phonetic.is_empty() && phonetic_key(text).contains(&self.phonetic)
    }

    pub fn matches_link(&self, link: &Link, fields: SearchFields) -> bool {
        if !fields.any() {
            return false;
        }
        (fields.name && self.matches(&link.name))
            || (fields.alias && link.alias.as_deref().is_some_and(|alias| self.matches(alias)))
            || (fields.url && self.matches(&link.url))
    }
}

/// Matches of one category, in document order.
#[derive(Clone, Debug)]
pub struct CategoryMatches<'a> {
    pub category: &'a Category,
    pub links: Vec<&'a Link>,
}

/// Result of [`filter`]: every category keeps an entry, possibly empty.
#[derive(Clone, Debug)]
pub struct SearchResults<'a> {
    groups: Vec<CategoryMatches<'a>>,
}

impl<'a> SearchResults<'a> {
    /// Matching links of `category_id`; `None` for unknown categories.
    pub fn get(&self, category_id: &str) -> Option<&[&'a Link]> {
        self.groups
            .iter()
            .find(|group| group.category.id == category_id)
            .map(|group| group.links.as_slice())
    }

    /// All groups, including empty ones.
    pub fn groups(&self) -> &[CategoryMatches<'a>] {
        &self.groups
    }

    /// Groups worth rendering: at least one match.
    pub fn visible(&self) -> impl Iterator<Item = &CategoryMatches<'a>> {
        self.groups.iter().filter(|group| !group.links.is_empty())
    }

    /// Category-ordered flat list used for keyboard navigation.
    pub fn flat(&self) -> Vec<&'a Link> {
        self.groups
            .iter()
            .flat_map(|group| group.links.iter().copied())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|group| group.links.len()).sum()
    }
}

/// Group the links matching `query` on the enabled `fields` by category.
pub fn filter<'a>(library: &'a Library, query: &str, fields: SearchFields) -> SearchResults<'a> {
    let query = Query::new(query);
    let groups = library
        .categories
        .iter()
        .map(|category| CategoryMatches {
            category,
            links: library
                .links_in(&category.id)
                .filter(|link| query.matches_link(link, fields))
                .collect(),
        })
        .collect();
    SearchResults { groups }
}
