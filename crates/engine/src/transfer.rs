//! Import and export of the whole library as a JSON file.
//!
//! Export always emits the in-memory library, so it is valid by construction.
//! Import is lenient: malformed entries are skipped and counted, and only an
//! import that yields nothing at all is rejected.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::{Category, EngineError, Library, Link, ResultEngine, util::is_http_url};

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "links-backup.json";

/// Outcome of a lenient import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportReport {
    pub library: Library,
    pub skipped_categories: usize,
    pub skipped_links: usize,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.skipped_categories + self.skipped_links
    }
}

/// Pretty-printed `{categories, links}` document.
pub fn export(library: &Library) -> ResultEngine<String> {
    Ok(serde_json::to_string_pretty(library)?)
}

/// Parse an uploaded backup file.
///
/// A missing or non-array `categories`/`links` field counts as empty.
pub fn import(raw: &str) -> ResultEngine<ImportReport> {
    let root = parse_object(raw)?;
    let categories = root.get("categories").and_then(Value::as_array);
    let links = root.get("links").and_then(Value::as_array);
    validate(categories.map(Vec::as_slice), links.map(Vec::as_slice))
}

/// Parse the content of the raw JSON editor.
///
/// Stricter than [`import`] about shape: both fields must be arrays.
pub fn parse_editor(raw: &str) -> ResultEngine<ImportReport> {
    let root = parse_object(raw)?;
    let (Some(categories), Some(links)) = (
        root.get("categories").and_then(Value::as_array),
        root.get("links").and_then(Value::as_array),
    ) else {
        return Err(EngineError::InvalidImport(
            "document must contain `categories` and `links` arrays".to_string(),
        ));
    };
    validate(Some(categories), Some(links))
}

fn parse_object(raw: &str) -> ResultEngine<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(EngineError::InvalidImport(
            "document must be a JSON object".to_string(),
        )),
    }
}

fn validate(categories: Option<&[Value]>, links: Option<&[Value]>) -> ResultEngine<ImportReport> {
    let categories = categories.unwrap_or_default();
    let links = links.unwrap_or_default();

    let mut seen = HashSet::new();
    let valid_categories: Vec<Category> = categories
        .iter()
        .filter_map(category_entry)
        .filter(|category| seen.insert(category.id.clone()))
        .collect();

    let mut seen = HashSet::new();
    let valid_links: Vec<Link> = links
        .iter()
        .filter_map(link_entry)
        .filter(|link| {
            valid_categories
                .iter()
                .any(|category| category.id == link.category_id)
        })
        .filter(|link| seen.insert(link.id.clone()))
        .collect();

    if valid_categories.is_empty() && valid_links.is_empty() {
        return Err(EngineError::InvalidImport(
            "no valid categories or links found".to_string(),
        ));
    }

    Ok(ImportReport {
        skipped_categories: categories.len() - valid_categories.len(),
        skipped_links: links.len() - valid_links.len(),
        library: Library::new(valid_categories, valid_links),
    })
}

fn text<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

fn non_empty<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    text(entry, key).filter(|value| !value.trim().is_empty())
}

fn category_entry(value: &Value) -> Option<Category> {
    let entry = value.as_object()?;
    Some(Category::new(non_empty(entry, "id")?, text(entry, "name")?))
}

fn link_entry(value: &Value) -> Option<Link> {
    let entry = value.as_object()?;
    let url = non_empty(entry, "url")?;
    if !is_http_url(url) {
        return None;
    }
    Some(Link {
        id: non_empty(entry, "id")?.to_string(),
        name: text(entry, "name")?.to_string(),
        url: url.to_string(),
        alias: text(entry, "alias").map(str::to_string),
        category_id: non_empty(entry, "categoryId")?.to_string(),
        favicon: text(entry, "favicon").map(str::to_string),
        icon_type: text(entry, "iconType").map(str::to_string),
    })
}
