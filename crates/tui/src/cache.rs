//! On-disk mirror of the library plus local-only preferences.

use std::{fs, path::Path};

use engine::{Category, Library, Link};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One JSON file with the keys `categories`, `links`, `backgroundImage`
/// and `backgroundColor`. A key that was never written stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl LocalCache {
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_none() && self.links.is_none()
    }

    /// Cached library; a missing key falls back to the seed content.
    pub fn library(&self) -> Library {
        let seed = Library::seed();
        Library::new(
            self.categories.clone().unwrap_or(seed.categories),
            self.links.clone().unwrap_or(seed.links),
        )
    }

    pub fn set_library(&mut self, library: &Library) {
        self.categories = Some(library.categories.clone());
        self.links = Some(library.links.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::load(&dir.path().join("none.json")).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.library(), Library::seed());
    }

    #[test]
    fn saved_cache_uses_the_documented_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("cache.json");
        let mut cache = LocalCache {
            background_color: Some("#202020".to_string()),
            ..Default::default()
        };
        cache.set_library(&Library::seed());
        cache.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["categories"].as_array().unwrap().len(), 3);
        assert_eq!(raw["links"][0]["categoryId"], "1");
        assert_eq!(raw["backgroundColor"], "#202020");
        assert!(raw.get("backgroundImage").is_none());

        assert_eq!(LocalCache::load(&path).unwrap(), cache);
    }

    #[test]
    fn emptied_library_is_not_reseeded() {
        let mut cache = LocalCache::default();
        cache.set_library(&Library::default());
        assert!(!cache.is_empty());
        assert!(cache.library().is_empty());
    }
}
