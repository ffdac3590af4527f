//! The persisted document: every category and every link.
//!
//! A [`Library`] is read and written as a whole. Mutations keep the one
//! structural invariant: a link always points at a live category, so removing
//! a category removes its links in the same call.

use serde::{Deserialize, Serialize};

use crate::{
    Category, EngineError, Link, ResultEngine,
    icons::Icon,
    link::{CategoryPatch, LinkPatch, apply_sparse, apply_sparse_opt},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Library {
    pub fn new(categories: Vec<Category>, links: Vec<Link>) -> Self {
        Self { categories, links }
    }

    /// First-run content: three categories and four links.
    pub fn seed() -> Self {
        let categories = vec![
            Category::new("1", "开发工具"),
            Category::new("2", "设计工具"),
            Category::new("3", "通讯工具"),
        ];
        let links = vec![
            seed_link("1", "GitHub", "https://github.com", "1", "代码仓库"),
            seed_link(
                "2",
                "Stack Overflow",
                "https://stackoverflow.com",
                "1",
                "问答社区",
            ),
            seed_link("3", "Figma", "https://figma.com", "2", "设计工具"),
            seed_link("4", "Slack", "https://slack.com", "3", "团队沟通"),
        ];
        Self { categories, links }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.links.is_empty()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Links of one category, in document order.
    pub fn links_in<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |link| link.category_id == category_id)
    }

    pub fn add_category(&mut self, category: Category) -> ResultEngine<&Category> {
        if self.category(&category.id).is_some() {
            return Err(EngineError::Validation(format!(
                "duplicate category id: {}",
                category.id
            )));
        }
        self.categories.push(category);
        Ok(&self.categories[self.categories.len() - 1])
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> ResultEngine<&Category> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        apply_sparse(&mut category.name, patch.name);
        Ok(&*category)
    }

    /// Remove a category and, in the same mutation, every link inside it.
    ///
    /// Returns the removed links.
    pub fn remove_category(&mut self, id: &str) -> ResultEngine<Vec<Link>> {
        let before = self.categories.len();
        self.categories.retain(|category| category.id != id);
        if self.categories.len() == before {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }

        let (removed, kept): (Vec<Link>, Vec<Link>) = std::mem::take(&mut self.links)
            .into_iter()
            .partition(|link| link.category_id == id);
        self.links = kept;
        Ok(removed)
    }

    /// Move the category at `from` so it ends up at index `to`.
    pub fn move_category(&mut self, from: usize, to: usize) -> ResultEngine<()> {
        let len = self.categories.len();
        if from >= len || to >= len {
            return Err(EngineError::Validation(format!(
                "category position out of range: {from} -> {to} (len {len})"
            )));
        }
        let category = self.categories.remove(from);
        self.categories.insert(to, category);
        Ok(())
    }

    pub fn add_link(&mut self, link: Link) -> ResultEngine<&Link> {
        if self.link(&link.id).is_some() {
            return Err(EngineError::Validation(format!(
                "duplicate link id: {}",
                link.id
            )));
        }
        self.ensure_category(&link.category_id)?;
        self.links.push(link);
        Ok(&self.links[self.links.len() - 1])
    }

    pub fn update_link(&mut self, id: &str, patch: LinkPatch) -> ResultEngine<&Link> {
        if let Some(category_id) = patch.category_id.as_deref().filter(|value| !value.is_empty()) {
            self.ensure_category(category_id)?;
        }

        let link = self
            .links
            .iter_mut()
            .find(|link| link.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        apply_sparse(&mut link.name, patch.name);
        apply_sparse(&mut link.url, patch.url);
        apply_sparse(&mut link.category_id, patch.category_id);
        apply_sparse_opt(&mut link.alias, patch.alias);
        apply_sparse_opt(&mut link.favicon, patch.favicon);
        apply_sparse_opt(&mut link.icon_type, patch.icon_type);
        Ok(&*link)
    }

    /// Replace a link wholesale, keeping its id.
    pub fn replace_link(&mut self, link: Link) -> ResultEngine<&Link> {
        self.ensure_category(&link.category_id)?;
        let slot = self
            .links
            .iter_mut()
            .find(|existing| existing.id == link.id)
            .ok_or_else(|| EngineError::KeyNotFound(link.id.clone()))?;
        *slot = link;
        Ok(&*slot)
    }

    pub fn remove_link(&mut self, id: &str) -> ResultEngine<Link> {
        let index = self
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Ok(self.links.remove(index))
    }

    /// Clear stored icon names outside the vocabulary.
    ///
    /// Returns how many links were touched.
    pub fn clear_invalid_icons(&mut self) -> usize {
        let mut cleared = 0;
        for link in &mut self.links {
            if link.icon_type.is_some() && !Icon::is_valid(link.icon_type.as_deref()) {
                link.icon_type = None;
                cleared += 1;
            }
        }
        cleared
    }

    fn ensure_category(&self, id: &str) -> ResultEngine<()> {
        if self.category(id).is_none() {
            return Err(EngineError::Validation(format!("unknown category: {id}")));
        }
        Ok(())
    }
}

fn seed_link(id: &str, name: &str, url: &str, category_id: &str, alias: &str) -> Link {
    Link {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        alias: Some(alias.to_string()),
        category_id: category_id.to_string(),
        favicon: None,
        icon_type: None,
    }
}
