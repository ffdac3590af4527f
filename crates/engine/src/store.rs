//! Application state as an explicit store.
//!
//! Every user intent is an [`Action`]; [`AppStore::dispatch`] applies it and
//! reports the side effect the caller has to perform ([`Effect`]). The store
//! itself never touches storage, the network or the clock beyond minting ids,
//! so every synchronization rule can be tested without a front-end.

use crate::{
    Category, EngineError, Library, Link, LinkDraft, ResultEngine,
    icons::{self, Icon},
    ids,
    scroll::Selection,
    search::{self, SearchField, SearchFields, SearchResults},
    util::{optional, required, required_url},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Links,
    JsonEditor,
    PasswordGenerator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    AddCategory { name: String },
    RenameCategory { id: String, name: String },
    DeleteCategory { id: String },
    MoveCategory { from: usize, to: usize },
    AddLink(LinkDraft),
    EditLink { id: String, draft: LinkDraft },
    DeleteLink { id: String },
    ReplaceLibrary(Library),
    SetQuery(String),
    ToggleField(SearchField),
    SelectNext,
    SelectPrev,
    OpenSelected,
    ClearQuery,
    SelectCategory(Selection),
    SetViewMode(ViewMode),
    SetBackgroundImage(Option<String>),
    SetBackgroundColor(Option<String>),
}

/// What the caller must do after a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The library changed: save locally and schedule the remote write.
    Persist,
    /// Only local preferences changed.
    PersistLocal,
    /// Open this URL in a new browsing context.
    Open(String),
}

#[derive(Clone, Debug, Default)]
pub struct AppStore {
    library: Library,
    selected: Selection,
    query: String,
    fields: SearchFields,
    cursor: Option<usize>,
    view: ViewMode,
    background_image: Option<String>,
    background_color: Option<String>,
}

impl AppStore {
    pub fn new(library: Library) -> Self {
        let mut store = Self::default();
        store.load(library);
        store
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn selected(&self) -> &Selection {
        &self.selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fields(&self) -> SearchFields {
        self.fields
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn background_image(&self) -> Option<&str> {
        self.background_image.as_deref()
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn results(&self) -> SearchResults<'_> {
        search::filter(&self.library, &self.query, self.fields)
    }

    /// The link under the navigation cursor.
    pub fn selected_link(&self) -> Option<&Link> {
        let cursor = self.cursor?;
        self.results().flat().get(cursor).copied()
    }

    pub fn dispatch(&mut self, action: Action) -> ResultEngine<Effect> {
        match action {
            Action::AddCategory { name } => {
                let name = required(&name, "name")?;
                self.library
                    .add_category(Category::new(ids::new_id(), name))?;
                Ok(Effect::Persist)
            }
            Action::RenameCategory { id, name } => {
                let name = required(&name, "name")?;
                self.library.update_category(
                    &id,
                    crate::CategoryPatch { name: Some(name) },
                )?;
                Ok(Effect::Persist)
            }
            Action::DeleteCategory { id } => {
                self.library.remove_category(&id)?;
                if self.selected.category_id() == Some(id.as_str()) {
                    self.selected = self.first_category();
                }
                self.clamp_cursor();
                Ok(Effect::Persist)
            }
            Action::MoveCategory { from, to } => {
                self.library.move_category(from, to)?;
                self.clamp_cursor();
                Ok(Effect::Persist)
            }
            Action::AddLink(draft) => {
                let link = self.link_from_draft(ids::new_id(), draft, None)?;
                self.library.add_link(link)?;
                Ok(Effect::Persist)
            }
            Action::EditLink { id, draft } => {
                let existing = self
                    .library
                    .link(&id)
                    .cloned()
                    .ok_or_else(|| EngineError::KeyNotFound(id.clone()))?;
                let link = self.link_from_draft(id, draft, Some(&existing))?;
                self.library.replace_link(link)?;
                self.clamp_cursor();
                Ok(Effect::Persist)
            }
            Action::DeleteLink { id } => {
                self.library.remove_link(&id)?;
                self.clamp_cursor();
                Ok(Effect::Persist)
            }
            Action::ReplaceLibrary(library) => {
                self.load(library);
                Ok(Effect::Persist)
            }
            Action::SetQuery(query) => {
                self.query = query;
                self.cursor = (self.results().total() > 0).then_some(0);
                Ok(Effect::None)
            }
            Action::ToggleField(field) => {
                self.fields.toggle(field);
                self.clamp_cursor();
                Ok(Effect::None)
            }
            Action::SelectNext => {
                let total = self.results().total();
                self.cursor = match (self.cursor, total) {
                    (_, 0) => None,
                    (None, _) => Some(0),
                    (Some(index), total) => Some((index + 1).min(total - 1)),
                };
                Ok(Effect::None)
            }
            Action::SelectPrev => {
                let total = self.results().total();
                self.cursor = match (self.cursor, total) {
                    (_, 0) => None,
                    (None, _) => Some(0),
                    (Some(index), _) => Some(index.saturating_sub(1)),
                };
                Ok(Effect::None)
            }
            Action::OpenSelected => Ok(self
                .selected_link()
                .map(|link| Effect::Open(link.url.clone()))
                .unwrap_or(Effect::None)),
            Action::ClearQuery => {
                self.query.clear();
                self.cursor = None;
                Ok(Effect::None)
            }
            Action::SelectCategory(selection) => {
                if let Some(id) = selection.category_id()
                    && self.library.category(id).is_none()
                {
                    return Err(EngineError::KeyNotFound(id.to_string()));
                }
                self.selected = selection;
                Ok(Effect::None)
            }
            Action::SetViewMode(view) => {
                self.view = view;
                Ok(Effect::None)
            }
            Action::SetBackgroundImage(image) => {
                self.background_image = optional(image);
                Ok(Effect::PersistLocal)
            }
            Action::SetBackgroundColor(color) => {
                self.background_color = optional(color);
                Ok(Effect::PersistLocal)
            }
        }
    }

    fn load(&mut self, mut library: Library) {
        library.clear_invalid_icons();
        self.library = library;
        let still_there = self
            .selected
            .category_id()
            .is_some_and(|id| self.library.category(id).is_some());
        if !still_there {
            self.selected = self.first_category();
        }
        self.cursor = None;
    }

    fn first_category(&self) -> Selection {
        self.library
            .categories
            .first()
            .map(|category| Selection::Category(category.id.clone()))
            .unwrap_or(Selection::All)
    }

    fn clamp_cursor(&mut self) {
        let total = self.results().total();
        self.cursor = match self.cursor {
            Some(_) if total == 0 => None,
            Some(index) => Some(index.min(total - 1)),
            None => None,
        };
    }

    fn link_from_draft(
        &self,
        id: String,
        draft: LinkDraft,
        existing: Option<&Link>,
    ) -> ResultEngine<Link> {
        let name = required(&draft.name, "name")?;
        let url = required_url(&draft.url)?;
        let category_id = required(&draft.category_id, "category")?;
        if self.library.category(&category_id).is_none() {
            return Err(EngineError::Validation(format!(
                "unknown category: {category_id}"
            )));
        }

        let requested = optional(draft.icon_type).filter(|icon| Icon::is_valid(Some(icon.as_str())));
        let kept = existing
            .filter(|existing| existing.url == url)
            .and_then(|existing| existing.icon_type.clone());
        let icon_type = requested
            .or(kept)
            .unwrap_or_else(|| icons::suggest(&url, &name).as_str().to_string());

        Ok(Link {
            id,
            name,
            url,
            alias: optional(draft.alias),
            category_id,
            favicon: optional(draft.favicon),
            icon_type: Some(icon_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AppStore {
        AppStore::new(Library::seed())
    }

    #[test]
    fn new_store_selects_first_category() {
        let store = store();
        assert_eq!(store.selected(), &Selection::Category("1".to_string()));
        assert_eq!(store.view(), ViewMode::Links);
    }

    #[test]
    fn add_category_persists() {
        let mut store = store();
        let effect = store
            .dispatch(Action::AddCategory {
                name: "  阅读  ".to_string(),
            })
            .unwrap();
        assert_eq!(effect, Effect::Persist);
        let added = store.library().categories.last().unwrap();
        assert_eq!(added.name, "阅读");
        assert!(!added.id.is_empty());
    }

    #[test]
    fn blank_category_name_is_rejected_without_change() {
        let mut store = store();
        let err = store
            .dispatch(Action::AddCategory {
                name: " ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(store.library(), &Library::seed());
    }

    #[test]
    fn deleting_selected_category_cascades_and_moves_selection() {
        let mut store = store();
        store
            .dispatch(Action::DeleteCategory {
                id: "1".to_string(),
            })
            .unwrap();
        assert!(store.library().category("1").is_none());
        assert!(store.library().links.iter().all(|l| l.category_id != "1"));
        assert_eq!(store.selected(), &Selection::Category("2".to_string()));
    }

    #[test]
    fn add_link_validates_and_suggests_icon() {
        let mut store = store();
        let err = store
            .dispatch(Action::AddLink(LinkDraft::new("Bad", "notaurl", "1")))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let err = store
            .dispatch(Action::AddLink(LinkDraft::new(
                "Orphan",
                "https://example.com",
                "missing",
            )))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        store
            .dispatch(Action::AddLink(
                LinkDraft::new("YouTube", "https://www.youtube.com", "2").alias("视频"),
            ))
            .unwrap();
        let added = store.library().links.last().unwrap();
        assert_eq!(added.icon(), Icon::Video);
        assert_eq!(added.alias.as_deref(), Some("视频"));
    }

    #[test]
    fn edit_link_keeps_id_and_icon_when_url_unchanged() {
        let mut store = store();
        store
            .dispatch(Action::EditLink {
                id: "1".to_string(),
                draft: LinkDraft::new("GitHub", "https://github.com", "1").icon_type("Star"),
            })
            .unwrap();
        assert_eq!(store.library().link("1").unwrap().icon(), Icon::Star);

        store
            .dispatch(Action::EditLink {
                id: "1".to_string(),
                draft: LinkDraft::new("GitHub Home", "https://github.com", "2"),
            })
            .unwrap();
        let edited = store.library().link("1").unwrap();
        assert_eq!(edited.name, "GitHub Home");
        assert_eq!(edited.category_id, "2");
        assert_eq!(edited.icon(), Icon::Star);
        assert_eq!(edited.alias, None);
    }

    #[test]
    fn keyboard_navigation_walks_flat_results() {
        let mut store = store();
        store.dispatch(Action::SetQuery("com".to_string())).unwrap();
        assert_eq!(store.cursor(), Some(0));
        assert_eq!(store.selected_link().unwrap().name, "GitHub");

        store.dispatch(Action::SelectNext).unwrap();
        store.dispatch(Action::SelectNext).unwrap();
        store.dispatch(Action::SelectNext).unwrap();
        store.dispatch(Action::SelectNext).unwrap();
        assert_eq!(store.cursor(), Some(3));
        assert_eq!(store.selected_link().unwrap().name, "Slack");

        store.dispatch(Action::SelectPrev).unwrap();
        assert_eq!(
            store.dispatch(Action::OpenSelected).unwrap(),
            Effect::Open("https://figma.com".to_string())
        );

        store.dispatch(Action::ClearQuery).unwrap();
        assert_eq!(store.query(), "");
        assert_eq!(store.cursor(), None);
        assert_eq!(store.dispatch(Action::OpenSelected).unwrap(), Effect::None);
    }

    #[test]
    fn query_without_matches_has_no_cursor() {
        let mut store = store();
        store.dispatch(Action::SetQuery("zzz".to_string())).unwrap();
        assert_eq!(store.cursor(), None);
        store.dispatch(Action::SelectNext).unwrap();
        assert_eq!(store.cursor(), None);
    }

    #[test]
    fn cursor_is_clamped_after_deleting_links() {
        let mut store = store();
        store.dispatch(Action::SetQuery(String::new())).unwrap();
        for _ in 0..3 {
            store.dispatch(Action::SelectNext).unwrap();
        }
        assert_eq!(store.cursor(), Some(3));
        store
            .dispatch(Action::DeleteLink {
                id: "4".to_string(),
            })
            .unwrap();
        assert_eq!(store.cursor(), Some(2));
    }

    #[test]
    fn replace_library_clears_invalid_icons_and_fixes_selection() {
        let mut store = store();
        let mut library = Library::new(
            vec![Category::new("x", "X")],
            vec![Link {
                id: "l".to_string(),
                name: "L".to_string(),
                url: "https://l.example".to_string(),
                alias: None,
                category_id: "x".to_string(),
                favicon: None,
                icon_type: Some("Bogus".to_string()),
            }],
        );
        store
            .dispatch(Action::ReplaceLibrary(library.clone()))
            .unwrap();
        library.links[0].icon_type = None;
        assert_eq!(store.library(), &library);
        assert_eq!(store.selected(), &Selection::Category("x".to_string()));
    }

    #[test]
    fn select_unknown_category_fails() {
        let mut store = store();
        let err = store
            .dispatch(Action::SelectCategory(Selection::Category("nope".to_string())))
            .unwrap_err();
        assert_eq!(err, EngineError::KeyNotFound("nope".to_string()));
        store
            .dispatch(Action::SelectCategory(Selection::All))
            .unwrap();
        assert_eq!(store.selected(), &Selection::All);
    }

    #[test]
    fn background_changes_only_persist_locally() {
        let mut store = store();
        let effect = store
            .dispatch(Action::SetBackgroundColor(Some("#202020".to_string())))
            .unwrap();
        assert_eq!(effect, Effect::PersistLocal);
        assert_eq!(store.background_color(), Some("#202020"));
        store
            .dispatch(Action::SetBackgroundColor(Some(" ".to_string())))
            .unwrap();
        assert_eq!(store.background_color(), None);
    }
}
