use engine::{Action, Icon, Library, Link, LinkDraft, Selection, favicon, icons};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Url,
    Alias,
    Category,
    Icon,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::Name,
        FormField::Url,
        FormField::Alias,
        FormField::Category,
        FormField::Icon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Url => "URL",
            Self::Alias => "Alias",
            Self::Category => "Category",
            Self::Icon => "Icon",
        }
    }

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Add/edit link dialog.
#[derive(Debug, Clone)]
pub struct LinkForm {
    /// Id of the link being edited; `None` when adding.
    pub editing: Option<String>,
    pub name: String,
    pub url: String,
    pub alias: String,
    /// Index into the library's categories.
    pub category: usize,
    pub icon: String,
    pub focus: FormField,
    pub error: Option<String>,
}

impl LinkForm {
    /// Empty form filed under the selected category, or the first one.
    pub fn create(library: &Library, selected: &Selection) -> Self {
        let category = selected
            .category_id()
            .and_then(|id| library.categories.iter().position(|c| c.id == id))
            .unwrap_or(0);
        Self {
            editing: None,
            name: String::new(),
            url: String::new(),
            alias: String::new(),
            category,
            icon: String::new(),
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn edit(library: &Library, link: &Link) -> Self {
        let category = library
            .categories
            .iter()
            .position(|c| c.id == link.category_id)
            .unwrap_or(0);
        Self {
            editing: Some(link.id.clone()),
            name: link.name.clone(),
            url: link.url.clone(),
            alias: link.alias.clone().unwrap_or_default(),
            category,
            icon: link.icon_type.clone().unwrap_or_default(),
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit link"
        } else {
            "Add link"
        }
    }

    fn active_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Url => Some(&mut self.url),
            FormField::Alias => Some(&mut self.alias),
            FormField::Icon => Some(&mut self.icon),
            FormField::Category => None,
        }
    }

    pub fn input(&mut self, ch: char) {
        if let Some(text) = self.active_text() {
            text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.active_text() {
            text.pop();
        }
    }

    /// Step the category choice, wrapping around.
    pub fn cycle_category(&mut self, forward: bool, count: usize) {
        if count == 0 {
            return;
        }
        self.category = if forward {
            (self.category + 1) % count
        } else {
            (self.category + count - 1) % count
        };
    }

    /// Icon shown for the current input: the typed name when valid, the
    /// guess from URL and name otherwise.
    pub fn icon_preview(&self) -> Icon {
        Icon::parse(self.icon.trim()).unwrap_or_else(|| icons::suggest(&self.url, &self.name))
    }

    pub fn action(&self, library: &Library) -> Action {
        let category_id = library
            .categories
            .get(self.category)
            .map(|category| category.id.clone())
            .unwrap_or_default();
        let draft = LinkDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            alias: Some(self.alias.clone()),
            category_id,
            favicon: Some(favicon::favicon_for(self.url.trim(), self.name.trim())),
            icon_type: Some(self.icon.trim().to_string()),
        };
        match &self.editing {
            Some(id) => Action::EditLink {
                id: id.clone(),
                draft,
            },
            None => Action::AddLink(draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::{AppStore, Effect};

    use super::*;

    #[test]
    fn focus_cycles_through_every_field() {
        let mut field = FormField::Name;
        for _ in 0..FormField::ORDER.len() {
            field = field.next();
        }
        assert_eq!(field, FormField::Name);
        assert_eq!(FormField::Name.prev(), FormField::Icon);
    }

    #[test]
    fn new_form_targets_the_selected_category() {
        let library = Library::seed();
        let form = LinkForm::create(&library, &Selection::Category("3".to_string()));
        assert_eq!(form.category, 2);

        let form = LinkForm::create(&library, &Selection::All);
        assert_eq!(form.category, 0);
    }

    #[test]
    fn category_field_ignores_typing() {
        let mut form = LinkForm::create(&Library::seed(), &Selection::All);
        form.focus = FormField::Category;
        form.input('x');
        form.cycle_category(false, 3);
        assert_eq!(form.category, 2);
        assert!(form.name.is_empty());
    }

    #[test]
    fn submitted_form_adds_a_link_with_a_guessed_icon() {
        let mut store = AppStore::new(Library::seed());
        let mut form = LinkForm::create(store.library(), store.selected());
        form.name = "Rust".to_string();
        form.url = "https://github.com/rust-lang/rust".to_string();

        assert_eq!(form.icon_preview(), Icon::Github);
        let effect = store.dispatch(form.action(store.library())).unwrap();
        assert_eq!(effect, Effect::Persist);

        let added = store.library().links.last().unwrap();
        assert_eq!(added.category_id, "1");
        assert_eq!(added.icon_type.as_deref(), Some("Github"));
        assert!(added.alias.is_none());
        assert!(added.favicon.as_deref().unwrap().contains("github.com"));
    }

    #[test]
    fn edit_form_keeps_the_link_id() {
        let mut store = AppStore::new(Library::seed());
        let link = store.library().link("4").unwrap().clone();
        let mut form = LinkForm::edit(store.library(), &link);
        form.name.push_str(" HQ");
        form.cycle_category(false, store.library().categories.len());

        store.dispatch(form.action(store.library())).unwrap();
        let edited = store.library().link("4").unwrap();
        assert_eq!(edited.name, "Slack HQ");
        assert_eq!(edited.category_id, "2");
    }
}
