pub mod form;
pub mod layout;
pub mod password;
pub mod text;

use std::{
    path::Path,
    process::Stdio,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyEventKind};
use engine::{
    Action, AppStore, Effect, ImportReport, LinkDraft, ScrollSync, Selection, ViewMode, Viewport,
    batch, favicon, transfer,
};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

use crate::{
    client::Client,
    commands,
    config::AppConfig,
    error::{AppError, Result},
    persist::{LoadSource, StoreAdapter, WriteOutcome},
    ui::{
        self,
        keymap::{KeyAction, map_key},
    },
};

use form::{FormField, LinkForm};
use password::PasswordPanel;
use text::TextBuffer;

const TICK: Duration = Duration::from_millis(100);
const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    until: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Pending,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewCategory,
    RenameCategory(String),
    Import,
    Export,
    Background,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewCategory => "New category",
            Self::RenameCategory(_) => "Rename category",
            Self::Import => "Import from file",
            Self::Export => "Export to file",
            Self::Background => "Background colour (name or #rrggbb, empty to clear)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
}

impl Prompt {
    fn new(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Link { id: String, name: String },
    Category { id: String, name: String, links: usize },
}

impl DeleteTarget {
    pub fn question(&self) -> String {
        match self {
            Self::Link { name, .. } => format!("Delete link \"{name}\"?"),
            Self::Category { name, links, .. } => {
                format!("Delete category \"{name}\" and its {links} link(s)?")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Browse,
    Search,
    LinkForm(LinkForm),
    Prompt(Prompt),
    Confirm(DeleteTarget),
    Batch(TextBuffer),
}

/// Work the event loop performs on behalf of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    None,
    Persist,
    PersistLocal,
    Open(String),
    Export(String),
    Import(String),
    Quit,
}

impl From<Effect> for Followup {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::None => Self::None,
            Effect::Persist => Self::Persist,
            Effect::PersistLocal => Self::PersistLocal,
            Effect::Open(url) => Self::Open(url),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub store: AppStore,
    pub mode: Mode,
    pub scroll: ScrollSync,
    pub scroll_top: u32,
    pub list_height: u32,
    pub sync: SyncStatus,
    pub source: LoadSource,
    pub base_url: String,
    pub toast: Option<ToastState>,
    pub editor: TextBuffer,
    pub editor_error: Option<String>,
    pub password: PasswordPanel,
}

impl AppState {
    pub fn new(store: AppStore, source: LoadSource, base_url: impl Into<String>) -> Self {
        Self {
            store,
            mode: Mode::Browse,
            scroll: ScrollSync::default(),
            scroll_top: 0,
            list_height: 0,
            sync: SyncStatus::Idle,
            source,
            base_url: base_url.into(),
            toast: None,
            editor: TextBuffer::default(),
            editor_error: None,
            password: PasswordPanel::default(),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, level: ToastLevel, now: Instant) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            until: now + TOAST_TTL,
        });
    }

    pub fn notify_error(&mut self, message: impl Into<String>, now: Instant) {
        self.notify(message, ToastLevel::Error, now);
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.until <= now) {
            self.toast = None;
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_top: self.scroll_top,
            height: self.list_height,
        }
    }

    pub fn max_scroll(&self) -> u32 {
        let results = self.store.results();
        layout::max_scroll(layout::rows(&results).len(), self.list_height)
    }

    pub fn set_list_height(&mut self, height: u32) {
        if self.list_height != height {
            self.list_height = height;
            self.scroll_top = self.scroll_top.min(self.max_scroll());
        }
    }

    /// Explicit sidebar choice: select, then bring the section into view.
    pub fn select(&mut self, selection: Selection, now: Instant) {
        if let Err(err) = self
            .store
            .dispatch(Action::SelectCategory(selection.clone()))
        {
            self.notify_error(err.to_string(), now);
            return;
        }
        let sections = layout::sections(&self.store.results());
        let viewport = self.viewport();
        if let Some(offset) = self.scroll.select(selection, &sections, viewport, now) {
            self.scroll_top = offset.min(self.max_scroll());
        }
    }

    pub fn scroll_by(&mut self, delta: i64, now: Instant) {
        let top = (i64::from(self.scroll_top) + delta).clamp(0, i64::from(self.max_scroll()));
        self.scroll_top = u32::try_from(top).unwrap_or(0);
        self.sync_from_scroll(now);
    }

    fn sync_from_scroll(&mut self, now: Instant) {
        let sections = layout::sections(&self.store.results());
        let viewport = self.viewport();
        if let Some(selection) = self.scroll.on_scroll(viewport, &sections, now)
            && let Err(err) = self.store.dispatch(Action::SelectCategory(selection))
        {
            tracing::debug!("scroll selected a stale section: {err}");
        }
    }

    /// Scroll just enough to show the link under the cursor.
    fn reveal_cursor(&mut self, now: Instant) {
        let Some(cursor) = self.store.cursor() else {
            return;
        };
        let row = {
            let results = self.store.results();
            layout::cursor_row(&layout::rows(&results), cursor)
        };
        let Some(row) = row else {
            return;
        };

        let height = self.list_height.max(1);
        let top = if row <= self.scroll_top {
            // Keep the section header visible above the first link.
            row.saturating_sub(1)
        } else if row >= self.scroll_top + height {
            row + 1 - height
        } else {
            return;
        };
        self.scroll_top = top.min(self.max_scroll());
        self.sync_from_scroll(now);
    }

    fn after_library_change(&mut self) {
        let gone = self
            .scroll
            .selection()
            .category_id()
            .is_some_and(|id| self.store.library().category(id).is_none());
        if gone {
            self.scroll.reset();
        }
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    fn dispatch(&mut self, action: Action, now: Instant) -> Followup {
        match self.store.dispatch(action) {
            Ok(effect) => {
                if effect == Effect::Persist {
                    self.after_library_change();
                }
                effect.into()
            }
            Err(err) => {
                self.notify_error(err.to_string(), now);
                Followup::None
            }
        }
    }

    fn navigate(&mut self, action: Action, now: Instant) -> Followup {
        let followup = self.dispatch(action, now);
        self.reveal_cursor(now);
        followup
    }

    fn set_query(&mut self, query: String, now: Instant) -> Followup {
        let followup = self.dispatch(Action::SetQuery(query), now);
        self.scroll_top = 0;
        self.sync_from_scroll(now);
        followup
    }

    /// Selected category, or the first one when "All" is selected.
    fn target_category(&self) -> Option<String> {
        let library = self.store.library();
        self.store
            .selected()
            .category_id()
            .filter(|id| library.category(id).is_some())
            .map(str::to_string)
            .or_else(|| library.categories.first().map(|c| c.id.clone()))
    }

    fn cycle_category(&mut self, forward: bool, now: Instant) {
        let mut options: Vec<Selection> = std::iter::once(Selection::All)
            .chain(
                self.store
                    .library()
                    .categories
                    .iter()
                    .map(|category| Selection::Category(category.id.clone())),
            )
            .collect();
        let count = options.len();
        let current = options
            .iter()
            .position(|option| option == self.store.selected())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.select(options.swap_remove(next), now);
    }

    pub fn handle(&mut self, key: KeyAction, now: Instant) -> Followup {
        if key == KeyAction::Quit {
            return Followup::Quit;
        }
        match self.store.view() {
            ViewMode::JsonEditor => return self.handle_editor(key, now),
            ViewMode::PasswordGenerator => return self.handle_password(key, now),
            ViewMode::Links => {}
        }

        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse(key, now),
            Mode::Search => {
                self.mode = Mode::Search;
                self.handle_search(key, now)
            }
            Mode::LinkForm(form) => self.handle_form(form, key, now),
            Mode::Prompt(prompt) => self.handle_prompt(prompt, key),
            Mode::Confirm(target) => self.handle_confirm(target, key, now),
            Mode::Batch(buffer) => self.handle_batch(buffer, key, now),
        }
    }

    fn handle_browse(&mut self, key: KeyAction, now: Instant) -> Followup {
        let half_page = i64::from((self.list_height / 2).max(1));
        match key {
            KeyAction::Input('q') => return Followup::Quit,
            KeyAction::Input('/') => self.mode = Mode::Search,
            KeyAction::Down | KeyAction::Input('j') => {
                return self.navigate(Action::SelectNext, now);
            }
            KeyAction::Up | KeyAction::Input('k') => {
                return self.navigate(Action::SelectPrev, now);
            }
            KeyAction::Submit => return self.dispatch(Action::OpenSelected, now),
            KeyAction::Cancel => return self.dispatch(Action::ClearQuery, now),
            KeyAction::Next => self.cycle_category(true, now),
            KeyAction::Prev => self.cycle_category(false, now),
            KeyAction::PageDown => self.scroll_by(half_page, now),
            KeyAction::PageUp => self.scroll_by(-half_page, now),
            KeyAction::Input('a') => {
                if self.store.library().categories.is_empty() {
                    self.notify_error("create a category first", now);
                } else {
                    let form = LinkForm::create(self.store.library(), self.store.selected());
                    self.mode = Mode::LinkForm(form);
                }
            }
            KeyAction::Input('e') => {
                let form = self
                    .store
                    .selected_link()
                    .map(|link| LinkForm::edit(self.store.library(), link));
                if let Some(form) = form {
                    self.mode = Mode::LinkForm(form);
                }
            }
            KeyAction::Input('d') => {
                let target = self.store.selected_link().map(|link| DeleteTarget::Link {
                    id: link.id.clone(),
                    name: link.name.clone(),
                });
                if let Some(target) = target {
                    self.mode = Mode::Confirm(target);
                }
            }
            KeyAction::Input('c') => self.mode = Mode::Prompt(Prompt::new(PromptKind::NewCategory, "")),
            KeyAction::Input('r') => {
                let selected = self
                    .store
                    .selected()
                    .category_id()
                    .and_then(|id| self.store.library().category(id));
                if let Some(category) = selected {
                    let prompt = Prompt::new(
                        PromptKind::RenameCategory(category.id.clone()),
                        category.name.clone(),
                    );
                    self.mode = Mode::Prompt(prompt);
                }
            }
            KeyAction::Input('D') => {
                let library = self.store.library();
                let target = self
                    .store
                    .selected()
                    .category_id()
                    .and_then(|id| library.category(id))
                    .map(|category| DeleteTarget::Category {
                        id: category.id.clone(),
                        name: category.name.clone(),
                        links: library.links_in(&category.id).count(),
                    });
                if let Some(target) = target {
                    self.mode = Mode::Confirm(target);
                }
            }
            KeyAction::Input(ch @ ('<' | '>')) => return self.move_selected_category(ch == '>', now),
            KeyAction::Input('b') => {
                if self.target_category().is_some() {
                    self.mode = Mode::Batch(TextBuffer::default());
                } else {
                    self.notify_error("create a category first", now);
                }
            }
            KeyAction::Input('J') => return self.open_editor(now),
            KeyAction::Input('P') => {
                return self.dispatch(Action::SetViewMode(ViewMode::PasswordGenerator), now);
            }
            KeyAction::Input('i') => self.mode = Mode::Prompt(Prompt::new(PromptKind::Import, "")),
            KeyAction::Input('s') => {
                self.mode = Mode::Prompt(Prompt::new(PromptKind::Export, transfer::EXPORT_FILE_NAME));
            }
            KeyAction::Input('B') => {
                let current = self.store.background_color().unwrap_or_default().to_string();
                self.mode = Mode::Prompt(Prompt::new(PromptKind::Background, current));
            }
            _ => {}
        }
        Followup::None
    }

    fn move_selected_category(&mut self, down: bool, now: Instant) -> Followup {
        let categories = &self.store.library().categories;
        let Some(from) = self
            .store
            .selected()
            .category_id()
            .and_then(|id| categories.iter().position(|c| c.id == id))
        else {
            return Followup::None;
        };
        let to = if down {
            (from + 1).min(categories.len() - 1)
        } else {
            from.saturating_sub(1)
        };
        if from == to {
            return Followup::None;
        }
        self.dispatch(Action::MoveCategory { from, to }, now)
    }

    fn handle_search(&mut self, key: KeyAction, now: Instant) -> Followup {
        match key {
            KeyAction::Cancel => {
                self.mode = Mode::Browse;
                let followup = self.dispatch(Action::ClearQuery, now);
                self.scroll_top = 0;
                followup
            }
            KeyAction::Next | KeyAction::Prev => {
                self.mode = Mode::Browse;
                Followup::None
            }
            KeyAction::Submit => self.dispatch(Action::OpenSelected, now),
            KeyAction::Down => self.navigate(Action::SelectNext, now),
            KeyAction::Up => self.navigate(Action::SelectPrev, now),
            KeyAction::Backspace => {
                let mut query = self.store.query().to_string();
                query.pop();
                self.set_query(query, now)
            }
            KeyAction::Input(ch) => {
                let mut query = self.store.query().to_string();
                query.push(ch);
                self.set_query(query, now)
            }
            KeyAction::Ctrl('n') => self.dispatch(Action::ToggleField(engine::SearchField::Name), now),
            KeyAction::Ctrl('a') => self.dispatch(Action::ToggleField(engine::SearchField::Alias), now),
            KeyAction::Ctrl('u') => self.dispatch(Action::ToggleField(engine::SearchField::Url), now),
            _ => Followup::None,
        }
    }

    fn handle_form(&mut self, mut form: LinkForm, key: KeyAction, now: Instant) -> Followup {
        match key {
            KeyAction::Cancel => return Followup::None,
            KeyAction::Next => form.focus = form.focus.next(),
            KeyAction::Prev => form.focus = form.focus.prev(),
            KeyAction::Left | KeyAction::Right if form.focus == FormField::Category => {
                let count = self.store.library().categories.len();
                form.cycle_category(key == KeyAction::Right, count);
            }
            KeyAction::Backspace => form.backspace(),
            KeyAction::Input(ch) => form.input(ch),
            KeyAction::Submit => {
                let action = form.action(self.store.library());
                match self.store.dispatch(action) {
                    Ok(effect) => {
                        self.after_library_change();
                        let verb = if form.editing.is_some() { "Updated" } else { "Added" };
                        self.notify(
                            format!("{verb} {}", form.name.trim()),
                            ToastLevel::Success,
                            now,
                        );
                        return effect.into();
                    }
                    Err(err) => form.error = Some(err.to_string()),
                }
            }
            _ => {}
        }
        self.mode = Mode::LinkForm(form);
        Followup::None
    }

    fn handle_prompt(&mut self, mut prompt: Prompt, key: KeyAction) -> Followup {
        match key {
            KeyAction::Cancel => return Followup::None,
            KeyAction::Backspace => {
                prompt.input.pop();
            }
            KeyAction::Input(ch) => prompt.input.push(ch),
            KeyAction::Submit => return self.submit_prompt(prompt),
            _ => {}
        }
        self.mode = Mode::Prompt(prompt);
        Followup::None
    }

    fn submit_prompt(&mut self, mut prompt: Prompt) -> Followup {
        let input = prompt.input.trim().to_string();
        let action = match &prompt.kind {
            PromptKind::NewCategory => Action::AddCategory { name: input },
            PromptKind::RenameCategory(id) => Action::RenameCategory {
                id: id.clone(),
                name: input,
            },
            PromptKind::Background => Action::SetBackgroundColor(Some(input)),
            PromptKind::Export if !input.is_empty() => return Followup::Export(input),
            PromptKind::Import if !input.is_empty() => return Followup::Import(input),
            PromptKind::Export | PromptKind::Import => {
                prompt.error = Some("a file path is required".to_string());
                self.mode = Mode::Prompt(prompt);
                return Followup::None;
            }
        };

        match self.store.dispatch(action) {
            Ok(effect) => {
                if effect == Effect::Persist {
                    self.after_library_change();
                }
                effect.into()
            }
            Err(err) => {
                prompt.error = Some(err.to_string());
                self.mode = Mode::Prompt(prompt);
                Followup::None
            }
        }
    }

    fn handle_confirm(&mut self, target: DeleteTarget, key: KeyAction, now: Instant) -> Followup {
        match key {
            KeyAction::Input('y') | KeyAction::Submit => {
                let action = match target {
                    DeleteTarget::Link { id, .. } => Action::DeleteLink { id },
                    DeleteTarget::Category { id, .. } => Action::DeleteCategory { id },
                };
                self.dispatch(action, now)
            }
            KeyAction::Input('n') | KeyAction::Cancel => Followup::None,
            _ => {
                self.mode = Mode::Confirm(target);
                Followup::None
            }
        }
    }

    fn handle_batch(&mut self, mut buffer: TextBuffer, key: KeyAction, now: Instant) -> Followup {
        match key {
            KeyAction::Cancel => return Followup::None,
            KeyAction::Save => return self.submit_batch(&buffer.text(), now),
            _ => edit_text(&mut buffer, key),
        }
        self.mode = Mode::Batch(buffer);
        Followup::None
    }

    /// Add every recognised line of `text` to the target category.
    pub fn submit_batch(&mut self, text: &str, now: Instant) -> Followup {
        let Some(category_id) = self.target_category() else {
            self.notify_error("create a category first", now);
            return Followup::None;
        };

        let parsed = batch::parse(text);
        let mut added = 0;
        for entry in parsed.entries {
            let favicon = favicon::favicon_for(&entry.url, &entry.name);
            let draft = LinkDraft {
                favicon: Some(favicon),
                ..LinkDraft::new(entry.name, entry.url, category_id.clone())
            };
            match self.store.dispatch(Action::AddLink(draft)) {
                Ok(_) => added += 1,
                Err(err) => tracing::warn!("batch entry rejected: {err}"),
            }
        }

        let mut message = format!("Added {added} link(s)");
        if !parsed.errors.is_empty() {
            let lines: Vec<String> = parsed
                .errors
                .iter()
                .map(|error| error.line.to_string())
                .collect();
            message.push_str(&format!(", invalid URL on line {}", lines.join(", ")));
        }
        let level = if added > 0 {
            ToastLevel::Success
        } else {
            ToastLevel::Error
        };
        self.notify(message, level, now);

        if added == 0 {
            return Followup::None;
        }
        self.after_library_change();
        Followup::Persist
    }

    fn open_editor(&mut self, now: Instant) -> Followup {
        match transfer::export(self.store.library()) {
            Ok(text) => {
                self.editor = TextBuffer::from_text(&text);
                self.editor_error = None;
                self.dispatch(Action::SetViewMode(ViewMode::JsonEditor), now)
            }
            Err(err) => {
                self.notify_error(err.to_string(), now);
                Followup::None
            }
        }
    }

    fn handle_editor(&mut self, key: KeyAction, now: Instant) -> Followup {
        match key {
            KeyAction::Cancel => {
                self.editor_error = None;
                self.dispatch(Action::SetViewMode(ViewMode::Links), now)
            }
            KeyAction::Save => match transfer::parse_editor(&self.editor.text()) {
                Ok(report) => {
                    self.editor_error = None;
                    self.replace_library(report, now)
                }
                Err(err) => {
                    self.editor_error = Some(err.to_string());
                    Followup::None
                }
            },
            _ => {
                edit_text(&mut self.editor, key);
                Followup::None
            }
        }
    }

    /// Swap in an imported or edited library and report what was dropped.
    pub fn replace_library(&mut self, report: ImportReport, now: Instant) -> Followup {
        let summary = format!(
            "Loaded {} categories and {} links",
            report.library.categories.len(),
            report.library.links.len()
        );
        let skipped = report.skipped();
        let followup = self.dispatch(Action::ReplaceLibrary(report.library), now);
        if followup == Followup::Persist {
            self.scroll_top = 0;
            let message = if skipped > 0 {
                format!("{summary}, {skipped} invalid entries skipped")
            } else {
                summary
            };
            self.notify(message, ToastLevel::Success, now);
        }
        followup
    }

    fn handle_password(&mut self, key: KeyAction, now: Instant) -> Followup {
        if matches!(key, KeyAction::Cancel | KeyAction::Input('q')) {
            return self.dispatch(Action::SetViewMode(ViewMode::Links), now);
        }
        let panel = &mut self.password;
        match key {
            KeyAction::Up | KeyAction::Input('k') => panel.up(),
            KeyAction::Down | KeyAction::Input('j') => panel.down(),
            KeyAction::Left | KeyAction::Input('-') => panel.adjust(-1),
            KeyAction::Right | KeyAction::Input('+') | KeyAction::Input(' ') => panel.adjust(1),
            KeyAction::Submit | KeyAction::Input('g') => panel.regenerate(),
            _ => {}
        }
        Followup::None
    }
}

fn edit_text(buffer: &mut TextBuffer, key: KeyAction) {
    match key {
        KeyAction::Submit => buffer.newline(),
        KeyAction::Backspace => buffer.backspace(),
        KeyAction::Next => buffer.insert_str("  "),
        KeyAction::Up => buffer.up(),
        KeyAction::Down => buffer.down(),
        KeyAction::Left => buffer.left(),
        KeyAction::Right => buffer.right(),
        KeyAction::Input(ch) => buffer.insert(ch),
        _ => {}
    }
}

pub struct App {
    config: AppConfig,
    adapter: StoreAdapter<Client>,
    outcomes: UnboundedReceiver<WriteOutcome>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let (adapter, outcomes) = StoreAdapter::new(
            client,
            &config.cache_path,
            Duration::from_millis(config.debounce_ms),
        );
        let loaded = adapter.load().await;
        tracing::info!("library loaded from {:?}", loaded.source);
        let source = loaded.source;
        let state = AppState::new(loaded.into_store(), source, config.base_url.clone());

        Ok(Self {
            config,
            adapter,
            outcomes,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result?;

        if self.adapter.is_pending()
            && let WriteOutcome::Failed(reason) =
                self.adapter.flush(self.state.store.library()).await
        {
            eprintln!(
                "changes are saved in {} but did not reach the server: {reason}",
                self.adapter.cache_path().display()
            );
        }
        Ok(())
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.drain_outcomes(now);
            self.state.expire_toast(now);

            let size = terminal
                .size()
                .map_err(|err| AppError::Terminal(err.to_string()))?;
            self.state.set_list_height(ui::list_height(size.height));

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                let followup = self.state.handle(map_key(key), Instant::now());
                self.follow(followup);
            }
        }

        Ok(())
    }

    fn drain_outcomes(&mut self, now: Instant) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.state.sync = match outcome {
                WriteOutcome::Saved => SyncStatus::Saved,
                WriteOutcome::Failed(reason) => {
                    self.state
                        .notify_error(format!("server save failed: {reason}"), now);
                    SyncStatus::Failed(reason)
                }
            };
        }
        if self.adapter.is_pending() {
            self.state.sync = SyncStatus::Pending;
        }
    }

    fn follow(&mut self, followup: Followup) {
        let now = Instant::now();
        match followup {
            Followup::None => {}
            Followup::Quit => self.should_quit = true,
            Followup::Persist => match self.adapter.save(&self.state.store) {
                Ok(()) => self.state.sync = SyncStatus::Pending,
                Err(err) => {
                    tracing::error!("local save failed: {err}");
                    self.state.notify_error(format!("local save failed: {err}"), now);
                }
            },
            Followup::PersistLocal => {
                if let Err(err) = self.adapter.save_local(&self.state.store) {
                    self.state.notify_error(format!("local save failed: {err}"), now);
                }
            }
            Followup::Open(url) => self.open(&url, now),
            Followup::Export(path) => {
                match commands::export_to(self.state.store.library(), Path::new(&path)) {
                    Ok(()) => self
                        .state
                        .notify(format!("Exported to {path}"), ToastLevel::Success, now),
                    Err(err) => self.state.notify_error(err.to_string(), now),
                }
            }
            Followup::Import(path) => match commands::import_from(Path::new(&path)) {
                Ok(report) => {
                    let next = self.state.replace_library(report, now);
                    self.follow(next);
                }
                Err(err) => self.state.notify_error(err.to_string(), now),
            },
        }
    }

    fn open(&mut self, url: &str, now: Instant) {
        match spawn_opener(&self.config.opener, url) {
            Ok(_) => self.state.notify(format!("Opened {url}"), ToastLevel::Info, now),
            Err(err) => self.state.notify_error(
                format!("could not run {}: {err}", self.config.opener),
                now,
            ),
        }
    }
}

/// Runs `opener url` detached from the terminal. The returned task reaps the
/// child once it exits.
fn spawn_opener(opener: &str, url: &str) -> std::io::Result<JoinHandle<()>> {
    let mut child = tokio::process::Command::new(opener)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let opener = opener.to_string();
    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                tracing::warn!("{opener} exited with {status}");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("failed to wait for {opener}: {err}"),
        }
    }))
}

#[cfg(test)]
mod tests {
    use engine::Library;

    use super::*;

    fn state() -> AppState {
        let mut state = AppState::new(
            AppStore::new(Library::seed()),
            LoadSource::Seed,
            "http://127.0.0.1:4000",
        );
        state.set_list_height(4);
        state
    }

    fn category(id: &str) -> Selection {
        Selection::Category(id.to_string())
    }

    fn type_text(state: &mut AppState, text: &str, now: Instant) {
        for ch in text.chars() {
            state.handle(KeyAction::Input(ch), now);
        }
    }

    #[test]
    fn picking_a_category_centers_its_section() {
        let mut state = state();
        let now = Instant::now();

        state.select(category("2"), now);
        assert_eq!(state.scroll_top, 3);

        state.select(category("3"), now);
        assert_eq!(state.scroll_top, 6);
        assert_eq!(state.store.selected(), &category("3"));

        state.select(Selection::All, now);
        assert_eq!(state.scroll_top, 0);
    }

    #[test]
    fn scrolling_reselects_only_after_the_settle_window() {
        let mut state = state();
        let now = Instant::now();
        state.select(category("3"), now);

        state.scroll_by(-10, now + Duration::from_millis(100));
        assert_eq!(state.scroll_top, 0);
        assert_eq!(state.store.selected(), &category("3"));

        state.scroll_by(0, now + Duration::from_secs(1));
        assert_eq!(state.store.selected(), &category("1"));
    }

    #[test]
    fn tab_cycles_through_all_and_each_category() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Next, now);
        assert_eq!(state.store.selected(), &category("2"));
        state.handle(KeyAction::Prev, now);
        state.handle(KeyAction::Prev, now);
        assert_eq!(state.store.selected(), &Selection::All);
        state.handle(KeyAction::Prev, now);
        assert_eq!(state.store.selected(), &category("3"));
    }

    #[test]
    fn search_filters_and_escape_clears() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('/'), now);
        type_text(&mut state, "slack", now);
        assert!(matches!(state.mode, Mode::Search));
        assert_eq!(state.store.results().total(), 1);

        let followup = state.handle(KeyAction::Submit, now);
        assert_eq!(followup, Followup::Open("https://slack.com".to_string()));

        state.handle(KeyAction::Cancel, now);
        assert!(matches!(state.mode, Mode::Browse));
        assert_eq!(state.store.query(), "");
        assert_eq!(state.store.results().total(), 4);
    }

    #[test]
    fn moving_the_cursor_scrolls_it_into_view() {
        let mut state = state();
        let now = Instant::now();
        for _ in 0..4 {
            state.handle(KeyAction::Down, now);
        }
        assert_eq!(state.store.selected_link().unwrap().name, "Slack");
        assert_eq!(state.scroll_top, 5);

        for _ in 0..4 {
            state.handle(KeyAction::Up, now);
        }
        assert_eq!(state.scroll_top, 0);
    }

    #[test]
    fn invalid_link_keeps_the_form_open() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('a'), now);
        type_text(&mut state, "Broken", now);
        state.handle(KeyAction::Next, now);
        type_text(&mut state, "not a url", now);

        assert_eq!(state.handle(KeyAction::Submit, now), Followup::None);
        let Mode::LinkForm(form) = &state.mode else {
            panic!("form closed");
        };
        assert!(form.error.is_some());
        assert_eq!(state.store.library().links.len(), 4);
    }

    #[test]
    fn deleting_the_selected_category_asks_first() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('D'), now);
        let Mode::Confirm(target) = &state.mode else {
            panic!("no confirmation");
        };
        assert_eq!(target.question(), "Delete category \"开发工具\" and its 2 link(s)?");

        assert_eq!(state.handle(KeyAction::Submit, now), Followup::Persist);
        assert_eq!(state.store.selected(), &category("2"));
        assert_eq!(state.store.library().links.len(), 2);
    }

    #[test]
    fn prompts_create_and_rename_categories() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('c'), now);
        type_text(&mut state, "阅读", now);
        assert_eq!(state.handle(KeyAction::Submit, now), Followup::Persist);
        assert_eq!(state.store.library().categories.len(), 4);

        state.handle(KeyAction::Input('r'), now);
        for _ in 0..4 {
            state.handle(KeyAction::Backspace, now);
        }
        type_text(&mut state, "Dev", now);
        state.handle(KeyAction::Submit, now);
        assert_eq!(state.store.library().category("1").unwrap().name, "Dev");

        state.handle(KeyAction::Input('c'), now);
        assert_eq!(state.handle(KeyAction::Submit, now), Followup::None);
        assert!(matches!(&state.mode, Mode::Prompt(prompt) if prompt.error.is_some()));
    }

    #[test]
    fn batch_paste_adds_links_to_the_selected_category() {
        let mut state = state();
        let now = Instant::now();
        state.select(category("2"), now);

        let followup = state.submit_batch(
            "[Dribbble](https://dribbble.com)\nhttps://www.behance.net\nhttps://",
            now,
        );
        assert_eq!(followup, Followup::Persist);

        let names: Vec<&str> = state
            .store
            .library()
            .links_in("2")
            .map(|link| link.name.as_str())
            .collect();
        assert_eq!(names, ["Figma", "Dribbble", "Behance"]);
        assert_eq!(state.toast.as_ref().unwrap().level, ToastLevel::Success);
    }

    #[test]
    fn json_editor_rejects_bad_documents_and_saves_good_ones() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('J'), now);
        assert_eq!(state.store.view(), ViewMode::JsonEditor);
        assert!(state.editor.text().contains("GitHub"));

        state.editor = TextBuffer::from_text("{\"categories\": []}");
        assert_eq!(state.handle(KeyAction::Save, now), Followup::None);
        assert!(state.editor_error.is_some());

        state.editor = TextBuffer::from_text(
            r#"{"categories": [{"id": "9", "name": "Only"}], "links": []}"#,
        );
        assert_eq!(state.handle(KeyAction::Save, now), Followup::Persist);
        assert!(state.editor_error.is_none());
        assert_eq!(state.store.library().categories.len(), 1);

        state.handle(KeyAction::Cancel, now);
        assert_eq!(state.store.view(), ViewMode::Links);
    }

    #[test]
    fn background_colour_is_a_local_preference() {
        let mut state = state();
        let now = Instant::now();

        state.handle(KeyAction::Input('B'), now);
        type_text(&mut state, "#1e1e2e", now);
        assert_eq!(state.handle(KeyAction::Submit, now), Followup::PersistLocal);
        assert_eq!(state.store.background_color(), Some("#1e1e2e"));
    }

    #[test]
    fn toasts_expire() {
        let mut state = state();
        let now = Instant::now();
        state.notify("hello", ToastLevel::Info, now);
        state.expire_toast(now + Duration::from_secs(1));
        assert!(state.toast.is_some());
        state.expire_toast(now + TOAST_TTL);
        assert!(state.toast.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn opener_child_is_reaped() {
        let reaper = spawn_opener("true", "https://example.com").unwrap();
        tokio::time::timeout(Duration::from_secs(5), reaper)
            .await
            .unwrap()
            .unwrap();

        assert!(spawn_opener("linkdeck-no-such-opener", "https://example.com").is_err());
    }
}
