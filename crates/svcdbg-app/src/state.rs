//! Application state (Model in TEA pattern)

use svcdbg_core::ValuePath;

use crate::config::Settings;
use crate::history::{QueryRecord, QueryStore};
use crate::notifications::{NotificationId, NotificationQueue};
use crate::tab_manager::TabManager;
use crate::text_buffer::TextBuffer;

/// Current UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Pane navigation
    #[default]
    Normal,

    /// Typing into one request field
    FieldInput,

    /// Editing the raw text view of the request
    TextEditor,

    /// Typing the navigator filter
    Search,

    /// Login prompt shown after a 401
    Login,

    /// Focus is in the notification list
    Notifications,
}

/// Application-level lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Focusable panes, in focus-cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Navigator,
    Methods,
    Request,
    Response,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Navigator => Pane::Methods,
            Pane::Methods => Pane::Request,
            Pane::Request => Pane::Response,
            Pane::Response => Pane::Navigator,
        }
    }
}

/// Lists the navigator can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavSection {
    #[default]
    Services,
    History,
    Saved,
}

impl NavSection {
    pub fn title(self) -> &'static str {
        match self {
            NavSection::Services => "Services",
            NavSection::History => "History",
            NavSection::Saved => "Saved",
        }
    }
}

/// One line of the navigator
#[derive(Debug, Clone, PartialEq)]
pub enum NavEntry {
    Module(String),
    Query(QueryRecord),
}

impl NavEntry {
    pub fn label(&self) -> String {
        match self {
            NavEntry::Module(module) => module.clone(),
            NavEntry::Query(record) => record.label(),
        }
    }
}

/// Modules known to the gateway
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub modules: Vec<String>,
    pub loading: bool,
    /// A listing has succeeded at least once
    pub loaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NavigatorState {
    pub section: NavSection,
    pub cursor: usize,
    /// Case-insensitive substring filter shared by all sections
    pub filter: TextBuffer,
}

impl NavigatorState {
    pub fn filter_text(&self) -> String {
        self.filter.text()
    }
}

/// Inline input for one request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    pub path: ValuePath,
    pub buffer: TextBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: TextBuffer,
    pub password: TextBuffer,
    pub field: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    pub fn active_buffer(&mut self) -> &mut TextBuffer {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

#[derive(Debug)]
pub struct AppState {
    /// Current UI mode
    pub ui_mode: UiMode,

    /// Pane with keyboard focus in `Normal` mode
    pub focus: Pane,

    pub phase: AppPhase,

    /// Application settings from config file
    pub settings: Settings,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    pub catalog: CatalogState,
    pub navigator: NavigatorState,
    pub history: QueryStore,
    pub saved: QueryStore,

    // ─────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────
    pub tabs: TabManager,

    /// Set while `UiMode::FieldInput` is active
    pub field_input: Option<FieldInput>,

    // ─────────────────────────────────────────────────────────
    // Notifications and dialogs
    // ─────────────────────────────────────────────────────────
    pub notifications: NotificationQueue,

    /// Focused (kept) notification while in `UiMode::Notifications`
    pub notification_focus: Option<NotificationId>,

    pub login: LoginState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with default settings and in-memory query stores
    pub fn new() -> Self {
        let settings = Settings::default();
        let history = QueryStore::in_memory(Some(settings.history.limit));
        Self::with_settings(settings, history, QueryStore::in_memory(None))
    }

    pub fn with_settings(settings: Settings, history: QueryStore, saved: QueryStore) -> Self {
        let notifications = NotificationQueue::new(settings.notifications.expire_after());
        Self {
            ui_mode: UiMode::Normal,
            focus: Pane::Navigator,
            phase: AppPhase::Running,
            settings,
            catalog: CatalogState::default(),
            navigator: NavigatorState::default(),
            history,
            saved,
            tabs: TabManager::new(),
            field_input: None,
            notifications,
            notification_focus: None,
            login: LoginState::default(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Entries of the current navigator section after filtering
    pub fn navigator_entries(&self) -> Vec<NavEntry> {
        let needle = self.navigator.filter_text().to_lowercase();
        match self.navigator.section {
            NavSection::Services => self
                .catalog
                .modules
                .iter()
                .filter(|m| m.to_lowercase().contains(&needle))
                .map(|m| NavEntry::Module(m.clone()))
                .collect(),
            NavSection::History => self
                .history
                .newest_first()
                .into_iter()
                .filter(|r| r.matches(&needle))
                .map(|r| NavEntry::Query(r.clone()))
                .collect(),
            NavSection::Saved => self
                .saved
                .newest_first()
                .into_iter()
                .filter(|r| r.matches(&needle))
                .map(|r| NavEntry::Query(r.clone()))
                .collect(),
        }
    }

    pub fn selected_nav_entry(&self) -> Option<NavEntry> {
        self.navigator_entries()
            .into_iter()
            .nth(self.navigator.cursor)
    }

    /// Keep the navigator cursor on an existing entry
    pub fn clamp_navigator_cursor(&mut self) {
        let len = self.navigator_entries().len();
        self.navigator.cursor = self.navigator.cursor.min(len.saturating_sub(1));
    }
}
