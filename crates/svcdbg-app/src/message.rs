//! Message types for the application (TEA pattern)

use svcdbg_core::{MethodCatalog, NetworkFailure, RpcInfo};
use svcdbg_gateway::InvokeResponse;

use crate::history::QueryRecord;
use crate::input_key::InputKey;
use crate::notifications::{NotificationId, NotificationPayload, TimerToken};
use crate::session::{NetworkStep, TabId, Ticket};
use crate::state::{NavSection, Pane};
use crate::text_buffer::TextEdit;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit immediately (q, Ctrl+C, signal handler)
    Quit,

    /// Move keyboard focus to a pane
    FocusPane(Pane),

    /// Cycle focus through the panes
    FocusNextPane,

    // ─────────────────────────────────────────────────────────
    // Catalog Navigator
    // ─────────────────────────────────────────────────────────
    /// Re-list the modules known to the gateway
    RefreshCatalog,
    CatalogLoaded {
        modules: Vec<String>,
    },
    CatalogFailed {
        failure: NetworkFailure,
    },
    /// Switch between services, history and saved queries
    ShowNavSection(NavSection),
    NavigatorUp,
    NavigatorDown,
    /// Open the entry under the navigator cursor
    OpenNavigatorEntry,
    /// Enter the navigator filter input
    StartSearch,
    SearchEdit(TextEdit),
    /// Leave the filter input, keeping the filter
    EndSearch,
    /// Leave the filter input and clear the filter
    ClearSearch,

    // ─────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────
    /// Open a tab for a module
    OpenModule {
        module: String,
    },
    /// Open a tab pre-filled from history or saved queries
    OpenQuery {
        record: QueryRecord,
    },
    NextTab,
    PreviousTab,
    SelectTab(usize),
    CloseTab,
    CloseAllTabs,
    CloseOtherTabs,

    // ─────────────────────────────────────────────────────────
    // Invocation Session (selected tab)
    // ─────────────────────────────────────────────────────────
    MethodCursorUp,
    MethodCursorDown,
    /// Activate the row under the methods cursor
    ActivateMethodRow,
    /// Step the service selection (wrapping)
    CycleService(isize),
    /// Step the instance selection (wrapping)
    CycleInstance(isize),
    SelectService {
        service: String,
    },
    SelectInstance {
        instance: String,
    },
    SelectMethod {
        method: String,
    },
    /// Re-list the selected tab's catalog
    ReloadTab,
    /// Send the current request of the selected tab
    Invoke,
    ScrollResultUp,
    ScrollResultDown,
    PageResultUp,
    PageResultDown,

    // ─────────────────────────────────────────────────────────
    // Gateway Responses (tagged with tab and ticket)
    // ─────────────────────────────────────────────────────────
    MethodsListed {
        tab_id: TabId,
        ticket: Ticket,
        catalog: MethodCatalog,
    },
    MethodDescribed {
        tab_id: TabId,
        ticket: Ticket,
        info: Box<RpcInfo>,
    },
    InvokeCompleted {
        tab_id: TabId,
        ticket: Ticket,
        response: InvokeResponse,
        client_ms: u64,
    },
    RequestFailed {
        tab_id: TabId,
        step: NetworkStep,
        ticket: Ticket,
        failure: NetworkFailure,
    },

    // ─────────────────────────────────────────────────────────
    // Request Editor (selected tab)
    // ─────────────────────────────────────────────────────────
    EditorUp,
    EditorDown,
    /// Toggle presence of the field under the cursor
    TogglePresence,
    /// Type-specific primary edit: start text input, flip a bool, step an enum
    ActivateField,
    CycleEnum(isize),
    /// Append an element to the repeated field under the cursor
    AppendElement,
    /// Remove the element under the cursor
    RemoveElement,
    FieldInputEdit(TextEdit),
    CommitFieldInput,
    CancelFieldInput,
    Undo,
    /// Switch between structured and text views
    ToggleRequestView,
    /// Open the text view for editing
    StartTextEdit,
    TextViewEdit(TextEdit),
    /// Parse the text view back into the request
    CommitTextView,
    /// Leave the text editor without committing
    CancelTextEdit,
    /// Store the current request as a saved query
    SaveQuery,
    ClearHistory,

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────
    PushNotification {
        payload: NotificationPayload,
    },
    NotificationTimerFired {
        id: NotificationId,
        token: TimerToken,
    },
    /// Move focus into the notification list (keeps the focused item)
    FocusNotifications,
    NotificationFocusNext,
    NotificationFocusPrevious,
    /// Leave the notification list (releases the focused item)
    LeaveNotifications,
    /// Remove the focused notification
    DismissNotification,

    // ─────────────────────────────────────────────────────────
    // Login Prompt
    // ─────────────────────────────────────────────────────────
    /// A boundary call answered 401
    LoginRequired,
    LoginEdit(TextEdit),
    LoginSwitchField,
    LoginSubmit,
    LoginSucceeded,
    LoginFailed {
        message: String,
    },
    LoginCancel,
}
