//! Actions flowing through the app loop.
//!
//! Input handlers and background tasks produce actions; the app routes them
//! to the panes and modals. Completed fetches carry their payloads as `Arc`
//! so broadcasting stays cheap.

use std::sync::Arc;

use rackbook_core::{
    Document, DocumentKind, InventoryTree, ObjectDetail, ObjectId, Page, PageId, Section, Session,
};

use crate::route::Route;

/// One step of app state change.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ───────────────────────────────────────────────────
    /// Push a route onto the history and dispatch it.
    Navigate(Route),
    /// Replace the current history entry (section tab switches).
    ReplaceRoute(Route),
    Back,
    Forward,
    /// Broadcast after every history change; panes sync themselves to it.
    RouteChanged(Route),
    /// Cycle input focus between the tree and detail panes.
    FocusNext,
    /// Re-fetch the inventory tree and re-dispatch the current route.
    Refresh,

    // ── Tree filter (input mode lives in the app, state in the tree) ─
    FilterInput(String),
    FilterClear,

    // ── Data completions ─────────────────────────────────────────────
    TreeLoaded(Arc<InventoryTree>),
    TreeLoadFailed(String),
    ObjectLoaded {
        generation: u64,
        detail: Arc<ObjectDetail>,
    },
    ObjectLoadFailed {
        generation: u64,
        message: String,
    },
    /// Company/datacenter scope shown in the tree changed.
    ScopeChanged(ScopeSummary),

    // ── Session ──────────────────────────────────────────────────────
    OpenLogin,
    SubmitLogin {
        username: String,
        password: String,
    },
    LoginResult(Result<Arc<Session>, String>),
    /// A stored token was validated in the background at startup.
    SessionRestored(Arc<Session>),
    Logout,
    /// Broadcast after any session change so panes can re-gate affordances.
    SessionChanged {
        can_edit: bool,
    },

    // ── Page editing ─────────────────────────────────────────────────
    OpenEditor {
        page_id: PageId,
        section: Section,
        content: String,
    },
    SavePage {
        page_id: PageId,
        content: String,
    },
    PageSaved(Arc<Page>),
    PageSaveFailed(String),

    // ── Documents ────────────────────────────────────────────────────
    OpenUpload {
        object_id: ObjectId,
    },
    SubmitUpload {
        object_id: ObjectId,
        title: String,
        kind: DocumentKind,
        url: Option<String>,
        path: Option<String>,
    },
    DocumentUploaded(Arc<Document>),
    DocumentUploadFailed(String),

    // ── Overlays ─────────────────────────────────────────────────────
    CloseModal,
    ToggleHelp,
    Notify(Notification),
}

/// What the tree pane currently shows, for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSummary {
    pub company: Option<String>,
    pub datacenter: Option<String>,
    pub object_count: usize,
}

/// A transient toast shown in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}
