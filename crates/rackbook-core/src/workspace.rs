// ── Workspace facade ──
//
// Full lifecycle for one Rackbook server connection: sign-in, session
// tracking, inventory reads, and role-gated runbook writes. The CLI and
// TUI both talk to the server exclusively through this type.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tracing::{debug, info};

use rackbook_api::ApiClient;
use rackbook_api::types::{
    Company, Document, DocumentKind, InventoryTree, NewDocument, ObjectDetail, ObjectId, Page,
    PageId,
};

use crate::config::WorkspaceConfig;
use crate::error::CoreError;
use crate::session::Session;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<WorkspaceInner>`. Owns the HTTP client and
/// the current session slot; reads are anonymous, writes require a
/// session with edit rights.
#[derive(Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

struct WorkspaceInner {
    config: WorkspaceConfig,
    api: ApiClient,
    session: ArcSwapOption<Session>,
}

impl Workspace {
    /// Create a workspace from configuration. Does NOT contact the
    /// server -- call [`login()`](Self::login) or issue a read.
    pub fn new(config: WorkspaceConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.url.as_str(), &config.transport())?;
        Ok(Self {
            inner: Arc::new(WorkspaceInner {
                config,
                api,
                session: ArcSwapOption::empty(),
            }),
        })
    }

    /// Access the workspace configuration.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.inner.config
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// The current session, if signed in.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.inner.session.load_full()
    }

    /// Whether the current session may save pages and upload documents.
    pub fn can_edit(&self) -> bool {
        self.session().is_some_and(|s| s.can_edit())
    }

    /// Install a previously persisted session without contacting the
    /// server. Call [`refresh_profile()`](Self::refresh_profile) to find
    /// out whether the token is still accepted.
    pub fn restore_session(&self, session: Session) {
        self.inner.session.store(Some(Arc::new(session)));
    }

    /// Sign in with username and password.
    ///
    /// The login response itself may omit profile fields, so the profile
    /// is re-fetched from `auth/me` before the session is stored. The
    /// session is returned as well so the caller can persist it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        let resp = self.inner.api.login(username, password).await?;
        let token = SecretString::from(resp.access_token);
        let user = self.inner.api.me(&token).await?;
        info!(username = %user.username, role = %user.role, "signed in");

        let session = Arc::new(Session::new(token, user));
        self.inner.session.store(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// Adopt a pre-issued bearer token (e.g. from the environment).
    ///
    /// Validates it against `auth/me` and installs the resulting session.
    pub async fn authenticate_token(&self, token: SecretString) -> Result<Arc<Session>, CoreError> {
        let user = self.inner.api.me(&token).await?;
        info!(username = %user.username, role = %user.role, "token accepted");

        let session = Arc::new(Session::new(token, user));
        self.inner.session.store(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// Re-fetch the profile for the current session token.
    ///
    /// Returns the refreshed session, or `None` when no session is
    /// installed or the server no longer accepts the token (the stale
    /// session is dropped in that case, so the caller can prompt for a
    /// fresh sign-in).
    pub async fn refresh_profile(&self) -> Result<Option<Arc<Session>>, CoreError> {
        let Some(current) = self.session() else {
            return Ok(None);
        };

        match self.inner.api.me(current.token()).await {
            Ok(user) => {
                let session = Arc::new(Session::new(current.token().clone(), user));
                self.inner.session.store(Some(Arc::clone(&session)));
                Ok(Some(session))
            }
            Err(e) if e.is_auth_expired() => {
                debug!("stored token no longer accepted, dropping session");
                self.inner.session.store(None);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop the current session. Returns the dropped session so the
    /// caller can clear persisted state too.
    pub fn logout(&self) -> Option<Arc<Session>> {
        let prev = self.inner.session.swap(None);
        if let Some(s) = &prev {
            info!(username = %s.username(), "signed out");
        }
        prev
    }

    // ── Inventory reads ──────────────────────────────────────────

    /// Fetch the full company / datacenter / object tree.
    pub async fn tree(&self) -> Result<InventoryTree, CoreError> {
        Ok(self.inner.api.tree().await?)
    }

    /// Fetch the flat company list.
    pub async fn companies(&self) -> Result<Vec<Company>, CoreError> {
        Ok(self.inner.api.companies().await?)
    }

    /// Fetch one object with its pages, relations, documents, and incidents.
    pub async fn object(&self, id: ObjectId) -> Result<ObjectDetail, CoreError> {
        Ok(self.inner.api.object(id).await?)
    }

    /// Fetch the documents attached to an object.
    pub async fn object_documents(&self, id: ObjectId) -> Result<Vec<Document>, CoreError> {
        Ok(self.inner.api.object_documents(id).await?)
    }

    // ── Runbook writes ───────────────────────────────────────────

    /// Save new markdown for a runbook page. Requires edit rights.
    pub async fn save_page(&self, id: PageId, content_md: &str) -> Result<Page, CoreError> {
        let session = self.editing_session()?;
        let page = self
            .inner
            .api
            .update_page(session.token(), id, content_md)
            .await?;
        info!(page = %id, section = %page.section, "saved page");
        Ok(page)
    }

    /// Attach a document to an object. Requires edit rights.
    ///
    /// A `File` document must carry file bytes; that is rejected locally
    /// before any network traffic, mirroring the server's own check.
    pub async fn add_document(
        &self,
        object_id: ObjectId,
        doc: NewDocument,
    ) -> Result<Document, CoreError> {
        let session = self.editing_session()?;
        if doc.kind == DocumentKind::File && doc.file.is_none() {
            return Err(CoreError::ValidationFailed {
                message: "file is required".into(),
            });
        }

        let created = self
            .inner
            .api
            .upload_document(session.token(), object_id, doc)
            .await?;
        info!(object = %object_id, document = %created.id, "attached document");
        Ok(created)
    }

    // ── Internal ─────────────────────────────────────────────────

    /// The current session, if it holds edit rights.
    fn editing_session(&self) -> Result<Arc<Session>, CoreError> {
        let Some(session) = self.session() else {
            return Err(CoreError::AuthRequired);
        };
        if !session.can_edit() {
            return Err(CoreError::PermissionDenied {
                message: format!("role '{}' is read-only", session.role()),
            });
        }
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rackbook_api::types::{Role, UserId, UserProfile};

    use super::*;

    /// Workspace pointed at a closed port; write gates fire before any
    /// request is made, so no server is needed.
    fn offline_workspace() -> Workspace {
        let config = WorkspaceConfig::new("http://127.0.0.1:9".parse().unwrap());
        Workspace::new(config).unwrap()
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: UserId(7),
            username: "kim".into(),
            full_name: "Kim Ops".into(),
            role,
        }
    }

    fn session(role: Role) -> Session {
        Session::new(SecretString::from("tok".to_owned()), profile(role))
    }

    #[test]
    fn save_page_without_session_is_auth_required() {
        let ws = offline_workspace();
        let result = tokio_test::block_on(ws.save_page(PageId(1), "# hi"));
        assert!(matches!(result, Err(CoreError::AuthRequired)));
    }

    #[test]
    fn save_page_as_viewer_is_permission_denied() {
        let ws = offline_workspace();
        ws.restore_session(session(Role::Viewer));

        let result = tokio_test::block_on(ws.save_page(PageId(1), "# hi"));
        match result {
            Err(CoreError::PermissionDenied { message }) => {
                assert!(message.contains("viewer"), "unexpected message: {message}");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn file_document_without_bytes_is_rejected_locally() {
        let ws = offline_workspace();
        ws.restore_session(session(Role::Editor));

        let doc = NewDocument {
            title: "wiring diagram".into(),
            kind: DocumentKind::File,
            url: None,
            file: None,
        };
        let result = tokio_test::block_on(ws.add_document(ObjectId(3), doc));
        match result {
            Err(CoreError::ValidationFailed { message }) => {
                assert_eq!(message, "file is required");
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn logout_returns_previous_session_and_clears_slot() {
        let ws = offline_workspace();
        ws.restore_session(session(Role::Admin));
        assert!(ws.can_edit());

        let prev = ws.logout();
        assert_eq!(prev.unwrap().username(), "kim");
        assert!(ws.session().is_none());
        assert!(!ws.can_edit());
        assert!(ws.logout().is_none());
    }

    #[test]
    fn can_edit_tracks_role() {
        let ws = offline_workspace();
        assert!(!ws.can_edit());

        ws.restore_session(session(Role::Viewer));
        assert!(!ws.can_edit());

        ws.restore_session(session(Role::Editor));
        assert!(ws.can_edit());
    }
}
