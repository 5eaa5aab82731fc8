// ── Authenticated session state ──

use rackbook_api::types::{Role, UserProfile};
use secrecy::SecretString;

/// A signed-in session: bearer token plus the profile it belongs to.
///
/// Constructed by `Workspace::login`, or rebuilt from persisted state by
/// the CLI/TUI. Token and profile always travel together, so holding a
/// `Session` means both are present.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    user: UserProfile,
}

impl Session {
    /// Pair a bearer token with the profile it authenticates.
    pub fn new(token: SecretString, user: UserProfile) -> Self {
        Self { token, user }
    }

    /// Bearer token for authenticated API calls.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Profile of the signed-in user.
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Role the server granted this session.
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Whether this session may save pages and upload documents.
    pub fn can_edit(&self) -> bool {
        self.user.role.can_edit()
    }

    /// Login name of the signed-in user.
    pub fn username(&self) -> &str {
        &self.user.username
    }
}
