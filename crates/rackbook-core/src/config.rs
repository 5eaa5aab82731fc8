// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Rackbook server. They carry
// connection tuning, but never credentials and never disk I/O. The
// CLI/TUI resolves its config files and hands a finished
// `WorkspaceConfig` in; login credentials arrive separately through
// `Workspace::login`.

use std::path::PathBuf;
use std::time::Duration;

use rackbook_api::{TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab deployments).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single Rackbook server.
///
/// Built by CLI/TUI, passed to `Workspace` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Server URL (e.g., `https://rackbook.internal.example.net`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl WorkspaceConfig {
    /// Configuration for `url` with strict TLS and the default timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Translate into the transport layer's own config type.
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
