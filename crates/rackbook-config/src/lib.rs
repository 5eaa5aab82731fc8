//! Shared configuration for the Rackbook CLI and TUI.
//!
//! TOML profiles, session persistence (keyring + env + session file),
//! and translation to `rackbook_core::WorkspaceConfig`. Both binaries
//! depend on this crate — the CLI adds `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use rackbook_core::{Role, Session, TlsVerification, UserId, UserProfile, WorkspaceConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse session file: {0}")]
    SessionParse(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://rackbook.internal.example.net").
    pub server: String,

    /// Username to pre-fill at the sign-in prompt.
    pub username: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "rackbook", "rackbook").map_or_else(
        || {
            let mut p = home_fallback(&[".config", "rackbook"]);
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the session file path (data dir, not config dir).
pub fn session_path() -> PathBuf {
    ProjectDirs::from("io", "rackbook", "rackbook").map_or_else(
        || {
            let mut p = home_fallback(&[".local", "share", "rackbook"]);
            p.push("session.toml");
            p
        },
        |dirs| dirs.data_dir().join("session.toml"),
    )
}

fn home_fallback(segments: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for s in segments {
        p.push(s);
    }
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("RACKBOOK_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `WorkspaceConfig` from a profile — no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers; profile values win
/// over the `[defaults]` section.
pub fn profile_to_workspace_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<WorkspaceConfig, ConfigError> {
    let url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(WorkspaceConfig { url, tls, timeout })
}

// ── Session persistence ─────────────────────────────────────────────
//
// The bearer token lives in the system keyring when one is available;
// the session file carries only the signed-in identity, plus the token
// itself as a plaintext fallback on keyring-less hosts. `RACKBOOK_TOKEN`
// bypasses both for scripted use.

/// One signed-in session as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub user_id: UserId,
    /// Plaintext token fallback; absent when the keyring holds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StoredSession {
    /// Capture a live session for persistence.
    pub fn from_session(session: &Session, token_fallback: Option<String>) -> Self {
        let user = session.user();
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            user_id: user.id,
            token: token_fallback,
        }
    }

    /// Rebuild a live session around the resolved token.
    pub fn into_session(self, token: SecretString) -> Session {
        Session::new(
            token,
            UserProfile {
                id: self.user_id,
                username: self.username,
                full_name: self.full_name,
                role: self.role,
            },
        )
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    sessions: HashMap<String, StoredSession>,
}

fn read_session_file(path: &Path) -> Result<SessionFile, ConfigError> {
    if !path.exists() {
        return Ok(SessionFile::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn write_session_file(path: &Path, file: &SessionFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(file)?)?;
    Ok(())
}

fn token_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new("rackbook", &format!("{profile_name}/token"))
}

/// Token supplied via environment, for scripted / CI use.
pub fn env_token() -> Option<SecretString> {
    std::env::var("RACKBOOK_TOKEN")
        .ok()
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
}

/// Put a bearer token into the system keyring for a profile.
///
/// Used by `config set-token`; the token is picked up by
/// [`stored_token`] on later runs even without a persisted session.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    token_entry(profile_name)
        .and_then(|e| e.set_password(token))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: format!("failed to store token: {e}"),
        })
}

/// Read the bare keyring token for a profile, if one is stored.
pub fn stored_token(profile_name: &str) -> Option<SecretString> {
    token_entry(profile_name)
        .and_then(|e| e.get_password())
        .ok()
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
}

/// Persist a session under the given profile name.
///
/// The token goes to the system keyring when possible, otherwise into
/// the session file itself.
pub fn save_session(profile_name: &str, session: &Session) -> Result<(), ConfigError> {
    let token = session.token().expose_secret();

    let fallback = match token_entry(profile_name).and_then(|e| e.set_password(token)) {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "keyring unavailable, storing token in session file");
            Some(token.to_owned())
        }
    };

    let path = session_path();
    let mut file = read_session_file(&path)?;
    file.sessions.insert(
        profile_name.to_owned(),
        StoredSession::from_session(session, fallback),
    );
    write_session_file(&path, &file)
}

/// Load the persisted session for a profile, if any.
///
/// The token is resolved keyring-first, then from the session file's
/// own fallback field. Returns `Ok(None)` when nothing usable is stored.
pub fn load_session(profile_name: &str) -> Result<Option<Session>, ConfigError> {
    let path = session_path();
    let mut file = read_session_file(&path)?;
    let Some(stored) = file.sessions.remove(profile_name) else {
        return Ok(None);
    };

    let token = token_entry(profile_name)
        .and_then(|e| e.get_password())
        .ok()
        .or_else(|| stored.token.clone());

    match token {
        Some(t) => Ok(Some(stored.into_session(SecretString::from(t)))),
        None => Ok(None),
    }
}

/// Forget the persisted session for a profile.
pub fn clear_session(profile_name: &str) -> Result<(), ConfigError> {
    if let Ok(entry) = token_entry(profile_name) {
        // Missing entries and locked keyrings are both fine here.
        let _ = entry.delete_credential();
    }

    let path = session_path();
    let mut file = read_session_file(&path)?;
    if file.sessions.remove(profile_name).is_some() {
        write_session_file(&path, &file)?;
    }
    Ok(())
}
