//! CLI-side profile resolution.
//!
//! File/env loading and session persistence live in `rackbook-config`;
//! this module only layers `GlobalOpts` flag overrides on top and is the
//! single point where CLI flags cross into `rackbook_core` config types.

use std::time::Duration;

use rackbook_config::Config;
use rackbook_core::{TlsVerification, WorkspaceConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `WorkspaceConfig` for this invocation.
///
/// With a matching profile, `--server` / `--insecure` / `--timeout`
/// override its values. Without one, `--server` alone is enough; anything
/// less is a config error pointing at `config init`.
pub fn resolve_workspace_config(
    global: &GlobalOpts,
    config: &Config,
    profile_name: &str,
) -> Result<WorkspaceConfig, CliError> {
    let profile = config.profiles.get(profile_name);

    let server = global
        .server
        .as_deref()
        .or(profile.map(|p| p.server.as_str()))
        .ok_or_else(|| CliError::NoConfig {
            path: rackbook_config::config_path().display().to_string(),
        })?;

    let url: url::Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let insecure = global.insecure
        || profile
            .and_then(|p| p.insecure)
            .unwrap_or(config.defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca_path)
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(WorkspaceConfig {
        url,
        tls,
        timeout: Duration::from_secs(global.timeout),
    })
}
