//! Shared helpers for command handlers.

use rackbook_core::{ObjectDetail, ObjectKind, ObjectStatus, Page, Section, Workspace};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, KindArg, SectionArg, StatusArg};
use crate::error::CliError;

// ── CLI enum → core enum bridges ────────────────────────────────────
//
// cli.rs must stay clap-only so build.rs can compile it standalone;
// the core enums live here instead.

pub fn section(arg: SectionArg) -> Section {
    match arg {
        SectionArg::Overview => Section::Overview,
        SectionArg::Links => Section::Links,
        SectionArg::Arch => Section::Arch,
        SectionArg::Net => Section::Net,
        SectionArg::Inc => Section::Inc,
        SectionArg::Docs => Section::Docs,
    }
}

pub fn kind(arg: KindArg) -> ObjectKind {
    match arg {
        KindArg::Service => ObjectKind::Service,
        KindArg::Server => ObjectKind::Server,
        KindArg::Network => ObjectKind::Network,
    }
}

pub fn status(arg: StatusArg) -> ObjectStatus {
    match arg {
        StatusArg::Ok => ObjectStatus::Ok,
        StatusArg::Warn => ObjectStatus::Warn,
        StatusArg::Bad => ObjectStatus::Bad,
        StatusArg::Unknown => ObjectStatus::Unknown,
    }
}

// ── Session resolution ──────────────────────────────────────────────

/// Install a session on the workspace for this profile.
///
/// Chain: `--token` flag / env var, then the persisted session, then a
/// bare keyring token from `config set-token` (validated against the
/// server since it carries no identity).
pub async fn establish_session(
    workspace: &Workspace,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ref token) = global.token {
        workspace
            .authenticate_token(SecretString::from(token.clone()))
            .await?;
        return Ok(());
    }

    if let Some(session) = rackbook_config::load_session(profile_name)? {
        workspace.restore_session(session);
        return Ok(());
    }

    if let Some(token) = rackbook_config::stored_token(profile_name) {
        workspace.authenticate_token(token).await?;
        return Ok(());
    }

    Err(CliError::NotSignedIn)
}

// ── Lookup helpers ──────────────────────────────────────────────────

/// Find the page of a given section on an object detail.
pub fn find_page(detail: &ObjectDetail, section: Section) -> Result<&Page, CliError> {
    detail.page(section).ok_or_else(|| CliError::NotFound {
        what: format!(
            "no '{section}' page on object {} ({})",
            detail.object.id, detail.object.name
        ),
    })
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Status cell with optional color, shared by tree and objects views.
pub fn status_cell(status: ObjectStatus, color: bool) -> String {
    use owo_colors::OwoColorize;

    let label = status.as_str();
    if !color {
        return format!("[{label}]");
    }
    match status {
        ObjectStatus::Ok => format!("[{}]", label.green()),
        ObjectStatus::Warn => format!("[{}]", label.yellow()),
        ObjectStatus::Bad => format!("[{}]", label.red()),
        ObjectStatus::Unknown => format!("[{}]", label.dimmed()),
    }
}
