//! `rackbook-tui` — terminal client for browsing and editing datacenter
//! runbooks.
//!
//! Two panes: the inventory tree (company → datacenter → objects) on the
//! left, the object detail with its six runbook sections on the right.
//! Navigation is route-based (`/`, `/object/{id}?tab=…`) with browser-style
//! back/forward history; editing is gated on a signed-in editor session.
//!
//! Logs go to a file (default `/tmp/rackbook-tui.log`) — never stdout,
//! which belongs to the terminal UI.
//!
//! Entry point: CLI parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod markdown;
mod modals;
mod route;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rackbook_core::{Section, TlsVerification, Workspace, WorkspaceConfig};

use crate::app::App;
use crate::route::Route;

/// Terminal UI for the Rackbook infrastructure runbook service.
#[derive(Parser, Debug)]
#[command(name = "rackbook-tui", version, about)]
struct Cli {
    /// Server URL (e.g. https://rackbook.internal.example.net)
    #[arg(short = 's', long, env = "RACKBOOK_SERVER")]
    server: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "RACKBOOK_PROFILE")]
    profile: Option<String>,

    /// Skip TLS certificate verification (self-signed lab deployments)
    #[arg(short = 'k', long, env = "RACKBOOK_INSECURE")]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "RACKBOOK_TIMEOUT")]
    timeout: Option<u64>,

    /// Open directly on an object (deep link)
    #[arg(long, value_name = "ID")]
    object: Option<i64>,

    /// Section tab to open with --object (overview, links, arch, net, inc, docs)
    #[arg(long, value_name = "SECTION", requires = "object")]
    tab: Option<Section>,

    /// Log file path
    #[arg(long, default_value = "/tmp/rackbook-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// terminal UI. The returned guard must be held until exit so buffered
/// lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rackbook_tui={log_level},rackbook_core={log_level},rackbook_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("rackbook-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the profile name and its connection settings. CLI flags win
/// over the profile, the profile over `[defaults]`.
fn resolve_workspace(cli: &Cli) -> Result<(String, WorkspaceConfig)> {
    let cfg = rackbook_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut ws_config = if let Some(server) = &cli.server {
        let url: url::Url = server
            .parse()
            .map_err(|e| eyre!("invalid server URL '{server}': {e}"))?;
        WorkspaceConfig::new(url)
    } else {
        let profile = cfg.profiles.get(&profile_name).ok_or_else(|| {
            eyre!(
                "no server configured: pass --server or create profile '{profile_name}' \
                 with `rackbook config init`"
            )
        })?;
        rackbook_config::profile_to_workspace_config(profile, &cfg.defaults)?
    };

    if cli.insecure {
        ws_config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.timeout {
        ws_config.timeout = Duration::from_secs(secs);
    }

    Ok((profile_name, ws_config))
}

/// The route to open at startup.
fn initial_route(cli: &Cli) -> Route {
    match cli.object {
        Some(id) => Route::Object {
            id: rackbook_core::ObjectId(id),
            section: cli.tab.unwrap_or_default(),
        },
        None => Route::Dashboard,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal.
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit.
    let _log_guard = setup_tracing(&cli);

    let (profile_name, ws_config) = resolve_workspace(&cli)?;
    info!(
        server = %ws_config.url,
        profile = %profile_name,
        "starting rackbook-tui"
    );

    let workspace = Workspace::new(ws_config)?;
    let mut app = App::new(workspace, profile_name, initial_route(&cli));
    app.run().await?;

    Ok(())
}
