//! Command dispatch: bridges CLI args -> Workspace calls -> output formatting.

pub mod auth;
pub mod companies;
pub mod config_cmd;
pub mod docs;
pub mod objects;
pub mod pages;
pub mod tree;
pub mod util;

use rackbook_core::Workspace;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    workspace: &Workspace,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(workspace, args, profile_name, global).await,
        Command::Tree(args) => tree::handle(workspace, args, global).await,
        Command::Companies => companies::handle(workspace, global).await,
        Command::Objects(args) => objects::handle(workspace, args, global).await,
        Command::Pages(args) => pages::handle(workspace, args, profile_name, global).await,
        Command::Docs(args) => docs::handle(workspace, args, profile_name, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
