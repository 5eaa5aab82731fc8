//! Auth command handlers: login, logout, whoami.

use dialoguer::Input;
use secrecy::SecretString;

use rackbook_core::Workspace;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    workspace: &Workspace,
    args: AuthArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { username } => {
            // Flag beats the profile's suggested username; prompt as last resort.
            let suggested = username.or_else(|| {
                rackbook_config::load_config_or_default()
                    .profiles
                    .get(profile_name)
                    .and_then(|p| p.username.clone())
            });
            let user = match suggested {
                Some(u) => u,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(util::prompt_err)?,
            };

            let password = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            if user.is_empty() || password.is_empty() {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "username and password cannot be empty".into(),
                });
            }

            let session = workspace
                .login(&user, &SecretString::from(password))
                .await?;
            rackbook_config::save_session(profile_name, &session)?;

            if !global.quiet {
                eprintln!(
                    "Signed in as {} ({})",
                    session.user().display_name(),
                    session.role()
                );
            }
            Ok(())
        }

        AuthCommand::Logout => {
            workspace.logout();
            rackbook_config::clear_session(profile_name)?;
            if !global.quiet {
                eprintln!("Signed out of profile '{profile_name}'");
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            util::establish_session(workspace, profile_name, global).await?;
            // Verify against the server rather than trusting stored state.
            let session = workspace
                .refresh_profile()
                .await?
                .ok_or(CliError::NotSignedIn)?;

            let server = workspace.config().url.clone();
            let out = output::render_single(
                &global.output,
                session.user(),
                |u| {
                    [
                        format!("Username:  {}", u.username),
                        format!("Full name: {}", u.full_name),
                        format!("Role:      {}", u.role),
                        format!("Server:    {server}"),
                    ]
                    .join("\n")
                },
                |u| u.username.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
