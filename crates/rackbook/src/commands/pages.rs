//! Runbook page handlers: print markdown, edit and save back.

use dialoguer::Editor;

use rackbook_core::{ObjectId, Workspace};

use crate::cli::{GlobalOpts, PagesArgs, PagesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    workspace: &Workspace,
    args: PagesArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PagesCommand::Show { object, section } => {
            let detail = workspace.object(ObjectId(object)).await?;
            let page = util::find_page(&detail, util::section(section))?;

            let out = output::render_single(
                &global.output,
                page,
                |p| p.content_md.clone(),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PagesCommand::Edit {
            object,
            section,
            file,
        } => {
            // Writes need a session; fail before fetching anything.
            util::establish_session(workspace, profile_name, global).await?;

            let detail = workspace.object(ObjectId(object)).await?;
            let page = util::find_page(&detail, util::section(section))?;

            let new_content = match file {
                Some(path) => std::fs::read_to_string(&path)?,
                None => {
                    let edited = Editor::new()
                        .require_save(true)
                        .edit(&page.content_md)
                        .map_err(util::prompt_err)?;
                    match edited {
                        Some(content) => content,
                        None => {
                            if !global.quiet {
                                eprintln!("Edit aborted, nothing saved");
                            }
                            return Ok(());
                        }
                    }
                }
            };

            if new_content == page.content_md {
                if !global.quiet {
                    eprintln!("No changes, nothing saved");
                }
                return Ok(());
            }

            let saved = workspace.save_page(page.id, &new_content).await?;
            if !global.quiet {
                eprintln!(
                    "Saved '{}' page of {} ({} chars)",
                    saved.section.label(),
                    detail.object.name,
                    saved.content_md.chars().count()
                );
            }
            Ok(())
        }
    }
}
