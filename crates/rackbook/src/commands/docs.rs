//! Document handlers: list attachments, add a link or upload a file.

use tabled::Tabled;

use rackbook_core::{Document, DocumentKind, NewDocument, ObjectId, Workspace};

use crate::cli::{DocsArgs, DocsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
}

impl From<&Document> for DocumentRow {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id.to_string(),
            kind: d.kind.to_string(),
            title: d.title.clone(),
            location: d.location().unwrap_or("-").into(),
            uploaded: d
                .uploaded_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    workspace: &Workspace,
    args: DocsArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DocsCommand::List { object } => {
            let docs = workspace.object_documents(ObjectId(object)).await?;
            let out = output::render_list(&global.output, &docs, |d| DocumentRow::from(d), |d| {
                d.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DocsCommand::Add {
            object,
            title,
            url,
            file,
        } => {
            util::establish_session(workspace, profile_name, global).await?;

            let doc = match (url, file) {
                (Some(url), None) => NewDocument {
                    title,
                    kind: DocumentKind::Link,
                    url: Some(url),
                    file: None,
                },
                (None, Some(path)) => {
                    let bytes = std::fs::read(&path)?;
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .ok_or_else(|| CliError::Validation {
                            field: "file".into(),
                            reason: format!("{} has no file name", path.display()),
                        })?;
                    NewDocument {
                        title,
                        kind: DocumentKind::File,
                        url: None,
                        file: Some((filename, bytes)),
                    }
                }
                // clap rejects url+file together; neither is a usage error too.
                _ => {
                    return Err(CliError::Validation {
                        field: "document".into(),
                        reason: "pass either --url or --file".into(),
                    });
                }
            };

            let created = workspace.add_document(ObjectId(object), doc).await?;
            if !global.quiet {
                eprintln!(
                    "Attached [{}] '{}' to object {} (document {})",
                    created.kind, created.title, created.object_id, created.id
                );
            }
            Ok(())
        }
    }
}
