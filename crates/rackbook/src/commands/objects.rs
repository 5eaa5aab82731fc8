//! Object command handlers: list across the tree, show one in full.

use serde::Serialize;
use tabled::Tabled;

use rackbook_core::{ObjectDetail, ObjectId, TreeNode, Workspace};

use crate::cli::{GlobalOpts, ObjectsArgs, ObjectsCommand, ObjectsListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── List entry & table row ──────────────────────────────────────────

/// One tree leaf with its company / datacenter context attached.
#[derive(Serialize)]
struct ObjectEntry<'a> {
    company: &'a str,
    datacenter: &'a str,
    #[serde(flatten)]
    node: &'a TreeNode,
}

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "DC")]
    datacenter: String,
}

impl From<&ObjectEntry<'_>> for ObjectRow {
    fn from(e: &ObjectEntry<'_>) -> Self {
        Self {
            id: e.node.id.to_string(),
            kind: e.node.kind.to_string(),
            name: e.node.name.clone(),
            status: e.node.status.as_str().into(),
            ip: e.node.ip.clone().unwrap_or_default(),
            company: e.company.to_owned(),
            datacenter: e.datacenter.to_owned(),
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

fn matches(entry: &ObjectEntry<'_>, args: &ObjectsListArgs) -> bool {
    if let Some(kind) = args.kind {
        if entry.node.kind != util::kind(kind) {
            return false;
        }
    }
    if let Some(status) = args.status {
        if entry.node.status != util::status(status) {
            return false;
        }
    }
    if let Some(ref needle) = args.company {
        if !entry
            .company
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }
    if let Some(ref needle) = args.filter {
        let needle = needle.to_lowercase();
        let in_name = entry.node.name.to_lowercase().contains(&needle);
        let in_ip = entry
            .node
            .ip
            .as_deref()
            .is_some_and(|ip| ip.contains(&needle));
        if !in_name && !in_ip {
            return false;
        }
    }
    true
}

// ── Detail rendering ────────────────────────────────────────────────

fn detail(d: &ObjectDetail) -> String {
    let o = &d.object;
    let mut lines = vec![
        format!("ID:          {}", o.id),
        format!("Name:        {}", o.name),
        format!("Kind:        {}", o.kind),
        format!("Status:      {}", o.status.as_str()),
        format!("IP:          {}", o.ip.as_deref().unwrap_or("-")),
        format!("FQDN:        {}", o.fqdn.as_deref().unwrap_or("-")),
        format!("Tags:        {}", {
            let tags = o.tag_list();
            if tags.is_empty() {
                "-".into()
            } else {
                tags.join(", ")
            }
        }),
        format!("Description: {}", o.description.as_deref().unwrap_or("-")),
    ];

    if !d.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages:".into());
        for page in &d.pages {
            let updated = page
                .updated_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into());
            lines.push(format!(
                "  {:<12} {:>6} chars   updated {updated}",
                page.section.label(),
                page.content_md.chars().count()
            ));
        }
    }

    if !d.relations.is_empty() {
        lines.push(String::new());
        lines.push("Relations:".into());
        for rel in &d.relations {
            let arrow = if rel.is_outgoing(o.id) { "->" } else { "<-" };
            let mut line = format!(
                "  {} {arrow} object {}",
                rel.relation_type,
                rel.other_end(o.id)
            );
            if !rel.note.is_empty() {
                line.push_str(&format!("  ({})", rel.note));
            }
            lines.push(line);
        }
    }

    if !d.documents.is_empty() {
        lines.push(String::new());
        lines.push("Documents:".into());
        for doc in &d.documents {
            lines.push(format!(
                "  [{}] {:<28} {}",
                doc.kind,
                doc.title,
                doc.location().unwrap_or("-")
            ));
        }
    }

    if !d.incidents.is_empty() {
        lines.push(String::new());
        lines.push("Incidents:".into());
        for inc in &d.incidents {
            let sev = if inc.severity.is_empty() {
                "-"
            } else {
                &inc.severity
            };
            lines.push(format!("  [{sev}] {}", inc.title));
        }
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    workspace: &Workspace,
    args: ObjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ObjectsCommand::List(list) => {
            let tree = workspace.tree().await?;

            let mut entries = Vec::new();
            for company in &tree.companies {
                for dc in &company.datacenters {
                    for (_, nodes) in dc.groups() {
                        for node in nodes {
                            let entry = ObjectEntry {
                                company: &company.name,
                                datacenter: &dc.name,
                                node,
                            };
                            if matches(&entry, &list) {
                                entries.push(entry);
                            }
                        }
                    }
                }
            }

            let out = output::render_list(
                &global.output,
                &entries,
                |e| ObjectRow::from(e),
                |e| e.node.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ObjectsCommand::Show { object } => {
            let detail_data = workspace.object(ObjectId(object)).await?;
            let out = output::render_single(&global.output, &detail_data, detail, |d| {
                d.object.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
