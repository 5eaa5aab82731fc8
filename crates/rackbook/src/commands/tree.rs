//! Inventory tree handler.

use rackbook_core::{InventoryTree, Workspace};

use crate::cli::{GlobalOpts, TreeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Indented text rendering: company / datacenter / group / object.
fn render_tree(tree: &InventoryTree, color: bool) -> String {
    let mut lines = Vec::new();
    for company in &tree.companies {
        lines.push(company.name.clone());
        for dc in &company.datacenters {
            lines.push(format!("  {}", dc.name));
            for (group, nodes) in dc.groups() {
                if nodes.is_empty() {
                    continue;
                }
                lines.push(format!("    {}", group.label()));
                for node in nodes {
                    let ip = node.ip.as_deref().unwrap_or("-");
                    // Colored status goes last so ANSI codes don't break padding.
                    lines.push(format!(
                        "      {:>5}  {:<28} {:<15} {}",
                        node.id,
                        node.name,
                        ip,
                        util::status_cell(node.status, color)
                    ));
                }
            }
        }
    }

    if lines.is_empty() {
        "(empty tree)".into()
    } else {
        lines.join("\n")
    }
}

pub async fn handle(
    workspace: &Workspace,
    args: TreeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut tree = workspace.tree().await?;

    if let Some(ref needle) = args.company {
        let needle = needle.to_lowercase();
        tree.companies
            .retain(|c| c.name.to_lowercase().contains(&needle));
    }

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &tree,
        |t| render_tree(t, color),
        |t| {
            t.nodes()
                .map(|n| n.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
