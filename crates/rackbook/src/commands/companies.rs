//! Flat company list, without the datacenter tree.

use tabled::Tabled;

use rackbook_core::{Company, Workspace};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
        }
    }
}

pub async fn handle(workspace: &Workspace, global: &GlobalOpts) -> Result<(), CliError> {
    let companies = workspace.companies().await?;
    let out = output::render_list(&global.output, &companies, |c| CompanyRow::from(c), |c| {
        c.id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
