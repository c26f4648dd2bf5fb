//! Mass production project commands: `prodtrack projects`.

use anyhow::Result;
use serde_json::json;

use prodtrack::api::MassProductions;
use prodtrack::config::Config;
use prodtrack::models::MassProductionFilter;
use prodtrack::progress::StageReport;
use prodtrack::ui::RequestSpinner;
use prodtrack::ui::report::{print_project, print_projects};

use super::super::{Cli, ProjectsCommands};
use super::{confirm, connect, print_json};

pub async fn cmd_projects(cli: &Cli, config: &Config, command: ProjectsCommands) -> Result<()> {
    let client = connect(config)?;
    let projects = client.resource::<MassProductions>();

    match command {
        ProjectsCommands::List {
            status,
            search,
            customer,
            page,
            limit,
            json,
        } => {
            let filter = MassProductionFilter {
                status,
                search,
                customer,
                page,
                limit,
            };
            let spinner = RequestSpinner::start("Fetching projects...");
            let listing = match projects.search(&filter).await {
                Ok(listing) => {
                    spinner.clear();
                    listing
                }
                Err(e) => {
                    spinner.fail("Could not fetch projects");
                    return Err(e.into());
                }
            };
            if json {
                print_json(listing.items())?;
            } else {
                print_projects(listing.items(), listing.total());
            }
        }
        ProjectsCommands::Show { id, json } => {
            let mp = projects.get(&id).await?;
            if json {
                let report = StageReport::for_project(&mp);
                print_json(&json!({ "project": mp, "stages": report }))?;
            } else {
                print_project(&mp);
            }
        }
        ProjectsCommands::Delete { id } => {
            if !confirm(cli, &format!("Delete mass production project {}?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            projects.remove(&id).await?;
            println!("Deleted project {}", id);
        }
    }

    Ok(())
}
