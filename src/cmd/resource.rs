//! Generic resource commands: `prodtrack resource`, `prodtrack form-options`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use prodtrack::ApiClient;
use prodtrack::api::{
    Calls, Facilities, FormResource, KickOffs, MassProductions, OkForLaunch, ProductDesignations,
    QualificationConfirmations, Resource, ResourceKind, Supplies, Users, Validations,
    ValidationsForOffer, load_form_options,
};
use prodtrack::config::Config;
use prodtrack::models::Record;
use prodtrack::ui::icons::{CHECK, FILE};
use prodtrack::ui::report::print_records;

use super::super::{Cli, ResourceCommands};
use super::{confirm, connect, print_json};

/// Run a generic operation against the resource type behind `kind`.
macro_rules! for_kind {
    ($kind:expr, $op:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::ProductDesignation => $op::<ProductDesignations>($($arg),*).await,
            ResourceKind::Facility => $op::<Facilities>($($arg),*).await,
            ResourceKind::KickOff => $op::<KickOffs>($($arg),*).await,
            ResourceKind::MassProduction => $op::<MassProductions>($($arg),*).await,
            ResourceKind::Call => $op::<Calls>($($arg),*).await,
            ResourceKind::OkForLaunch => $op::<OkForLaunch>($($arg),*).await,
            ResourceKind::Supply => $op::<Supplies>($($arg),*).await,
            ResourceKind::Validation => $op::<Validations>($($arg),*).await,
            ResourceKind::ValidationForOffer => $op::<ValidationsForOffer>($($arg),*).await,
            ResourceKind::QualificationConfirmation => {
                $op::<QualificationConfirmations>($($arg),*).await
            }
            ResourceKind::User => $op::<Users>($($arg),*).await,
        }
    };
}

/// Parse `FIELD=PATH`.
pub fn parse_attachment(raw: &str) -> Result<(String, PathBuf)> {
    let (field, path) = raw
        .split_once('=')
        .with_context(|| format!("Attachment '{}' must look like FIELD=PATH", raw))?;
    let field = field.trim();
    if field.is_empty() || path.trim().is_empty() {
        anyhow::bail!("Attachment '{}' must look like FIELD=PATH", raw);
    }
    Ok((field.to_string(), PathBuf::from(path.trim())))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

async fn list<R: Resource>(client: &ApiClient, json: bool) -> Result<()> {
    let items = client.resource::<R>().list().await?;
    if json {
        return print_json(&items);
    }
    let records = items
        .iter()
        .map(|item| -> Result<Record> { Ok(Record::from_json(serde_json::to_value(item)?)?) })
        .collect::<Result<Vec<_>>>()?;
    print_records(&records);
    Ok(())
}

async fn get<R: Resource>(client: &ApiClient, id: &str) -> Result<()> {
    let item = client.resource::<R>().get(id).await?;
    print_json(&item)
}

async fn remove<R: Resource>(client: &ApiClient, id: &str) -> Result<()> {
    client.resource::<R>().remove(id).await?;
    println!("{}Deleted {} {}", CHECK, R::NAME, id);
    Ok(())
}

async fn push_json<R: Resource>(client: &ApiClient, body: Value, id: Option<&str>) -> Result<()> {
    let item: R::Item = serde_json::from_value(body)
        .with_context(|| format!("Input does not describe a {}", R::NAME))?;
    let endpoint = client.resource::<R>();
    let saved = match id {
        Some(id) => endpoint.update(id, item).await?,
        None => endpoint.create(item).await?,
    };
    print_json(&saved)
}

async fn push_form<R: FormResource>(
    client: &ApiClient,
    body: Value,
    id: Option<&str>,
    attachments: &[(String, PathBuf)],
) -> Result<()> {
    let record = Record::from_json(body)?;
    for (field, path) in attachments {
        println!("{}{} <- {}", FILE, field, path.display());
    }
    let endpoint = client.resource::<R>();
    let saved = match id {
        Some(id) => endpoint.update_form(id, record, attachments).await?,
        None => endpoint.create_form(record, attachments).await?,
    };
    print_json(&saved)
}

pub async fn cmd_resource(cli: &Cli, config: &Config, command: ResourceCommands) -> Result<()> {
    let client = connect(config)?;

    match command {
        ResourceCommands::List { kind, json } => {
            let kind: ResourceKind = kind.parse().map_err(anyhow::Error::msg)?;
            for_kind!(kind, list(&client, json))?;
        }
        ResourceCommands::Get { kind, id } => {
            let kind: ResourceKind = kind.parse().map_err(anyhow::Error::msg)?;
            for_kind!(kind, get(&client, &id))?;
        }
        ResourceCommands::Delete { kind, id } => {
            let kind: ResourceKind = kind.parse().map_err(anyhow::Error::msg)?;
            if !confirm(cli, &format!("Delete {} {}?", kind, id))? {
                println!("Aborted.");
                return Ok(());
            }
            for_kind!(kind, remove(&client, &id))?;
        }
        ResourceCommands::Push {
            kind,
            file,
            id,
            attachments,
        } => {
            let kind: ResourceKind = kind.parse().map_err(anyhow::Error::msg)?;
            let attachments = attachments
                .iter()
                .map(|raw| parse_attachment(raw))
                .collect::<Result<Vec<_>>>()?;
            let body = read_json(&file)?;
            let id = id.as_deref();
            match kind {
                ResourceKind::OkForLaunch => {
                    push_form::<OkForLaunch>(&client, body, id, &attachments).await?
                }
                ResourceKind::ValidationForOffer => {
                    push_form::<ValidationsForOffer>(&client, body, id, &attachments).await?
                }
                _ if !attachments.is_empty() => anyhow::bail!(
                    "{} records do not take attachments (only {} and {} do)",
                    kind,
                    ResourceKind::OkForLaunch,
                    ResourceKind::ValidationForOffer
                ),
                _ => for_kind!(kind, push_json(&client, body, id))?,
            }
        }
    }

    Ok(())
}

pub async fn cmd_form_options(config: &Config) -> Result<()> {
    let client = connect(config)?;
    let options = load_form_options(&client).await?;

    println!("Product designations:");
    for pd in &options.product_designations {
        println!(
            "  {:<26} {}",
            pd.id().as_deref().unwrap_or("-"),
            pd.str_field("part_name")
                .or_else(|| pd.str_field("name"))
                .unwrap_or("-")
        );
    }
    println!();
    println!("Users:");
    for user in &options.users {
        println!(
            "  {:<26} {:<24} {}",
            user.id.as_deref().unwrap_or("-"),
            user.display_name(),
            user.role.as_deref().unwrap_or("-")
        );
    }
    println!();
    Ok(())
}
