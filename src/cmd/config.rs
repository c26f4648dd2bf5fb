//! Configuration view and validation commands: `prodtrack config`.

use anyhow::Result;

use prodtrack::config::{CONFIG_FILE_NAME, Config, ProdtrackToml, find_config_file};

use super::super::ConfigCommands;

fn print_toml(toml: &ProdtrackToml) {
    println!("[api]");
    println!("  url = \"{}\"", toml.api.url);
    println!("  timeout_secs = {}", toml.api.timeout_secs);
    println!();
    println!("[session]");
    match &toml.session.path {
        Some(path) => println!("  path = \"{}\"", path.display()),
        None => println!("  path = (default)"),
    }
    println!();
}

pub fn cmd_config(
    project_dir: &std::path::Path,
    config: &Config,
    command: Option<ConfigCommands>,
) -> Result<()> {
    let local_path = project_dir.join(".prodtrack").join(CONFIG_FILE_NAME);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Prodtrack Configuration");
            println!("=======================");
            println!();

            match find_config_file(project_dir) {
                Some(path) => {
                    println!("Config file: {}", path.display());
                    println!();
                    print_toml(&ProdtrackToml::load(&path)?);
                }
                None => {
                    println!("No {} found.", CONFIG_FILE_NAME);
                    println!();
                    println!("Using default configuration:");
                    print_toml(&ProdtrackToml::default());
                    println!("Run 'prodtrack config init' to create one.");
                    println!();
                }
            }

            println!("Effective values (with env/CLI overrides):");
            println!("  api_url = \"{}\"", config.api_url);
            println!("  timeout_secs = {}", config.timeout.as_secs());
            println!("  session = \"{}\"", config.session_path.display());
            println!(
                "  token = {}",
                if config.token.is_some() {
                    "(set explicitly)"
                } else {
                    "(from session)"
                }
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let Some(path) = find_config_file(project_dir) else {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE_NAME);
                return Ok(());
            };

            let warnings = ProdtrackToml::load(&path)?.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if local_path.exists() {
                println!("{} already exists at {}", CONFIG_FILE_NAME, local_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            ProdtrackToml::default().save(&local_path)?;

            println!("Created {} at {}", CONFIG_FILE_NAME, local_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] url, timeout_secs");
            println!("  - [session] path");
            println!();
        }
    }

    Ok(())
}
