//! Session commands: `prodtrack login`, `logout`, `session`.

use anyhow::{Context, Result};
use console::style;

use prodtrack::TokenProvider;
use prodtrack::config::Config;
use prodtrack::ui::icons::{CHECK, KEY, WARN};

pub fn cmd_login(config: &Config, token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => dialoguer::Password::new()
            .with_prompt("Access token")
            .interact()
            .context("Token prompt failed (pass the token as an argument instead)")?,
    };
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Refusing to store an empty token");
    }

    let store = config.session_store();
    store.save_token(token)?;
    println!("{}Session saved to {}", CHECK, store.path().display());
    Ok(())
}

pub fn cmd_logout(config: &Config) -> Result<()> {
    let store = config.session_store();
    if store.clear()? {
        println!("{}Session removed from {}", CHECK, store.path().display());
    } else {
        println!("No session stored at {}", store.path().display());
    }
    Ok(())
}

pub fn cmd_session(config: &Config) -> Result<()> {
    let store = config.session_store();
    let session = store.load()?;

    println!();
    println!("{}", style("Session").bold().cyan());
    println!("  file:    {}", store.path().display());
    if store.access_token()?.is_some() {
        println!("  status:  {}logged in", KEY);
        if let Some(saved_at) = session.saved_at {
            println!("  saved:   {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    } else {
        println!("  status:  {}not logged in", WARN);
    }
    if config.token.is_some() {
        println!(
            "  {}",
            style("A token from --token or PRODTRACK_TOKEN overrides this session.").dim()
        );
    }
    println!("  backend: {}", config.api_url);
    println!();
    Ok(())
}
