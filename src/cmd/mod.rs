//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                    |
//! |------------|-------------------------------------|
//! | `session`  | `Login`, `Logout`, `Session`        |
//! | `config`   | `Config`                            |
//! | `projects` | `Projects`                          |
//! | `calls`    | `Calls`                             |
//! | `resource` | `Resource`, `FormOptions`           |
//! | `users`    | `Users`                             |

pub mod calls;
pub mod config;
pub mod projects;
pub mod resource;
pub mod session;
pub mod users;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use prodtrack::ApiClient;
use prodtrack::config::{CliOverrides, Config};

use super::Cli;

pub use calls::cmd_calls;
pub use config::cmd_config;
pub use projects::cmd_projects;
pub use resource::{cmd_form_options, cmd_resource};
pub use session::{cmd_login, cmd_logout, cmd_session};
pub use users::cmd_users;

pub fn load_config(cli: &Cli, project_dir: &Path) -> Result<Config> {
    Config::load(
        project_dir,
        CliOverrides {
            api_url: cli.api_url.clone(),
            token: cli.token.clone(),
            timeout_secs: cli.timeout,
        },
    )
}

pub(crate) fn connect(config: &Config) -> Result<ApiClient> {
    config
        .client()
        .with_context(|| format!("Cannot create a client for {}", config.api_url))
}

/// Ask before a destructive action; `--yes` answers for the user.
pub(crate) fn confirm(cli: &Cli, prompt: &str) -> Result<bool> {
    if cli.yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Confirmation prompt failed (use --yes in non-interactive shells)")
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to render JSON")?
    );
    Ok(())
}
