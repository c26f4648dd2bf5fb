//! User commands: `prodtrack users`.

use anyhow::Result;
use console::style;

use prodtrack::api::Users;
use prodtrack::config::Config;
use prodtrack::ui::icons::CHECK;

use super::super::UsersCommands;
use super::connect;

pub async fn cmd_users(config: &Config, command: UsersCommands) -> Result<()> {
    let client = connect(config)?;
    let users = client.resource::<Users>();

    match command {
        UsersCommands::List => {
            let all = users.list().await?;
            if all.is_empty() {
                println!("No users found.");
                return Ok(());
            }
            println!(
                "{}",
                style(format!("{:<26} {:<24} {:<32} {}", "ID", "NAME", "EMAIL", "ROLE")).bold()
            );
            for user in &all {
                println!(
                    "{:<26} {:<24} {:<32} {}",
                    user.id.as_deref().unwrap_or("-"),
                    user.display_name(),
                    user.email.as_deref().unwrap_or("-"),
                    user.role.as_deref().unwrap_or("-")
                );
            }
        }
        UsersCommands::Role { id, role } => {
            let updated = users.update_role(&id, &role).await?;
            println!(
                "{}{} is now {}",
                CHECK,
                updated.display_name(),
                updated.role.as_deref().unwrap_or(role.as_str())
            );
        }
    }

    Ok(())
}
