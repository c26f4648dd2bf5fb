//! Call commands: `prodtrack calls`.

use anyhow::{Context, Result};

use prodtrack::api::Calls;
use prodtrack::config::Config;
use prodtrack::models::{CallFilter, CallStatus};
use prodtrack::ui::RequestSpinner;
use prodtrack::ui::icons::CHECK;
use prodtrack::ui::report::{call_countdown, print_calls, value_text};

use super::super::CallsCommands;
use super::{connect, print_json};

/// Map a user-facing status (`pending`, `Realizada`, ...) to the wire string.
fn wire_status(status: Option<String>) -> Result<Option<String>> {
    status
        .map(|s| {
            s.parse::<CallStatus>()
                .map(String::from)
                .map_err(anyhow::Error::msg)
        })
        .transpose()
}

pub async fn cmd_calls(config: &Config, command: CallsCommands) -> Result<()> {
    let client = connect(config)?;
    let calls = client.resource::<Calls>();

    match command {
        CallsCommands::List {
            status,
            from,
            to,
            json,
        } => {
            let filter = CallFilter {
                status: wire_status(status)?,
                start_date: from,
                end_date: to,
            };
            let found = calls.search(&filter).await?;
            if json {
                print_json(&found)?;
            } else {
                print_calls(&found);
            }
        }
        CallsCommands::Complete { id } => {
            let call = calls.complete(&id).await?;
            println!("{}Call {} is now {}", CHECK, id, call.status);
            println!("  {}", call_countdown(&call));
        }
        CallsCommands::CheckExpired => {
            let summary = calls.check_expired().await?;
            println!("{}Expiry check done", CHECK);
            if let Some(map) = summary.as_object() {
                for (key, value) in map {
                    println!("  {}: {}", key, value_text(value));
                }
            }
        }
        CallsCommands::Export { output, status } => {
            let filter = CallFilter {
                status: wire_status(status)?,
                ..CallFilter::default()
            };
            let spinner = RequestSpinner::start("Downloading call export...");
            let bytes = match calls.export(&filter).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    spinner.fail("Export failed");
                    return Err(e.into());
                }
            };
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            spinner.succeed(format!("Wrote {} bytes to {}", bytes.len(), output.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_status() {
        assert_eq!(
            wire_status(Some("pending".into())).unwrap().as_deref(),
            Some("Pendiente")
        );
        assert_eq!(wire_status(None).unwrap(), None);
        assert!(wire_status(Some("later".into())).is_err());
    }
}
