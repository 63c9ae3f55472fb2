//! Session timeout commands

use colored::Colorize;

use crate::cli::CommandContext;
use crate::error::Result;
use crate::settings::SettingsPanel;

/// Show the current session timeout in minutes
pub async fn get(config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    let panel = SettingsPanel::new(ctx.session.clone(), ctx.client()?);

    let minutes = panel.load().await?;
    println!("Session timeout: {} minutes", minutes.to_string().bold());

    Ok(())
}

/// Set the session timeout in minutes
pub async fn set(minutes: u64, config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    let panel = SettingsPanel::new(ctx.session.clone(), ctx.client()?);

    match panel.update(minutes).await {
        Ok(()) => {
            println!(
                "{} Session timeout set to {} minutes.",
                "✓".green(),
                minutes
            );
            Ok(())
        }
        Err(err) => {
            // Unsaved selection must not linger: show the value that is
            // actually in force before reporting the failure.
            if let Ok(current) = panel.load().await {
                println!(
                    "{} Update failed; timeout is still {} minutes.",
                    "✗".red(),
                    current
                );
            }
            Err(err)
        }
    }
}
