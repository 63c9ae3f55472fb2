//! Status command implementation

use chrono::Utc;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::config::Config;
use crate::error::Result;
use crate::session::claims;

/// Run the status command to display session and configuration status
pub fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}\n", "intraguard Session Status".bold());

    let path = Config::resolve_path(config_path)?;
    println!("Config file: {}", path.display().to_string().cyan());

    let ctx = CommandContext::new(config_path)?;

    // Worker URL status
    match ctx.config.worker_url() {
        Ok(url) => println!("{} Worker URL: {}", "✓".green(), url),
        Err(_) => {
            println!("{} Worker URL not configured", "✗".red());
            println!("  → Run 'intraguard init' to configure");
        }
    }

    // Token status, decoded locally (the worker has the final say)
    match ctx.session.token()? {
        None => {
            println!("{} No session token stored", "○".dimmed());
            println!("  → Run 'intraguard token set <TOKEN>' after logging in");
        }
        Some(token) => match claims::parse(&token) {
            Err(err) => {
                println!("{} Stored token does not decode: {}", "✗".red(), err);
            }
            Ok(decoded) => {
                let now = Utc::now();
                if decoded.expired_at(now) {
                    println!(
                        "{} Session expired locally (will be cleared on next check)",
                        "⚠".yellow()
                    );
                } else {
                    match decoded.exp {
                        Some(exp) => {
                            let remaining = exp - now.timestamp();
                            let hours = remaining / 3600;
                            let mins = (remaining % 3600) / 60;
                            println!(
                                "{} Session token stored (expires in {}h {}m)",
                                "✓".green(),
                                hours,
                                mins
                            );
                        }
                        None => {
                            println!("{} Session token stored (no local expiry)", "✓".green())
                        }
                    }
                }

                println!("  User: {} ({})", decoded.username.bold(), decoded.role);
                if decoded.permissions.is_empty() {
                    println!("  Permissions: {}", "none".dimmed());
                } else {
                    println!("  Permissions: {}", decoded.permissions.join(", "));
                }
            }
        },
    }

    println!();
    Ok(())
}
