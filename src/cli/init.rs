//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::cli::CommandContext;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the worker URL and optionally a session token. When a token
/// is pasted, it is checked against the worker before being stored.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    println!("{}", "Welcome to intraguard!".bold().green());
    println!("Let's set up your worker configuration.\n");

    let worker_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Worker URL (e.g. https://auth.example.workers.dev)")
        .interact_text()?;

    let mut config = Config {
        worker_url: Some(worker_url.trim_end_matches('/').to_string()),
        token: None,
    };

    let paste_token = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Do you have a session token to store now?")
        .default(false)
        .interact()?;

    if paste_token {
        let token: String = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Paste the session token")
            .interact()?;
        config.token = Some(token);
    }

    config.save_at(config_path)?;

    // Verify the pasted token so a stale paste is caught immediately
    if config.token.is_some() {
        println!("\n{}", "Verifying session...".cyan());
        let ctx = CommandContext::new(config_path)?;
        let client = ctx.client()?;

        if let Some(token) = ctx.session.token()? {
            match client.verify(&token).await {
                Ok(verdict) if verdict.valid => {
                    let who = verdict
                        .payload
                        .map(|p| format!("{} ({})", p.username, p.role))
                        .unwrap_or_else(|| "unknown".to_string());
                    println!("{} Session valid: {}", "✓".green(), who);
                }
                Ok(_) => {
                    println!("{} The worker rejected this token.", "✗".red());
                    ctx.session.logout()?;
                }
                Err(err) => {
                    println!(
                        "{} Could not verify the token ({}). It was kept for later.",
                        "⚠".yellow(),
                        err
                    );
                }
            }
        }
    }

    let path = Config::resolve_path(config_path)?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show session status", "intraguard status".cyan());
    println!(
        "  {} - Check a protected page",
        "intraguard guard /intranet/intra-dashboard.html".cyan()
    );

    Ok(())
}
