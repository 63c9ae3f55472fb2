//! Guard command implementation

use colored::Colorize;

use crate::cli::CommandContext;
use crate::error::Result;
use crate::guard::{GuardOutcome, PageGuard};

/// Run the page guard against a path and print the decision
pub async fn run(path: &str, config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    let client = ctx.client()?;

    let mut guard = PageGuard::new(ctx.session.clone(), client);
    let outcome = guard.check(path).await?;

    match outcome {
        GuardOutcome::NotProtected => {
            println!("{} {} is public; no session required.", "○".dimmed(), path);
        }
        GuardOutcome::Granted(identity) => {
            println!(
                "{} Access granted: {} ({})",
                "✓".green(),
                identity.username.bold(),
                identity.role
            );
        }
        GuardOutcome::Denied { reason, redirect } => {
            println!("{} Access denied ({:?})", "✗".red(), reason);
            println!("  Redirect: {}", redirect.cyan());
        }
    }

    Ok(())
}
