//! Identity and permission commands

use chrono::Utc;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::error::{AuthError, Result};

/// Show the identity decoded from the stored token.
///
/// Local decode only; `intraguard guard` is the authoritative check.
pub fn whoami(config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;

    let claims = ctx
        .session
        .current_claims(Utc::now())?
        .ok_or(AuthError::NoToken)?;

    println!("{} ({})", claims.username.bold(), claims.role);
    if !claims.permissions.is_empty() {
        println!("Permissions: {}", claims.permissions.join(", "));
    }

    Ok(())
}

/// Check whether the current session grants a permission
pub fn can(permission: &str, config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;

    if ctx.session.has_permission(permission)? {
        println!("{} Session grants '{}'", "✓".green(), permission);
    } else {
        println!("{} Session does not grant '{}'", "✗".red(), permission);
    }

    Ok(())
}
