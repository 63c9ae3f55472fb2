//! Token management commands

use colored::Colorize;
use url::Url;

use crate::cli::CommandContext;
use crate::cli::context::ConfigTokenStore;
use crate::error::{Error, Result};
use crate::session::TokenStore;

/// Store a token pasted from the login hand-off
pub fn set(token: String, config_path: Option<&str>) -> Result<()> {
    let store = ConfigTokenStore::new(config_path);
    store.set(&token)?;

    println!("{} Session token stored.", "✓".green());
    Ok(())
}

/// Print the stored token
pub fn show(config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    match ctx.session.token()? {
        Some(token) => {
            println!("{}", token);
            Ok(())
        }
        None => Err(Error::Auth(crate::error::AuthError::NoToken)),
    }
}

/// Capture the token from a post-login URL, printing the cleaned URL
pub fn from_url(url: &str, config_path: Option<&str>) -> Result<()> {
    let url = Url::parse(url).map_err(|e| Error::Other(format!("invalid URL: {}", e)))?;

    let ctx = CommandContext::new(config_path)?;
    match ctx.session.store_from_url(&url)? {
        Some(cleaned) => {
            println!("{} Token stored.", "✓".green());
            println!("Cleaned URL: {}", cleaned.as_str().cyan());
        }
        None => {
            println!("{} No token parameter in that URL; nothing stored.", "○".dimmed());
        }
    }
    Ok(())
}

/// Clear the stored token (logout)
pub fn clear(config_path: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config_path)?;
    ctx.session.logout()?;
    println!("{} Session cleared.", "✓".green());
    Ok(())
}
