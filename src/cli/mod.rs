//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::forms::FormKind;

pub mod context;
pub mod guard;
pub mod init;
pub mod perms;
pub mod status;
pub mod submit;
pub mod timeout;
pub mod token;

pub use context::CommandContext;

/// intraguard - session and access-control companion for the intranet worker
#[derive(Parser, Debug)]
#[command(name = "intraguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "INTRAGUARD_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "INTRAGUARD_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize intraguard configuration
    Init,

    /// Show session and configuration status
    Status,

    /// Display version information
    Version,

    /// Manage the stored session token
    #[command(subcommand)]
    Token(TokenCommands),

    /// Run the page guard against a page path
    Guard {
        /// Page path as the browser would see it (e.g. /intranet/intra-admin.html)
        path: String,
    },

    /// Show the identity decoded from the stored token
    Whoami,

    /// Check whether the current session grants a permission
    Can {
        /// Permission name (e.g. admin-view)
        permission: String,
    },

    /// Read or change the session timeout setting
    #[command(subcommand)]
    Timeout(TimeoutCommands),

    /// Submit a form to its webhook endpoint
    Submit {
        /// Which form to submit
        #[arg(value_enum)]
        form: FormKind,

        /// Form field as name=value, repeated per field
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
}

/// Session token subcommands
#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Store a session token
    Set {
        /// The three-part token issued at login
        token: String,
    },

    /// Print the stored token
    Show,

    /// Capture the token from a post-login URL and print the cleaned URL
    FromUrl {
        /// Full URL including the token query parameter
        url: String,
    },

    /// Clear the stored token (logout)
    Clear,
}

/// Session timeout subcommands
#[derive(Subcommand, Debug)]
pub enum TimeoutCommands {
    /// Show the current session timeout in minutes
    Get,

    /// Set the session timeout in minutes
    Set {
        /// New timeout in whole minutes
        minutes: u64,
    },
}
