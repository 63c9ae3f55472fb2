//! intraguard - session and access-control companion for the intranet worker

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod forms;
mod guard;
mod session;
mod settings;

use cli::{Cli, Commands, TimeoutCommands, TokenCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init => cli::init::run(config).await,
        Commands::Status => cli::status::run(config),
        Commands::Version => {
            println!("intraguard version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Token(token_cmd) => match token_cmd {
            TokenCommands::Set { token } => cli::token::set(token, config),
            TokenCommands::Show => cli::token::show(config),
            TokenCommands::FromUrl { url } => cli::token::from_url(&url, config),
            TokenCommands::Clear => cli::token::clear(config),
        },
        Commands::Guard { path } => cli::guard::run(&path, config).await,
        Commands::Whoami => cli::perms::whoami(config),
        Commands::Can { permission } => cli::perms::can(&permission, config),
        Commands::Timeout(timeout_cmd) => match timeout_cmd {
            TimeoutCommands::Get => cli::timeout::get(config).await,
            TimeoutCommands::Set { minutes } => cli::timeout::set(minutes, config).await,
        },
        Commands::Submit { form, fields } => cli::submit::run(form, &fields, config).await,
    }
}
