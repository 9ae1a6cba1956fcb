mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
mod session_store;
#[cfg(test)]
mod testing;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cmd::admin::{ClientCommand, ServiceTypeCommand, UserCommand};
use crate::cmd::auth::{self, LoginArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, TicketArgs};
use crate::config::AppConfig;
use crate::context::{AppContext, Services};
use crate::error::AppResult;
use crate::infra::http::HelpdeskClient;
use crate::infra::terminal::TerminalPrompter;
use crate::session_store::SessionStore;
use crate::workflow::session;

#[derive(Parser)]
#[command(name = "helpdesk", author, version, about = "Helpdesk ticketing client")]
struct Cli {
    /// Backend base URL. Overrides HELPDESK_API_URL and the stored config.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Log filter, e.g. `debug` or `helpdesk=trace`.
    #[arg(long, global = true, env = "HELPDESK_LOG", default_value = "warn")]
    log_level: String,
    /// Answer yes to every confirmation.
    #[arg(short, long, global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session for later commands.
    Login(LoginArgs),
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Dashboard: ticket counts and the tickets visible to you.
    Tickets,
    /// Create, inspect and work on a single ticket.
    Ticket(TicketArgs),
    /// Manage user accounts (administrators only).
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage clients.
    Clients {
        #[command(subcommand)]
        command: ClientCommand,
    },
    /// Manage service types (administrators only).
    ServiceTypes {
        #[command(subcommand)]
        command: ServiceTypeCommand,
    },
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = AppConfig::load(cli.api_url)?;
    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, &config),
        command => dispatch(connect(config, cli.yes)?, command).await,
    }
}

fn connect(config: AppConfig, assume_yes: bool) -> AppResult<AppContext> {
    let store = SessionStore::load(&config.config_dir, &config.api_base_url)?;
    let client = HelpdeskClient::with_store(config.api_base_url.clone(), store);
    Ok(AppContext::new(
        config,
        Services::from_backend(Arc::new(client)),
        Arc::new(TerminalPrompter::new(assume_yes)),
    ))
}

async fn dispatch(mut ctx: AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Login(args) => auth::login(&mut ctx, args).await,
        Commands::Logout => auth::logout(&mut ctx).await,
        command => {
            session::restore(&mut ctx).await?;
            signed_in(&ctx, command).await
        }
    }
}

async fn signed_in(ctx: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Whoami => auth::whoami(ctx),
        Commands::Tickets => ticket::list(ctx).await,
        Commands::Ticket(args) => ticket::run(ctx, args.command).await,
        Commands::Users { command } => cmd::admin::users(ctx, command).await,
        Commands::Clients { command } => cmd::admin::clients(ctx, command).await,
        Commands::ServiceTypes { command } => cmd::admin::service_types(ctx, command).await,
        Commands::Login(_) | Commands::Logout | Commands::Config(_) => Ok(()),
    }
}
