use clap::Args;
use secrecy::{ExposeSecret, SecretString};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::services::Credentials;
use crate::workflow::session;

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account name. Falls back to the configured default username.
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password. Asked for without echo when omitted.
    #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn login(ctx: &mut AppContext, args: LoginArgs) -> AppResult<()> {
    let credentials = credentials(ctx, args)?;
    let user = session::login(ctx, credentials).await?;
    println!("Signed in as {} ({})", user.username, user.profile);
    Ok(())
}

pub async fn logout(ctx: &mut AppContext) -> AppResult<()> {
    session::logout(ctx).await?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> AppResult<()> {
    let user = ctx.session.require_user()?;
    println!("{} ({}) on {}", user.username, user.profile, ctx.config.api_base_url);
    Ok(())
}

/// Both fields are required before anything is sent.
fn credentials(ctx: &AppContext, args: LoginArgs) -> AppResult<Credentials> {
    let username = match args
        .username
        .or_else(|| ctx.config.default_username.clone())
    {
        Some(username) => Some(username),
        None => ctx.prompter.ask("Username")?,
    }
    .map(|username| username.trim().to_string())
    .filter(|username| !username.is_empty())
    .ok_or_else(|| AppError::Validation("username is required".to_string()))?;

    let password = match args.password {
        Some(password) => SecretString::from(password),
        None => ctx.prompter.ask_secret("Password")?,
    };
    if password.expose_secret().is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    Ok(Credentials { username, password })
}
