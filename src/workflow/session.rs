use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::user::User;
use crate::error::AppResult;
use crate::services::Credentials;

/// Establishes the session from the stored cookie, if the backend still
/// accepts it.
pub async fn restore(ctx: &mut AppContext) -> AppResult<Option<&User>> {
    match ctx.services.auth.current_user().await? {
        Some(user) => ctx.session.establish(user),
        None => ctx.session.end(),
    }
    Ok(ctx.session.user())
}

pub async fn login(ctx: &mut AppContext, credentials: Credentials) -> AppResult<&User> {
    let user = ctx.services.auth.login(&credentials).await?;
    info!(username = %user.username, profile = %user.profile, "session established");
    ctx.session.establish(user);
    ctx.session.require_user()
}

/// Ends the local session even when the backend call fails.
pub async fn logout(ctx: &mut AppContext) -> AppResult<()> {
    if let Err(err) = ctx.services.auth.logout().await {
        warn!(error = %err, "logout request failed; local session cleared anyway");
    }
    ctx.session.end();
    Ok(())
}
