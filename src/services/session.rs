use async_trait::async_trait;

use crate::domain::user::User;
use crate::error::AppResult;
use crate::services::Credentials;

#[async_trait]
pub trait SessionService: Send + Sync {
    /// User behind the stored session, `None` when there is no valid session.
    async fn current_user(&self) -> AppResult<Option<User>>;
    async fn login(&self, credentials: &Credentials) -> AppResult<User>;
    async fn logout(&self) -> AppResult<()>;
}
