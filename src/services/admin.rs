use async_trait::async_trait;

use crate::domain::admin::AdminResource;
use crate::error::AppResult;

#[async_trait]
pub trait AdminService<R: AdminResource>: Send + Sync {
    async fn list(&self) -> AppResult<Vec<R::Record>>;
    async fn create(&self, form: &R::Form) -> AppResult<()>;
    async fn update(&self, id: u64, form: &R::Form) -> AppResult<()>;
    async fn delete(&self, id: u64) -> AppResult<()>;
}
