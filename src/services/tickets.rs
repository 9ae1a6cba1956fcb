use async_trait::async_trait;

use crate::domain::response::{Response, ResponseDraft};
use crate::domain::ticket::{NewTicket, Ticket, TicketEdit, TicketStats};
use crate::error::AppResult;

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>>;
    async fn ticket_stats(&self) -> AppResult<TicketStats>;
    /// `None` when the backend answers 404.
    async fn get_ticket(&self, id: u64) -> AppResult<Option<Ticket>>;
    async fn create_ticket(&self, ticket: &NewTicket) -> AppResult<Option<Ticket>>;
    async fn update_ticket(&self, id: u64, edit: &TicketEdit) -> AppResult<()>;
    async fn close_ticket(&self, id: u64, message: &str) -> AppResult<()>;
    async fn list_responses(&self, ticket_id: u64) -> AppResult<Vec<Response>>;
    async fn add_response(&self, ticket_id: u64, draft: &ResponseDraft) -> AppResult<()>;
}
