use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::admin::{Client, ServiceType};
use crate::domain::detail::TicketDetail;
use crate::domain::response::{Response, ResponseDraft};
use crate::domain::ticket::{NewTicket, Ticket};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

/// Result of an action that may be skipped or declined without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Nothing to send, no request was issued.
    Skipped,
    /// Declined at the confirmation step.
    Cancelled,
}

/// Loads a ticket and its thread. `None` when the backend does not know the
/// ticket.
pub async fn open_ticket(ctx: &AppContext, id: u64) -> AppResult<Option<TicketDetail>> {
    ctx.session.require_user()?;
    let Some(ticket) = ctx.services.tickets.get_ticket(id).await? else {
        return Ok(None);
    };
    let responses = fetch_responses(ctx, id).await;
    Ok(Some(TicketDetail::new(ticket, responses)))
}

async fn fetch_responses(ctx: &AppContext, ticket_id: u64) -> Vec<Response> {
    match ctx.services.tickets.list_responses(ticket_id).await {
        Ok(responses) => responses,
        Err(err) => {
            warn!(ticket_id, error = %err, "failed to load responses");
            Vec::new()
        }
    }
}

/// Replaces the detail with the server's copy of ticket and thread.
async fn reload(ctx: &AppContext, detail: &mut TicketDetail) -> AppResult<()> {
    let id = detail.ticket.id;
    let responses = fetch_responses(ctx, id).await;
    let ticket = ctx
        .services
        .tickets
        .get_ticket(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ticket #{id} disappeared")))?;
    detail.refresh(ticket, responses);
    Ok(())
}

pub async fn create_ticket(ctx: &AppContext, draft: NewTicket) -> AppResult<Option<Ticket>> {
    ctx.session.require_user()?;
    draft.validate()?;
    let created = ctx.services.tickets.create_ticket(&draft).await?;
    info!(
        ticket_id = ?created.as_ref().map(|ticket| ticket.id),
        "ticket created"
    );
    Ok(created)
}

/// Persists the pending edit, then reloads ticket and thread.
pub async fn save_edit(ctx: &AppContext, detail: &mut TicketDetail) -> AppResult<()> {
    ctx.session.require_user()?;
    if !ctx.session.capabilities().can_edit {
        return Err(AppError::Forbidden(
            "only administrators and technicians can edit tickets".to_string(),
        ));
    }
    if detail.ticket.is_closed() {
        return Err(AppError::Validation(format!(
            "ticket #{} is closed and can no longer be edited",
            detail.ticket.id
        )));
    }

    let edit = detail.pending_edit()?.clone();
    edit.validate()?;
    if let Some(assignee) = edit.assigned_to {
        if Some(assignee) != detail.ticket.assigned_to {
            ensure_assignable(ctx, assignee).await?;
        }
    }

    ctx.services
        .tickets
        .update_ticket(detail.ticket.id, &edit)
        .await?;
    info!(ticket_id = detail.ticket.id, "ticket updated");
    reload(ctx, detail).await
}

/// Users a ticket can be assigned to: administrators and technicians.
pub async fn assignable_users(ctx: &AppContext) -> AppResult<Vec<User>> {
    let users = ctx.services.users.list().await?;
    Ok(users
        .into_iter()
        .filter(|user| user.profile.is_staff())
        .collect())
}

async fn ensure_assignable(ctx: &AppContext, user_id: u64) -> AppResult<()> {
    let candidates = assignable_users(ctx).await?;
    if candidates.iter().any(|user| user.id == user_id) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "user #{user_id} is not an administrator or technician"
        )))
    }
}

/// Appends a response. Whitespace-only messages are ignored.
pub async fn submit_response(
    ctx: &AppContext,
    detail: &mut TicketDetail,
    draft: ResponseDraft,
) -> AppResult<ActionOutcome> {
    ctx.session.require_user()?;
    if draft.is_blank() {
        return Ok(ActionOutcome::Skipped);
    }
    let affordances = detail.affordances(ctx.session.capabilities());
    if !affordances.respond {
        return Err(AppError::Validation(format!(
            "ticket #{} is closed and no longer accepts responses",
            detail.ticket.id
        )));
    }
    if draft.is_internal && !affordances.internal_note {
        return Err(AppError::Forbidden(
            "only administrators and technicians can add internal notes".to_string(),
        ));
    }

    ctx.services
        .tickets
        .add_response(detail.ticket.id, &draft)
        .await?;
    reload(ctx, detail).await?;
    Ok(ActionOutcome::Done)
}

/// Closes the ticket for good. `message` is asked for when not given and is
/// recorded by the backend as a response.
pub async fn close_ticket(
    ctx: &AppContext,
    detail: &mut TicketDetail,
    message: Option<String>,
) -> AppResult<ActionOutcome> {
    ctx.session.require_user()?;
    if !ctx.session.capabilities().can_close {
        return Err(AppError::Forbidden(
            "only administrators and technicians can close tickets".to_string(),
        ));
    }
    if detail.ticket.is_closed() {
        return Err(AppError::Validation(format!(
            "ticket #{} is already closed",
            detail.ticket.id
        )));
    }

    let question = format!(
        "Close ticket #{} \"{}\"? Closed tickets cannot be reopened.",
        detail.ticket.id, detail.ticket.title
    );
    if !ctx.prompter.confirm(&question)?.proceeds() {
        return Ok(ActionOutcome::Cancelled);
    }
    let message = match message {
        Some(message) => Some(message),
        None => ctx.prompter.ask("Closing message (optional)")?,
    };

    ctx.services
        .tickets
        .close_ticket(detail.ticket.id, message.as_deref().unwrap_or("").trim())
        .await?;
    info!(ticket_id = detail.ticket.id, "ticket closed");
    reload(ctx, detail).await?;
    Ok(ActionOutcome::Done)
}

/// Picks a service type by id or case-insensitive name.
pub async fn resolve_service_type(ctx: &AppContext, reference: &str) -> AppResult<u64> {
    let service_types = ctx.services.service_types.list().await?;
    let found = find_reference(&service_types, reference, |s: &ServiceType| {
        (s.id, s.name.as_str())
    })
    .ok_or_else(|| AppError::Validation(format!("unknown service type '{reference}'")))?;
    if !found.active {
        return Err(AppError::Validation(format!(
            "service type '{}' is inactive",
            found.name
        )));
    }
    Ok(found.id)
}

/// Picks a client by id or case-insensitive name.
pub async fn resolve_client(ctx: &AppContext, reference: &str) -> AppResult<u64> {
    let clients = ctx.services.clients.list().await?;
    find_reference(&clients, reference, |c: &Client| (c.id, c.name.as_str()))
        .map(|client| client.id)
        .ok_or_else(|| AppError::Validation(format!("unknown client '{reference}'")))
}

fn find_reference<'a, T>(
    records: &'a [T],
    reference: &str,
    key: impl Fn(&T) -> (u64, &str),
) -> Option<&'a T> {
    let reference = reference.trim();
    let by_id = reference.parse::<u64>().ok();
    records.iter().find(|record| {
        let (id, name) = key(record);
        Some(id) == by_id || name.eq_ignore_ascii_case(reference)
    })
}
