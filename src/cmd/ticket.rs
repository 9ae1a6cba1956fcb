use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::domain::detail::TicketDetail;
use crate::domain::response::ResponseDraft;
use crate::domain::ticket::{NewTicket, Priority, TicketEdit, TicketStatus};
use crate::error::{AppError, AppResult};
use crate::render;
use crate::workflow::dashboard;
use crate::workflow::ticket::{self as workflow, ActionOutcome};

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketCommand {
    /// Open a new ticket.
    New(NewTicketArgs),
    /// Show a ticket with its responses.
    Show { id: u64 },
    /// Change title, description, priority, status or assignee.
    Edit(EditTicketArgs),
    /// Add a response to the thread.
    Respond(RespondArgs),
    /// Close a ticket. Closed tickets cannot be reopened.
    Close(CloseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct NewTicketArgs {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long)]
    pub description: String,
    /// Service type id or name.
    #[arg(short, long)]
    pub service_type: String,
    /// Client id or name.
    #[arg(short, long)]
    pub client: Option<String>,
    #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
    pub priority: Priority,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EditTicketArgs {
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TicketStatus>,
    /// Assign to an administrator or technician by user id.
    #[arg(long, conflicts_with = "unassign")]
    pub assign: Option<u64>,
    #[arg(long)]
    pub unassign: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RespondArgs {
    pub id: u64,
    pub message: String,
    /// Staff-only note hidden from standard users.
    #[arg(long)]
    pub internal: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CloseArgs {
    pub id: u64,
    /// Closing message recorded on the thread. Asked for when omitted.
    #[arg(short, long)]
    pub message: Option<String>,
}

pub fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_str(value)
        .ok_or_else(|| format!("unknown priority '{value}' (expected low, medium or high)"))
}

pub fn parse_status(value: &str) -> Result<TicketStatus, String> {
    TicketStatus::from_str(value).ok_or_else(|| {
        format!("unknown status '{value}' (expected open, in-progress or closed)")
    })
}

/// The signed-in landing view: stats, ticket list and reachable sections.
pub async fn list(ctx: &AppContext) -> AppResult<()> {
    let view = dashboard::load(ctx).await?;
    println!("{}", render::dashboard(&view));
    Ok(())
}

pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<()> {
    match command {
        TicketCommand::New(args) => create(ctx, args).await,
        TicketCommand::Show { id } => show(ctx, id).await,
        TicketCommand::Edit(args) => edit(ctx, args).await,
        TicketCommand::Respond(args) => respond(ctx, args).await,
        TicketCommand::Close(args) => close(ctx, args).await,
    }
}

async fn create(ctx: &AppContext, args: NewTicketArgs) -> AppResult<()> {
    let service_type_id = workflow::resolve_service_type(ctx, &args.service_type).await?;
    let client_id = match args.client.as_deref() {
        Some(reference) => Some(workflow::resolve_client(ctx, reference).await?),
        None => None,
    };
    let draft = NewTicket {
        title: args.title,
        description: args.description,
        service_type_id,
        client_id,
        priority: args.priority,
    };

    match workflow::create_ticket(ctx, draft).await? {
        Some(ticket) => println!("Created ticket #{}: {}", ticket.id, ticket.title),
        None => println!("Ticket created."),
    }
    Ok(())
}

async fn show(ctx: &AppContext, id: u64) -> AppResult<()> {
    match workflow::open_ticket(ctx, id).await? {
        Some(detail) => println!(
            "{}",
            render::ticket_detail(&detail, ctx.session.capabilities())
        ),
        None => println!("Ticket #{id} not found."),
    }
    Ok(())
}

async fn load_detail(ctx: &AppContext, id: u64) -> AppResult<TicketDetail> {
    workflow::open_ticket(ctx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ticket #{id}")))
}

async fn edit(ctx: &AppContext, args: EditTicketArgs) -> AppResult<()> {
    let mut detail = load_detail(ctx, args.id).await?;
    detail.begin_edit(ctx.session.capabilities())?;
    if !apply_edit(detail.form_mut()?, &args) {
        detail.cancel_edit();
        println!("Nothing to change.");
        return Ok(());
    }

    workflow::save_edit(ctx, &mut detail).await?;
    println!(
        "{}",
        render::ticket_detail(&detail, ctx.session.capabilities())
    );
    Ok(())
}

/// Copies the given flags onto the form. Returns whether anything was set.
fn apply_edit(form: &mut TicketEdit, args: &EditTicketArgs) -> bool {
    let before = form.clone();
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(priority) = args.priority {
        form.priority = priority;
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    if let Some(assignee) = args.assign {
        form.assigned_to = Some(assignee);
    }
    if args.unassign {
        form.assigned_to = None;
    }
    *form != before
}

async fn respond(ctx: &AppContext, args: RespondArgs) -> AppResult<()> {
    let mut detail = load_detail(ctx, args.id).await?;
    let draft = if args.internal {
        ResponseDraft::internal(args.message)
    } else {
        ResponseDraft::public(args.message)
    };

    match workflow::submit_response(ctx, &mut detail, draft).await? {
        ActionOutcome::Skipped => println!("Empty message; nothing was sent."),
        _ => println!(
            "{}",
            render::ticket_detail(&detail, ctx.session.capabilities())
        ),
    }
    Ok(())
}

async fn close(ctx: &AppContext, args: CloseArgs) -> AppResult<()> {
    let mut detail = load_detail(ctx, args.id).await?;
    match workflow::close_ticket(ctx, &mut detail, args.message).await? {
        ActionOutcome::Cancelled => println!("Ticket #{} left open.", args.id),
        _ => println!("Ticket #{} closed.", args.id),
    }
    Ok(())
}
