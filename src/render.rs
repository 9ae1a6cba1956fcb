//! Plain-text rendering of the views.

use std::fmt::Write as _;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::admin::{Client, ServiceType};
use crate::domain::detail::TicketDetail;
use crate::domain::ticket::Ticket;
use crate::domain::user::{Capabilities, User};
use crate::workflow::dashboard::Dashboard;

const NOT_SET: &str = "-";

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Created")]
    created: String,
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Profile")]
    profile: String,
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ServiceTypeRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn or_not_set(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_SET)
        .to_string()
}

fn active_label(active: bool) -> String {
    if active { "active" } else { "inactive" }.to_string()
}

/// Date part of a backend timestamp.
fn date_of(timestamp: &str) -> &str {
    timestamp.split(['T', ' ']).next().unwrap_or(timestamp)
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn tickets_table(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "No tickets found. Create one with `helpdesk ticket new`.".to_string();
    }
    table(
        tickets
            .iter()
            .map(|ticket| TicketRow {
                id: format!("#{}", ticket.id),
                title: ticket.title.clone(),
                status: ticket.status.to_string(),
                priority: ticket.priority.to_string(),
                service: or_not_set(ticket.service_type.as_deref()),
                assignee: or_not_set(ticket.assigned_user.as_deref()),
                created: date_of(&ticket.created_at).to_string(),
            })
            .collect(),
    )
}

pub fn dashboard(view: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Signed in as {} ({})",
        view.user.username, view.user.profile
    );
    let _ = writeln!(
        out,
        "Total: {}  Open: {}  In progress: {}  Closed: {}",
        view.stats.total, view.stats.open, view.stats.in_progress, view.stats.closed
    );
    let sections = view
        .navigation
        .iter()
        .map(|section| section.command())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Sections: {sections}");
    out.push('\n');
    out.push_str(&tickets_table(&view.tickets));
    out
}

/// Ticket, visible thread and the actions open to the viewer. Capabilities are
/// taken from the caller on every render.
pub fn ticket_detail(detail: &TicketDetail, caps: Capabilities) -> String {
    let ticket = &detail.ticket;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} - {} [{}] ({} priority)",
        ticket.id, ticket.title, ticket.status, ticket.priority
    );
    let _ = writeln!(
        out,
        "Opened by {} on {}",
        ticket.creator,
        date_of(&ticket.created_at)
    );
    let _ = writeln!(
        out,
        "Service: {}",
        ticket.service_type.as_deref().unwrap_or("not specified")
    );
    if let Some(client) = ticket.client.as_deref() {
        let _ = writeln!(out, "Client: {client}");
    }
    if let Some(assignee) = ticket.assigned_user.as_deref() {
        let _ = writeln!(out, "Assignee: {assignee}");
    }
    let _ = writeln!(out, "Updated: {}", ticket.updated_at);
    let _ = writeln!(out, "\n{}\n", ticket.description);

    let responses = detail.visible_responses(caps).collect::<Vec<_>>();
    let _ = writeln!(out, "Responses ({})", responses.len());
    if responses.is_empty() {
        let _ = writeln!(out, "  No responses yet");
    }
    for response in responses {
        let badge = if response.is_internal { " [internal]" } else { "" };
        let _ = writeln!(
            out,
            "- {}{} at {}",
            response.author, badge, response.created_at
        );
        for line in response.message.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }

    let actions = detail.affordances(caps).labels();
    if actions.is_empty() {
        let _ = write!(out, "\nNo actions available.");
    } else {
        let _ = write!(out, "\nActions: {}", actions.join(", "));
    }
    out
}

pub fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users registered.".to_string();
    }
    table(
        users
            .iter()
            .map(|user| UserRow {
                id: user.id,
                username: user.username.clone(),
                profile: user.profile.to_string(),
            })
            .collect(),
    )
}

pub fn clients_table(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients registered.".to_string();
    }
    table(
        clients
            .iter()
            .map(|client| ClientRow {
                id: client.id,
                name: client.name.clone(),
                email: or_not_set(client.email.as_deref()),
                phone: or_not_set(client.phone.as_deref()),
                company: or_not_set(client.company.as_deref()),
                status: active_label(client.active),
            })
            .collect(),
    )
}

pub fn service_types_table(service_types: &[ServiceType]) -> String {
    if service_types.is_empty() {
        return "No service types registered.".to_string();
    }
    table(
        service_types
            .iter()
            .map(|service_type| ServiceTypeRow {
                id: service_type.id,
                name: service_type.name.clone(),
                description: or_not_set(service_type.description.as_deref()),
                status: active_label(service_type.active),
            })
            .collect(),
    )
}

/// Table for the records listed on an admin screen.
pub trait RecordTable: Sized {
    fn table(records: &[Self]) -> String;
}

impl RecordTable for User {
    fn table(records: &[Self]) -> String {
        users_table(records)
    }
}

impl RecordTable for Client {
    fn table(records: &[Self]) -> String {
        clients_table(records)
    }
}

impl RecordTable for ServiceType {
    fn table(records: &[Self]) -> String {
        service_types_table(records)
    }
}
