use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "aberto")]
    Open,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "fechado")]
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "open" | "aberto" => Some(TicketStatus::Open),
            "in_progress" | "em_andamento" => Some(TicketStatus::InProgress),
            "closed" | "fechado" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baixa")]
    Low,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" | "baixa" => Some(Priority::Low),
            "medium" | "media" => Some(Priority::Medium),
            "high" | "alta" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<u64>,
    #[serde(default)]
    pub assigned_user: Option<String>,
    #[serde(rename = "user")]
    pub creator: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TicketStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "aberto")]
    pub open: u64,
    #[serde(default, rename = "em_andamento")]
    pub in_progress: u64,
    #[serde(default, rename = "fechado")]
    pub closed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub service_type_id: u64,
    pub client_id: Option<u64>,
    pub priority: Priority,
}

impl NewTicket {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fields an administrator or technician may change in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketEdit {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub assigned_to: Option<u64>,
}

impl TicketEdit {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            assigned_to: ticket.assigned_to,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        // Closing goes through the close action so the closing message is recorded.
        if self.status == TicketStatus::Closed {
            return Err(AppError::Validation(
                "status cannot be set to closed by editing; use `helpdesk ticket close`"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
