use crate::domain::response::{Response, visible_responses};
use crate::domain::ticket::{Ticket, TicketEdit};
use crate::domain::user::Capabilities;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailMode {
    Viewing,
    Editing(TicketEdit),
}

/// Controls offered on a ticket for the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub edit: bool,
    pub save_or_cancel: bool,
    pub close: bool,
    pub respond: bool,
    pub internal_note: bool,
}

impl Affordances {
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.edit {
            labels.push("edit");
        }
        if self.save_or_cancel {
            labels.push("save");
            labels.push("cancel");
        }
        if self.close {
            labels.push("close");
        }
        if self.respond {
            labels.push("respond");
        }
        if self.internal_note {
            labels.push("internal note");
        }
        labels
    }
}

/// A ticket and its thread as last fetched from the backend.
#[derive(Debug, Clone)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub responses: Vec<Response>,
    mode: DetailMode,
}

impl TicketDetail {
    pub fn new(ticket: Ticket, responses: Vec<Response>) -> Self {
        Self {
            ticket,
            responses,
            mode: DetailMode::Viewing,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> &DetailMode {
        &self.mode
    }

    pub fn affordances(&self, caps: Capabilities) -> Affordances {
        let open = !self.ticket.is_closed();
        let editing = matches!(self.mode, DetailMode::Editing(_));
        Affordances {
            edit: caps.can_edit && open && !editing,
            save_or_cancel: caps.can_edit && open && editing,
            close: caps.can_close && open,
            respond: open,
            internal_note: open && caps.can_edit,
        }
    }

    pub fn visible_responses(&self, caps: Capabilities) -> impl Iterator<Item = &Response> {
        visible_responses(&self.responses, caps)
    }

    pub fn begin_edit(&mut self, caps: Capabilities) -> AppResult<()> {
        if !caps.can_edit {
            return Err(AppError::Forbidden(
                "only administrators and technicians can edit tickets".to_string(),
            ));
        }
        if self.ticket.is_closed() {
            return Err(AppError::Validation(format!(
                "ticket #{} is closed and can no longer be edited",
                self.ticket.id
            )));
        }
        if self.mode == DetailMode::Viewing {
            self.mode = DetailMode::Editing(TicketEdit::from_ticket(&self.ticket));
        }
        Ok(())
    }

    pub fn form_mut(&mut self) -> AppResult<&mut TicketEdit> {
        match &mut self.mode {
            DetailMode::Editing(edit) => Ok(edit),
            DetailMode::Viewing => Err(not_editing()),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = DetailMode::Viewing;
    }

    /// The edit waiting to be saved. The detail stays in editing mode until
    /// [`TicketDetail::refresh`] lands the server's copy.
    pub fn pending_edit(&self) -> AppResult<&TicketEdit> {
        match &self.mode {
            DetailMode::Editing(edit) => Ok(edit),
            DetailMode::Viewing => Err(not_editing()),
        }
    }

    pub fn refresh(&mut self, ticket: Ticket, responses: Vec<Response>) {
        self.ticket = ticket;
        self.responses = responses;
        self.mode = DetailMode::Viewing;
    }
}

fn not_editing() -> AppError {
    AppError::Validation("ticket is not being edited".to_string())
}
