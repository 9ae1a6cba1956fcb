//! In-memory backend and scripted prompter for workflow tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::AppConfig;
use crate::context::{AppContext, Services};
use crate::domain::admin::{
    Client, ClientForm, ClientResource, ServiceType, ServiceTypeForm, ServiceTypeResource,
    UserForm, UserResource,
};
use crate::domain::response::{Response, ResponseDraft};
use crate::domain::ticket::{NewTicket, Priority, Ticket, TicketEdit, TicketStats, TicketStatus};
use crate::domain::user::{Profile, User};
use crate::error::{AppError, AppResult};
use crate::services::{
    AdminService, Credentials, Decision, Prompter, SessionService, TicketService,
};

pub fn user(id: u64, username: &str, profile: Profile) -> User {
    User {
        id,
        username: username.to_string(),
        profile,
        created_at: None,
    }
}

pub fn ticket(id: u64, status: TicketStatus) -> Ticket {
    Ticket {
        id,
        title: format!("Ticket {id}"),
        description: "Something is broken".to_string(),
        status,
        priority: Priority::Medium,
        service_type: Some("Hardware".to_string()),
        client: None,
        assigned_to: None,
        assigned_user: None,
        creator: "joana".to_string(),
        created_at: "2024-05-02T10:00:00".to_string(),
        updated_at: "2024-05-02T10:00:00".to_string(),
    }
}

pub fn response(id: u64, message: &str, is_internal: bool) -> Response {
    Response {
        id,
        message: message.to_string(),
        is_internal,
        created_at: "2024-05-02T11:00:00".to_string(),
        author: "tech".to_string(),
    }
}

#[derive(Default)]
pub struct FakeState {
    pub accounts: Vec<(User, String)>,
    pub signed_in: Option<User>,
    pub tickets: Vec<Ticket>,
    pub responses: HashMap<u64, Vec<Response>>,
    pub clients: Vec<Client>,
    pub service_types: Vec<ServiceType>,
    pub fail_stats: bool,
    pub calls: Vec<String>,
    pub revision: u64,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.revision += 1;
        100 + self.revision
    }

    fn touch(&mut self, ticket_id: u64) {
        self.revision += 1;
        let stamp = format!("2024-05-03T09:00:{:02}", self.revision % 60);
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) {
            ticket.updated_at = stamp;
        }
    }

    fn author(&self) -> String {
        self.signed_in
            .as_ref()
            .map(|user| user.username.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn push_response(&mut self, ticket_id: u64, message: &str, is_internal: bool) {
        let id = self.next_id();
        let author = self.author();
        self.responses.entry(ticket_id).or_default().push(Response {
            id,
            message: message.to_string(),
            is_internal,
            created_at: "2024-05-03T09:00:00".to_string(),
            author,
        });
        self.touch(ticket_id);
    }

    pub fn password_of(&self, id: u64) -> Option<&str> {
        self.accounts
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, password)| password.as_str())
    }
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(setup: impl FnOnce(&mut FakeState)) -> Arc<Self> {
        let backend = Self::default();
        setup(&mut backend.state());
        Arc::new(backend)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| !call.starts_with("GET"))
            .collect()
    }

    fn record(&self, call: String) -> MutexGuard<'_, FakeState> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl SessionService for FakeBackend {
    async fn current_user(&self) -> AppResult<Option<User>> {
        Ok(self.record("GET /api/me".to_string()).signed_in.clone())
    }

    async fn login(&self, credentials: &Credentials) -> AppResult<User> {
        let mut state = self.record("POST /api/login".to_string());
        let found = state
            .accounts
            .iter()
            .find(|(user, password)| {
                user.username == credentials.username
                    && password == credentials.password.expose_secret()
            })
            .map(|(user, _)| user.clone());
        match found {
            Some(user) => {
                state.signed_in = Some(user.clone());
                Ok(user)
            }
            None => Err(AppError::Unauthorized("Credenciais inválidas".to_string())),
        }
    }

    async fn logout(&self) -> AppResult<()> {
        self.record("POST /api/logout".to_string()).signed_in = None;
        Ok(())
    }
}

#[async_trait]
impl TicketService for FakeBackend {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        Ok(self.record("GET /api/tickets".to_string()).tickets.clone())
    }

    async fn ticket_stats(&self) -> AppResult<TicketStats> {
        let state = self.record("GET /api/tickets/stats".to_string());
        if state.fail_stats {
            return Err(AppError::Network("connection reset".to_string()));
        }
        let count = |status: TicketStatus| {
            state.tickets.iter().filter(|t| t.status == status).count() as u64
        };
        Ok(TicketStats {
            total: state.tickets.len() as u64,
            open: count(TicketStatus::Open),
            in_progress: count(TicketStatus::InProgress),
            closed: count(TicketStatus::Closed),
        })
    }

    async fn get_ticket(&self, id: u64) -> AppResult<Option<Ticket>> {
        let state = self.record(format!("GET /api/tickets/{id}"));
        Ok(state.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn create_ticket(&self, draft: &NewTicket) -> AppResult<Option<Ticket>> {
        let mut state = self.record("POST /api/tickets".to_string());
        let id = state.next_id();
        let service_type = state
            .service_types
            .iter()
            .find(|s| s.id == draft.service_type_id)
            .map(|s| s.name.clone());
        let client = draft.client_id.and_then(|client_id| {
            state
                .clients
                .iter()
                .find(|c| c.id == client_id)
                .map(|c| c.name.clone())
        });
        let mut created = ticket(id, TicketStatus::Open);
        created.title = draft.title.clone();
        created.description = draft.description.clone();
        created.priority = draft.priority;
        created.service_type = service_type;
        created.client = client;
        created.creator = state.author();
        state.tickets.push(created.clone());
        Ok(Some(created))
    }

    async fn update_ticket(&self, id: u64, edit: &TicketEdit) -> AppResult<()> {
        let mut state = self.record(format!("PUT /api/tickets/{id}"));
        let assignee = edit.assigned_to.and_then(|user_id| {
            state
                .accounts
                .iter()
                .find(|(user, _)| user.id == user_id)
                .map(|(user, _)| user.username.clone())
        });
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Ticket não encontrado".to_string()))?;
        ticket.title = edit.title.clone();
        ticket.description = edit.description.clone();
        ticket.priority = edit.priority;
        ticket.status = edit.status;
        ticket.assigned_to = edit.assigned_to;
        ticket.assigned_user = assignee;
        state.touch(id);
        Ok(())
    }

    async fn close_ticket(&self, id: u64, message: &str) -> AppResult<()> {
        let mut state = self.record(format!("POST /api/tickets/{id}/close"));
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Ticket não encontrado".to_string()))?;
        ticket.status = TicketStatus::Closed;
        if message.trim().is_empty() {
            state.touch(id);
        } else {
            state.push_response(id, message, false);
        }
        Ok(())
    }

    async fn list_responses(&self, ticket_id: u64) -> AppResult<Vec<Response>> {
        let state = self.record(format!("GET /api/tickets/{ticket_id}/responses"));
        Ok(state.responses.get(&ticket_id).cloned().unwrap_or_default())
    }

    async fn add_response(&self, ticket_id: u64, draft: &ResponseDraft) -> AppResult<()> {
        let mut state = self.record(format!("POST /api/tickets/{ticket_id}/responses"));
        state.push_response(ticket_id, &draft.message, draft.is_internal);
        Ok(())
    }
}

#[async_trait]
impl AdminService<UserResource> for FakeBackend {
    async fn list(&self) -> AppResult<Vec<User>> {
        let state = self.record("GET /api/users".to_string());
        Ok(state.accounts.iter().map(|(user, _)| user.clone()).collect())
    }

    async fn create(&self, form: &UserForm) -> AppResult<()> {
        let mut state = self.record("POST /api/users".to_string());
        let Some(password) = form.password.as_ref() else {
            return Err(AppError::Api {
                status: 400,
                message: "Senha é obrigatória".to_string(),
            });
        };
        let id = state.next_id();
        let created = user(
            id,
            &form.username,
            form.profile.unwrap_or(Profile::StandardUser),
        );
        state
            .accounts
            .push((created, password.expose_secret().to_string()));
        Ok(())
    }

    async fn update(&self, id: u64, form: &UserForm) -> AppResult<()> {
        let mut state = self.record(format!("PUT /api/users/{id}"));
        let (account, password) = state
            .accounts
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;
        account.username = form.username.clone();
        if let Some(profile) = form.profile {
            account.profile = profile;
        }
        if let Some(secret) = form.password.as_ref() {
            *password = secret.expose_secret().to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let mut state = self.record(format!("DELETE /api/users/{id}"));
        state.accounts.retain(|(user, _)| user.id != id);
        Ok(())
    }
}

#[async_trait]
impl AdminService<ClientResource> for FakeBackend {
    async fn list(&self) -> AppResult<Vec<Client>> {
        Ok(self.record("GET /api/clients".to_string()).clients.clone())
    }

    async fn create(&self, form: &ClientForm) -> AppResult<()> {
        let mut state = self.record("POST /api/clients".to_string());
        if state.clients.iter().any(|c| c.name == form.name) {
            return Err(AppError::Api {
                status: 400,
                message: "Cliente já cadastrado".to_string(),
            });
        }
        let id = state.next_id();
        state.clients.push(Client {
            id,
            name: form.name.clone(),
            email: Some(form.email.clone()).filter(|v| !v.is_empty()),
            phone: Some(form.phone.clone()).filter(|v| !v.is_empty()),
            company: Some(form.company.clone()).filter(|v| !v.is_empty()),
            address: Some(form.address.clone()).filter(|v| !v.is_empty()),
            active: form.active.unwrap_or(true),
        });
        Ok(())
    }

    async fn update(&self, id: u64, form: &ClientForm) -> AppResult<()> {
        let mut state = self.record(format!("PUT /api/clients/{id}"));
        let client = state
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Cliente não encontrado".to_string()))?;
        client.name = form.name.clone();
        client.email = Some(form.email.clone()).filter(|v| !v.is_empty());
        if let Some(active) = form.active {
            client.active = active;
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let mut state = self.record(format!("DELETE /api/clients/{id}"));
        state.clients.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl AdminService<ServiceTypeResource> for FakeBackend {
    async fn list(&self) -> AppResult<Vec<ServiceType>> {
        Ok(self
            .record("GET /api/service-types".to_string())
            .service_types
            .clone())
    }

    async fn create(&self, form: &ServiceTypeForm) -> AppResult<()> {
        let mut state = self.record("POST /api/service-types".to_string());
        let id = state.next_id();
        state.service_types.push(ServiceType {
            id,
            name: form.name.clone(),
            description: Some(form.description.clone()).filter(|v| !v.is_empty()),
            active: form.active.unwrap_or(true),
        });
        Ok(())
    }

    async fn update(&self, id: u64, form: &ServiceTypeForm) -> AppResult<()> {
        let mut state = self.record(format!("PUT /api/service-types/{id}"));
        let service_type = state
            .service_types
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Tipo de serviço não encontrado".to_string()))?;
        service_type.name = form.name.clone();
        service_type.description = Some(form.description.clone()).filter(|v| !v.is_empty());
        if let Some(active) = form.active {
            service_type.active = active;
        }
        Ok(())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let mut state = self.record(format!("DELETE /api/service-types/{id}"));
        state.service_types.retain(|s| s.id != id);
        Ok(())
    }
}

/// Answers questions from a script; an exhausted script aborts and answers
/// nothing.
#[derive(Default)]
pub struct ScriptedPrompter {
    decisions: Mutex<VecDeque<Decision>>,
    answers: Mutex<VecDeque<String>>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(decisions: &[Decision], answers: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            decisions: Mutex::new(decisions.iter().copied().collect()),
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        })
    }

    pub fn questions(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> AppResult<Decision> {
        self.asked.lock().unwrap().push(question.to_string());
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Decision::Abort))
    }

    fn ask(&self, label: &str) -> AppResult<Option<String>> {
        self.asked.lock().unwrap().push(label.to_string());
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .filter(|answer| !answer.trim().is_empty()))
    }

    fn ask_secret(&self, label: &str) -> AppResult<SecretString> {
        self.asked.lock().unwrap().push(label.to_string());
        let answer = self.answers.lock().unwrap().pop_front().unwrap_or_default();
        Ok(SecretString::from(answer))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_base_url: "http://helpdesk.test".to_string(),
        default_username: None,
        config_dir: PathBuf::from("/nonexistent"),
    }
}

/// Context signed in as `signed_in` (if any) against `backend`.
pub fn context(
    backend: &Arc<FakeBackend>,
    signed_in: Option<User>,
    prompter: Arc<ScriptedPrompter>,
) -> AppContext {
    backend.state().signed_in = signed_in.clone();
    let mut ctx = AppContext::new(
        test_config(),
        Services::from_backend(backend.clone()),
        prompter,
    );
    if let Some(user) = signed_in {
        ctx.session.establish(user);
    }
    ctx
}
