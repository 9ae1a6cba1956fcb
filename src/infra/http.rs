use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{ACCEPT, COOKIE, HeaderMap, SET_COOKIE},
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::admin::AdminResource;
use crate::domain::response::{Response, ResponseDraft};
use crate::domain::ticket::{NewTicket, Ticket, TicketEdit, TicketStats};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::{AdminService, Credentials, SessionService, TicketService};
use crate::session_store::SessionStore;

/// REST client for the helpdesk backend. Every request carries the session
/// cookie obtained at login.
pub struct HelpdeskClient {
    http: Client,
    base_url: String,
    session: Mutex<ClientSession>,
}

struct ClientSession {
    cookie: Option<String>,
    store: Option<SessionStore>,
}

impl HelpdeskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            session: Mutex::new(ClientSession {
                cookie: None,
                store: None,
            }),
        }
    }

    /// Client whose cookie is read from and written back to `store`.
    pub fn with_store(base_url: impl Into<String>, store: SessionStore) -> Self {
        let mut client = Self::new(base_url);
        *client.session.get_mut() = ClientSession {
            cookie: store.cookie().map(str::to_string),
            store: Some(store),
        };
        client
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn has_cookie(&self) -> bool {
        self.session.lock().await.cookie.is_some()
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "calling helpdesk API");
        let builder = self
            .http
            .request(method, self.endpoint(path))
            .header(ACCEPT, "application/json");
        match &self.session.lock().await.cookie {
            Some(cookie) => builder.header(COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to reach helpdesk API: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(error_from_status(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.request(Method::GET, path).await;
        let response = self.send(request).await?;
        decode(response).await
    }

    async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> AppResult<reqwest::Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.request(method, path).await.json(body);
        self.send(request).await
    }

    async fn remember_cookie(&self, headers: &HeaderMap) -> AppResult<()> {
        let Some(cookie) = session_cookie(headers) else {
            warn!("login succeeded without a session cookie");
            return Ok(());
        };
        let mut session = self.session.lock().await;
        session.cookie = Some(cookie.clone());
        if let Some(store) = session.store.as_mut() {
            store.set_cookie(Some(cookie));
            store.save()?;
        }
        Ok(())
    }

    async fn forget_cookie(&self) -> AppResult<()> {
        let mut session = self.session.lock().await;
        session.cookie = None;
        if let Some(store) = session.store.as_mut() {
            store.clear()?;
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| AppError::UnexpectedResponse(format!("failed to parse body: {err}")))
}

/// Maps a non-success answer to an error carrying the server's message.
fn error_from_status(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|payload| payload.error.or(payload.message))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('<')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        _ => AppError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// The created ticket, when the backend echoes it back.
fn created_ticket(body: &str) -> Option<Ticket> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<CreatedTicketEnvelope>(body) {
        Ok(envelope) => envelope.ticket,
        Err(err) => {
            warn!(error = %err, "ticket created but its body was not understood");
            None
        }
    }
}

/// `name=value` pairs from every `Set-Cookie` header, joined for a `Cookie`
/// header.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let pairs = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect::<Vec<_>>();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

#[async_trait]
impl SessionService for HelpdeskClient {
    async fn current_user(&self) -> AppResult<Option<User>> {
        if !self.has_cookie().await {
            return Ok(None);
        }
        match self.get_json::<UserEnvelope>("/api/me").await {
            Ok(envelope) => Ok(Some(envelope.user)),
            Err(AppError::Unauthorized(_)) | Err(AppError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn login(&self, credentials: &Credentials) -> AppResult<User> {
        let body = LoginRequest {
            username: credentials.username.trim(),
            password: credentials.password.expose_secret(),
        };
        let response = self.send_json(Method::POST, "/api/login", &body).await?;
        self.remember_cookie(response.headers()).await?;
        let envelope: UserEnvelope = decode(response).await?;
        info!(username = %envelope.user.username, "signed in");
        Ok(envelope.user)
    }

    async fn logout(&self) -> AppResult<()> {
        let request = self.request(Method::POST, "/api/logout").await;
        let result = self.send(request).await.map(|_| ());
        self.forget_cookie().await?;
        result
    }
}

#[async_trait]
impl TicketService for HelpdeskClient {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        let envelope: TicketsEnvelope = self.get_json("/api/tickets").await?;
        Ok(envelope.tickets)
    }

    async fn ticket_stats(&self) -> AppResult<TicketStats> {
        let envelope: StatsEnvelope = self.get_json("/api/tickets/stats").await?;
        Ok(envelope.stats)
    }

    async fn get_ticket(&self, id: u64) -> AppResult<Option<Ticket>> {
        match self
            .get_json::<TicketEnvelope>(&format!("/api/tickets/{id}"))
            .await
        {
            Ok(envelope) => Ok(Some(envelope.ticket)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> AppResult<Option<Ticket>> {
        let response = self.send_json(Method::POST, "/api/tickets", ticket).await?;
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "ticket created but its body could not be read");
                return Ok(None);
            }
        };
        Ok(created_ticket(&body))
    }

    async fn update_ticket(&self, id: u64, edit: &TicketEdit) -> AppResult<()> {
        self.send_json(Method::PUT, &format!("/api/tickets/{id}"), edit)
            .await
            .map(|_| ())
    }

    async fn close_ticket(&self, id: u64, message: &str) -> AppResult<()> {
        self.send_json(
            Method::POST,
            &format!("/api/tickets/{id}/close"),
            &CloseRequest { message },
        )
        .await
        .map(|_| ())
    }

    async fn list_responses(&self, ticket_id: u64) -> AppResult<Vec<Response>> {
        let envelope: ResponsesEnvelope = self
            .get_json(&format!("/api/tickets/{ticket_id}/responses"))
            .await?;
        Ok(envelope.responses)
    }

    async fn add_response(&self, ticket_id: u64, draft: &ResponseDraft) -> AppResult<()> {
        self.send_json(
            Method::POST,
            &format!("/api/tickets/{ticket_id}/responses"),
            draft,
        )
        .await
        .map(|_| ())
    }
}

#[async_trait]
impl<R: AdminResource> AdminService<R> for HelpdeskClient {
    async fn list(&self) -> AppResult<Vec<R::Record>> {
        self.get_json(R::PATH).await
    }

    async fn create(&self, form: &R::Form) -> AppResult<()> {
        self.send_json(Method::POST, R::PATH, form).await.map(|_| ())
    }

    async fn update(&self, id: u64, form: &R::Form) -> AppResult<()> {
        self.send_json(Method::PUT, &format!("{}/{id}", R::PATH), form)
            .await
            .map(|_| ())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let request = self
            .request(Method::DELETE, &format!("{}/{id}", R::PATH))
            .await;
        self.send(request).await.map(|_| ())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CloseRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct TicketsEnvelope {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Deserialize)]
struct TicketEnvelope {
    ticket: Ticket,
}

#[derive(Deserialize)]
struct CreatedTicketEnvelope {
    #[serde(default)]
    ticket: Option<Ticket>,
}

#[derive(Deserialize)]
struct ResponsesEnvelope {
    #[serde(default)]
    responses: Vec<Response>,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: TicketStats,
}
