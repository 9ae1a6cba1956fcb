use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::admin::{ClientResource, ServiceTypeResource, UserResource};
use crate::domain::session::Session;
use crate::services::{AdminService, Prompter, SessionService, TicketService};

/// Backend services, one handle per concern.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn SessionService>,
    pub tickets: Arc<dyn TicketService>,
    pub users: Arc<dyn AdminService<UserResource>>,
    pub clients: Arc<dyn AdminService<ClientResource>>,
    pub service_types: Arc<dyn AdminService<ServiceTypeResource>>,
}

impl Services {
    /// Uses one backend implementation for every concern.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SessionService
            + TicketService
            + AdminService<UserResource>
            + AdminService<ClientResource>
            + AdminService<ServiceTypeResource>
            + 'static,
    {
        Self {
            auth: backend.clone(),
            tickets: backend.clone(),
            users: backend.clone(),
            clients: backend.clone(),
            service_types: backend,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: Session,
    pub services: Services,
    pub prompter: Arc<dyn Prompter>,
}

impl AppContext {
    pub fn new(config: AppConfig, services: Services, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            config,
            session: Session::anonymous(),
            services,
            prompter,
        }
    }
}
