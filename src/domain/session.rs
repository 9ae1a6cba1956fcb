use crate::domain::user::{Capabilities, User};
use crate::error::{AppError, AppResult};

/// Identity of whoever is using the CLI.
///
/// Views only read it. It is established once at startup from `GET /api/me`
/// and changed afterwards only by the login and logout workflows.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> AppResult<&User> {
        self.user.as_ref().ok_or(AppError::NotAuthenticated)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.user
            .as_ref()
            .map(Capabilities::for_user)
            .unwrap_or_default()
    }

    pub(crate) fn establish(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn end(&mut self) {
        self.user = None;
    }
}
