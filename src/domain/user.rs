use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "tecnico")]
    Technician,
    #[serde(rename = "usuario")]
    StandardUser,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Administrator => "administrator",
            Profile::Technician => "technician",
            Profile::StandardUser => "user",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "administrator" | "admin" | "administrador" => Some(Profile::Administrator),
            "technician" | "tech" | "tecnico" => Some(Profile::Technician),
            "user" | "standard" | "usuario" => Some(Profile::StandardUser),
            _ => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Profile::Administrator | Profile::Technician)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// What a profile may do on a ticket. Derive it from the current session user
/// every time it is needed; never keep a copy on a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub can_edit: bool,
    pub can_close: bool,
    pub can_view_internal: bool,
}

impl Capabilities {
    pub fn for_profile(profile: Profile) -> Self {
        let staff = profile.is_staff();
        Self {
            can_edit: staff,
            can_close: staff,
            can_view_internal: staff,
        }
    }

    pub fn for_user(user: &User) -> Self {
        Self::for_profile(user.profile)
    }
}
