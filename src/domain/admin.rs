//! Records managed from the admin screens and the list + dialog contract they
//! share.
//!
//! Every screen lists all records of one type and edits them through a dialog
//! that is either empty (create, `POST`) or prefilled from a record (edit,
//! `PUT`). [`AdminResource`] captures what differs between the three screens.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::user::{Profile, User};
use crate::domain::view::DashboardView;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

pub trait AdminResource: Send + Sync + 'static {
    type Record: DeserializeOwned + Clone + fmt::Debug + Send + Sync;
    type Form: Serialize + Default + fmt::Debug + Send + Sync;

    /// Collection endpoint, e.g. `/api/users`.
    const PATH: &'static str;
    const NOUN: &'static str;
    const VIEW: DashboardView;

    fn record_id(record: &Self::Record) -> u64;

    /// Dialog contents when editing `record`.
    fn prefill(record: &Self::Record) -> Self::Form;

    /// Validates the form and normalizes it into the body that gets sent.
    fn prepare(form: &mut Self::Form, mode: FormMode) -> AppResult<()>;
}

/// The create/edit dialog of an admin screen.
pub enum AdminDialog<R: AdminResource> {
    Create(R::Form),
    Edit { id: u64, form: R::Form },
}

impl<R: AdminResource> AdminDialog<R> {
    pub fn create() -> Self {
        AdminDialog::Create(R::Form::default())
    }

    pub fn edit(record: &R::Record) -> Self {
        AdminDialog::Edit {
            id: R::record_id(record),
            form: R::prefill(record),
        }
    }

    pub fn mode(&self) -> FormMode {
        match self {
            AdminDialog::Create(_) => FormMode::Create,
            AdminDialog::Edit { .. } => FormMode::Edit,
        }
    }

    pub fn form(&self) -> &R::Form {
        match self {
            AdminDialog::Create(form) | AdminDialog::Edit { form, .. } => form,
        }
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        match self {
            AdminDialog::Create(form) | AdminDialog::Edit { form, .. } => form,
        }
    }
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

// Users

#[derive(Debug, Default, Serialize)]
pub struct UserForm {
    pub username: String,
    /// Write-only. `None` on edit leaves the stored password untouched.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_password"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

fn expose_password<S>(password: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

pub struct UserResource;

impl AdminResource for UserResource {
    type Record = User;
    type Form = UserForm;

    const PATH: &'static str = "/api/users";
    const NOUN: &'static str = "user";
    const VIEW: DashboardView = DashboardView::Users;

    fn record_id(record: &User) -> u64 {
        record.id
    }

    fn prefill(record: &User) -> UserForm {
        UserForm {
            username: record.username.clone(),
            password: None,
            profile: Some(record.profile),
        }
    }

    fn prepare(form: &mut UserForm, mode: FormMode) -> AppResult<()> {
        require(&form.username, "username")?;
        let blank_password = form
            .password
            .as_ref()
            .is_none_or(|secret| secret.expose_secret().trim().is_empty());
        match mode {
            FormMode::Create => {
                if blank_password {
                    return Err(AppError::Validation(
                        "password is required for new users".to_string(),
                    ));
                }
                if form.profile.is_none() {
                    return Err(AppError::Validation("profile is required".to_string()));
                }
            }
            FormMode::Edit => {
                if blank_password {
                    form.password = None;
                }
            }
        }
        Ok(())
    }
}

// Clients

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub struct ClientResource;

impl AdminResource for ClientResource {
    type Record = Client;
    type Form = ClientForm;

    const PATH: &'static str = "/api/clients";
    const NOUN: &'static str = "client";
    const VIEW: DashboardView = DashboardView::Clients;

    fn record_id(record: &Client) -> u64 {
        record.id
    }

    fn prefill(record: &Client) -> ClientForm {
        ClientForm {
            name: record.name.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            company: record.company.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            active: Some(record.active),
        }
    }

    fn prepare(form: &mut ClientForm, _mode: FormMode) -> AppResult<()> {
        require(&form.name, "name")
    }
}

// Service types

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ServiceTypeForm {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub struct ServiceTypeResource;

impl AdminResource for ServiceTypeResource {
    type Record = ServiceType;
    type Form = ServiceTypeForm;

    const PATH: &'static str = "/api/service-types";
    const NOUN: &'static str = "service type";
    const VIEW: DashboardView = DashboardView::ServiceTypes;

    fn record_id(record: &ServiceType) -> u64 {
        record.id
    }

    fn prefill(record: &ServiceType) -> ServiceTypeForm {
        ServiceTypeForm {
            name: record.name.clone(),
            description: record.description.clone().unwrap_or_default(),
            active: Some(record.active),
        }
    }

    fn prepare(form: &mut ServiceTypeForm, _mode: FormMode) -> AppResult<()> {
        require(&form.name, "name")
    }
}

fn active_by_default() -> bool {
    true
}
