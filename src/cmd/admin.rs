//! `users`, `clients` and `service-types`: list, create, update and delete.

use clap::{Args, Subcommand};
use secrecy::SecretString;

use crate::context::AppContext;
use crate::domain::admin::{
    AdminDialog, AdminResource, ClientForm, ClientResource, FormMode, ServiceTypeForm,
    ServiceTypeResource, UserForm, UserResource,
};
use crate::domain::user::Profile;
use crate::error::AppResult;
use crate::render::RecordTable;
use crate::services::{AdminService, Prompter};
use crate::workflow::admin;
use crate::workflow::dashboard::enter_view;
use crate::workflow::ticket::ActionOutcome;

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    List,
    Create(UserFields),
    /// Omit --password to keep the current one.
    Update {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClientCommand {
    List,
    Create(ClientFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: ClientFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ServiceTypeCommand {
    List,
    Create(ServiceTypeFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: ServiceTypeFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct UserFields {
    #[arg(long)]
    pub username: Option<String>,
    /// Asked for without echo when creating and omitted.
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, value_parser = parse_profile)]
    pub profile: Option<Profile>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClientFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[command(flatten)]
    pub activation: Activation,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceTypeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[command(flatten)]
    pub activation: Activation,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Activation {
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    #[arg(long)]
    pub inactive: bool,
}

impl Activation {
    fn value(&self) -> Option<bool> {
        match (self.active, self.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub fn parse_profile(value: &str) -> Result<Profile, String> {
    Profile::from_str(value).ok_or_else(|| {
        format!("unknown profile '{value}' (expected administrator, technician or user)")
    })
}

/// Command-line flags that fill in a resource's dialog form.
trait FormFields<R: AdminResource> {
    fn apply(self, form: &mut R::Form, mode: FormMode, prompter: &dyn Prompter)
    -> AppResult<()>;
}

impl FormFields<UserResource> for UserFields {
    fn apply(self, form: &mut UserForm, mode: FormMode, prompter: &dyn Prompter) -> AppResult<()> {
        if let Some(username) = self.username {
            form.username = username;
        }
        if let Some(profile) = self.profile {
            form.profile = Some(profile);
        }
        form.password = match (self.password, mode) {
            (Some(password), _) => Some(SecretString::from(password)),
            (None, FormMode::Create) => Some(prompter.ask_secret("Password")?),
            (None, FormMode::Edit) => None,
        };
        Ok(())
    }
}

impl FormFields<ClientResource> for ClientFields {
    fn apply(self, form: &mut ClientForm, _: FormMode, _: &dyn Prompter) -> AppResult<()> {
        let targets = [
            (self.name, &mut form.name),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone),
            (self.company, &mut form.company),
            (self.address, &mut form.address),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
        if let Some(active) = self.activation.value() {
            form.active = Some(active);
        }
        Ok(())
    }
}

impl FormFields<ServiceTypeResource> for ServiceTypeFields {
    fn apply(self, form: &mut ServiceTypeForm, _: FormMode, _: &dyn Prompter) -> AppResult<()> {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(active) = self.activation.value() {
            form.active = Some(active);
        }
        Ok(())
    }
}

enum Action<F> {
    List,
    Create(F),
    Update(u64, F),
    Delete(u64),
}

pub async fn users(ctx: &AppContext, command: UserCommand) -> AppResult<()> {
    let action = match command {
        UserCommand::List => Action::List,
        UserCommand::Create(fields) => Action::Create(fields),
        UserCommand::Update { id, fields } => Action::Update(id, fields),
        UserCommand::Delete { id } => Action::Delete(id),
    };
    run(ctx, ctx.services.users.as_ref(), action).await
}

pub async fn clients(ctx: &AppContext, command: ClientCommand) -> AppResult<()> {
    let action = match command {
        ClientCommand::List => Action::List,
        ClientCommand::Create(fields) => Action::Create(fields),
        ClientCommand::Update { id, fields } => Action::Update(id, fields),
        ClientCommand::Delete { id } => Action::Delete(id),
    };
    run(ctx, ctx.services.clients.as_ref(), action).await
}

pub async fn service_types(ctx: &AppContext, command: ServiceTypeCommand) -> AppResult<()> {
    let action = match command {
        ServiceTypeCommand::List => Action::List,
        ServiceTypeCommand::Create(fields) => Action::Create(fields),
        ServiceTypeCommand::Update { id, fields } => Action::Update(id, fields),
        ServiceTypeCommand::Delete { id } => Action::Delete(id),
    };
    run(ctx, ctx.services.service_types.as_ref(), action).await
}

async fn run<R, F>(
    ctx: &AppContext,
    service: &dyn AdminService<R>,
    action: Action<F>,
) -> AppResult<()>
where
    R: AdminResource,
    R::Record: RecordTable,
    F: FormFields<R>,
{
    // Refused before any prompt or request.
    enter_view(&ctx.session, R::VIEW)?;

    let records = match action {
        Action::List => admin::list(ctx, service).await?,
        Action::Create(fields) => {
            let mut dialog = AdminDialog::<R>::create();
            fields.apply(dialog.form_mut(), FormMode::Create, ctx.prompter.as_ref())?;
            let records = admin::submit(ctx, service, dialog).await?;
            println!("Created {}.", R::NOUN);
            records
        }
        Action::Update(id, fields) => {
            let mut dialog = admin::edit_dialog(ctx, service, id).await?;
            fields.apply(dialog.form_mut(), FormMode::Edit, ctx.prompter.as_ref())?;
            let records = admin::submit(ctx, service, dialog).await?;
            println!("Updated {} #{id}.", R::NOUN);
            records
        }
        Action::Delete(id) => match admin::delete(ctx, service, id).await? {
            (ActionOutcome::Cancelled, _) => {
                println!("Kept {} #{id}.", R::NOUN);
                return Ok(());
            }
            (_, records) => {
                println!("Deleted {} #{id}.", R::NOUN);
                records
            }
        },
    };
    println!("{}", <R::Record as RecordTable>::table(&records));
    Ok(())
}
