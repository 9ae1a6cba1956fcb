use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::admin::{AdminDialog, AdminResource};
use crate::error::{AppError, AppResult};
use crate::services::AdminService;
use crate::workflow::dashboard::enter_view;
use crate::workflow::ticket::ActionOutcome;

pub async fn list<R: AdminResource>(
    ctx: &AppContext,
    service: &dyn AdminService<R>,
) -> AppResult<Vec<R::Record>> {
    enter_view(&ctx.session, R::VIEW)?;
    service.list().await
}

/// Dialog prefilled from the record with `id`, fetched fresh.
pub async fn edit_dialog<R: AdminResource>(
    ctx: &AppContext,
    service: &dyn AdminService<R>,
    id: u64,
) -> AppResult<AdminDialog<R>> {
    let records = list(ctx, service).await?;
    records
        .iter()
        .find(|record| R::record_id(record) == id)
        .map(AdminDialog::edit)
        .ok_or_else(|| AppError::NotFound(format!("{} #{id}", R::NOUN)))
}

/// Creates or updates depending on the dialog, then returns the refreshed
/// list.
pub async fn submit<R: AdminResource>(
    ctx: &AppContext,
    service: &dyn AdminService<R>,
    mut dialog: AdminDialog<R>,
) -> AppResult<Vec<R::Record>> {
    enter_view(&ctx.session, R::VIEW)?;
    let mode = dialog.mode();
    R::prepare(dialog.form_mut(), mode)?;
    debug!(resource = R::NOUN, form = ?dialog.form(), "submitting form");

    match &dialog {
        AdminDialog::Create(form) => {
            service.create(form).await?;
            info!(resource = R::NOUN, "record created");
        }
        AdminDialog::Edit { id, form } => {
            service.update(*id, form).await?;
            info!(resource = R::NOUN, id, "record updated");
        }
    }
    service.list().await
}

/// Deletes after an explicit confirmation. A declined confirmation issues no
/// request.
pub async fn delete<R: AdminResource>(
    ctx: &AppContext,
    service: &dyn AdminService<R>,
    id: u64,
) -> AppResult<(ActionOutcome, Vec<R::Record>)> {
    enter_view(&ctx.session, R::VIEW)?;
    let question = format!("Delete {} #{id}? This cannot be undone.", R::NOUN);
    if !ctx.prompter.confirm(&question)?.proceeds() {
        return Ok((ActionOutcome::Cancelled, Vec::new()));
    }

    service.delete(id).await?;
    info!(resource = R::NOUN, id, "record deleted");
    Ok((ActionOutcome::Done, service.list().await?))
}
