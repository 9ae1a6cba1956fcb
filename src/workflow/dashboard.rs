use tracing::warn;

use crate::context::AppContext;
use crate::domain::session::Session;
use crate::domain::ticket::{Ticket, TicketStats};
use crate::domain::user::User;
use crate::domain::view::{DashboardView, allowed_view, navigation};
use crate::error::{AppError, AppResult};

pub struct Dashboard {
    pub user: User,
    pub stats: TicketStats,
    pub tickets: Vec<Ticket>,
    pub navigation: Vec<DashboardView>,
}

/// Stats cards plus the ticket list. Missing stats degrade to zero counts.
pub async fn load(ctx: &AppContext) -> AppResult<Dashboard> {
    let user = ctx.session.require_user()?.clone();
    let tickets = ctx.services.tickets.list_tickets().await?;
    let stats = match ctx.services.tickets.ticket_stats().await {
        Ok(stats) => stats,
        Err(err) => {
            warn!(error = %err, "failed to load ticket stats");
            TicketStats::default()
        }
    };

    Ok(Dashboard {
        navigation: navigation(user.profile),
        user,
        stats,
        tickets,
    })
}

/// Opens `requested` for the session user, refusing views the profile would be
/// sent away from.
pub fn enter_view(session: &Session, requested: DashboardView) -> AppResult<DashboardView> {
    let user = session.require_user()?;
    let view = allowed_view(user.profile, requested);
    if view != requested {
        return Err(AppError::Forbidden(format!(
            "{} is not available to {} profiles",
            requested.title().to_lowercase(),
            user.profile
        )));
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::TicketStatus;
    use crate::domain::user::Profile;
    use crate::testing::{FakeBackend, ScriptedPrompter, context, ticket, user};

    #[tokio::test]
    async fn dashboard_survives_stats_failure() {
        let backend = FakeBackend::new(|state| {
            state.tickets.push(ticket(1, TicketStatus::Open));
            state.fail_stats = true;
        });
        let ctx = context(
            &backend,
            Some(user(2, "joana", Profile::StandardUser)),
            ScriptedPrompter::new(&[], &[]),
        );

        let dashboard = load(&ctx).await.unwrap();
        assert_eq!(dashboard.tickets.len(), 1);
        assert_eq!(dashboard.stats, TicketStats::default());
        assert_eq!(dashboard.navigation, vec![DashboardView::Tickets]);
    }

    #[tokio::test]
    async fn dashboard_counts_by_status() {
        let backend = FakeBackend::new(|state| {
            state.tickets.push(ticket(1, TicketStatus::Open));
            state.tickets.push(ticket(2, TicketStatus::Closed));
        });
        let ctx = context(
            &backend,
            Some(user(1, "root", Profile::Administrator)),
            ScriptedPrompter::new(&[], &[]),
        );

        let dashboard = load(&ctx).await.unwrap();
        assert_eq!(dashboard.stats.total, 2);
        assert_eq!(dashboard.stats.closed, 1);
        assert_eq!(dashboard.navigation.len(), 4);
    }

    #[test]
    fn technician_cannot_enter_user_management() {
        let mut session = Session::anonymous();
        assert!(matches!(
            enter_view(&session, DashboardView::Tickets),
            Err(AppError::NotAuthenticated)
        ));

        session.establish(user(4, "tec", Profile::Technician));
        assert!(matches!(
            enter_view(&session, DashboardView::Users),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(
            enter_view(&session, DashboardView::Clients).unwrap(),
            DashboardView::Clients
        );
    }
}
