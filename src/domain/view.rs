use crate::domain::user::Profile;

/// Sections reachable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Tickets,
    Users,
    Clients,
    ServiceTypes,
}

impl DashboardView {
    pub const ALL: [DashboardView; 4] = [
        DashboardView::Tickets,
        DashboardView::Users,
        DashboardView::Clients,
        DashboardView::ServiceTypes,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DashboardView::Tickets => "My tickets",
            DashboardView::Users => "User management",
            DashboardView::Clients => "Client management",
            DashboardView::ServiceTypes => "Service type management",
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            DashboardView::Tickets => "tickets",
            DashboardView::Users => "users",
            DashboardView::Clients => "clients",
            DashboardView::ServiceTypes => "service-types",
        }
    }
}

/// The view a profile actually lands on when asking for `requested`.
/// Anything the profile may not open falls back to the ticket list.
pub fn allowed_view(profile: Profile, requested: DashboardView) -> DashboardView {
    let permitted = match requested {
        DashboardView::Tickets => true,
        DashboardView::Users | DashboardView::ServiceTypes => {
            profile == Profile::Administrator
        }
        DashboardView::Clients => profile.is_staff(),
    };
    if permitted {
        requested
    } else {
        DashboardView::Tickets
    }
}

/// Views offered in the dashboard navigation for `profile`.
pub fn navigation(profile: Profile) -> Vec<DashboardView> {
    DashboardView::ALL
        .into_iter()
        .filter(|view| allowed_view(profile, *view) == *view)
        .collect()
}
