pub mod admin;
pub mod prompt;
pub mod session;
pub mod tickets;

use secrecy::SecretString;

pub use admin::AdminService;
pub use prompt::{Decision, Prompter};
pub use session::SessionService;
pub use tickets::TicketService;

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}
