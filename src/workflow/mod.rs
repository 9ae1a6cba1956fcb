pub mod admin;
pub mod dashboard;
pub mod session;
pub mod ticket;
