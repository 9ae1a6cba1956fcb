pub mod admin;
pub mod detail;
pub mod response;
pub mod session;
pub mod ticket;
pub mod user;
pub mod view;
