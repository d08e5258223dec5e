pub mod account;
pub mod check_in;
pub mod dashboard;
pub mod login;
pub mod resources;
