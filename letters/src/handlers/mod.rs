pub mod auth;
pub mod dashboard;
pub mod letter;
pub mod user;
