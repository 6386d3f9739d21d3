pub mod attachment;
pub mod auth;
pub mod dashboard;
pub mod form;
pub mod letter;
pub mod user;
