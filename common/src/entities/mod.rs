pub mod letter;
pub mod user;
