pub mod auth;
pub mod forex;
pub mod health;
pub mod settings;
pub mod users;
