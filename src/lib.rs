// Public library interface for quant-back-end
pub mod action_router;
pub mod api;
pub mod auth;
pub mod cli_helper;
pub mod cli_utils;
pub mod forex;
pub mod schema;
pub mod settings;
pub mod users;
pub mod utils;
