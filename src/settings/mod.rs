pub mod env_file;
pub mod processor;
pub mod processor_enums;
pub mod schema;
pub mod store;
