use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("User not found")]
    NotFound,
    #[error("Old password incorrect")]
    WrongPassword,
    #[error("No valid fields to update")]
    NothingToUpdate,
    #[error("Cannot delete yourself")]
    SelfDeletion,
}
