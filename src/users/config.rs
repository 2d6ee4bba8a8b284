use crate::users::error::UserError;

#[derive(Clone, Debug)]
pub struct UsersConfig {
    pub min_username_length: usize,
    pub max_username_length: usize,
    pub min_password_length: usize,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            min_username_length: 3,
            max_username_length: 50,
            min_password_length: 6,
        }
    }
}

impl UsersConfig {
    pub fn check_username(&self, username: &str) -> Result<(), UserError> {
        let len = username.chars().count();
        if len < self.min_username_length || len > self.max_username_length {
            return Err(UserError::InvalidInput(format!(
                "Username must be {}-{} characters",
                self.min_username_length, self.max_username_length
            )));
        }
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> Result<(), UserError> {
        if password.chars().count() < self.min_password_length {
            return Err(UserError::InvalidInput(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        Ok(())
    }
}
