use dialoguer::{Input as DialoguerInput, Password, Select};

use crate::auth::roles::Role;
use crate::cli_utils::CliResult;

/// Prompt helpers over dialoguer
pub struct Input;

impl Input {
    pub fn get_string(prompt: &str) -> CliResult<String> {
        Ok(DialoguerInput::new().with_prompt(prompt).interact_text()?)
    }

    /// Empty input maps to `None`
    pub fn get_optional_string(prompt: &str) -> CliResult<Option<String>> {
        let input: String = DialoguerInput::new()
            .with_prompt(format!("{} (optional)", prompt))
            .allow_empty(true)
            .interact_text()?;

        Ok(if input.is_empty() { None } else { Some(input) })
    }

    pub fn get_i64(prompt: &str, default: i64) -> CliResult<i64> {
        Ok(DialoguerInput::new()
            .with_prompt(prompt)
            .default(default)
            .interact_text()?)
    }

    /// Hidden entry, asked twice
    pub fn get_password(prompt: &str) -> CliResult<String> {
        Ok(Password::new()
            .with_prompt(prompt)
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?)
    }

    pub fn select_role(prompt: &str, default: Role) -> CliResult<Role> {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.name()).collect();
        let start = Role::ALL.iter().position(|r| *r == default).unwrap_or(0);
        let idx = Select::new()
            .with_prompt(prompt)
            .items(&names)
            .default(start)
            .interact()?;
        Ok(Role::ALL[idx])
    }

    pub fn select_from_list(prompt: &str, items: Vec<&str>) -> CliResult<usize> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()?)
    }
}
