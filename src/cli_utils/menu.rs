use dialoguer::Select;

use crate::cli_utils::CliResult;

/// Interactive menu builder
pub struct Menu {
    title: String,
    items: Vec<String>,
}

impl Menu {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    pub fn items(mut self, items: &[&str]) -> Self {
        self.items.extend(items.iter().map(|s| s.to_string()));
        self
    }

    /// Show the menu and get the selected index
    pub fn interact(&self) -> CliResult<usize> {
        Ok(Select::new()
            .with_prompt(&self.title)
            .items(&self.items)
            .default(0)
            .interact()?)
    }
}

/// Top-level actions of the users CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    List,
    View,
    Create,
    Update,
    ResetPassword,
    Delete,
    Quit,
}

impl UserOperation {
    pub const ALL: [UserOperation; 7] = [
        UserOperation::List,
        UserOperation::View,
        UserOperation::Create,
        UserOperation::Update,
        UserOperation::ResetPassword,
        UserOperation::Delete,
        UserOperation::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UserOperation::List => "List users",
            UserOperation::View => "View user",
            UserOperation::Create => "Create user",
            UserOperation::Update => "Update user",
            UserOperation::ResetPassword => "Reset password",
            UserOperation::Delete => "Delete user",
            UserOperation::Quit => "Quit",
        }
    }

    pub fn select() -> CliResult<Self> {
        let labels: Vec<&str> = Self::ALL.iter().map(|op| op.label()).collect();
        let idx = Menu::new("Select operation").items(&labels).interact()?;
        Ok(Self::ALL.get(idx).copied().unwrap_or(UserOperation::Quit))
    }
}
