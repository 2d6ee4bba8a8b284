use anyhow::{Result, anyhow};
use colored::Colorize;
use std::io::Write;

use quant_back_end::action_router::{ActionRouterInput, ActionRouterOutput};
use quant_back_end::cli_helper::{call_action_router, initialize_app_config};
use quant_back_end::cli_utils::formatting::{format_datetime, format_role, format_status, print_header};
use quant_back_end::cli_utils::menu::UserOperation;
use quant_back_end::cli_utils::{Input, confirm, format_record, format_table, print_error, print_info, print_success};
use quant_back_end::auth::roles::Role;
use quant_back_end::users::db_types::{UserChangeset, UserRecord, UserStatus, UserView};
use quant_back_end::users::processor_enums::*;
use quant_back_end::utils::app_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    eprintln!("{}", "╔═══════════════════════════════════════════════╗".bright_cyan());
    eprintln!("{}", "║         Quant Users Management CLI            ║".bright_cyan());
    eprintln!("{}", "╚═══════════════════════════════════════════════╝".bright_cyan());
    eprintln!();

    eprint!("Initializing app config... ");
    std::io::stderr().flush().ok();

    let app_config = match initialize_app_config() {
        Ok(config) => {
            eprintln!("{}", "✓ Ready".green());
            config
        }
        Err(e) => {
            eprintln!("{}", "✗ Failed".red());
            eprintln!("Error: {}", e);
            return Err(e);
        }
    };

    if app_config.pool.is_none() {
        return Err(anyhow!("DATABASE_URL must be set to manage users"));
    }

    eprintln!();

    loop {
        let op = match UserOperation::select() {
            Ok(op) => op,
            Err(e) => {
                print_error(&e.to_string());
                break;
            }
        };

        let res = match op {
            UserOperation::List => list_users(&app_config).await,
            UserOperation::View => view_user(&app_config).await,
            UserOperation::Create => create_user(&app_config).await,
            UserOperation::Update => update_user(&app_config).await,
            UserOperation::ResetPassword => reset_password(&app_config).await,
            UserOperation::Delete => delete_user(&app_config).await,
            UserOperation::Quit => {
                eprintln!("{}", "Goodbye!".bright_cyan());
                break;
            }
        };

        if let Err(e) = res {
            print_error(&e.to_string());
        }
        eprintln!();
    }

    Ok(())
}

async fn run(app_config: &AppConfig, input: UsersProcessorInput) -> Result<UsersProcessorOutput> {
    match call_action_router(ActionRouterInput::Users(input), app_config.clone()).await? {
        ActionRouterOutput::Users(output) => Ok(output),
        _ => Err(anyhow!("Unexpected response type")),
    }
}

fn show_user(user: UserView) {
    format_record(vec![
        ("ID", user.id.to_string()),
        ("Username", user.username),
        ("Nickname", user.nickname.unwrap_or_default()),
        ("Email", user.email.unwrap_or_default()),
        ("Role", format_role(user.role)),
        ("Status", format_status(user.status)),
        (
            "Last login",
            user.last_login_at
                .as_ref()
                .map(format_datetime)
                .unwrap_or_else(|| "never".to_string()),
        ),
        ("Created", format_datetime(&user.created_at)),
    ]);
}

async fn pick_user(app_config: &AppConfig) -> Result<UserRecord> {
    let username = Input::get_string("Username")?;
    match run(app_config, UsersProcessorInput::GetUser(GetUserInputArgs::ByUsername(username))).await? {
        UsersProcessorOutput::GetUser(user) => Ok(user),
        _ => Err(anyhow!("Unexpected response type")),
    }
}

async fn list_users(app_config: &AppConfig) -> Result<()> {
    print_header("Users");

    let page = Input::get_i64("Page", 1)?;
    let input = UsersProcessorInput::ListUsers(ListUsersInputArgs { page, page_size: 20 });

    let UsersProcessorOutput::ListUsers(users) = run(app_config, input).await? else {
        return Err(anyhow!("Unexpected response type"));
    };

    let rows = users
        .items
        .iter()
        .map(|u| {
            vec![
                u.username.clone(),
                u.nickname.clone().unwrap_or_default(),
                u.role.as_str().to_string(),
                format!("{:?}", u.status).to_lowercase(),
                format_datetime(&u.created_at),
            ]
        })
        .collect();

    format_table(vec!["username", "nickname", "role", "status", "created"], rows);
    print_info(&format!(
        "Page {} of {} ({} users)",
        users.page,
        users.total_pages.max(1),
        users.total
    ));

    Ok(())
}

async fn view_user(app_config: &AppConfig) -> Result<()> {
    print_header("View User");
    let user = pick_user(app_config).await?;
    show_user(user.into());
    Ok(())
}

async fn create_user(app_config: &AppConfig) -> Result<()> {
    print_header("Create User");

    let username = Input::get_string("Username")?;
    let password = Input::get_password("Password")?;
    let nickname = Input::get_optional_string("Nickname")?;
    let email = Input::get_optional_string("Email")?;
    let role = Input::select_role("Role", Role::User)?;

    let input = UsersProcessorInput::CreateUser(CreateUserInputArgs {
        username,
        password,
        email,
        nickname,
        role: Some(role),
    });

    if let UsersProcessorOutput::CreateUser(user) = run(app_config, input).await? {
        print_success(&format!("Created {} ({})", user.username, user.id));
    }
    Ok(())
}

async fn update_user(app_config: &AppConfig) -> Result<()> {
    print_header("Update User");
    let user = pick_user(app_config).await?;

    let fields = ["Role", "Status", "Nickname", "Email"];
    let changes = match Input::select_from_list("Field", fields.to_vec())? {
        0 => UserChangeset {
            role: Some(Input::select_role("Role", user.role)?),
            ..Default::default()
        },
        1 => {
            let status = match Input::select_from_list("Status", vec!["active", "disabled"])? {
                0 => UserStatus::Active,
                _ => UserStatus::Disabled,
            };
            UserChangeset {
                status: Some(status),
                ..Default::default()
            }
        }
        2 => UserChangeset {
            nickname: Some(Input::get_string("Nickname")?),
            ..Default::default()
        },
        _ => UserChangeset {
            email: Some(Input::get_string("Email")?),
            ..Default::default()
        },
    };

    let input = UsersProcessorInput::UpdateUser(UpdateUserInputArgs {
        id: user.id,
        changes,
    });

    if let UsersProcessorOutput::UpdateUser(updated) = run(app_config, input).await? {
        print_success("User updated");
        show_user(updated.into());
    }
    Ok(())
}

async fn reset_password(app_config: &AppConfig) -> Result<()> {
    print_header("Reset Password");
    let user = pick_user(app_config).await?;
    let new_password = Input::get_password("New password")?;

    run(
        app_config,
        UsersProcessorInput::ResetPassword(ResetPasswordInputArgs {
            id: user.id,
            new_password,
        }),
    )
    .await?;

    print_success(&format!("Password reset for {}", user.username));
    Ok(())
}

async fn delete_user(app_config: &AppConfig) -> Result<()> {
    print_header("Delete User");
    let user = pick_user(app_config).await?;

    if !confirm(&format!("Delete {}? This cannot be undone", user.username))? {
        print_info("Cancelled");
        return Ok(());
    }

    run(
        app_config,
        UsersProcessorInput::DeleteUser(DeleteUserInputArgs {
            id: user.id,
            requested_by: None,
        }),
    )
    .await?;

    print_success(&format!("Deleted {}", user.username));
    Ok(())
}
