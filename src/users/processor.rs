use anyhow::anyhow;

use super::processor_enums::*;
use crate::users::config::UsersConfig;
use crate::users::error::UserError;
use crate::users::operations;
use crate::utils::app_config::AppConfig;
use crate::utils::db::DbConn;
use crate::utils::traits::ActionProcessor;

impl ActionProcessor<UsersConfig, UsersProcessorOutput> for UsersProcessorInput {
    async fn process(
        &self,
        _app_config: &mut AppConfig,
        local_config: &mut UsersConfig,
        conn: Option<&mut DbConn>,
    ) -> anyhow::Result<UsersProcessorOutput> {
        let Some(action_conn) = conn else {
            return Err(anyhow!("Connection not provided"));
        };

        match self {
            UsersProcessorInput::CreateUser(args) => {
                let res = operations::create_user(action_conn, local_config, args.clone())?;
                Ok(UsersProcessorOutput::CreateUser(res))
            }
            UsersProcessorInput::GetUser(args) => {
                let res = operations::get_user(action_conn, args)?.ok_or(UserError::NotFound)?;
                Ok(UsersProcessorOutput::GetUser(res))
            }
            UsersProcessorInput::ListUsers(args) => {
                let res = operations::list_users(action_conn, args.page, args.page_size)?;
                Ok(UsersProcessorOutput::ListUsers(res))
            }
            UsersProcessorInput::UpdateUser(args) => {
                let res = operations::update_user(action_conn, args.id, &args.changes)?;
                Ok(UsersProcessorOutput::UpdateUser(res))
            }
            UsersProcessorInput::ChangePassword(args) => {
                operations::change_password(
                    action_conn,
                    local_config,
                    args.id,
                    &args.old_password,
                    &args.new_password,
                )?;
                Ok(UsersProcessorOutput::ChangePassword)
            }
            UsersProcessorInput::ResetPassword(args) => {
                operations::reset_password(action_conn, local_config, args.id, &args.new_password)?;
                Ok(UsersProcessorOutput::ResetPassword)
            }
            UsersProcessorInput::DeleteUser(args) => {
                operations::delete_user(action_conn, args.id, args.requested_by)?;
                Ok(UsersProcessorOutput::DeleteUser)
            }
            UsersProcessorInput::CountUsers => {
                let res = operations::count_users(action_conn)?;
                Ok(UsersProcessorOutput::CountUsers(res))
            }
            UsersProcessorInput::EnsureAdmin(args) => {
                let res = operations::ensure_admin(action_conn, &args.username, &args.password)?;
                Ok(UsersProcessorOutput::EnsureAdmin(res))
            }
        }
    }
}
