use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::roles::Role;
use crate::schema::users as UsersTable;
use crate::users::config::UsersConfig;
use crate::users::db_types::{CreateUserRecord, UserChangeset, UserPage, UserRecord, UserStatus, UserView};
use crate::users::error::UserError;
use crate::users::processor_enums::{CreateUserInputArgs, GetUserInputArgs};
use crate::utils::db::DbConn;

pub fn create_user(
    conn: &mut DbConn,
    config: &UsersConfig,
    args: CreateUserInputArgs,
) -> Result<UserRecord> {
    use crate::schema::users::dsl::*;

    let name = args.username.trim().to_string();
    config.check_username(&name)?;
    config.check_password(&args.password)?;

    let taken = UsersTable::table
        .filter(username.eq(&name))
        .count()
        .get_result::<i64>(conn)?;
    if taken > 0 {
        return Err(UserError::UsernameTaken.into());
    }

    let record = CreateUserRecord {
        nickname: args.nickname.filter(|n| !n.is_empty()).or_else(|| Some(name.clone())),
        username: name,
        password_hash: hash_password(&args.password),
        email: args.email.filter(|e| !e.is_empty()),
        status: UserStatus::Active,
        role: args.role.unwrap_or(Role::User),
    };

    let res = diesel::insert_into(UsersTable::table)
        .values(&record)
        .get_result::<UserRecord>(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                anyhow::Error::from(UserError::UsernameTaken)
            }
            other => other.into(),
        })?;

    tracing::info!("Created user {} ({})", res.username, res.id);

    Ok(res)
}

pub fn get_user(conn: &mut DbConn, args: &GetUserInputArgs) -> Result<Option<UserRecord>> {
    use crate::schema::users::dsl::*;

    let res = match args {
        GetUserInputArgs::ById(user_id) => UsersTable::table
            .filter(id.eq(*user_id))
            .first::<UserRecord>(conn)
            .optional()?,
        GetUserInputArgs::ByUsername(name) => UsersTable::table
            .filter(username.eq(name))
            .first::<UserRecord>(conn)
            .optional()?,
    };

    Ok(res)
}

/// Page numbers start at 1, newest accounts first.
pub fn list_users(conn: &mut DbConn, page: i64, page_size: i64) -> Result<UserPage> {
    use crate::schema::users::dsl::*;

    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);

    let total = UsersTable::table.count().get_result::<i64>(conn)?;
    let items = UsersTable::table
        .order(created_at.desc())
        .limit(page_size)
        .offset((page - 1) * page_size)
        .load::<UserRecord>(conn)?
        .into_iter()
        .map(UserView::from)
        .collect();

    Ok(UserPage::new(items, total, page, page_size))
}

pub fn update_user(conn: &mut DbConn, user_id: Uuid, changes: &UserChangeset) -> Result<UserRecord> {
    use crate::schema::users::dsl::*;

    if changes.is_empty() {
        return Err(UserError::NothingToUpdate.into());
    }

    let res = diesel::update(UsersTable::table.filter(id.eq(user_id)))
        .set((changes, updated_at.eq(Utc::now().naive_utc())))
        .get_result::<UserRecord>(conn)
        .optional()?;

    res.ok_or_else(|| UserError::NotFound.into())
}

fn set_password_hash(conn: &mut DbConn, user_id: Uuid, new_hash: String) -> Result<()> {
    use crate::schema::users::dsl::*;

    let updated = diesel::update(UsersTable::table.filter(id.eq(user_id)))
        .set((password_hash.eq(new_hash), updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;

    if updated == 0 {
        return Err(UserError::NotFound.into());
    }
    Ok(())
}

pub fn change_password(
    conn: &mut DbConn,
    config: &UsersConfig,
    user_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    config.check_password(new_password)?;

    let user = get_user(conn, &GetUserInputArgs::ById(user_id))?.ok_or(UserError::NotFound)?;
    if !verify_password(old_password, &user.password_hash) {
        return Err(UserError::WrongPassword.into());
    }

    set_password_hash(conn, user_id, hash_password(new_password))
}

pub fn reset_password(
    conn: &mut DbConn,
    config: &UsersConfig,
    user_id: Uuid,
    new_password: &str,
) -> Result<()> {
    config.check_password(new_password)?;
    set_password_hash(conn, user_id, hash_password(new_password))?;
    tracing::info!("Password reset for user {}", user_id);
    Ok(())
}

pub fn delete_user(conn: &mut DbConn, user_id: Uuid, requested_by: Option<Uuid>) -> Result<()> {
    use crate::schema::users::dsl::*;

    if requested_by == Some(user_id) {
        return Err(UserError::SelfDeletion.into());
    }

    let removed = diesel::delete(UsersTable::table.filter(id.eq(user_id))).execute(conn)?;
    if removed == 0 {
        return Err(UserError::NotFound.into());
    }

    tracing::info!("Deleted user {}", user_id);
    Ok(())
}

pub fn count_users(conn: &mut DbConn) -> Result<i64> {
    Ok(UsersTable::table.count().get_result::<i64>(conn)?)
}

pub fn record_login(conn: &mut DbConn, user_id: Uuid) -> Result<()> {
    use crate::schema::users::dsl::*;

    diesel::update(UsersTable::table.filter(id.eq(user_id)))
        .set(last_login_at.eq(Some(Utc::now().naive_utc())))
        .execute(conn)?;
    Ok(())
}

/// Seeds an admin account when the table is empty.
pub fn ensure_admin(conn: &mut DbConn, admin_user: &str, admin_password: &str) -> Result<bool> {
    if count_users(conn)? > 0 {
        return Ok(false);
    }

    tracing::info!("No users found, creating admin account {}", admin_user);

    let record = CreateUserRecord {
        username: admin_user.to_string(),
        password_hash: hash_password(admin_password),
        email: None,
        nickname: Some(admin_user.to_string()),
        status: UserStatus::Active,
        role: Role::Admin,
    };

    diesel::insert_into(UsersTable::table)
        .values(&record)
        .execute(conn)?;

    Ok(true)
}
