use std::collections::HashMap;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
    sea_query::{Expr, OnConflict, Query},
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    entity::{
        roles::{ActiveModel as RoleActive, Column as RoleCol, Entity as Roles},
        user_roles::{self, ActiveModel as UserRoleActive, Column as UserRoleCol, Entity as UserRoles},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::{AccountStatus, Role},
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub funds: Decimal,
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<UserModel>> {
    Ok(Users::find_by_id(id).one(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(email.trim()))
        .one(conn)
        .await?)
}

pub async fn find_by_user_name<C: ConnectionTrait>(
    conn: &C,
    user_name: &str,
) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::UserName.eq(user_name.trim()))
        .one(conn)
        .await?)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(user: &UserModel, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn create_user<C: ConnectionTrait>(
    conn: &C,
    new_user: NewUser,
    password: &str,
) -> AppResult<UserModel> {
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }
    if find_by_email(conn, &new_user.email).await?.is_some() {
        return Err(AppError::BadRequest("Email is already taken".into()));
    }
    if find_by_user_name(conn, &new_user.user_name).await?.is_some() {
        return Err(AppError::BadRequest("User name is already taken".into()));
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(new_user.user_name.trim().to_string()),
        email: Set(new_user.email.trim().to_string()),
        password_hash: Set(password_hash),
        address: Set(new_user.address),
        phone_number: Set(new_user.phone_number),
        funds: Set(new_user.funds),
        status: Set(AccountStatus::Active.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;

    tracing::info!(user_id = %user.id, user_name = %user.user_name, "user created");
    Ok(user)
}

/// Field changes applied by [`update_user`]; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<AccountStatus>,
}

pub async fn update_user<C: ConnectionTrait>(
    conn: &C,
    user: UserModel,
    changes: UserChanges,
) -> AppResult<UserModel> {
    let mut active: UserActive = user.into();
    if let Some(user_name) = changes.user_name {
        active.user_name = Set(user_name.trim().to_string());
    }
    if let Some(email) = changes.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(status) = changes.status {
        active.status = Set(status.as_str().to_string());
    }
    let updated = active.update(conn).await?;
    tracing::debug!(user_id = %updated.id, "user updated");
    Ok(updated)
}

pub async fn role_exists<C: ConnectionTrait>(conn: &C, role: Role) -> AppResult<bool> {
    Ok(Roles::find()
        .filter(RoleCol::Name.eq(role.as_str()))
        .one(conn)
        .await?
        .is_some())
}

pub async fn create_role<C: ConnectionTrait>(conn: &C, role: Role) -> AppResult<Uuid> {
    let created = RoleActive {
        id: Set(Uuid::new_v4()),
        name: Set(role.as_str().to_string()),
    }
    .insert(conn)
    .await?;
    tracing::info!(role = %role, "role created");
    Ok(created.id)
}

pub async fn ensure_role<C: ConnectionTrait>(conn: &C, role: Role) -> AppResult<(Uuid, bool)> {
    let existing = Roles::find()
        .filter(RoleCol::Name.eq(role.as_str()))
        .one(conn)
        .await?;
    match existing {
        Some(r) => Ok((r.id, false)),
        None => Ok((create_role(conn, role).await?, true)),
    }
}

pub async fn add_to_role<C: ConnectionTrait>(conn: &C, user_id: Uuid, role: Role) -> AppResult<()> {
    let (role_id, _) = ensure_role(conn, role).await?;
    let membership = UserRoleActive {
        user_id: Set(user_id),
        role_id: Set(role_id),
    };
    UserRoles::insert(membership)
        .on_conflict(
            OnConflict::columns([UserRoleCol::UserId, UserRoleCol::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn roles_of<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<Vec<Role>> {
    let mut grouped = roles_for_users(conn, &[user_id]).await?;
    Ok(grouped.remove(&user_id).unwrap_or_default())
}

pub async fn roles_for_users<C: ConnectionTrait>(
    conn: &C,
    user_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<Role>>> {
    let mut grouped: HashMap<Uuid, Vec<Role>> = HashMap::new();
    if user_ids.is_empty() {
        return Ok(grouped);
    }

    let rows: Vec<(Uuid, String)> = UserRoles::find()
        .select_only()
        .column(UserRoleCol::UserId)
        .column(RoleCol::Name)
        .join(JoinType::InnerJoin, user_roles::Relation::Roles.def())
        .filter(UserRoleCol::UserId.is_in(user_ids.iter().copied()))
        .order_by_asc(RoleCol::Name)
        .into_tuple()
        .all(conn)
        .await?;

    for (user_id, name) in rows {
        match name.parse::<Role>() {
            Ok(role) => grouped.entry(user_id).or_default().push(role),
            Err(err) => tracing::warn!(%user_id, error = %err, "skipping unknown role"),
        }
    }
    Ok(grouped)
}

pub async fn users_without_privileged_roles<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<UserModel>> {
    let privileged: Vec<&str> = Role::ALL
        .iter()
        .filter(|role| role.is_privileged())
        .map(Role::as_str)
        .collect();

    let privileged_ids = Query::select()
        .column((UserRoles, UserRoleCol::UserId))
        .from(UserRoles)
        .inner_join(
            Roles,
            Expr::col((Roles, RoleCol::Id))
                .equals((UserRoles, UserRoleCol::RoleId)),
        )
        .and_where(Expr::col((Roles, RoleCol::Name)).is_in(privileged))
        .to_owned();

    Ok(Users::find()
        .filter(UserCol::Id.not_in_subquery(privileged_ids))
        .order_by_asc(UserCol::UserName)
        .all(conn)
        .await?)
}
