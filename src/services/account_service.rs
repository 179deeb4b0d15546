use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, Role, User},
    services::{identity_service, order_service},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct OwnProfile {
    pub user: User,
    pub orders: Vec<Order>,
    pub is_staff: bool,
}

pub async fn own_profile(state: &AppState, user: &AuthUser) -> AppResult<OwnProfile> {
    let model = identity_service::find_by_id(&state.orm, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let orders = order_service::get_orders_by_user_id(&state.orm, user.user_id)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    // Roles are read fresh rather than trusted from the session.
    let roles = identity_service::roles_of(&state.orm, user.user_id).await?;

    Ok(OwnProfile {
        user: User::from(model),
        orders,
        is_staff: roles.contains(&Role::Staff),
    })
}
