use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    audit,
    dto::staff::{
        CustomerProfile, CustomerWithRoles, EditCustomerProfileForm, OrderToDispatch,
        PROFILE_UPDATE_FAILED, ProfileUpdate,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{AccountStatus, Order, User, deleted_user_name, is_customer_listing},
    services::{
        identity_service::{self, UserChanges},
        order_service::{self, DispatchOutcome},
    },
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<Vec<CustomerWithRoles>> {
    ensure_staff(user)?;

    let users = identity_service::users_without_privileged_roles(&state.orm).await?;
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let mut roles = identity_service::roles_for_users(&state.orm, &ids).await?;

    // A role granted between the two queries drops the user here, so the
    // roles shown always agree with the listing.
    Ok(users
        .into_iter()
        .map(|model| {
            let roles = roles.remove(&model.id).unwrap_or_default();
            CustomerWithRoles {
                user: User::from(model),
                roles,
            }
        })
        .filter(|entry| is_customer_listing(&entry.roles))
        .collect())
}

pub async fn orders_to_dispatch(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<Vec<OrderToDispatch>> {
    ensure_staff(user)?;

    let rows = order_service::get_orders_to_dispatch(&state.orm).await?;
    Ok(rows
        .into_iter()
        .map(|(order, owner)| OrderToDispatch {
            order: Order::from(order),
            user_name: owner.map(|u| u.user_name),
        })
        .collect())
}

pub async fn dispatch_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<DispatchOutcome> {
    ensure_staff(user)?;

    let outcome = order_service::dispatch_order(state, order_id).await?;
    match &outcome {
        DispatchOutcome::Dispatched(order) => {
            audit::record(
                &state.pool,
                user.user_id,
                "order_dispatch",
                "orders",
                serde_json::json!({ "order_id": order.id }),
            )
            .await;
        }
        DispatchOutcome::AlreadyDispatched(order) => {
            tracing::debug!(order_id = %order.id, "order already dispatched");
        }
        DispatchOutcome::NotFound => {
            tracing::debug!(%order_id, "dispatch requested for unknown order");
        }
    }
    Ok(outcome)
}

pub async fn customer_profile(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
) -> AppResult<CustomerProfile> {
    ensure_staff(user)?;

    let customer = identity_service::find_by_id(&state.orm, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let roles = identity_service::roles_of(&state.orm, user_id).await?;
    let orders = order_service::get_orders_by_user_id(&state.orm, user_id)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(CustomerProfile {
        user: User::from(customer),
        roles,
        orders,
    })
}

pub async fn edit_form(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
) -> AppResult<EditCustomerProfileForm> {
    ensure_staff(user)?;

    let customer = identity_service::find_by_id(&state.orm, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(EditCustomerProfileForm::from_user(&User::from(customer)))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    form: EditCustomerProfileForm,
) -> AppResult<ProfileUpdate> {
    ensure_staff(user)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(ProfileUpdate::Rejected { form, errors });
    }

    let customer = identity_service::find_by_id(&state.orm, form.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes = UserChanges {
        user_name: Some(form.user_name.clone()),
        email: Some(form.email.clone()),
        status: None,
    };
    let updated = match identity_service::update_user(&state.orm, customer, changes).await {
        Ok(updated) => updated,
        Err(err) => {
            tracing::warn!(user_id = %form.user_id, error = %err, "profile update failed");
            return Ok(ProfileUpdate::Rejected {
                form,
                errors: vec![PROFILE_UPDATE_FAILED.to_string()],
            });
        }
    };

    audit::record(
        &state.pool,
        user.user_id,
        "customer_profile_update",
        "users",
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    Ok(ProfileUpdate::Saved(User::from(updated)))
}

// The row, its credentials and its role memberships stay.
pub async fn delete_account(state: &AppState, user: &AuthUser, user_id: Uuid) -> AppResult<User> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;
    let customer = identity_service::find_by_id(&txn, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes = UserChanges {
        user_name: Some(deleted_user_name(customer.id)),
        email: None,
        status: Some(AccountStatus::Deactivated),
    };
    let updated = identity_service::update_user(&txn, customer, changes).await?;
    let removed_orders = order_service::delete_orders_by_user_id(&txn, user_id).await?;
    txn.commit().await?;

    tracing::info!(%user_id, removed_orders, "customer account deactivated");
    audit::record(
        &state.pool,
        user.user_id,
        "customer_account_delete",
        "users",
        serde_json::json!({ "user_id": user_id, "removed_orders": removed_orders }),
    )
    .await;

    Ok(User::from(updated))
}
