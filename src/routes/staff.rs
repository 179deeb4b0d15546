use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::staff::{
        CustomerProfile, CustomerWithRoles, EditCustomerProfileForm, OrderToDispatch,
        ProfileUpdate, UpdateCustomerRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, User},
    response::{ApiResponse, Meta},
    services::{order_service::DispatchOutcome, staff_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/orders", get(list_orders_to_dispatch))
        .route("/orders/{id}/dispatch", post(dispatch_order))
}

#[utoipa::path(
    get,
    path = "/api/staff/customers",
    responses(
        (status = 200, description = "Users holding neither Admin nor Staff", body = ApiResponse<Vec<CustomerWithRoles>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<CustomerWithRoles>>>> {
    let customers = staff_service::list_customers(&state, &user).await?;
    Ok(Json(ApiResponse::listing("Customers", customers)))
}

#[utoipa::path(
    get,
    path = "/api/staff/orders",
    responses(
        (status = 200, description = "Orders waiting for dispatch, oldest first", body = ApiResponse<Vec<OrderToDispatch>>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_orders_to_dispatch(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<OrderToDispatch>>>> {
    let orders = staff_service::orders_to_dispatch(&state, &user).await?;
    Ok(Json(ApiResponse::listing("Orders to dispatch", orders)))
}

#[utoipa::path(
    post,
    path = "/api/staff/orders/{id}/dispatch",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order dispatched, or already dispatched", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn dispatch_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let (message, order) = match staff_service::dispatch_order(&state, &user, id).await? {
        DispatchOutcome::Dispatched(order) => ("Order dispatched", order),
        DispatchOutcome::AlreadyDispatched(order) => ("Order already dispatched", order),
        DispatchOutcome::NotFound => return Err(AppError::NotFound),
    };
    Ok(Json(ApiResponse::success(
        message,
        Order::from(order),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/staff/customers/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Customer profile with orders", body = ApiResponse<CustomerProfile>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CustomerProfile>>> {
    let profile = staff_service::customer_profile(&state, &user, id).await?;
    Ok(Json(ApiResponse::success(
        "Customer profile",
        profile,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/staff/customers/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 400, description = "Invalid profile or update failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let form = EditCustomerProfileForm {
        user_id: id,
        user_name: payload.user_name,
        email: payload.email,
    };
    match staff_service::update_profile(&state, &user, form).await? {
        ProfileUpdate::Saved(updated) => Ok(Json(ApiResponse::success(
            "Profile updated",
            updated,
            Some(Meta::empty()),
        ))),
        ProfileUpdate::Rejected { errors, .. } => Err(AppError::BadRequest(errors.join(" "))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/staff/customers/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deactivated and its orders removed", body = ApiResponse<User>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let deactivated = staff_service::delete_account(&state, &user, id).await?;
    Ok(Json(ApiResponse::success(
        "Account deleted",
        deactivated,
        Some(Meta::empty()),
    )))
}
