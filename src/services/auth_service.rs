use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;

use crate::{
    audit,
    dto::{
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
        staff::validate_identity,
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentUser,
    models::{AccountStatus, Role, User},
    services::identity_service::{self, NewUser},
    state::AppState,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<User> {
    let RegisterRequest {
        user_name,
        email,
        password,
    } = payload;

    let errors = validate_identity(&user_name, &email);
    if !errors.is_empty() {
        return Err(AppError::BadRequest(errors.join(" ")));
    }

    let new_user = NewUser {
        user_name,
        email,
        address: None,
        phone_number: None,
        funds: Decimal::ZERO,
    };
    let user = identity_service::create_user(&state.orm, new_user, &password).await?;
    identity_service::add_to_role(&state.orm, user.id, Role::Customer).await?;

    audit::record(
        &state.pool,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(User::from(user))
}

// Deactivated accounts are rejected like a wrong password.
pub async fn authenticate(state: &AppState, payload: &LoginRequest) -> AppResult<CurrentUser> {
    let user = identity_service::find_by_email(&state.orm, &payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.into()))?;

    if !identity_service::verify_password(&user, &payload.password)? {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }
    if user.status != AccountStatus::Active.as_str() {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let roles = identity_service::roles_of(&state.orm, user.id).await?;

    audit::record(
        &state.pool,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(CurrentUser {
        id: user.id,
        user_name: user.user_name,
        roles,
    })
}

pub fn issue_token(secret: &str, user: &CurrentUser) -> AppResult<LoginResponse> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        name: user.user_name.clone(),
        roles: user.roles.iter().map(|r| r.as_str().to_string()).collect(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(LoginResponse {
        token: format!("Bearer {}", token),
    })
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let user = authenticate(state, &payload).await?;
    issue_token(&state.config.jwt_secret, &user)
}
