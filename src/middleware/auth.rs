use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::AppError,
    models::Role,
    state::AppState,
};

pub const LOGIN_PATH: &str = "/account/login";

mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub user_name: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<CurrentUser> for AuthUser {
    fn from(user: CurrentUser) -> Self {
        Self {
            user_id: user.id,
            user_name: user.user_name,
            roles: user.roles,
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if !user.has_role(role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Staff)
}

pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    // New id on login so a pre-login cookie cannot be reused.
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

pub fn decode_token(secret: &str, token: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;
    let roles = decoded
        .claims
        .roles
        .iter()
        .filter_map(|r| r.parse::<Role>().ok())
        .collect();

    Ok(AuthUser {
        user_id,
        user_name: decoded.claims.name,
        roles,
    })
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

pub enum AuthRejection {
    RedirectToLogin,
    Api(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Api(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            if let Some(user) = current_user(session).await {
                return Ok(user.into());
            }
        }

        // Nested routers see a stripped uri; the original one keeps `/api`.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.path())
            .unwrap_or_else(|| parts.uri.path());
        let is_api = is_api_path(path);
        let auth_header = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => value,
            None if is_api => return Err(AuthRejection::Api(AppError::Unauthorized)),
            None => return Err(AuthRejection::RedirectToLogin),
        };

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthRejection::Api(AppError::BadRequest("Invalid Authorization header".into())))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthRejection::Api(AppError::BadRequest("Invalid Authorization scheme".into())))?
            .trim();

        decode_token(&state.config.jwt_secret, token).map_err(AuthRejection::Api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth_service::issue_token;

    fn staff() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            user_name: "staff@example.com".into(),
            roles: vec![Role::Staff],
        }
    }

    #[test]
    fn staff_role_is_required_for_the_dashboard() {
        assert!(ensure_staff(&staff()).is_ok());

        let admin = AuthUser {
            roles: vec![Role::Admin],
            ..staff()
        };
        assert!(matches!(ensure_staff(&admin), Err(AppError::Forbidden)));

        let customer = AuthUser {
            roles: vec![Role::Customer],
            ..staff()
        };
        assert!(matches!(ensure_staff(&customer), Err(AppError::Forbidden)));
    }

    #[test]
    fn api_paths_are_told_apart_from_pages() {
        assert!(is_api_path("/api/staff/orders"));
        assert!(is_api_path("/api"));
        assert!(!is_api_path("/staff/orders"));
        assert!(!is_api_path("/apiary"));
    }

    #[test]
    fn issued_tokens_carry_identity_and_roles() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            user_name: "staff@example.com".into(),
            roles: vec![Role::Staff, Role::Customer],
        };
        let issued = issue_token("test-secret", &user).expect("token");
        let token = issued.token.strip_prefix("Bearer ").expect("bearer prefix");

        let decoded = decode_token("test-secret", token).expect("decodes");
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.roles, user.roles);

        assert!(matches!(
            decode_token("other-secret", token),
            Err(AppError::Unauthorized)
        ));
    }
}
