use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::{PageResult, format_date, format_money};
use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    middleware::auth::{AuthUser, clear_current_user, set_current_user},
    models::{Order, Role},
    services::{account_service, auth_service},
    state::AppState,
};

#[derive(Template, WebTemplate)]
#[template(path = "account/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "account/register.html")]
pub struct RegisterTemplate {
    pub user_name: String,
    pub email: String,
    pub error: Option<String>,
}

pub struct OrderHistoryRow {
    pub id: String,
    pub total: String,
    pub placed_at: String,
    pub dispatch: String,
}

impl From<Order> for OrderHistoryRow {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            total: format_money(&order.total_amount),
            placed_at: format_date(&order.created_at),
            dispatch: match order.dispatched_date {
                Some(at) if order.is_dispatched => format!("Dispatched {}", format_date(&at)),
                _ => "Awaiting dispatch".to_string(),
            },
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub funds: String,
    pub is_staff: bool,
    pub orders: Vec<OrderHistoryRow>,
}

pub async fn login_form() -> LoginTemplate {
    LoginTemplate {
        email: String::new(),
        error: None,
    }
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginRequest>,
) -> PageResult<Response> {
    let user = match auth_service::authenticate(&state, &form).await {
        Ok(user) => user,
        Err(AppError::BadRequest(message)) => {
            return Ok(LoginTemplate {
                email: form.email,
                error: Some(message),
            }
            .into_response());
        }
        Err(err) => return Err(err.into()),
    };

    set_current_user(&session, &user).await?;
    tracing::info!(user_id = %user.id, "signed in");

    let target = if user.roles.contains(&Role::Staff) {
        "/staff"
    } else {
        "/account/profile"
    };
    Ok(Redirect::to(target).into_response())
}

pub async fn register_form() -> RegisterTemplate {
    RegisterTemplate {
        user_name: String::new(),
        email: String::new(),
        error: None,
    }
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterRequest>,
) -> PageResult<Response> {
    match auth_service::register_user(&state, form.clone()).await {
        Ok(_) => Ok(Redirect::to("/account/login").into_response()),
        Err(AppError::BadRequest(message)) => Ok(RegisterTemplate {
            user_name: form.user_name,
            email: form.email,
            error: Some(message),
        }
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(session: Session) -> PageResult<Redirect> {
    clear_current_user(&session).await?;
    Ok(Redirect::to("/"))
}

pub async fn profile(State(state): State<AppState>, user: AuthUser) -> PageResult<ProfileTemplate> {
    let profile = account_service::own_profile(&state, &user).await?;
    let account = profile.user;
    Ok(ProfileTemplate {
        id: account.id.to_string(),
        user_name: account.user_name,
        email: account.email,
        address: account.address.unwrap_or_default(),
        phone_number: account.phone_number.unwrap_or_default(),
        funds: format_money(&account.funds),
        is_staff: profile.is_staff,
        orders: profile.orders.into_iter().map(OrderHistoryRow::from).collect(),
    })
}
