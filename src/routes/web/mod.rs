use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{error::AppError, middleware::auth::LOGIN_PATH, state::AppState};

pub mod account;
pub mod catalog;
pub mod staff;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/account/login", get(account::login_form).post(account::login))
        .route(
            "/account/register",
            get(account::register_form).post(account::register),
        )
        .route("/account/logout", post(account::logout))
        .route("/account/profile", get(account::profile))
        .route("/staff", get(staff::index))
        .route("/staff/orders", get(staff::orders_to_dispatch))
        .route("/staff/orders/{order_id}/dispatch", post(staff::dispatch_order))
        .route("/staff/customers/{user_id}", get(staff::view_customer_profile))
        .route(
            "/staff/customers/{user_id}/edit",
            get(staff::edit_customer_profile_form).post(staff::edit_customer_profile),
        )
        .route(
            "/staff/customers/{user_id}/delete",
            post(staff::delete_customer_account),
        )
}

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<tower_sessions::session::Error> for PageError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self(AppError::Session(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if matches!(self.0, AppError::Unauthorized) {
            return Redirect::to(LOGIN_PATH).into_response();
        }
        self.0.trace();
        let status = self.0.status();
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Something went wrong.".to_string(),
            _ => self.0.to_string(),
        };
        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        (status, page).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;

pub(crate) fn format_money(amount: &Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

pub(crate) fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
