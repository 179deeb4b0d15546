#![allow(dead_code)]

use axum::{Router, body::Body, response::Response};
use axum_storefront::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::orders::ActiveModel as OrderActive,
    middleware::auth::CurrentUser,
    models::Role,
    routes::create_app,
    services::{
        auth_service::issue_token,
        identity_service::{self, NewUser},
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: TEST_SECRET.into(),
        session_idle_minutes: 30,
        seed_on_startup: false,
        secure_cookies: false,
    }
}

/// State whose connections are never opened; enough for requests rejected
/// before touching the database.
pub fn offline_state() -> AppState {
    let url = "postgres://storefront@localhost/unused";
    let pool = PgPoolOptions::new()
        .connect_lazy(url)
        .expect("lazy pool");
    AppState {
        pool,
        orm: DatabaseConnection::Disconnected,
        config: test_config(url),
    }
}

pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
            None
        }
    }
}

/// Connects, migrates and empties every table.
pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE orders, user_roles, roles, audit_logs, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let pool = create_pool(database_url).await?;
    Ok(AppState {
        pool,
        orm,
        config: test_config(database_url),
    })
}

pub const TEST_PASSWORD: &str = "Passw0rd!";

pub fn router(state: AppState) -> Router {
    create_app(state, SessionManagerLayer::new(MemoryStore::default()))
}

pub fn bearer_for(id: Uuid, user_name: &str, roles: Vec<Role>) -> String {
    let user = CurrentUser {
        id,
        user_name: user_name.to_string(),
        roles,
    };
    issue_token(TEST_SECRET, &user).expect("token").token
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn form_body(fields: &[(&str, &str)]) -> Body {
    Body::from(serde_urlencoded::to_string(fields).expect("form body"))
}

/// Creates a user whose user name is their email.
pub async fn create_user(state: &AppState, email: &str, roles: &[Role]) -> anyhow::Result<Uuid> {
    let user = identity_service::create_user(
        &state.orm,
        NewUser {
            user_name: email.to_string(),
            email: email.to_string(),
            address: None,
            phone_number: None,
            funds: Decimal::ZERO,
        },
        TEST_PASSWORD,
    )
    .await?;
    for role in roles {
        identity_service::add_to_role(&state.orm, user.id, *role).await?;
    }
    Ok(user.id)
}

pub async fn create_order(state: &AppState, user_id: Uuid, total: i64) -> anyhow::Result<Uuid> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        total_amount: Set(Decimal::from(total)),
        is_dispatched: Set(false),
        dispatched_date: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(order.id)
}
