mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_storefront::{
    middleware::auth::CurrentUser,
    models::Role,
    routes::create_app,
    services::auth_service::issue_token,
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use uuid::Uuid;

fn app() -> Router {
    create_app(
        common::offline_state(),
        SessionManagerLayer::new(MemoryStore::default()),
    )
}

fn bearer(roles: Vec<Role>) -> String {
    let user = CurrentUser {
        id: Uuid::new_v4(),
        user_name: "someone@example.com".into(),
        roles,
    };
    issue_token(common::TEST_SECRET, &user)
        .expect("token")
        .token
}

async fn get(path: &str, authorization: Option<String>) -> axum::response::Response {
    let mut request = Request::builder().uri(path);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    app()
        .oneshot(request.body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

#[tokio::test]
async fn health_is_public() {
    let response = get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_redirects_anonymous_browsers_to_login() {
    let response = get("/staff", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/account/login"
    );
}

#[tokio::test]
async fn api_rejects_anonymous_requests() {
    for path in ["/api/staff/customers", "/api/staff/orders"] {
        let response = get(path, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert!(response.headers().get(header::LOCATION).is_none(), "{path}");
    }

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/staff/orders/{}/dispatch", Uuid::new_v4()))
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_dashboard_actions_redirect_to_login() {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/staff/orders/{}/dispatch", Uuid::new_v4()))
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/account/login"
    );
}

#[tokio::test]
async fn api_rejects_tampered_tokens() {
    let token = format!("{}x", bearer(vec![Role::Staff]));
    let response = get("/api/staff/customers", Some(token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customers_cannot_open_the_dashboard() {
    let response = get("/api/staff/customers", Some(bearer(vec![Role::Customer]))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get("/staff", Some(bearer(vec![Role::Customer]))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_role_alone_is_not_staff() {
    let response = get("/api/staff/orders", Some(bearer(vec![Role::Admin]))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dispatch_requires_staff() {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/staff/orders/{}/dispatch", Uuid::new_v4()))
        .header(header::AUTHORIZATION, bearer(vec![Role::Customer]))
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let response = get("/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
