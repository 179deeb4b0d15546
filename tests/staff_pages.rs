mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use axum_storefront::{
    models::{AccountStatus, Role},
    services::{identity_service, order_service},
    state::AppState,
};
use common::{bearer_for, body_text, create_order, create_user, form_body, router};
use tower::ServiceExt;
use uuid::Uuid;

struct Client {
    state: AppState,
    token: String,
}

impl Client {
    async fn send(&self, request: axum::http::request::Builder, body: Body) -> Response {
        let request = request
            .header(header::AUTHORIZATION, &self.token)
            .body(body)
            .expect("request");
        router(self.state.clone())
            .oneshot(request)
            .await
            .expect("response")
    }

    async fn get(&self, path: &str) -> Response {
        self.send(Request::builder().uri(path), Body::empty()).await
    }

    async fn post(&self, path: &str) -> Response {
        self.send(Request::builder().method("POST").uri(path), Body::empty())
            .await
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, form_body(fields)).await
    }

    async fn put_json(&self, path: &str, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        self.send(request, Body::from(body.to_string())).await
    }
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION]
        .to_str()
        .expect("location header")
}

// Drives the dashboard pages and the JSON staff API end to end.
#[tokio::test]
async fn staff_pages_and_api() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let staff_id = create_user(&state, "staff@example.com", &[Role::Staff]).await?;
    let customer_id = create_user(&state, "jane@example.com", &[Role::Customer]).await?;
    let order_id = create_order(&state, customer_id, 120).await?;

    let client = Client {
        state: state.clone(),
        token: bearer_for(staff_id, "staff@example.com", vec![Role::Staff]),
    };

    let response = client.get("/staff").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<td>jane@example.com</td>"));
    assert!(!page.contains("<td>staff@example.com</td>"));

    // Dispatching an unknown order still lands on the dispatch list.
    let response = client
        .post(&format!("/staff/orders/{}/dispatch", Uuid::new_v4()))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/staff/orders");

    let response = client
        .post(&format!("/staff/orders/{order_id}/dispatch"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/staff/orders");
    let dispatched = order_service::get_order_by_id(&state.orm, order_id)
        .await?
        .expect("order");
    assert!(dispatched.is_dispatched);

    // The API reports the unknown order instead.
    let response = client
        .post(&format!("/api/staff/orders/{}/dispatch", Uuid::new_v4()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(&format!("/api/staff/orders/{order_id}/dispatch"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // An invalid edit re-renders the form with its messages and saves nothing.
    let edit_path = format!("/staff/customers/{customer_id}/edit");
    let response = client
        .post_form(&edit_path, &[("user_name", ""), ("email", "not-an-email")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("The UserName field is required."));
    assert!(page.contains("The Email field is not a valid e-mail address."));
    assert!(page.contains("not-an-email"));

    let response = client
        .put_json(
            &format!("/api/staff/customers/{customer_id}"),
            serde_json::json!({ "user_name": "jane doe", "email": "jane@example.com" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unchanged = identity_service::find_by_id(&state.orm, customer_id)
        .await?
        .expect("customer");
    assert_eq!(unchanged.user_name, "jane@example.com");
    assert_eq!(unchanged.email, "jane@example.com");

    let response = client
        .post_form(&edit_path, &[("user_name", "jane"), ("email", "jane@example.org")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/staff/customers/{customer_id}")
    );
    let edited = identity_service::find_by_id(&state.orm, customer_id)
        .await?
        .expect("customer");
    assert_eq!(edited.user_name, "jane");
    assert_eq!(edited.email, "jane@example.org");

    let response = client
        .get(&format!("/api/staff/customers/{}", Uuid::new_v4()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete deactivates the account and returns to the customer list.
    let response = client
        .post(&format!("/staff/customers/{customer_id}/delete"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/staff");

    let deleted = identity_service::find_by_id(&state.orm, customer_id)
        .await?
        .expect("account still resolves by id");
    assert_eq!(deleted.status, AccountStatus::Deactivated.as_str());
    assert!(
        order_service::get_orders_by_user_id(&state.orm, customer_id)
            .await?
            .is_empty()
    );

    let page = body_text(client.get("/staff").await).await;
    assert!(page.contains(&format!("DeletedUser_{customer_id}")));
    assert!(page.contains("(deactivated)"));

    Ok(())
}
