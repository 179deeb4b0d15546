use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        staff::{CustomerProfile, CustomerWithRoles, OrderToDispatch, UpdateCustomerRequest},
    },
    models::{AccountStatus, Order, Product, Role, User},
    response::{ApiResponse, Meta},
    routes::{auth, health, staff},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        staff::list_customers,
        staff::list_orders_to_dispatch,
        staff::dispatch_order,
        staff::get_customer,
        staff::update_customer,
        staff::delete_customer
    ),
    components(
        schemas(
            User,
            Role,
            AccountStatus,
            Order,
            Product,
            CustomerWithRoles,
            CustomerProfile,
            OrderToDispatch,
            UpdateCustomerRequest,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            Meta,
            ApiResponse<User>,
            ApiResponse<Order>,
            ApiResponse<CustomerProfile>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Staff", description = "Staff dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
