use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use super::{PageResult, account::OrderHistoryRow, format_date, format_money};
use crate::{
    dto::staff::{
        CustomerWithRoles, EditCustomerProfileForm, OrderToDispatch, ProfileUpdate,
        UpdateCustomerRequest,
    },
    middleware::auth::AuthUser,
    models::{AccountStatus, Role},
    services::staff_service,
    state::AppState,
};

const DISPATCH_LIST_PATH: &str = "/staff/orders";

fn join_roles(roles: &[Role]) -> String {
    if roles.is_empty() {
        return "-".to_string();
    }
    roles.iter().map(Role::as_str).collect::<Vec<_>>().join(", ")
}

pub struct CustomerRow {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub phone_number: String,
    pub funds: String,
    pub roles: String,
    pub deactivated: bool,
}

impl From<CustomerWithRoles> for CustomerRow {
    fn from(entry: CustomerWithRoles) -> Self {
        let user = entry.user;
        Self {
            id: user.id.to_string(),
            user_name: user.user_name,
            email: user.email,
            phone_number: user.phone_number.unwrap_or_default(),
            funds: format_money(&user.funds),
            roles: join_roles(&entry.roles),
            deactivated: user.status == AccountStatus::Deactivated,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "staff/index.html")]
pub struct CustomersTemplate {
    pub staff_name: String,
    pub customers: Vec<CustomerRow>,
}

pub struct DispatchRow {
    pub id: String,
    pub customer: String,
    pub total: String,
    pub placed_at: String,
}

impl From<OrderToDispatch> for DispatchRow {
    fn from(entry: OrderToDispatch) -> Self {
        Self {
            id: entry.order.id.to_string(),
            customer: entry.user_name.unwrap_or_else(|| "-".to_string()),
            total: format_money(&entry.order.total_amount),
            placed_at: format_date(&entry.order.created_at),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "staff/orders.html")]
pub struct OrdersToDispatchTemplate {
    pub staff_name: String,
    pub orders: Vec<DispatchRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "staff/customer_profile.html")]
pub struct CustomerProfileTemplate {
    pub staff_name: String,
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub funds: String,
    pub roles: String,
    pub deactivated: bool,
    pub orders: Vec<OrderHistoryRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "staff/edit_customer_profile.html")]
pub struct EditCustomerProfileTemplate {
    pub staff_name: String,
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub errors: Vec<String>,
}

impl EditCustomerProfileTemplate {
    fn new(staff: &AuthUser, form: EditCustomerProfileForm, errors: Vec<String>) -> Self {
        Self {
            staff_name: staff.user_name.clone(),
            user_id: form.user_id.to_string(),
            user_name: form.user_name,
            email: form.email,
            errors,
        }
    }
}

pub async fn index(State(state): State<AppState>, user: AuthUser) -> PageResult<CustomersTemplate> {
    let customers = staff_service::list_customers(&state, &user)
        .await?
        .into_iter()
        .map(CustomerRow::from)
        .collect();
    Ok(CustomersTemplate {
        staff_name: user.user_name,
        customers,
    })
}

pub async fn orders_to_dispatch(
    State(state): State<AppState>,
    user: AuthUser,
) -> PageResult<OrdersToDispatchTemplate> {
    let orders = staff_service::orders_to_dispatch(&state, &user)
        .await?
        .into_iter()
        .map(DispatchRow::from)
        .collect();
    Ok(OrdersToDispatchTemplate {
        staff_name: user.user_name,
        orders,
    })
}

pub async fn dispatch_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> PageResult<Redirect> {
    staff_service::dispatch_order(&state, &user, order_id).await?;
    Ok(Redirect::to(DISPATCH_LIST_PATH))
}

pub async fn view_customer_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> PageResult<CustomerProfileTemplate> {
    let profile = staff_service::customer_profile(&state, &user, user_id).await?;
    let customer = profile.user;
    Ok(CustomerProfileTemplate {
        staff_name: user.user_name,
        id: customer.id.to_string(),
        user_name: customer.user_name,
        email: customer.email,
        address: customer.address.unwrap_or_default(),
        phone_number: customer.phone_number.unwrap_or_default(),
        funds: format_money(&customer.funds),
        roles: join_roles(&profile.roles),
        deactivated: customer.status == AccountStatus::Deactivated,
        orders: profile.orders.into_iter().map(OrderHistoryRow::from).collect(),
    })
}

pub async fn edit_customer_profile_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> PageResult<EditCustomerProfileTemplate> {
    let form = staff_service::edit_form(&state, &user, user_id).await?;
    Ok(EditCustomerProfileTemplate::new(&user, form, Vec::new()))
}

pub async fn edit_customer_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    Form(fields): Form<UpdateCustomerRequest>,
) -> PageResult<Response> {
    let form = EditCustomerProfileForm {
        user_id,
        user_name: fields.user_name,
        email: fields.email,
    };
    match staff_service::update_profile(&state, &user, form).await? {
        ProfileUpdate::Saved(updated) => {
            Ok(Redirect::to(&format!("/staff/customers/{}", updated.id)).into_response())
        }
        ProfileUpdate::Rejected { form, errors } => {
            Ok(EditCustomerProfileTemplate::new(&user, form, errors).into_response())
        }
    }
}

pub async fn delete_customer_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> PageResult<Redirect> {
    staff_service::delete_account(&state, &user, user_id).await?;
    Ok(Redirect::to("/staff"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_render_as_a_comma_list() {
        assert_eq!(join_roles(&[]), "-");
        assert_eq!(join_roles(&[Role::Customer]), "Customer");
        assert_eq!(join_roles(&[Role::Admin, Role::Customer]), "Admin, Customer");
    }
}
