use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{orders, products, users};

pub const DELETED_USER_PREFIX: &str = "DeletedUser_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::Customer => "Customer",
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Staff" => Ok(Role::Staff),
            "Customer" => Ok(Role::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

pub fn is_customer_listing(roles: &[Role]) -> bool {
    !roles.iter().any(Role::is_privileged)
}

pub fn deleted_user_name(id: Uuid) -> String {
    format!("{DELETED_USER_PREFIX}{id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Deactivated,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Deactivated => "deactivated",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "deactivated" => Ok(AccountStatus::Deactivated),
            other => Err(anyhow::anyhow!("unknown account status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub funds: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        // Rows only ever carry values written by this crate; anything else
        // is treated as still active.
        let status = model.status.parse().unwrap_or(AccountStatus::Active);
        Self {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            address: model.address,
            phone_number: model.phone_number,
            funds: model.funds,
            status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub is_dispatched: bool,
    pub dispatched_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            total_amount: model.total_amount,
            is_dispatched: model.is_dispatched,
            dispatched_date: model.dispatched_date.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub description: String,
    pub image_file_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            stock_quantity: model.stock_quantity,
            description: model.description,
            image_file_name: model.image_file_name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_their_stored_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "staff".parse::<Role>(),
            Err(UnknownRole("staff".to_string()))
        );
    }

    #[test]
    fn customer_listing_excludes_admin_and_staff() {
        assert!(is_customer_listing(&[]));
        assert!(is_customer_listing(&[Role::Customer]));
        assert!(!is_customer_listing(&[Role::Customer, Role::Staff]));
        assert!(!is_customer_listing(&[Role::Admin]));
    }

    #[test]
    fn deleted_user_name_embeds_the_id() {
        let id = Uuid::new_v4();
        assert_eq!(deleted_user_name(id), format!("DeletedUser_{id}"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "deactivated".parse::<AccountStatus>().ok(),
            Some(AccountStatus::Deactivated)
        );
        assert!("gone".parse::<AccountStatus>().is_err());
    }
}
