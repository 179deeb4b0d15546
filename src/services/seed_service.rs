use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    entity::products::{ActiveModel as ProductActive, Entity as Products},
    error::AppResult,
    models::Role,
    services::identity_service::{self, NewUser},
};

pub struct SeedProduct {
    pub name: &'static str,
    pub price: i64,
    pub stock_quantity: i32,
    pub description: &'static str,
    pub image_file_name: &'static str,
}

pub const CATALOG: [SeedProduct; 5] = [
    SeedProduct {
        name: "Laptop",
        price: 1000,
        stock_quantity: 50,
        description: "A high-performance laptop for gaming and work.",
        image_file_name: "laptop.jpg",
    },
    SeedProduct {
        name: "Smartphone",
        price: 500,
        stock_quantity: 100,
        description: "A feature-packed smartphone with excellent camera quality.",
        image_file_name: "phone.jpg",
    },
    SeedProduct {
        name: "Headphones",
        price: 150,
        stock_quantity: 200,
        description: "Immerse yourself in crystal-clear sound with these advanced noise-canceling headphones.",
        image_file_name: "headphones.jpg",
    },
    SeedProduct {
        name: "Shoes",
        price: 150,
        stock_quantity: 200,
        description: "Comfortable and stylish shoes for everyday wear.",
        image_file_name: "shoes.jpg",
    },
    SeedProduct {
        name: "Bag",
        price: 150,
        stock_quantity: 200,
        description: "A durable and spacious bag for all your needs.",
        image_file_name: "bag.jpg",
    },
];

pub struct SeedAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub address: &'static str,
    pub phone_number: &'static str,
    pub funds: i64,
    pub role: Role,
}

pub const ADMIN_ACCOUNT: SeedAccount = SeedAccount {
    email: "admin@admin.com",
    password: "Admin@123",
    address: "123 Main St, City, Country",
    phone_number: "1234567890",
    funds: 100_000,
    role: Role::Admin,
};

pub const STAFF_ACCOUNT: SeedAccount = SeedAccount {
    email: "staff@example.com",
    password: "Staff@123",
    address: "456 Staff St, City, Country",
    phone_number: "0987654321",
    funds: 50_000,
    role: Role::Staff,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub products_created: usize,
    pub accounts_created: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.roles_created == 0 && self.products_created == 0 && self.accounts_created == 0
    }
}

pub async fn run<C: ConnectionTrait>(conn: &C) -> AppResult<SeedReport> {
    let mut report = SeedReport {
        roles_created: seed_roles(conn).await?,
        products_created: seed_products(conn).await?,
        ..SeedReport::default()
    };
    for account in [&ADMIN_ACCOUNT, &STAFF_ACCOUNT] {
        if ensure_account(conn, account).await?.is_some() {
            report.accounts_created += 1;
        }
    }

    tracing::info!(
        roles = report.roles_created,
        products = report.products_created,
        accounts = report.accounts_created,
        "seed completed"
    );
    Ok(report)
}

pub async fn seed_roles<C: ConnectionTrait>(conn: &C) -> AppResult<usize> {
    let mut created = 0;
    for role in Role::ALL {
        if !identity_service::role_exists(conn, role).await? {
            identity_service::create_role(conn, role).await?;
            created += 1;
        }
    }
    Ok(created)
}

// A partial catalog is left as it is.
pub async fn seed_products<C: ConnectionTrait>(conn: &C) -> AppResult<usize> {
    if Products::find().count(conn).await? > 0 {
        return Ok(0);
    }

    for product in &CATALOG {
        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(product.name.to_string()),
            price: Set(Decimal::from(product.price)),
            stock_quantity: Set(product.stock_quantity),
            description: Set(product.description.to_string()),
            image_file_name: Set(product.image_file_name.to_string()),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
    }
    Ok(CATALOG.len())
}

pub async fn ensure_account<C: ConnectionTrait>(
    conn: &C,
    account: &SeedAccount,
) -> AppResult<Option<Uuid>> {
    if identity_service::find_by_email(conn, account.email)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    let new_user = NewUser {
        user_name: account.email.to_string(),
        email: account.email.to_string(),
        address: Some(account.address.to_string()),
        phone_number: Some(account.phone_number.to_string()),
        funds: Decimal::from(account.funds),
    };
    let user = identity_service::create_user(conn, new_user, account.password).await?;
    identity_service::add_to_role(conn, user.id, account.role).await?;
    Ok(Some(user.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_uniquely_named_products() {
        let mut names: Vec<&str> = CATALOG.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn default_accounts_hold_privileged_roles() {
        assert_eq!(ADMIN_ACCOUNT.role, Role::Admin);
        assert_eq!(STAFF_ACCOUNT.role, Role::Staff);
        assert!(ADMIN_ACCOUNT.role.is_privileged() && STAFF_ACCOUNT.role.is_privileged());
    }

    #[test]
    fn empty_report_means_nothing_was_created() {
        assert!(SeedReport::default().is_empty());
        let report = SeedReport {
            products_created: 5,
            ..SeedReport::default()
        };
        assert!(!report.is_empty());
    }
}
