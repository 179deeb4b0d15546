pub mod orders;
pub mod products;
pub mod roles;
pub mod user_roles;
pub mod users;

pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use roles::Entity as Roles;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
