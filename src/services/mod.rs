pub mod account_service;
pub mod auth_service;
pub mod catalog_service;
pub mod identity_service;
pub mod order_service;
pub mod seed_service;
pub mod staff_service;
