use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    entity::products::{Column as ProdCol, Entity as Products},
    error::AppResult,
    models::Product,
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<Vec<Product>> {
    Ok(Products::find()
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect())
}
