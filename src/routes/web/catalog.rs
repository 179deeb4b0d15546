use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use super::{PageResult, format_money};
use crate::{models::Product, services::catalog_service, state::AppState};

pub struct ProductView {
    pub name: String,
    pub price: String,
    pub in_stock: bool,
    pub description: String,
    pub image_url: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            price: format_money(&product.price),
            in_stock: product.stock_quantity > 0,
            image_url: format!("/static/images/{}", product.image_file_name),
            name: product.name,
            description: product.description,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductView>,
}

pub async fn index(State(state): State<AppState>) -> PageResult<CatalogTemplate> {
    let products = catalog_service::list_products(&state)
        .await?
        .into_iter()
        .map(ProductView::from)
        .collect();
    Ok(CatalogTemplate { products })
}
