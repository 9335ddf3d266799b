//! Product display data.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::aggregates::Product;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    product: Product,
    discount_percent: u64,
}

pub async fn show(State(state): State<AppState>) -> Json<ProductView> {
    let product = state.product();
    Json(ProductView { discount_percent: product.discount_percent(), product: product.clone() })
}

#[cfg(test)]
mod tests {
    use crate::checkout::pipeline::testing::Script;
    use crate::routes::testing::{app, call};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_product_view() {
        let t = app(Script::Succeed, Script::Succeed);
        let (status, body) = call(&t.router, Method::GET, "/api/v1/product", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Urban Athletics Series");
        assert_eq!(body["price"], 3700);
        assert_eq!(body["compareAtPrice"], 4500);
        assert_eq!(body["discountPercent"], 18);
        assert_eq!(body["sizes"], serde_json::json!([37, 38, 39, 40, 41, 42]));
        assert_eq!(body["specifications"].as_array().map(Vec::len), Some(6));
    }
}
