use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ProductDetailDto, ProductResponseDto, ProductSearchQuery};
use crate::features::products::services::ProductService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List products
///
/// Ordered by id. `q` matches a literal substring of the name or SKU.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductSearchQuery, PaginationQuery),
    responses(
        (status = 200, description = "List of products", body = ApiResponse<Vec<ProductResponseDto>>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    Query(search): Query<ProductSearchQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProductResponseDto>>>> {
    let page = service
        .list(search.search(), pagination.to_request())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(page.items),
        None,
        Some(Meta { total: page.total }),
    )))
}

/// Get product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let id = id
        .parse::<i64>()
        .map_err(|_| AppError::NotFound("Produk tidak ditemukan".to_string()))?;
    let product = service.get(id).await?;

    Ok(Json(ApiResponse::success(Some(product), None, None)))
}
