//! Server-rendered product pages.
//!
//! Writes answer with a 302 redirect: to the list with a success flash, or
//! back to the submitting page with the field errors flashed.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use minijinja::context;

use crate::core::error::{AppError, PageResult};
use crate::core::extractor::PreviousUrl;
use crate::features::products::dtos::{
    PaginationView, ProductInput, ProductListQuery, UploadedImage,
};
use crate::features::products::services::{ProductService, SubmitOutcome};
use crate::shared::constants::{
    MSG_PRODUCT_CREATED, MSG_PRODUCT_DELETED, MSG_PRODUCT_UPDATED, MSG_VALIDATION_FAILED,
    PRODUCT_LIST_PAGE_SIZE,
};
use crate::shared::flash::{Flash, FlashSession};
use crate::shared::types::PageRequest;
use crate::shared::views::render_view;

const PRODUCTS_PATH: &str = "/products";
const CREATE_PATH: &str = "/products/create";

fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

/// Ids are numeric; anything else cannot name a product
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound("Produk tidak ditemukan".to_string()))
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductInput, AppError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image: {}", e)))?;

            // An empty file input still submits a nameless, empty part
            if !file_name.is_empty() || !data.is_empty() {
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok(ProductInput::new(fields).with_image(image))
}

pub async fn home() -> Response {
    redirect(PRODUCTS_PATH)
}

pub async fn index(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    Query(query): Query<ProductListQuery>,
) -> PageResult<Html<String>> {
    let search = query.search();
    let page = service
        .list(
            search,
            PageRequest::new(query.page(), PRODUCT_LIST_PAGE_SIZE),
        )
        .await?;
    let pagination = PaginationView::new(&page, PRODUCTS_PATH, search);

    let html = render_view(
        "products/index.html",
        context! {
            products => page.items,
            pagination => pagination,
            q => query.q.as_deref().unwrap_or_default(),
            flash => flash.take().await,
        },
    )?;

    Ok(Html(html))
}

pub async fn create_form(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
) -> PageResult<Html<String>> {
    let categories = service.categories().await?;

    let html = render_view(
        "products/create.html",
        context! {
            categories => categories,
            flash => flash.take().await,
        },
    )?;

    Ok(Html(html))
}

pub async fn store(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    previous: PreviousUrl,
    multipart: Multipart,
) -> PageResult<Response> {
    let input = read_product_form(multipart).await?;

    match service.create(&input).await? {
        SubmitOutcome::Saved(_) => {
            flash.put(Flash::success(MSG_PRODUCT_CREATED)).await;
            Ok(redirect(PRODUCTS_PATH))
        }
        SubmitOutcome::Rejected(errors) => {
            flash
                .put(Flash::invalid(MSG_VALIDATION_FAILED, errors).with_input(input.old_input()))
                .await;
            Ok(redirect(&previous.or(CREATE_PATH)))
        }
    }
}

pub async fn show(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let product = service.get(parse_id(&id)?).await?;

    let html = render_view("products/show.html", context! { product => product })?;
    Ok(Html(html))
}

pub async fn edit_form(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let product = service.get(parse_id(&id)?).await?;
    let categories = service.categories().await?;

    let html = render_view(
        "products/edit.html",
        context! {
            product => product,
            categories => categories,
            flash => flash.take().await,
        },
    )?;

    Ok(Html(html))
}

pub async fn update(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    previous: PreviousUrl,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult<Response> {
    submit_update(&service, &flash, previous, &id, fields).await
}

pub async fn destroy(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    Path(id): Path<String>,
) -> PageResult<Response> {
    submit_delete(&service, &flash, &id).await
}

/// `POST /products/{id}` carrying `_method=PUT|PATCH|DELETE`
pub async fn override_method(
    State(service): State<Arc<ProductService>>,
    flash: FlashSession,
    previous: PreviousUrl,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> PageResult<Response> {
    let method = fields
        .get("_method")
        .map(|m| m.trim().to_ascii_uppercase())
        .unwrap_or_default();

    match method.as_str() {
        "PUT" | "PATCH" => submit_update(&service, &flash, previous, &id, fields).await,
        "DELETE" => submit_delete(&service, &flash, &id).await,
        _ => Err(AppError::BadRequest(format!("Unsupported form method '{}'", method)).into()),
    }
}

async fn submit_update(
    service: &ProductService,
    flash: &FlashSession,
    previous: PreviousUrl,
    raw_id: &str,
    fields: HashMap<String, String>,
) -> PageResult<Response> {
    let id = parse_id(raw_id)?;
    let input = ProductInput::new(fields);

    match service.update(id, &input).await? {
        SubmitOutcome::Saved(_) => {
            flash.put(Flash::success(MSG_PRODUCT_UPDATED)).await;
            Ok(redirect(PRODUCTS_PATH))
        }
        SubmitOutcome::Rejected(errors) => {
            flash.put(Flash::invalid(MSG_VALIDATION_FAILED, errors)).await;
            let edit_path = format!("{}/{}/edit", PRODUCTS_PATH, id);
            Ok(redirect(&previous.or(&edit_path)))
        }
    }
}

async fn submit_delete(
    service: &ProductService,
    flash: &FlashSession,
    raw_id: &str,
) -> PageResult<Response> {
    service.delete(parse_id(raw_id)?).await?;

    flash.put(Flash::success(MSG_PRODUCT_DELETED)).await;
    Ok(redirect(PRODUCTS_PATH))
}
