use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::core::middleware::session_middleware;
use crate::features::products::handlers;
use crate::features::products::services::ProductService;
use crate::shared::flash::FlashStore;

/// Dashboard pages. Every request carries a flash session.
pub fn dashboard_routes(service: Arc<ProductService>, flash_store: Arc<FlashStore>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/products", get(handlers::index).post(handlers::store))
        .route("/products/create", get(handlers::create_form))
        .route(
            "/products/{id}",
            get(handlers::show)
                .put(handlers::update)
                .patch(handlers::update)
                .delete(handlers::destroy)
                .post(handlers::override_method),
        )
        .route("/products/{id}/edit", get(handlers::edit_form))
        .with_state(service)
        .layer(middleware::from_fn_with_state(
            flash_store,
            session_middleware,
        ))
}

/// Read-only JSON API
pub fn api_routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/{id}", get(handlers::get_product))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;

    use crate::shared::constants::{MSG_PRODUCT_CREATED, MSG_PRODUCT_DELETED, MSG_VALIDATION_FAILED};
    use crate::shared::test_helpers::{product_data, TestCatalog};

    fn widget_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("name", "Widget")
            .add_text("slug", "widget")
            .add_text("sku", "SKU1")
            .add_text("price", "9.99")
            .add_text("stock", "5")
            .add_text("is_active", "0")
            .add_text("is_active", "1")
    }

    #[tokio::test]
    async fn test_home_redirects_to_product_list() {
        let server = TestCatalog::new().server();

        let response = server.get("/").await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header(header::LOCATION), "/products");
    }

    #[tokio::test]
    async fn test_store_redirects_with_flash_shown_once() {
        let catalog = TestCatalog::new();
        let server = catalog.server();

        let response = server.post("/products").multipart(widget_form()).await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header(header::LOCATION), "/products");

        let product = catalog.products.by_slug("widget").unwrap();
        assert!(product.is_active);
        assert_eq!(product.image, None);

        let list = server.get("/products").await;
        list.assert_status_ok();
        assert!(list.text().contains(MSG_PRODUCT_CREATED));
        assert!(list.text().contains("SKU1"));

        let again = server.get("/products").await;
        assert!(!again.text().contains(MSG_PRODUCT_CREATED));
    }

    #[tokio::test]
    async fn test_store_uploads_image() {
        let catalog = TestCatalog::new();
        let server = catalog.server();

        let form = widget_form().add_part(
            "image",
            Part::bytes(vec![0x89, b'P', b'N', b'G'])
                .file_name("widget.png")
                .mime_type("image/png"),
        );
        server
            .post("/products")
            .multipart(form)
            .await
            .assert_status(StatusCode::FOUND);

        let image = catalog.products.by_slug("widget").unwrap().image.unwrap();
        assert!(image.starts_with("uploads/product/"));
        assert!(image.ends_with("_widget.png"));
        assert_eq!(catalog.storage.paths(), vec![image]);
    }

    #[tokio::test]
    async fn test_store_rejection_returns_to_form_with_errors_and_input() {
        let catalog = TestCatalog::new();
        catalog.products.seed(product_data("widget", "SKU0"));
        let server = catalog.server();

        let response = server
            .post("/products")
            .add_header(
                header::REFERER,
                HeaderValue::from_static("http://localhost/products/create"),
            )
            .multipart(widget_form())
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header(header::LOCATION), "/products/create");
        assert_eq!(catalog.products.writes(), 0);

        let form = server.get("/products/create").await.text();
        assert!(form.contains(MSG_VALIDATION_FAILED));
        assert!(form.contains("Slug sudah digunakan."));
        assert!(form.contains(r#"value="SKU1""#));
    }

    #[tokio::test]
    async fn test_store_rejection_without_referer_falls_back_to_create_form() {
        let catalog = TestCatalog::new();
        let server = catalog.server();

        let response = server
            .post("/products")
            .multipart(MultipartForm::new().add_text("name", "Widget"))
            .await;

        assert_eq!(response.header(header::LOCATION), "/products/create");
        assert!(catalog.products.all().is_empty());
    }

    #[tokio::test]
    async fn test_index_searches_name_and_sku() {
        let catalog = TestCatalog::new();
        catalog.products.seed(product_data("widget", "SKU1"));
        catalog.products.seed(product_data("gadget", "SKU2"));
        catalog.products.seed(product_data("gizmo-sku1", "OTHER"));
        let server = catalog.server();

        let html = server
            .get("/products")
            .add_query_param("q", "SKU1")
            .await
            .text();

        assert!(html.contains("SKU1"));
        assert!(!html.contains("SKU2"));
        assert!(!html.contains("OTHER"));
        assert!(html.contains(r#"value="SKU1""#));
    }

    #[tokio::test]
    async fn test_index_paginates_by_ten() {
        let catalog = TestCatalog::new();
        for i in 1..=12 {
            catalog
                .products
                .seed(product_data(&format!("p{}", i), &format!("CODE-{:02}", i)));
        }
        let server = catalog.server();

        let second = server
            .get("/products")
            .add_query_param("page", "2")
            .await
            .text();
        assert!(second.contains("CODE-11"));
        assert!(second.contains("CODE-12"));
        assert!(!second.contains("CODE-10"));
        assert!(second.contains("?page=1"));

        let invalid = server
            .get("/products")
            .add_query_param("page", "abc")
            .await
            .text();
        assert!(invalid.contains("CODE-01"));
        assert!(invalid.contains("?page=2"));
    }

    #[tokio::test]
    async fn test_huge_page_number_is_an_empty_page() {
        let catalog = TestCatalog::new();
        catalog.products.seed(product_data("widget", "SKU1"));
        let server = catalog.server();
        let huge = i64::MAX.to_string();

        let response = server
            .get("/products")
            .add_query_param("page", &huge)
            .await;
        response.assert_status_ok();
        assert!(!response.text().contains("SKU1"));

        let body: Value = server
            .get("/api/products")
            .add_query_param("page", &huge)
            .await
            .json();
        assert_eq!(body["success"], true);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_show_and_edit_missing_product_are_not_found() {
        let server = TestCatalog::new().server();

        server
            .get("/products/42")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/products/abc")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/products/42/edit")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_show_renders_product_with_category() {
        let catalog = TestCatalog::new();
        let mut data = product_data("widget", "SKU1");
        data.product_category_id = Some(2);
        let product = catalog.products.seed(data);
        let server = catalog.server();

        let response = server.get(&format!("/products/{}", product.id)).await;

        response.assert_status_ok();
        assert!(response.text().contains("Pakaian"));
        assert!(response.text().contains("9.99"));
    }

    #[tokio::test]
    async fn test_update_through_method_override() {
        let catalog = TestCatalog::new();
        let product = catalog.products.seed(product_data("widget", "SKU1"));
        let server = catalog.server();

        let edit = server.get(&format!("/products/{}/edit", product.id)).await;
        edit.assert_status_ok();
        assert!(edit.text().contains(r#"value="widget""#));

        let response = server
            .post(&format!("/products/{}", product.id))
            .form(&[
                ("_method", "PUT"),
                ("name", "Widget Pro"),
                ("slug", "widget-pro"),
                ("sku", "SKU1"),
                ("price", "12.50"),
                ("stock", "3"),
                ("is_active", "0"),
            ])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header(header::LOCATION), "/products");

        let updated = catalog.products.by_slug("widget-pro").unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.stock, 3);
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_rejection_returns_to_edit_form() {
        let catalog = TestCatalog::new();
        let product = catalog.products.seed(product_data("widget", "SKU1"));
        let server = catalog.server();

        let response = server
            .put(&format!("/products/{}", product.id))
            .form(&[
                ("name", "Widget"),
                ("slug", "widget"),
                ("sku", "SKU1"),
                ("price", "1"),
                ("stock", "1"),
                ("image_url", "not-a-url"),
            ])
            .await;

        let edit_path = format!("/products/{}/edit", product.id);
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header(header::LOCATION), edit_path.as_str());
        assert_eq!(catalog.products.writes(), 0);

        let form = server.get(&edit_path).await.text();
        assert!(form.contains("URL gambar tidak valid."));
    }

    #[tokio::test]
    async fn test_destroy_then_destroy_again_is_not_found() {
        let catalog = TestCatalog::new();
        let product = catalog.products.seed(product_data("widget", "SKU1"));
        let server = catalog.server();
        let path = format!("/products/{}", product.id);

        let response = server.delete(&path).await;
        response.assert_status(StatusCode::FOUND);
        assert!(server.get("/products").await.text().contains(MSG_PRODUCT_DELETED));

        server
            .post(&path)
            .form(&[("_method", "DELETE")])
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_method_override_is_bad_request() {
        let catalog = TestCatalog::new();
        let product = catalog.products.seed(product_data("widget", "SKU1"));
        let server = catalog.server();

        server
            .post(&format!("/products/{}", product.id))
            .form(&[("_method", "PURGE")])
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(catalog.products.all().len(), 1);
    }

    #[tokio::test]
    async fn test_session_cookie_is_issued() {
        let server = TestCatalog::new().server();

        let response = server.get("/products").await;

        let cookie = response.header(header::SET_COOKIE);
        assert!(cookie.to_str().unwrap().starts_with("catalog_session="));
    }

    #[tokio::test]
    async fn test_api_lists_products_with_total() {
        let catalog = TestCatalog::new();
        catalog.products.seed(product_data("widget", "SKU1"));
        catalog.products.seed(product_data("gadget", "SKU2"));
        let server = catalog.server();

        let body: Value = server
            .get("/api/products")
            .add_query_param("page_size", "1")
            .await
            .json();

        assert_eq!(body["success"], true);
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["sku"], "SKU1");
    }

    #[tokio::test]
    async fn test_api_missing_product_is_not_found_envelope() {
        let server = TestCatalog::new().server();

        let response = server.get("/api/products/99").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_api_lists_categories_by_name() {
        let server = TestCatalog::new().server();

        let body: Value = server.get("/api/categories").await.json();

        assert_eq!(body["data"][0]["name"], "Elektronik");
        assert_eq!(body["data"][1]["name"], "Pakaian");
    }
}
