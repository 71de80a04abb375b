//! Product catalog: the dashboard's CRUD pages and a read-only JSON API.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/products` | Paginated list, `?q=` searches name and SKU |
//! | GET | `/products/create` | Create form |
//! | POST | `/products` | Store a product (multipart, optional `image` file) |
//! | GET | `/products/{id}` | Detail page |
//! | GET | `/products/{id}/edit` | Edit form |
//! | PUT/PATCH | `/products/{id}` | Update a product (form) |
//! | DELETE | `/products/{id}` | Delete a product |
//! | POST | `/products/{id}` | Update/delete via the `_method` form field |
//! | GET | `/api/products` | JSON list |
//! | GET | `/api/products/{id}` | JSON detail |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgProductRepository, ProductRepository};
pub use services::ProductService;
