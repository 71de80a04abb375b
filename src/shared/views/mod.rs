//! Server-rendered dashboard views.
//!
//! Views live in `templates/` (configurable with `VIEWS_DIR`) and use Jinja2
//! syntax. Every page extends `layout.html`.

pub mod engine;

pub use engine::{init_views, render_view, TemplateError};
