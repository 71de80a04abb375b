//! Template engine for the dashboard's server-rendered views (Jinja2 syntax).

use minijinja::Environment;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static VIEW_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Template directory relative to the project root
pub const DEFAULT_VIEWS_DIR: &str = "templates";

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Load every view under `views_dir` into the global environment.
///
/// Must run before the first render to take effect; later calls are ignored.
/// Returns the number of templates available afterwards.
pub fn init_views(views_dir: &str) -> usize {
    let env = VIEW_ENV.get_or_init(|| build_environment(Path::new(views_dir)));
    env.templates().count()
}

/// Build an environment with all `.html` templates from a directory.
///
/// Auto-escaping is enabled by minijinja for `.html` names.
fn build_environment(views_path: &Path) -> Environment<'static> {
    let mut env = Environment::new();

    if views_path.exists() {
        load_templates_recursive(&mut env, views_path, views_path);
    } else {
        tracing::warn!("Views directory {} does not exist", views_path.display());
    }

    env
}

/// Recursively load all .html templates from a directory
fn load_templates_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    if let Ok(entries) = std::fs::read_dir(current_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_templates_recursive(env, base_path, &path);
            } else if path.extension().is_some_and(|ext| ext == "html") {
                // Template names use forward slashes regardless of platform
                if let Ok(relative) = path.strip_prefix(base_path) {
                    let template_name = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    if let Ok(content) = std::fs::read_to_string(&path) {
                        // Leaked once at startup; views live for the whole process
                        let static_name: &'static str =
                            Box::leak(template_name.clone().into_boxed_str());
                        let static_content: &'static str = Box::leak(content.into_boxed_str());
                        if let Err(e) = env.add_template(static_name, static_content) {
                            tracing::warn!("Failed to load view {}: {}", template_name, e);
                        } else {
                            tracing::debug!("Loaded view: {}", template_name);
                        }
                    }
                }
            }
        }
    }
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    VIEW_ENV.get_or_init(|| build_environment(Path::new(DEFAULT_VIEWS_DIR)))
}

/// Render a view with any serializable context.
///
/// # Example
/// ```ignore
/// let html = render_view("products/show.html", minijinja::context! { product })?;
/// ```
pub fn render_view<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
