use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::core::error::{AppError, PageError};
use crate::shared::flash::FlashSession;

impl<S> FromRequestParts<S> for FlashSession
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<FlashSession>()
            .cloned()
            .ok_or_else(|| PageError(AppError::Internal("Session layer not installed".to_string())))
    }
}

/// Path of the page that submitted the request, taken from `Referer`.
///
/// Only the path and query are kept so a redirect never leaves this host.
#[derive(Debug, Clone, Default)]
pub struct PreviousUrl(pub Option<String>);

impl PreviousUrl {
    pub fn or(self, fallback: &str) -> String {
        self.0.unwrap_or_else(|| fallback.to_string())
    }
}

impl<S> FromRequestParts<S> for PreviousUrl
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let previous = parts
            .headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .and_then(referer_path);

        Ok(PreviousUrl(previous))
    }
}

fn referer_path(referer: &str) -> Option<String> {
    if referer.starts_with('/') && !referer.starts_with("//") {
        return Some(referer.to_string());
    }

    let url = reqwest::Url::parse(referer).ok()?;
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    Some(path)
}
