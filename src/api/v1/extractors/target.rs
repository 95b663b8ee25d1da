use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::resource::ResourcePath;

/// The collection, and for item routes the item, a request addresses.
///
/// Top-level: `/{resource}[/{id}]`.
/// Nested: `/{resource}/{id}/{sub}[/{sub_id}]`, where `{resource}/{id}` is
/// the parent item.
#[derive(Debug, Clone)]
pub struct Target {
    resource: String,
    id: Option<String>,
    sub: Option<String>,
    sub_id: Option<String>,
}

impl Target {
    pub fn path(&self) -> ResourcePath<'_> {
        match &self.sub {
            Some(sub) => ResourcePath::Nested {
                parent: &self.resource,
                parent_id: self.id.as_deref().unwrap_or_default(),
                name: sub,
            },
            None => ResourcePath::Root {
                name: &self.resource,
            },
        }
    }

    pub fn item_id(&self) -> Result<&str, AppError> {
        let id = match self.sub {
            Some(_) => self.sub_id.as_deref(),
            None => self.id.as_deref(),
        };
        id.ok_or(AppError::NotFound)
    }
}

impl<S> FromRequestParts<S> for Target
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request("INVALID_PATH", e.body_text()))?;

        let resource = params.remove("resource").ok_or(AppError::NotFound)?;
        Ok(Self {
            resource,
            id: params.remove("id"),
            sub: params.remove("sub"),
            sub_id: params.remove("sub_id"),
        })
    }
}
