/*
 * Responsibility
 * - the resource graph: top-level resources by name, sub-resources under a parent
 * - resolving a request path into (resource, scope)
 */
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::resource::call::Call;
use crate::resource::error::ResourceError;
use crate::resource::query::Lookup;
use crate::resource::resource::Resource;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("resource `{0}` is already bound")]
    Duplicate(String),
    #[error("unknown parent resource `{0}`")]
    UnknownParent(String),
}

#[derive(Debug)]
struct SubResource {
    resource: Arc<Resource>,
    // field of the child holding the parent's id
    field: String,
}

/// Addressing of a collection in a request.
#[derive(Debug, Clone, Copy)]
pub enum ResourcePath<'a> {
    Root {
        name: &'a str,
    },
    Nested {
        parent: &'a str,
        parent_id: &'a str,
        name: &'a str,
    },
}

#[derive(Debug, Default)]
pub struct ResourceIndex {
    resources: HashMap<String, Arc<Resource>>,
    children: HashMap<(String, String), SubResource>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, resource: Resource) -> Result<Arc<Resource>, IndexError> {
        let name = resource.name().to_string();
        if self.resources.contains_key(&name) {
            return Err(IndexError::Duplicate(name));
        }
        let resource = Arc::new(resource);
        self.resources.insert(name, resource.clone());
        Ok(resource)
    }

    /// Expose `resource` under `/{parent}/{parent_id}/{name}`; its items
    /// reference the parent through `field`.
    pub fn bind_sub(
        &mut self,
        parent: &str,
        resource: Arc<Resource>,
        field: impl Into<String>,
    ) -> Result<(), IndexError> {
        if !self.resources.contains_key(parent) {
            return Err(IndexError::UnknownParent(parent.to_string()));
        }
        let key = (parent.to_string(), resource.name().to_string());
        if self.children.contains_key(&key) {
            return Err(IndexError::Duplicate(format!("{}/{}", key.0, key.1)));
        }
        self.children.insert(
            key,
            SubResource {
                resource,
                field: field.into(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        self.resources.get(name).cloned()
    }

    /// Resolve a path to its resource and the scope every operation on it
    /// runs in. For nested paths the parent item must be visible to the
    /// caller (the parent resource's hooks run), otherwise `NotFound`.
    pub async fn resolve(
        &self,
        call: &Call,
        path: ResourcePath<'_>,
    ) -> Result<(Arc<Resource>, Lookup), ResourceError> {
        match path {
            ResourcePath::Root { name } => {
                let resource = self.get(name).ok_or(ResourceError::NotFound)?;
                Ok((resource, Lookup::new()))
            }
            ResourcePath::Nested {
                parent,
                parent_id,
                name,
            } => {
                let sub = self
                    .children
                    .get(&(parent.to_string(), name.to_string()))
                    .ok_or(ResourceError::NotFound)?;
                let parent = self.get(parent).ok_or(ResourceError::NotFound)?;

                parent
                    .get(call, &Lookup::new(), parent_id)
                    .await
                    .into_result()?;

                Ok((
                    sub.resource.clone(),
                    Lookup::for_parent(sub.field.clone(), parent_id),
                ))
            }
        }
    }
}
