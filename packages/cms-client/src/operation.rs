//! Declarative mapping from logical operations to HTTP requests and cache tags.

use reqwest::Method;

/// Cache label. Reads provide tags, writes invalidate them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Every list view of a resource type.
    List(String),
    /// One item of a resource type.
    Item(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Get(String),
    Create,
    Update(String),
    Delete(String),
}

/// One logical call against a resource type, e.g. "create tender".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub resource: String,
    pub kind: OperationKind,
}

impl Operation {
    fn new(resource: &str, kind: OperationKind) -> Self {
        Self {
            resource: resource.to_string(),
            kind,
        }
    }

    pub fn list(resource: &str) -> Self {
        Self::new(resource, OperationKind::List)
    }

    pub fn get(resource: &str, id: &str) -> Self {
        Self::new(resource, OperationKind::Get(id.to_string()))
    }

    pub fn create(resource: &str) -> Self {
        Self::new(resource, OperationKind::Create)
    }

    pub fn update(resource: &str, id: &str) -> Self {
        Self::new(resource, OperationKind::Update(id.to_string()))
    }

    pub fn delete(resource: &str, id: &str) -> Self {
        Self::new(resource, OperationKind::Delete(id.to_string()))
    }

    pub fn method(&self) -> Method {
        match self.kind {
            OperationKind::List | OperationKind::Get(_) => Method::GET,
            OperationKind::Create => Method::POST,
            OperationKind::Update(_) => Method::PUT,
            OperationKind::Delete(_) => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match &self.kind {
            OperationKind::List | OperationKind::Create => format!("/api/{}", self.resource),
            OperationKind::Get(id) | OperationKind::Update(id) | OperationKind::Delete(id) => {
                format!("/api/{}/{}", self.resource, id)
            }
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self.kind, OperationKind::List | OperationKind::Get(_))
    }

    fn item_tag(&self, id: &str) -> Tag {
        Tag::Item(self.resource.clone(), id.to_string())
    }

    /// Tags a successful read is cached under.
    pub fn provides(&self) -> Vec<Tag> {
        match &self.kind {
            OperationKind::List => vec![Tag::List(self.resource.clone())],
            OperationKind::Get(id) => vec![self.item_tag(id)],
            _ => Vec::new(),
        }
    }

    /// Tags a successful write makes stale.
    pub fn invalidates(&self) -> Vec<Tag> {
        match &self.kind {
            OperationKind::Create => vec![Tag::List(self.resource.clone())],
            OperationKind::Update(id) | OperationKind::Delete(id) => {
                vec![Tag::List(self.resource.clone()), self.item_tag(id)]
            }
            _ => Vec::new(),
        }
    }
}
