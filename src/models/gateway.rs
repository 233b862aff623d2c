//! Envelope shapes shared by every gateway endpoint.
//!
//! Requests are `{"data": {"attributes": {...}}}` and responses are
//! `{"data": {"id": ..., "type": ..., "attributes": {...}}}`. Errors come
//! back as `{"errors": [{"code": ..., "detail": ...}]}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form key/value metadata attached to gateway records.
pub type Metadata = BTreeMap<String, String>;

/// Outgoing request body.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<A> {
    pub data: RequestData<A>,
}

#[derive(Debug, Serialize)]
pub struct RequestData<A> {
    pub attributes: A,
}

impl<A> RequestEnvelope<A> {
    pub fn new(attributes: A) -> Self {
        Self {
            data: RequestData { attributes },
        }
    }
}

/// Response body carrying at most one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<A> {
    pub data: Option<Resource<A>>,
}

/// A gateway resource: identifier, resource type and typed attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<A> {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub attributes: A,
}

/// Error body returned with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub detail: Option<String>,
}

impl ErrorBody {
    /// First error's code and detail, if the gateway sent any.
    pub fn first(&self) -> (Option<String>, Option<String>) {
        match self.errors.first() {
            Some(e) => (e.code.clone(), e.detail.clone()),
            None => (None, None),
        }
    }
}
