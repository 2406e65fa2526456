//! Backends for the dashboard REST API.
//!
//! [`CollectionBackend`] is the seam between the list/mutation machinery and
//! the network. It works on untyped JSON so one backend serves every entity
//! collection; [`decode`] and [`decode_all`] turn responses into entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::EntityId;

pub mod error;
pub mod http;
pub mod memory;

pub use error::ApiError;
pub use http::HttpBackend;
pub use memory::MemoryBackend;

/// Request body of a create or update
pub type Payload = Map<String, Value>;

/// CRUD access to the `/api/{collection}` resources
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// `GET /api/{collection}`
    async fn list(&self, collection: &str) -> Result<Vec<Value>>;

    /// `GET /api/{collection}/{id}`
    async fn get(&self, collection: &str, id: EntityId) -> Result<Value>;

    /// `POST /api/{collection}`, returning the stored record
    async fn create(&self, collection: &str, payload: &Payload) -> Result<Value>;

    /// `PUT /api/{collection}/{id}`, returning the stored record
    async fn update(&self, collection: &str, id: EntityId, payload: &Payload) -> Result<Value>;

    /// `DELETE /api/{collection}/{id}`
    async fn delete(&self, collection: &str, id: EntityId) -> Result<()>;
}

pub fn decode<E: DeserializeOwned>(value: Value) -> Result<E> {
    Ok(serde_json::from_value(value)?)
}

pub fn decode_all<E: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<E>> {
    values.into_iter().map(decode).collect()
}
